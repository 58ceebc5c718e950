//! One file per operation family. Each operation is a protocol over the
//! entity manager; the multi-row ones (recursive delete, rename) are staged
//! so that interrupted runs can be resumed by re-invoking the operation.

pub(crate) mod block_ops;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod list;
pub(crate) mod mkdirs;
pub(crate) mod rename;
pub(crate) mod set_attr;
pub(crate) mod stat;

use rowfs_types::status_code::NamespaceCode;
use rowfs_types::{make_error_msg, Result};

use crate::inode::INode;
use crate::node_manager::NodeManager;

/// Fetch the node at `path`, failing with `NOT_FOUND` if absent.
pub(crate) async fn require_node(manager: &NodeManager, path: &str) -> Result<INode> {
    match manager.get_node(path).await? {
        Some(node) => Ok(node),
        None => make_error_msg(
            NamespaceCode::NOT_FOUND,
            format!("no such entry: {path:?}"),
        ),
    }
}

/// Fetch the file at `path`, failing if absent or a directory.
pub(crate) async fn require_file(manager: &NodeManager, path: &str) -> Result<INode> {
    let node = require_node(manager, path).await?;
    if node.is_dir {
        return make_error_msg(
            NamespaceCode::IS_DIRECTORY,
            format!("{path:?} is a directory"),
        );
    }
    Ok(node)
}
