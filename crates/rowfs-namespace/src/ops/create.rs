use rowfs_types::status_code::{NamespaceCode, StatusCode};
use rowfs_types::{make_error_msg, Result};

use crate::config::NamespaceConfig;
use crate::inode::INode;
use crate::namespace::CreateFlags;
use crate::node_manager::{now_millis, NodeManager};
use crate::ops::{delete, mkdirs};
use crate::paths;

pub(crate) async fn create(
    manager: &NodeManager,
    config: &NamespaceConfig,
    path: &str,
    flags: CreateFlags,
    permission: u16,
    replication: u16,
    block_size: u64,
) -> Result<INode> {
    paths::validate(path)?;
    if flags.append {
        return make_error_msg(NamespaceCode::NOT_SUPPORTED, "append is not supported");
    }
    let parent_path = match paths::parent_of(path) {
        Some(parent) => parent,
        None => return make_error_msg(StatusCode::INVALID_ARG, "cannot create a file at the root path"),
    };
    tracing::debug!(path, overwrite = flags.overwrite, "create");

    if let Some(existing) = manager.get_node(path).await? {
        if existing.is_dir {
            return make_error_msg(
                NamespaceCode::ALREADY_EXISTS,
                format!("a directory exists at {path:?}"),
            );
        }
        if !flags.overwrite {
            return make_error_msg(
                NamespaceCode::ALREADY_EXISTS,
                format!("a file exists at {path:?}"),
            );
        }
        delete::delete_file(manager, config, &existing, true).await?;
    }

    match manager.get_node(&parent_path).await? {
        Some(parent) if parent.is_dir => {}
        Some(_) => {
            return make_error_msg(
                NamespaceCode::PARENT_NOT_DIRECTORY,
                format!("{parent_path:?} is not a directory"),
            )
        }
        None => {
            if !flags.create_parent {
                return make_error_msg(
                    NamespaceCode::NOT_FOUND,
                    format!("parent does not exist: {parent_path:?}"),
                );
            }
            mkdirs::mkdirs(manager, config, &parent_path, config.root_permission, true).await?;
        }
    }

    let replication = if replication == 0 {
        config.default_replication
    } else {
        replication
    };
    let block_size = if block_size == 0 {
        config.default_block_size
    } else {
        block_size
    };
    // Always a fresh row: length 0, under construction, empty block list.
    let node = INode::new_file(
        path,
        &config.default_owner,
        &config.default_group,
        permission,
        replication,
        block_size,
        now_millis(),
    );
    manager.put_node(&node).await?;
    Ok(node)
}
