use rowfs_types::status_code::{NamespaceCode, StatusCode};
use rowfs_types::{make_error_msg, Result};

use crate::block_agent::BlockAction;
use crate::config::NamespaceConfig;
use crate::inode::{FileState, INode};
use crate::node_manager::NodeManager;
use crate::paths;

pub(crate) async fn delete(
    manager: &NodeManager,
    config: &NamespaceConfig,
    path: &str,
    recursive: bool,
) -> Result<bool> {
    paths::validate(path)?;
    if path == paths::ROOT {
        return make_error_msg(StatusCode::INVALID_ARG, "cannot delete the root");
    }
    tracing::debug!(path, recursive, "delete");

    let node = match manager.get_node(path).await? {
        Some(node) => node,
        None => return Ok(false),
    };
    if let Some(parent_path) = paths::parent_of(path) {
        if manager.get_node(&parent_path).await?.is_none() {
            return make_error_msg(
                NamespaceCode::NOT_FOUND,
                format!("parent does not exist: {parent_path:?}"),
            );
        }
    }

    if !node.is_dir {
        delete_file(manager, config, &node, true).await?;
        return Ok(true);
    }
    if !recursive && !manager.is_empty_directory(&node).await? {
        return Ok(false);
    }
    delete_directory(manager, config, &node, true).await?;
    Ok(true)
}

/// Delete one file row: mark it `Deleted` (emitting a block-delete action
/// unless the blocks survive elsewhere), remove the row, then settle.
pub(crate) async fn delete_file(
    manager: &NodeManager,
    config: &NamespaceConfig,
    node: &INode,
    delete_blocks: bool,
) -> Result<()> {
    let mut doomed = node.clone();
    doomed.file_state = Some(FileState::Deleted);
    if delete_blocks {
        manager
            .put_node_with_action(&doomed, BlockAction::Delete)
            .await?;
    } else {
        manager.put_node(&doomed).await?;
    }
    manager.delete_node(&doomed).await?;
    if !config.delete_settle.is_zero() {
        tokio::time::sleep(config.delete_settle).await;
    }
    Ok(())
}

/// Delete a whole subtree, deepest level first.
///
/// A directory's row is removed by its parent's batch delete only after its
/// own content is gone; the root row goes last. Not atomic: an interruption
/// leaves a durable partially-deleted tree, and re-invoking completes the
/// remainder since already-deleted rows are simply absent on re-scan.
pub(crate) async fn delete_directory(
    manager: &NodeManager,
    config: &NamespaceConfig,
    root: &INode,
    delete_blocks: bool,
) -> Result<()> {
    let directories = manager.discover_directories(root).await?;
    for dir in directories.iter().rev() {
        let mut subdirs = Vec::new();
        let mut scan = manager.child_scan(&dir.path);
        while let Some(child) = scan.next().await? {
            if child.is_dir {
                subdirs.push(child);
            } else {
                delete_file(manager, config, &child, delete_blocks).await?;
            }
        }
        manager.delete_nodes(&subdirs).await?;
    }
    manager.delete_node(root).await
}
