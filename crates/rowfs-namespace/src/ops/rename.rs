//! Staged, crash-recoverable rename.
//!
//! Stage 1 duplicates the source subtree at the destination keys, every
//! duplicate carrying a pending-rename marker, the root duplicate written
//! last. Stage 2 deletes the original rows, deepest first, without emitting
//! block-delete actions (the blocks now belong to the destination copies).
//! Stage 3 clears the markers, descendants before the root.
//!
//! Recovery is determined by what exists when `rename` is invoked:
//! destination absent resumes at stage 1; destination present with a marker
//! resumes at stage 2 (or 3 if the source is already gone); destination
//! present without a marker means the rename already completed. No path
//! through the protocol leaves two live copies of the same entry.

use rowfs_types::status_code::{NamespaceCode, StatusCode};
use rowfs_types::{make_error_msg, Result};

use crate::config::NamespaceConfig;
use crate::inode::{INode, RenameState};
use crate::node_manager::NodeManager;
use crate::ops::delete;
use crate::paths;

pub(crate) async fn rename(
    manager: &NodeManager,
    config: &NamespaceConfig,
    src: &str,
    dst: &str,
    overwrite: bool,
) -> Result<()> {
    paths::validate(src)?;
    paths::validate(dst)?;
    if src == paths::ROOT {
        return make_error_msg(StatusCode::INVALID_ARG, "cannot rename the root");
    }
    if dst == paths::ROOT {
        return make_error_msg(StatusCode::INVALID_ARG, "cannot rename onto the root");
    }
    if src == dst {
        return make_error_msg(StatusCode::INVALID_ARG, "source equals destination");
    }
    if paths::is_descendant_of(dst, src) {
        return make_error_msg(
            StatusCode::INVALID_ARG,
            format!("destination {dst:?} is under source {src:?}"),
        );
    }
    tracing::debug!(src, dst, overwrite, "rename");

    let dst_parent = match paths::parent_of(dst) {
        Some(parent) => parent,
        None => return make_error_msg(StatusCode::INVALID_ARG, "destination has no parent"),
    };
    match manager.get_node(&dst_parent).await? {
        Some(parent) if parent.is_dir => {}
        Some(_) => {
            return make_error_msg(
                NamespaceCode::PARENT_NOT_DIRECTORY,
                format!("{dst_parent:?} is not a directory"),
            )
        }
        None => {
            return make_error_msg(
                NamespaceCode::NOT_FOUND,
                format!("destination parent does not exist: {dst_parent:?}"),
            )
        }
    }

    let src_node = manager.get_node(src).await?;
    match manager.get_node(dst).await? {
        None => {
            let src_node = match src_node {
                Some(node) => node,
                None => {
                    return make_error_msg(
                        NamespaceCode::NOT_FOUND,
                        format!("source does not exist: {src:?}"),
                    )
                }
            };
            stage_copy(manager, &src_node, src, dst).await?;
            stage_delete_source(manager, config, &src_node).await?;
            stage_commit(manager, dst).await
        }
        Some(dst_root) if dst_root.has_rename_flag() => {
            // Resuming an interrupted rename; the copy stage is complete.
            tracing::debug!(src, dst, "resuming pending rename");
            if let Some(src_node) = src_node {
                stage_delete_source(manager, config, &src_node).await?;
            }
            stage_commit(manager, dst).await
        }
        Some(dst_root) => {
            let src_node = match src_node {
                // Source gone and destination live: already completed.
                None => return Ok(()),
                Some(node) => node,
            };
            if src_node.is_dir != dst_root.is_dir {
                return make_error_msg(
                    StatusCode::INVALID_ARG,
                    format!("source and destination kinds differ: {src:?} vs {dst:?}"),
                );
            }
            if !overwrite {
                return make_error_msg(
                    NamespaceCode::ALREADY_EXISTS,
                    format!("destination exists: {dst:?}"),
                );
            }
            if !delete::delete(manager, config, dst, false).await? {
                return make_error_msg(
                    NamespaceCode::ALREADY_EXISTS,
                    format!("destination is a non-empty directory: {dst:?}"),
                );
            }
            stage_copy(manager, &src_node, src, dst).await?;
            stage_delete_source(manager, config, &src_node).await?;
            stage_commit(manager, dst).await
        }
    }
}

/// Stage 1: duplicate every source row at its rebased destination key with
/// a pending marker, root last. The root duplicate's presence is what marks
/// this stage complete.
pub(crate) async fn stage_copy(
    manager: &NodeManager,
    src_node: &INode,
    src: &str,
    dst: &str,
) -> Result<()> {
    if src_node.is_dir {
        let directories = manager.discover_directories(src_node).await?;
        for dir in &directories {
            let mut scan = manager.child_scan(&dir.path);
            while let Some(child) = scan.next().await? {
                copy_pending(manager, &child, src, dst).await?;
            }
        }
    }
    copy_pending(manager, src_node, src, dst).await
}

async fn copy_pending(manager: &NodeManager, node: &INode, src: &str, dst: &str) -> Result<()> {
    let mut copy = node.clone();
    copy.path = paths::rebase(&node.path, src, dst);
    copy.rename_state = RenameState::pending(manager.codec().encode(&node.path));
    manager.put_node(&copy).await
}

/// Stage 2: delete the original rows, without block-delete actions.
pub(crate) async fn stage_delete_source(
    manager: &NodeManager,
    config: &NamespaceConfig,
    src_node: &INode,
) -> Result<()> {
    if src_node.is_dir {
        delete::delete_directory(manager, config, src_node, false).await
    } else {
        delete::delete_file(manager, config, src_node, false).await
    }
}

/// Stage 3: clear pending markers under the destination, descendants first,
/// root last. Clearing is monotone and idempotent.
pub(crate) async fn stage_commit(manager: &NodeManager, dst: &str) -> Result<()> {
    let dst_root = match manager.get_node(dst).await? {
        Some(node) => node,
        None => {
            return make_error_msg(
                NamespaceCode::NOT_FOUND,
                format!("destination vanished during rename: {dst:?}"),
            )
        }
    };
    if dst_root.is_dir {
        let directories = manager.discover_directories(&dst_root).await?;
        for dir in &directories {
            let mut scan = manager.child_scan(&dir.path);
            while let Some(mut child) = scan.next().await? {
                if child.has_rename_flag() {
                    child.rename_state = RenameState::default();
                    manager.put_node(&child).await?;
                }
            }
        }
    }
    let mut root = dst_root;
    root.rename_state = RenameState::default();
    manager.put_node(&root).await
}
