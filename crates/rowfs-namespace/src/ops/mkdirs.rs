use rowfs_types::status_code::NamespaceCode;
use rowfs_types::{make_error_msg, Result};

use crate::config::NamespaceConfig;
use crate::inode::INode;
use crate::node_manager::{now_millis, NodeManager};
use crate::paths;

/// Idempotent directory creation. The root has no parent and is created as
/// a sentinel row the first time it is needed.
pub(crate) async fn mkdirs(
    manager: &NodeManager,
    config: &NamespaceConfig,
    path: &str,
    permission: u16,
    create_parent: bool,
) -> Result<bool> {
    paths::validate(path)?;
    tracing::debug!(path, create_parent, "mkdirs");

    if let Some(existing) = manager.get_node(path).await? {
        if existing.is_dir {
            return Ok(true);
        }
        return make_error_msg(
            NamespaceCode::NOT_DIRECTORY,
            format!("a file exists at {path:?}"),
        );
    }

    // Walk up to the nearest existing ancestor, collecting missing paths.
    let mut missing = vec![path.to_string()];
    loop {
        let current = missing[missing.len() - 1].clone();
        let parent_path = match paths::parent_of(&current) {
            Some(parent) => parent,
            None => break,
        };
        match manager.get_node(&parent_path).await? {
            Some(parent) if parent.is_dir => break,
            Some(_) => {
                return make_error_msg(
                    NamespaceCode::PARENT_NOT_DIRECTORY,
                    format!("{parent_path:?} is not a directory"),
                )
            }
            None => {
                if !create_parent {
                    return make_error_msg(
                        NamespaceCode::NOT_FOUND,
                        format!("parent does not exist: {parent_path:?}"),
                    );
                }
                missing.push(parent_path);
            }
        }
    }

    // Create shallowest first so every new row lands under a live parent.
    let now = now_millis();
    for dir_path in missing.iter().rev() {
        let node = INode::new_directory(
            dir_path,
            &config.default_owner,
            &config.default_group,
            permission,
            now,
        );
        manager.put_node(&node).await?;
    }
    Ok(true)
}
