use rowfs_types::status_code::NamespaceCode;
use rowfs_types::{make_error_msg, Result};

use crate::inode::INode;
use crate::namespace::{BlockLocations, ContentSummary};
use crate::node_manager::NodeManager;
use crate::ops::require_node;
use crate::paths;

pub(crate) async fn get_file_info(manager: &NodeManager, path: &str) -> Result<Option<INode>> {
    paths::validate(path)?;
    manager.get_node(path).await
}

pub(crate) async fn get_content_summary(
    manager: &NodeManager,
    path: &str,
) -> Result<ContentSummary> {
    paths::validate(path)?;
    let node = require_node(manager, path).await?;
    if !node.is_dir {
        return Ok(ContentSummary {
            length: node.length,
            file_count: 1,
            directory_count: 0,
            quota: node.ns_quota,
            space_consumed: node.length * node.replication as u64,
            space_quota: node.ds_quota,
        });
    }

    let directories = manager.discover_directories(&node).await?;
    let mut summary = ContentSummary {
        length: 0,
        file_count: 0,
        directory_count: directories.len() as u64,
        quota: node.ns_quota,
        space_consumed: 0,
        space_quota: node.ds_quota,
    };
    for dir in &directories {
        let mut scan = manager.child_scan(&dir.path);
        while let Some(child) = scan.next().await? {
            if !child.is_dir {
                summary.length += child.length;
                summary.space_consumed += child.length * child.replication as u64;
                summary.file_count += 1;
            }
        }
    }
    Ok(summary)
}

pub(crate) async fn get_block_locations(
    manager: &NodeManager,
    path: &str,
) -> Result<BlockLocations> {
    paths::validate(path)?;
    let node = match manager.get_node(path).await? {
        Some(node) if !node.is_dir => node,
        _ => {
            return make_error_msg(
                NamespaceCode::NOT_FOUND,
                format!("no such file: {path:?}"),
            )
        }
    };
    let under_construction = node.is_under_construction();
    Ok(BlockLocations {
        length: node.length,
        blocks: node.blocks,
        locations: node.locations,
        under_construction,
    })
}

pub(crate) async fn get_preferred_block_size(manager: &NodeManager, path: &str) -> Result<u64> {
    paths::validate(path)?;
    let node = require_node(manager, path).await?;
    if node.is_dir {
        return make_error_msg(
            NamespaceCode::IS_DIRECTORY,
            format!("{path:?} is a directory"),
        );
    }
    Ok(node.block_size)
}
