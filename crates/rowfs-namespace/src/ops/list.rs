use rowfs_types::status_code::NamespaceCode;
use rowfs_types::{make_error_msg, Result};

use crate::config::NamespaceConfig;
use crate::namespace::Listing;
use crate::node_manager::NodeManager;
use crate::paths;

pub(crate) async fn get_listing(
    manager: &NodeManager,
    config: &NamespaceConfig,
    path: &str,
    start_after: &str,
    limit: i32,
) -> Result<Listing> {
    paths::validate(path)?;
    let node = match manager.get_node(path).await? {
        Some(node) => node,
        None => {
            return make_error_msg(
                NamespaceCode::NOT_FOUND,
                format!("no such entry: {path:?}"),
            )
        }
    };
    if !node.is_dir {
        return Ok(Listing {
            entries: vec![node],
            has_more: false,
        });
    }

    let limit = if limit <= 0 {
        config.ls_limit
    } else {
        limit.min(config.ls_limit)
    };
    let entries = manager.scan_children(&node, start_after, limit).await?;
    // Approximation: when the remaining count equals the limit exactly,
    // this reports a spurious "more". Documented behavior.
    let has_more = entries.len() as i32 == limit;
    Ok(Listing { entries, has_more })
}
