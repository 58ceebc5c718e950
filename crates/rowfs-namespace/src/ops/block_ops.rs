use rowfs_types::status_code::NamespaceCode;
use rowfs_types::{make_error_msg, Result};

use crate::block_agent::BlockAction;
use crate::inode::{Block, BlockLocation, FileState};
use crate::node_manager::{now_millis, NodeManager};
use crate::ops::require_file;
use crate::paths;

/// Append a block to a file under construction.
///
/// The previous block, if supplied, is finalized into the block list before
/// the allocation write. Blocks and locations are then re-read from storage
/// rather than trusted from the pre-write state, since allocation is
/// performed by the external block agent.
pub(crate) async fn add_block(
    manager: &NodeManager,
    path: &str,
    previous: Option<Block>,
) -> Result<(Block, Vec<BlockLocation>)> {
    paths::validate(path)?;
    let mut node = require_file(manager, path).await?;
    tracing::debug!(path, previous = ?previous.as_ref().map(|block| block.id), "add_block");

    if let Some(previous) = previous {
        node.set_last_block(previous);
    }
    let now = now_millis();
    node.set_times(now, now);
    manager
        .put_node_with_action(&node, BlockAction::Allocate)
        .await?;

    manager.refresh_blocks(&mut node).await?;
    if node.blocks.len() != node.locations.len() {
        return make_error_msg(
            NamespaceCode::BLOCK_MISMATCH,
            format!(
                "{} blocks but {} location sets at {path:?}",
                node.blocks.len(),
                node.locations.len()
            ),
        );
    }
    match (node.blocks.last(), node.locations.last()) {
        (Some(block), Some(locations)) => Ok((block.clone(), locations.clone())),
        _ => make_error_msg(
            NamespaceCode::BLOCK_MISMATCH,
            format!("no block was allocated for {path:?}"),
        ),
    }
}

/// Close a file. A missing last block is a no-op success.
pub(crate) async fn complete(
    manager: &NodeManager,
    path: &str,
    last: Option<Block>,
) -> Result<bool> {
    let last = match last {
        Some(block) => block,
        None => return Ok(true),
    };
    paths::validate(path)?;
    let mut node = require_file(manager, path).await?;
    tracing::debug!(path, last_block = last.id, "complete");

    node.set_last_block(last);
    node.length = node.blocks.iter().map(|block| block.num_bytes).sum();
    node.file_state = Some(FileState::Closed);
    let now = now_millis();
    node.set_times(now, now);
    manager
        .put_node_with_action(&node, BlockAction::Close)
        .await?;
    Ok(true)
}
