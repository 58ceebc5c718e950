//! Interface to the external block-management collaborator.
//!
//! The namespace core never places, replicates, or frees physical block
//! storage. Instead, every row write that touches blocks carries an intent
//! tag, and the tag is forwarded to a [`BlockAgent`] together with the row
//! key. The production agent is a remote component; tests and the example
//! binary use [`LocalBlockAgent`], which materializes synthetic blocks
//! directly in the store so the re-read path behaves like the real system.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rowfs_kv::KvStore;
use rowfs_types::Result;

use crate::inode::{Block, BlockLocation, INode};
use crate::node_manager::now_millis;
use crate::row_key::RowKeyCodec;

/// Intent tag emitted alongside block-touching row writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockAction {
    Allocate,
    Close,
    Delete,
}

#[async_trait]
pub trait BlockAgent: Send + Sync {
    /// Called after the row at `row_key` has been persisted with `action`.
    async fn on_action(&self, row_key: &[u8], action: BlockAction) -> Result<()>;
}

/// Agent that acknowledges every action without doing anything.
#[derive(Debug, Default)]
pub struct NoopBlockAgent;

#[async_trait]
impl BlockAgent for NoopBlockAgent {
    async fn on_action(&self, _row_key: &[u8], action: BlockAction) -> Result<()> {
        tracing::debug!(?action, "block action ignored");
        Ok(())
    }
}

/// Self-contained allocator for tests and demos.
///
/// On `Allocate` it appends a fresh zero-length block with synthetic replica
/// locations to the row, mimicking the external collaborator that the
/// production deployment relies on. `Close` and `Delete` are acknowledged
/// only.
pub struct LocalBlockAgent {
    store: Arc<dyn KvStore>,
    codec: RowKeyCodec,
    next_block_id: AtomicU64,
}

impl LocalBlockAgent {
    pub fn new(store: Arc<dyn KvStore>, codec: RowKeyCodec) -> Self {
        Self {
            store,
            codec,
            next_block_id: AtomicU64::new(1),
        }
    }

    fn synthesize_locations(&self, replication: u16) -> Vec<BlockLocation> {
        (0..replication.max(1))
            .map(|i| BlockLocation {
                storage_id: format!("storage-{i}"),
                host: format!("node{i}.local"),
            })
            .collect()
    }
}

#[async_trait]
impl BlockAgent for LocalBlockAgent {
    async fn on_action(&self, row_key: &[u8], action: BlockAction) -> Result<()> {
        if action != BlockAction::Allocate {
            tracing::debug!(?action, "block action acknowledged");
            return Ok(());
        }
        let path = self.codec.decode(row_key)?;
        let bytes = match self.store.get(row_key).await? {
            Some(bytes) => bytes,
            // Row already gone; nothing to allocate into.
            None => return Ok(()),
        };
        let mut node = INode::unpack(path, &bytes)?;
        let id = self.next_block_id.fetch_add(1, Ordering::Relaxed);
        node.blocks.push(Block {
            id,
            generation: 1,
            num_bytes: 0,
        });
        node.locations.push(self.synthesize_locations(node.replication));
        tracing::debug!(path = %node.path, block_id = id, "allocated block");
        self.store
            .put(row_key, &node.pack()?, now_millis())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowfs_kv_backends::MemStore;

    #[tokio::test]
    async fn test_local_agent_allocates_parallel_lists() {
        let store: Arc<dyn KvStore> = Arc::new(MemStore::new());
        let codec = RowKeyCodec::new();
        let agent = LocalBlockAgent::new(store.clone(), codec);

        let node = INode::new_file("/f", "a", "g", 0o644, 2, 1 << 20, now_millis());
        let key = codec.encode("/f");
        store
            .put(&key, &node.pack().unwrap(), now_millis())
            .await
            .unwrap();

        agent.on_action(&key, BlockAction::Allocate).await.unwrap();
        agent.on_action(&key, BlockAction::Allocate).await.unwrap();

        let bytes = store.get(&key).await.unwrap().unwrap();
        let back = INode::unpack("/f".to_string(), &bytes).unwrap();
        assert_eq!(back.blocks.len(), 2);
        assert_eq!(back.locations.len(), 2);
        assert_eq!(back.locations[0].len(), 2);
        assert_ne!(back.blocks[0].id, back.blocks[1].id);
    }

    #[tokio::test]
    async fn test_local_agent_ignores_missing_row() {
        let store: Arc<dyn KvStore> = Arc::new(MemStore::new());
        let codec = RowKeyCodec::new();
        let agent = LocalBlockAgent::new(store, codec);
        let key = codec.encode("/missing");
        agent.on_action(&key, BlockAction::Allocate).await.unwrap();
        agent.on_action(&key, BlockAction::Delete).await.unwrap();
    }
}
