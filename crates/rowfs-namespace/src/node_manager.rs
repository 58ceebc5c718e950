//! Entity manager: atomic per-row CRUD and scan-based tree traversal.
//!
//! Holds no entity state between calls. Every write rewrites the full row at
//! the current wall-clock timestamp; every read goes to the store.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rowfs_kv::{KeySelector, KvStore};
use rowfs_types::status_code::NamespaceCode;
use rowfs_types::{make_error_msg, Result};

use crate::block_agent::{BlockAction, BlockAgent};
use crate::inode::INode;
use crate::row_key::RowKeyCodec;

/// Current wall-clock time in epoch milliseconds, used as the row version
/// timestamp on every write.
pub fn now_millis() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        Err(_) => 0,
    }
}

pub struct NodeManager {
    store: Arc<dyn KvStore>,
    agent: Arc<dyn BlockAgent>,
    codec: RowKeyCodec,
}

impl NodeManager {
    pub fn new(store: Arc<dyn KvStore>, agent: Arc<dyn BlockAgent>, codec: RowKeyCodec) -> Self {
        Self {
            store,
            agent,
            codec,
        }
    }

    pub fn codec(&self) -> &RowKeyCodec {
        &self.codec
    }

    /// Fetch the node at `path`. Absence is a normal outcome.
    pub async fn get_node(&self, path: &str) -> Result<Option<INode>> {
        let key = self.codec.encode(path);
        match self.store.get(&key).await? {
            Some(bytes) => Ok(Some(INode::unpack(path.to_string(), &bytes)?)),
            None => Ok(None),
        }
    }

    /// Persist the full row for `node`.
    pub async fn put_node(&self, node: &INode) -> Result<()> {
        let key = self.codec.encode(&node.path);
        self.store
            .put(&key, &node.pack()?, now_millis())
            .await
    }

    /// Persist the full row carrying a block-action tag, then forward the
    /// action to the block agent.
    pub async fn put_node_with_action(&self, node: &INode, action: BlockAction) -> Result<()> {
        let key = self.codec.encode(&node.path);
        self.store
            .put(&key, &node.pack_with_action(Some(action))?, now_millis())
            .await?;
        self.agent.on_action(&key, action).await
    }

    pub async fn delete_node(&self, node: &INode) -> Result<()> {
        self.store.delete(&self.codec.encode(&node.path)).await
    }

    /// Delete each node's row. Atomic per key only.
    pub async fn delete_nodes(&self, nodes: &[INode]) -> Result<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        let keys: Vec<Vec<u8>> = nodes
            .iter()
            .map(|node| self.codec.encode(&node.path))
            .collect();
        self.store.delete_batch(&keys).await
    }

    /// Direct children of `parent` strictly after `start_after` (a child
    /// name, empty for the beginning), at most `limit` entries, in key
    /// order.
    pub async fn scan_children(
        &self,
        parent: &INode,
        start_after: &str,
        limit: i32,
    ) -> Result<Vec<INode>> {
        let begin = KeySelector::new(self.codec.child_range_start(&parent.path, start_after), true);
        let end = KeySelector::new(self.codec.child_range_end(&parent.path), false);
        let scan = self.store.scan(&begin, &end, limit).await?;
        let mut children = Vec::with_capacity(scan.kvs.len());
        for kv in scan.kvs {
            let path = self.codec.decode(&kv.key)?;
            children.push(INode::unpack(path, &kv.value)?);
        }
        Ok(children)
    }

    /// Lazy, finite, forward-only sequence over the direct children of
    /// `parent_path`. Pages through the child range internally; a consumed
    /// scan cannot be restarted.
    pub fn child_scan(&self, parent_path: &str) -> ChildScan<'_> {
        ChildScan {
            manager: self,
            parent_path: parent_path.to_string(),
            cursor: None,
            page: 64,
            buffered: VecDeque::new(),
            exhausted: false,
        }
    }

    /// `root` plus every descendant directory, breadth-first (siblings
    /// before nephews). Drives level-by-level tree operations without
    /// loading whole subtrees at once.
    pub async fn discover_directories(&self, root: &INode) -> Result<Vec<INode>> {
        let mut directories = vec![root.clone()];
        let mut next = 0;
        while next < directories.len() {
            let parent_path = directories[next].path.clone();
            let mut scan = self.child_scan(&parent_path);
            while let Some(child) = scan.next().await? {
                if child.is_dir {
                    directories.push(child);
                }
            }
            next += 1;
        }
        Ok(directories)
    }

    /// True iff the child range of `dir` yields no rows.
    pub async fn is_empty_directory(&self, dir: &INode) -> Result<bool> {
        Ok(self.scan_children(dir, "", 1).await?.is_empty())
    }

    /// Re-read block and location lists from storage into `node`.
    pub async fn refresh_blocks(&self, node: &mut INode) -> Result<()> {
        match self.get_node(&node.path).await? {
            Some(stored) => {
                node.blocks = stored.blocks;
                node.locations = stored.locations;
                node.length = stored.length;
                Ok(())
            }
            None => make_error_msg(
                NamespaceCode::NOT_FOUND,
                format!("node vanished during refresh: {:?}", node.path),
            ),
        }
    }
}

/// See [`NodeManager::child_scan`].
pub struct ChildScan<'a> {
    manager: &'a NodeManager,
    parent_path: String,
    cursor: Option<String>,
    page: i32,
    buffered: VecDeque<INode>,
    exhausted: bool,
}

impl ChildScan<'_> {
    pub async fn next(&mut self) -> Result<Option<INode>> {
        if self.buffered.is_empty() && !self.exhausted {
            self.fill().await?;
        }
        Ok(self.buffered.pop_front())
    }

    async fn fill(&mut self) -> Result<()> {
        let codec = self.manager.codec();
        let start_after = self.cursor.as_deref().unwrap_or("");
        let begin = KeySelector::new(
            codec.child_range_start(&self.parent_path, start_after),
            true,
        );
        let end = KeySelector::new(codec.child_range_end(&self.parent_path), false);
        let scan = self.manager.store.scan(&begin, &end, self.page).await?;
        if (scan.kvs.len() as i32) < self.page && !scan.has_more {
            self.exhausted = true;
        }
        for kv in scan.kvs {
            let path = codec.decode(&kv.key)?;
            let child = INode::unpack(path, &kv.value)?;
            self.cursor = Some(child.file_name().to_string());
            self.buffered.push_back(child);
        }
        Ok(())
    }
}
