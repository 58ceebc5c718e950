//! Operation-layer facade: the surface an RPC presentation layer would call.

use std::sync::Arc;

use rowfs_kv::KvStore;
use rowfs_types::status_code::NamespaceCode;
use rowfs_types::{make_error_msg, Result};

use crate::block_agent::BlockAgent;
use crate::config::NamespaceConfig;
use crate::inode::{Block, BlockLocation, INode};
use crate::node_manager::NodeManager;
use crate::ops;
use crate::row_key::RowKeyCodec;

/// Flags for [`Namespace::create`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateFlags {
    pub overwrite: bool,
    pub append: bool,
    pub create_parent: bool,
}

/// One page of directory entries.
#[derive(Debug)]
pub struct Listing {
    pub entries: Vec<INode>,
    /// Set exactly when the returned count equals the requested limit; can
    /// misreport when the true remaining count equals the limit.
    pub has_more: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ContentSummary {
    pub length: u64,
    pub file_count: u64,
    pub directory_count: u64,
    pub quota: i64,
    pub space_consumed: u64,
    pub space_quota: i64,
}

/// Block layout of one file.
#[derive(Debug)]
pub struct BlockLocations {
    pub length: u64,
    pub blocks: Vec<Block>,
    pub locations: Vec<Vec<BlockLocation>>,
    pub under_construction: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ServerDefaults {
    pub block_size: u64,
    pub replication: u16,
}

pub struct Namespace {
    manager: NodeManager,
    config: NamespaceConfig,
}

impl Namespace {
    pub fn new(
        store: Arc<dyn KvStore>,
        agent: Arc<dyn BlockAgent>,
        config: NamespaceConfig,
    ) -> Self {
        Self {
            manager: NodeManager::new(store, agent, RowKeyCodec::new()),
            config,
        }
    }

    pub fn manager(&self) -> &NodeManager {
        &self.manager
    }

    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Create the root sentinel row if it does not exist yet.
    pub async fn format(&self) -> Result<()> {
        ops::mkdirs::mkdirs(
            &self.manager,
            &self.config,
            crate::paths::ROOT,
            self.config.root_permission,
            false,
        )
        .await?;
        Ok(())
    }

    pub async fn create(
        &self,
        path: &str,
        flags: CreateFlags,
        permission: u16,
        replication: u16,
        block_size: u64,
    ) -> Result<INode> {
        ops::create::create(
            &self.manager,
            &self.config,
            path,
            flags,
            permission,
            replication,
            block_size,
        )
        .await
    }

    pub async fn mkdirs(&self, path: &str, permission: u16, create_parent: bool) -> Result<bool> {
        ops::mkdirs::mkdirs(&self.manager, &self.config, path, permission, create_parent).await
    }

    pub async fn delete(&self, path: &str, recursive: bool) -> Result<bool> {
        ops::delete::delete(&self.manager, &self.config, path, recursive).await
    }

    pub async fn rename(&self, src: &str, dst: &str, overwrite: bool) -> Result<()> {
        ops::rename::rename(&self.manager, &self.config, src, dst, overwrite).await
    }

    pub async fn add_block(
        &self,
        path: &str,
        previous: Option<Block>,
    ) -> Result<(Block, Vec<BlockLocation>)> {
        ops::block_ops::add_block(&self.manager, path, previous).await
    }

    pub async fn complete(&self, path: &str, last: Option<Block>) -> Result<bool> {
        ops::block_ops::complete(&self.manager, path, last).await
    }

    pub async fn get_listing(
        &self,
        path: &str,
        start_after: &str,
        limit: i32,
    ) -> Result<Listing> {
        ops::list::get_listing(&self.manager, &self.config, path, start_after, limit).await
    }

    pub async fn get_file_info(&self, path: &str) -> Result<Option<INode>> {
        ops::stat::get_file_info(&self.manager, path).await
    }

    pub async fn get_content_summary(&self, path: &str) -> Result<ContentSummary> {
        ops::stat::get_content_summary(&self.manager, path).await
    }

    pub async fn get_block_locations(&self, path: &str) -> Result<BlockLocations> {
        ops::stat::get_block_locations(&self.manager, path).await
    }

    pub async fn get_preferred_block_size(&self, path: &str) -> Result<u64> {
        ops::stat::get_preferred_block_size(&self.manager, path).await
    }

    pub fn get_server_defaults(&self) -> ServerDefaults {
        ServerDefaults {
            block_size: self.config.default_block_size,
            replication: self.config.default_replication,
        }
    }

    pub async fn set_owner(
        &self,
        path: &str,
        owner: Option<&str>,
        group: Option<&str>,
    ) -> Result<()> {
        ops::set_attr::set_owner(&self.manager, path, owner, group).await
    }

    pub async fn set_permission(&self, path: &str, permission: u16) -> Result<()> {
        ops::set_attr::set_permission(&self.manager, path, permission).await
    }

    pub async fn set_quota(&self, path: &str, ns_quota: i64, ds_quota: i64) -> Result<()> {
        ops::set_attr::set_quota(&self.manager, path, ns_quota, ds_quota).await
    }

    pub async fn set_replication(&self, path: &str, replication: u16) -> Result<bool> {
        ops::set_attr::set_replication(&self.manager, path, replication).await
    }

    pub async fn set_times(&self, path: &str, mtime: i64, atime: i64) -> Result<()> {
        ops::set_attr::set_times(&self.manager, path, mtime, atime).await
    }

    // Legacy operations that fail explicitly instead of being emulated.

    pub fn append(&self, _path: &str) -> Result<()> {
        unsupported("append")
    }

    pub fn create_symlink(&self, _target: &str, _link: &str) -> Result<()> {
        unsupported("createSymlink")
    }

    pub fn concat(&self, _target: &str, _sources: &[&str]) -> Result<()> {
        unsupported("concat")
    }

    pub fn set_safe_mode(&self) -> Result<bool> {
        unsupported("setSafeMode")
    }

    pub fn get_datanode_report(&self) -> Result<()> {
        unsupported("getDatanodeReport")
    }

    pub fn get_delegation_token(&self, _renewer: &str) -> Result<()> {
        unsupported("getDelegationToken")
    }

    pub fn update_pipeline(&self) -> Result<()> {
        unsupported("updatePipeline")
    }

    pub fn fsync(&self, _path: &str) -> Result<()> {
        unsupported("fsync")
    }

    pub fn recover_lease(&self, _path: &str) -> Result<bool> {
        unsupported("recoverLease")
    }
}

fn unsupported<T>(operation: &str) -> Result<T> {
    make_error_msg(
        NamespaceCode::NOT_SUPPORTED,
        format!("operation not supported: {operation}"),
    )
}
