//! Attribute setters: fetch, validate, mutate, persist.

use rowfs_types::status_code::NamespaceCode;
use rowfs_types::{make_error_msg, Result};

use crate::inode::{QUOTA_DONT_SET, QUOTA_RESET};
use crate::node_manager::NodeManager;
use crate::ops::require_node;
use crate::paths;

pub(crate) async fn set_owner(
    manager: &NodeManager,
    path: &str,
    owner: Option<&str>,
    group: Option<&str>,
) -> Result<()> {
    if owner.is_none() && group.is_none() {
        return Ok(());
    }
    paths::validate(path)?;
    let mut node = require_node(manager, path).await?;
    if let Some(owner) = owner {
        node.owner = owner.to_string();
    }
    if let Some(group) = group {
        node.group = group.to_string();
    }
    manager.put_node(&node).await
}

pub(crate) async fn set_permission(
    manager: &NodeManager,
    path: &str,
    permission: u16,
) -> Result<()> {
    paths::validate(path)?;
    let mut node = require_node(manager, path).await?;
    node.set_permission(permission);
    manager.put_node(&node).await
}

pub(crate) async fn set_quota(
    manager: &NodeManager,
    path: &str,
    ns_quota: i64,
    ds_quota: i64,
) -> Result<()> {
    if ns_quota < QUOTA_RESET {
        return make_error_msg(
            NamespaceCode::QUOTA_INVALID,
            format!("invalid namespace quota: {ns_quota}"),
        );
    }
    if ds_quota < QUOTA_RESET {
        return make_error_msg(
            NamespaceCode::QUOTA_INVALID,
            format!("invalid disk-space quota: {ds_quota}"),
        );
    }
    paths::validate(path)?;
    let mut node = require_node(manager, path).await?;
    if !node.is_dir {
        return make_error_msg(
            NamespaceCode::NOT_DIRECTORY,
            format!("cannot set a quota on a file: {path:?}"),
        );
    }
    if ns_quota != QUOTA_DONT_SET {
        node.ns_quota = ns_quota;
    }
    if ds_quota != QUOTA_DONT_SET {
        node.ds_quota = ds_quota;
    }
    manager.put_node(&node).await
}

pub(crate) async fn set_replication(
    manager: &NodeManager,
    path: &str,
    replication: u16,
) -> Result<bool> {
    paths::validate(path)?;
    let mut node = require_node(manager, path).await?;
    if node.is_dir {
        return make_error_msg(
            NamespaceCode::IS_DIRECTORY,
            format!("cannot set replication on a directory: {path:?}"),
        );
    }
    node.replication = replication;
    manager.put_node(&node).await?;
    Ok(true)
}

pub(crate) async fn set_times(
    manager: &NodeManager,
    path: &str,
    mtime: i64,
    atime: i64,
) -> Result<()> {
    paths::validate(path)?;
    let mut node = require_node(manager, path).await?;
    if node.is_dir {
        // Directories silently ignore time updates.
        return Ok(());
    }
    node.set_times(mtime, atime);
    manager.put_node(&node).await
}
