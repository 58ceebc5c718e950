use std::time::Duration;

/// Namespace configuration.
#[derive(Debug, Clone)]
pub struct NamespaceConfig {
    /// Upper bound on entries returned by one listing call.
    pub ls_limit: i32,
    /// Pause after deleting a file row, so an immediate same-key rewrite
    /// cannot land on an indistinguishable version timestamp at the store's
    /// clock granularity. A known limitation, not a correctness guarantee.
    pub delete_settle: Duration,
    pub default_replication: u16,
    pub default_block_size: u64,
    pub root_permission: u16,
    pub default_owner: String,
    pub default_group: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            ls_limit: 1000,
            delete_settle: Duration::from_millis(100),
            default_replication: 3,
            default_block_size: 128 << 20,
            root_permission: 0o755,
            default_owner: "rowfs".to_string(),
            default_group: "supergroup".to_string(),
        }
    }
}
