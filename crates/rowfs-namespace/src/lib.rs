//! rowfs-namespace: a hierarchical filesystem namespace whose authoritative
//! storage is a flat, sorted key-value store.
//!
//! The store offers atomicity within a single key plus ordered range scans,
//! and nothing else. Tree-shaped operations (listing, recursive delete,
//! rename) are built as explicit multi-step protocols that tolerate
//! interruption: partial progress is durable, and re-invoking the same
//! operation converges to a consistent result.
//!
//! Layering, leaves first:
//! - [`row_key`]: order-preserving path-to-key codec defining child ranges.
//! - [`inode`]: one filesystem entry, (de)serialized to a single store row.
//! - [`node_manager`]: atomic per-row CRUD plus scan-based tree traversal.
//! - [`ops`] / [`Namespace`]: the filesystem operations themselves.

pub mod block_agent;
pub mod config;
pub mod inode;
mod namespace;
pub mod node_manager;
mod ops;
pub mod paths;
pub mod row_key;

pub use block_agent::{BlockAction, BlockAgent, LocalBlockAgent, NoopBlockAgent};
pub use config::NamespaceConfig;
pub use inode::{Block, BlockLocation, FileState, INode, RenameState};
pub use namespace::{
    BlockLocations, ContentSummary, CreateFlags, Listing, Namespace, ServerDefaults,
};
pub use node_manager::NodeManager;
pub use row_key::RowKeyCodec;
