//! Entity model: one filesystem entry, persisted as a single store row.
//!
//! Every write serializes the full attribute set; there are no partial row
//! patches. Directories never carry block, location, or file-state columns.

use serde::{Deserialize, Serialize};

use rowfs_types::status_code::StatusCode;
use rowfs_types::{make_error_msg, Result};

use crate::block_agent::BlockAction;
use crate::paths;

/// Quota sentinel: clear the quota.
pub const QUOTA_RESET: i64 = -1;
/// Quota sentinel: leave the quota unchanged.
pub const QUOTA_DONT_SET: i64 = i64::MAX;

/// Sentinel for `set_times`: leave the timestamp unchanged.
pub const TIME_DONT_SET: i64 = -1;

/// Execute bits, stripped from file permissions.
const FILE_EXEC_BITS: u16 = 0o111;

/// Lifecycle state of a file. Directories have no lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileState {
    UnderConstruction,
    Closed,
    Deleted,
}

/// One block of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: u64,
    pub generation: u64,
    pub num_bytes: u64,
}

/// One replica location of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLocation {
    pub storage_id: String,
    pub host: String,
}

/// Pending-rename marker. `flag` is set only between rename stages;
/// `src_key` back-references the original row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameState {
    pub flag: bool,
    pub src_key: Option<Vec<u8>>,
}

impl RenameState {
    pub fn pending(src_key: Vec<u8>) -> Self {
        Self {
            flag: true,
            src_key: Some(src_key),
        }
    }
}

/// One filesystem entry's complete metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct INode {
    pub path: String,
    pub is_dir: bool,
    pub owner: String,
    pub group: String,
    pub permission: u16,
    pub length: u64,
    pub replication: u16,
    pub block_size: u64,
    pub mtime: i64,
    pub atime: i64,
    pub ns_quota: i64,
    pub ds_quota: i64,
    pub blocks: Vec<Block>,
    pub locations: Vec<Vec<BlockLocation>>,
    pub file_state: Option<FileState>,
    pub rename_state: RenameState,
    pub symlink: Option<Vec<u8>>,
}

/// The serialized row schema. Kept separate from `INode` so the row layout
/// is explicit and file-only columns vanish from directory rows.
#[derive(Serialize, Deserialize)]
struct RowData {
    file_name: String,
    directory: bool,
    owner: String,
    group: String,
    permission: u16,
    length: u64,
    replication: u16,
    block_size: u64,
    mtime: i64,
    atime: i64,
    ns_quota: i64,
    ds_quota: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blocks: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locations: Option<Vec<Vec<BlockLocation>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_state: Option<FileState>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    rename_flag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rename_src: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    symlink: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block_action: Option<BlockAction>,
}

impl INode {
    pub fn new_file(
        path: impl Into<String>,
        owner: impl Into<String>,
        group: impl Into<String>,
        permission: u16,
        replication: u16,
        block_size: u64,
        now: i64,
    ) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            owner: owner.into(),
            group: group.into(),
            permission: permission & !FILE_EXEC_BITS,
            length: 0,
            replication,
            block_size,
            mtime: now,
            atime: now,
            ns_quota: QUOTA_RESET,
            ds_quota: QUOTA_RESET,
            blocks: Vec::new(),
            locations: Vec::new(),
            file_state: Some(FileState::UnderConstruction),
            rename_state: RenameState::default(),
            symlink: None,
        }
    }

    pub fn new_directory(
        path: impl Into<String>,
        owner: impl Into<String>,
        group: impl Into<String>,
        permission: u16,
        now: i64,
    ) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            owner: owner.into(),
            group: group.into(),
            permission,
            length: 0,
            replication: 0,
            block_size: 0,
            mtime: now,
            atime: now,
            ns_quota: QUOTA_RESET,
            ds_quota: QUOTA_RESET,
            blocks: Vec::new(),
            locations: Vec::new(),
            file_state: None,
            rename_state: RenameState::default(),
            symlink: None,
        }
    }

    pub fn file_name(&self) -> &str {
        paths::file_name(&self.path)
    }

    pub fn is_under_construction(&self) -> bool {
        self.file_state == Some(FileState::UnderConstruction)
    }

    pub fn has_rename_flag(&self) -> bool {
        self.rename_state.flag
    }

    /// Apply new permission bits; files never carry execute bits.
    pub fn set_permission(&mut self, permission: u16) {
        self.permission = if self.is_dir {
            permission
        } else {
            permission & !FILE_EXEC_BITS
        };
    }

    /// Update timestamps, skipping any set to [`TIME_DONT_SET`].
    pub fn set_times(&mut self, mtime: i64, atime: i64) {
        if mtime != TIME_DONT_SET {
            self.mtime = mtime;
        }
        if atime != TIME_DONT_SET {
            self.atime = atime;
        }
    }

    /// Replace the last block if it matches `block` by id. A stale block
    /// (no id match) is ignored.
    pub fn set_last_block(&mut self, block: Block) {
        if let Some(last) = self.blocks.last_mut() {
            if last.id == block.id {
                *last = block;
            }
        }
    }

    /// Serialize into a full row, optionally carrying a block-action tag.
    pub fn pack_with_action(&self, action: Option<BlockAction>) -> Result<Vec<u8>> {
        let row = RowData {
            file_name: self.file_name().to_string(),
            directory: self.is_dir,
            owner: self.owner.clone(),
            group: self.group.clone(),
            permission: self.permission,
            length: self.length,
            replication: self.replication,
            block_size: self.block_size,
            mtime: self.mtime,
            atime: self.atime,
            ns_quota: self.ns_quota,
            ds_quota: self.ds_quota,
            blocks: (!self.is_dir).then(|| self.blocks.clone()),
            locations: (!self.is_dir).then(|| self.locations.clone()),
            file_state: if self.is_dir { None } else { self.file_state },
            rename_flag: self.rename_state.flag,
            rename_src: self.rename_state.src_key.clone(),
            symlink: self.symlink.clone(),
            block_action: action,
        };
        serde_json::to_vec(&row).map_err(|err| {
            rowfs_types::Status::with_message(
                StatusCode::DATA_CORRUPTION,
                format!("serialize row for {:?}: {err}", self.path),
            )
        })
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        self.pack_with_action(None)
    }

    /// Deserialize a row fetched for `path`.
    pub fn unpack(path: String, bytes: &[u8]) -> Result<INode> {
        let row: RowData = match serde_json::from_slice(bytes) {
            Ok(row) => row,
            Err(err) => {
                return make_error_msg(
                    StatusCode::DATA_CORRUPTION,
                    format!("deserialize row for {path:?}: {err}"),
                )
            }
        };
        let blocks = row.blocks.unwrap_or_default();
        let locations = row.locations.unwrap_or_default();
        if blocks.len() != locations.len() {
            return make_error_msg(
                StatusCode::DATA_CORRUPTION,
                format!(
                    "row for {path:?} has {} blocks but {} location sets",
                    blocks.len(),
                    locations.len()
                ),
            );
        }
        Ok(INode {
            path,
            is_dir: row.directory,
            owner: row.owner,
            group: row.group,
            permission: row.permission,
            length: row.length,
            replication: row.replication,
            block_size: row.block_size,
            mtime: row.mtime,
            atime: row.atime,
            ns_quota: row.ns_quota,
            ds_quota: row.ds_quota,
            blocks,
            locations,
            file_state: row.file_state,
            rename_state: RenameState {
                flag: row.rename_flag,
                src_key: row.rename_src,
            },
            symlink: row.symlink,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> INode {
        let mut node = INode::new_file("/a/f", "alice", "staff", 0o644, 3, 1 << 20, 1000);
        node.blocks = vec![Block {
            id: 7,
            generation: 1,
            num_bytes: 42,
        }];
        node.locations = vec![vec![BlockLocation {
            storage_id: "s1".into(),
            host: "h1".into(),
        }]];
        node.length = 42;
        node
    }

    #[test]
    fn test_pack_unpack_round_trip_file() {
        let node = sample_file();
        let bytes = node.pack().unwrap();
        let back = INode::unpack("/a/f".to_string(), &bytes).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_pack_unpack_round_trip_directory() {
        let node = INode::new_directory("/a", "alice", "staff", 0o755, 1000);
        let back = INode::unpack("/a".to_string(), &node.pack().unwrap()).unwrap();
        assert_eq!(back, node);
        assert!(back.blocks.is_empty());
        assert_eq!(back.file_state, None);
    }

    #[test]
    fn test_directory_row_omits_file_columns() {
        let node = INode::new_directory("/a", "alice", "staff", 0o755, 1000);
        let json = String::from_utf8(node.pack().unwrap()).unwrap();
        assert!(!json.contains("blocks"));
        assert!(!json.contains("file_state"));
        assert!(!json.contains("rename_flag"));
    }

    #[test]
    fn test_unpack_rejects_block_location_mismatch() {
        let mut node = sample_file();
        node.locations.push(Vec::new());
        let bytes = node.pack().unwrap();
        assert!(INode::unpack("/a/f".to_string(), &bytes).is_err());
    }

    #[test]
    fn test_new_file_strips_exec_bits() {
        let node = INode::new_file("/f", "a", "g", 0o777, 1, 1, 0);
        assert_eq!(node.permission, 0o666);
    }

    #[test]
    fn test_set_permission() {
        let mut file = INode::new_file("/f", "a", "g", 0o644, 1, 1, 0);
        file.set_permission(0o755);
        assert_eq!(file.permission, 0o644);

        let mut dir = INode::new_directory("/d", "a", "g", 0o700, 0);
        dir.set_permission(0o755);
        assert_eq!(dir.permission, 0o755);
    }

    #[test]
    fn test_set_times_sentinel() {
        let mut node = INode::new_file("/f", "a", "g", 0o644, 1, 1, 100);
        node.set_times(TIME_DONT_SET, 200);
        assert_eq!(node.mtime, 100);
        assert_eq!(node.atime, 200);
    }

    #[test]
    fn test_set_last_block() {
        let mut node = sample_file();
        node.set_last_block(Block {
            id: 7,
            generation: 2,
            num_bytes: 99,
        });
        assert_eq!(node.blocks[0].num_bytes, 99);

        // An unrelated id leaves the list untouched.
        node.set_last_block(Block {
            id: 12,
            generation: 1,
            num_bytes: 1,
        });
        assert_eq!(node.blocks.len(), 1);
        assert_eq!(node.blocks[0].num_bytes, 99);
    }

    #[test]
    fn test_rename_marker_round_trip() {
        let mut node = sample_file();
        node.rename_state = RenameState::pending(b"\x00\x02/a/f".to_vec());
        let back = INode::unpack("/b/f".to_string(), &node.pack().unwrap()).unwrap();
        assert!(back.has_rename_flag());
        assert_eq!(back.rename_state.src_key.as_deref(), Some(&b"\x00\x02/a/f"[..]));
    }
}
