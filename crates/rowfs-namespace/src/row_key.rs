//! Row-key codec: order-preserving mapping between paths and store keys.
//!
//! A key is the path's depth as a big-endian `u16` followed by the raw path
//! bytes. Sorting depth-first groups every directory's children into one
//! contiguous key range: all children of `p` (depth `d`) sit at depth `d+1`
//! under the byte prefix `p/`, with nothing from sibling subtrees in
//! between. The codec is a value constructed at initialization and passed to
//! whoever needs key translation; it is never global state.

use rowfs_kv::{key_after, prefix_scan_end_key};
use rowfs_types::status_code::StatusCode;
use rowfs_types::{make_error_msg, Result};

use crate::paths;

#[derive(Debug, Clone, Copy, Default)]
pub struct RowKeyCodec;

impl RowKeyCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encode a path into its row key: `[depth as u16 BE] ++ path bytes`.
    pub fn encode(&self, path: &str) -> Vec<u8> {
        let depth = paths::depth(path);
        let mut key = Vec::with_capacity(2 + path.len());
        key.extend_from_slice(&depth.to_be_bytes());
        key.extend_from_slice(path.as_bytes());
        key
    }

    /// Decode a row key back into its path, validating the depth prefix.
    pub fn decode(&self, key: &[u8]) -> Result<String> {
        if key.len() < 3 {
            return make_error_msg(
                StatusCode::DATA_CORRUPTION,
                format!("row key too short: {} bytes", key.len()),
            );
        }
        let depth = u16::from_be_bytes([key[0], key[1]]);
        let path = match std::str::from_utf8(&key[2..]) {
            Ok(path) => path,
            Err(_) => return make_error_msg(StatusCode::DATA_CORRUPTION, "row key is not utf-8"),
        };
        if paths::depth(path) != depth {
            return make_error_msg(
                StatusCode::DATA_CORRUPTION,
                format!("depth prefix {depth} does not match path {path:?}"),
            );
        }
        Ok(path.to_string())
    }

    /// Byte prefix shared by exactly the direct children of `parent`.
    fn child_prefix(&self, parent: &str) -> Vec<u8> {
        let depth = paths::depth(parent) + 1;
        let mut prefix = Vec::with_capacity(3 + parent.len());
        prefix.extend_from_slice(&depth.to_be_bytes());
        prefix.extend_from_slice(parent.as_bytes());
        if parent != paths::ROOT {
            prefix.push(b'/');
        }
        prefix
    }

    /// Inclusive start of the child range of `parent`. A non-empty
    /// `start_after` (a child name) narrows the range to children strictly
    /// after it, for paginated listing.
    pub fn child_range_start(&self, parent: &str, start_after: &str) -> Vec<u8> {
        if start_after.is_empty() {
            self.child_prefix(parent)
        } else {
            key_after(&self.encode(&paths::join(parent, start_after)))
        }
    }

    /// Exclusive end of the child range of `parent`.
    pub fn child_range_end(&self, parent: &str) -> Vec<u8> {
        prefix_scan_end_key(&self.child_prefix(parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let codec = RowKeyCodec::new();
        assert_eq!(codec.encode("/"), b"\x00\x00/");
        assert_eq!(codec.encode("/a"), b"\x00\x01/a");
        assert_eq!(codec.encode("/a/b"), b"\x00\x02/a/b");
    }

    #[test]
    fn test_decode_round_trip() {
        let codec = RowKeyCodec::new();
        for path in ["/", "/a", "/a/b/c", "/dir with space/f.txt"] {
            assert_eq!(codec.decode(&codec.encode(path)).unwrap(), path);
        }
    }

    #[test]
    fn test_decode_rejects_bad_keys() {
        let codec = RowKeyCodec::new();
        assert!(codec.decode(b"\x00").is_err());
        // Depth prefix disagrees with the embedded path.
        assert!(codec.decode(b"\x00\x05/a").is_err());
        assert!(codec.decode(b"\x00\x01\xff\xfe").is_err());
    }

    #[test]
    fn test_child_range_containment() {
        let codec = RowKeyCodec::new();
        let start = codec.child_range_start("/a", "");
        let end = codec.child_range_end("/a");

        let in_range = |p: &str| {
            let k = codec.encode(p);
            k.as_slice() >= start.as_slice() && k.as_slice() < end.as_slice()
        };

        assert!(in_range("/a/x"));
        assert!(in_range("/a/z"));

        // Siblings, grandchildren, and the parent itself are all excluded.
        assert!(!in_range("/a"));
        assert!(!in_range("/ab"));
        assert!(!in_range("/b/x"));
        assert!(!in_range("/a/x/y"));
    }

    #[test]
    fn test_child_range_of_root() {
        let codec = RowKeyCodec::new();
        let start = codec.child_range_start("/", "");
        let end = codec.child_range_end("/");

        let key = codec.encode("/a");
        assert!(key.as_slice() >= start.as_slice() && key.as_slice() < end.as_slice());
        let deep = codec.encode("/a/b");
        assert!(!(deep.as_slice() >= start.as_slice() && deep.as_slice() < end.as_slice()));
    }

    #[test]
    fn test_child_range_cursor_excludes_cursor() {
        let codec = RowKeyCodec::new();
        let start = codec.child_range_start("/a", "m");
        assert!(codec.encode("/a/m").as_slice() < start.as_slice());
        assert!(codec.encode("/a/n").as_slice() >= start.as_slice());
    }

    #[test]
    fn test_children_sort_lexicographically() {
        let codec = RowKeyCodec::new();
        assert!(codec.encode("/a/apple") < codec.encode("/a/banana"));
        assert!(codec.encode("/a/banana") < codec.encode("/a/cherry"));
    }
}
