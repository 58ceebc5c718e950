//! rowfs-kv: the store contract consumed by the namespace core.
//!
//! The backing store is a flat, lexicographically sorted key-value store.
//! It guarantees atomicity for a single-key put or delete and ordered
//! range scans, and nothing more: no multi-key transactions, no locks.
//! Everything the namespace layer builds (staged rename, level-by-level
//! recursive delete) is designed around exactly this contract.

mod store;

pub use store::*;

/// Return the key immediately after the given key in lexicographic order.
///
/// Appends a zero byte, making the result strictly greater than the input
/// and smaller than any other key with the input as a proper prefix.
pub fn key_after(key: &[u8]) -> Vec<u8> {
    let mut result = key.to_vec();
    result.push(0);
    result
}

/// Return the exclusive end key for scanning all keys with the given prefix.
///
/// Increments the last non-0xFF byte of the prefix. If the prefix is all
/// 0xFF bytes (or empty), returns an empty vec meaning "no upper bound".
pub fn prefix_scan_end_key(prefix: &[u8]) -> Vec<u8> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.last_mut() {
        if *last < 0xFF {
            *last += 1;
            return end;
        }
        end.pop();
    }
    end
}
