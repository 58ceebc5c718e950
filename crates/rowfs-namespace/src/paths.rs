//! Path algebra for absolute, normalized filesystem paths.
//!
//! A valid path is `/` or `/seg(/seg)*` where every segment is non-empty and
//! neither `.` nor `..`. All functions here assume validated input unless
//! they validate themselves.

use rowfs_types::status_code::StatusCode;
use rowfs_types::{make_error_msg, Result};

pub const ROOT: &str = "/";

/// Check that a path is absolute and normalized.
pub fn validate(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return make_error_msg(StatusCode::INVALID_ARG, format!("path not absolute: {path:?}"));
    }
    if path == ROOT {
        return Ok(());
    }
    if path.ends_with('/') {
        return make_error_msg(StatusCode::INVALID_ARG, format!("trailing slash: {path:?}"));
    }
    for segment in path[1..].split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return make_error_msg(
                StatusCode::INVALID_ARG,
                format!("invalid segment {segment:?} in {path:?}"),
            );
        }
    }
    Ok(())
}

/// Number of path components; `depth("/") == 0`, `depth("/a/b") == 2`.
pub fn depth(path: &str) -> u16 {
    if path == ROOT {
        0
    } else {
        path.matches('/').count() as u16
    }
}

/// Parent path, or `None` for the root.
pub fn parent_of(path: &str) -> Option<String> {
    if path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT.to_string()),
        Some(pos) => Some(path[..pos].to_string()),
        None => None,
    }
}

/// Last path component; empty for the root.
pub fn file_name(path: &str) -> &str {
    if path == ROOT {
        ""
    } else {
        path.rsplit('/').next().unwrap_or("")
    }
}

pub fn join(parent: &str, name: &str) -> String {
    if parent == ROOT {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// True iff `path` is a strict descendant of `ancestor`.
pub fn is_descendant_of(path: &str, ancestor: &str) -> bool {
    if ancestor == ROOT {
        return path != ROOT;
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

/// Rewrite the `src` prefix of `path` (which must be `src` or a descendant
/// of it) to `dst`.
pub fn rebase(path: &str, src: &str, dst: &str) -> String {
    if path == src {
        dst.to_string()
    } else {
        format!("{dst}{}", &path[src.len()..])
    }
}
