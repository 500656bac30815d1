//! Path normalization ahead of dispatch.
//!
//! The router matches exact, normalized paths. This module turns a request
//! path into that form: mount prefix stripped, trailing slashes trimmed
//! except for root.

/// Path relative to `mount`, normalized for dispatch.
///
/// Returns `None` when `path` lies outside the mount. The prefix is only
/// stripped at a segment boundary, so `/apitest` is not under `/api`.
/// An empty `mount` mounts at the root.
pub fn mount_relative(path: &str, mount: &str) -> Option<String> {
    let rest = if mount.is_empty() {
        path
    } else {
        let rest = path.strip_prefix(mount)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        rest
    };

    let trimmed = rest.trim_end_matches('/');
    if trimmed.is_empty() {
        Some("/".to_string())
    } else {
        Some(trimmed.to_string())
    }
}
