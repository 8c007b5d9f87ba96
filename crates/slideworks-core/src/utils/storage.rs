// Object-storage path helpers.
//
// Upload paths are namespaced under the owning user: `user_<id>/...` (the
// uploader's format) or a bare `<id>/...` prefix. The prefix check doubles
// as an authorization check: a request may only reference paths under the
// caller's own namespace.

/// Derive a display filename from the trailing path segment.
pub fn filename_from_path(path: &str) -> String {
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("file")
        .to_string()
}

/// Whether `path` lives in the storage namespace owned by `user_id`.
pub fn is_user_scoped(path: &str, user_id: &str) -> bool {
    path.starts_with(&format!("user_{user_id}")) || path.starts_with(user_id)
}
