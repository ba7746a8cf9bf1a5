//! HTTP cache control module
//!
//! Provides `ETag` generation and conditional request handling for static
//! asset responses.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate an `ETag` from content bytes
///
/// The tag combines content length and a content hash so that files of the
/// same length still get distinct tags, e.g., `"1a2b-c3d4e5"`.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let digest = hasher.finish();
    format!("\"{:x}-{digest:x}\"", content.len())
}

/// Check if the client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single tag, a comma-separated list of tags, and the `*`
/// wildcard. Returns true if matched (the response should be 304).
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .any(|candidate| candidate.trim() == etag || candidate.trim() == "*")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_shape() {
        let etag = generate_etag(b"body { margin: 0 }");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert!(etag.contains('-'));
    }

    #[test]
    fn test_etag_stable_for_same_content() {
        assert_eq!(generate_etag(b"same bytes"), generate_etag(b"same bytes"));
    }

    #[test]
    fn test_etag_differs_for_different_content() {
        assert_ne!(generate_etag(b"content a"), generate_etag(b"content b"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = generate_etag(b"asset");
        assert!(check_etag_match(Some(&etag), &etag));
        assert!(check_etag_match(Some(&format!("\"other\", {etag}")), &etag));
        assert!(check_etag_match(Some("*"), &etag));
        assert!(!check_etag_match(Some("\"stale\""), &etag));
        assert!(!check_etag_match(None, &etag));
    }
}
