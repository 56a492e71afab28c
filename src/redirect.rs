//! Open-redirect guard.
//!
//! Externally supplied destinations are only honored when they are relative
//! in-application paths. Anything else (absolute URLs, protocol-relative
//! `//host` forms, backslash tricks) is silently replaced by the fallback.

/// Check whether a destination is a safe in-application relative path.
pub fn is_safe_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

/// Sanitize an externally supplied destination.
///
/// Returns the candidate when it is a safe relative path, the fallback
/// otherwise. Never fails: an unsafe destination is a correction, not an
/// error.
pub fn sanitize_redirect(candidate: Option<&str>, fallback: &str) -> String {
    match candidate {
        Some(path) if is_safe_path(path) => path.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_paths_pass_through() {
        assert_eq!(sanitize_redirect(Some("/app"), "/"), "/app");
        assert_eq!(
            sanitize_redirect(Some("/profile/settings?tab=2"), "/"),
            "/profile/settings?tab=2"
        );
        assert_eq!(sanitize_redirect(Some("/"), "/app"), "/");
    }

    #[test]
    fn test_unsafe_destinations_replaced() {
        assert_eq!(sanitize_redirect(Some("https://evil.test"), "/app"), "/app");
        assert_eq!(sanitize_redirect(Some("//evil.test/path"), "/app"), "/app");
        assert_eq!(sanitize_redirect(Some("/\\evil.test"), "/app"), "/app");
        assert_eq!(sanitize_redirect(Some("javascript:alert(1)"), "/app"), "/app");
        assert_eq!(sanitize_redirect(Some("app"), "/app"), "/app");
        assert_eq!(sanitize_redirect(Some(""), "/app"), "/app");
    }

    #[test]
    fn test_absent_destination_falls_back() {
        assert_eq!(sanitize_redirect(None, "/app"), "/app");
    }
}
