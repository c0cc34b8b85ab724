// src/utils/url.rs

//! URL helpers for profile pages and post permalinks.

use url::Url;

/// Build the profile page URL for a handle.
///
/// # Examples
/// ```
/// use postwatch::utils::url::profile_url;
///
/// assert_eq!(
///     profile_url("https://twitter.com", "alice"),
///     "https://twitter.com/alice"
/// );
/// ```
pub fn profile_url(base: &str, handle: &str) -> String {
    format!("{}/{handle}", base.trim_end_matches('/'))
}

/// Build the canonical permalink for a post.
///
/// # Examples
/// ```
/// use postwatch::utils::url::status_url;
///
/// assert_eq!(
///     status_url("https://twitter.com/", "alice", "123"),
///     "https://twitter.com/alice/status/123"
/// );
/// ```
pub fn status_url(base: &str, handle: &str, post_id: &str) -> String {
    format!("{}/{handle}/status/{post_id}", base.trim_end_matches('/'))
}

/// Resolve a potentially relative href against a base URL.
pub fn resolve(base: &str, href: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Extract the numeric status id from a post permalink.
///
/// Understands `/alice/status/123` in both relative and absolute form and
/// falls back to the last all-digit path segment for unexpected layouts.
pub fn extract_status_id(href: &str) -> Option<String> {
    let path = match Url::parse(href) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => href.split(['?', '#']).next().unwrap_or(href).to_string(),
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut iter = segments.iter();
    while let Some(segment) = iter.next() {
        if matches!(*segment, "status" | "statuses") {
            if let Some(next) = iter.next() {
                let digits: String =
                    next.chars().take_while(|c| c.is_ascii_digit()).collect();
                if !digits.is_empty() {
                    return Some(digits);
                }
            }
        }
    }

    segments
        .iter()
        .rev()
        .find(|s| s.chars().all(|c| c.is_ascii_digit()))
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_trims_slash() {
        assert_eq!(
            profile_url("https://twitter.com/", "alice"),
            "https://twitter.com/alice"
        );
    }

    #[test]
    fn test_resolve_relative_href() {
        assert_eq!(
            resolve("https://twitter.com/alice", "/alice/status/123"),
            "https://twitter.com/alice/status/123"
        );
    }

    #[test]
    fn test_resolve_absolute_href() {
        assert_eq!(
            resolve("https://twitter.com", "https://other.com/page"),
            "https://other.com/page"
        );
    }

    #[test]
    fn test_extract_status_id_relative() {
        assert_eq!(
            extract_status_id("/alice/status/123456789"),
            Some("123456789".to_string())
        );
    }

    #[test]
    fn test_extract_status_id_absolute_with_query() {
        assert_eq!(
            extract_status_id("https://twitter.com/alice/status/42?s=20"),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_extract_status_id_statuses_variant() {
        assert_eq!(
            extract_status_id("/alice/statuses/777"),
            Some("777".to_string())
        );
    }

    #[test]
    fn test_extract_status_id_fallback_digits() {
        assert_eq!(extract_status_id("/posts/9001"), Some("9001".to_string()));
        assert_eq!(extract_status_id("/alice/with_replies"), None);
    }
}
