//! Log sanitization utilities
//!
//! Keeps API keys out of logs and bounds the size of logged XML bodies.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret left visible by [`mask_secret`].
const SECRET_VISIBLE_PREFIX: usize = 4;

/// Shorten an XML body for logging, keeping the first `TRUNCATE_LIMIT` bytes
/// (cut on a char boundary) and noting the full size.
pub fn truncate_for_log(body: &str) -> String {
    if body.len() <= TRUNCATE_LIMIT {
        return body.to_string();
    }
    let cut = body
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= TRUNCATE_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &body[..cut], body.len())
}

/// Mask a secret (API key) for logging: `abcd****`.
///
/// Short secrets are masked entirely.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= SECRET_VISIBLE_PREFIX * 2 {
        return "*".repeat(8);
    }
    let prefix: String = secret.chars().take(SECRET_VISIBLE_PREFIX).collect();
    format!("{prefix}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_unchanged() {
        let s = "hello world";
        assert_eq!(truncate_for_log(s), s);
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(TRUNCATE_LIMIT);
        assert_eq!(truncate_for_log(&s), s);
    }

    #[test]
    fn over_limit_truncated() {
        let s = "a".repeat(TRUNCATE_LIMIT + 100);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
        assert!(result.contains(&format!("{} bytes]", TRUNCATE_LIMIT + 100)));
        assert!(result.len() < s.len());
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "é".repeat(200);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
    }

    #[test]
    fn secret_keeps_prefix_only() {
        assert_eq!(mask_secret("abcdefghijklmnop"), "abcd****");
    }

    #[test]
    fn short_secret_fully_masked() {
        assert_eq!(mask_secret("abc"), "********");
        assert_eq!(mask_secret(""), "********");
    }
}
