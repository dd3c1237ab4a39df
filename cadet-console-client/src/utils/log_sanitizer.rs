//! Log sanitization
//!
//! Response bodies can hold whole pages of records and request headers carry
//! the bearer token. Neither should reach debug logs in full.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Visible prefix of a masked token.
const TOKEN_VISIBLE_PREFIX: usize = 4;

/// Largest char boundary not after `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a body for logging.
///
/// Bodies within the limit are returned unchanged; longer ones are cut on a
/// char boundary and suffixed with the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a bearer token, keeping a short prefix so operators can tell tokens apart.
pub fn mask_token(token: &str) -> String {
    let cut = floor_char_boundary(token, TOKEN_VISIBLE_PREFIX);
    if cut >= token.len() {
        "***".to_string()
    } else {
        format!("{}*** ({} bytes)", &token[..cut], token.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_unchanged() {
        let s = r#"{"detail":"db down"}"#;
        assert_eq!(truncate_for_log(s), s);
    }

    #[test]
    fn body_exactly_at_limit_unchanged() {
        let s = "a".repeat(TRUNCATE_LIMIT);
        assert_eq!(truncate_for_log(&s), s);
    }

    #[test]
    fn long_body_truncated_with_length() {
        let s = "a".repeat(TRUNCATE_LIMIT + 100);
        let result = truncate_for_log(&s);
        assert!(result.ends_with(&format!("[truncated, total {} bytes]", TRUNCATE_LIMIT + 100)));
        assert!(result.len() < s.len());
    }

    #[test]
    fn multibyte_body_truncated_on_char_boundary() {
        // Devanagari letters are 3 bytes each
        let s = "क".repeat(200);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
    }

    #[test]
    fn token_is_masked() {
        assert_eq!(mask_token("eyJhbGciOi"), "eyJh*** (10 bytes)");
    }

    #[test]
    fn very_short_token_fully_hidden() {
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token("abcd"), "***");
    }
}
