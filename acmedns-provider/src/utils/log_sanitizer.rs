//! Log sanitization utilities
//!
//! Keeps account passwords and long response bodies out of debug/error logs.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret left visible.
const SECRET_VISIBLE_CHARS: usize = 4;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
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

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit, otherwise the first
/// `TRUNCATE_LIMIT` bytes with a suffix indicating the total length.
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

/// Mask a secret, keeping only a short prefix.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= SECRET_VISIBLE_CHARS * 2 {
        return "*".repeat(secret.chars().count());
    }
    let prefix: String = secret.chars().take(SECRET_VISIBLE_CHARS).collect();
    format!("{prefix}****")
}

/// Replace the value of every `"password"` field in a JSON body with a mask.
///
/// Non-JSON input is only truncated.
pub fn sanitize_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(mut map)) => {
            if let Some(serde_json::Value::String(pw)) = map.get_mut("password") {
                *pw = mask_secret(pw);
            }
            truncate_for_log(&serde_json::Value::Object(map).to_string())
        }
        _ => truncate_for_log(body),
    }
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
    fn over_limit_truncated() {
        let s = "a".repeat(TRUNCATE_LIMIT + 100);
        let result = truncate_for_log(&s);
        assert!(result.contains(&format!("{} bytes]", TRUNCATE_LIMIT + 100)));
        assert!(result.len() < s.len());
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "ü".repeat(200);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
    }

    #[test]
    fn secrets_masked() {
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret("htB9mR9DYgcu9bX_afHF62erXaH2TS7bg9KW3F7Z"), "htB9****");
    }

    #[test]
    fn password_field_masked_in_body() {
        let body = r#"{"username":"u","password":"htB9mR9DYgcu9bX_afHF62erXaH2TS7bg9KW3F7Z"}"#;
        let out = sanitize_body(body);
        assert!(out.contains("htB9****"));
        assert!(!out.contains("afHF62"));
        assert_eq!(sanitize_body("not json"), "not json");
    }
}
