//! Input sanitization.
//!
//! Strips tag-like markup and the characters `< > " ' /` from untrusted
//! strings, then trims surrounding whitespace. Pure and idempotent.

use std::sync::LazyLock;

use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("tag pattern is valid"));

static SPECIAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>"'/]"#).expect("special character pattern is valid"));

/// Sanitize a single untrusted string.
///
/// Empty or whitespace-only input yields an empty string.
pub fn sanitize_input(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let without_tags = TAG_PATTERN.replace_all(input, "");
    let without_specials = SPECIAL_CHARS.replace_all(&without_tags, "");
    without_specials.trim().to_string()
}
