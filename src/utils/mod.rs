//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

use regex::Regex;
use std::sync::OnceLock;

/// Longest title, in characters, sent to the booking form
pub const MAX_TITLE_CHARS: usize = 200;

/// Sanitize a guide title before it is typed into the booking form
///
/// Strips characters that break the form's markup and caps the length.
pub fn sanitize_title(title: &str) -> String {
    static MARKUP_CHARS: OnceLock<Regex> = OnceLock::new();

    let re = MARKUP_CHARS.get_or_init(|| Regex::new(r#"[<>'"]"#).expect("Invalid regex pattern"));

    re.replace_all(title, "")
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect()
}

/// Format a byte size as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return String::from("0 B");
    }

    let base: f64 = 1024.0;
    let exponent = (bytes as f64).log(base).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);

    let value = bytes as f64 / base.powi(exponent as i32);

    format!("{value:.2} {}", UNITS[exponent])
}
