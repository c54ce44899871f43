//! Indian mobile number extraction.
//!
//! Detail pages carry contact numbers in free text, written in a handful of
//! shapes: bare (`9876543210`), trunk-prefixed (`09876543210`) or with the
//! country code (`+91 9876543210`, `+91-9876543210`). This module finds those
//! candidates and normalizes each one to its 10-digit local form.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

/// Candidate pattern: optional `+91` (plus separator) or `0`, then a mobile
/// number starting with 6, 7, 8 or 9.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\+91[\-\s]?|0)?[6-9][0-9]{9}").expect("phone pattern is valid"));

/// Length of a normalized local mobile number.
pub const LOCAL_LEN: usize = 10;

/// Prefixes that may precede the local part once separators are stripped.
const KNOWN_PREFIXES: [&str; 2] = ["0", "91"];

/// Extract the distinct mobile numbers found in `text`.
///
/// Numbers are returned in the order they first appear; duplicates collapse.
/// Text without any number yields an empty vector.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_phone_numbers("+91 9876543210"), vec!["9876543210"]);
/// assert!(extract_phone_numbers("no numbers here").is_empty());
/// ```
#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn extract_phone_numbers(text: &str) -> Vec<String> {
    let numbers: Vec<String> = PHONE_RE
        .find_iter(text)
        .filter_map(|m| normalize(m.as_str()))
        .unique()
        .collect();

    debug!(count = numbers.len(), "Extracted phone numbers");
    numbers
}

/// Reduce a matched candidate to its 10-digit local form.
///
/// Longer digit strings are accepted only when the leading digits are a
/// trunk (`0`) or country (`91`) prefix.
fn normalize(candidate: &str) -> Option<String> {
    let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() < LOCAL_LEN {
        return None;
    }
    if digits.len() == LOCAL_LEN {
        return Some(digits);
    }

    let (prefix, local) = digits.split_at(digits.len() - LOCAL_LEN);
    KNOWN_PREFIXES
        .contains(&prefix)
        .then(|| local.to_string())
}
