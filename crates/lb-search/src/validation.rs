//! Input validation and clamping. Runs before any network call.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{SearchError, SearchResult};

/// Hard upper bound on a single search page.
pub const MAX_SEARCH_SIZE: i64 = 10_000;

static INDEX_PATTERN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-_.*]+$").expect("valid regex"));

static INVALID_CHAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\-_.*]").expect("valid regex"));

/// Clamp `value` into `[min, max]`. Never fails.
pub fn clamp(value: i64, min: i64, max: i64) -> i64 {
    value.max(min).min(max)
}

/// Reject empty patterns, reserved `_` prefixes, and characters outside
/// `[A-Za-z0-9-_.*]`.
pub fn validate_index_pattern(pattern: &str) -> SearchResult<()> {
    if pattern.is_empty() {
        return Err(SearchError::validation(
            "index_pattern",
            "index pattern cannot be empty",
        ));
    }
    if pattern.starts_with('_') {
        return Err(SearchError::validation(
            "index_pattern",
            format!("'{pattern}' starts with the reserved prefix '_'"),
        ));
    }
    if !INDEX_PATTERN_RE.is_match(pattern) {
        let bad: Vec<&str> = INVALID_CHAR_RE
            .find_iter(pattern)
            .map(|m| m.as_str())
            .collect();
        return Err(SearchError::validation(
            "index_pattern",
            format!("invalid characters in '{pattern}': {bad:?}"),
        ));
    }
    Ok(())
}

/// Clamp a page size into `[1, max]`.
pub fn validate_size(size: i64, max: i64) -> usize {
    clamp(size, 1, max.max(1)) as usize
}

/// Clamp a timeframe (minutes) into `[1, max]`.
pub fn validate_timeframe(minutes: i64, max: i64) -> i64 {
    clamp(minutes, 1, max.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(0, 1, 100), 1);
        assert_eq!(clamp(-5, 1, 100), 1);
        assert_eq!(clamp(50, 1, 100), 50);
        assert_eq!(clamp(101, 1, 100), 100);
    }

    #[test]
    fn clamp_idempotent() {
        for s in [-10_i64, 0, 1, 7, 100, 101, 1_000_000] {
            let once = clamp(s, 1, 100);
            assert_eq!(clamp(once, 1, 100), once);
        }
    }

    #[test]
    fn size_and_timeframe() {
        assert_eq!(validate_size(0, 1000), 1);
        assert_eq!(validate_size(50_000, MAX_SEARCH_SIZE), 10_000);
        assert_eq!(validate_timeframe(2000, 1440), 1440);
        assert_eq!(validate_timeframe(-1, 1440), 1);
    }

    #[test]
    fn good_patterns() {
        for p in ["app-logs*", "logs-2024.01.*", "a_b", "*"] {
            assert!(validate_index_pattern(p).is_ok(), "{p}");
        }
    }

    #[test]
    fn bad_patterns() {
        let err = validate_index_pattern("").unwrap_err();
        assert!(matches!(err, SearchError::Validation { ref param, .. } if param == "index_pattern"));
        assert!(validate_index_pattern("_all").is_err());
        assert!(validate_index_pattern("logs,secrets").is_err());
        assert!(validate_index_pattern("logs/../x").is_err());
        assert!(validate_index_pattern("logs *").is_err());
    }
}
