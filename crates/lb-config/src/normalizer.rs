//! Level normalization over the registry's ValueMaps.

use crate::registry::IndexRegistry;

/// Stored variants of `level` for `(environment, index_type)`.
///
/// The token is upper-cased before lookup. On any miss (no such index, no
/// ValueMap, unknown token) the original token comes back unchanged as a
/// one-element list, so the resulting filter is at worst a no-op match.
pub fn normalize(
    registry: &IndexRegistry,
    environment: &str,
    index_type: &str,
    level: &str,
) -> Vec<String> {
    let key = level.trim().to_uppercase();
    match registry.get_value_mapping(environment, index_type, "level", &key) {
        Some(variants) => variants.to_vec(),
        None => vec![level.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_input() {
        let reg = IndexRegistry::builtin();
        assert_eq!(
            normalize(&reg, "default", "app_logs", "warning"),
            vec!["warn", "WARNING", "W", "warning", "WARN"]
        );
    }

    #[test]
    fn miss_returns_original_token() {
        let reg = IndexRegistry::builtin();
        assert_eq!(normalize(&reg, "default", "app_logs", "Trace"), vec!["Trace"]);
        assert_eq!(normalize(&reg, "default", "audit_logs", "error"), vec!["error"]);
        assert_eq!(normalize(&reg, "nowhere", "app_logs", "error"), vec!["error"]);
    }

    #[test]
    fn development_has_shorter_lists() {
        let reg = IndexRegistry::builtin();
        assert_eq!(
            normalize(&reg, "development", "app_logs", "ERROR"),
            vec!["error", "ERROR"]
        );
        assert_eq!(
            normalize(&reg, "development", "app_logs", "CRITICAL"),
            vec!["CRITICAL"]
        );
    }
}
