//! Index registry: per-environment, per-index-type field and value mappings.
//!
//! The registry is built once (built-in tables or a TOML document), has the
//! `ELASTIC_<INDEX_TYPE>_PATTERN` overrides captured at construction, and is
//! never mutated afterwards. Lookups hand out copies.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Logical field name → physical field path.
pub type FieldMap = BTreeMap<String, String>;

/// Normalized categorical value → stored variants, in configured order.
pub type ValueMap = BTreeMap<String, Vec<String>>;

fn default_size() -> u32 {
    100
}
fn default_max_size() -> u32 {
    1000
}
fn default_timeout_ms() -> u64 {
    30_000
}

/// Operational parameters and mappings for one index type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Filled from the registry key on load.
    #[serde(default)]
    pub index_type: String,
    pub pattern: String,
    #[serde(default)]
    pub rollover: String,
    #[serde(default)]
    pub retention: String,
    #[serde(default = "default_size")]
    pub default_size: u32,
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub fields: FieldMap,
    /// Logical field → value map (only `level` is used today).
    #[serde(default)]
    pub mappings: BTreeMap<String, ValueMap>,
}

impl IndexConfig {
    pub fn field(&self, logical: &str) -> Option<&str> {
        self.fields.get(logical).map(String::as_str)
    }

    pub fn value_map(&self, logical: &str) -> Option<&ValueMap> {
        self.mappings.get(logical)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    environments: BTreeMap<String, BTreeMap<String, IndexConfig>>,
}

/// Immutable lookup table over all environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRegistry {
    environments: BTreeMap<String, BTreeMap<String, IndexConfig>>,
    /// index_type → pattern, from `ELASTIC_<INDEX_TYPE>_PATTERN`.
    pattern_overrides: HashMap<String, String>,
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IndexRegistry {
    pub(crate) fn from_environments(
        mut environments: BTreeMap<String, BTreeMap<String, IndexConfig>>,
    ) -> Self {
        for indices in environments.values_mut() {
            for (index_type, config) in indices.iter_mut() {
                config.index_type.clone_from(index_type);
            }
        }
        Self {
            environments,
            pattern_overrides: HashMap::new(),
        }
    }

    /// The tables shipped with logbridge (no env overrides applied).
    pub fn builtin() -> Self {
        Self::from_environments(crate::builtin::environments())
    }

    /// Parse a TOML registry:
    ///
    /// ```toml
    /// [environments.production.app_logs]
    /// pattern = "app-logs-prod-*"
    /// [environments.production.app_logs.fields]
    /// level = "json.levelname"
    /// [environments.production.app_logs.mappings.level]
    /// ERROR = ["error", "ERR"]
    /// ```
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let doc: RegistryDocument =
            toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Self::from_environments(doc.environments))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Capture `ELASTIC_<INDEX_TYPE>_PATTERN` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Capture pattern overrides from an arbitrary lookup, one key per known
    /// index type.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let index_types: Vec<String> = self
            .environments
            .values()
            .flat_map(|indices| indices.keys().cloned())
            .collect();
        for index_type in index_types {
            let key = format!("ELASTIC_{}_PATTERN", index_type.to_uppercase());
            if let Some(pattern) = lookup(&key).filter(|p| !p.is_empty()) {
                tracing::info!(index_type = %index_type, pattern = %pattern, "index pattern override");
                self.pattern_overrides.insert(index_type, pattern);
            }
        }
        self
    }

    fn lookup(&self, environment: &str, index_type: &str) -> ConfigResult<&IndexConfig> {
        let indices = self
            .environments
            .get(environment)
            .ok_or_else(|| ConfigError::UnknownEnvironment(environment.to_string()))?;
        indices
            .get(index_type)
            .ok_or_else(|| ConfigError::UnknownIndexType {
                environment: environment.to_string(),
                index_type: index_type.to_string(),
            })
    }

    /// Resolve the config for `(environment, index_type)`.
    ///
    /// Pattern precedence: `override_pattern` > env override > registry.
    /// Returns a copy; the registry itself is untouched.
    pub fn get_index_config(
        &self,
        environment: &str,
        index_type: &str,
        override_pattern: Option<&str>,
    ) -> ConfigResult<IndexConfig> {
        let mut config = self.lookup(environment, index_type)?.clone();
        if let Some(pattern) = override_pattern.filter(|p| !p.is_empty()) {
            config.pattern = pattern.to_string();
        } else if let Some(pattern) = self.pattern_overrides.get(index_type) {
            config.pattern.clone_from(pattern);
        }
        Ok(config)
    }

    /// Physical path for a logical field. `None` means "unsupported here":
    /// the caller omits that filter.
    pub fn get_field_mapping(
        &self,
        environment: &str,
        index_type: &str,
        logical_field: &str,
    ) -> Option<&str> {
        self.lookup(environment, index_type)
            .ok()
            .and_then(|c| c.field(logical_field))
    }

    /// Like [`get_field_mapping`](Self::get_field_mapping) with a fallback path.
    pub fn field_or<'a>(
        &'a self,
        environment: &str,
        index_type: &str,
        logical_field: &str,
        fallback: &'a str,
    ) -> &'a str {
        self.get_field_mapping(environment, index_type, logical_field)
            .unwrap_or(fallback)
    }

    /// Stored variants of a normalized level. Misses degrade to `[level]`.
    pub fn get_level_mapping(
        &self,
        environment: &str,
        index_type: &str,
        normalized_level: &str,
    ) -> Vec<String> {
        self.get_value_mapping(environment, index_type, "level", normalized_level)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| vec![normalized_level.to_string()])
    }

    /// Raw ValueMap lookup for any logical field.
    pub fn get_value_mapping(
        &self,
        environment: &str,
        index_type: &str,
        logical_field: &str,
        value: &str,
    ) -> Option<&[String]> {
        self.lookup(environment, index_type)
            .ok()?
            .value_map(logical_field)?
            .get(value)
            .map(Vec::as_slice)
    }

    pub fn list_environments(&self) -> Vec<&str> {
        self.environments.keys().map(String::as_str).collect()
    }

    pub fn list_index_types(&self, environment: &str) -> ConfigResult<Vec<&str>> {
        self.environments
            .get(environment)
            .map(|indices| indices.keys().map(String::as_str).collect())
            .ok_or_else(|| ConfigError::UnknownEnvironment(environment.to_string()))
    }

    pub fn has_environment(&self, environment: &str) -> bool {
        self.environments.contains_key(environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_app_logs_error_variants() {
        let reg = IndexRegistry::builtin();
        assert_eq!(
            reg.get_level_mapping("default", "app_logs", "ERROR"),
            vec!["error", "ERROR", "E", "err", "ERR"]
        );
    }

    #[test]
    fn unmapped_level_degrades_to_itself() {
        let reg = IndexRegistry::builtin();
        assert_eq!(
            reg.get_level_mapping("default", "app_logs", "TRACE"),
            vec!["TRACE"]
        );
        // No ValueMap at all on infra_logs.
        assert_eq!(
            reg.get_level_mapping("default", "infra_logs", "ERROR"),
            vec!["ERROR"]
        );
        // Unknown environment still does not fail.
        assert_eq!(reg.get_level_mapping("mars", "app_logs", "ERROR"), vec!["ERROR"]);
    }

    #[test]
    fn field_mapping_hits_and_misses() {
        let reg = IndexRegistry::builtin();
        assert_eq!(
            reg.get_field_mapping("default", "app_logs", "level"),
            Some("json.levelname")
        );
        assert_eq!(reg.get_field_mapping("default", "app_logs", "Level"), None);
        assert_eq!(reg.get_field_mapping("default", "app_logs", "nope"), None);
        assert_eq!(reg.get_field_mapping("nowhere", "app_logs", "level"), None);
        assert_eq!(
            reg.field_or("development", "app_logs", "user_id", "json.user_id"),
            "json.user_id"
        );
    }

    #[test]
    fn unknown_environment_and_index_type() {
        let reg = IndexRegistry::builtin();
        assert_eq!(
            reg.get_index_config("mars", "app_logs", None).unwrap_err(),
            ConfigError::UnknownEnvironment("mars".into())
        );
        assert!(matches!(
            reg.get_index_config("staging", "audit_logs", None),
            Err(ConfigError::UnknownIndexType { .. })
        ));
    }

    #[test]
    fn pattern_precedence() {
        let reg = IndexRegistry::builtin().with_overrides_from(|key| {
            (key == "ELASTIC_APP_LOGS_PATTERN").then(|| "env-app-*".to_string())
        });

        let registry_default = reg.get_index_config("default", "infra_logs", None).unwrap();
        assert_eq!(registry_default.pattern, "infrastructure-prod-*");

        let env = reg.get_index_config("default", "app_logs", None).unwrap();
        assert_eq!(env.pattern, "env-app-*");

        let explicit = reg
            .get_index_config("default", "app_logs", Some("explicit-*"))
            .unwrap();
        assert_eq!(explicit.pattern, "explicit-*");
    }

    #[test]
    fn lookup_is_copy_on_read() {
        let reg = IndexRegistry::builtin();
        let before = reg.clone();
        let mut cfg = reg
            .get_index_config("default", "app_logs", Some("other-*"))
            .unwrap();
        cfg.fields.insert("level".into(), "mutated".into());
        assert_eq!(reg, before);
        assert_eq!(
            reg.get_field_mapping("default", "app_logs", "level"),
            Some("json.levelname")
        );
    }

    #[test]
    fn development_overrides_sizes() {
        let reg = IndexRegistry::builtin();
        let dev = reg.get_index_config("development", "app_logs", None).unwrap();
        assert_eq!(dev.default_size, 50);
        assert_eq!(dev.max_size, 200);
        assert_eq!(dev.timeout_ms, 10_000);
        assert_eq!(dev.index_type, "app_logs");
    }

    #[test]
    fn listing() {
        let reg = IndexRegistry::builtin();
        assert_eq!(
            reg.list_environments(),
            vec!["default", "development", "production", "staging"]
        );
        assert_eq!(
            reg.list_index_types("production").unwrap(),
            vec!["app_logs", "audit_logs", "infra_logs", "security_logs"]
        );
        assert!(reg.list_index_types("mars").is_err());
    }

    #[test]
    fn toml_registry() {
        let reg = IndexRegistry::from_toml_str(
            r#"
            [environments.qa.app_logs]
            pattern = "qa-logs-*"
            max_size = 300

            [environments.qa.app_logs.fields]
            level = "lvl"

            [environments.qa.app_logs.mappings.level]
            ERROR = ["e", "error"]
            "#,
        )
        .unwrap();
        let cfg = reg.get_index_config("qa", "app_logs", None).unwrap();
        assert_eq!(cfg.pattern, "qa-logs-*");
        assert_eq!(cfg.max_size, 300);
        assert_eq!(cfg.default_size, 100);
        assert_eq!(cfg.index_type, "app_logs");
        assert_eq!(reg.get_level_mapping("qa", "app_logs", "ERROR"), vec!["e", "error"]);
    }

    #[test]
    fn toml_registry_rejects_garbage() {
        assert!(matches!(
            IndexRegistry::from_toml_str("environments = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
