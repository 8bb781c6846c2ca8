//! Bugsnag (error tracking) configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

const DEFAULT_BASE_URL: &str = "https://api.bugsnag.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One Bugsnag project searched by the user-error flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugsnagProject {
    /// Platform key used to bucket results (`mobile`, `dashboard`, ...).
    pub key: String,
    /// Bugsnag project id.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl BugsnagProject {
    /// Parse one `key:id:Display Name` entry. The name may contain colons.
    pub fn parse(entry: &str) -> ConfigResult<Self> {
        let mut parts = entry.trim().splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(id), name) if !key.is_empty() && !id.is_empty() => Ok(Self {
                key: key.trim().to_string(),
                id: id.trim().to_string(),
                name: name
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(key)
                    .to_string(),
            }),
            _ => Err(ConfigError::InvalidValue {
                key: "BUGSNAG_PROJECTS".into(),
                message: format!("expected 'key:id[:name]', got '{entry}'"),
            }),
        }
    }
}

/// Bugsnag API access settings.
///
/// Credentials are optional at load time; they are only required when a
/// Bugsnag tool actually runs (see [`BugsnagConfig::credentials`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugsnagConfig {
    pub api_token: Option<String>,
    pub org_id: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub projects: Vec<BugsnagProject>,
}

impl Default for BugsnagConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            org_id: None,
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            projects: Vec::new(),
        }
    }
}

impl BugsnagConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match get("BUGSNAG_TIMEOUT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "BUGSNAG_TIMEOUT".into(),
                message: format!("expected seconds, got '{raw}'"),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let projects = match get("BUGSNAG_PROJECTS") {
            Some(raw) => raw
                .split(',')
                .filter(|e| !e.trim().is_empty())
                .map(BugsnagProject::parse)
                .collect::<ConfigResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            api_token: get("BUGSNAG_API_TOKEN"),
            org_id: get("BUGSNAG_ORG_ID"),
            base_url: get("BUGSNAG_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            timeout_secs,
            projects,
        })
    }

    /// True when both the token and the organization id are present.
    pub fn is_configured(&self) -> bool {
        self.api_token.is_some() && self.org_id.is_some()
    }

    /// The `(api_token, org_id)` pair, or a configuration error naming
    /// whichever is missing.
    pub fn credentials(&self) -> ConfigResult<(&str, &str)> {
        match (self.api_token.as_deref(), self.org_id.as_deref()) {
            (Some(token), Some(org)) => Ok((token, org)),
            (token, org) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push("BUGSNAG_API_TOKEN".to_string());
                }
                if org.is_none() {
                    missing.push("BUGSNAG_ORG_ID".to_string());
                }
                Err(ConfigError::MissingCredentials(missing))
            }
        }
    }

    pub fn project(&self, key: &str) -> Option<&BugsnagProject> {
        self.projects.iter().find(|p| p.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unconfigured_by_default() {
        let config = BugsnagConfig::from_lookup(lookup(&[])).unwrap();
        assert!(!config.is_configured());
        assert_eq!(config.base_url, "https://api.bugsnag.com");
        assert_eq!(config.timeout_secs, 30);
        let err = config.credentials().unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCredentials(vec![
                "BUGSNAG_API_TOKEN".into(),
                "BUGSNAG_ORG_ID".into()
            ])
        );
    }

    #[test]
    fn missing_org_only() {
        let config = BugsnagConfig::from_lookup(lookup(&[("BUGSNAG_API_TOKEN", "t")])).unwrap();
        let err = config.credentials().unwrap_err();
        assert!(err.to_string().contains("BUGSNAG_ORG_ID"));
        assert!(!err.to_string().contains("BUGSNAG_API_TOKEN"));
    }

    #[test]
    fn projects_parsed_in_order() {
        let config = BugsnagConfig::from_lookup(lookup(&[
            ("BUGSNAG_API_TOKEN", "t"),
            ("BUGSNAG_ORG_ID", "o"),
            (
                "BUGSNAG_PROJECTS",
                "mobile:5d3d:Mobile App, dashboard:607c:Dashboard (Web)",
            ),
        ]))
        .unwrap();
        assert_eq!(config.credentials().unwrap(), ("t", "o"));
        assert_eq!(config.projects.len(), 2);
        assert_eq!(config.projects[0].key, "mobile");
        assert_eq!(config.projects[1].name, "Dashboard (Web)");
        assert_eq!(config.project("dashboard").unwrap().id, "607c");
    }

    #[test]
    fn project_name_defaults_to_key() {
        let p = BugsnagProject::parse("web:abc").unwrap();
        assert_eq!(p.name, "web");
        assert!(BugsnagProject::parse("nokey").is_err());
        assert!(BugsnagProject::parse(":id:x").is_err());
    }

    #[test]
    fn trailing_slash_trimmed() {
        let config =
            BugsnagConfig::from_lookup(lookup(&[("BUGSNAG_BASE_URL", "http://localhost:9999/")]))
                .unwrap();
        assert_eq!(config.base_url, "http://localhost:9999");
    }
}
