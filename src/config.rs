//! Client Configuration
//!
//! Backend location, credentials and mutation policies.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// What a failed optimistic task mutation restores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollbackPolicy {
    /// Restore the snapshot, then replay later optimistic edits still standing
    #[default]
    Rebase,
    /// Restore the snapshot as-is (last rollback wins)
    Snapshot,
}

/// What a failed reorder persistence does to the local order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderFailurePolicy {
    /// Warn in the log and keep the local order until the next refetch
    #[default]
    Log,
    /// Restore the previous order and show a notice
    Rollback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    /// How long failure notices stay visible; 0 keeps them until dismissed
    pub notice_ttl_ms: u32,
    pub rollback_policy: RollbackPolicy,
    pub reorder_failure: ReorderFailurePolicy,
    pub log_level: String,
    /// Lines kept by the in-memory log buffer
    pub log_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "/api".to_string(),
            auth_token: None,
            notice_ttl_ms: 4000,
            rollback_policy: RollbackPolicy::default(),
            reorder_failure: ReorderFailurePolicy::default(),
            log_level: "info".to_string(),
            log_capacity: 500,
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Values baked in at build time (`TASKDECK_API_URL`, `TASKDECK_API_TOKEN`)
    pub fn from_build_env() -> Self {
        let mut config = ClientConfig::default();
        if let Some(url) = option_env!("TASKDECK_API_URL").filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url.to_string();
        }
        if let Some(token) = option_env!("TASKDECK_API_TOKEN").filter(|t| !t.is_empty()) {
            config.auth_token = Some(token.to_string());
        }
        config
    }

    /// Anchor a root-relative base URL (e.g. `/api`) to the page origin
    pub fn with_origin(mut self, origin: &str) -> Self {
        if self.api_base_url.starts_with('/') {
            self.api_base_url = format!("{}{}", origin.trim_end_matches('/'), self.api_base_url);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url cannot be empty".to_string()));
        }
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!("unknown log_level '{}'", self.log_level)));
        }
        Ok(())
    }

    /// Falls back to `Info` for an unparseable level
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.rollback_policy, RollbackPolicy::Rebase);
        assert_eq!(config.reorder_failure, ReorderFailurePolicy::Log);
    }

    #[test]
    fn test_policies_from_json() {
        let config = ClientConfig::from_json(
            r#"{ "api_base_url": "https://api.example.com/v1/", "rollback_policy": "snapshot", "reorder_failure": "rollback", "log_level": "debug" }"#,
        )
        .unwrap();
        assert_eq!(config.rollback_policy, RollbackPolicy::Snapshot);
        assert_eq!(config.reorder_failure, ReorderFailurePolicy::Rollback);
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        assert_eq!(config.endpoint("/notes/reorder"), "https://api.example.com/v1/notes/reorder");
    }

    #[test]
    fn test_with_origin_only_touches_relative_urls() {
        let relative = ClientConfig::default().with_origin("https://app.example.com/");
        assert_eq!(relative.api_base_url, "https://app.example.com/api");

        let absolute = ClientConfig {
            api_base_url: "https://api.example.com".into(),
            ..ClientConfig::default()
        };
        assert_eq!(absolute.clone().with_origin("https://app.example.com"), absolute);
    }

    #[test]
    fn test_rejects_blank_base_url() {
        let err = ClientConfig::from_json(r#"{ "api_base_url": "  " }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_level_and_policy() {
        assert!(ClientConfig::from_json(r#"{ "log_level": "loud" }"#).is_err());
        assert!(matches!(
            ClientConfig::from_json(r#"{ "rollback_policy": "merge" }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
