//! Backend connection configuration from TOML (`[server]` section)

use consult_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw server configuration from TOML
///
/// # Example
///
/// ```toml
/// [server]
/// base_url = "https://consult.example.org/api"
/// timeout_secs = 30
/// access_token = "..."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// API root including any `/api` prefix
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Static bearer token
    pub access_token: Option<String>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
            access_token: None,
        }
    }
}

impl FileServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let url = self.base_url.trim();

        if url.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "server.base_url".to_string(),
                },
                "server.base_url cannot be empty",
            ));
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidUrl {
                    field: "server.base_url".to_string(),
                    value: self.base_url.clone(),
                },
                format!(
                    "server.base_url: '{}' must start with http:// or https://",
                    self.base_url
                ),
            ));
        }

        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroDuration {
                    field: "server.timeout_secs".to_string(),
                },
                "server.timeout_secs cannot be 0",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FileServerConfig::default().validate().is_empty());
    }

    #[test]
    fn test_invalid_url_and_zero_timeout() {
        let config = FileServerConfig {
            base_url: "localhost".to_string(),
            timeout_secs: 0,
            access_token: None,
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.is_error()));
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::InvalidUrl { .. }
        ));
    }

    #[test]
    fn test_empty_url() {
        let config = FileServerConfig {
            base_url: "  ".to_string(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::EmptyValue {
                field: "server.base_url".to_string()
            }
        );
    }
}
