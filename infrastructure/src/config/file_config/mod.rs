//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod engine;
mod logging;
mod output;
mod server;

pub use engine::FileEngineConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use server::FileServerConfig;

use consult_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend connection
    pub server: FileServerConfig,
    /// Orchestration loop
    pub engine: FileEngineConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.server.validate();
        issues.extend(self.engine.validate());
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
base_url = "https://consult.example.org/api"
timeout_secs = 10
access_token = "secret"

[engine]
pacing_ms = 250

[output]
format = "json"
color = false

[logging]
dir = "/tmp/consult/logs"
transcript_dir = "/tmp/consult/transcripts"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.base_url, "https://consult.example.org/api");
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.server.access_token.as_deref(), Some("secret"));
        assert_eq!(config.engine.pacing_ms, 250);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.logging.transcript_dir.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[engine]
pacing_ms = 100
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.pacing_ms, 100);
        // Defaults should apply
        assert_eq!(config.server, FileServerConfig::default());
        assert!(config.output.color);
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let mut config = FileConfig::default();
        config.server.base_url = String::new();
        config.server.timeout_secs = 0;
        config.engine.pacing_ms = 0;

        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 2);
    }
}
