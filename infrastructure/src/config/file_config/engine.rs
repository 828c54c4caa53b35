//! Orchestration engine configuration from TOML (`[engine]` section)

use consult_application::{DEFAULT_PACING, EngineConfig};
use consult_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw engine configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Pause between consecutive steps, in milliseconds
    pub pacing_ms: u64,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        Self {
            pacing_ms: DEFAULT_PACING.as_millis() as u64,
        }
    }
}

impl FileEngineConfig {
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::default().with_pacing_ms(self.pacing_ms)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        if self.pacing_ms == 0 {
            // Zero pacing works, it just hammers the backend
            vec![ConfigIssue::warning(
                ConfigIssueCode::ZeroDuration {
                    field: "engine.pacing_ms".to_string(),
                },
                "engine.pacing_ms is 0: steps will be requested back-to-back",
            )]
        } else {
            vec![]
        }
    }
}
