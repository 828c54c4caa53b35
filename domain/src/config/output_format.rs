//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for consultation results
///
/// This is a domain concept representing how a finished (or interrupted)
/// consultation should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Transcript followed by the final summary (default)
    #[default]
    Full,
    /// Only the transcript turns
    Transcript,
    /// JSON output
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "transcript" => Ok(Self::Transcript),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}
