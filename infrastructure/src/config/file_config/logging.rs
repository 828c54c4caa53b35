//! Log destinations from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// Both directories are optional; when unset only stderr diagnostics are
/// emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the rolling `tracing` file log
    pub dir: Option<PathBuf>,
    /// Directory for per-consultation JSONL transcripts
    pub transcript_dir: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// Expand a leading `~/` against the home directory.
    pub fn expand(path: &std::path::Path) -> PathBuf {
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| path.to_path_buf()),
            Err(_) => path.to_path_buf(),
        }
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.dir.as_deref().map(Self::expand)
    }

    pub fn transcript_dir(&self) -> Option<PathBuf> {
        self.transcript_dir.as_deref().map(Self::expand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_absolute_path_unchanged() {
        assert_eq!(
            FileLoggingConfig::expand(Path::new("/var/log/consult")),
            PathBuf::from("/var/log/consult")
        );
    }

    #[test]
    fn test_tilde_expanded() {
        let expanded = FileLoggingConfig::expand(Path::new("~/logs"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("logs"));
        }
    }

    #[test]
    fn test_unset_by_default() {
        let config = FileLoggingConfig::default();
        assert!(config.log_dir().is_none());
        assert!(config.transcript_dir().is_none());
    }
}
