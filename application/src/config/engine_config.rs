//! Engine parameters: orchestration loop control.
//!
//! [`EngineConfig`] groups the static parameters of the
//! [`ConsultationEngine`](crate::use_cases::orchestration::ConsultationEngine)
//! run loop. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default pause between two non-terminal steps.
pub const DEFAULT_PACING: Duration = Duration::from_millis(800);

/// Orchestration loop parameters.
///
/// No iteration cap: a backend that never completes is polled until the
/// caller cancels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause after each appended turn, before the next step call.
    pub pacing: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_PACING,
        }
    }
}

impl EngineConfig {
    // ==================== Builder Methods ====================

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_pacing_ms(self, millis: u64) -> Self {
        self.with_pacing(Duration::from_millis(millis))
    }
}
