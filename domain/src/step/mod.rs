//! Step result taxonomy
//!
//! One call to "advance step" yields exactly one [`StepResult`]. Transport
//! failures, non-2xx responses and backend-reported errors all collapse into
//! [`StepResult::Failure`] before reaching the orchestration loop.

use serde::{Deserialize, Serialize};

/// Outcome of a single advance-step call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepResult {
    /// Deliberation is over; the full record must be reloaded.
    Completed,
    /// A doctor contributed one speech.
    DoctorSpoke {
        doctor_id: String,
        doctor_name: String,
        message: String,
    },
    /// The backend moved to another phase (e.g. voting).
    PhaseTransition { announcement: String },
    /// The step could not be performed.
    Failure { description: String },
}

impl StepResult {
    pub fn doctor_spoke(
        doctor_id: impl Into<String>,
        doctor_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DoctorSpoke {
            doctor_id: doctor_id.into(),
            doctor_name: doctor_name.into(),
            message: message.into(),
        }
    }

    pub fn transition(announcement: impl Into<String>) -> Self {
        Self::PhaseTransition {
            announcement: announcement.into(),
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self::Failure {
            description: description.into(),
        }
    }

    /// Whether this result ends the orchestration loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failure { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::DoctorSpoke { .. } => "doctor_spoke",
            Self::PhaseTransition { .. } => "phase_transition",
            Self::Failure { .. } => "failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_variants() {
        assert!(StepResult::Completed.is_terminal());
        assert!(StepResult::failure("boom").is_terminal());
        assert!(!StepResult::doctor_spoke("a", "Dr. A", "hi").is_terminal());
        assert!(!StepResult::transition("Entering vote").is_terminal());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(StepResult::Completed.kind(), "completed");
        assert_eq!(StepResult::transition("x").kind(), "phase_transition");
    }
}
