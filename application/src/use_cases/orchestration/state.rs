//! Run state machine
//!
//! `Idle → Running → {Completed, Failed, Cancelled}`. A terminal state goes
//! back to `Idle` only through an explicit reset, which `run` performs
//! before admitting a new loop. A second `run` while `Running` is rejected.

use consult_domain::ConsultationId;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Observable engine status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl EngineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a call to `run` ended with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "error", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The backend reported completion and the record was reloaded.
    Completed,
    /// A step (or the final reload) failed; carries the description.
    Failed(String),
    /// The caller cancelled; the transcript holds a valid prefix.
    Cancelled,
    /// Another run was already in progress; nothing happened.
    AlreadyRunning,
}

impl RunOutcome {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Internal state; the cancellation token only exists while running.
#[derive(Debug, Default)]
pub(crate) enum RunState {
    #[default]
    Idle,
    Running {
        consultation_id: ConsultationId,
        cancel: CancellationToken,
    },
    Completed {
        consultation_id: ConsultationId,
    },
    Failed {
        consultation_id: ConsultationId,
        error: String,
    },
    Cancelled {
        consultation_id: ConsultationId,
    },
}

impl RunState {
    pub(crate) fn status(&self) -> EngineStatus {
        match self {
            Self::Idle => EngineStatus::Idle,
            Self::Running { .. } => EngineStatus::Running,
            Self::Completed { .. } => EngineStatus::Completed,
            Self::Failed { .. } => EngineStatus::Failed,
            Self::Cancelled { .. } => EngineStatus::Cancelled,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub(crate) fn last_error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub(crate) fn consultation_id(&self) -> Option<&ConsultationId> {
        match self {
            Self::Idle => None,
            Self::Running {
                consultation_id, ..
            }
            | Self::Completed { consultation_id }
            | Self::Failed {
                consultation_id, ..
            }
            | Self::Cancelled { consultation_id } => Some(consultation_id),
        }
    }

    /// Admit a new run. Terminal states are reset to `Idle` first.
    ///
    /// Returns `None` when a run is already in progress.
    pub(crate) fn begin(&mut self, consultation_id: &ConsultationId) -> Option<CancellationToken> {
        if self.is_running() {
            return None;
        }
        if self.status().is_terminal() {
            self.reset();
        }
        let cancel = CancellationToken::new();
        *self = Self::Running {
            consultation_id: consultation_id.clone(),
            cancel: cancel.clone(),
        };
        Some(cancel)
    }

    /// Move from `Running` into the terminal state matching `outcome`.
    pub(crate) fn settle(&mut self, outcome: &RunOutcome) {
        let Self::Running {
            consultation_id, ..
        } = self
        else {
            return;
        };
        let consultation_id = consultation_id.clone();
        *self = match outcome {
            RunOutcome::Completed => Self::Completed { consultation_id },
            RunOutcome::Failed(error) => Self::Failed {
                consultation_id,
                error: error.clone(),
            },
            RunOutcome::Cancelled | RunOutcome::AlreadyRunning => {
                Self::Cancelled { consultation_id }
            }
        };
    }

    /// Request cooperative cancellation. Returns whether a run was signalled.
    pub(crate) fn cancel(&self) -> bool {
        match self {
            Self::Running { cancel, .. } => {
                cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// Forget a terminal state left by another consultation.
    pub(crate) fn rebind(&mut self, consultation_id: &ConsultationId) {
        if self
            .consultation_id()
            .is_some_and(|bound| bound != consultation_id)
        {
            self.reset();
        }
    }

    /// Back to `Idle`. Refused while running.
    pub(crate) fn reset(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        *self = Self::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ConsultationId {
        ConsultationId::new(s).unwrap()
    }

    #[test]
    fn test_begin_from_idle() {
        let mut state = RunState::default();
        assert!(state.begin(&id("c1")).is_some());
        assert_eq!(state.status(), EngineStatus::Running);
        assert_eq!(state.consultation_id(), Some(&id("c1")));
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let mut state = RunState::default();
        state.begin(&id("c1")).unwrap();
        assert!(state.begin(&id("c1")).is_none());
        assert!(state.begin(&id("c2")).is_none());
        assert_eq!(state.consultation_id(), Some(&id("c1")));
    }

    #[test]
    fn test_settle_records_error() {
        let mut state = RunState::default();
        state.begin(&id("c1")).unwrap();
        state.settle(&RunOutcome::Failed("network error".to_string()));
        assert_eq!(state.status(), EngineStatus::Failed);
        assert_eq!(state.last_error(), Some("network error"));
    }

    #[test]
    fn test_begin_after_terminal_clears_error() {
        let mut state = RunState::default();
        state.begin(&id("c1")).unwrap();
        state.settle(&RunOutcome::Failed("boom".to_string()));
        assert!(state.begin(&id("c1")).is_some());
        assert_eq!(state.status(), EngineStatus::Running);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_settle_outside_running_is_ignored() {
        let mut state = RunState::default();
        state.settle(&RunOutcome::Completed);
        assert_eq!(state.status(), EngineStatus::Idle);
    }

    #[test]
    fn test_cancel_signals_token() {
        let mut state = RunState::default();
        let token = state.begin(&id("c1")).unwrap();
        assert!(state.cancel());
        assert!(token.is_cancelled());
        // Cancel requests the stop; the state only changes when the loop settles
        assert_eq!(state.status(), EngineStatus::Running);
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        assert!(!RunState::default().cancel());
    }

    #[test]
    fn test_rebind_to_other_consultation_forgets_terminal_state() {
        let mut state = RunState::default();
        state.begin(&id("c1")).unwrap();
        state.settle(&RunOutcome::Failed("c1 broke".to_string()));

        state.rebind(&id("c1"));
        assert_eq!(state.last_error(), Some("c1 broke"));

        state.rebind(&id("c2"));
        assert_eq!(state.status(), EngineStatus::Idle);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_reset_refused_while_running() {
        let mut state = RunState::default();
        state.begin(&id("c1")).unwrap();
        assert!(!state.reset());
        state.settle(&RunOutcome::Cancelled);
        assert!(state.reset());
        assert_eq!(state.status(), EngineStatus::Idle);
    }
}
