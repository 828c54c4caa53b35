//! Run observation port
//!
//! Defines the interface for reporting progress while the orchestration
//! engine drives a consultation.

use crate::use_cases::orchestration::RunOutcome;
use consult_domain::{ConsultationId, Turn};

/// Callback for progress updates during a consultation run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.). Callbacks are invoked
/// from the run loop, so they must not block.
pub trait RunObserver: Send + Sync {
    /// Called once the re-entrancy guard has admitted a run
    fn on_run_started(&self, consultation_id: &ConsultationId);

    /// Called after a turn has been appended, in append order
    fn on_turn_appended(&self, turn: &Turn);

    /// Called when the run settles into a terminal state
    fn on_run_settled(&self, consultation_id: &ConsultationId, outcome: &RunOutcome);

    /// Called after the authoritative reload replaced the transcript
    fn on_transcript_reloaded(&self, _turns: &[Turn]) {}
}

/// No-op observer for when progress reporting is not needed
pub struct NoRunObserver;

impl RunObserver for NoRunObserver {
    fn on_run_started(&self, _consultation_id: &ConsultationId) {}
    fn on_turn_appended(&self, _turn: &Turn) {}
    fn on_run_settled(&self, _consultation_id: &ConsultationId, _outcome: &RunOutcome) {}
}
