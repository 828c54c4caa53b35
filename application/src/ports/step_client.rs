//! Step Client port
//!
//! Defines the single network operation that drives a consultation forward.

use async_trait::async_trait;
use consult_domain::{ConsultationId, StepResult};

/// Advances a consultation by exactly one step.
///
/// Implementations must fold every failure mode (transport error, timeout,
/// non-2xx status, backend-reported error) into [`StepResult::Failure`];
/// nothing may escape as an error type. A call may mutate server state, so
/// retrying it is never equivalent to the original attempt.
///
/// Callers must not invoke this concurrently for the same consultation.
#[async_trait]
pub trait StepClient: Send + Sync {
    async fn advance_step(&self, consultation_id: &ConsultationId) -> StepResult;
}
