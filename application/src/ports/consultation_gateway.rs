//! Consultation Gateway port
//!
//! Plain request/response calls against the consultation backend. None of
//! these carry orchestration state.

use async_trait::async_trait;
use consult_domain::{
    Consultation, ConsultationId, ConsultationRecord, EmergencyGuide, NewConsultation,
    TriageAssessment,
};
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Consultation not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for consultation records
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ConsultationGateway: Send + Sync {
    /// Open a new consultation for the patient's problem.
    async fn create_consultation(
        &self,
        request: &NewConsultation,
    ) -> Result<Consultation, GatewayError>;

    /// Fetch the full record: header, ordered history and summary if any.
    async fn load_consultation(
        &self,
        consultation_id: &ConsultationId,
    ) -> Result<ConsultationRecord, GatewayError>;

    /// The caller's consultations, newest first.
    async fn list_consultations(&self) -> Result<Vec<Consultation>, GatewayError>;

    /// Standalone severity assessment; does not create a consultation.
    async fn triage(&self, initial_problem: &str) -> Result<TriageAssessment, GatewayError>;

    async fn emergency_guide(
        &self,
        consultation_id: &ConsultationId,
    ) -> Result<EmergencyGuide, GatewayError>;
}
