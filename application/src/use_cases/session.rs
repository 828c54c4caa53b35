//! Consultation Session facade
//!
//! Read/command pass-through consumed by a rendering layer. Orchestration
//! state lives in the [`ConsultationEngine`]; the plain request/response
//! calls (triage, emergency guide, history) go straight to the gateway.

use crate::ports::consultation_gateway::{ConsultationGateway, GatewayError};
use crate::ports::step_client::StepClient;
use crate::use_cases::orchestration::{ConsultationEngine, EngineError, EngineStatus, RunOutcome};
use consult_domain::{
    Consultation, ConsultationId, ConsultationSummary, DomainError, EmergencyGuide,
    NewConsultation, TriageAssessment, Turn, validate_problem,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by the session facade
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    Invalid(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("No consultation is loaded")]
    NoConsultation,
}

/// Session facade over one engine
pub struct ConsultationSession<S: StepClient + 'static, G: ConsultationGateway + 'static> {
    engine: Arc<ConsultationEngine<S, G>>,
}

impl<S: StepClient + 'static, G: ConsultationGateway + 'static> Clone
    for ConsultationSession<S, G>
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S: StepClient + 'static, G: ConsultationGateway + 'static> ConsultationSession<S, G> {
    pub fn new(engine: ConsultationEngine<S, G>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &Arc<ConsultationEngine<S, G>> {
        &self.engine
    }

    fn gateway(&self) -> &G {
        self.engine.gateway()
    }

    // ==================== Commands ====================

    /// Open a new consultation and seed the transcript with the patient's problem.
    pub async fn start(&self, request: NewConsultation) -> Result<Consultation, SessionError> {
        if let Some(id) = self
            .engine
            .consultation_id()
            .filter(|_| self.engine.is_running())
        {
            return Err(EngineError::RunInProgress(id).into());
        }
        let consultation = self.gateway().create_consultation(&request).await?;
        info!(consultation_id = %consultation.id, status = %consultation.status, "Consultation created");
        self.engine
            .begin_consultation(consultation.clone(), request.initial_problem())?;
        Ok(consultation)
    }

    /// Load a persisted consultation, replacing the transcript wholesale.
    pub async fn load(&self, consultation_id: &ConsultationId) -> Result<Consultation, SessionError> {
        let record = self.gateway().load_consultation(consultation_id).await?;
        let consultation = record.consultation.clone();
        self.engine.load_record(record)?;
        Ok(consultation)
    }

    /// Run the currently bound consultation.
    pub async fn run(&self) -> Result<RunOutcome, SessionError> {
        let id = self
            .engine
            .consultation_id()
            .ok_or(SessionError::NoConsultation)?;
        Ok(self.engine.run(&id).await)
    }

    pub async fn run_for(&self, consultation_id: &ConsultationId) -> RunOutcome {
        self.engine.run(consultation_id).await
    }

    pub fn cancel(&self) -> bool {
        self.engine.cancel()
    }

    pub fn reset(&self) -> bool {
        self.engine.reset()
    }

    // ==================== Projections ====================

    pub fn status(&self) -> EngineStatus {
        self.engine.status()
    }

    pub fn transcript(&self) -> Vec<Turn> {
        self.engine.transcript()
    }

    pub fn last_error(&self) -> Option<String> {
        self.engine.last_error()
    }

    pub fn consultation(&self) -> Option<Consultation> {
        self.engine.consultation()
    }

    pub fn summary(&self) -> Option<ConsultationSummary> {
        self.engine.summary()
    }

    // ==================== Request / Response ====================

    pub async fn triage(&self, initial_problem: &str) -> Result<TriageAssessment, SessionError> {
        let problem = validate_problem(initial_problem.to_string())?;
        Ok(self.gateway().triage(&problem).await?)
    }

    pub async fn emergency_guide(
        &self,
        consultation_id: &ConsultationId,
    ) -> Result<EmergencyGuide, SessionError> {
        Ok(self.gateway().emergency_guide(consultation_id).await?)
    }

    pub async fn history(&self) -> Result<Vec<Consultation>, SessionError> {
        Ok(self.gateway().list_consultations().await?)
    }
}
