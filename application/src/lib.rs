//! Application layer for panel-consult
//!
//! This crate contains the consultation orchestration engine, the session
//! facade, and the port definitions adapters implement.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_PACING, EngineConfig};
pub use ports::{
    consultation_gateway::{ConsultationGateway, GatewayError},
    pacer::{NoPacing, Pacer, TokioPacer},
    run_observer::{NoRunObserver, RunObserver},
    step_client::StepClient,
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
};
pub use use_cases::orchestration::{ConsultationEngine, EngineError, EngineStatus, RunOutcome};
pub use use_cases::session::{ConsultationSession, SessionError};
