//! Domain layer for panel-consult
//!
//! This crate contains the core entities and value objects of a panel
//! consultation. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Consultation
//!
//! A patient describes a problem and a panel of doctor agents deliberates
//! across multiple turns (speeches, phase transitions, votes) until the
//! backend produces a final summary.
//!
//! ## Step
//!
//! The backend exposes a single "advance one step" operation. Each call
//! yields exactly one [`StepResult`]: a doctor spoke, the phase changed,
//! the consultation completed, or the step failed.
//!
//! ## Transcript
//!
//! An ordered, append-only log of [`Turn`]s. Only the authoritative reload of
//! a persisted consultation may replace it wholesale.

pub mod config;
pub mod consultation;
pub mod core;
pub mod step;
pub mod transcript;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consultation::{
    entities::{
        Consultation, ConsultationId, ConsultationRecord, ConsultationStatus,
        ConsultationSummary, NewConsultation, MAX_PROBLEM_LEN, validate_problem,
    },
    triage::{EmergencyGuide, EmergencyStep, TriageAssessment},
};
pub use core::error::DomainError;
pub use step::StepResult;
pub use transcript::{
    log::Transcript,
    turn::{Sender, SenderType, Turn, TurnId},
};
