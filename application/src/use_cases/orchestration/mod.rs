//! Consultation orchestration
//!
//! - [`engine`]: the run loop that drives a consultation step by step
//! - [`state`]: the `Idle → Running → terminal` state machine behind it

pub mod engine;
pub mod state;

pub use engine::{ConsultationEngine, EngineError};
pub use state::{EngineStatus, RunOutcome};
