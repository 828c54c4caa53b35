//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod consultation_gateway;
pub mod pacer;
pub mod run_observer;
pub mod step_client;
pub mod transcript_logger;
