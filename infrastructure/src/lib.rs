//! Infrastructure layer for panel-consult
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP backend client, configuration
//! file loading and the JSONL transcript log.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileEngineConfig, FileLoggingConfig, FileOutputConfig,
    FileServerConfig,
};
pub use http::{HttpClientConfig, HttpConsultationClient, HttpError};
pub use logging::JsonlTranscriptLogger;
