//! HTTP adapter for the consultation backend

pub mod client;
pub mod error;
mod wire;

pub use client::{HttpClientConfig, HttpConsultationClient};
pub use error::HttpError;
