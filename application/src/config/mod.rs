//! Application configuration
//!
//! Static parameters the use cases receive at construction time.

mod engine_config;

pub use engine_config::{DEFAULT_PACING, EngineConfig};
