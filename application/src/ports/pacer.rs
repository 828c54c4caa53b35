//! Pacing port
//!
//! The orchestration loop waits between non-terminal steps so a consuming
//! UI can render each turn before the next arrives. Injecting the wait lets
//! tests run a full multi-turn scenario without wall-clock delays.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Real-time pacer backed by the tokio timer
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Pacer that returns immediately
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn pause(&self, _duration: Duration) {}
}
