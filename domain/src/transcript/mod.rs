//! Transcript subdomain

pub mod log;
pub mod turn;
