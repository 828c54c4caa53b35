//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`text`]: helpers for rendering turn content in logs and listings

pub mod error;
pub mod text;
