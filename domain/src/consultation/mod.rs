//! Consultation subdomain
//!
//! - [`entities`]: the consultation header, status lifecycle and summary
//! - [`triage`]: stateless triage and emergency guidance payloads

pub mod entities;
pub mod triage;
