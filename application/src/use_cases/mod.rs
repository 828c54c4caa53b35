//! Use cases (application services)

pub mod orchestration;
pub mod session;
