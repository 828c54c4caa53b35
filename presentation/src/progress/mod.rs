//! Run progress reporting

pub mod reporter;
