//! models/mod.rs
pub mod dispatch_model;
pub mod log_model;
