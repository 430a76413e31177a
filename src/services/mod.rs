//! services/mod.rs
pub mod dispatch_service;
pub mod log_store;
pub mod schedule_resolver;
pub mod sender;
pub mod translator;
pub mod upload_service;
