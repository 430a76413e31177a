//! handlers/mod.rs
pub mod log_handler;
pub mod message_handler;
