//! tests/mod.rs
mod api_tests;
mod support;
