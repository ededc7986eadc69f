//! Library half of the `income` binary: configuration, logging, the
//! editing session and text rendering. Kept separate from `main.rs` so the
//! integration tests can drive a session directly.

pub mod app;
pub mod config;
pub mod logging;
pub mod output;
pub mod utils;
