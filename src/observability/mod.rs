//! Observability module
//!
//! Structured logging for loading and repairing configuration.

pub mod logging;

pub use logging::{LogFormat, init_logging};
