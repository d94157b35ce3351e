//! Observability for the product detail widget.
//!
//! This crate provides:
//! - `InstanceId` - Identifier of one mounted widget, used to correlate logs
//! - `StructuredLogger` - Structured logging with widget context
//! - `LogSink` - Where log entries go (stderr, `tracing`, or memory)

mod instance;
mod logging;

pub use instance::*;
pub use logging::*;
