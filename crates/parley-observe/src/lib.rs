//! Observability for Parley: tracing subscriber setup with structured
//! logging and optional OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{LogFormat, TracingOptions, init_tracing, shutdown_tracing};
