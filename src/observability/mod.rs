//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via the tracing crate; every pipeline log line
//!   carries the pipeline or client ID
//! - Metrics go through the metrics facade; the embedding process decides
//!   whether to install an exporter

pub mod logging;
pub mod metrics;

pub use logging::init_tracing;
