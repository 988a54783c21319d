//! Two-stage async pipeline runner for remote NLP service calls.
//!
//! # Architecture Overview
//!
//! ```text
//!   RemoteRequest                derive_b(&response_a)
//!        │                               │
//!        ▼                               ▼
//!   ┌──────────┐   RemoteResponse   ┌──────────┐   RemoteResponse
//!   │ Stage A  │───────────────────▶│ Stage B  │──────────────────▶ PipelineResult
//!   │ (remote) │                    │ (remote) │
//!   └────┬─────┘                    └────┬─────┘
//!        │ ClientHandle                  │ ClientHandle
//!        ▼                               ▼
//!   ┌────────────────────────────────────────────┐
//!   │         Transport (pooled slots,           │
//!   │       explicit process lifecycle)          │
//!   └────────────────────────────────────────────┘
//! ```
//!
//! The canonical use is sense disambiguation followed by tagging-menu
//! generation: Stage A sends text for sense analysis, `derive_b` turns the
//! analysis result into a menu request, Stage B fetches the menu. The
//! runner guarantees strict A-before-B ordering, forwards the first failure
//! unchanged, and releases both client handles exactly once no matter how
//! the pipeline settles (success, failure, cancellation, or drop).

// Core
pub mod message;
pub mod pipeline;

// Remote-call capability plumbing
pub mod client;
pub mod transport;

// Cross-cutting concerns
pub mod cancel;
pub mod config;
pub mod error;
pub mod observability;

pub use cancel::{CancelSignal, CancelWatcher};
pub use client::ClientHandle;
pub use config::{Credentials, TransportConfig};
pub use error::{PipelineError, PipelineResult};
pub use message::{RemoteRequest, RemoteResponse};
pub use pipeline::{run, run_with_cancel, Stage};
pub use transport::Transport;
