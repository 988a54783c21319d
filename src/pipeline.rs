//! Two-stage async pipeline runner.
//!
//! # Data Flow
//! ```text
//! run(request):
//!     → Stage A remote call (suspension point)
//!     → On success: derive_b(&response_a), pure and non-blocking
//!     → Stage B remote call (suspension point)
//!     → Settle: release both client handles, exactly once
//! ```
//!
//! # Design Decisions
//! - Stage B is never started unless Stage A settled successfully
//! - The first failure from either stage is forwarded unchanged; no
//!   retries, no wrapping
//! - Handles are released explicitly after the pipeline settles; their
//!   Drop impls cover the paths that never reach the explicit release
//!   (caller drops the future, panic unwind)
//! - Release problems are logged, never allowed to replace the result

use std::future::Future;

use uuid::Uuid;

use crate::cancel::CancelWatcher;
use crate::client::ClientHandle;
use crate::error::{PipelineError, PipelineResult};
use crate::message::{RemoteRequest, RemoteResponse};
use crate::observability::metrics;

/// Unique identifier for one pipeline execution, carried in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineId(Uuid);

impl PipelineId {
    /// Generate a new pipeline ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PipelineId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PipelineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A remote-call capability: the client handle that backs the call, plus
/// the async call itself.
///
/// The call takes an immutable [`RemoteRequest`] and resolves to either a
/// [`RemoteResponse`] or a client error. The handle exists purely for
/// resource lifecycle; the runner releases it when the pipeline settles.
pub struct Stage<F> {
    client: ClientHandle,
    call: F,
}

impl<F, Fut> Stage<F>
where
    F: FnOnce(RemoteRequest) -> Fut,
    Fut: Future<Output = PipelineResult<RemoteResponse>>,
{
    /// Bundle a client handle with the remote call it backs.
    pub fn new(client: ClientHandle, call: F) -> Self {
        Self { client, call }
    }
}

/// Execute a two-stage pipeline to completion.
///
/// Invokes Stage A, derives Stage B's request from Stage A's response with
/// the pure function `derive_b`, invokes Stage B, and returns Stage B's
/// result. If Stage A fails, Stage B is never invoked and the pipeline
/// settles with Stage A's error unchanged. Both client handles are
/// released exactly once after the pipeline settles, whatever the outcome.
pub async fn run<Fa, FutA, D, Fb, FutB>(
    request: RemoteRequest,
    stage_a: Stage<Fa>,
    derive_b: D,
    stage_b: Stage<Fb>,
) -> PipelineResult<RemoteResponse>
where
    Fa: FnOnce(RemoteRequest) -> FutA,
    FutA: Future<Output = PipelineResult<RemoteResponse>>,
    D: FnOnce(&RemoteResponse) -> RemoteRequest,
    Fb: FnOnce(RemoteRequest) -> FutB,
    FutB: Future<Output = PipelineResult<RemoteResponse>>,
{
    let id = PipelineId::new();
    let Stage { client: client_a, call: call_a } = stage_a;
    let Stage { client: client_b, call: call_b } = stage_b;

    tracing::debug!(pipeline_id = %id, "Pipeline started");
    let result = execute(id, request, call_a, derive_b, call_b).await;
    settle(id, result, client_a, client_b)
}

/// Like [`run`], but also settles with [`PipelineError::Cancelled`] if the
/// watcher fires first.
///
/// Cancellation before Stage A settles guarantees Stage B never starts;
/// cleanup of both handles still runs.
pub async fn run_with_cancel<Fa, FutA, D, Fb, FutB>(
    request: RemoteRequest,
    stage_a: Stage<Fa>,
    derive_b: D,
    stage_b: Stage<Fb>,
    mut cancel: CancelWatcher,
) -> PipelineResult<RemoteResponse>
where
    Fa: FnOnce(RemoteRequest) -> FutA,
    FutA: Future<Output = PipelineResult<RemoteResponse>>,
    D: FnOnce(&RemoteResponse) -> RemoteRequest,
    Fb: FnOnce(RemoteRequest) -> FutB,
    FutB: Future<Output = PipelineResult<RemoteResponse>>,
{
    let id = PipelineId::new();
    let Stage { client: client_a, call: call_a } = stage_a;
    let Stage { client: client_b, call: call_b } = stage_b;

    tracing::debug!(pipeline_id = %id, "Pipeline started");
    let result = tokio::select! {
        result = execute(id, request, call_a, derive_b, call_b) => result,
        _ = cancel.cancelled() => Err(PipelineError::Cancelled),
    };
    settle(id, result, client_a, client_b)
}

/// The sequential core: A, then derive, then B.
async fn execute<Fa, FutA, D, Fb, FutB>(
    id: PipelineId,
    request: RemoteRequest,
    call_a: Fa,
    derive_b: D,
    call_b: Fb,
) -> PipelineResult<RemoteResponse>
where
    Fa: FnOnce(RemoteRequest) -> FutA,
    FutA: Future<Output = PipelineResult<RemoteResponse>>,
    D: FnOnce(&RemoteResponse) -> RemoteRequest,
    Fb: FnOnce(RemoteRequest) -> FutB,
    FutB: Future<Output = PipelineResult<RemoteResponse>>,
{
    let response_a = call_a(request).await?;
    tracing::debug!(pipeline_id = %id, "Stage A settled successfully");

    let request_b = derive_b(&response_a);
    call_b(request_b).await
}

/// Release both handles and record the outcome. Runs after the pipeline
/// has settled and before the result reaches the caller.
fn settle(
    id: PipelineId,
    result: PipelineResult<RemoteResponse>,
    client_a: ClientHandle,
    client_b: ClientHandle,
) -> PipelineResult<RemoteResponse> {
    client_a.release();
    client_b.release();

    match &result {
        Ok(_) => {
            metrics::record_pipeline_outcome("success");
            tracing::info!(pipeline_id = %id, "Pipeline completed");
        }
        Err(PipelineError::Cancelled) => {
            metrics::record_pipeline_outcome("cancelled");
            tracing::info!(pipeline_id = %id, "Pipeline cancelled");
        }
        Err(e) => {
            metrics::record_pipeline_outcome("failure");
            tracing::warn!(pipeline_id = %id, error = %e, "Pipeline failed");
        }
    }
    result
}
