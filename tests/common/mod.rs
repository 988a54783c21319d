//! Shared utilities for pipeline integration tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sense_pipeline::{
    PipelineResult, RemoteRequest, RemoteResponse, Transport, TransportConfig,
};

/// Boxed stage-call future, so scripted calls share one concrete type.
pub type CallFuture = Pin<Box<dyn Future<Output = PipelineResult<RemoteResponse>> + Send>>;

/// Build a transport with the given pool capacity and a short grace period.
pub fn test_transport(max_clients: usize) -> Transport {
    Transport::new(TransportConfig {
        max_clients,
        shutdown_grace_secs: 1,
    })
}

/// New call counter for asserting how often a stage was invoked.
pub fn call_counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

/// A stage call that counts its invocation and resolves to a fixed result.
pub fn scripted_call(
    calls: Arc<AtomicUsize>,
    result: PipelineResult<RemoteResponse>,
) -> impl FnOnce(RemoteRequest) -> CallFuture {
    move |_req| {
        calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move { result })
    }
}

/// Like `scripted_call`, but also captures the request it was given.
pub fn recording_call(
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Option<RemoteRequest>>>,
    result: PipelineResult<RemoteResponse>,
) -> impl FnOnce(RemoteRequest) -> CallFuture {
    move |req| {
        calls.fetch_add(1, Ordering::SeqCst);
        *seen.lock().unwrap() = Some(req);
        Box::pin(async move { result })
    }
}

/// A stage call that counts its invocation and never resolves.
pub fn pending_call(calls: Arc<AtomicUsize>) -> impl FnOnce(RemoteRequest) -> CallFuture {
    move |_req| {
        calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(std::future::pending())
    }
}
