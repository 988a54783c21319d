//! Client handle lifecycle tracking.
//!
//! # Responsibilities
//! - Represent an exclusively-owned lease on one transport pool slot
//! - Guarantee the slot is returned exactly once (idempotent release)
//! - Generate unique client IDs for tracing

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedSemaphorePermit;

use crate::observability::metrics;

/// Global atomic counter for client handle IDs.
/// Relaxed ordering is sufficient since we only need uniqueness.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a client handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(u64);

impl ClientId {
    /// Generate a new unique client ID.
    pub fn new() -> Self {
        Self(CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// A lease on one slot of the transport's connection pool.
///
/// The handle is exclusively owned by the pipeline stage it was created
/// for. [`ClientHandle::release`] returns the slot and may be called any
/// number of times; only the first call has an effect. Dropping an
/// unreleased handle releases it, so the slot is returned on every exit
/// path including cancellation and unwind.
#[derive(Debug)]
pub struct ClientHandle {
    id: ClientId,
    service: String,
    permit: Mutex<Option<OwnedSemaphorePermit>>,
    active: Arc<AtomicU64>,
}

impl ClientHandle {
    pub(crate) fn new(
        service: impl Into<String>,
        permit: OwnedSemaphorePermit,
        active: Arc<AtomicU64>,
    ) -> Self {
        Self {
            id: ClientId::new(),
            service: service.into(),
            permit: Mutex::new(Some(permit)),
            active,
        }
    }

    /// Get this handle's ID.
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// The remote service this handle was acquired for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Whether the slot has already been returned.
    pub fn is_released(&self) -> bool {
        match self.permit.lock() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }

    /// Return the slot to the transport pool. Idempotent.
    pub fn release(&self) {
        let permit = match self.permit.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(permit) = permit {
            drop(permit);
            let remaining = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
            metrics::record_active_clients(remaining);
            tracing::debug!(
                client_id = %self.id,
                service = %self.service,
                active = remaining,
                "Client handle released"
            );
        }
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_unique() {
        let id1 = ClientId::new();
        let id2 = ClientId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn client_id_display() {
        let id = ClientId::new();
        assert!(id.to_string().starts_with("client-"));
    }
}
