//! Shared transport with explicit process lifecycle.
//!
//! # Responsibilities
//! - Own the pooled connection capacity handed out to client handles
//! - Track how many handles are outstanding
//! - Provide explicit shutdown instead of a hidden global singleton
//!
//! # Design Decisions
//! - Created once per process and handed to call sites by reference
//! - Slot accounting goes through a semaphore, so release is effectively
//!   reference-counted even though each handle is exclusively owned
//! - After shutdown, acquisition fails with a transport error; handles
//!   already checked out keep working until released

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::Instant;

use crate::client::ClientHandle;
use crate::config::{Credentials, TransportConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::observability::metrics;

/// Pooled transport shared by all pipelines in the process.
#[derive(Debug)]
pub struct Transport {
    /// Pool capacity; closed on shutdown.
    slots: Arc<Semaphore>,
    /// Count of handles currently checked out.
    active: Arc<AtomicU64>,
    /// Configuration the transport was built with.
    config: TransportConfig,
    /// Credentials for the remote service, if resolved.
    credentials: Option<Credentials>,
}

impl Transport {
    /// Create a new transport from configuration.
    pub fn new(config: TransportConfig) -> Self {
        tracing::info!(
            max_clients = config.max_clients,
            shutdown_grace_secs = config.shutdown_grace_secs,
            "Transport initialized"
        );
        Self {
            slots: Arc::new(Semaphore::new(config.max_clients)),
            active: Arc::new(AtomicU64::new(0)),
            config,
            credentials: None,
        }
    }

    /// Attach credentials for the remote service.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Credentials attached to this transport, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Acquire a client handle for the named service, waiting for a free
    /// slot if the pool is exhausted.
    pub async fn client(&self, service: &str) -> PipelineResult<ClientHandle> {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| PipelineError::Transport("transport is shut down".to_string()))?;
        Ok(self.checked_out(service, permit))
    }

    /// Acquire a client handle without waiting; fails fast when the pool
    /// is exhausted or shut down.
    pub fn try_client(&self, service: &str) -> PipelineResult<ClientHandle> {
        let permit = Arc::clone(&self.slots).try_acquire_owned().map_err(|_| {
            PipelineError::Transport(format!(
                "no client slot available (capacity {})",
                self.config.max_clients
            ))
        })?;
        Ok(self.checked_out(service, permit))
    }

    fn checked_out(
        &self,
        service: &str,
        permit: tokio::sync::OwnedSemaphorePermit,
    ) -> ClientHandle {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_active_clients(active);
        let handle = ClientHandle::new(service, permit, Arc::clone(&self.active));
        tracing::debug!(
            client_id = %handle.id(),
            service = %service,
            active = active,
            "Client handle acquired"
        );
        handle
    }

    /// Number of handles currently checked out.
    pub fn active_clients(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Close the pool. Outstanding handles stay valid; new acquisitions
    /// fail with a transport error.
    pub fn shutdown(&self) {
        self.slots.close();
        tracing::info!(
            active = self.active_clients(),
            "Transport shut down"
        );
    }

    /// Whether the pool has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.slots.is_closed()
    }

    /// Shut down and wait up to the configured grace period for all
    /// outstanding handles to be released.
    pub async fn shutdown_and_wait(&self) {
        self.shutdown();
        let deadline = Instant::now() + Duration::from_secs(self.config.shutdown_grace_secs);
        while self.active_clients() > 0 {
            if Instant::now() >= deadline {
                tracing::warn!(
                    active = self.active_clients(),
                    "Transport shutdown grace period expired with handles outstanding"
                );
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tracing::info!("All client handles released");
    }
}
