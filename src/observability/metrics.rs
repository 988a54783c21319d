//! Metrics collection.
//!
//! # Metrics
//! - `pipeline_completed_total` (counter): pipeline settles by outcome
//!   (`success`, `failure`, `cancelled`)
//! - `transport_active_clients` (gauge): client handles currently
//!   checked out of the pool

/// Record a settled pipeline by outcome label.
pub fn record_pipeline_outcome(outcome: &'static str) {
    metrics::counter!("pipeline_completed_total", "outcome" => outcome).increment(1);
}

/// Record the current number of checked-out client handles.
pub fn record_active_clients(active: u64) {
    metrics::gauge!("transport_active_clients").set(active as f64);
}
