//! Dispatch counters for the contacts bridge.
//!
//! These track how requests and their results flow through the service, which
//! is the main tool for spotting lost or misrouted responses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counters shared by a `Contacts` service and its clones.
#[derive(Debug, Clone)]
pub struct DispatchMetrics {
    requests_issued_total: Arc<AtomicU64>,
    results_delivered_total: Arc<AtomicU64>,
    failures_delivered_total: Arc<AtomicU64>,
    handler_panics_total: Arc<AtomicU64>,
    malformed_payloads_total: Arc<AtomicU64>,
    unmatched_responses_total: Arc<AtomicU64>,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self {
            requests_issued_total: Arc::new(AtomicU64::new(0)),
            results_delivered_total: Arc::new(AtomicU64::new(0)),
            failures_delivered_total: Arc::new(AtomicU64::new(0)),
            handler_panics_total: Arc::new(AtomicU64::new(0)),
            malformed_payloads_total: Arc::new(AtomicU64::new(0)),
            unmatched_responses_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Track a call handed to the bridge.
    pub fn track_request(&self, action: &str) {
        self.requests_issued_total.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(action = %action, "Bridge request issued");
    }

    /// Track a handler invocation and whether it returned normally.
    pub fn track_delivery(&self, failure: bool, panicked: bool) {
        if failure {
            self.failures_delivered_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.results_delivered_total.fetch_add(1, Ordering::Relaxed);
        }
        if panicked {
            self.handler_panics_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn track_malformed_payload(&self) {
        self.malformed_payloads_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn track_unmatched_response(&self) {
        self.unmatched_responses_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_issued_total(&self) -> u64 {
        self.requests_issued_total.load(Ordering::Relaxed)
    }

    pub fn results_delivered_total(&self) -> u64 {
        self.results_delivered_total.load(Ordering::Relaxed)
    }

    pub fn failures_delivered_total(&self) -> u64 {
        self.failures_delivered_total.load(Ordering::Relaxed)
    }

    pub fn handler_panics_total(&self) -> u64 {
        self.handler_panics_total.load(Ordering::Relaxed)
    }

    pub fn malformed_payloads_total(&self) -> u64 {
        self.malformed_payloads_total.load(Ordering::Relaxed)
    }

    pub fn unmatched_responses_total(&self) -> u64 {
        self.unmatched_responses_total.load(Ordering::Relaxed)
    }

    /// Print a summary of all counters.
    pub fn summary(&self) -> String {
        format!(
            "Dispatch Summary:\n\
             Requests Issued: {}\n\
             Results Delivered: {}\n\
             Failures Delivered: {}\n\
             Handler Panics: {}\n\
             Malformed Payloads: {}\n\
             Unmatched Responses: {}",
            self.requests_issued_total(),
            self.results_delivered_total(),
            self.failures_delivered_total(),
            self.handler_panics_total(),
            self.malformed_payloads_total(),
            self.unmatched_responses_total(),
        )
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A timer for tracking how long a request waits for its answer.
pub struct Timer {
    start: Instant,
    operation: String,
}

impl Timer {
    /// Start a new timer for the given operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
        }
    }

    /// Finish the timer with a specific status and return the elapsed milliseconds.
    pub fn finish_with_status(self, success: bool) -> u128 {
        let duration_ms = self.start.elapsed().as_millis();

        if success {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation succeeded"
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation failed"
            );
        }

        duration_ms
    }
}
