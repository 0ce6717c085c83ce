// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for processor run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Run start and completion
//! * Coalesced progress notifications
//! * Cancellation and abort-on-error
//! * Worker task supervision

use crate::errors::ProcessorError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tokio::task::JoinError;
use tracing::Span;

/// Run started with its final sample and worker counts.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use sim_dispatch::observability::messages::processor::RunStarted;
///
/// let msg = RunStarted {
///     num_samples: 100,
///     num_workers: 8,
/// };
///
/// assert_eq!(msg.to_string(), "Starting simulation run: 100 samples on 8 workers");
/// ```
pub struct RunStarted {
    pub num_samples: usize,
    pub num_workers: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting simulation run: {} samples on {} workers",
            self.num_samples, self.num_workers
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            num_samples = self.num_samples,
            num_workers = self.num_workers,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "simulation_run",
            span_name = name,
            num_samples = self.num_samples,
            num_workers = self.num_workers,
        )
    }
}

/// Every worker has exited and the run is over.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunFinished {
    pub processed: usize,
    pub num_samples: usize,
    pub failed: usize,
    pub canceled: bool,
    pub aborted: bool,
    pub duration: Duration,
}

impl Display for RunFinished {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let state = if self.aborted {
            "aborted"
        } else if self.canceled {
            "canceled"
        } else {
            "completed"
        };
        write!(
            f,
            "Simulation run {} in {:.2?}: {}/{} samples processed, {} failed",
            state, self.duration, self.processed, self.num_samples, self.failed
        )
    }
}

impl StructuredLog for RunFinished {
    fn log(&self) {
        tracing::info!(
            processed = self.processed,
            num_samples = self.num_samples,
            failed = self.failed,
            canceled = self.canceled,
            aborted = self.aborted,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "simulation_run",
            span_name = name,
            processed = self.processed,
            failed = self.failed,
        )
    }
}

/// Coalesced progress notification emitted to subscribers.
///
/// # Log Level
/// `debug!` - Frequent
pub struct ProgressReported {
    pub processed: usize,
    pub num_samples: usize,
    pub failed: usize,
    pub eta_seconds: f64,
}

impl Display for ProgressReported {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.eta_seconds.is_finite() {
            write!(
                f,
                "Progress {}/{} ({} failed), about {:.0}s remaining",
                self.processed, self.num_samples, self.failed, self.eta_seconds
            )
        } else {
            write!(
                f,
                "Progress {}/{} ({} failed)",
                self.processed, self.num_samples, self.failed
            )
        }
    }
}

impl StructuredLog for ProgressReported {
    fn log(&self) {
        tracing::debug!(
            processed = self.processed,
            num_samples = self.num_samples,
            failed = self.failed,
            eta_seconds = self.eta_seconds,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "progress",
            span_name = name,
            processed = self.processed,
            num_samples = self.num_samples,
        )
    }
}

/// `cancel_processing` was called.
///
/// # Log Level
/// `info!` - Operator action
pub struct CancelRequested {
    /// Whether a run was active at the time of the request.
    pub active: bool,
}

impl Display for CancelRequested {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.active {
            write!(f, "Cancellation requested, stopping workers")
        } else {
            write!(f, "Cancellation requested while idle")
        }
    }
}

impl StructuredLog for CancelRequested {
    fn log(&self) {
        tracing::info!(active = self.active, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("cancel", span_name = name, active = self.active)
    }
}

/// A failed sample triggered abort-on-error.
///
/// # Log Level
/// `warn!` - The run ends early
pub struct AbortTriggered<'a> {
    pub error: &'a str,
}

impl Display for AbortTriggered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Aborting run after failed sample: {}", self.error)
    }
}

impl StructuredLog for AbortTriggered<'_> {
    fn log(&self) {
        tracing::warn!(error = self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("abort", span_name = name)
    }
}

/// A worker task panicked or was aborted instead of returning.
///
/// # Log Level
/// `error!` - Indicates a bug in a sample handler
pub struct WorkerJoinFailed<'a> {
    pub worker_index: usize,
    pub error: &'a JoinError,
}

impl Display for WorkerJoinFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker {} terminated abnormally: {}", self.worker_index, self.error)
    }
}

impl StructuredLog for WorkerJoinFailed<'_> {
    fn log(&self) {
        tracing::error!(
            worker_index = self.worker_index,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("worker", span_name = name, worker_index = self.worker_index)
    }
}

/// `start` rejected its parameters.
///
/// # Log Level
/// `warn!` - The caller receives the error as well
pub struct StartRejected<'a> {
    pub error: &'a ProcessorError,
}

impl Display for StartRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Simulation run not started: {}", self.error)
    }
}

impl StructuredLog for StartRejected<'_> {
    fn log(&self) {
        tracing::warn!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("simulation_run", span_name = name)
    }
}
