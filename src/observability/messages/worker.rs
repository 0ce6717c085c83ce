// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-sample worker events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::process::ExitStatus;
use tracing::Span;

/// Worker task started; its span wraps the whole worker loop.
///
/// # Log Level
/// `debug!`
pub struct WorkerStarted {
    pub worker_index: usize,
}

impl Display for WorkerStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker {} started", self.worker_index)
    }
}

impl StructuredLog for WorkerStarted {
    fn log(&self) {
        tracing::debug!(worker_index = self.worker_index, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("worker", span_name = name, worker_index = self.worker_index)
    }
}

/// Sample processed and the solver output parsed.
///
/// # Log Level
/// `debug!` - One per sample
pub struct SampleCompleted {
    pub worker_index: usize,
    pub elapsed_seconds: f64,
}

impl Display for SampleCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} completed a sample in {:.3}s",
            self.worker_index, self.elapsed_seconds
        )
    }
}

impl StructuredLog for SampleCompleted {
    fn log(&self) {
        tracing::debug!(
            worker_index = self.worker_index,
            elapsed_seconds = self.elapsed_seconds,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("sample", span_name = name, worker_index = self.worker_index)
    }
}

/// Sample produced a failed result.
///
/// # Log Level
/// `warn!`
pub struct SampleFailed<'a> {
    pub worker_index: usize,
    pub error: &'a str,
}

impl Display for SampleFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker {} sample failed: {}", self.worker_index, self.error)
    }
}

impl StructuredLog for SampleFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            worker_index = self.worker_index,
            error = self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("sample", span_name = name, worker_index = self.worker_index)
    }
}

/// Postmortem for a solver that exited with a non-zero status or was killed.
///
/// Carries the request that was fed to the solver and both captured streams.
///
/// # Log Level
/// `warn!`
///
/// # Example
/// ```
/// use sim_dispatch::observability::messages::worker::SolverPostmortem;
///
/// # #[cfg(unix)]
/// # {
/// use std::os::unix::process::ExitStatusExt;
/// let status = std::process::ExitStatus::from_raw(1 << 8);
/// let msg = SolverPostmortem {
///     worker_index: 2,
///     status: &status,
///     terminated: false,
///     request: "{}",
///     stdout: "",
///     stderr: "solver: diverged",
/// };
///
/// assert!(msg.to_string().contains("solver: diverged"));
/// # }
/// ```
pub struct SolverPostmortem<'a> {
    pub worker_index: usize,
    pub status: &'a ExitStatus,
    /// Killed through cancellation rather than exiting on its own.
    pub terminated: bool,
    pub request: &'a str,
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl Display for SolverPostmortem<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let outcome = if self.terminated {
            "was terminated"
        } else {
            "exited"
        };
        writeln!(
            f,
            "Worker {}: simulation process {} ({})",
            self.worker_index, outcome, self.status
        )?;
        writeln!(f, "--- request ---\n{}", self.request)?;
        writeln!(f, "--- stdout ---\n{}", self.stdout)?;
        write!(f, "--- stderr ---\n{}", self.stderr)
    }
}

impl StructuredLog for SolverPostmortem<'_> {
    fn log(&self) {
        tracing::warn!(
            worker_index = self.worker_index,
            status = %self.status,
            terminated = self.terminated,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("sample", span_name = name, worker_index = self.worker_index)
    }
}

/// Worker loop ended: no samples left, canceled, or the processor went away.
///
/// # Log Level
/// `debug!`
pub struct WorkerExited {
    pub worker_index: usize,
    pub samples_processed: usize,
}

impl Display for WorkerExited {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} exited after {} samples",
            self.worker_index, self.samples_processed
        )
    }
}

impl StructuredLog for WorkerExited {
    fn log(&self) {
        tracing::debug!(
            worker_index = self.worker_index,
            samples_processed = self.samples_processed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("worker", span_name = name, worker_index = self.worker_index)
    }
}
