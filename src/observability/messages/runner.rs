// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for external solver processes.
//!
//! This module contains message types for logging events related to:
//! * Solver process creation
//! * Forced termination after cancellation

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::process::ExitStatus;
use tracing::Span;

/// Solver process spawned inside a sample workspace.
///
/// # Log Level
/// `debug!` - One per sample
///
/// # Example
/// ```
/// use sim_dispatch::observability::messages::runner::ProcessSpawned;
/// use std::path::Path;
///
/// let msg = ProcessSpawned {
///     executable: Path::new("/opt/diter/bin/dtr1d_main"),
///     workdir: Path::new("/tmp/sim_run.a1b2c3"),
///     pid: Some(4242),
/// };
///
/// assert!(msg.to_string().contains("pid=4242"));
/// ```
pub struct ProcessSpawned<'a> {
    pub executable: &'a Path,
    pub workdir: &'a Path,
    pub pid: Option<u32>,
}

impl Display for ProcessSpawned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.pid {
            Some(pid) => write!(
                f,
                "Spawned '{}' in '{}' (pid={})",
                self.executable.display(),
                self.workdir.display(),
                pid
            ),
            None => write!(
                f,
                "Spawned '{}' in '{}'",
                self.executable.display(),
                self.workdir.display()
            ),
        }
    }
}

impl StructuredLog for ProcessSpawned<'_> {
    fn log(&self) {
        tracing::debug!(
            executable = %self.executable.display(),
            workdir = %self.workdir.display(),
            pid = ?self.pid,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "solver_process",
            span_name = name,
            executable = %self.executable.display(),
            pid = ?self.pid,
        )
    }
}

/// Solver process killed after its worker was canceled.
///
/// # Log Level
/// `info!` - Operator-visible effect of a cancel or abort
pub struct ProcessTerminated<'a> {
    pub executable: &'a Path,
    pub status: &'a ExitStatus,
}

impl Display for ProcessTerminated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Terminated '{}' on cancellation ({})",
            self.executable.display(),
            self.status
        )
    }
}

impl StructuredLog for ProcessTerminated<'_> {
    fn log(&self) {
        tracing::info!(
            executable = %self.executable.display(),
            status = %self.status,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "solver_process",
            span_name = name,
            executable = %self.executable.display(),
        )
    }
}
