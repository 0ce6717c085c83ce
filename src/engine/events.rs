// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::engine::SimulationResult;

/// Cumulative progress of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressReport {
    /// Results received so far, successful or not.
    pub processed: usize,
    pub failed: usize,
    /// Estimated seconds until the run completes; NaN when unknown.
    pub eta_seconds: f64,
}

/// Notifications for the presentation layer, delivered over a broadcast channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorEvent {
    Started { num_samples: usize },
    Progress(ProgressReport),
    Finished,
}

/// Messages from worker tasks to the processor's control task.
///
/// A worker's results always precede its `Finished` on the channel.
#[derive(Debug)]
pub(crate) enum WorkerEvent<P> {
    ResultReady(SimulationResult<P>),
    Finished(usize),
}
