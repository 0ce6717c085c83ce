// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::engine::{SimulationResult, WorkerEvent};
use crate::errors::SampleResult;
use crate::observability::messages::worker::{
    SampleCompleted, SampleFailed, SolverPostmortem, WorkerExited, WorkerStarted,
};
use crate::observability::messages::StructuredLog;
use crate::runner::ExternalRunner;
use crate::traits::{SampleFeed, SampleHandler};

/// One thread of control of the processor.
///
/// Pulls samples from its feed until the feed runs dry, runs the solver for
/// each and reports every result to the control task. A sample never ends
/// the loop; any error becomes a failed result.
pub(crate) struct Worker<H: SampleHandler> {
    index: usize,
    handler: H,
    feed: Arc<dyn SampleFeed<H::Sample>>,
    runner: ExternalRunner,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<WorkerEvent<H::Payload>>,
}

/// Control-side handle of a spawned worker.
pub(crate) struct WorkerHandle {
    cancel: CancellationToken,
    pub(crate) join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Kill the worker's running solver process, if any. Idempotent.
    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Reports the worker's exit when dropped, including during a panic unwind,
/// so the control task never waits on a worker that is gone.
struct FinishGuard<P> {
    index: usize,
    events: mpsc::UnboundedSender<WorkerEvent<P>>,
}

impl<P> Drop for FinishGuard<P> {
    fn drop(&mut self) {
        // The control task only disappears together with the whole processor.
        let _ = self.events.send(WorkerEvent::Finished(self.index));
    }
}

impl<H: SampleHandler> Worker<H> {
    pub(crate) fn new(
        index: usize,
        handler: H,
        feed: Arc<dyn SampleFeed<H::Sample>>,
        runner: ExternalRunner,
        cancel: CancellationToken,
        events: mpsc::UnboundedSender<WorkerEvent<H::Payload>>,
    ) -> Self {
        Self {
            index,
            handler,
            feed,
            runner,
            cancel,
            events,
        }
    }

    /// Start the worker loop on the runtime.
    pub(crate) fn spawn(self) -> WorkerHandle {
        let cancel = self.cancel.clone();
        let started = WorkerStarted {
            worker_index: self.index,
        };
        let span = started.span("worker");
        started.log();

        let join = tokio::spawn(self.run().instrument(span));
        WorkerHandle { cancel, join }
    }

    async fn run(self) {
        let _finished = FinishGuard {
            index: self.index,
            events: self.events.clone(),
        };

        let mut samples_processed = 0;
        while let Some(sample) = self.feed.next_sample().await {
            let result = self.process_sample(sample).await;
            samples_processed += 1;

            if self.events.send(WorkerEvent::ResultReady(result)).is_err() {
                break;
            }
        }

        WorkerExited {
            worker_index: self.index,
            samples_processed,
        }
        .log();
    }

    async fn process_sample(&self, sample: H::Sample) -> SimulationResult<H::Payload> {
        let started = Instant::now();

        match self.try_process_sample(&sample, started).await {
            Ok(result) => {
                match &result.error_message {
                    Some(error) if !result.succeeded => SampleFailed {
                        worker_index: self.index,
                        error,
                    }
                    .log(),
                    _ => SampleCompleted {
                        worker_index: self.index,
                        elapsed_seconds: result.elapsed_time,
                    }
                    .log(),
                }
                result
            }
            Err(e) => {
                let message = format!("Unhandled exception: {}", e);
                SampleFailed {
                    worker_index: self.index,
                    error: &message,
                }
                .log();
                SimulationResult::failed(message)
            }
        }
    }

    async fn try_process_sample(
        &self,
        sample: &H::Sample,
        started: Instant,
    ) -> SampleResult<SimulationResult<H::Payload>> {
        let mut result = SimulationResult::pending(self.handler.initialize_result(sample));

        // Removed from disk when dropped at the end of this call, on every path.
        let workspace = self.runner.prepare_workspace()?;
        workspace.write_request(&self.handler.build_request(sample)?)?;

        let outcome = self.runner.execute(&workspace, &self.cancel).await?;

        if outcome.succeeded() {
            let table = workspace.read_output_table()?;
            result.succeeded = true;
            self.handler.finalize_result(&mut result.payload, &table)?;
        } else {
            result.succeeded = false;
            result.error_message = Some(if outcome.terminated {
                "simulation process was terminated".to_string()
            } else {
                format!(
                    "simulation process exited with non-zero status ({})",
                    outcome.status
                )
            });
            SolverPostmortem {
                worker_index: self.index,
                status: &outcome.status,
                terminated: outcome.terminated,
                request: &workspace.request_text(),
                stdout: &outcome.stdout,
                stderr: &outcome.stderr,
            }
            .log();
        }

        result.elapsed_time = started.elapsed().as_secs_f64();
        Ok(result)
    }
}
