// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::consts::{
    DEFAULT_ETA_WINDOW, DEFAULT_PROGRESS_INTERVAL_MS, EVENT_CHANNEL_CAPACITY,
};
use crate::engine::progress::sleep_until_opt;
use crate::engine::worker::{Worker, WorkerHandle};
use crate::engine::{
    estimate_remaining_time, ProcessorEvent, ProgressDebounce, ProgressReport, SimulationResult,
    WorkerEvent,
};
use crate::errors::ProcessorError;
use crate::observability::messages::processor::{
    AbortTriggered, CancelRequested, ProgressReported, RunFinished, RunStarted, StartRejected,
    WorkerJoinFailed,
};
use crate::observability::messages::StructuredLog;
use crate::runner::ExternalRunner;
use crate::traits::{RunPlan, SampleFeed, SampleHandler, SimulationDriver};

type SampleOf<D> = <<D as SimulationDriver>::Handler as SampleHandler>::Sample;
type PayloadOf<D> = <<D as SimulationDriver>::Handler as SampleHandler>::Payload;

/// Processor policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorOptions {
    /// Cancel the run on the first failed sample.
    pub abort_on_error: bool,
    /// Coalescing window for progress notifications.
    pub progress_interval: Duration,
    /// Number of recent elapsed times feeding the ETA median.
    pub eta_window: usize,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            abort_on_error: false,
            progress_interval: Duration::from_millis(DEFAULT_PROGRESS_INTERVAL_MS),
            eta_window: DEFAULT_ETA_WINDOW,
        }
    }
}

/// Run flags plus the run's cancellation token.
///
/// Flag resets and cancel requests take the token lock, so a cancel racing a
/// `start` either lands entirely before the new run or entirely inside it.
#[derive(Debug, Default)]
struct RunStatus {
    active: AtomicBool,
    canceled: AtomicBool,
    aborted: AtomicBool,
    token: std::sync::Mutex<CancellationToken>,
}

impl RunStatus {
    fn accepts_work(&self) -> bool {
        self.active.load(Ordering::SeqCst)
            && !self.canceled.load(Ordering::SeqCst)
            && !self.aborted.load(Ordering::SeqCst)
    }

    /// Clear the stop flags and install a fresh token for the next run.
    fn begin_run(&self) -> CancellationToken {
        let mut token = lock_token(&self.token);
        self.canceled.store(false, Ordering::SeqCst);
        self.aborted.store(false, Ordering::SeqCst);
        *token = CancellationToken::new();
        token.clone()
    }

    fn cancel(&self) {
        let token = lock_token(&self.token);
        self.canceled.store(true, Ordering::SeqCst);
        token.cancel();
    }

    /// Returns true for the first abort of the run.
    fn abort(&self) -> bool {
        let token = lock_token(&self.token);
        let first = !self.aborted.swap(true, Ordering::SeqCst);
        token.cancel();
        first
    }

    #[cfg(test)]
    fn current_token(&self) -> CancellationToken {
        lock_token(&self.token).clone()
    }
}

struct Shared<D: SimulationDriver> {
    /// Distribution lock: the sample cursor lives inside the driver.
    driver: Mutex<D>,
    status: RunStatus,
    num_samples: AtomicUsize,
    num_workers: AtomicUsize,
    results: Mutex<Vec<SimulationResult<PayloadOf<D>>>>,
    control: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<ProcessorEvent>,
    runner: ExternalRunner,
    options: ProcessorOptions,
}

/// Concurrent simulation processing engine.
///
/// Fans the samples of a run out over a fixed pool of workers, each driving
/// the external solver through the shared [`ExternalRunner`]. Results are
/// collected in arrival order; lifecycle and coalesced progress are published
/// as [`ProcessorEvent`]s.
///
/// One run at a time: `start` while a run is active fails with
/// [`ProcessorError::AlreadyActive`]. Every `start` resets results and flags.
///
/// # Example
/// ```no_run
/// use sim_dispatch::backends::{BatchDriver, BatchParams};
/// use sim_dispatch::engine::{ProcessorEvent, ProcessorOptions, SimulationProcessor};
/// use sim_dispatch::runner::{ExternalRunner, RunnerConfig};
/// use sim_dispatch::traits::SampleHandler;
///
/// # async fn demo<H: SampleHandler + Clone>(handler: H, samples: Vec<H::Sample>) {
/// let runner = ExternalRunner::new(RunnerConfig::new("/opt/diter/bin/dtr1d_main"));
/// let processor = SimulationProcessor::new(BatchDriver::new(handler), runner, ProcessorOptions::default());
///
/// let mut events = processor.subscribe();
/// processor.start(BatchParams::new(samples, 4)).await.unwrap();
///
/// while let Ok(event) = events.recv().await {
///     if event == ProcessorEvent::Finished {
///         break;
///     }
/// }
/// let results = processor.results().await;
/// # let _ = results;
/// # }
/// ```
pub struct SimulationProcessor<D: SimulationDriver> {
    shared: Arc<Shared<D>>,
}

impl<D: SimulationDriver> SimulationProcessor<D> {
    pub fn new(driver: D, runner: ExternalRunner, options: ProcessorOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                driver: Mutex::new(driver),
                status: RunStatus::default(),
                num_samples: AtomicUsize::new(0),
                num_workers: AtomicUsize::new(0),
                results: Mutex::new(Vec::new()),
                control: Mutex::new(None),
                events,
                runner,
                options,
            }),
        }
    }

    /// Start a run.
    ///
    /// Returns once every worker has been spawned; completion is observed
    /// through [`ProcessorEvent::Finished`] or [`Self::wait_until_finished`].
    pub async fn start(&self, params: D::Params) -> Result<(), ProcessorError> {
        let started = self.try_start(params).await;
        if let Err(error) = &started {
            StartRejected { error }.log();
        }
        started
    }

    async fn try_start(&self, params: D::Params) -> Result<(), ProcessorError> {
        let shared = &self.shared;
        let mut driver = shared.driver.lock().await;

        if shared.status.active.load(Ordering::SeqCst) {
            return Err(ProcessorError::AlreadyActive);
        }

        let mut plan = RunPlan::new();
        driver.initialize_run(params, &mut plan)?;
        let (num_samples, num_workers) = plan.validate()?;

        shared.num_samples.store(num_samples, Ordering::SeqCst);
        shared.num_workers.store(num_workers, Ordering::SeqCst);
        shared.results.lock().await.clear();

        let run_token = shared.status.begin_run();

        let (tx, rx) = mpsc::unbounded_channel();
        let feed: Arc<dyn SampleFeed<SampleOf<D>>> = Arc::new(Dispatch {
            shared: Arc::clone(shared),
        });
        let workers: Vec<Worker<D::Handler>> = (0..num_workers)
            .map(|index| {
                Worker::new(
                    index,
                    driver.create_worker(index),
                    Arc::clone(&feed),
                    shared.runner.clone(),
                    run_token.child_token(),
                    tx.clone(),
                )
            })
            .collect();
        drop(tx);

        shared.status.active.store(true, Ordering::SeqCst);
        let _ = shared.events.send(ProcessorEvent::Started { num_samples });

        let run = RunStarted {
            num_samples,
            num_workers,
        };
        let span = run.span("simulation_run");
        run.log();

        let handles: HashMap<usize, WorkerHandle> = {
            let _entered = span.enter();
            workers
                .into_iter()
                .enumerate()
                .map(|(index, worker)| (index, worker.spawn()))
                .collect()
        };

        let control = tokio::spawn(
            control_loop(Arc::clone(shared), rx, handles, Instant::now()).instrument(span),
        );
        *shared.control.lock().await = Some(control);

        Ok(())
    }

    /// Stop distributing samples and kill every running solver process.
    ///
    /// Idempotent and non-blocking; completion is still reported through
    /// [`ProcessorEvent::Finished`].
    pub fn cancel_processing(&self) {
        CancelRequested {
            active: self.is_active(),
        }
        .log();
        self.shared.status.cancel();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProcessorEvent> {
        self.shared.events.subscribe()
    }

    /// Wait for the current run's control task; returns immediately when idle.
    pub async fn wait_until_finished(&self) {
        let mut control = self.shared.control.lock().await;
        if let Some(handle) = control.as_mut() {
            // The control task never panics; a JoinError here means runtime shutdown.
            let _ = handle.await;
            *control = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared.status.active.load(Ordering::SeqCst)
    }

    pub fn was_canceled(&self) -> bool {
        self.shared.status.canceled.load(Ordering::SeqCst)
    }

    pub fn was_aborted(&self) -> bool {
        self.shared.status.aborted.load(Ordering::SeqCst)
    }

    pub fn num_samples(&self) -> usize {
        self.shared.num_samples.load(Ordering::SeqCst)
    }

    pub fn num_workers(&self) -> usize {
        self.shared.num_workers.load(Ordering::SeqCst)
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.shared.options
    }

    /// Snapshot of the results received so far, in arrival order.
    pub async fn results(&self) -> Vec<SimulationResult<PayloadOf<D>>> {
        self.shared.results.lock().await.clone()
    }
}

impl<D: SimulationDriver> Shared<D> {
    async fn on_result_ready(
        &self,
        result: SimulationResult<PayloadOf<D>>,
        debounce: &mut ProgressDebounce,
    ) {
        let failed = !result.succeeded;
        let error = result.error_message.clone();
        self.results.lock().await.push(result);

        if failed && self.options.abort_on_error {
            if self.status.abort() {
                AbortTriggered {
                    error: error.as_deref().unwrap_or("sample failed"),
                }
                .log();
            }
            return;
        }

        debounce.arm();
    }

    async fn emit_progress(&self) {
        // The run may have ended or been stopped while the timer was pending.
        if !self.status.accepts_work() {
            return;
        }

        let num_samples = self.num_samples.load(Ordering::SeqCst);
        let report = {
            let results = self.results.lock().await;
            ProgressReport {
                processed: results.len(),
                failed: results.iter().filter(|result| !result.succeeded).count(),
                eta_seconds: estimate_remaining_time(
                    results.as_slice(),
                    num_samples,
                    self.num_workers.load(Ordering::SeqCst),
                    self.options.eta_window,
                ),
            }
        };

        ProgressReported {
            processed: report.processed,
            num_samples,
            failed: report.failed,
            eta_seconds: report.eta_seconds,
        }
        .log();
        let _ = self.events.send(ProcessorEvent::Progress(report));
    }

    async fn finish(&self, started: Instant) {
        let (processed, failed) = {
            let results = self.results.lock().await;
            let failed = results.iter().filter(|result| !result.succeeded).count();
            (results.len(), failed)
        };

        // Under the distribution lock so a new `start` cannot interleave.
        let _driver = self.driver.lock().await;
        self.status.active.store(false, Ordering::SeqCst);

        RunFinished {
            processed,
            num_samples: self.num_samples.load(Ordering::SeqCst),
            failed,
            canceled: self.status.canceled.load(Ordering::SeqCst),
            aborted: self.status.aborted.load(Ordering::SeqCst),
            duration: started.elapsed(),
        }
        .log();
        let _ = self.events.send(ProcessorEvent::Finished);
    }
}

/// Worker-side view of the processor: the single serialized pull point.
struct Dispatch<D: SimulationDriver> {
    shared: Arc<Shared<D>>,
}

#[async_trait]
impl<D: SimulationDriver> SampleFeed<SampleOf<D>> for Dispatch<D> {
    async fn next_sample(&self) -> Option<SampleOf<D>> {
        let mut driver = self.shared.driver.lock().await;
        if !self.shared.status.accepts_work() {
            return None;
        }
        driver.create_sample()
    }
}

async fn control_loop<D: SimulationDriver>(
    shared: Arc<Shared<D>>,
    mut events: mpsc::UnboundedReceiver<WorkerEvent<PayloadOf<D>>>,
    mut workers: HashMap<usize, WorkerHandle>,
    started: Instant,
) {
    let mut debounce = ProgressDebounce::new(shared.options.progress_interval);

    while !workers.is_empty() {
        let deadline = debounce.deadline();
        tokio::select! {
            event = events.recv() => match event {
                Some(WorkerEvent::ResultReady(result)) => {
                    shared.on_result_ready(result, &mut debounce).await;
                }
                Some(WorkerEvent::Finished(index)) => {
                    if let Some(handle) = workers.remove(&index) {
                        join_worker(index, handle).await;
                    }
                }
                None => {
                    for (index, handle) in workers.drain() {
                        handle.cancel();
                        join_worker(index, handle).await;
                    }
                }
            },
            _ = sleep_until_opt(deadline) => {
                debounce.reset();
                shared.emit_progress().await;
            }
        }
    }

    shared.finish(started).await;
}

async fn join_worker(index: usize, handle: WorkerHandle) {
    if let Err(error) = handle.join.await {
        WorkerJoinFailed {
            worker_index: index,
            error: &error,
        }
        .log();
    }
}

fn lock_token(token: &std::sync::Mutex<CancellationToken>) -> MutexGuard<'_, CancellationToken> {
    token.lock().unwrap_or_else(PoisonError::into_inner)
}
