//! Check session - runs availability probes over a candidate list
//!
//! A session owns its state machine, its stop token, the worker task and the
//! result store the worker fills. Callers receive progress through a bounded
//! channel they drain on their own schedule and read results as snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::checker::{AvailabilityProbe, GithubChecker};
use crate::error::{NameCheckError, Result};
use crate::invalid_input;
use crate::store::ResultStore;
use crate::types::{CheckConfig, CheckResult, ProgressEvent, SessionState, SessionSummary};

/// Cooperative cancellation flag, observed between candidates
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the running session to stop before its next candidate
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Receiving side of a session's progress channel
#[derive(Debug)]
pub struct ProgressReceiver {
    rx: mpsc::Receiver<ProgressEvent>,
    closed: bool,
}

impl ProgressReceiver {
    /// Take every buffered event without waiting
    pub fn drain(&mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
        events
    }

    /// Wait for the next event; `None` once the worker is done and the buffer is empty
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        let event = self.rx.recv().await;
        if event.is_none() {
            self.closed = true;
        }
        event
    }

    /// True once the worker has exited and all events were consumed
    pub fn is_finished(&self) -> bool {
        self.closed
    }
}

#[derive(Debug, Default)]
struct Shared {
    state: SessionState,
    store: ResultStore,
    processed: usize,
    total: usize,
    stopped_early: bool,
}

impl Shared {
    fn summary(&self) -> SessionSummary {
        SessionSummary {
            available: self.store.available.len(),
            unavailable: self.store.unavailable.len(),
            errors: self.store.errors.len(),
            processed: self.processed,
            total: self.total,
            stopped_early: self.stopped_early,
        }
    }
}

/// Orchestrates one check run at a time
pub struct CheckSession {
    probe: Arc<dyn AvailabilityProbe>,
    concurrency: usize,
    channel_capacity: usize,
    shared: Arc<Mutex<Shared>>,
    stop: StopToken,
    worker: Option<JoinHandle<()>>,
}

impl CheckSession {
    /// Create a sequential session over the given probe
    pub fn new(probe: Arc<dyn AvailabilityProbe>) -> Self {
        let defaults = CheckConfig::default();
        Self {
            probe,
            concurrency: defaults.concurrency,
            channel_capacity: defaults.channel_capacity,
            shared: Arc::new(Mutex::new(Shared::default())),
            stop: StopToken::new(),
            worker: None,
        }
    }

    /// Create a session using the concurrency and buffering settings of `config`
    pub fn with_config(probe: Arc<dyn AvailabilityProbe>, config: &CheckConfig) -> Result<Self> {
        config.validate()?;
        let mut session = Self::new(probe);
        session.concurrency = config.concurrency;
        session.channel_capacity = config.channel_capacity;
        Ok(session)
    }

    /// Create a session probing GitHub profiles
    pub fn github(config: &CheckConfig) -> Result<Self> {
        let checker = GithubChecker::with_config(config)?;
        Self::with_config(Arc::new(checker), config)
    }

    /// Start checking `candidates` in order
    ///
    /// Fails with [`NameCheckError::SessionAlreadyRunning`] while a previous
    /// run is still going. Each run starts with an empty result store.
    pub async fn start(&mut self, candidates: Vec<String>) -> Result<ProgressReceiver> {
        if self.worker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(NameCheckError::SessionAlreadyRunning);
        }
        if candidates.is_empty() {
            return Err(invalid_input!("No candidates to check"));
        }

        if let Err(e) = self.join_worker().await {
            tracing::warn!(error = %e, "Previous check worker did not finish cleanly");
        }
        self.stop.reset();

        {
            let mut shared = self.shared.lock();
            *shared = Shared {
                state: SessionState::Running,
                total: candidates.len(),
                ..Default::default()
            };
        }

        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let worker = Worker {
            probe: Arc::clone(&self.probe),
            shared: Arc::clone(&self.shared),
            stop: self.stop.clone(),
            concurrency: self.concurrency,
        };
        self.worker = Some(tokio::spawn(worker.run(candidates, tx)));

        Ok(ProgressReceiver { rx, closed: false })
    }

    /// Run to completion, handing every event to `on_progress`
    pub async fn run<F>(&mut self, candidates: Vec<String>, mut on_progress: F) -> Result<SessionSummary>
    where
        F: FnMut(&ProgressEvent),
    {
        let mut events = self.start(candidates).await?;
        while let Some(event) = events.recv().await {
            on_progress(&event);
        }
        self.wait().await
    }

    /// Ask the worker to stop before its next candidate
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Handle to this session's stop flag
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    /// Snapshot of the results recorded so far
    pub fn results(&self) -> ResultStore {
        self.shared.lock().store.clone()
    }

    pub fn summary(&self) -> SessionSummary {
        self.shared.lock().summary()
    }

    /// Wait for the worker to exit
    ///
    /// The progress channel is bounded: keep draining it (or drop the
    /// receiver) while waiting, or a full buffer will hold the worker.
    pub async fn wait(&mut self) -> Result<SessionSummary> {
        self.join_worker().await?;
        Ok(self.summary())
    }

    async fn join_worker(&mut self) -> Result<()> {
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };

        if let Err(e) = handle.await {
            // a worker that died never reached its own Stopped transition
            self.shared.lock().state = SessionState::Stopped;
            return Err(NameCheckError::internal(format!("Check worker failed: {}", e)));
        }
        Ok(())
    }
}

impl Drop for CheckSession {
    fn drop(&mut self) {
        self.stop.stop();
    }
}

struct Worker {
    probe: Arc<dyn AvailabilityProbe>,
    shared: Arc<Mutex<Shared>>,
    stop: StopToken,
    concurrency: usize,
}

impl Worker {
    async fn run(self, candidates: Vec<String>, tx: mpsc::Sender<ProgressEvent>) {
        let total = candidates.len();
        let start_time = Instant::now();

        tracing::info!(
            total,
            concurrency = self.concurrency,
            target = %self.probe.target(),
            "Check session started"
        );

        // `buffered` yields in input order, so recording and progress stay
        // ordered even when several probes are in flight.
        let probe = Arc::clone(&self.probe);
        let stop = self.stop.clone();
        let mut results = stream::iter(candidates)
            .map(move |candidate| {
                let probe = Arc::clone(&probe);
                let stop = stop.clone();
                async move {
                    if stop.is_stopped() {
                        return None;
                    }
                    Some(probe.check(&candidate).await)
                }
            })
            .buffered(self.concurrency);

        let mut processed = 0usize;
        let mut emitting = true;

        while let Some(result) = results.next().await {
            let Some(result) = result else {
                continue;
            };
            processed += 1;
            let event = self.record(result, processed, total);

            if emitting && tx.send(event).await.is_err() {
                tracing::debug!("Progress receiver dropped; continuing without events");
                emitting = false;
            }
        }

        let summary = {
            let mut shared = self.shared.lock();
            shared.stopped_early = processed < total;
            shared.state = SessionState::Stopped;
            shared.summary()
        };

        tracing::info!(
            processed = summary.processed,
            total = summary.total,
            available = summary.available,
            unavailable = summary.unavailable,
            errors = summary.errors,
            stopped_early = summary.stopped_early,
            duration_ms = %start_time.elapsed().as_millis(),
            "Check session finished"
        );
    }

    fn record(&self, result: CheckResult, processed: usize, total: usize) -> ProgressEvent {
        let mut shared = self.shared.lock();
        shared.store.record(&result);
        shared.processed = processed;

        ProgressEvent {
            candidate: result.candidate,
            availability: result.availability,
            processed,
            total,
        }
    }
}
