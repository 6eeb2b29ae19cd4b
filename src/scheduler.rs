//! Recurring pipeline runs.
//!
//! [`Scheduler::start`] spawns a background task that runs the store once
//! immediately (unless `run_on_start` is off) and then once per interval.
//! [`Scheduler::start_with_initial_run`] performs the first run on the
//! caller's task instead, so its failure reaches the caller.
//! Runs never overlap. A tick that comes due while a run is in flight is
//! dropped, not queued. A failed run is logged and the next tick proceeds
//! as usual.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::config::ScheduleConfig;
use crate::store::{RunOutcome, Store, StoreResult};

/// Counters published after every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStatus {
    /// Runs that finished, successfully or not.
    pub runs: u64,
    /// Runs that returned an error.
    pub failures: u64,
    /// Scheduled ticks dropped because a run was still in flight.
    pub dropped_ticks: u64,
    /// Outcome of the most recent successful run.
    pub last_outcome: Option<RunOutcome>,
}

pub struct Scheduler;

impl Scheduler {
    /// Start recurring runs on the current tokio runtime. Returns at once.
    pub fn start(store: Arc<Store>, config: &ScheduleConfig) -> SchedulerHandle {
        let period = Duration::from_secs(config.interval_secs.max(1));
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let (status_tx, status_rx) = watch::channel(SchedulerStatus::default());
        let shutdown = CancellationToken::new();

        let first = if config.run_on_start {
            Instant::now()
        } else {
            Instant::now() + period
        };

        let worker = Worker {
            store: Arc::clone(&store),
            period,
            trigger_rx,
            status_tx,
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(worker.run(first));

        crate::log_event!("scheduler", "started", "every {}s", period.as_secs());

        SchedulerHandle {
            store,
            trigger_tx,
            status_rx,
            shutdown,
            task,
        }
    }

    /// Run the store once on the caller's task, then start recurring runs
    /// with the first tick one interval later.
    ///
    /// An initial run that fails is returned as an error and nothing is
    /// spawned. The initial run is not counted in [`SchedulerStatus`].
    pub async fn start_with_initial_run(
        store: Arc<Store>,
        config: &ScheduleConfig,
    ) -> StoreResult<(RunOutcome, SchedulerHandle)> {
        let outcome = store.run_once().await?;

        let config = ScheduleConfig {
            run_on_start: false,
            ..config.clone()
        };
        Ok((outcome, Self::start(store, &config)))
    }
}

struct Worker {
    store: Arc<Store>,
    period: Duration,
    trigger_rx: mpsc::Receiver<()>,
    status_tx: watch::Sender<SchedulerStatus>,
    shutdown: CancellationToken,
}

impl Worker {
    async fn run(mut self, first: Instant) {
        let mut next = first;

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = sleep_until(next) => {}
                Some(()) = self.trigger_rx.recv() => {
                    crate::debug_event!("scheduler", "manual tick");
                }
            }

            // Triggers accepted before this run starts are served by it.
            while self.trigger_rx.try_recv().is_ok() {
                crate::debug_event!("scheduler", "manual tick coalesced");
            }

            self.tick().await;

            // Anything that came due during the run is dropped.
            let now = Instant::now();
            while next <= now {
                next += self.period;
                if next <= now {
                    self.status_tx.send_modify(|s| s.dropped_ticks += 1);
                    crate::debug_event!("scheduler", "tick dropped", "run still in flight");
                }
            }
        }

        crate::log_event!("scheduler", "stopped");
    }

    async fn tick(&self) {
        let result = self.store.run_once().await;

        match &result {
            Ok(RunOutcome::Synced { regions, entities }) => {
                crate::log_event!(
                    "scheduler",
                    "run synced",
                    "{regions} regions, {entities} entities"
                );
            }
            Ok(outcome) => {
                crate::debug_event!("scheduler", "run finished", "{outcome:?}");
            }
            Err(e) => {
                tracing::error!("[scheduler] run failed, retrying next tick: {e}");
            }
        }

        self.status_tx.send_modify(|status| {
            status.runs += 1;
            match result {
                Ok(outcome) => status.last_outcome = Some(outcome),
                Err(_) => status.failures += 1,
            }
        });
    }
}

/// Handle to a running scheduler.
///
/// Dropping the handle does not stop the task; call [`SchedulerHandle::stop`].
pub struct SchedulerHandle {
    store: Arc<Store>,
    trigger_tx: mpsc::Sender<()>,
    status_rx: watch::Receiver<SchedulerStatus>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle").finish_non_exhaustive()
    }
}

impl SchedulerHandle {
    /// Request an immediate run.
    ///
    /// Returns false when the tick is dropped: a run is in flight or another
    /// manual tick is already pending. When it returns true, a run that
    /// starts after this call is guaranteed.
    pub fn trigger(&self) -> bool {
        if self.store.is_running() {
            crate::debug_event!("scheduler", "manual tick dropped", "run in flight");
            return false;
        }
        self.trigger_tx.try_send(()).is_ok()
    }

    pub fn status(&self) -> SchedulerStatus {
        self.status_rx.borrow().clone()
    }

    /// Wait until at least `runs` runs have finished.
    ///
    /// Returns `None` if the scheduler stopped first.
    pub async fn wait_for_runs(&self, runs: u64) -> Option<SchedulerStatus> {
        let mut rx = self.status_rx.clone();
        rx.wait_for(|status| status.runs >= runs)
            .await
            .ok()
            .map(|status| status.clone())
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop future ticks. A run in flight completes first.
    pub async fn stop(self) -> SchedulerStatus {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            tracing::error!("[scheduler] task ended abnormally: {e}");
        }
        self.status_rx.borrow().clone()
    }
}
