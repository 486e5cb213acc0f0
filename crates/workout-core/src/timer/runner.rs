//! Wall-clock tick source for a [`TimerController`].
//!
//! The controller sits behind one mutex; the ticker task and every control
//! call go through it, so a tick never overlaps another operation. Pausing,
//! restarting and loading abort the ticker before they return.
//!
//! Aborting only lands at the ticker's next `.await`. A ticker already
//! blocked on the lock checks the runner's epoch once it gets in, and exits
//! without ticking if it was stopped in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error};

use super::controller::{TimerController, TimerPhase, TimerSnapshot, TimerState};
use crate::error::SessionError;
use crate::session::SessionPlan;

pub struct SessionRunner {
    controller: Arc<Mutex<TimerController>>,
    tick_interval: Duration,
    ticker: Option<JoinHandle<()>>,
    /// Bumped every time the ticker is stopped.
    epoch: Arc<AtomicU64>,
    finished_tx: Arc<watch::Sender<bool>>,
    finished_rx: watch::Receiver<bool>,
}

impl SessionRunner {
    /// Wrap `controller`, ticking every `tick_interval` while running.
    pub fn new(mut controller: TimerController, tick_interval: Duration) -> Self {
        let (finished_tx, finished_rx) = watch::channel(false);
        let finished_tx = Arc::new(finished_tx);
        let signal = Arc::clone(&finished_tx);
        controller.on_complete(move || {
            signal.send_replace(true);
        });

        Self {
            controller: Arc::new(Mutex::new(controller)),
            tick_interval,
            ticker: None,
            epoch: Arc::new(AtomicU64::new(0)),
            finished_tx,
            finished_rx,
        }
    }

    /// Shared handle to the controller, for subscriptions and queries.
    pub fn controller(&self) -> Arc<Mutex<TimerController>> {
        Arc::clone(&self.controller)
    }

    /// Run `f` with exclusive access to the controller.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut TimerController) -> R) -> R {
        f(&mut lock(&self.controller))
    }

    pub fn state(&self) -> Option<TimerState> {
        lock(&self.controller).state()
    }

    pub fn snapshot(&self) -> Option<TimerSnapshot> {
        lock(&self.controller).snapshot()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking and load `plan`.
    pub fn load(&mut self, plan: SessionPlan) -> Result<(), SessionError> {
        self.stop_ticker();
        lock(&self.controller).initialize(plan)?;
        self.finished_tx.send_replace(false);
        Ok(())
    }

    /// Start or resume, and begin ticking. Must be called inside a Tokio
    /// runtime.
    pub fn start(&mut self) -> Result<(), SessionError> {
        lock(&self.controller).start()?;
        if !self.is_ticking() {
            self.spawn_ticker();
        }
        Ok(())
    }

    /// Stop ticking, then pause.
    pub fn pause(&mut self) -> bool {
        self.stop_ticker();
        lock(&self.controller).pause()
    }

    /// Stop ticking, then restart from the first segment.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.stop_ticker();
        lock(&self.controller).restart()?;
        self.finished_tx.send_replace(false);
        Ok(())
    }

    pub fn skip(&mut self) -> Result<bool, SessionError> {
        let skipped = lock(&self.controller).skip()?;
        if self.state().map(|s| s.phase) == Some(TimerPhase::Completed) {
            self.stop_ticker();
        }
        Ok(skipped)
    }

    /// Resolves once the loaded session completes.
    pub async fn wait_finished(&self) {
        let mut rx = self.finished_rx.clone();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|done| *done).await;
    }

    fn spawn_ticker(&mut self) {
        let controller = Arc::clone(&self.controller);
        let period = self.tick_interval;
        let epoch = Arc::clone(&self.epoch);
        let started_in = epoch.load(Ordering::SeqCst);
        debug!(period_ms = period.as_millis() as u64, "ticker started");

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let keep_going = {
                    let mut timer = lock(&controller);
                    if epoch.load(Ordering::SeqCst) != started_in {
                        break;
                    }
                    match timer.tick() {
                        Ok(()) => timer.is_running(),
                        Err(err) => {
                            error!(%err, "timer tick failed; stopping");
                            false
                        }
                    }
                };
                if !keep_going {
                    break;
                }
            }
            debug!("ticker stopped");
        }));
    }

    fn stop_ticker(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

fn lock(controller: &Mutex<TimerController>) -> MutexGuard<'_, TimerController> {
    // Handlers run under catch_unwind, so a poisoned lock still holds
    // consistent state.
    controller.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
