//! Timer state machine.
//!
//! The controller does not keep time itself: something outside calls
//! `tick()` once per second while the timer is running (see
//! [`SessionRunner`](super::SessionRunner)).
//!
//! ## State Transitions
//!
//! ```text
//! NotStarted -> Running <-> Paused
//! Running -> Completed
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = TimerController::new();
//! timer.on_switch_sides(|| println!("switch sides"));
//! timer.initialize(plan)?;
//! timer.start()?;
//! // Once per second:
//! timer.tick()?;
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::notifier::Notifier;
use crate::error::SessionError;
use crate::events::TimerEvent;
use crate::session::{distribute_largest_remainder, SessionPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    NotStarted,
    Running,
    Paused,
    Completed,
}

/// Position of the countdown within the loaded plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub current_index: usize,
    pub remaining_seconds: u32,
    pub phase: TimerPhase,
    pub total_elapsed_seconds: u32,
}

impl TimerState {
    fn fresh(plan: &SessionPlan) -> Self {
        Self {
            current_index: 0,
            remaining_seconds: plan.segment(0).map(|s| s.duration_seconds).unwrap_or(0),
            phase: TimerPhase::NotStarted,
            total_elapsed_seconds: 0,
        }
    }
}

/// Serializable view of the timer for UIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub current_index: usize,
    pub segment_count: usize,
    pub exercise: String,
    pub sided: bool,
    pub remaining_seconds: u32,
    pub segment_seconds: u32,
    pub total_elapsed_seconds: u32,
    pub total_duration_seconds: u32,
    /// 0.0 .. 100.0 across the whole plan.
    pub progress_pct: f64,
}

#[derive(Debug)]
struct ActiveSession {
    /// Plan as loaded; restored on restart.
    original: SessionPlan,
    /// Working copy; skip moves time between its segments.
    plan: SessionPlan,
    state: TimerState,
    switch_sides_fired: bool,
}

impl ActiveSession {
    fn new(plan: SessionPlan) -> Self {
        Self {
            state: TimerState::fresh(&plan),
            original: plan.clone(),
            plan,
            switch_sides_fired: false,
        }
    }

    fn segment_seconds(&self) -> u32 {
        self.plan
            .segment(self.state.current_index)
            .map(|s| s.duration_seconds)
            .unwrap_or(0)
    }

    fn exercise_changed(&self) -> TimerEvent {
        let index = self.state.current_index;
        let segment = self.plan.segment(index);
        TimerEvent::ExerciseChanged {
            index,
            exercise: segment.map(|s| s.exercise.name.clone()).unwrap_or_default(),
            duration_seconds: segment.map(|s| s.duration_seconds).unwrap_or(0),
            sided: segment.map(|s| s.exercise.sided).unwrap_or(false),
            at: Utc::now(),
        }
    }

    /// Move to the next segment, or finish if there is none.
    fn advance(&mut self, notifier: &mut Notifier) -> Result<(), SessionError> {
        if let Err(err) = self.plan.check_conservation() {
            error!(%err, index = self.state.current_index, "plan lost time conservation");
            return Err(err);
        }

        let next = self.state.current_index + 1;
        match self.plan.segment(next) {
            Some(segment) => {
                self.state.current_index = next;
                self.state.remaining_seconds = segment.duration_seconds;
                self.switch_sides_fired = false;
                info!(index = next, exercise = %segment.exercise.name, "next exercise");
                notifier.emit(&self.exercise_changed());
            }
            None => {
                self.state.remaining_seconds = 0;
                self.state.phase = TimerPhase::Completed;
                info!(
                    elapsed_seconds = self.state.total_elapsed_seconds,
                    "session completed"
                );
                notifier.emit(&TimerEvent::Completed {
                    total_elapsed_seconds: self.state.total_elapsed_seconds,
                    at: Utc::now(),
                });
            }
        }
        Ok(())
    }

    /// Hand the current segment's remaining time to the segments after it,
    /// in proportion to their durations. Returns the seconds moved.
    fn reallocate_remaining(&mut self) -> Result<u32, SessionError> {
        let index = self.state.current_index;
        let remaining = self.state.remaining_seconds;
        let future = &self.plan.segments[index + 1..];
        let future_total: u32 = future.iter().map(|s| s.duration_seconds).sum();

        let shares: Vec<f64> = future
            .iter()
            .map(|s| {
                if future_total == 0 {
                    remaining as f64 / future.len() as f64
                } else {
                    remaining as f64 * s.duration_seconds as f64 / future_total as f64
                }
            })
            .collect();
        let additions = distribute_largest_remainder(&shares, remaining);

        let mut updated = self.plan.clone();
        let spent = updated.segments[index].duration_seconds.saturating_sub(remaining);
        updated.segments[index].duration_seconds = spent;
        for (segment, extra) in updated.segments[index + 1..].iter_mut().zip(additions) {
            segment.duration_seconds += extra;
        }

        if let Err(err) = updated.check_conservation() {
            error!(%err, index, "skip reallocation would lose time");
            return Err(err);
        }
        self.plan = updated;
        Ok(remaining)
    }
}

/// Drives a countdown over a [`SessionPlan`].
///
/// All timer state lives here and only changes through these methods.
#[derive(Debug, Default)]
pub struct TimerController {
    session: Option<ActiveSession>,
    notifier: Notifier,
}

impl TimerController {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn on_tick(&mut self, handler: impl FnMut(u32) + Send + 'static) {
        self.notifier.on_tick(handler);
    }

    pub fn on_exercise_change(&mut self, handler: impl FnMut(usize) + Send + 'static) {
        self.notifier.on_exercise_change(handler);
    }

    pub fn on_complete(&mut self, handler: impl FnMut() + Send + 'static) {
        self.notifier.on_complete(handler);
    }

    pub fn on_switch_sides(&mut self, handler: impl FnMut() + Send + 'static) {
        self.notifier.on_switch_sides(handler);
    }

    pub fn on_event(&mut self, handler: impl FnMut(&TimerEvent) + Send + 'static) {
        self.notifier.on_event(handler);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> Option<TimerState> {
        self.session.as_ref().map(|s| s.state)
    }

    pub fn phase(&self) -> Option<TimerPhase> {
        self.state().map(|s| s.phase)
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Some(TimerPhase::Running)
    }

    /// Working plan, including any skip reallocations.
    pub fn plan(&self) -> Option<&SessionPlan> {
        self.session.as_ref().map(|s| &s.plan)
    }

    /// Plan as it was loaded.
    pub fn original_plan(&self) -> Option<&SessionPlan> {
        self.session.as_ref().map(|s| &s.original)
    }

    pub fn snapshot(&self) -> Option<TimerSnapshot> {
        let session = self.session.as_ref()?;
        let state = session.state;
        let plan = &session.plan;
        let segment = plan.segment(state.current_index);
        let segment_seconds = session.segment_seconds();

        let progress_pct = if state.phase == TimerPhase::Completed {
            100.0
        } else if plan.total_duration_seconds == 0 {
            0.0
        } else {
            let done = plan.cumulative_seconds(state.current_index)
                + segment_seconds.saturating_sub(state.remaining_seconds);
            (done as f64 / plan.total_duration_seconds as f64 * 100.0).min(100.0)
        };

        Some(TimerSnapshot {
            phase: state.phase,
            current_index: state.current_index,
            segment_count: plan.len(),
            exercise: segment.map(|s| s.exercise.name.clone()).unwrap_or_default(),
            sided: segment.map(|s| s.exercise.sided).unwrap_or(false),
            remaining_seconds: state.remaining_seconds,
            segment_seconds,
            total_elapsed_seconds: state.total_elapsed_seconds,
            total_duration_seconds: plan.total_duration_seconds,
            progress_pct,
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load `plan` and reset to the first segment, discarding any session
    /// in progress.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for an empty plan or a zero-length segment;
    /// `InvariantViolation` if its durations do not add up to its total. The
    /// current session is kept on error.
    pub fn initialize(&mut self, plan: SessionPlan) -> Result<(), SessionError> {
        if plan.is_empty() {
            return Err(SessionError::InvalidConfiguration(
                "plan has no segments".into(),
            ));
        }
        if let Some(index) = plan.segments.iter().position(|s| s.duration_seconds == 0) {
            return Err(SessionError::InvalidConfiguration(format!(
                "segment {index} has zero duration"
            )));
        }
        plan.check_conservation()?;
        info!(plan_id = %plan.id, segments = plan.len(), "session loaded");
        self.session = Some(ActiveSession::new(plan));
        Ok(())
    }

    /// Begin or resume the countdown. No-op while already running.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        match session.state.phase {
            TimerPhase::Running => Ok(()),
            TimerPhase::Completed => Err(SessionError::SessionCompleted),
            TimerPhase::NotStarted => {
                session.state.phase = TimerPhase::Running;
                info!(plan_id = %session.plan.id, "session started");
                self.notifier.emit(&TimerEvent::Started {
                    plan_id: session.plan.id,
                    segments: session.plan.len(),
                    total_seconds: session.plan.total_duration_seconds,
                    at: Utc::now(),
                });
                self.notifier.emit(&session.exercise_changed());
                Ok(())
            }
            TimerPhase::Paused => {
                session.state.phase = TimerPhase::Running;
                info!(index = session.state.current_index, "session resumed");
                self.notifier.emit(&TimerEvent::Resumed {
                    index: session.state.current_index,
                    remaining_seconds: session.state.remaining_seconds,
                    at: Utc::now(),
                });
                Ok(())
            }
        }
    }

    /// Pause a running countdown. Returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.state.phase != TimerPhase::Running {
            return false;
        }
        session.state.phase = TimerPhase::Paused;
        info!(
            index = session.state.current_index,
            remaining = session.state.remaining_seconds,
            "session paused"
        );
        self.notifier.emit(&TimerEvent::Paused {
            index: session.state.current_index,
            remaining_seconds: session.state.remaining_seconds,
            at: Utc::now(),
        });
        true
    }

    /// Back to the first segment of the plan as loaded, not started.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        session.plan = session.original.clone();
        session.state = TimerState::fresh(&session.plan);
        session.switch_sides_fired = false;
        info!(plan_id = %session.plan.id, "session restarted");
        self.notifier.emit(&TimerEvent::Restarted { at: Utc::now() });
        Ok(())
    }

    /// One second of countdown. Does nothing unless running.
    ///
    /// # Errors
    ///
    /// `NoActiveSession` without a plan; `InvariantViolation` if the plan no
    /// longer conserves time when advancing.
    pub fn tick(&mut self) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        if session.state.phase != TimerPhase::Running {
            return Ok(());
        }

        if session.state.remaining_seconds == 0 {
            return session.advance(&mut self.notifier);
        }

        session.state.remaining_seconds -= 1;
        session.state.total_elapsed_seconds += 1;
        self.notifier.emit(&TimerEvent::Tick {
            remaining_seconds: session.state.remaining_seconds,
            at: Utc::now(),
        });

        let index = session.state.current_index;
        let sided = session
            .plan
            .segment(index)
            .map(|s| s.exercise.sided)
            .unwrap_or(false);
        if sided && !session.switch_sides_fired {
            let duration = session.segment_seconds();
            let elapsed = duration.saturating_sub(session.state.remaining_seconds);
            if elapsed * 2 >= duration {
                session.switch_sides_fired = true;
                self.notifier.emit(&TimerEvent::SwitchSides {
                    index,
                    at: Utc::now(),
                });
            }
        }
        Ok(())
    }

    /// Cut the current segment short and move on.
    ///
    /// The unused time is spread over the remaining segments in proportion
    /// to their length; skipping the last segment completes the session.
    /// Returns `Ok(false)` without changes unless the timer is running.
    pub fn skip(&mut self) -> Result<bool, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        match session.state.phase {
            TimerPhase::Completed => return Err(SessionError::SessionCompleted),
            TimerPhase::NotStarted | TimerPhase::Paused => return Ok(false),
            TimerPhase::Running => {}
        }

        let from_index = session.state.current_index;
        let is_last = from_index + 1 >= session.plan.len();
        let reallocated_seconds = if is_last {
            0
        } else {
            session.reallocate_remaining()?
        };

        info!(from_index, reallocated_seconds, "segment skipped");
        self.notifier.emit(&TimerEvent::Skipped {
            from_index,
            reallocated_seconds,
            at: Utc::now(),
        });
        session.state.remaining_seconds = 0;
        session.advance(&mut self.notifier)?;
        Ok(true)
    }
}
