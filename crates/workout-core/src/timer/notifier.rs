//! Subscriber fan-out for timer notifications.
//!
//! Handlers run synchronously in registration order. A handler that panics
//! is logged and skipped; later handlers still run and the timer state is
//! not affected.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

use crate::events::TimerEvent;

type TickHandler = Box<dyn FnMut(u32) + Send>;
type IndexHandler = Box<dyn FnMut(usize) + Send>;
type SignalHandler = Box<dyn FnMut() + Send>;
type EventHandler = Box<dyn FnMut(&TimerEvent) + Send>;

#[derive(Default)]
pub struct Notifier {
    tick: Vec<TickHandler>,
    exercise_change: Vec<IndexHandler>,
    complete: Vec<SignalHandler>,
    switch_sides: Vec<SignalHandler>,
    events: Vec<EventHandler>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tick(&mut self, handler: impl FnMut(u32) + Send + 'static) {
        self.tick.push(Box::new(handler));
    }

    pub fn on_exercise_change(&mut self, handler: impl FnMut(usize) + Send + 'static) {
        self.exercise_change.push(Box::new(handler));
    }

    pub fn on_complete(&mut self, handler: impl FnMut() + Send + 'static) {
        self.complete.push(Box::new(handler));
    }

    pub fn on_switch_sides(&mut self, handler: impl FnMut() + Send + 'static) {
        self.switch_sides.push(Box::new(handler));
    }

    /// Receive every event, including the ones with dedicated handlers.
    pub fn on_event(&mut self, handler: impl FnMut(&TimerEvent) + Send + 'static) {
        self.events.push(Box::new(handler));
    }

    /// Deliver `event` to the matching dedicated handlers, then to the
    /// generic event handlers.
    pub fn emit(&mut self, event: &TimerEvent) {
        let kind = event.kind();
        match event {
            TimerEvent::Tick {
                remaining_seconds, ..
            } => {
                for handler in &mut self.tick {
                    isolate(kind, || handler(*remaining_seconds));
                }
            }
            TimerEvent::ExerciseChanged { index, .. } => {
                for handler in &mut self.exercise_change {
                    isolate(kind, || handler(*index));
                }
            }
            TimerEvent::Completed { .. } => {
                for handler in &mut self.complete {
                    isolate(kind, || handler());
                }
            }
            TimerEvent::SwitchSides { .. } => {
                for handler in &mut self.switch_sides {
                    isolate(kind, || handler());
                }
            }
            _ => {}
        }

        for handler in &mut self.events {
            isolate(kind, || handler(event));
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("tick", &self.tick.len())
            .field("exercise_change", &self.exercise_change.len())
            .field("complete", &self.complete.len())
            .field("switch_sides", &self.switch_sides.len())
            .field("events", &self.events.len())
            .finish()
    }
}

fn isolate(kind: &str, call: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(call)) {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        warn!(event = kind, %message, "notification handler panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    #[test]
    fn handlers_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();
        for id in 0..3 {
            let seen = Arc::clone(&seen);
            notifier.on_tick(move |remaining| seen.lock().unwrap().push((id, remaining)));
        }

        notifier.emit(&TimerEvent::Tick {
            remaining_seconds: 9,
            at: Utc::now(),
        });
        assert_eq!(*seen.lock().unwrap(), vec![(0, 9), (1, 9), (2, 9)]);
    }

    #[test]
    fn panicking_handler_does_not_stop_the_rest() {
        let calls = Arc::new(Mutex::new(0));
        let mut notifier = Notifier::new();
        notifier.on_complete(|| panic!("subscriber bug"));
        let counter = Arc::clone(&calls);
        notifier.on_complete(move || *counter.lock().unwrap() += 1);
        let counter = Arc::clone(&calls);
        notifier.on_event(move |_| *counter.lock().unwrap() += 10);

        notifier.emit(&TimerEvent::Completed {
            total_elapsed_seconds: 60,
            at: Utc::now(),
        });
        assert_eq!(*calls.lock().unwrap(), 11);
    }

    #[test]
    fn dedicated_handlers_only_see_their_event() {
        let switches = Arc::new(Mutex::new(0));
        let mut notifier = Notifier::new();
        let counter = Arc::clone(&switches);
        notifier.on_switch_sides(move || *counter.lock().unwrap() += 1);
        notifier.on_tick(|_| panic!("tick handler must not run"));

        notifier.emit(&TimerEvent::SwitchSides {
            index: 0,
            at: Utc::now(),
        });
        assert_eq!(*switches.lock().unwrap(), 1);
    }
}
