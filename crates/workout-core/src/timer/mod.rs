mod controller;
mod notifier;
mod runner;

pub use controller::{TimerController, TimerPhase, TimerSnapshot, TimerState};
pub use notifier::Notifier;
pub use runner::SessionRunner;
