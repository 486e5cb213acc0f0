//! # Workout Core Library
//!
//! Plans and drives timed, multi-exercise workout sessions. The CLI binary is
//! a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Session generation**: selects exercises from a filtered library,
//!   allocates time inversely to difficulty, enforces per-segment limits and
//!   orders the result into a [`SessionPlan`]
//! - **Timer**: a tick-driven state machine over a plan, with skip-time
//!   reallocation and subscriber notifications
//! - **Runner**: a Tokio tick source that serializes all access to the timer
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionGenerator`] / [`generate_session`]: plan construction
//! - [`TimerController`]: timer state machine
//! - [`SessionRunner`]: wall-clock driver for the controller
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod exercise;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, SessionError, ValidationError};
pub use events::TimerEvent;
pub use exercise::{filter_pool, validate_library, Exercise, LibraryProvider, SessionConfig};
pub use session::{
    generate_session, ConstraintReport, DurationLimits, SessionGenerator, SessionPlan,
    SessionSegment,
};
pub use storage::{Config, GenerationSettings, SessionDefaults, TimerSettings};
pub use timer::{Notifier, SessionRunner, TimerController, TimerPhase, TimerSnapshot, TimerState};
