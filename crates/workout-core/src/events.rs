use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every timer state change produces an Event.
/// The four core notifications (tick, exercise change, switch sides,
/// completion) also have dedicated subscription methods on the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Started {
        plan_id: uuid::Uuid,
        segments: usize,
        total_seconds: u32,
        at: DateTime<Utc>,
    },
    Paused {
        index: usize,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    Resumed {
        index: usize,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    Tick {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    ExerciseChanged {
        index: usize,
        exercise: String,
        duration_seconds: u32,
        sided: bool,
        at: DateTime<Utc>,
    },
    /// Halfway through a sided exercise.
    SwitchSides {
        index: usize,
        at: DateTime<Utc>,
    },
    /// A segment was cut short; its remaining time moved to later segments.
    Skipped {
        from_index: usize,
        reallocated_seconds: u32,
        at: DateTime<Utc>,
    },
    Restarted {
        at: DateTime<Utc>,
    },
    Completed {
        total_elapsed_seconds: u32,
        at: DateTime<Utc>,
    },
}

impl TimerEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TimerEvent::Started { .. } => "started",
            TimerEvent::Paused { .. } => "paused",
            TimerEvent::Resumed { .. } => "resumed",
            TimerEvent::Tick { .. } => "tick",
            TimerEvent::ExerciseChanged { .. } => "exercise_changed",
            TimerEvent::SwitchSides { .. } => "switch_sides",
            TimerEvent::Skipped { .. } => "skipped",
            TimerEvent::Restarted { .. } => "restarted",
            TimerEvent::Completed { .. } => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_snake_case_tag() {
        let event = TimerEvent::SwitchSides {
            index: 2,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "switch_sides");
        assert_eq!(json["index"], 2);
        assert_eq!(event.kind(), "switch_sides");
    }
}
