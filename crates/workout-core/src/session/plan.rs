use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::exercise::Exercise;

/// One scheduled exercise with its countdown length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSegment {
    pub exercise: Exercise,
    pub duration_seconds: u32,
}

impl SessionSegment {
    pub fn new(exercise: Exercise, duration_seconds: u32) -> Self {
        Self {
            exercise,
            duration_seconds,
        }
    }

    pub fn difficulty(&self) -> f64 {
        self.exercise.difficulty
    }
}

/// The ordered output of session generation.
///
/// `total_duration_seconds` is always the sum of the segment durations.
/// `target_duration_seconds` is what the caller asked for; the two differ
/// only when minimum durations could not be funded from other segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub id: Uuid,
    pub segments: Vec<SessionSegment>,
    pub total_duration_seconds: u32,
    pub target_duration_seconds: u32,
}

impl SessionPlan {
    /// Build a plan whose total is the sum of `segments`.
    pub fn new(segments: Vec<SessionSegment>, target_duration_seconds: u32) -> Self {
        let total_duration_seconds = sum_durations(&segments);
        Self {
            id: Uuid::new_v4(),
            segments,
            total_duration_seconds,
            target_duration_seconds,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, index: usize) -> Option<&SessionSegment> {
        self.segments.get(index)
    }

    pub fn durations(&self) -> Vec<u32> {
        self.segments.iter().map(|s| s.duration_seconds).collect()
    }

    pub fn sum_durations(&self) -> u32 {
        sum_durations(&self.segments)
    }

    /// Seconds above the requested length added by unfunded minimums.
    pub fn inflated_seconds(&self) -> u32 {
        self.total_duration_seconds
            .saturating_sub(self.target_duration_seconds)
    }

    pub fn is_inflated(&self) -> bool {
        self.inflated_seconds() > 0
    }

    /// Seconds scheduled before segment `index` starts.
    pub fn cumulative_seconds(&self, index: usize) -> u32 {
        self.segments
            .iter()
            .take(index)
            .map(|s| s.duration_seconds)
            .sum()
    }

    /// Verify that segment durations still add up to the plan total.
    pub fn check_conservation(&self) -> Result<(), SessionError> {
        let actual = self.sum_durations();
        if actual != self.total_duration_seconds {
            return Err(SessionError::InvariantViolation {
                expected: self.total_duration_seconds,
                actual,
            });
        }
        Ok(())
    }
}

pub(crate) fn sum_durations(segments: &[SessionSegment]) -> u32 {
    segments.iter().map(|s| s.duration_seconds).sum()
}
