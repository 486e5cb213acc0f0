//! Per-segment duration limits.
//!
//! Short segments are raised to the minimum, funded from segments that have
//! time to spare. Long segments are split into several pieces of the same
//! exercise, and the pieces are spread across the session.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::allocator::distribute_largest_remainder;
use super::plan::{sum_durations, SessionSegment};

/// Inclusive bounds on a single segment's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationLimits {
    pub min_seconds: u32,
    pub max_seconds: u32,
}

impl Default for DurationLimits {
    fn default() -> Self {
        Self {
            min_seconds: 20,
            max_seconds: 120,
        }
    }
}

impl DurationLimits {
    pub fn contains(&self, seconds: u32) -> bool {
        (self.min_seconds..=self.max_seconds).contains(&seconds)
    }
}

/// What [`enforce`] had to do to satisfy the limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintReport {
    /// Seconds added because raised minimums could not be funded.
    pub inflated_seconds: u32,
    /// Input segments that exceeded the maximum.
    pub split_segments: usize,
    /// Pieces those segments were split into.
    pub split_pieces: usize,
}

/// Apply the minimum pass, then the maximum pass.
pub fn enforce(
    mut segments: Vec<SessionSegment>,
    limits: DurationLimits,
) -> (Vec<SessionSegment>, ConstraintReport) {
    let before = sum_durations(&segments);
    let inflated_seconds = apply_minimum(&mut segments, limits.min_seconds);
    let (segments, split_segments, split_pieces) = split_long(segments, limits.max_seconds);

    debug_assert_eq!(sum_durations(&segments), before + inflated_seconds);
    debug!(
        segments = segments.len(),
        inflated_seconds, split_segments, split_pieces, "enforced duration limits"
    );

    (
        segments,
        ConstraintReport {
            inflated_seconds,
            split_segments,
            split_pieces,
        },
    )
}

/// Raise every segment to at least `min_seconds`.
///
/// The added time is taken from segments above the minimum, in proportion
/// to their slack. Returns the seconds that could not be funded and were
/// added to the total instead.
pub fn apply_minimum(segments: &mut [SessionSegment], min_seconds: u32) -> u32 {
    let deficit: u32 = segments
        .iter()
        .map(|s| min_seconds.saturating_sub(s.duration_seconds))
        .sum();
    if deficit == 0 {
        return 0;
    }

    for segment in segments.iter_mut() {
        segment.duration_seconds = segment.duration_seconds.max(min_seconds);
    }

    let donors: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.duration_seconds > min_seconds)
        .map(|(i, _)| i)
        .collect();
    let total_slack: u32 = donors
        .iter()
        .map(|&i| segments[i].duration_seconds - min_seconds)
        .sum();

    if total_slack <= deficit {
        for &i in &donors {
            segments[i].duration_seconds = min_seconds;
        }
        let unfunded = deficit - total_slack;
        if unfunded > 0 {
            warn!(
                deficit,
                total_slack, unfunded, "minimum durations exceed available slack; session runs long"
            );
        }
        return unfunded;
    }

    let shares: Vec<f64> = donors
        .iter()
        .map(|&i| {
            let slack = (segments[i].duration_seconds - min_seconds) as f64;
            deficit as f64 * slack / total_slack as f64
        })
        .collect();
    let reductions = distribute_largest_remainder(&shares, deficit);

    for (&i, cut) in donors.iter().zip(reductions) {
        let slack = segments[i].duration_seconds - min_seconds;
        segments[i].duration_seconds -= cut.min(slack);
    }
    0
}

/// Split segments longer than `max_seconds` and spread the pieces out.
///
/// Returns the new segments, how many inputs were split, and the number of
/// pieces produced.
pub fn split_long(
    segments: Vec<SessionSegment>,
    max_seconds: u32,
) -> (Vec<SessionSegment>, usize, usize) {
    let max_seconds = max_seconds.max(1);
    let mut pieces = Vec::new();
    let mut kept = Vec::new();
    let mut split_segments = 0;

    for segment in segments {
        if segment.duration_seconds > max_seconds {
            split_segments += 1;
            pieces.extend(split_segment(&segment, max_seconds));
        } else {
            kept.push(segment);
        }
    }

    let split_pieces = pieces.len();
    (interleave(pieces, kept), split_segments, split_pieces)
}

fn split_segment(segment: &SessionSegment, max_seconds: u32) -> Vec<SessionSegment> {
    let duration = segment.duration_seconds;
    let splits = duration.div_ceil(max_seconds);
    let per_split = duration / splits;
    let remainder = duration - splits * per_split;

    (0..splits)
        .map(|i| {
            let extra = u32::from(i < remainder);
            SessionSegment::new(segment.exercise.clone(), per_split + extra)
        })
        .collect()
}

/// Place split pieces at evenly spaced slots and fill the gaps with the
/// remaining segments in order. Every slot is filled exactly once.
fn interleave(pieces: Vec<SessionSegment>, kept: Vec<SessionSegment>) -> Vec<SessionSegment> {
    if pieces.is_empty() {
        return kept;
    }
    if kept.is_empty() {
        return pieces;
    }

    let total = pieces.len() + kept.len();
    let piece_count = pieces.len();
    let mut slots: Vec<Option<SessionSegment>> = vec![None; total];

    for (i, piece) in pieces.into_iter().enumerate() {
        let mut pos = i * total / piece_count;
        while slots[pos].is_some() {
            pos = (pos + 1) % total;
        }
        slots[pos] = Some(piece);
    }

    let mut rest = kept.into_iter();
    slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| rest.next()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Exercise;
    use proptest::prelude::*;

    fn seg(name: &str, secs: u32) -> SessionSegment {
        SessionSegment::new(Exercise::new(name, 1.0), secs)
    }

    fn durations(segments: &[SessionSegment]) -> Vec<u32> {
        segments.iter().map(|s| s.duration_seconds).collect()
    }

    fn names(segments: &[SessionSegment]) -> Vec<&str> {
        segments.iter().map(|s| s.exercise.name.as_str()).collect()
    }

    #[test]
    fn long_segment_splits_in_half() {
        let (out, report) = enforce(vec![seg("Squats", 240)], DurationLimits::default());
        assert_eq!(durations(&out), vec![120, 120]);
        assert_eq!(names(&out), vec!["Squats", "Squats"]);
        assert_eq!(report.split_segments, 1);
        assert_eq!(report.split_pieces, 2);
    }

    #[test]
    fn split_remainder_goes_to_first_pieces() {
        let (out, _) = enforce(vec![seg("Squats", 250)], DurationLimits::default());
        assert_eq!(durations(&out), vec![84, 83, 83]);
    }

    #[test]
    fn short_segments_are_funded_by_slack() {
        let mut segments = vec![seg("A", 10), seg("B", 50), seg("C", 100)];
        let unfunded = apply_minimum(&mut segments, 20);
        assert_eq!(unfunded, 0);
        assert_eq!(durations(&segments), vec![20, 47, 93]);
    }

    #[test]
    fn no_slack_inflates_total() {
        let (out, report) = enforce(vec![seg("A", 10), seg("B", 20)], DurationLimits::default());
        assert_eq!(durations(&out), vec![20, 20]);
        assert_eq!(report.inflated_seconds, 10);
    }

    #[test]
    fn partial_slack_is_used_before_inflating() {
        let mut segments = vec![seg("A", 5), seg("B", 25)];
        assert_eq!(apply_minimum(&mut segments, 20), 10);
        assert_eq!(durations(&segments), vec![20, 20]);
    }

    #[test]
    fn split_pieces_spread_between_other_segments() {
        let input = vec![seg("A", 240), seg("B", 60), seg("C", 60), seg("D", 60)];
        let (out, _) = enforce(input, DurationLimits::default());
        assert_eq!(names(&out), vec!["A", "B", "A", "C", "D"]);
        assert_eq!(durations(&out).iter().sum::<u32>(), 420);
    }

    #[test]
    fn segments_within_limits_are_untouched() {
        let input = vec![seg("A", 30), seg("B", 120), seg("C", 20)];
        let (out, report) = enforce(input.clone(), DurationLimits::default());
        assert_eq!(out, input);
        assert_eq!(report, ConstraintReport::default());
    }

    proptest! {
        #[test]
        fn limits_hold_and_time_is_conserved(
            raw in prop::collection::vec(1u32..600, 1..15),
        ) {
            let total: u32 = raw.iter().sum();
            prop_assume!(total >= 20 * raw.len() as u32);

            let input: Vec<SessionSegment> = raw
                .iter()
                .enumerate()
                .map(|(i, &d)| seg(&format!("E{i}"), d))
                .collect();
            let (out, report) = enforce(input, DurationLimits::default());

            prop_assert_eq!(report.inflated_seconds, 0);
            prop_assert_eq!(durations(&out).iter().sum::<u32>(), total);
            let limits = DurationLimits::default();
            prop_assert!(out.iter().all(|s| limits.contains(s.duration_seconds)));
        }
    }
}
