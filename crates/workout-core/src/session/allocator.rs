//! Inverse-difficulty time allocation.
//!
//! Harder exercises get less time. Raw proportional shares are floored and the
//! leftover seconds go to the shares that lost the most in flooring, so the
//! result always sums to exactly the requested total.

use tracing::debug;

use super::plan::SessionSegment;
use crate::exercise::Exercise;

/// Extra time factor for exercises done once per side.
pub const SIDED_MULTIPLIER: f64 = 1.5;

/// Split `total_seconds` across `exercises` inversely to difficulty.
pub fn allocate(exercises: &[Exercise], total_seconds: u32) -> Vec<SessionSegment> {
    allocate_with_multiplier(exercises, total_seconds, SIDED_MULTIPLIER)
}

/// [`allocate`] with an explicit sided multiplier.
///
/// The multiplier is applied after the inverse-difficulty shares are
/// computed, then all shares are rescaled to the total.
pub fn allocate_with_multiplier(
    exercises: &[Exercise],
    total_seconds: u32,
    sided_multiplier: f64,
) -> Vec<SessionSegment> {
    match exercises {
        [] => return Vec::new(),
        [only] => return vec![SessionSegment::new(only.clone(), total_seconds)],
        _ => {}
    }

    let inverse_sum: f64 = exercises.iter().map(|e| 1.0 / e.difficulty).sum();
    let base_time = total_seconds as f64 / inverse_sum;

    let raw: Vec<f64> = exercises
        .iter()
        .map(|e| {
            let share = base_time / e.difficulty;
            if e.sided {
                share * sided_multiplier
            } else {
                share
            }
        })
        .collect();

    let raw_sum: f64 = raw.iter().sum();
    let scale = if raw_sum > 0.0 {
        total_seconds as f64 / raw_sum
    } else {
        1.0
    };
    let shares: Vec<f64> = raw.iter().map(|r| r * scale).collect();
    let seconds = distribute_largest_remainder(&shares, total_seconds);

    debug!(
        exercises = exercises.len(),
        total_seconds,
        base_time,
        "allocated session time"
    );

    exercises
        .iter()
        .zip(seconds)
        .map(|(exercise, secs)| SessionSegment::new(exercise.clone(), secs))
        .collect()
}

/// Round real-valued `shares` to integers that sum to `total`.
///
/// Each share is floored; the deficit is handed out one second at a time to
/// the shares with the largest discarded fraction, earlier shares first on
/// ties.
pub fn distribute_largest_remainder(shares: &[f64], total: u32) -> Vec<u32> {
    if shares.is_empty() {
        return Vec::new();
    }

    let mut floored: Vec<u32> = shares
        .iter()
        .map(|s| if s.is_finite() && *s > 0.0 { s.floor() as u32 } else { 0 })
        .collect();

    let assigned: u32 = floored.iter().sum();
    let mut deficit = total.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..shares.len()).collect();
    // Stable sort keeps original order among equal remainders.
    order.sort_by(|&a, &b| {
        let ra = fraction(shares[a]);
        let rb = fraction(shares[b]);
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut cursor = 0;
    while deficit > 0 {
        floored[order[cursor % order.len()]] += 1;
        deficit -= 1;
        cursor += 1;
    }
    floored
}

fn fraction(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value - value.floor()
    } else {
        0.0
    }
}
