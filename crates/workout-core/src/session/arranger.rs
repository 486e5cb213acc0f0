//! Segment ordering.
//!
//! Two passes run in order: a greedy pass that keeps consecutive segments off
//! the same muscle groups, then a progressive pass that puts the easiest work
//! at both ends of the session and the hardest in the middle. Only order
//! changes; durations are left alone.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::plan::SessionSegment;
use crate::exercise::Exercise;

/// Tags that describe a kind of exercise rather than a body part.
pub const DEFAULT_CATEGORY_TAGS: &[&str] = &[
    "cardio",
    "strength",
    "flexibility",
    "balance",
    "mobility",
    "plyometric",
    "low impact",
    "high impact",
    "low-impact",
    "high-impact",
];

/// Run the tag variety pass followed by the progressive difficulty pass.
pub fn arrange(segments: Vec<SessionSegment>, category_tags: &[String]) -> Vec<SessionSegment> {
    progressive_difficulty(vary_tags(segments, category_tags))
}

/// Lowercased tags of `exercise` minus the category labels.
pub fn body_part_tags(exercise: &Exercise, category_tags: &[String]) -> HashSet<String> {
    exercise
        .tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && !category_tags.iter().any(|c| c.eq_ignore_ascii_case(t)))
        .collect()
}

/// Greedy reorder so each segment shares as few body-part tags as possible
/// with the one before it. The first segment stays first.
pub fn vary_tags(segments: Vec<SessionSegment>, category_tags: &[String]) -> Vec<SessionSegment> {
    if segments.len() < 3 {
        return segments;
    }

    let mut remaining: Vec<(SessionSegment, HashSet<String>)> = segments
        .into_iter()
        .map(|s| {
            let tags = body_part_tags(&s.exercise, category_tags);
            (s, tags)
        })
        .collect();

    let mut ordered = Vec::with_capacity(remaining.len());
    let (first, mut previous_tags) = remaining.remove(0);
    ordered.push(first);

    while !remaining.is_empty() {
        let next = remaining
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, tags))| tags.intersection(&previous_tags).count())
            .map(|(i, _)| i)
            .unwrap_or(0);
        let (segment, tags) = remaining.remove(next);
        ordered.push(segment);
        previous_tags = tags;
    }
    ordered
}

/// Easy, hard, easy.
///
/// Sorts by difficulty, deals segments alternately to a front and a back
/// list, and returns `front + reverse(back)`. Fewer than three segments are
/// returned unchanged.
pub fn progressive_difficulty(mut segments: Vec<SessionSegment>) -> Vec<SessionSegment> {
    if segments.len() < 3 {
        return segments;
    }

    segments.sort_by(|a, b| {
        a.difficulty()
            .partial_cmp(&b.difficulty())
            .unwrap_or(Ordering::Equal)
    });

    let mut front = Vec::with_capacity(segments.len() / 2 + 1);
    let mut back = Vec::with_capacity(segments.len() / 2);
    for (i, segment) in segments.into_iter().enumerate() {
        if i % 2 == 0 {
            front.push(segment);
        } else {
            back.push(segment);
        }
    }
    front.extend(back.into_iter().rev());
    front
}
