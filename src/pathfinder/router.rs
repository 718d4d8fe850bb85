//! Greedy rightward routing over detected items
//!
//! At each step the router picks the nearest remaining item whose x is not
//! left of the current position, moves to that item's top-left corner and
//! repeats. Items that fall behind the current x are never revisited, so
//! the path can end while items remain. There is no lookahead and no
//! backtracking.

use super::types::{LabeledMatchSet, Path, PathStep, Position, Rect};
use serde::Serialize;
use std::cmp::Ordering;

/// Result of one routing run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOutcome {
    pub path: Path,
    /// Items left behind the final position and never visited
    pub unreachable: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    label: &'a str,
    /// Position within its label's detection list
    index: usize,
    rect: Rect,
}

/// Order two eligible candidates as seen from `current`.
///
/// Nearest first; equal distances fall back to label (lexicographic), then
/// to detection order within the label.
fn compare(current: Position, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    current
        .squared_distance(a.rect.top_left())
        .cmp(&current.squared_distance(b.rect.top_left()))
        .then_with(|| a.label.cmp(b.label))
        .then_with(|| a.index.cmp(&b.index))
}

/// Index of the nearest candidate with `x >= current.x`
fn find_nearest(current: Position, remaining: &[Candidate<'_>]) -> Option<usize> {
    remaining
        .iter()
        .enumerate()
        .filter(|(_, c)| c.rect.x >= current.x)
        .min_by(|(_, a), (_, b)| compare(current, a, b))
        .map(|(i, _)| i)
}

/// Compute the greedy path from `start` through `pool`.
///
/// `pool` is only read; the router works on its own copy of the candidates.
pub fn route(start: Position, pool: &LabeledMatchSet) -> RouteOutcome {
    let mut remaining: Vec<Candidate<'_>> = pool
        .iter()
        .flat_map(|(label, rects)| {
            rects.iter().enumerate().map(move |(index, rect)| Candidate {
                label: label.as_str(),
                index,
                rect: *rect,
            })
        })
        .collect();

    let mut path = Path::new();
    let mut current = start;
    while let Some(i) = find_nearest(current, &remaining) {
        let chosen = remaining.swap_remove(i);
        current = chosen.rect.top_left();
        path.push(PathStep::new(chosen.label, chosen.rect));
    }

    if !remaining.is_empty() {
        log::warn!(
            "⚠️ {} item(s) left of {} are unreachable",
            remaining.len(),
            current
        );
    }

    RouteOutcome {
        path,
        unreachable: remaining.len(),
    }
}
