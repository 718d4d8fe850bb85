//! Geometry and path types shared by detection, routing and rendering

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An axis-aligned box in screenshot coordinates.
///
/// Origin is the top-left corner of the image, x grows rightward and y
/// grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Check whether the two boxes share any pixel
    pub fn overlaps(&self, other: &Rect) -> bool {
        let self_right = i64::from(self.x) + i64::from(self.width);
        let self_bottom = i64::from(self.y) + i64::from(self.height);
        let other_right = i64::from(other.x) + i64::from(other.width);
        let other_bottom = i64::from(other.y) + i64::from(other.height);

        i64::from(self.x) < other_right
            && i64::from(other.x) < self_right
            && i64::from(self.y) < other_bottom
            && i64::from(other.y) < self_bottom
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

/// A point in screenshot coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance, exact in integers
    pub fn squared_distance(&self, other: Position) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: Position) -> f64 {
        (self.squared_distance(other) as f64).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Every detected occurrence of each item label, in scan order.
///
/// Labels iterate lexicographically. A label whose template matched nowhere
/// maps to an empty list.
pub type LabeledMatchSet = BTreeMap<String, Vec<Rect>>;

/// Total number of rectangles across all labels
pub fn candidate_count(set: &LabeledMatchSet) -> usize {
    set.values().map(Vec::len).sum()
}

/// One visited item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub label: String,
    pub rect: Rect,
}

impl PathStep {
    pub fn new(label: impl Into<String>, rect: Rect) -> Self {
        Self {
            label: label.into(),
            rect,
        }
    }

    pub fn position(&self) -> Position {
        self.rect.top_left()
    }
}

/// Ordered visitation sequence produced by one routing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathStep> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Polyline vertices: `start` followed by each step's top-left corner
    pub fn waypoints(&self, start: Position) -> Vec<Position> {
        std::iter::once(start)
            .chain(self.steps.iter().map(PathStep::position))
            .collect()
    }

    /// Length of the polyline from `start` through every step
    pub fn total_length(&self, start: Position) -> f64 {
        self.waypoints(start)
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "{:>3}. {} {}", i + 1, step.label, step.rect)?;
        }
        Ok(())
    }
}
