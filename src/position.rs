//! # Position Module
//!
//! Immutable 2D integer coordinates used for every location in the planner:
//! worker positions, resource nodes and the home base.
//!
//! Two queries matter for planning:
//!
//! * **Adjacency** is the 8-neighborhood (diagonals included), computed with
//!   exact integer comparisons.
//! * **Distance** is the Euclidean distance, used for travel-cost estimates
//!   and for the greedy nearest-cell assignment in the Move operator.
//!
//! ## Basic Usage
//!
//! ```
//! use gatherplan::Position;
//!
//! let mine = Position::new(4, 7);
//! let worker = Position::new(5, 8);
//!
//! assert!(worker.is_adjacent(mine));
//! assert_eq!(Position::new(0, 0).euclidean_distance(Position::new(3, 4)), 5.0);
//! ```

use std::fmt;

/// A 2D integer coordinate on the planning map.
///
/// Positions are plain values: equality is exact integer comparison and
/// adjacency is the 8-neighborhood, so two diagonal neighbors count as
/// adjacent.
///
/// # Examples
///
/// ```
/// use gatherplan::Position;
///
/// let a = Position::new(2, 2);
/// assert!(a.is_adjacent(Position::new(3, 3)));
/// assert!(!a.is_adjacent(Position::new(4, 2)));
/// // A position is not adjacent to itself.
/// assert!(!a.is_adjacent(a));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a position from integer coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true if `other` is one of the 8 neighboring cells.
    ///
    /// A position is never adjacent to itself; callers that want the
    /// "at or next to" test combine this with an equality check.
    pub fn is_adjacent(&self, other: Position) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx.max(dy) == 1
    }

    /// Returns true if this position equals `other` or is adjacent to it.
    ///
    /// This is the eligibility test used by the Harvest and Deposit
    /// operators: a worker standing on the target cell counts as close
    /// enough, just like one standing next to it.
    pub fn is_at_or_adjacent(&self, other: Position) -> bool {
        *self == other || self.is_adjacent(other)
    }

    /// Euclidean distance to `other`.
    pub fn euclidean_distance(&self, other: Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// The 8 neighboring cells, in a fixed order.
    ///
    /// The order is row-major over the (dx, dy) offsets with dx varying
    /// slowest: (-1,-1), (-1,0), (-1,1), (0,-1), (0,1), (1,-1), (1,0),
    /// (1,1). Greedy cell assignment breaks distance ties by taking the
    /// first minimum in this order, so plan determinism depends on it.
    ///
    /// # Examples
    ///
    /// ```
    /// use gatherplan::Position;
    ///
    /// let cells = Position::new(0, 0).adjacent_positions();
    /// assert_eq!(cells.len(), 8);
    /// assert_eq!(cells[0], Position::new(-1, -1));
    /// assert_eq!(cells[7], Position::new(1, 1));
    /// ```
    pub fn adjacent_positions(&self) -> [Position; 8] {
        [
            Position::new(self.x - 1, self.y - 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x - 1, self.y + 1),
            Position::new(self.x, self.y - 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x + 1, self.y - 1),
            Position::new(self.x + 1, self.y),
            Position::new(self.x + 1, self.y + 1),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
