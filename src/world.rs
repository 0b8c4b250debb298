//! # World Snapshot Boundary
//!
//! Input types for the planner. A [`WorldSnapshot`] is a read-only view of
//! the authoritative world owned by an external simulation: resource nodes,
//! workers, the home base and the food budget. A [`GoalSpec`] carries the
//! caller's numeric goals and whether building extra workers is allowed.
//!
//! The planner never mutates a snapshot; it copies what it needs into its
//! own search state.
//!
//! ## Basic Usage
//!
//! ```
//! use gatherplan::{Base, GoalSpec, Position, ResourceKind, ResourceSite, WorkerSummary, WorldSnapshot};
//!
//! let snapshot = WorldSnapshot {
//!     extent: (32, 32),
//!     resources: vec![ResourceSite {
//!         id: 10,
//!         kind: ResourceKind::Gold,
//!         position: Position::new(5, 0),
//!         quantity: 500,
//!     }],
//!     workers: vec![WorkerSummary::empty_handed(1, Position::new(0, 1))],
//!     base: Some(Base {
//!         id: 100,
//!         position: Position::new(0, 0),
//!         worker_template: 26,
//!     }),
//!     food_available: 2,
//! };
//!
//! let goal = GoalSpec {
//!     required_gold: 200,
//!     required_wood: 0,
//!     build_workers: false,
//! };
//! assert_eq!(snapshot.workers.len(), 1);
//! assert!(!goal.build_workers);
//! ```

use std::fmt;

use crate::Position;

/// Stable integer identifier shared by workers, resource nodes and the base.
pub type UnitId = u32;

/// The two harvestable resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Gold,
    Wood,
}

impl ResourceKind {
    /// Upper-case label used in plan renderings.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Gold => "GOLD",
            ResourceKind::Wood => "WOOD",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A load carried by a single worker: one kind, a fixed 100 units per
/// completed harvest.
///
/// Making the whole load optional on the worker (instead of a boolean plus
/// loose kind/amount fields) keeps "carrying without a kind" impossible to
/// represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cargo {
    pub kind: ResourceKind,
    pub amount: u32,
}

/// One harvestable node in the snapshot.
#[derive(Debug, Clone)]
pub struct ResourceSite {
    pub id: UnitId,
    pub kind: ResourceKind,
    pub position: Position,
    pub quantity: u32,
}

/// One worker in the snapshot.
#[derive(Debug, Clone)]
pub struct WorkerSummary {
    pub id: UnitId,
    pub position: Position,
    pub carrying: Option<Cargo>,
}

impl WorkerSummary {
    /// Convenience constructor for a worker carrying nothing.
    pub fn empty_handed(id: UnitId, position: Position) -> Self {
        Self {
            id,
            position,
            carrying: None,
        }
    }
}

/// The home base: deposit target and producer of new workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base {
    pub id: UnitId,
    /// Cell the base occupies; deposits snap workers back to it.
    pub position: Position,
    /// Template id handed to the executor when a worker is produced.
    pub worker_template: UnitId,
}

/// Read-only view of the world at planning time.
///
/// `base` is optional because the snapshot is caller-supplied; a missing
/// base is rejected when the root search state is built.
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    /// Map extents as (width, height); informational for the planner.
    pub extent: (i32, i32),
    pub resources: Vec<ResourceSite>,
    pub workers: Vec<WorkerSummary>,
    pub base: Option<Base>,
    /// Remaining food supply; each built worker consumes one.
    pub food_available: u32,
}

/// Numeric goals for one planning call.
#[derive(Debug, Clone, Copy)]
pub struct GoalSpec {
    pub required_gold: u32,
    pub required_wood: u32,
    /// When true the BuildWorker operator is considered during search.
    pub build_workers: bool,
}
