//! # gatherplan
//!
//! A STRIPS-style planner for resource-gathering agents on a grid map.
//! Given a snapshot of the world (workers, resource nodes, a home base)
//! and a numeric goal (gold and wood to deposit), the planner runs an A*
//! search over four operators (move, harvest, deposit, build worker) and
//! returns the cheapest operator sequence it finds.
//!
//! ```
//! use gatherplan::{
//!     Base, GoalSpec, Planner, Position, ResourceKind, ResourceSite, WorkerSummary,
//!     WorldSnapshot,
//! };
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
//! let goal = GoalSpec {
//!     required_gold: 200,
//!     required_wood: 0,
//!     build_workers: false,
//! };
//!
//! let plan = Planner::new().plan(&snapshot, &goal).unwrap();
//! for step in &plan {
//!     println!("{step}");
//! }
//! ```

mod command;
mod error;
mod operator;
mod planner;
mod position;
mod search;
mod state;
mod world;

pub use command::Command;
pub use error::{PlanError, Result};
pub use operator::Operator;
pub use planner::{Plan, Planner, PlannerConfig};
pub use position::Position;
pub use search::AStar;
pub use state::{Resource, State, StateKey, Worker};
pub use world::{
    Base, Cargo, GoalSpec, ResourceKind, ResourceSite, UnitId, WorkerSummary, WorldSnapshot,
};
