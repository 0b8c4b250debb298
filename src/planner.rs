//! # Planner Module
//!
//! The facade the embedding simulation talks to. A [`Planner`] takes a
//! [`WorldSnapshot`] and a [`GoalSpec`], builds the root search state,
//! runs A* and hands back a [`Plan`]: the ordered operator sequence plus
//! its total cost.
//!
//! ## Basic Usage
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
//!     required_gold: 100,
//!     required_wood: 0,
//!     build_workers: false,
//! };
//!
//! let plan = Planner::new().plan(&snapshot, &goal).unwrap();
//! assert!(!plan.is_empty());
//! assert!(plan.cost() > 0.0);
//! ```

use std::fmt;

use log::{info, warn};

use crate::operator::Operator;
use crate::search::AStar;
use crate::state::State;
use crate::world::{GoalSpec, WorldSnapshot};
use crate::Result;

/// Knobs for one planning call.
#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    /// Maximum number of node expansions before the search gives up.
    pub expansion_limit: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            expansion_limit: 1_000_000,
        }
    }
}

/// A finished plan: the operator sequence from the initial state to a
/// goal state, in execution order, plus the accumulated path cost.
///
/// An empty plan means the snapshot already satisfied the goal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    steps: Vec<Operator>,
    cost: f64,
}

impl Plan {
    pub(crate) fn new(steps: Vec<Operator>, cost: f64) -> Self {
        Self { steps, cost }
    }

    /// The operators in execution order.
    pub fn steps(&self) -> &[Operator] {
        &self.steps
    }

    /// Total path cost of the plan.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the steps in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operator> {
        self.steps.iter()
    }
}

impl IntoIterator for Plan {
    type Item = Operator;
    type IntoIter = std::vec::IntoIter<Operator>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Operator;
    type IntoIter = std::slice::Iter<'a, Operator>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl fmt::Display for Plan {
    /// One `OPNAME(params...)` line per step, in execution order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{step}")?;
        }
        Ok(())
    }
}

/// The planning facade: snapshot in, plan out.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// A planner with the default expansion budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// A planner with an explicit configuration.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Plans a cheapest operator sequence that satisfies `goal` starting
    /// from `snapshot`.
    ///
    /// # Errors
    ///
    /// Snapshot validation errors from [`State::from_snapshot`], or
    /// [`crate::PlanError::NoPlanFound`] /
    /// [`crate::PlanError::ExpansionLimitReached`] from the search.
    pub fn plan(&self, snapshot: &WorldSnapshot, goal: &GoalSpec) -> Result<Plan> {
        let root = State::from_snapshot(snapshot, goal)?;
        info!(
            "planning: {} workers, {} resource nodes, goal {}g/{}w, build={}",
            root.workers().len(),
            root.resources().len(),
            goal.required_gold,
            goal.required_wood,
            goal.build_workers
        );

        let result = AStar::new(self.config.expansion_limit).search(root);
        match &result {
            Ok(plan) => info!("plan found: {} steps, cost {:.2}", plan.len(), plan.cost()),
            Err(err) => warn!("planning failed: {err}"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Base, ResourceKind, ResourceSite, WorkerSummary};
    use crate::{PlanError, Position};

    fn snapshot_with_gold(quantity: u32) -> WorldSnapshot {
        WorldSnapshot {
            extent: (32, 32),
            resources: vec![ResourceSite {
                id: 10,
                kind: ResourceKind::Gold,
                position: Position::new(5, 0),
                quantity,
            }],
            workers: vec![WorkerSummary::empty_handed(1, Position::new(0, 1))],
            base: Some(Base {
                id: 100,
                position: Position::new(0, 0),
                worker_template: 26,
            }),
            food_available: 2,
        }
    }

    fn gold_goal(required_gold: u32) -> GoalSpec {
        GoalSpec {
            required_gold,
            required_wood: 0,
            build_workers: false,
        }
    }

    #[test]
    fn satisfied_goal_plans_to_nothing() {
        let plan = Planner::new()
            .plan(&snapshot_with_gold(500), &gold_goal(0))
            .unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.cost(), 0.0);
        assert_eq!(plan.to_string(), "");
    }

    #[test]
    fn invalid_snapshot_fails_before_searching() {
        let mut snapshot = snapshot_with_gold(500);
        snapshot.base = None;
        assert!(matches!(
            Planner::new().plan(&snapshot, &gold_goal(100)),
            Err(PlanError::MissingBase)
        ));
    }

    #[test]
    fn exhausted_budget_surfaces_as_error() {
        let planner = Planner::with_config(PlannerConfig { expansion_limit: 1 });
        assert!(matches!(
            planner.plan(&snapshot_with_gold(500), &gold_goal(100)),
            Err(PlanError::ExpansionLimitReached(1))
        ));
    }

    #[test]
    fn plan_renders_one_step_per_line() {
        let plan = Planner::new()
            .plan(&snapshot_with_gold(500), &gold_goal(100))
            .unwrap();
        let rendered = plan.to_string();
        assert_eq!(rendered.lines().count(), plan.len());
        assert!(rendered.contains("HARVEST(GOLD, 1, 10)"));
        assert!(rendered.contains("DEPOSIT(GOLD, 1)"));
    }
}
