//! # Search State Module
//!
//! One [`State`] is one node of the search graph: a complete snapshot of
//! every worker, every resource node, the deposited totals and the cost
//! accumulated so far. States are immutable once built; each operator
//! application produces a fresh copy, so no state ever aliases its parent's
//! workers or resources.
//!
//! Two states are *equivalent* for duplicate elimination when they agree on
//! worker positions, worker loads and the deposited totals (see
//! [`State::key`]). The equivalence is deliberately coarse: it ignores how
//! the remaining quantities are distributed across resource nodes, which
//! merges states that differ only in depletion pattern.

use std::collections::BTreeMap;

use crate::operator::Operator;
use crate::world::{Base, Cargo, GoalSpec, ResourceKind, UnitId, WorldSnapshot};
use crate::{PlanError, Position, Result};

/// A worker as the planner sees it: identity, location and load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub id: UnitId,
    pub position: Position,
    /// `Some` while the worker holds a harvested load, `None` otherwise.
    /// A worker can never be "carrying" without a kind.
    pub carrying: Option<Cargo>,
}

/// A harvestable node as the planner sees it.
///
/// Quantity only ever decreases, in 100-unit blocks, through the Harvest
/// operator. Each child state owns its own copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: UnitId,
    pub kind: ResourceKind,
    pub position: Position,
    pub quantity: u32,
}

/// Equivalence key for duplicate-state elimination.
///
/// Covers worker (id, position, load) triples in id order plus the two
/// deposited totals — and nothing else. Resource quantities are
/// intentionally excluded, matching the coarse duplicate detection the
/// search was designed with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    workers: Vec<(UnitId, Position, Option<Cargo>)>,
    deposited_gold: u32,
    deposited_wood: u32,
}

/// A complete snapshot of the planning world: one search node.
#[derive(Debug, Clone)]
pub struct State {
    /// Keyed by worker id; BTreeMap iteration order (ascending id) is the
    /// documented first-fit order for group binding.
    pub(crate) workers: BTreeMap<UnitId, Worker>,
    pub(crate) resources: BTreeMap<UnitId, Resource>,
    pub(crate) deposited_gold: u32,
    pub(crate) deposited_wood: u32,
    pub(crate) required_gold: u32,
    pub(crate) required_wood: u32,
    pub(crate) food_available: u32,
    pub(crate) build_workers: bool,
    pub(crate) base: Base,
    pub(crate) cost: f64,
}

impl State {
    /// Builds the root search state from a world snapshot and a goal.
    ///
    /// Fails fast on snapshots that can never seed a meaningful search:
    /// a missing base, a goal that names a resource kind absent from the
    /// map, or a world with no workers and no way to build one.
    ///
    /// # Errors
    ///
    /// [`PlanError::MissingBase`], [`PlanError::MissingResourceKind`] or
    /// [`PlanError::NoWorkers`].
    pub fn from_snapshot(snapshot: &WorldSnapshot, goal: &GoalSpec) -> Result<Self> {
        let base = snapshot.base.ok_or(PlanError::MissingBase)?;

        if snapshot.workers.is_empty() && !goal.build_workers {
            return Err(PlanError::NoWorkers);
        }

        for (required, kind) in [
            (goal.required_gold, ResourceKind::Gold),
            (goal.required_wood, ResourceKind::Wood),
        ] {
            if required > 0 && !snapshot.resources.iter().any(|r| r.kind == kind) {
                return Err(PlanError::MissingResourceKind(kind));
            }
        }

        let workers = snapshot
            .workers
            .iter()
            .map(|w| {
                (
                    w.id,
                    Worker {
                        id: w.id,
                        position: w.position,
                        carrying: w.carrying,
                    },
                )
            })
            .collect();

        let resources = snapshot
            .resources
            .iter()
            .map(|r| {
                (
                    r.id,
                    Resource {
                        id: r.id,
                        kind: r.kind,
                        position: r.position,
                        quantity: r.quantity,
                    },
                )
            })
            .collect();

        Ok(Self {
            workers,
            resources,
            deposited_gold: 0,
            deposited_wood: 0,
            required_gold: goal.required_gold,
            required_wood: goal.required_wood,
            food_available: snapshot.food_available,
            build_workers: goal.build_workers,
            base,
            cost: 0.0,
        })
    }

    /// True when both deposited totals meet their requirements.
    pub fn is_goal(&self) -> bool {
        self.deposited_gold >= self.required_gold && self.deposited_wood >= self.required_wood
    }

    /// Estimated remaining cost to any goal state.
    ///
    /// Counts the outstanding deficit of each kind (net of loads already
    /// carried) plus 100 per outstanding 100-unit harvest block. Travel is
    /// ignored entirely: two states that differ only in worker positions
    /// score the same. Cheap and coarse by design.
    pub fn heuristic(&self) -> f64 {
        // Widened before summing: each u32 deficit roughly doubles under
        // the per-block term, which can overflow u32 arithmetic.
        let rem_gold = u64::from(self.remaining(ResourceKind::Gold));
        let rem_wood = u64::from(self.remaining(ResourceKind::Wood));
        (rem_gold + rem_wood + 100 * (rem_gold / 100) + 100 * (rem_wood / 100)) as f64
    }

    /// Outstanding amount of `kind`: requirement minus deposits minus
    /// loads currently carried, floored at zero.
    fn remaining(&self, kind: ResourceKind) -> u32 {
        let carried: u32 = self
            .workers
            .values()
            .filter_map(|w| w.carrying.filter(|c| c.kind == kind).map(|c| c.amount))
            .sum();
        self.required_of(kind)
            .saturating_sub(self.deposited_of(kind).saturating_add(carried))
    }

    /// Enumerates every legal one-operator transition out of this state.
    ///
    /// For each resource node whose kind is still deficient and each group
    /// size up to the worker count: a Move toward it and a Harvest at it.
    /// Then Moves toward the base, Deposits per resource kind, and — when
    /// worker building is enabled — BuildWorker. Candidates are filtered
    /// only by their preconditions; everything that passes is applied.
    ///
    /// Iteration runs over the resource map in id order and binds workers
    /// in id order, which pins the produced plan for identical inputs.
    pub fn generate_children(&self) -> Vec<(Operator, State)> {
        let mut children = Vec::new();
        let worker_count = self.workers.len();

        let consider = |op: Option<Operator>, children: &mut Vec<(Operator, State)>| {
            if let Some(op) = op {
                if op.preconditions_met(self) {
                    let child = op.apply(self);
                    children.push((op, child));
                }
            }
        };

        for resource in self.resources.values() {
            if !self.deficient(resource.kind) {
                continue;
            }
            for k in 1..=worker_count {
                consider(
                    Operator::move_toward(self, resource.position, k),
                    &mut children,
                );
                consider(Operator::harvest(self, resource, k), &mut children);
            }
        }

        for k in 1..=worker_count {
            consider(
                Operator::move_toward(self, self.base.position, k),
                &mut children,
            );
        }

        for kind in [ResourceKind::Gold, ResourceKind::Wood] {
            for k in 1..=worker_count {
                consider(Operator::deposit(self, kind, k), &mut children);
            }
        }

        if self.build_workers {
            consider(Some(Operator::build_worker(self.base)), &mut children);
        }

        children
    }

    /// The coarse equivalence key used by the closed set.
    pub fn key(&self) -> StateKey {
        StateKey {
            workers: self
                .workers
                .values()
                .map(|w| (w.id, w.position, w.carrying))
                .collect(),
            deposited_gold: self.deposited_gold,
            deposited_wood: self.deposited_wood,
        }
    }

    /// True while deposits of `kind` are below the requirement.
    pub(crate) fn deficient(&self, kind: ResourceKind) -> bool {
        self.deposited_of(kind) < self.required_of(kind)
    }

    pub(crate) fn deposited_of(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Gold => self.deposited_gold,
            ResourceKind::Wood => self.deposited_wood,
        }
    }

    pub(crate) fn required_of(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Gold => self.required_gold,
            ResourceKind::Wood => self.required_wood,
        }
    }

    pub(crate) fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }

    /// Cost accumulated along the path that produced this state.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn workers(&self) -> &BTreeMap<UnitId, Worker> {
        &self.workers
    }

    pub fn resources(&self) -> &BTreeMap<UnitId, Resource> {
        &self.resources
    }

    pub fn deposited_gold(&self) -> u32 {
        self.deposited_gold
    }

    pub fn deposited_wood(&self) -> u32 {
        self.deposited_wood
    }

    pub fn food_available(&self) -> u32 {
        self.food_available
    }

    pub fn base(&self) -> Base {
        self.base
    }
}
