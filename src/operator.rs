//! # Operator Module
//!
//! The four STRIPS-style operators the planner searches over: Move,
//! Harvest, Deposit and BuildWorker. The set is fixed and domain-specific,
//! so operators are a closed tagged union rather than an open trait:
//! pattern matching in [`Operator::preconditions_met`], [`Operator::apply`]
//! and [`Operator::to_command`] is checked for exhaustiveness at compile
//! time.
//!
//! Every operator is *bound* at construction time: the constructors on
//! [`Operator`] inspect the state they will be applied to and pick the
//! acting workers (and, for Move, their destination cells) using a
//! documented first-fit policy — workers in ascending id order, cells in
//! the fixed order of [`Position::adjacent_positions`]. The greedy binding
//! is deliberately not a globally optimal assignment; plan determinism
//! depends on its exact tie-break order.
//!
//! ## Contract
//!
//! * `preconditions_met(state)` — pure predicate, no side effects.
//! * `apply(state)` — builds a fresh child state; calling it when the
//!   preconditions are not met is a contract violation, which the search
//!   driver rules out by gating every application.
//! * `to_command(actor)` — renders the operator as a [`Command`] for the
//!   external executor once a concrete actor binding is known.

use std::fmt;

use crate::command::Command;
use crate::state::{Resource, State, Worker};
use crate::world::{Base, Cargo, ResourceKind, UnitId};
use crate::Position;

/// Cost constant added per harvest of gold; gold is cheaper than wood.
const GOLD_HARVEST_COST: f64 = 1.0;
/// Cost constant added per harvest of wood.
const WOOD_HARVEST_COST: f64 = 2.0;
/// Deposited gold consumed by one BuildWorker.
const WORKER_GOLD_PRICE: u32 = 400;
/// Units transferred by one completed harvest, per worker.
const HARVEST_BLOCK: u32 = 100;

/// One bound planning operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Move a group of workers to cells adjacent to `target`, in lockstep.
    Move {
        target: Position,
        /// (worker id, assigned destination cell) pairs, in binding order.
        group: Vec<(UnitId, Position)>,
    },
    /// Have a group of empty-handed workers gather 100 units each.
    Harvest {
        resource: UnitId,
        kind: ResourceKind,
        /// Location of the resource node.
        at: Position,
        group: Vec<UnitId>,
    },
    /// Have a group of same-kind carriers unload at the base.
    Deposit {
        kind: ResourceKind,
        base: Base,
        group: Vec<UnitId>,
    },
    /// Have the base produce one new worker.
    BuildWorker { base: Base },
}

impl Operator {
    /// Binds a Move of `k` workers toward `target`.
    ///
    /// Workers are considered in id order. Each is assigned the adjacent
    /// cell of `target` nearest to its current position among the cells
    /// not claimed by an earlier member of the group; a worker already
    /// standing on that cell is ineligible and skipped. Returns `None`
    /// when fewer than `k` workers can be bound.
    pub fn move_toward(state: &State, target: Position, k: usize) -> Option<Operator> {
        if k == 0 {
            return None;
        }
        let mut group = Vec::with_capacity(k);
        let mut claimed: Vec<Position> = Vec::with_capacity(k);

        for worker in state.workers.values() {
            if group.len() == k {
                break;
            }
            let mut best: Option<(f64, Position)> = None;
            for cell in target.adjacent_positions() {
                if claimed.contains(&cell) {
                    continue;
                }
                let dist = worker.position.euclidean_distance(cell);
                if best.map_or(true, |(b, _)| dist < b) {
                    best = Some((dist, cell));
                }
            }
            let Some((_, cell)) = best else {
                // Every adjacent cell already claimed; no further worker
                // can join this group.
                break;
            };
            if worker.position == cell {
                continue;
            }
            claimed.push(cell);
            group.push((worker.id, cell));
        }

        (group.len() == k).then(|| Operator::Move { target, group })
    }

    /// Binds a Harvest of `k` workers at `resource`.
    ///
    /// Takes the first `k` workers (id order) that stand at or adjacent to
    /// the node and carry nothing. Returns `None` when fewer qualify; the
    /// quantity check lives in the precondition.
    pub fn harvest(state: &State, resource: &Resource, k: usize) -> Option<Operator> {
        if k == 0 {
            return None;
        }
        let group: Vec<UnitId> = state
            .workers
            .values()
            .filter(|w| w.position.is_at_or_adjacent(resource.position) && w.carrying.is_none())
            .take(k)
            .map(|w| w.id)
            .collect();

        (group.len() == k).then(|| Operator::Harvest {
            resource: resource.id,
            kind: resource.kind,
            at: resource.position,
            group,
        })
    }

    /// Binds a Deposit of `k` workers carrying `kind`.
    ///
    /// The group is homogeneous by construction: a worker carrying the
    /// other kind never joins, so a mixed set of carriers near the base
    /// yields separate Deposit operators per kind.
    pub fn deposit(state: &State, kind: ResourceKind, k: usize) -> Option<Operator> {
        if k == 0 {
            return None;
        }
        let base = state.base;
        let group: Vec<UnitId> = state
            .workers
            .values()
            .filter(|w| {
                w.position.is_at_or_adjacent(base.position)
                    && w.carrying.map_or(false, |c| c.kind == kind)
            })
            .take(k)
            .map(|w| w.id)
            .collect();

        (group.len() == k).then(|| Operator::Deposit { kind, base, group })
    }

    /// A BuildWorker issued by `base`. Always constructible; the gold and
    /// food gates live in the precondition.
    pub fn build_worker(base: Base) -> Operator {
        Operator::BuildWorker { base }
    }

    /// Pure precondition check against `state`.
    pub fn preconditions_met(&self, state: &State) -> bool {
        match self {
            Operator::Move { group, .. } => {
                !state.is_goal()
                    && !group.is_empty()
                    && group.iter().all(|(id, dest)| {
                        state
                            .workers
                            .get(id)
                            .map_or(false, |w| w.position != *dest)
                    })
            }
            Operator::Harvest {
                resource,
                at,
                group,
                ..
            } => {
                let quantity_ok = state
                    .resources
                    .get(resource)
                    .map_or(false, |r| r.quantity >= HARVEST_BLOCK * group.len() as u32);
                quantity_ok
                    && !group.is_empty()
                    && group.iter().all(|id| {
                        state.workers.get(id).map_or(false, |w| {
                            w.position.is_at_or_adjacent(*at) && w.carrying.is_none()
                        })
                    })
            }
            Operator::Deposit { kind, base, group } => {
                !group.is_empty()
                    && group.iter().all(|id| {
                        state.workers.get(id).map_or(false, |w| {
                            w.position.is_at_or_adjacent(base.position)
                                && w.carrying.map_or(false, |c| c.kind == *kind)
                        })
                    })
            }
            Operator::BuildWorker { .. } => {
                state.food_available > 0 && state.deposited_gold >= WORKER_GOLD_PRICE
            }
        }
    }

    /// Produces the child state this operator leads to.
    ///
    /// Must only be called when [`Operator::preconditions_met`] holds; the
    /// search driver guarantees this, so `apply` does not defend against
    /// misuse beyond the panics of a broken binding.
    pub fn apply(&self, state: &State) -> State {
        let mut next = state.clone();
        match self {
            Operator::Move { group, .. } => {
                // Lockstep travel: the group costs as much as its slowest
                // member, not the sum.
                let mut travel = 0.0f64;
                for (id, dest) in group {
                    let worker = next
                        .workers
                        .get_mut(id)
                        .expect("move bound to a worker missing from the state");
                    travel = travel.max(worker.position.euclidean_distance(*dest));
                    worker.position = *dest;
                }
                next.set_cost(state.cost() + travel);
            }
            Operator::Harvest {
                resource,
                kind,
                at,
                group,
            } => {
                let mut dist = 0.0f64;
                for id in group {
                    let worker = next
                        .workers
                        .get_mut(id)
                        .expect("harvest bound to a worker missing from the state");
                    dist = dist.max(worker.position.euclidean_distance(*at));
                    worker.carrying = Some(Cargo {
                        kind: *kind,
                        amount: HARVEST_BLOCK,
                    });
                }
                let node = next
                    .resources
                    .get_mut(resource)
                    .expect("harvest bound to a resource missing from the state");
                node.quantity -= HARVEST_BLOCK * group.len() as u32;

                let kind_cost = match kind {
                    ResourceKind::Gold => GOLD_HARVEST_COST,
                    ResourceKind::Wood => WOOD_HARVEST_COST,
                };
                // Grouping harvesters buys throughput: distance is split
                // across the group.
                let k = group.len() as f64;
                next.set_cost(state.cost() + dist / k * 19.0 + 8.0 + kind_cost);
            }
            Operator::Deposit { kind, base, group } => {
                for id in group {
                    let worker = next
                        .workers
                        .get_mut(id)
                        .expect("deposit bound to a worker missing from the state");
                    worker.position = base.position;
                    worker.carrying = None;
                }
                let amount = HARVEST_BLOCK * group.len() as u32;
                match kind {
                    ResourceKind::Gold => next.deposited_gold += amount,
                    ResourceKind::Wood => next.deposited_wood += amount,
                }
                // Deposit itself is free; the travel was paid by the Move
                // that brought the group here.
            }
            Operator::BuildWorker { base } => {
                let id = next.workers.keys().next_back().map_or(1, |max| max + 1);
                next.workers.insert(
                    id,
                    Worker {
                        id,
                        position: base.position,
                        carrying: None,
                    },
                );
                next.food_available -= 1;
                next.deposited_gold -= WORKER_GOLD_PRICE;
            }
        }
        next
    }

    /// Renders this operator as a command for the external executor.
    ///
    /// `actor` is the concrete unit the executor has bound this step to —
    /// for group operators the executor calls this once per member.
    /// BuildWorker is issued by the base regardless of `actor`.
    pub fn to_command(&self, actor: UnitId) -> Command {
        match self {
            Operator::Move { target, .. } => Command::Move {
                actor,
                target: *target,
            },
            Operator::Harvest { resource, .. } => Command::Harvest {
                actor,
                resource: *resource,
            },
            Operator::Deposit { base, .. } => Command::Deposit {
                actor,
                base: base.id,
            },
            Operator::BuildWorker { base } => Command::Produce {
                actor: base.id,
                template: base.worker_template,
            },
        }
    }

    /// The ids of the units acting in this operator, in binding order.
    pub fn acting_units(&self) -> Vec<UnitId> {
        match self {
            Operator::Move { group, .. } => group.iter().map(|(id, _)| *id).collect(),
            Operator::Harvest { group, .. } | Operator::Deposit { group, .. } => group.clone(),
            Operator::BuildWorker { base } => vec![base.id],
        }
    }

    /// Upper-case operator name, as used in plan renderings.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Move { .. } => "MOVE",
            Operator::Harvest { .. } => "HARVEST",
            Operator::Deposit { .. } => "DEPOSIT",
            Operator::BuildWorker { .. } => "BUILDWORKER",
        }
    }

    /// Number of acting units.
    pub fn group_size(&self) -> usize {
        match self {
            Operator::Move { group, .. } => group.len(),
            Operator::Harvest { group, .. } | Operator::Deposit { group, .. } => group.len(),
            Operator::BuildWorker { .. } => 1,
        }
    }
}

impl fmt::Display for Operator {
    /// `OPNAME(params...)` — one line of the plan serialization.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Move { target, group } => {
                write!(f, "MOVE({}, {}, {})", group.len(), target.x, target.y)
            }
            Operator::Harvest {
                kind,
                resource,
                group,
                ..
            } => write!(f, "HARVEST({}, {}, {})", kind, group.len(), resource),
            Operator::Deposit { kind, group, .. } => {
                write!(f, "DEPOSIT({}, {})", kind, group.len())
            }
            Operator::BuildWorker { .. } => write!(f, "BUILDWORKER()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{bare_state, gold_node, worker_at};

    fn wood_node(id: UnitId, x: i32, y: i32, quantity: u32) -> Resource {
        Resource {
            id,
            kind: ResourceKind::Wood,
            position: Position::new(x, y),
            quantity,
        }
    }

    #[test]
    fn move_picks_nearest_adjacent_cell() {
        let state = bare_state(
            vec![worker_at(1, 0, 1)],
            vec![gold_node(10, 5, 0, 500)],
            200,
            0,
        );
        let op = Operator::move_toward(&state, Position::new(5, 0), 1).unwrap();
        match &op {
            Operator::Move { group, .. } => {
                // Nearest adjacent cell of (5, 0) from (0, 1) is (4, 1).
                assert_eq!(group, &vec![(1, Position::new(4, 1))]);
            }
            other => panic!("expected Move, got {other:?}"),
        }
        assert!(op.preconditions_met(&state));

        let child = op.apply(&state);
        assert_eq!(child.workers()[&1].position, Position::new(4, 1));
        assert_eq!(child.cost(), 4.0);
    }

    #[test]
    fn move_group_assignment_is_first_fit_in_id_order() {
        let state = bare_state(
            vec![worker_at(1, 0, 0), worker_at(2, 0, 0)],
            vec![gold_node(10, 5, 0, 500)],
            200,
            0,
        );
        let op = Operator::move_toward(&state, Position::new(5, 0), 2).unwrap();
        match op {
            Operator::Move { group, .. } => {
                // Worker 1 claims the unique nearest cell (4, 0); worker 2
                // falls back to the first of the tied cells (4, -1) in
                // adjacent-cell order.
                assert_eq!(
                    group,
                    vec![(1, Position::new(4, 0)), (2, Position::new(4, -1))]
                );
            }
            other => panic!("expected Move, got {other:?}"),
        }
    }

    #[test]
    fn move_group_cost_is_max_not_sum() {
        let state = bare_state(
            vec![worker_at(1, 4, 2), worker_at(2, 0, 0)],
            vec![gold_node(10, 5, 0, 500)],
            200,
            0,
        );
        let op = Operator::move_toward(&state, Position::new(5, 0), 2).unwrap();
        let child = op.apply(&state);
        // Worker 1 claims (4, 1) at distance 1; worker 2 claims (4, 0) at
        // distance 4. Lockstep travel costs the slower leg only.
        assert_eq!(child.cost(), 4.0);
    }

    #[test]
    fn worker_on_its_nearest_cell_is_ineligible() {
        let state = bare_state(
            vec![worker_at(1, 4, 0)],
            vec![gold_node(10, 5, 0, 500)],
            200,
            0,
        );
        assert!(Operator::move_toward(&state, Position::new(5, 0), 1).is_none());
    }

    #[test]
    fn move_blocked_once_goal_is_reached() {
        let mut state = bare_state(
            vec![worker_at(1, 0, 1)],
            vec![gold_node(10, 5, 0, 500)],
            100,
            0,
        );
        state.deposited_gold = 100;
        let op = Operator::move_toward(&state, Position::new(5, 0), 1).unwrap();
        assert!(!op.preconditions_met(&state));
    }

    #[test]
    fn move_preserves_cargo() {
        let mut state = bare_state(
            vec![worker_at(1, 4, 0)],
            vec![gold_node(10, 5, 0, 500)],
            200,
            0,
        );
        state.workers.get_mut(&1).unwrap().carrying = Some(Cargo {
            kind: ResourceKind::Gold,
            amount: 100,
        });
        let op = Operator::move_toward(&state, Position::new(0, 0), 1).unwrap();
        let child = op.apply(&state);
        assert_eq!(
            child.workers()[&1].carrying,
            Some(Cargo {
                kind: ResourceKind::Gold,
                amount: 100
            })
        );
    }

    #[test]
    fn harvest_loads_workers_and_depletes_node() {
        let state = bare_state(
            vec![worker_at(1, 4, 0), worker_at(2, 4, 1)],
            vec![gold_node(10, 5, 0, 500)],
            200,
            0,
        );
        let resource = state.resources()[&10].clone();
        let op = Operator::harvest(&state, &resource, 2).unwrap();
        assert!(op.preconditions_met(&state));

        let child = op.apply(&state);
        assert_eq!(child.resources()[&10].quantity, 300);
        for id in [1, 2] {
            assert_eq!(
                child.workers()[&id].carrying,
                Some(Cargo {
                    kind: ResourceKind::Gold,
                    amount: 100
                })
            );
            // Harvest leaves workers where they stand.
            assert_eq!(child.workers()[&id].position, state.workers()[&id].position);
        }
    }

    #[test]
    fn harvest_cost_divides_travel_across_group() {
        let state = bare_state(
            vec![worker_at(1, 4, 0)],
            vec![gold_node(10, 5, 0, 500)],
            200,
            0,
        );
        let resource = state.resources()[&10].clone();
        let op = Operator::harvest(&state, &resource, 1).unwrap();
        let child = op.apply(&state);
        // distance 1 / k 1 * 19 + 8 + 1 (gold).
        assert_eq!(child.cost(), 28.0);
    }

    #[test]
    fn wood_harvest_costs_more_than_gold() {
        let gold_state = bare_state(
            vec![worker_at(1, 4, 0)],
            vec![gold_node(10, 5, 0, 500)],
            200,
            0,
        );
        let wood_state = bare_state(
            vec![worker_at(1, 4, 0)],
            vec![wood_node(11, 5, 0, 500)],
            0,
            200,
        );
        let gold_cost = Operator::harvest(&gold_state, &gold_state.resources()[&10].clone(), 1)
            .unwrap()
            .apply(&gold_state)
            .cost();
        let wood_cost = Operator::harvest(&wood_state, &wood_state.resources()[&11].clone(), 1)
            .unwrap()
            .apply(&wood_state)
            .cost();
        assert!(gold_cost < wood_cost);
    }

    #[test]
    fn harvest_requires_full_blocks() {
        let state = bare_state(
            vec![worker_at(1, 4, 0)],
            vec![gold_node(10, 5, 0, 50)],
            100,
            0,
        );
        let resource = state.resources()[&10].clone();
        let op = Operator::harvest(&state, &resource, 1).unwrap();
        // A 50-unit node can never satisfy a 100-unit harvest.
        assert!(!op.preconditions_met(&state));
    }

    #[test]
    fn harvest_skips_loaded_workers() {
        let mut state = bare_state(
            vec![worker_at(1, 4, 0), worker_at(2, 4, 1)],
            vec![gold_node(10, 5, 0, 500)],
            200,
            0,
        );
        state.workers.get_mut(&1).unwrap().carrying = Some(Cargo {
            kind: ResourceKind::Gold,
            amount: 100,
        });
        let resource = state.resources()[&10].clone();
        let op = Operator::harvest(&state, &resource, 1).unwrap();
        assert_eq!(op.acting_units(), vec![2]);
        assert!(Operator::harvest(&state, &resource, 2).is_none());
    }

    #[test]
    fn deposit_unloads_at_base_and_is_free() {
        let mut state = bare_state(vec![worker_at(1, 1, 0)], vec![], 100, 0);
        state.workers.get_mut(&1).unwrap().carrying = Some(Cargo {
            kind: ResourceKind::Gold,
            amount: 100,
        });
        state.cost = 12.5;

        let op = Operator::deposit(&state, ResourceKind::Gold, 1).unwrap();
        assert!(op.preconditions_met(&state));

        let child = op.apply(&state);
        assert_eq!(child.deposited_gold(), 100);
        assert_eq!(child.deposited_wood(), 0);
        assert_eq!(child.workers()[&1].position, state.base().position);
        assert!(child.workers()[&1].carrying.is_none());
        assert_eq!(child.cost(), 12.5);
    }

    #[test]
    fn deposit_groups_are_homogeneous_by_kind() {
        let mut state = bare_state(vec![worker_at(1, 1, 0), worker_at(2, 0, 1)], vec![], 100, 100);
        state.workers.get_mut(&1).unwrap().carrying = Some(Cargo {
            kind: ResourceKind::Gold,
            amount: 100,
        });
        state.workers.get_mut(&2).unwrap().carrying = Some(Cargo {
            kind: ResourceKind::Wood,
            amount: 100,
        });

        // One carrier per kind: no two-strong group of either kind exists.
        assert!(Operator::deposit(&state, ResourceKind::Gold, 2).is_none());
        assert!(Operator::deposit(&state, ResourceKind::Wood, 2).is_none());

        let gold = Operator::deposit(&state, ResourceKind::Gold, 1).unwrap();
        assert_eq!(gold.acting_units(), vec![1]);
        let wood = Operator::deposit(&state, ResourceKind::Wood, 1).unwrap();
        assert_eq!(wood.acting_units(), vec![2]);
    }

    #[test]
    fn build_worker_gates_on_gold_and_food() {
        let mut state = bare_state(vec![worker_at(1, 0, 1)], vec![], 0, 0);
        state.build_workers = true;
        state.food_available = 1;
        let op = Operator::build_worker(state.base());

        state.deposited_gold = 399;
        assert!(!op.preconditions_met(&state));

        state.deposited_gold = 400;
        assert!(op.preconditions_met(&state));

        state.food_available = 0;
        assert!(!op.preconditions_met(&state));
    }

    #[test]
    fn build_worker_spawns_at_base_and_debits() {
        let mut state = bare_state(vec![worker_at(1, 0, 1)], vec![], 0, 0);
        state.build_workers = true;
        state.food_available = 2;
        state.deposited_gold = 500;

        let op = Operator::build_worker(state.base());
        let child = op.apply(&state);

        assert_eq!(child.workers().len(), 2);
        assert_eq!(child.workers()[&2].position, state.base().position);
        assert!(child.workers()[&2].carrying.is_none());
        assert_eq!(child.deposited_gold(), 100);
        assert_eq!(child.food_available(), 1);
        assert_eq!(child.cost(), state.cost());
    }

    #[test]
    fn command_renderings() {
        let base = Base {
            id: 100,
            position: Position::new(0, 0),
            worker_template: 26,
        };
        let mv = Operator::Move {
            target: Position::new(5, 0),
            group: vec![(1, Position::new(4, 0))],
        };
        assert_eq!(
            mv.to_command(1),
            Command::Move {
                actor: 1,
                target: Position::new(5, 0)
            }
        );

        let harvest = Operator::Harvest {
            resource: 10,
            kind: ResourceKind::Gold,
            at: Position::new(5, 0),
            group: vec![1],
        };
        assert_eq!(
            harvest.to_command(1),
            Command::Harvest {
                actor: 1,
                resource: 10
            }
        );

        let deposit = Operator::Deposit {
            kind: ResourceKind::Gold,
            base,
            group: vec![1],
        };
        assert_eq!(deposit.to_command(1), Command::Deposit { actor: 1, base: 100 });

        let build = Operator::BuildWorker { base };
        assert_eq!(
            build.to_command(1),
            Command::Produce {
                actor: 100,
                template: 26
            }
        );
    }

    #[test]
    fn display_forms() {
        let base = Base {
            id: 100,
            position: Position::new(0, 0),
            worker_template: 26,
        };
        let mv = Operator::Move {
            target: Position::new(5, 0),
            group: vec![(1, Position::new(4, 0))],
        };
        assert_eq!(mv.to_string(), "MOVE(1, 5, 0)");

        let harvest = Operator::Harvest {
            resource: 10,
            kind: ResourceKind::Wood,
            at: Position::new(5, 0),
            group: vec![1, 2],
        };
        assert_eq!(harvest.to_string(), "HARVEST(WOOD, 2, 10)");

        let deposit = Operator::Deposit {
            kind: ResourceKind::Gold,
            base,
            group: vec![1],
        };
        assert_eq!(deposit.to_string(), "DEPOSIT(GOLD, 1)");

        assert_eq!(Operator::BuildWorker { base }.to_string(), "BUILDWORKER()");
    }
}
