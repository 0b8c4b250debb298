//! # A* Search Driver
//!
//! Best-first search over the state graph spanned by the four operators.
//! All nodes created during a search live in one arena `Vec`; parent links
//! are arena indices, so reconstructing the plan is a walk from the goal
//! node back to the root.
//!
//! Duplicate elimination uses the coarse [`StateKey`] equivalence from the
//! state module. The closed map remembers the arena index of the first
//! expansion of each key; when a cheaper path to an already-closed key is
//! popped later, the closed node is relaxed in place (cost and parent link
//! rewritten) but not re-inserted into the open queue. Nodes downstream of
//! the relaxed entry keep their stale costs, a known limitation accepted
//! for the simplicity of the scheme.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use log::{debug, trace};

use crate::operator::Operator;
use crate::planner::Plan;
use crate::state::{State, StateKey};
use crate::{PlanError, Result};

/// One node in the search arena.
#[derive(Debug, Clone)]
struct Node {
    /// The state at this node.
    state: State,
    /// Arena index of the parent node, `None` for the root.
    parent: Option<usize>,
    /// Operator that produced this state from the parent.
    operator: Option<Operator>,
    /// Path cost from the root.
    g_cost: f64,
    /// Heuristic estimate from this state to a goal.
    h_cost: f64,
}

impl Node {
    fn new(state: State, parent: Option<usize>, operator: Option<Operator>) -> Self {
        let g_cost = state.cost();
        let h_cost = state.heuristic();
        Self {
            state,
            parent,
            operator,
            g_cost,
            h_cost,
        }
    }

    /// Total estimated cost (f = g + h).
    fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }
}

/// Open-queue entry: an arena index plus the costs it was enqueued with.
///
/// Costs are copied out of the node so a later relaxation of the node
/// cannot corrupt the heap invariant of entries already enqueued.
#[derive(Debug, Clone)]
struct OpenEntry {
    idx: usize,
    f_cost: f64,
    g_cost: f64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.g_cost == other.g_cost
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let f_cmp = self.f_cost.partial_cmp(&other.f_cost);
        if f_cmp != Some(Ordering::Equal) {
            return f_cmp;
        }
        // On equal f, prefer the entry further along its path.
        self.g_cost.partial_cmp(&other.g_cost)
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

/// Owns the three collections of one search: the node arena, the open
/// queue and the closed map.
struct SearchContext {
    nodes: Vec<Node>,
    open: BinaryHeap<Reverse<OpenEntry>>,
    closed: HashMap<StateKey, usize>,
}

impl SearchContext {
    fn new(root: State) -> Self {
        let mut context = Self {
            nodes: Vec::new(),
            open: BinaryHeap::new(),
            closed: HashMap::new(),
        };
        let root_idx = context.store(Node::new(root, None, None));
        context.enqueue(root_idx);
        context
    }

    fn store(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn enqueue(&mut self, idx: usize) {
        let node = &self.nodes[idx];
        self.open.push(Reverse(OpenEntry {
            idx,
            f_cost: node.f_cost(),
            g_cost: node.g_cost,
        }));
    }

    /// Walks parent links from `goal_idx` back to the root and reverses
    /// the collected operators.
    fn reconstruct(&self, goal_idx: usize) -> Vec<Operator> {
        let mut steps = Vec::new();
        let mut current = goal_idx;
        while let Some(node) = self.nodes.get(current) {
            if let Some(operator) = &node.operator {
                steps.push(operator.clone());
            }
            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        steps.reverse();
        steps
    }
}

/// A* search with a node-expansion budget.
///
/// The budget is mandatory because the state space is unbounded when
/// worker building is enabled; exceeding it is reported as an error
/// rather than a silent truncation.
pub struct AStar {
    expansion_limit: usize,
}

impl AStar {
    pub fn new(expansion_limit: usize) -> Self {
        Self { expansion_limit }
    }

    /// Runs the search from `root` and returns the cheapest plan found.
    ///
    /// A root that already satisfies the goal yields an empty plan.
    ///
    /// # Errors
    ///
    /// [`PlanError::NoPlanFound`] when the open queue drains without
    /// reaching a goal, [`PlanError::ExpansionLimitReached`] when the
    /// node budget runs out first.
    pub fn search(&self, root: State) -> Result<Plan> {
        let mut context = SearchContext::new(root);
        let mut expansions = 0usize;

        while let Some(Reverse(entry)) = context.open.pop() {
            let idx = entry.idx;
            // A goal node is never charged against the budget; a plan
            // found on the last allowed pop is still a plan.
            if context.nodes[idx].state.is_goal() {
                let steps = context.reconstruct(idx);
                let cost = context.nodes[idx].g_cost;
                debug!(
                    "goal reached after {} expansions, plan of {} steps, cost {:.2}",
                    expansions,
                    steps.len(),
                    cost
                );
                return Ok(Plan::new(steps, cost));
            }

            if expansions >= self.expansion_limit {
                debug!(
                    "expansion limit {} reached, {} nodes in arena",
                    self.expansion_limit,
                    context.nodes.len()
                );
                return Err(PlanError::ExpansionLimitReached(self.expansion_limit));
            }
            expansions += 1;

            let key = context.nodes[idx].state.key();
            match context.closed.get(&key) {
                None => {
                    context.closed.insert(key, idx);
                }
                Some(&closed_idx) => {
                    // A cheaper route to an already-expanded equivalence
                    // class: rewrite the closed node in place. Entries
                    // already enqueued under the old cost stay stale.
                    if context.nodes[closed_idx].g_cost > context.nodes[idx].g_cost {
                        trace!(
                            "relaxing closed node {} from {:.2} to {:.2}",
                            closed_idx,
                            context.nodes[closed_idx].g_cost,
                            context.nodes[idx].g_cost
                        );
                        let g_cost = context.nodes[idx].g_cost;
                        let parent = context.nodes[idx].parent;
                        let operator = context.nodes[idx].operator.clone();
                        let relaxed = &mut context.nodes[closed_idx];
                        relaxed.g_cost = g_cost;
                        relaxed.parent = parent;
                        relaxed.operator = operator;
                        relaxed.state.set_cost(g_cost);
                    }
                }
            }

            for (operator, child) in context.nodes[idx].state.generate_children() {
                if context.closed.contains_key(&child.key()) {
                    continue;
                }
                // No check against existing open entries; logically equal
                // children may be enqueued more than once and are weeded
                // out by the closed map when popped.
                let child_idx = context.store(Node::new(child, Some(idx), Some(operator)));
                context.enqueue(child_idx);
            }
        }

        debug!("open queue exhausted after {expansions} expansions");
        Err(PlanError::NoPlanFound)
    }
}
