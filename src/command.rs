//! # External Command Descriptors
//!
//! The only contract between the planner and the executor that drives the
//! real simulation. Each planned operator, once bound to a concrete actor
//! id, renders to exactly one [`Command`]; the planner itself never issues
//! commands.

use crate::world::UnitId;
use crate::Position;

/// A primitive or compound command for the external executor.
///
/// Targets are kind-specific: a coordinate for movement, a resource node id
/// for harvesting, the base id for deposits, and a unit template id for
/// production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move `actor` toward the target area; the executor is responsible
    /// for breaking this down into single steps.
    Move { actor: UnitId, target: Position },
    /// Have `actor` gather from the given resource node.
    Harvest { actor: UnitId, resource: UnitId },
    /// Have `actor` drop its load at the base.
    Deposit { actor: UnitId, base: UnitId },
    /// Have the base produce one unit from `template`.
    Produce { actor: UnitId, template: UnitId },
}

impl Command {
    /// The unit expected to execute this command.
    pub fn actor(&self) -> UnitId {
        match *self {
            Command::Move { actor, .. }
            | Command::Harvest { actor, .. }
            | Command::Deposit { actor, .. }
            | Command::Produce { actor, .. } => actor,
        }
    }
}
