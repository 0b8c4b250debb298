use thiserror::Error;

use crate::ResourceKind;

/// Errors surfaced by the planner.
///
/// Planning failures are ordinary values, never panics: a snapshot that
/// cannot seed a search fails fast with a configuration variant, and a
/// search that ends without a goal reports exactly why.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The snapshot contains no home base.
    #[error("snapshot has no home base")]
    MissingBase,

    /// A resource kind is required by the goal but absent from the map.
    #[error("goal requires {0} but the map has no {0} node")]
    MissingResourceKind(ResourceKind),

    /// There are no workers and none can be built.
    #[error("snapshot has no workers and worker building is disabled")]
    NoWorkers,

    /// The open set was exhausted without reaching a goal state.
    #[error("no valid plan found to reach the goal")]
    NoPlanFound,

    /// The search expanded its full node budget before finding a goal.
    ///
    /// The budget is a safety valve: with worker building enabled the
    /// state space is unbounded.
    #[error("search expansion limit of {0} reached before a goal state")]
    ExpansionLimitReached(usize),
}

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            PlanError::MissingBase.to_string(),
            "snapshot has no home base"
        );
        assert_eq!(
            PlanError::MissingResourceKind(ResourceKind::Wood).to_string(),
            "goal requires WOOD but the map has no WOOD node"
        );
        assert_eq!(
            PlanError::ExpansionLimitReached(42).to_string(),
            "search expansion limit of 42 reached before a goal state"
        );
    }
}
