//! Build errors for statechart construction.

use thiserror::Error;

/// Errors that can occur while registering states and transitions or while
/// freezing the chart.
///
/// All of these are raised synchronously at the offending call. None are
/// recoverable by the model itself: a chart whose build failed must not be
/// queried, and `freeze` makes that structural by never returning one.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("state `{0}` is already registered")]
    DuplicateState(String),

    #[error("state `{0}` is not registered")]
    StateNotFound(String),

    #[error("state `{state}` declares parent `{parent}`, which was never registered")]
    DanglingParent { state: String, parent: String },

    #[error("state `{state}` declares parent `{parent}`, which cannot own children")]
    InvalidParent { state: String, parent: String },

    #[error("`{initial}` is not a direct child of `{scope}`")]
    InvalidInitial { scope: String, initial: String },

    #[error("final state `{0}` cannot be the source of a transition")]
    TransitionFromFinal(String),

    #[error("history state `{0}` cannot be the source of a transition")]
    TransitionFromHistory(String),

    #[error("the parent chain of `{0}` contains a cycle")]
    HierarchyCycle(String),
}
