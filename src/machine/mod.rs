//! The frozen statechart registry.
//!
//! A [`Statechart`] is produced by
//! [`StatechartBuilder::freeze`](crate::builder::StatechartBuilder::freeze)
//! and is read-only from then on, so its precomputed hierarchy tables are
//! always valid and the structural queries are safe to call from any number
//! of concurrent readers. The one deliberate exception is history-state
//! memory, which the execution engine updates through an explicit `&mut`
//! method that never touches the hierarchy.

mod hierarchy;

use crate::core::{State, Transition};
use std::collections::{HashMap, HashSet};

/// An immutable statechart: states, transitions, and the parent/child tree,
/// with memoized structural queries.
///
/// States are addressed by name. Passing a name that was never registered to
/// any query is a contract violation and panics; use [`state`](Self::state)
/// or [`contains`](Self::contains) to probe.
///
/// # Example
///
/// ```rust
/// use statechart::builder::StatechartBuilder;
/// use statechart::core::{CompoundState, SimpleState};
///
/// let mut builder = StatechartBuilder::new("m", "a");
/// builder.register_state(CompoundState::new("a", "a1"), None)?;
/// builder.register_state(SimpleState::new("a1"), Some("a"))?;
/// builder.register_state(SimpleState::new("a2"), Some("a"))?;
/// let chart = builder.freeze()?;
///
/// assert_eq!(chart.descendants_for("a"), vec!["a1", "a2"]);
/// assert_eq!(chart.least_common_ancestor("a1", "a2"), Some("a"));
/// assert_eq!(chart.depth_of(Some("a1")), 2);
/// # Ok::<(), statechart::builder::BuildError>(())
/// ```
pub struct Statechart {
    pub(crate) name: String,
    pub(crate) initial: String,
    pub(crate) execute: Option<String>,
    pub(crate) states: Vec<State>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) roots: Vec<usize>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) outgoing: Vec<Vec<usize>>,
    pub(crate) parent_ids: Vec<Option<usize>>,
    pub(crate) ancestors: Vec<Vec<usize>>,
    pub(crate) ancestor_sets: Vec<HashSet<usize>>,
    pub(crate) descendants: Vec<Vec<usize>>,
    pub(crate) depths: Vec<usize>,
}

impl Statechart {
    /// The machine's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the initial top-level state.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// Opaque startup fragment, if any.
    pub fn execute(&self) -> Option<&str> {
        self.execute.as_deref()
    }

    /// Top-level state names, in registration order.
    pub fn children(&self) -> Vec<&str> {
        self.roots.iter().map(|&r| self.states[r].name()).collect()
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.index.get(name).map(|&id| &self.states[id])
    }

    /// Whether a state with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All registered states, in registration order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// All transitions, in registration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The transitions owned by a state, in registration order.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered.
    pub fn transitions_from(&self, name: &str) -> Vec<&Transition> {
        self.outgoing[self.id(name)]
            .iter()
            .map(|&t| &self.transitions[t])
            .collect()
    }

    /// Name of a state's parent, or `None` for a top-level state.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.parent_ids[self.id(name)].map(|p| self.states[p].name())
    }

    /// Record a new resumption target on a history state.
    ///
    /// This is the only mutation a frozen chart supports. It is owned by the
    /// execution engine, which calls it when a region containing the history
    /// state is exited; the model never updates memory on its own. The
    /// hierarchy tables do not depend on memory, so queries stay valid.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered or does not name a history state.
    pub fn set_history_memory(&mut self, name: &str, target: Option<String>) {
        let id = self.id(name);
        match self.states[id].as_history_mut() {
            Some(history) => history.set_memory(target),
            None => panic!("state `{name}` is not a history state"),
        }
    }

    /// Resolve a name to its frozen id, panicking on contract violation.
    pub(crate) fn id(&self, name: &str) -> usize {
        match self.index.get(name) {
            Some(&id) => id,
            None => panic!("state `{name}` is not registered in statechart `{}`", self.name),
        }
    }

    pub(crate) fn state_at(&self, id: usize) -> &State {
        &self.states[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StatechartBuilder;
    use crate::core::{CompoundState, HistoryState, SimpleState};

    fn sample_chart() -> Statechart {
        let mut builder = StatechartBuilder::new("m", "work");
        builder
            .register_state(CompoundState::new("work", "drafting"), None)
            .unwrap();
        builder
            .register_state(SimpleState::new("drafting"), Some("work"))
            .unwrap();
        builder
            .register_state(SimpleState::new("review"), Some("work"))
            .unwrap();
        builder
            .register_state(
                HistoryState::new("work.history").with_initial("drafting"),
                Some("work"),
            )
            .unwrap();
        builder.freeze().unwrap()
    }

    #[test]
    fn lookups_resolve_registered_names() {
        let chart = sample_chart();
        assert_eq!(chart.name(), "m");
        assert_eq!(chart.initial(), "work");
        assert!(chart.contains("drafting"));
        assert!(!chart.contains("ghost"));
        assert!(chart.state("review").is_some());
        assert!(chart.state("ghost").is_none());
        assert_eq!(chart.children(), vec!["work"]);
        assert_eq!(chart.states().count(), 4);
    }

    #[test]
    fn parent_of_resolves_the_tree() {
        let chart = sample_chart();
        assert_eq!(chart.parent_of("drafting"), Some("work"));
        assert_eq!(chart.parent_of("work"), None);
    }

    #[test]
    fn history_memory_survives_the_freeze_and_is_settable() {
        let mut chart = sample_chart();
        let memory = chart
            .state("work.history")
            .and_then(|s| s.as_history())
            .and_then(|h| h.memory().map(str::to_owned));
        assert_eq!(memory.as_deref(), Some("drafting"));

        chart.set_history_memory("work.history", Some("review".to_string()));
        let memory = chart
            .state("work.history")
            .and_then(|s| s.as_history())
            .and_then(|h| h.memory());
        assert_eq!(memory, Some("review"));
    }

    #[test]
    #[should_panic(expected = "is not a history state")]
    fn setting_memory_on_a_non_history_state_panics() {
        let mut chart = sample_chart();
        chart.set_history_memory("drafting", None);
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn unknown_name_panics_at_query_time() {
        let chart = sample_chart();
        chart.transitions_from("ghost");
    }
}
