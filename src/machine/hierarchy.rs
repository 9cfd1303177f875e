//! Structural queries over the frozen hierarchy.
//!
//! These are the queries an execution engine composes to compute entry/exit
//! sets and transition scope: ancestor chains, descendant enumeration,
//! depth, least common ancestor, and leaf filtering. All of them are pure
//! lookups into tables precomputed at freeze time, so repeated calls cost
//! nothing beyond the result allocation and no cache can ever go stale.
//!
//! Every query panics on a name that was never registered: by the time the
//! engine runs, all names have been validated, so an unknown one is a
//! programming error, not a condition to handle.

use super::Statechart;
use std::collections::HashSet;

impl Statechart {
    /// Ancestor names of `state`, nearest first.
    ///
    /// The implicit root (the machine itself) is never included, so a
    /// top-level state has no ancestors.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not registered.
    pub fn ancestors_for(&self, state: &str) -> Vec<&str> {
        self.ancestors[self.id(state)]
            .iter()
            .map(|&a| self.states[a].name())
            .collect()
    }

    /// Descendant names of `state`, breadth-first: direct children first,
    /// then theirs, so the result is ordered by increasing depth. Siblings
    /// appear in registration order. Empty for non-composite states.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not registered.
    pub fn descendants_for(&self, state: &str) -> Vec<&str> {
        self.descendants[self.id(state)]
            .iter()
            .map(|&d| self.states[d].name())
            .collect()
    }

    /// Depth of `state`: `None` is the root sentinel at depth 0, a top-level
    /// state is at depth 1, and so on. Always `1 + ancestors_for(state).len()`
    /// for a named state.
    ///
    /// # Panics
    ///
    /// Panics if a given name is not registered.
    pub fn depth_of(&self, state: Option<&str>) -> usize {
        match state {
            None => 0,
            Some(state) => self.depths[self.id(state)],
        }
    }

    /// The deepest state that is an ancestor of both `s1` and `s2`, or
    /// `None` when they share nothing below the implicit root.
    ///
    /// The ancestor chain is scanned nearest-first, so the first shared name
    /// is necessarily the deepest one — the property that lets an engine
    /// bound a transition's exit/entry set.
    ///
    /// # Panics
    ///
    /// Panics if either name is not registered.
    pub fn least_common_ancestor(&self, s1: &str, s2: &str) -> Option<&str> {
        let shared = &self.ancestor_sets[self.id(s2)];
        self.ancestors[self.id(s1)]
            .iter()
            .find(|a| shared.contains(a))
            .map(|&a| self.states[a].name())
    }

    /// The subset of `states` with no descendant also in `states`, in input
    /// order.
    ///
    /// Reduces an active configuration to its minimal representative leaves;
    /// with orthogonal regions a configuration legitimately contains several
    /// simultaneously active descendants of one state.
    ///
    /// # Panics
    ///
    /// Panics if any name is not registered.
    pub fn leaf_for<'a>(&self, states: &[&'a str]) -> Vec<&'a str> {
        let members: HashSet<usize> = states.iter().map(|s| self.id(s)).collect();
        states
            .iter()
            .filter(|s| {
                self.descendants[self.id(s)]
                    .iter()
                    .all(|d| !members.contains(d))
            })
            .copied()
            .collect()
    }
}
