//! Builder for constructing statecharts.
//!
//! Construction is a distinct phase from querying: a
//! [`StatechartBuilder`] accumulates states and transitions, and
//! [`freeze`](StatechartBuilder::freeze) validates the whole tree in one
//! pass before handing out an immutable [`Statechart`]. Because no query is
//! possible before the freeze and no registration is possible after it, the
//! chart's precomputed hierarchy tables can never go stale.
//!
//! Parent/child linking is deferred to the freeze, so registration order
//! between a parent and its children does not matter. A parent name that is
//! never registered at all fails the freeze with
//! [`BuildError::DanglingParent`] instead of silently demoting the child to
//! top level.

mod error;

pub use error::BuildError;

use crate::core::{State, StateKind, Transition};
use crate::machine::Statechart;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// Accumulates states and transitions for a named statechart.
///
/// # Example
///
/// ```rust
/// use statechart::builder::StatechartBuilder;
/// use statechart::core::{CompoundState, Event, SimpleState, Transition};
///
/// let mut builder = StatechartBuilder::new("doorbell", "door");
/// builder.register_state(CompoundState::new("door", "closed"), None)?;
/// builder.register_state(SimpleState::new("closed"), Some("door"))?;
/// builder.register_state(SimpleState::new("open"), Some("door"))?;
/// builder.register_transition(Transition::new(
///     "closed",
///     Some("open".into()),
///     Some(Event::new("ring")),
/// )?)?;
///
/// let chart = builder.freeze()?;
/// assert_eq!(chart.ancestors_for("closed"), vec!["door"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StatechartBuilder {
    name: String,
    initial: String,
    execute: Option<String>,
    states: Vec<State>,
    index: HashMap<String, usize>,
    parents: Vec<Option<String>>,
    transitions: Vec<Transition>,
    outgoing: Vec<Vec<usize>>,
}

impl StatechartBuilder {
    /// Create a builder for a chart with the given name and initial
    /// top-level state. The initial state is validated at freeze time.
    pub fn new(name: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: initial.into(),
            execute: None,
            states: Vec::new(),
            index: HashMap::new(),
            parents: Vec::new(),
            transitions: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// Attach an opaque startup fragment, run by the execution engine when
    /// the machine starts.
    pub fn execute(mut self, fragment: impl Into<String>) -> Self {
        self.execute = Some(fragment.into());
        self
    }

    /// Register a state, optionally under a parent.
    ///
    /// Fails immediately on a duplicate name. The parent does not need to be
    /// registered yet; the link is resolved at freeze time, and children end
    /// up ordered by registration order. `None` and an empty name both mean
    /// top-level.
    pub fn register_state(
        &mut self,
        state: impl Into<State>,
        parent: Option<&str>,
    ) -> Result<(), BuildError> {
        let parent = parent.filter(|p| !p.is_empty());
        let state = state.into();
        let name = state.name().to_string();
        if self.index.contains_key(&name) {
            return Err(BuildError::DuplicateState(name));
        }
        trace!(state = %name, parent = ?parent, kind = ?state.kind(), "registering state");
        self.index.insert(name, self.states.len());
        self.states.push(state);
        self.parents.push(parent.map(str::to_owned));
        self.outgoing.push(Vec::new());
        Ok(())
    }

    /// Register a transition on its source state.
    ///
    /// The source must already be registered, and must be a kind that can
    /// own transitions: final states signal completion and history states
    /// are resumption markers, so neither may source an edge.
    pub fn register_transition(&mut self, transition: Transition) -> Result<(), BuildError> {
        let source = transition.from_state();
        let id = *self
            .index
            .get(source)
            .ok_or_else(|| BuildError::StateNotFound(source.to_string()))?;
        match self.states[id].kind() {
            StateKind::Final => return Err(BuildError::TransitionFromFinal(source.to_string())),
            StateKind::History => {
                return Err(BuildError::TransitionFromHistory(source.to_string()))
            }
            _ => {}
        }
        trace!(
            from = %source,
            to = ?transition.to_state(),
            event = ?transition.event().map(|e| e.name()),
            "registering transition"
        );
        self.outgoing[id].push(self.transitions.len());
        self.transitions.push(transition);
        Ok(())
    }

    /// Validate the whole tree and produce an immutable [`Statechart`].
    ///
    /// This is the single linking/validation pass: parents are resolved,
    /// children lists filled in registration order, the forest checked for
    /// cycles, initial states checked against their scope, transition and
    /// history resumption targets resolved, and the hierarchy
    /// tables (ancestor chains, descendant lists, depths) precomputed so
    /// every later query is a lookup.
    pub fn freeze(mut self) -> Result<Statechart, BuildError> {
        let count = self.states.len();

        // Link every declared parent, in registration order.
        let mut parent_ids: Vec<Option<usize>> = vec![None; count];
        for child in 0..count {
            let Some(parent_name) = self.parents[child].clone() else {
                continue;
            };
            let child_name = self.states[child].name().to_string();
            let parent = *self.index.get(&parent_name).ok_or_else(|| {
                BuildError::DanglingParent {
                    state: child_name.clone(),
                    parent: parent_name.clone(),
                }
            })?;
            if !self.states[parent].is_composite() {
                return Err(BuildError::InvalidParent {
                    state: child_name,
                    parent: parent_name,
                });
            }
            parent_ids[child] = Some(parent);
            self.states[parent].add_child(child_name);
        }

        let roots: Vec<usize> = (0..count).filter(|&i| parent_ids[i].is_none()).collect();

        // Walk every parent chain: builds the nearest-first ancestor tables
        // and rejects any cycle, which would make the relation not a forest.
        let mut ancestors: Vec<Vec<usize>> = Vec::with_capacity(count);
        for state in 0..count {
            let mut chain = Vec::new();
            let mut cursor = parent_ids[state];
            while let Some(parent) = cursor {
                if chain.len() >= count {
                    return Err(BuildError::HierarchyCycle(
                        self.states[state].name().to_string(),
                    ));
                }
                chain.push(parent);
                cursor = parent_ids[parent];
            }
            ancestors.push(chain);
        }

        // The machine's own initial must be a top-level child.
        if !roots.iter().any(|&r| self.states[r].name() == self.initial) {
            return Err(BuildError::InvalidInitial {
                scope: self.name,
                initial: self.initial,
            });
        }

        // Every compound's initial must be one of its direct children.
        for state in &self.states {
            if state.kind() != StateKind::Compound {
                continue;
            }
            if let Some(initial) = state.initial() {
                if !state.children().iter().any(|c| c == initial) {
                    return Err(BuildError::InvalidInitial {
                        scope: state.name().to_string(),
                        initial: initial.to_string(),
                    });
                }
            }
        }

        // Every transition target must name a registered state; a dangling
        // target would otherwise surface as a panic during the query phase.
        for transition in &self.transitions {
            if let Some(target) = transition.to_state() {
                if !self.index.contains_key(target) {
                    return Err(BuildError::StateNotFound(target.to_string()));
                }
            }
        }

        // Same for a history state's default resumption target.
        for state in &self.states {
            if state.kind() != StateKind::History {
                continue;
            }
            if let Some(initial) = state.initial() {
                if !self.index.contains_key(initial) {
                    return Err(BuildError::StateNotFound(initial.to_string()));
                }
            }
        }

        let child_ids: Vec<Vec<usize>> = self
            .states
            .iter()
            .map(|s| s.children().iter().map(|c| self.index[c]).collect())
            .collect();

        // Breadth-first descendant lists, ordered by increasing depth.
        let mut descendants: Vec<Vec<usize>> = Vec::with_capacity(count);
        for state in 0..count {
            let mut found = Vec::new();
            let mut queue: VecDeque<usize> = child_ids[state].iter().copied().collect();
            while let Some(next) = queue.pop_front() {
                found.push(next);
                queue.extend(child_ids[next].iter().copied());
            }
            descendants.push(found);
        }

        let depths: Vec<usize> = ancestors.iter().map(|chain| chain.len() + 1).collect();
        let ancestor_sets: Vec<HashSet<usize>> = ancestors
            .iter()
            .map(|chain| chain.iter().copied().collect())
            .collect();

        debug!(
            machine = %self.name,
            states = count,
            transitions = self.transitions.len(),
            "froze statechart"
        );

        Ok(Statechart {
            name: self.name,
            initial: self.initial,
            execute: self.execute,
            states: self.states,
            index: self.index,
            roots,
            transitions: self.transitions,
            outgoing: self.outgoing,
            parent_ids,
            ancestors,
            ancestor_sets,
            descendants,
            depths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        CompoundState, Event, FinalState, HistoryState, OrthogonalState, SimpleState,
    };

    fn transition_to(from: &str, to: &str) -> Transition {
        Transition::new(from, Some(to.to_string()), None).unwrap()
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        let result = builder.register_state(SimpleState::new("a"), None);
        assert!(matches!(result, Err(BuildError::DuplicateState(name)) if name == "a"));
    }

    #[test]
    fn transition_from_unregistered_state_is_rejected() {
        let mut builder = StatechartBuilder::new("m", "a");
        let result = builder.register_transition(transition_to("ghost", "a"));
        assert!(matches!(result, Err(BuildError::StateNotFound(name)) if name == "ghost"));
    }

    #[test]
    fn final_state_cannot_source_a_transition() {
        let mut builder = StatechartBuilder::new("m", "done");
        builder.register_state(FinalState::new("done"), None).unwrap();
        let result = builder.register_transition(transition_to("done", "done"));
        assert!(matches!(result, Err(BuildError::TransitionFromFinal(_))));
    }

    #[test]
    fn history_state_cannot_source_a_transition() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        builder.register_state(HistoryState::new("h"), None).unwrap();
        let result = builder.register_transition(transition_to("h", "a"));
        assert!(matches!(result, Err(BuildError::TransitionFromHistory(_))));
    }

    #[test]
    fn child_may_be_registered_before_its_parent() {
        let mut builder = StatechartBuilder::new("m", "p");
        builder.register_state(SimpleState::new("c"), Some("p")).unwrap();
        builder
            .register_state(CompoundState::new("p", "c"), None)
            .unwrap();

        let chart = builder.freeze().unwrap();
        assert_eq!(chart.ancestors_for("c"), vec!["p"]);
        assert_eq!(chart.children(), vec!["p"]);
    }

    #[test]
    fn dangling_parent_fails_the_freeze() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        builder
            .register_state(SimpleState::new("b"), Some("missing"))
            .unwrap();

        let result = builder.freeze();
        assert!(matches!(
            result,
            Err(BuildError::DanglingParent { state, parent })
                if state == "b" && parent == "missing"
        ));
    }

    #[test]
    fn non_composite_parent_fails_the_freeze() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        builder.register_state(SimpleState::new("b"), Some("a")).unwrap();

        let result = builder.freeze();
        assert!(matches!(result, Err(BuildError::InvalidParent { .. })));
    }

    #[test]
    fn machine_initial_must_be_top_level() {
        let mut builder = StatechartBuilder::new("m", "inner");
        builder
            .register_state(CompoundState::new("outer", "inner"), None)
            .unwrap();
        builder
            .register_state(SimpleState::new("inner"), Some("outer"))
            .unwrap();

        let result = builder.freeze();
        assert!(matches!(
            result,
            Err(BuildError::InvalidInitial { scope, initial })
                if scope == "m" && initial == "inner"
        ));
    }

    #[test]
    fn compound_initial_must_be_a_direct_child() {
        let mut builder = StatechartBuilder::new("m", "p");
        builder
            .register_state(CompoundState::new("p", "nope"), None)
            .unwrap();
        builder.register_state(SimpleState::new("c"), Some("p")).unwrap();

        let result = builder.freeze();
        assert!(matches!(
            result,
            Err(BuildError::InvalidInitial { scope, initial })
                if scope == "p" && initial == "nope"
        ));
    }

    #[test]
    fn parent_cycle_fails_the_freeze() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        builder
            .register_state(CompoundState::new("x", "y"), Some("y"))
            .unwrap();
        builder
            .register_state(CompoundState::new("y", "x"), Some("x"))
            .unwrap();

        let result = builder.freeze();
        assert!(matches!(result, Err(BuildError::HierarchyCycle(_))));
    }

    #[test]
    fn dangling_transition_target_fails_the_freeze() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        builder.register_transition(transition_to("a", "ghost")).unwrap();

        let result = builder.freeze();
        assert!(matches!(result, Err(BuildError::StateNotFound(name)) if name == "ghost"));
    }

    #[test]
    fn internal_transition_needs_no_target() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        builder
            .register_transition(
                Transition::new("a", None, Some(Event::new("tick"))).unwrap(),
            )
            .unwrap();

        let chart = builder.freeze().unwrap();
        assert!(chart.transitions()[0].is_internal());
    }

    #[test]
    fn dangling_history_initial_fails_the_freeze() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        builder
            .register_state(HistoryState::new("h").with_initial("ghost"), None)
            .unwrap();

        let result = builder.freeze();
        assert!(matches!(result, Err(BuildError::StateNotFound(name)) if name == "ghost"));
    }

    #[test]
    fn empty_parent_name_means_top_level() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), Some("")).unwrap();

        let chart = builder.freeze().unwrap();
        assert_eq!(chart.children(), vec!["a"]);
        assert_eq!(chart.parent_of("a"), None);
    }

    #[test]
    fn orthogonal_state_may_own_children() {
        let mut builder = StatechartBuilder::new("m", "o");
        builder.register_state(OrthogonalState::new("o"), None).unwrap();
        builder.register_state(SimpleState::new("r1"), Some("o")).unwrap();
        builder.register_state(SimpleState::new("r2"), Some("o")).unwrap();

        let chart = builder.freeze().unwrap();
        let state = chart.state("o").unwrap();
        assert_eq!(state.children(), ["r1".to_string(), "r2".to_string()]);
    }

    #[test]
    fn children_keep_registration_order() {
        let mut builder = StatechartBuilder::new("m", "p");
        builder
            .register_state(CompoundState::new("p", "b"), None)
            .unwrap();
        builder.register_state(SimpleState::new("b"), Some("p")).unwrap();
        builder.register_state(SimpleState::new("a"), Some("p")).unwrap();
        builder.register_state(SimpleState::new("c"), Some("p")).unwrap();

        let chart = builder.freeze().unwrap();
        assert_eq!(chart.descendants_for("p"), vec!["b", "a", "c"]);
    }

    #[test]
    fn transitions_keep_registration_order() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        builder.register_state(SimpleState::new("b"), None).unwrap();
        builder.register_transition(transition_to("b", "a")).unwrap();
        builder.register_transition(transition_to("a", "b")).unwrap();
        builder.register_transition(transition_to("a", "a")).unwrap();

        let chart = builder.freeze().unwrap();
        let order: Vec<(&str, Option<&str>)> = chart
            .transitions()
            .iter()
            .map(|t| (t.from_state(), t.to_state()))
            .collect();
        assert_eq!(
            order,
            vec![("b", Some("a")), ("a", Some("b")), ("a", Some("a"))]
        );

        let from_a: Vec<Option<&str>> = chart
            .transitions_from("a")
            .iter()
            .map(|t| t.to_state())
            .collect();
        assert_eq!(from_a, vec![Some("b"), Some("a")]);
    }

    #[test]
    fn execute_fragment_is_carried() {
        let mut builder = StatechartBuilder::new("m", "a").execute("boot()");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        let chart = builder.freeze().unwrap();
        assert_eq!(chart.execute(), Some("boot()"));
    }

    #[test]
    fn event_triggered_transition_is_stored_on_its_source() {
        let mut builder = StatechartBuilder::new("m", "a");
        builder.register_state(SimpleState::new("a"), None).unwrap();
        builder.register_state(SimpleState::new("b"), None).unwrap();
        builder
            .register_transition(
                Transition::new("a", Some("b".into()), Some(Event::new("go"))).unwrap(),
            )
            .unwrap();

        let chart = builder.freeze().unwrap();
        let outgoing = chart.transitions_from("a");
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].event().unwrap().name(), "go");
        assert!(chart.transitions_from("b").is_empty());
    }
}
