//! State variants of the statechart tree.
//!
//! States form a closed set of five kinds: simple, compound, orthogonal,
//! history, and final. Each variant struct carries only the fields its
//! semantics require; shared capabilities (entry/exit actions) live in the
//! small `Actions` struct rather than in a base type, so the full set stays
//! exhaustively matchable.
//!
//! Entry/exit action fragments are opaque strings: the model stores and
//! projects them verbatim, and only the external execution engine ever
//! interprets them.

use serde::{Deserialize, Serialize};

/// Tag identifying a state's kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Simple,
    Compound,
    Orthogonal,
    History,
    Final,
}

/// Entry/exit action capability shared by the kinds that execute actions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actions {
    pub on_entry: Option<String>,
    pub on_exit: Option<String>,
}

/// A state with no children: hosts transitions and entry/exit actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleState {
    name: String,
    actions: Actions,
}

impl SimpleState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Actions::default(),
        }
    }

    pub fn with_entry(mut self, fragment: impl Into<String>) -> Self {
        self.actions.on_entry = Some(fragment.into());
        self
    }

    pub fn with_exit(mut self, fragment: impl Into<String>) -> Self {
        self.actions.on_exit = Some(fragment.into());
        self
    }
}

/// A state with exactly one active child at a time, designated by `initial`.
///
/// Children are not passed at construction: they accumulate from
/// `register_state` calls naming this state as their parent, and the
/// requirement that `initial` names one of them is checked at freeze time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundState {
    name: String,
    initial: String,
    actions: Actions,
    children: Vec<String>,
}

impl CompoundState {
    pub fn new(name: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: initial.into(),
            actions: Actions::default(),
            children: Vec::new(),
        }
    }

    pub fn with_entry(mut self, fragment: impl Into<String>) -> Self {
        self.actions.on_entry = Some(fragment.into());
        self
    }

    pub fn with_exit(mut self, fragment: impl Into<String>) -> Self {
        self.actions.on_exit = Some(fragment.into());
        self
    }
}

/// A state whose children are all simultaneously active while it is active.
///
/// There is no `initial`: every child region enters when the orthogonal
/// state enters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrthogonalState {
    name: String,
    actions: Actions,
    children: Vec<String>,
}

impl OrthogonalState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Actions::default(),
            children: Vec::new(),
        }
    }

    pub fn with_entry(mut self, fragment: impl Into<String>) -> Self {
        self.actions.on_entry = Some(fragment.into());
        self
    }

    pub fn with_exit(mut self, fragment: impl Into<String>) -> Self {
        self.actions.on_exit = Some(fragment.into());
        self
    }
}

/// A resumption marker, not an execution locus.
///
/// A shallow history state resumes its parent's last active child; a deep
/// one resumes recursively into nested regions. `memory` holds the last
/// recorded resumption target. It starts at `initial` and is updated by the
/// execution engine (via [`Statechart::set_history_memory`]) whenever the
/// surrounding region is exited — never by the model itself.
///
/// [`Statechart::set_history_memory`]: crate::machine::Statechart::set_history_memory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    name: String,
    initial: Option<String>,
    deep: bool,
    memory: Option<String>,
}

impl HistoryState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: None,
            deep: false,
            memory: None,
        }
    }

    /// Set the default resumption target. Also seeds `memory`.
    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        let initial = initial.into();
        self.memory = Some(initial.clone());
        self.initial = Some(initial);
        self
    }

    /// Mark this history state as deep.
    pub fn deep(mut self) -> Self {
        self.deep = true;
        self
    }

    pub fn is_deep(&self) -> bool {
        self.deep
    }

    /// The last recorded resumption target.
    pub fn memory(&self) -> Option<&str> {
        self.memory.as_deref()
    }

    /// Record a new resumption target.
    pub fn set_memory(&mut self, target: Option<String>) {
        self.memory = target;
    }
}

/// A completion marker: owns entry/exit actions but never sources a
/// transition. Reaching it signals region or machine completion to the
/// execution engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalState {
    name: String,
    actions: Actions,
}

impl FinalState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Actions::default(),
        }
    }

    pub fn with_entry(mut self, fragment: impl Into<String>) -> Self {
        self.actions.on_entry = Some(fragment.into());
        self
    }

    pub fn with_exit(mut self, fragment: impl Into<String>) -> Self {
        self.actions.on_exit = Some(fragment.into());
        self
    }
}

/// The closed set of state kinds, identified by a name unique within one
/// statechart.
///
/// # Example
///
/// ```rust
/// use statechart::core::{CompoundState, SimpleState, State, StateKind};
///
/// let state: State = CompoundState::new("door", "closed").into();
///
/// assert_eq!(state.name(), "door");
/// assert_eq!(state.kind(), StateKind::Compound);
/// assert_eq!(state.initial(), Some("closed"));
///
/// let leaf: State = SimpleState::new("closed").with_entry("lock()").into();
/// assert_eq!(leaf.on_entry(), Some("lock()"));
/// assert!(leaf.children().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Simple(SimpleState),
    Compound(CompoundState),
    Orthogonal(OrthogonalState),
    History(HistoryState),
    Final(FinalState),
}

impl State {
    /// The state's unique name.
    pub fn name(&self) -> &str {
        match self {
            Self::Simple(s) => &s.name,
            Self::Compound(s) => &s.name,
            Self::Orthogonal(s) => &s.name,
            Self::History(s) => &s.name,
            Self::Final(s) => &s.name,
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            Self::Simple(_) => StateKind::Simple,
            Self::Compound(_) => StateKind::Compound,
            Self::Orthogonal(_) => StateKind::Orthogonal,
            Self::History(_) => StateKind::History,
            Self::Final(_) => StateKind::Final,
        }
    }

    /// Entry/exit actions, for the kinds that carry them.
    pub fn actions(&self) -> Option<&Actions> {
        match self {
            Self::Simple(s) => Some(&s.actions),
            Self::Compound(s) => Some(&s.actions),
            Self::Orthogonal(s) => Some(&s.actions),
            Self::History(_) => None,
            Self::Final(s) => Some(&s.actions),
        }
    }

    pub fn on_entry(&self) -> Option<&str> {
        self.actions().and_then(|a| a.on_entry.as_deref())
    }

    pub fn on_exit(&self) -> Option<&str> {
        self.actions().and_then(|a| a.on_exit.as_deref())
    }

    /// Ordered child names. Empty for non-composite kinds.
    pub fn children(&self) -> &[String] {
        match self {
            Self::Compound(s) => &s.children,
            Self::Orthogonal(s) => &s.children,
            _ => &[],
        }
    }

    /// The default child: a compound's mandatory initial, or a history
    /// state's optional default resumption target.
    pub fn initial(&self) -> Option<&str> {
        match self {
            Self::Compound(s) => Some(&s.initial),
            Self::History(s) => s.initial.as_deref(),
            _ => None,
        }
    }

    /// Whether this kind may own children.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Compound(_) | Self::Orthogonal(_))
    }

    pub fn as_history(&self) -> Option<&HistoryState> {
        match self {
            Self::History(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn as_history_mut(&mut self) -> Option<&mut HistoryState> {
        match self {
            Self::History(s) => Some(s),
            _ => None,
        }
    }

    /// Append a child name. Caller must have checked `is_composite`.
    pub(crate) fn add_child(&mut self, child: String) {
        match self {
            Self::Compound(s) => s.children.push(child),
            Self::Orthogonal(s) => s.children.push(child),
            _ => unreachable!("add_child on a non-composite state"),
        }
    }
}

impl From<SimpleState> for State {
    fn from(s: SimpleState) -> Self {
        Self::Simple(s)
    }
}

impl From<CompoundState> for State {
    fn from(s: CompoundState) -> Self {
        Self::Compound(s)
    }
}

impl From<OrthogonalState> for State {
    fn from(s: OrthogonalState) -> Self {
        Self::Orthogonal(s)
    }
}

impl From<HistoryState> for State {
    fn from(s: HistoryState) -> Self {
        Self::History(s)
    }
}

impl From<FinalState> for State {
    fn from(s: FinalState) -> Self {
        Self::Final(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_reported() {
        let states: Vec<State> = vec![
            SimpleState::new("a").into(),
            CompoundState::new("b", "a").into(),
            OrthogonalState::new("c").into(),
            HistoryState::new("d").into(),
            FinalState::new("e").into(),
        ];

        let kinds: Vec<StateKind> = states.iter().map(State::kind).collect();
        assert_eq!(
            kinds,
            vec![
                StateKind::Simple,
                StateKind::Compound,
                StateKind::Orthogonal,
                StateKind::History,
                StateKind::Final,
            ]
        );
    }

    #[test]
    fn actions_are_carried_where_applicable() {
        let simple: State = SimpleState::new("s").with_entry("e()").with_exit("x()").into();
        assert_eq!(simple.on_entry(), Some("e()"));
        assert_eq!(simple.on_exit(), Some("x()"));

        let history: State = HistoryState::new("h").into();
        assert!(history.actions().is_none());
        assert!(history.on_entry().is_none());
    }

    #[test]
    fn non_composite_states_have_no_children() {
        let simple: State = SimpleState::new("s").into();
        let final_state: State = FinalState::new("f").into();
        let history: State = HistoryState::new("h").into();

        assert!(simple.children().is_empty());
        assert!(final_state.children().is_empty());
        assert!(history.children().is_empty());
        assert!(!simple.is_composite());
    }

    #[test]
    fn compound_initial_is_exposed() {
        let compound: State = CompoundState::new("door", "closed").into();
        assert_eq!(compound.initial(), Some("closed"));
        assert!(compound.is_composite());
    }

    #[test]
    fn history_memory_defaults_to_initial() {
        let history = HistoryState::new("h").with_initial("resume_here");
        assert_eq!(history.memory(), Some("resume_here"));
        assert_eq!(State::from(history).initial(), Some("resume_here"));

        let blank = HistoryState::new("h");
        assert!(blank.memory().is_none());
    }

    #[test]
    fn history_memory_is_settable() {
        let mut history = HistoryState::new("h").with_initial("a");
        history.set_memory(Some("b".to_string()));
        assert_eq!(history.memory(), Some("b"));
        history.set_memory(None);
        assert!(history.memory().is_none());
    }

    #[test]
    fn deep_flag_is_tracked() {
        assert!(HistoryState::new("h").deep().is_deep());
        assert!(!HistoryState::new("h").is_deep());
    }

    #[test]
    fn state_serializes_correctly() {
        let state: State = CompoundState::new("door", "closed").with_entry("log()").into();
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: State = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
