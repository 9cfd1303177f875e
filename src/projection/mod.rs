//! Ordered JSON projection of a frozen chart.
//!
//! This is pure data shaping for a serializer collaborator: a nested,
//! string-keyed mirror of the tree with conditional optional fields and
//! sibling order preserved. The `preserve_order` feature of `serde_json`
//! keeps keys in insertion order, so the emitted structure is stable.

use crate::core::{State, StateKind, Transition};
use crate::machine::Statechart;
use serde_json::{json, Map, Value};

impl Statechart {
    /// Render the chart as an ordered, nested JSON structure.
    ///
    /// Shape: `{"statemachine": {name, initial, states, execute?}}`, where
    /// each state carries its kind marker (`initial` for compound,
    /// `orthogonal` for orthogonal, `type` for history/final), its actions
    /// and transitions when present, and its children expanded in place.
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
    /// let value = builder.freeze()?.to_json();
    ///
    /// assert_eq!(value["statemachine"]["name"], "m");
    /// assert_eq!(value["statemachine"]["states"][0]["initial"], "a1");
    /// # Ok::<(), statechart::builder::BuildError>(())
    /// ```
    pub fn to_json(&self) -> Value {
        let mut machine = Map::new();
        machine.insert("name".into(), json!(self.name()));
        machine.insert("initial".into(), json!(self.initial()));
        machine.insert(
            "states".into(),
            Value::Array(
                self.children()
                    .iter()
                    .map(|child| state_value(self, child))
                    .collect(),
            ),
        );
        if let Some(execute) = self.execute() {
            machine.insert("execute".into(), json!(execute));
        }

        let mut root = Map::new();
        root.insert("statemachine".into(), Value::Object(machine));
        Value::Object(root)
    }
}

fn state_value(chart: &Statechart, name: &str) -> Value {
    let state = chart.state_at(chart.id(name));
    let mut value = Map::new();
    value.insert("name".into(), json!(state.name()));

    match state.kind() {
        StateKind::Simple => {}
        StateKind::Compound => {
            value.insert("initial".into(), json!(state.initial()));
        }
        StateKind::Orthogonal => {
            value.insert("orthogonal".into(), json!(true));
        }
        StateKind::History => {
            value.insert("type".into(), json!("history"));
            if let Some(initial) = state.initial() {
                value.insert("initial".into(), json!(initial));
            }
            if matches!(state, State::History(h) if h.is_deep()) {
                value.insert("deep".into(), json!(true));
            }
        }
        StateKind::Final => {
            value.insert("type".into(), json!("final"));
        }
    }

    if let Some(actions) = state.actions() {
        if let Some(on_entry) = &actions.on_entry {
            value.insert("on_entry".into(), json!(on_entry));
        }
        if let Some(on_exit) = &actions.on_exit {
            value.insert("on_exit".into(), json!(on_exit));
        }
    }

    let transitions = chart.transitions_from(state.name());
    if !transitions.is_empty() {
        value.insert(
            "transitions".into(),
            Value::Array(transitions.iter().map(|t| transition_value(t)).collect()),
        );
    }

    if state.is_composite() {
        value.insert(
            "states".into(),
            Value::Array(
                state
                    .children()
                    .iter()
                    .map(|child| state_value(chart, child))
                    .collect(),
            ),
        );
    }

    Value::Object(value)
}

fn transition_value(transition: &Transition) -> Value {
    let mut value = Map::new();
    if let Some(target) = transition.to_state() {
        value.insert("target".into(), json!(target));
    }
    if let Some(event) = transition.event() {
        // Payload is not part of an event's identity and is not projected.
        value.insert("event".into(), json!({ "name": event.name() }));
    }
    if let Some(condition) = transition.condition() {
        value.insert("condition".into(), json!(condition));
    }
    if let Some(action) = transition.action() {
        value.insert("action".into(), json!(action));
    }
    Value::Object(value)
}
