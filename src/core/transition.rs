//! Transitions between states.
//!
//! A transition is an edge from a source state to an optional target,
//! optionally triggered by an event and guarded by a condition. Guard and
//! action fragments are opaque strings forwarded verbatim to the execution
//! engine; no syntax validation happens here.

use super::event::Event;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected transition: neither a target state nor a trigger event.
///
/// Such an edge would be unobservable (no state change) and untriggerable
/// (no event), so construction refuses it outright.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("a transition must specify a target state or a trigger event")]
pub struct InvalidTransition;

/// An edge from one state to an optional target state.
///
/// Absent `to_state` means *internal*: a self-transition that fires without
/// leaving the source state. Absent `event` means *eventless*: the
/// transition is evaluated opportunistically rather than in response to an
/// external signal. At least one of the two must be present.
///
/// # Example
///
/// ```rust
/// use statechart::core::{Event, Transition};
///
/// let transition = Transition::new("idle", Some("busy".into()), Some(Event::new("start")))
///     .unwrap()
///     .with_condition("queue.len() > 0")
///     .with_action("start_worker()");
///
/// assert!(!transition.is_internal());
/// assert!(!transition.is_eventless());
///
/// // Internal, guarded self-transition:
/// let internal = Transition::new("busy", None, Some(Event::new("tick"))).unwrap();
/// assert!(internal.is_internal());
///
/// // Neither target nor event is refused:
/// assert!(Transition::new("busy", None, None).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    from_state: String,
    to_state: Option<String>,
    event: Option<Event>,
    condition: Option<String>,
    action: Option<String>,
}

impl Transition {
    /// Create a transition, failing if both target and event are absent.
    pub fn new(
        from_state: impl Into<String>,
        to_state: Option<String>,
        event: Option<Event>,
    ) -> Result<Self, InvalidTransition> {
        if to_state.is_none() && event.is_none() {
            return Err(InvalidTransition);
        }
        Ok(Self {
            from_state: from_state.into(),
            to_state,
            event,
            condition: None,
            action: None,
        })
    }

    /// Attach an opaque guard fragment.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Attach an opaque action fragment.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn from_state(&self) -> &str {
        &self.from_state
    }

    pub fn to_state(&self) -> Option<&str> {
        self.to_state.as_deref()
    }

    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// A transition without a target stays inside its source state.
    pub fn is_internal(&self) -> bool {
        self.to_state.is_none()
    }

    /// A transition without an event fires opportunistically.
    pub fn is_eventless(&self) -> bool {
        self.event.is_none()
    }
}
