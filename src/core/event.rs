//! Named event signals.
//!
//! Events trigger transitions. An event's identity is its name alone;
//! the optional payload is opaque data carried along for the execution
//! engine and never inspected here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// An immutable named signal, optionally carrying a payload.
///
/// Two events are equal iff their names match. The payload takes no part
/// in equality or hashing, so `Event::new("go")` and
/// `Event::new("go").with_data(...)` compare equal and can be used
/// interchangeably as map keys.
///
/// # Example
///
/// ```rust
/// use statechart::core::Event;
/// use serde_json::json;
///
/// let plain = Event::new("submit");
/// let loaded = Event::new("submit").with_data(json!({"retries": 3}));
///
/// assert_eq!(plain, loaded);
/// assert!(loaded.data().is_some());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    name: String,
    data: Option<Value>,
}

impl Event {
    /// Create an event with the given name and no payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
        }
    }

    /// Attach an opaque payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The event's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The opaque payload, if any.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
