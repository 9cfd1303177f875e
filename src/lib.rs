//! Statechart: a structural model of hierarchical state machines.
//!
//! This crate models the *shape* of a statechart — the registry of states
//! and transitions plus the hierarchy-aware queries (ancestor chains,
//! descendant enumeration, least common ancestor, depth, leaf filtering)
//! that an execution engine composes to compute entry/exit sets, transition
//! scope, and active-configuration validity.
//!
//! It deliberately does *not* run anything: guard conditions, entry/exit
//! actions, and startup code are carried as opaque strings for an external
//! execution engine, and no parser or serializer lives here (though a frozen
//! chart can project itself into an ordered JSON structure for one).
//!
//! # Core Concepts
//!
//! - **States**: a closed set of five kinds via [`core::State`] — simple,
//!   compound (one active child), orthogonal (all children active), history
//!   (resumption marker), and final (completion marker)
//! - **Build then freeze**: [`builder::StatechartBuilder`] accumulates
//!   registrations, and `freeze()` validates the whole tree once, producing
//!   an immutable [`machine::Statechart`]
//! - **Memoized queries**: the freeze precomputes ancestor chains,
//!   descendant lists, and depths into id-indexed tables, so every
//!   structural query is a plain lookup that can never go stale
//!
//! # Example
//!
//! ```rust
//! use statechart::builder::StatechartBuilder;
//! use statechart::core::{CompoundState, Event, SimpleState, Transition};
//!
//! let mut builder = StatechartBuilder::new("M", "A");
//! builder.register_state(CompoundState::new("A", "A1"), None)?;
//! builder.register_state(SimpleState::new("A1"), Some("A"))?;
//! builder.register_state(SimpleState::new("A2"), Some("A"))?;
//! builder.register_transition(Transition::new(
//!     "A1",
//!     Some("A2".into()),
//!     Some(Event::new("go")),
//! )?)?;
//!
//! let chart = builder.freeze()?;
//!
//! assert_eq!(chart.ancestors_for("A1"), vec!["A"]);
//! assert_eq!(chart.descendants_for("A"), vec!["A1", "A2"]);
//! assert_eq!(chart.least_common_ancestor("A1", "A2"), Some("A"));
//! assert_eq!(chart.depth_of(Some("A1")), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod core;
pub mod machine;

mod projection;

// Re-export commonly used types
pub use builder::{BuildError, StatechartBuilder};
pub use core::{Event, InvalidTransition, State, StateKind, Transition};
pub use machine::Statechart;
