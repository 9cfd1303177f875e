//! Core statechart model types.
//!
//! This module contains the pure data model of a statechart:
//! - Events via [`Event`]
//! - The closed set of state kinds via [`State`] and its variant structs
//! - Edges via [`Transition`]
//!
//! Everything here is an immutable value; the hierarchy itself lives in
//! [`crate::machine::Statechart`], built through
//! [`crate::builder::StatechartBuilder`].

mod event;
mod state;
mod transition;

pub use event::Event;
pub use state::{
    Actions, CompoundState, FinalState, HistoryState, OrthogonalState, SimpleState, State,
    StateKind,
};
pub use transition::{InvalidTransition, Transition};
