//! The history engine: reversible actions, turns and the turn navigator.
//!
//! Ownership is strictly hierarchical: a [`History`] owns its [`Turn`]s and a
//! turn owns its actions. Callers only hold [`ActionId`] handles, and every
//! mutation goes through the operations of `History` (or of a standalone
//! `Turn`). The engine is single-threaded and synchronous; a concurrent host
//! must serialize its calls.

pub mod action;
pub mod codec;
pub mod history;
pub mod turn;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{Action, ActionId};
pub use history::History;
pub use turn::{Turn, TurnEntry};
