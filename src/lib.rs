//! # turn-history
//!
//! A turn-structured command history engine for turn-based games.
//!
//! ## Design Principles
//!
//! 1. **Reversible actions**: Every change to the game is an [`Action`] with
//!    an exact inverse. The engine decides *when* actions run, never *what*
//!    they do.
//!
//! 2. **Turns with a resting point**: A turn stops right before the first
//!    action needing external (human) input, so navigation always lands where
//!    a decision is pending.
//!
//! 3. **Fail fast**: Every contract violation is a typed [`HistoryError`],
//!    detected before anything is mutated.
//!
//! ## Architecture
//!
//! - **History** owns its turns; **Turn** owns its actions. Callers hold
//!   [`ActionId`] handles only.
//!
//! - **Navigation** (`prev_turn`, `next_turn`, `first_turn`, `last_turn`)
//!   undoes and replays actions; **editing** (`insert_action`, `drop_action`,
//!   `drop_from`, `replace_action`) rewrites a turn around already applied
//!   actions; `clear_future` prunes what a new decision invalidates.
//!
//! - Single-threaded and synchronous: a concurrent host serializes calls.
//!
//! ## Modules
//!
//! - `core`: actions, turns, the history navigator and binary snapshots
//! - `error`: error types
//! - `games`: reference games driving the engine

pub mod core;
pub mod error;
pub mod games;

// Re-export commonly used types
pub use crate::core::{Action, ActionId, History, Turn, TurnEntry};
pub use crate::error::{ActionError, HistoryError, Result};
