//! Turn sequence navigator.
//!
//! `History` owns every turn of a game and a cursor on the current one. It is
//! the only entry point callers use: new actions are appended to the tail
//! turn, navigation rewinds or replays whole turns, and `clear_future` prunes
//! what lies after the current point when a new decision invalidates it.
//!
//! ## Invariants
//!
//! - There is always at least one turn.
//! - Turns before the current one are fully executed, turns after it are not
//!   executed at all.
//! - Turns are only appended at the tail, and new actions only go to the tail
//!   turn once it is fully executed.
//!
//! ## Example
//!
//! ```
//! # use std::fmt;
//! # use turn_history::{Action, ActionError, History};
//! # #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! # struct Step;
//! # struct Counter { human: bool, executed: bool }
//! # impl fmt::Display for Counter {
//! #     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("counter") }
//! # }
//! # impl Action for Counter {
//! #     type Kind = Step;
//! #     fn execute(&mut self) -> Result<(), ActionError> { self.executed = true; Ok(()) }
//! #     fn undo(&mut self) -> Result<(), ActionError> { self.executed = false; Ok(()) }
//! #     fn is_executed(&self) -> bool { self.executed }
//! #     fn is_auto_executable(&self) -> bool { !self.human }
//! #     fn is_human_independent(&self) -> bool { !self.human }
//! #     fn kind(&self) -> Step { Step }
//! # }
//! let mut history = History::new();
//! history.add_and_execute(Counter { human: false, executed: false })?;
//! history.new_turn()?;
//! history.add_and_execute(Counter { human: false, executed: false })?;
//! history.add_and_execute(Counter { human: true, executed: false })?;
//!
//! // Rewind to right before the decision of the last turn
//! history.prev_turn()?;
//! assert_eq!(history.current_turn_index(), 1);
//! assert_eq!(history.current_turn().cursor(), 1);
//!
//! history.last_turn()?;
//! assert!(history.is_last_turn());
//! # Ok::<(), turn_history::HistoryError>(())
//! ```

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::action::{Action, ActionId};
use super::turn::Turn;
use crate::error::{HistoryError, Result};

/// An ordered, owned sequence of turns with a current-turn cursor.
///
/// A clone is an independent copy that keeps the same [`ActionId`]s, so a
/// handle taken from one of them resolves in both.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    try_from = "HistoryRepr<A>",
    bound(serialize = "A: Serialize", deserialize = "A: Action + Deserialize<'de>")
)]
pub struct History<A> {
    turns: Vec<Turn<A>>,
    current: usize,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "A: Action + Deserialize<'de>"))]
struct HistoryRepr<A> {
    turns: Vec<Turn<A>>,
    current: usize,
}

impl<A: Action> TryFrom<HistoryRepr<A>> for History<A> {
    type Error = HistoryError;

    fn try_from(repr: HistoryRepr<A>) -> Result<Self> {
        if repr.current >= repr.turns.len() {
            return Err(HistoryError::invalid_state(format!(
                "current turn {} is out of the {} stored turns",
                repr.current,
                repr.turns.len()
            )));
        }

        let mut seen = FxHashSet::default();
        for (index, turn) in repr.turns.iter().enumerate() {
            if index < repr.current && !turn.is_fully_executed() {
                return Err(HistoryError::invalid_state(format!(
                    "turn {} precedes the current turn but is not fully executed",
                    index
                )));
            }
            if index > repr.current && !turn.is_not_at_all_executed() {
                return Err(HistoryError::invalid_state(format!(
                    "turn {} follows the current turn but is executed",
                    index
                )));
            }
            for (id, _) in turn.iter() {
                if !seen.insert(id) {
                    return Err(HistoryError::invalid_state(format!("duplicate {}", id)));
                }
            }
        }

        Ok(Self {
            turns: repr.turns,
            current: repr.current,
        })
    }
}

impl<A> Default for History<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> History<A> {
    /// Create a history holding one empty turn.
    #[must_use]
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::new()],
            current: 0,
        }
    }

    /// Index of the current turn.
    #[must_use]
    pub fn current_turn_index(&self) -> usize {
        self.current
    }

    /// Number of turns, including the ones after the current one.
    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// All turns, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[Turn<A>] {
        &self.turns
    }

    #[must_use]
    pub fn current_turn(&self) -> &Turn<A> {
        &self.turns[self.current]
    }

    /// Whether the current turn is the tail turn and fully executed.
    #[must_use]
    pub fn is_last_turn(&self) -> bool {
        self.current + 1 == self.turns.len() && self.turns[self.current].is_fully_executed()
    }

    fn last_index(&self) -> usize {
        self.turns.len() - 1
    }
}

impl<A: Action> History<A> {
    /// Whether the history is rewound as far as it can go.
    ///
    /// That is the first turn, stopped before its pending decision (or fully
    /// executed when it has none).
    #[must_use]
    pub fn is_first_turn(&self) -> bool {
        let turn = &self.turns[self.current];
        self.current == 0
            && turn.is_partially_executed()
            && (!turn.has_non_auto_executable() || !turn.is_fully_executed())
    }

    /// Catch up to the tail, then open a new empty turn.
    pub fn new_turn(&mut self) -> Result<()> {
        self.last_turn()?;
        self.turns.push(Turn::new());
        self.current += 1;
        info!(turn = self.current, "new turn");
        Ok(())
    }

    /// Append an action to the tail turn and execute it.
    pub fn add_and_execute(&mut self, action: A) -> Result<ActionId> {
        if !self.is_last_turn() {
            return Err(HistoryError::StaleTurnMutation {
                current: self.current,
                last: self.last_index(),
            });
        }
        self.turns[self.current].add_and_execute(action)
    }

    /// Step back by one resting point.
    ///
    /// On a fully executed tail turn holding a decision, this only rewinds to
    /// right before that decision. Otherwise the current turn is undone and
    /// the previous one is brought back right before its own decision.
    pub fn prev_turn(&mut self) -> Result<()> {
        if self.is_first_turn() {
            return Ok(());
        }

        debug!(turn = self.current, "navigating to the previous turn");
        let is_last = self.is_last_turn();
        let turn = &mut self.turns[self.current];
        if turn.is_fully_executed() && turn.has_non_auto_executable() {
            if !is_last {
                return Err(HistoryError::invalid_state(format!(
                    "turn {} is fully executed but is not the last turn",
                    self.current
                )));
            }
            return turn.partial_undo();
        }

        if self.current == 0 {
            return Err(HistoryError::invalid_state(
                "cannot go back before the first turn",
            ));
        }
        if !turn.is_partially_executed() {
            return Err(HistoryError::invalid_state(format!(
                "turn {} is stopped at cursor {} outside a resting point",
                self.current,
                turn.cursor()
            )));
        }
        turn.undo()?;

        self.current -= 1;
        self.turns[self.current].partial_undo()
    }

    /// Step forward by one resting point.
    ///
    /// Finishes the current turn and, if a later turn exists, moves to it and
    /// partially executes it.
    pub fn next_turn(&mut self) -> Result<()> {
        if self.is_last_turn() {
            return Ok(());
        }

        debug!(turn = self.current, "navigating to the next turn");
        let has_next = self.current + 1 < self.turns.len();
        let turn = &mut self.turns[self.current];
        if !turn.is_partially_executed() {
            return Err(HistoryError::invalid_state(format!(
                "turn {} is stopped at cursor {} outside a resting point",
                self.current,
                turn.cursor()
            )));
        }

        turn.execute()?;
        if has_next {
            self.current += 1;
            self.turns[self.current].partial_execute()?;
        }
        Ok(())
    }

    /// Rewind step by step until `is_first_turn` holds.
    pub fn first_turn(&mut self) -> Result<()> {
        debug!("navigating to the first turn");
        while !self.is_first_turn() {
            self.prev_turn()?;
        }
        Ok(())
    }

    /// Replay step by step until `is_last_turn` holds.
    pub fn last_turn(&mut self) -> Result<()> {
        debug!("navigating to the last turn");
        while !self.is_last_turn() {
            self.next_turn()?;
        }
        Ok(())
    }

    /// Discard everything after the current point.
    ///
    /// Turns made only of human-independent actions are replayed first, so
    /// automated progress is kept. The turns after the new current one are
    /// then destroyed, along with the non-executed actions of the current turn.
    pub fn clear_future(&mut self) -> Result<()> {
        info!(turn = self.current, "erasing all the future turns");

        while !self.is_last_turn() && self.turns[self.current].is_human_independent() {
            debug!(turn = self.current, "replaying a human independent turn");
            self.next_turn()?;
        }

        if self.is_last_turn() {
            return Ok(());
        }

        let turn = &self.turns[self.current];
        if !turn.is_partially_executed() {
            return Err(HistoryError::invalid_state(format!(
                "turn {} is stopped at cursor {} outside a resting point",
                self.current,
                turn.cursor()
            )));
        }

        self.turns.truncate(self.current + 1);
        self.turns[self.current].drop_non_executed();

        if !self.is_last_turn() {
            return Err(HistoryError::invalid_state(
                "the current turn is not the last one after clearing the future",
            ));
        }
        Ok(())
    }

    /// Undo and remove an action of the tail turn and everything after it.
    pub fn drop_from(&mut self, id: ActionId) -> Result<()> {
        if !self.is_last_turn() {
            return Err(HistoryError::StaleTurnMutation {
                current: self.current,
                last: self.last_index(),
            });
        }
        self.turns[self.current].drop_from(id)
    }

    /// Remove an insertable action from the current turn.
    pub fn drop_action(&mut self, id: ActionId) -> Result<()> {
        self.turns[self.current].drop_action(id)
    }

    /// Insert an insertable action in the current turn, before its decision.
    pub fn insert_action(&mut self, action: A) -> Result<ActionId> {
        self.turns[self.current].insert_action(action)
    }

    /// Replace an action of the current turn by another one of the same kind.
    pub fn replace_action(&mut self, old: ActionId, action: A) -> Result<ActionId> {
        self.turns[self.current].replace_action(old, action)
    }

    /// Locate an action anywhere in the history, as `(turn index, action)`.
    #[must_use]
    pub fn find(&self, id: ActionId) -> Option<(usize, &A)> {
        self.turns
            .iter()
            .enumerate()
            .find_map(|(index, turn)| turn.get(id).map(|action| (index, action)))
    }

    /// Dump the whole history at debug level.
    pub fn log_state(&self) {
        debug!(current = self.current, "commands history:\n{}", self);
    }
}

impl<A: Action> fmt::Display for History<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, turn) in self.turns.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let marker = if index == self.current { " (current)" } else { "" };
            write!(f, "Turn {}{}:", index, marker)?;
            if !turn.is_empty() {
                write!(f, "\n{}", turn)?;
            }
        }
        Ok(())
    }
}
