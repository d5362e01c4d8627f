//! A turn: an ordered sequence of actions with an execution cursor.
//!
//! ## Cursor
//!
//! Actions before the cursor are executed, actions from the cursor onward are
//! not. Every operation keeps that invariant, and the cursor only moves through
//! `exec_to` and `undo_to`, which call the actions one at a time in order.
//!
//! ## Resting points
//!
//! - **Fully executed**: cursor at the end.
//! - **Partially executed**: fully executed, or stopped right before the first
//!   action that is not auto-executable (a decision waiting for input).
//! - **Not at all executed**: cursor at zero.
//!
//! New actions only enter at the tail of a fully executed turn, already applied.
//! Insertable actions may also be spliced in right before the first pending
//! decision, and removed again; the actions after the edit point are undone
//! and replayed around the change.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::action::{Action, ActionId};
use crate::error::{HistoryError, Result};

/// An action stored in a turn, with its handle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnEntry<A> {
    id: ActionId,
    action: A,
}

impl<A> TurnEntry<A> {
    /// Handle of the stored action.
    #[must_use]
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// The stored action.
    #[must_use]
    pub fn action(&self) -> &A {
        &self.action
    }
}

/// An ordered, owned sequence of actions with a single execution cursor.
///
/// Cloning keeps the handles of the cloned actions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    try_from = "TurnRepr<A>",
    bound(serialize = "A: Serialize", deserialize = "A: Action + Deserialize<'de>")
)]
pub struct Turn<A> {
    entries: Vec<TurnEntry<A>>,

    /// Index of the first non-executed action.
    cursor: usize,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
struct TurnRepr<A> {
    entries: Vec<TurnEntry<A>>,
    cursor: usize,
}

impl<A: Action> TryFrom<TurnRepr<A>> for Turn<A> {
    type Error = HistoryError;

    fn try_from(repr: TurnRepr<A>) -> Result<Self> {
        if repr.cursor > repr.entries.len() {
            return Err(HistoryError::invalid_state(format!(
                "cursor {} is past the {} actions of the turn",
                repr.cursor,
                repr.entries.len()
            )));
        }

        let mut seen = FxHashSet::default();
        for (index, entry) in repr.entries.iter().enumerate() {
            if entry.action.is_executed() != (index < repr.cursor) {
                return Err(HistoryError::invalid_state(format!(
                    "{} at index {} disagrees with cursor {}",
                    entry.id, index, repr.cursor
                )));
            }
            if !seen.insert(entry.id) {
                return Err(HistoryError::invalid_state(format!("duplicate {}", entry.id)));
            }
        }

        for entry in &repr.entries {
            entry.id.reserve();
        }

        Ok(Self {
            entries: repr.entries,
            cursor: repr.cursor,
        })
    }
}

impl<A> Default for Turn<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Turn<A> {
    /// Create an empty turn.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Number of actions in the turn.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first non-executed action.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_fully_executed(&self) -> bool {
        self.cursor == self.entries.len()
    }

    #[must_use]
    pub fn is_not_at_all_executed(&self) -> bool {
        self.cursor == 0
    }

    /// All stored actions, in sequence order.
    #[must_use]
    pub fn entries(&self) -> &[TurnEntry<A>] {
        &self.entries
    }

    /// Iterate over `(handle, action)` pairs in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &A)> {
        self.entries.iter().map(|e| (e.id, &e.action))
    }

    /// Index of an action, if it belongs to this turn.
    #[must_use]
    pub fn position(&self, id: ActionId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Look up an action by handle.
    #[must_use]
    pub fn get(&self, id: ActionId) -> Option<&A> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.action)
    }

    /// Whether the action belongs to this turn.
    #[must_use]
    pub fn contains(&self, id: ActionId) -> bool {
        self.position(id).is_some()
    }

    fn index_of(&self, id: ActionId) -> Result<usize> {
        self.position(id).ok_or(HistoryError::ActionNotFound(id))
    }
}

impl<A: Action> Turn<A> {
    /// Append an action to a fully executed turn and execute it.
    ///
    /// If the action fails, it is not kept.
    pub fn add_and_execute(&mut self, action: A) -> Result<ActionId> {
        if !self.is_fully_executed() {
            return Err(HistoryError::invalid_state(format!(
                "cannot add an action to a turn executed up to {} of {}",
                self.cursor,
                self.entries.len()
            )));
        }
        Self::check_fresh(&action)?;

        let id = ActionId::fresh();
        self.entries.push(TurnEntry { id, action });
        if let Err(err) = self.exec_to(self.entries.len()) {
            self.entries.pop();
            return Err(err);
        }
        Ok(id)
    }

    /// Execute every pending action.
    pub fn execute(&mut self) -> Result<()> {
        self.exec_to(self.entries.len())?;
        Ok(())
    }

    /// Undo every executed action, most recent first.
    pub fn undo(&mut self) -> Result<()> {
        self.undo_to(0)?;
        Ok(())
    }

    /// Execute up to (not including) the first action needing external input.
    ///
    /// Equivalent to `execute` when every action is auto-executable. Never
    /// moves the cursor backwards.
    pub fn partial_execute(&mut self) -> Result<()> {
        self.exec_to(self.first_non_auto_executable())?;
        Ok(())
    }

    /// Undo the whole turn, then partially execute it again.
    pub fn partial_undo(&mut self) -> Result<()> {
        self.undo()?;
        self.partial_execute()
    }

    /// Discard the actions that were never executed.
    pub fn drop_non_executed(&mut self) {
        if !self.is_fully_executed() {
            debug!(from = self.cursor, count = self.entries.len() - self.cursor, "dropping non-executed actions");
            self.entries.truncate(self.cursor);
        }
    }

    /// Undo and remove the given action and everything after it.
    pub fn drop_from(&mut self, id: ActionId) -> Result<()> {
        let index = self.index_of(id)?;
        debug!(index, %id, "dropping actions from index");

        self.undo_to(index)?;
        self.entries.truncate(index);
        Ok(())
    }

    /// Remove a single insertable action, replaying the actions after it.
    pub fn drop_action(&mut self, id: ActionId) -> Result<()> {
        let index = self.index_of(id)?;
        Self::check_insertable(&self.entries[index].action)?;
        debug!(index, %id, "dropping single action");

        let previous = self.undo_to(index)?;
        self.entries.remove(index);

        // One action less before the old cursor
        let target = if previous > index { previous - 1 } else { previous };
        self.exec_to(target)?;
        Ok(())
    }

    /// Insert an insertable action right before the first pending decision.
    ///
    /// The actions after the insertion point are undone, and replayed along
    /// with the new one up to where the cursor was.
    pub fn insert_action(&mut self, action: A) -> Result<ActionId> {
        Self::check_insertable(&action)?;
        Self::check_fresh(&action)?;

        let index = self.first_non_auto_executable();
        debug!(index, action = %action, "inserting action");

        let previous = self.undo_to(index)?;
        let id = ActionId::fresh();
        self.entries.insert(index, TurnEntry { id, action });

        // One action more before the old cursor
        let target = if previous >= index { previous + 1 } else { previous };
        self.exec_to(target)?;
        Ok(id)
    }

    /// Swap an action for another one of the same kind, replaying the rest.
    pub fn replace_action(&mut self, old: ActionId, action: A) -> Result<ActionId> {
        let index = self.index_of(old)?;
        let expected = self.entries[index].action.kind();
        if expected != action.kind() {
            return Err(HistoryError::KindMismatch {
                expected: format!("{:?}", expected),
                found: format!("{:?}", action.kind()),
            });
        }
        Self::check_fresh(&action)?;
        debug!(index, %old, action = %action, "replacing action");

        let previous = self.undo_to(index)?;
        let id = ActionId::fresh();
        self.entries[index] = TurnEntry { id, action };
        self.exec_to(previous)?;
        Ok(id)
    }

    /// Fully executed, or stopped right before an action needing input.
    #[must_use]
    pub fn is_partially_executed(&self) -> bool {
        match self.entries.get(self.cursor) {
            None => true,
            Some(entry) => !entry.action.is_auto_executable(),
        }
    }

    /// Whether any action of the turn needs external input.
    #[must_use]
    pub fn has_non_auto_executable(&self) -> bool {
        self.first_non_auto_executable() != self.entries.len()
    }

    /// Whether every action of the turn is human-independent.
    #[must_use]
    pub fn is_human_independent(&self) -> bool {
        self.entries.iter().all(|e| e.action.is_human_independent())
    }

    /// All actions of the given kind, in sequence order.
    #[must_use]
    pub fn find_all(&self, kind: A::Kind) -> Vec<&A> {
        self.entries
            .iter()
            .filter(|e| e.action.kind() == kind)
            .map(|e| &e.action)
            .collect()
    }

    /// The most recent action of the given kind.
    #[must_use]
    pub fn find_last(&self, kind: A::Kind) -> Option<&A> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.action.kind() == kind)
            .map(|e| &e.action)
    }

    fn first_non_auto_executable(&self) -> usize {
        self.entries
            .iter()
            .position(|e| !e.action.is_auto_executable())
            .unwrap_or(self.entries.len())
    }

    fn check_insertable(action: &A) -> Result<()> {
        if action.is_insertable() && action.is_auto_executable() {
            Ok(())
        } else {
            Err(HistoryError::IneligibleAction {
                action: action.to_string(),
                insertable: action.is_insertable(),
                auto_executable: action.is_auto_executable(),
            })
        }
    }

    fn check_fresh(action: &A) -> Result<()> {
        if action.is_executed() {
            return Err(HistoryError::invalid_state(format!(
                "'{}' is already executed",
                action
            )));
        }
        Ok(())
    }

    /// Move the cursor forward to `target`, executing actions in order.
    ///
    /// Returns the previous cursor. Does nothing if the cursor is already
    /// at or past `target`.
    fn exec_to(&mut self, target: usize) -> Result<usize> {
        if target > self.entries.len() {
            return Err(HistoryError::invalid_state(format!(
                "cannot execute up to {} in a turn of {} actions",
                target,
                self.entries.len()
            )));
        }

        let previous = self.cursor;
        while self.cursor < target {
            let entry = &mut self.entries[self.cursor];
            let id = entry.id;
            if entry.action.is_executed() {
                return Err(HistoryError::invalid_state(format!(
                    "{} after the cursor is already executed",
                    id
                )));
            }

            trace!(%id, action = %entry.action, "execute");
            entry
                .action
                .execute()
                .map_err(|source| HistoryError::Action { id, source })?;
            if !entry.action.is_executed() {
                return Err(HistoryError::invalid_state(format!(
                    "{} did not report itself executed",
                    id
                )));
            }
            self.cursor += 1;
        }
        Ok(previous)
    }

    /// Move the cursor back to `target`, undoing actions most recent first.
    ///
    /// Returns the previous cursor. Does nothing if the cursor is already
    /// at or before `target`.
    fn undo_to(&mut self, target: usize) -> Result<usize> {
        let previous = self.cursor;
        while self.cursor > target {
            let entry = &mut self.entries[self.cursor - 1];
            let id = entry.id;
            if !entry.action.is_executed() {
                return Err(HistoryError::invalid_state(format!(
                    "{} before the cursor is not executed",
                    id
                )));
            }

            trace!(%id, action = %entry.action, "undo");
            entry
                .action
                .undo()
                .map_err(|source| HistoryError::Action { id, source })?;
            if entry.action.is_executed() {
                return Err(HistoryError::invalid_state(format!(
                    "{} still reports itself executed after undo",
                    id
                )));
            }
            self.cursor -= 1;
        }
        Ok(previous)
    }
}

impl<A: Action> fmt::Display for Turn<A> {
    /// One line per action: `|` when executed, `*` when auto-executable,
    /// `H` when it depends on human input.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let action = &entry.action;
            write!(
                f,
                "  {}{}{}{}",
                if action.is_executed() { "| " } else { "  " },
                if action.is_auto_executable() { "* " } else { "  " },
                if action.is_human_independent() { "  " } else { "H " },
                action
            )?;
        }
        Ok(())
    }
}
