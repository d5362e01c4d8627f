//! Probe action recording every execute/undo in a shared log.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use turn_history::{Action, ActionError, History, Turn};

pub type Log = Rc<RefCell<Vec<String>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeKind {
    Auto,
    Human,
    Insertable,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Probe {
    pub name: String,
    kind: ProbeKind,
    executed: bool,
    #[serde(skip)]
    log: Log,
}

impl Probe {
    fn build(name: &str, kind: ProbeKind, log: &Log) -> Self {
        Self {
            name: name.to_string(),
            kind,
            executed: false,
            log: Rc::clone(log),
        }
    }

    /// Auto-executable and human-independent.
    pub fn auto(name: &str, log: &Log) -> Self {
        Self::build(name, ProbeKind::Auto, log)
    }

    /// Needs human input.
    pub fn human(name: &str, log: &Log) -> Self {
        Self::build(name, ProbeKind::Human, log)
    }

    /// Auto-executable, human-independent and insertable.
    pub fn insertable(name: &str, log: &Log) -> Self {
        Self::build(name, ProbeKind::Insertable, log)
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Action for Probe {
    type Kind = ProbeKind;

    fn execute(&mut self) -> Result<(), ActionError> {
        if self.executed {
            return Err(ActionError::AlreadyExecuted);
        }
        self.executed = true;
        self.log.borrow_mut().push(format!("+{}", self.name));
        Ok(())
    }

    fn undo(&mut self) -> Result<(), ActionError> {
        if !self.executed {
            return Err(ActionError::NotExecuted);
        }
        self.executed = false;
        self.log.borrow_mut().push(format!("-{}", self.name));
        Ok(())
    }

    fn is_executed(&self) -> bool {
        self.executed
    }

    fn is_auto_executable(&self) -> bool {
        self.kind != ProbeKind::Human
    }

    fn is_human_independent(&self) -> bool {
        self.kind != ProbeKind::Human
    }

    fn is_insertable(&self) -> bool {
        self.kind == ProbeKind::Insertable
    }

    fn kind(&self) -> ProbeKind {
        self.kind
    }
}

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Drain the log, returning what was recorded since the last call.
pub fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

/// Names of the actions of a turn, in order.
pub fn names(turn: &Turn<Probe>) -> Vec<String> {
    turn.iter().map(|(_, probe)| probe.name.clone()).collect()
}

/// Cursor of every turn.
pub fn cursors(history: &History<Probe>) -> Vec<usize> {
    history.turns().iter().map(Turn::cursor).collect()
}

/// Check the executed-prefix invariant of a turn.
pub fn assert_turn_consistent(turn: &Turn<Probe>) {
    assert!(turn.cursor() <= turn.len());
    for (index, (_, probe)) in turn.iter().enumerate() {
        assert_eq!(
            probe.is_executed(),
            index < turn.cursor(),
            "{} at index {} with cursor {}",
            probe,
            index,
            turn.cursor()
        );
    }
}

/// Check every structural invariant of a history.
pub fn assert_history_consistent(history: &History<Probe>) {
    assert!(history.turn_count() >= 1);
    assert!(history.current_turn_index() < history.turn_count());
    for (index, turn) in history.turns().iter().enumerate() {
        assert_turn_consistent(turn);
        if index < history.current_turn_index() {
            assert!(turn.is_fully_executed(), "turn {} should be fully executed", index);
        }
        if index > history.current_turn_index() {
            assert!(turn.is_not_at_all_executed(), "turn {} should not be executed", index);
        }
    }
}
