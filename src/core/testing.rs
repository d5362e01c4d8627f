//! Probe action shared by the unit tests of this module.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::action::Action;
use crate::error::ActionError;

pub type Log = Rc<RefCell<Vec<String>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeKind {
    Auto,
    Human,
    Insert,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Probe {
    pub name: String,
    kind: ProbeKind,
    executed: bool,
    #[serde(skip)]
    fail: Rc<Cell<bool>>,
    #[serde(skip)]
    log: Log,
}

impl Probe {
    fn build(name: &str, kind: ProbeKind, log: &Log) -> Self {
        Self {
            name: name.to_string(),
            kind,
            executed: false,
            fail: Rc::default(),
            log: Rc::clone(log),
        }
    }

    pub fn auto(name: &str, log: &Log) -> Self {
        Self::build(name, ProbeKind::Auto, log)
    }

    pub fn human(name: &str, log: &Log) -> Self {
        Self::build(name, ProbeKind::Human, log)
    }

    pub fn insertable(name: &str, log: &Log) -> Self {
        Self::build(name, ProbeKind::Insert, log)
    }

    pub fn failing(name: &str, log: &Log) -> Self {
        let probe = Self::build(name, ProbeKind::Auto, log);
        probe.fail.set(true);
        probe
    }

    /// Switch making every later `execute` fail, kept usable once the probe
    /// is stored in a turn.
    pub fn failure_switch(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.fail)
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
        if self.fail.get() {
            return Err(ActionError::Rejected(self.name.clone()));
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
        self.kind == ProbeKind::Insert
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
