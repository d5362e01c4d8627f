//! The reversible action contract and action handles.
//!
//! The engine never interprets what an action does. It only relies on the
//! contract below to decide when an action may be applied, undone, replayed,
//! inserted or discarded:
//!
//! - `execute` is only called on a non-executed action and applies its effect once
//! - `undo` is only called on an executed action and applies the exact inverse
//! - the four traits (`auto_executable`, `human_independent`, `insertable`,
//!   `kind`) never change during the action's lifetime
//!
//! ## Example
//!
//! ```
//! use std::fmt;
//! use turn_history::core::Action;
//! use turn_history::ActionError;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Kind {
//!     Add,
//! }
//!
//! struct Add {
//!     amount: i32,
//!     executed: bool,
//! }
//!
//! impl fmt::Display for Add {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "Add({})", self.amount)
//!     }
//! }
//!
//! impl Action for Add {
//!     type Kind = Kind;
//!
//!     fn execute(&mut self) -> Result<(), ActionError> {
//!         self.executed = true;
//!         Ok(())
//!     }
//!
//!     fn undo(&mut self) -> Result<(), ActionError> {
//!         self.executed = false;
//!         Ok(())
//!     }
//!
//!     fn is_executed(&self) -> bool {
//!         self.executed
//!     }
//!
//!     fn kind(&self) -> Kind {
//!         Kind::Add
//!     }
//! }
//!
//! let add = Add { amount: 3, executed: false };
//! assert!(add.is_auto_executable());
//! assert!(!add.is_insertable());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

static NEXT_ACTION_ID: AtomicU64 = AtomicU64::new(0);

/// Stable handle of an action stored in a [`Turn`](super::Turn).
///
/// Handles are assigned when an action enters a turn and are never reused
/// within the process, so a handle can't alias an action that was removed
/// and later replaced by another one. Cloning a turn or a history copies the
/// handles along with the actions: the same handle then names the matching
/// action in each copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub u64);

impl ActionId {
    /// Create an action handle from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocate a handle that has never been handed out before.
    pub(crate) fn fresh() -> Self {
        Self(NEXT_ACTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Make sure `fresh` never returns this handle (or any lower one).
    ///
    /// Called when handles come back from a snapshot.
    pub(crate) fn reserve(self) {
        NEXT_ACTION_ID.fetch_max(self.0.saturating_add(1), Ordering::Relaxed);
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({})", self.0)
    }
}

/// A reversible unit of mutation.
///
/// Implementors are usually a closed enum over the concrete actions of a game,
/// with `Kind` a matching fieldless enum. Boxed trait objects work as well
/// through the blanket impl on `Box<T>`.
///
/// The `Display` output is only used for diagnostics.
pub trait Action: fmt::Display {
    /// Discriminator checked by `replace_action`: only actions of the same
    /// kind may replace one another.
    type Kind: Copy + Eq + fmt::Debug;

    /// Apply the action. On error, nothing must have been applied.
    fn execute(&mut self) -> Result<(), ActionError>;

    /// Revert the action. On error, the action must still be executed.
    fn undo(&mut self) -> Result<(), ActionError>;

    fn is_executed(&self) -> bool;

    /// Whether the action may run without waiting for external input.
    fn is_auto_executable(&self) -> bool {
        true
    }

    /// Whether the action's effect is independent from human input.
    fn is_human_independent(&self) -> bool {
        true
    }

    /// Whether the action may be inserted in (or dropped from) the middle of a turn.
    fn is_insertable(&self) -> bool {
        false
    }

    fn kind(&self) -> Self::Kind;
}

impl<T: Action + ?Sized> Action for Box<T> {
    type Kind = T::Kind;

    fn execute(&mut self) -> Result<(), ActionError> {
        (**self).execute()
    }

    fn undo(&mut self) -> Result<(), ActionError> {
        (**self).undo()
    }

    fn is_executed(&self) -> bool {
        (**self).is_executed()
    }

    fn is_auto_executable(&self) -> bool {
        (**self).is_auto_executable()
    }

    fn is_human_independent(&self) -> bool {
        (**self).is_human_independent()
    }

    fn is_insertable(&self) -> bool {
        (**self).is_insertable()
    }

    fn kind(&self) -> Self::Kind {
        (**self).kind()
    }
}
