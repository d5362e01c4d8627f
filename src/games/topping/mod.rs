//! Topping: a word game scorekeeper.
//!
//! Each turn a rack is drawn from the bag, players look for the best move,
//! and the top move is then placed on the board before the next turn. The
//! session records every step in a [`History`](crate::core::History), so the
//! arbiter can rewind, replay, correct moves and hand out penalties after the
//! fact.
//!
//! Word search and board scoring are out of scope: moves come in with their
//! points already computed.
//!
//! ```
//! use turn_history::games::PlayerId;
//! use turn_history::games::topping::{ToppingConfig, ToppingSession};
//!
//! let mut session = ToppingSession::new(ToppingConfig::new().with_seed(1))?;
//! session.start()?;
//! session.play_move(PlayerId::new(0), "ZEBU", 30)?;
//! session.end_turn("ZEBU")?;
//! assert_eq!(session.score(PlayerId::new(0)), Some(30));
//!
//! // Back to the new rack, then to the first turn before any move
//! session.prev_turn()?;
//! assert_eq!(session.score(PlayerId::new(0)), Some(30));
//! session.prev_turn()?;
//! assert_eq!(session.score(PlayerId::new(0)), Some(0));
//! # Ok::<(), turn_history::games::topping::ToppingError>(())
//! ```

mod actions;
mod config;
mod error;
mod session;

pub use actions::{Effect, Rack, SharedTable, Table, ToppingAction, ToppingKind};
pub use config::{ToppingConfig, DEFAULT_LETTERS};
pub use error::ToppingError;
pub use session::{ToppingSession, TriedMove};
