//! Reference games built on the history engine.
//!
//! - `topping`: a word game scorekeeper exercising every history
//!   operation (navigation, mid-turn insertion and removal, replacement,
//!   future pruning).

pub mod player;
pub mod rng;
pub mod topping;

pub use player::{PlayerId, PlayerMap};
pub use rng::TileRng;
