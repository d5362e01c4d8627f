//! Compact binary snapshots of a history.
//!
//! A snapshot holds every turn with its actions, their handles and cursor,
//! plus the current turn index. Loading a snapshot re-checks all the history
//! invariants, so a corrupted or hand-edited snapshot is rejected instead of
//! producing a history whose cursors disagree with its actions.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::action::Action;
use super::history::History;
use crate::error::Result;

/// Encode a history with `bincode`.
pub fn encode<A>(history: &History<A>) -> Result<Vec<u8>>
where
    A: Action + Serialize,
{
    Ok(bincode::serialize(history)?)
}

/// Decode a history previously produced by [`encode`].
pub fn decode<A>(bytes: &[u8]) -> Result<History<A>>
where
    A: Action + DeserializeOwned,
{
    Ok(bincode::deserialize(bytes)?)
}
