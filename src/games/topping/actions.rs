//! Topping table state and the reversible actions applied to it.
//!
//! Every action carries everything it needs to be undone: a drawn rack keeps
//! the rack it replaced, a move keeps its points. The table is shared between
//! the session and the actions stored in the history, and is only touched
//! from the thread driving the session.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Action;
use crate::error::ActionError;
use crate::games::{PlayerId, PlayerMap};

/// Tiles of a rack. Racks rarely exceed 8 tiles.
pub type Rack = SmallVec<[char; 8]>;

/// Table shared between a session and its actions.
pub type SharedTable = Rc<RefCell<Table>>;

/// Everything on the table: bag, rack, scores and played words.
#[derive(Clone, Debug)]
pub struct Table {
    bag: FxHashMap<char, u32>,
    rack: Rack,
    scores: PlayerMap<i32>,
    words: Vec<String>,
}

impl Table {
    /// Create a table whose bag holds one tile per character of `letters`.
    #[must_use]
    pub fn new(letters: &str, player_count: usize) -> Self {
        let mut bag = FxHashMap::default();
        for letter in letters.chars() {
            *bag.entry(letter).or_insert(0) += 1;
        }
        Self {
            bag,
            rack: Rack::new(),
            scores: PlayerMap::with_value(player_count, 0),
            words: Vec::new(),
        }
    }

    /// Number of tiles left in the bag.
    #[must_use]
    pub fn bag_len(&self) -> usize {
        self.bag.values().map(|&n| n as usize).sum()
    }

    /// Tiles left in the bag, sorted.
    #[must_use]
    pub fn bag_tiles(&self) -> Vec<char> {
        let mut tiles: Vec<char> = self
            .bag
            .iter()
            .flat_map(|(&letter, &count)| std::iter::repeat(letter).take(count as usize))
            .collect();
        tiles.sort_unstable();
        tiles
    }

    #[must_use]
    pub fn rack(&self) -> &[char] {
        &self.rack
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> Option<i32> {
        self.scores.get(player).copied()
    }

    /// Words played on the board, oldest first.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn take_tiles(&mut self, tiles: &[char]) -> Result<(), ActionError> {
        let mut needed: FxHashMap<char, u32> = FxHashMap::default();
        for &tile in tiles {
            *needed.entry(tile).or_insert(0) += 1;
        }
        for (tile, count) in &needed {
            if self.bag.get(tile).copied().unwrap_or(0) < *count {
                return Err(ActionError::Rejected(format!("no tile '{}' left in the bag", tile)));
            }
        }
        for (tile, count) in needed {
            if let Some(left) = self.bag.get_mut(&tile) {
                *left -= count;
            }
        }
        Ok(())
    }

    fn return_tiles(&mut self, tiles: &[char]) {
        for &tile in tiles {
            *self.bag.entry(tile).or_insert(0) += 1;
        }
    }

    fn add_points(&mut self, player: PlayerId, points: i32) -> Result<(), ActionError> {
        let score = self
            .scores
            .get_mut(player)
            .ok_or_else(|| ActionError::Rejected(format!("unknown {}", player)))?;
        *score = score
            .checked_add(points)
            .ok_or_else(|| ActionError::Rejected(format!("score overflow for {}", player)))?;
        Ok(())
    }
}

/// Discriminator of [`ToppingAction`], used for typed lookup and replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToppingKind {
    DrawRack,
    AwaitMoves,
    PlayerMove,
    Penalty,
    GameMove,
}

/// What a [`ToppingAction`] does to the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Replace the rack with tiles taken from the bag.
    DrawRack { tiles: Rack, previous: Rack },

    /// Marks where the turn waits for the players. Changes nothing.
    AwaitMoves,

    /// A move proposed by a player. An empty word is a timeout.
    PlayerMove {
        player: PlayerId,
        word: String,
        points: i32,
    },

    /// Points withdrawn from a player by the arbiter.
    Penalty { player: PlayerId, points: i32 },

    /// The top move, placed on the board.
    GameMove { word: String },
}

impl Effect {
    #[must_use]
    pub fn kind(&self) -> ToppingKind {
        match self {
            Effect::DrawRack { .. } => ToppingKind::DrawRack,
            Effect::AwaitMoves => ToppingKind::AwaitMoves,
            Effect::PlayerMove { .. } => ToppingKind::PlayerMove,
            Effect::Penalty { .. } => ToppingKind::Penalty,
            Effect::GameMove { .. } => ToppingKind::GameMove,
        }
    }
}

/// A reversible change of the topping table.
#[derive(Debug)]
pub struct ToppingAction {
    table: SharedTable,
    effect: Effect,
    executed: bool,
}

impl ToppingAction {
    fn with_effect(table: &SharedTable, effect: Effect) -> Self {
        Self {
            table: Rc::clone(table),
            effect,
            executed: false,
        }
    }

    #[must_use]
    pub fn draw_rack(table: &SharedTable, tiles: Rack) -> Self {
        Self::with_effect(
            table,
            Effect::DrawRack {
                tiles,
                previous: Rack::new(),
            },
        )
    }

    #[must_use]
    pub fn await_moves(table: &SharedTable) -> Self {
        Self::with_effect(table, Effect::AwaitMoves)
    }

    #[must_use]
    pub fn player_move(table: &SharedTable, player: PlayerId, word: impl Into<String>, points: i32) -> Self {
        Self::with_effect(
            table,
            Effect::PlayerMove {
                player,
                word: word.into(),
                points,
            },
        )
    }

    #[must_use]
    pub fn penalty(table: &SharedTable, player: PlayerId, points: i32) -> Self {
        Self::with_effect(table, Effect::Penalty { player, points })
    }

    #[must_use]
    pub fn game_move(table: &SharedTable, word: impl Into<String>) -> Self {
        Self::with_effect(table, Effect::GameMove { word: word.into() })
    }

    #[must_use]
    pub fn effect(&self) -> &Effect {
        &self.effect
    }
}

fn negate(points: i32) -> Result<i32, ActionError> {
    points
        .checked_neg()
        .ok_or_else(|| ActionError::Rejected(format!("cannot revert {} points", points)))
}

impl Action for ToppingAction {
    type Kind = ToppingKind;

    fn execute(&mut self) -> Result<(), ActionError> {
        if self.executed {
            return Err(ActionError::AlreadyExecuted);
        }

        let mut table = self.table.borrow_mut();
        match &mut self.effect {
            Effect::DrawRack { tiles, previous } => {
                table.take_tiles(tiles)?;
                *previous = std::mem::replace(&mut table.rack, tiles.clone());
            }
            Effect::AwaitMoves => {}
            Effect::PlayerMove { player, points, .. } => table.add_points(*player, *points)?,
            Effect::Penalty { player, points } => table.add_points(*player, negate(*points)?)?,
            Effect::GameMove { word } => table.words.push(word.clone()),
        }
        self.executed = true;
        Ok(())
    }

    fn undo(&mut self) -> Result<(), ActionError> {
        if !self.executed {
            return Err(ActionError::NotExecuted);
        }

        let mut table = self.table.borrow_mut();
        match &mut self.effect {
            Effect::DrawRack { tiles, previous } => {
                table.rack = std::mem::take(previous);
                table.return_tiles(tiles);
            }
            Effect::AwaitMoves => {}
            Effect::PlayerMove { player, points, .. } => table.add_points(*player, negate(*points)?)?,
            Effect::Penalty { player, points } => table.add_points(*player, *points)?,
            Effect::GameMove { word } => {
                if table.words.last() != Some(&*word) {
                    return Err(ActionError::Rejected(format!("'{}' is not the last word played", word)));
                }
                table.words.pop();
            }
        }
        self.executed = false;
        Ok(())
    }

    fn is_executed(&self) -> bool {
        self.executed
    }

    fn is_auto_executable(&self) -> bool {
        !matches!(self.effect, Effect::AwaitMoves | Effect::PlayerMove { .. })
    }

    fn is_human_independent(&self) -> bool {
        !matches!(self.effect, Effect::AwaitMoves | Effect::PlayerMove { .. })
    }

    fn is_insertable(&self) -> bool {
        matches!(self.effect, Effect::Penalty { .. })
    }

    fn kind(&self) -> ToppingKind {
        self.effect.kind()
    }
}

impl fmt::Display for ToppingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.effect {
            Effect::DrawRack { tiles, .. } => {
                write!(f, "DrawRack [{}]", tiles.iter().collect::<String>())
            }
            Effect::AwaitMoves => f.write_str("AwaitMoves"),
            Effect::PlayerMove { player, word, points } if word.is_empty() => {
                write!(f, "PlayerMove {}: timeout ({})", player, points)
            }
            Effect::PlayerMove { player, word, points } => {
                write!(f, "PlayerMove {}: {} ({})", player, word, points)
            }
            Effect::Penalty { player, points } => write!(f, "Penalty {}: {}", player, points),
            Effect::GameMove { word } => write!(f, "GameMove {}", word),
        }
    }
}
