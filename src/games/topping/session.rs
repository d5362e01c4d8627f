//! Topping session: drives a [`History`] of [`ToppingAction`]s.
//!
//! A turn goes:
//!
//! 1. `start` draws a rack (automatic), then waits for the players
//! 2. players propose moves with `play_move` or run out of time (`timeout`)
//! 3. `end_turn` records the top move, opens a new turn and draws the next rack
//!
//! Every turn waits for the players right after its rack, so navigation
//! always stops there. At any point the arbiter may add or remove penalties,
//! correct a move, or navigate back and forth. A move proposed while rewound
//! lands in the viewed turn and discards everything after it.
//!
//! The game is over once a turn could not draw its rack; from then on only
//! navigation is allowed, until a rewind brings back a turn with a rack.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use super::actions::{Effect, Rack, SharedTable, Table, ToppingAction, ToppingKind};
use super::config::ToppingConfig;
use super::error::ToppingError;
use crate::core::{ActionId, History};
use crate::error::HistoryError;
use crate::games::{PlayerId, TileRng};

/// A move found in the history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriedMove {
    pub player: PlayerId,
    pub word: String,
    pub points: i32,
}

pub struct ToppingSession {
    config: ToppingConfig,
    table: SharedTable,
    history: History<ToppingAction>,
    rng: TileRng,
}

impl ToppingSession {
    /// Create a session with a full bag and an empty first turn.
    pub fn new(config: ToppingConfig) -> Result<Self, ToppingError> {
        config.validate()?;
        let table = Table::new(&config.letters, config.player_count);
        Ok(Self {
            rng: TileRng::new(config.seed),
            table: Rc::new(RefCell::new(table)),
            history: History::new(),
            config,
        })
    }

    /// Draw the rack of the current turn, then wait for the players.
    ///
    /// Fails with `BagExhausted` when the bag cannot fill a whole rack, which
    /// ends the game.
    pub fn start(&mut self) -> Result<ActionId, ToppingError> {
        let pool = self.table.borrow().bag_tiles();
        if pool.len() < self.config.rack_size {
            info!(left = pool.len(), "end of the game");
            return Err(ToppingError::BagExhausted {
                available: pool.len(),
                needed: self.config.rack_size,
            });
        }

        let tiles: Rack = self.rng.draw(&pool, self.config.rack_size).into_iter().collect();
        let id = self.history.add_and_execute(ToppingAction::draw_rack(&self.table, tiles))?;
        self.history.add_and_execute(ToppingAction::await_moves(&self.table))?;
        Ok(id)
    }

    /// Record a move proposed by a player.
    pub fn play_move(&mut self, player: PlayerId, word: &str, points: i32) -> Result<ActionId, ToppingError> {
        self.check_playing()?;
        self.check_player(player)?;
        info!(%player, word, points, "player move");
        self.record(ToppingAction::player_move(&self.table, player, word, points))
    }

    /// Record that a player let the timer run out.
    pub fn timeout(&mut self, player: PlayerId, elapsed: u32) -> Result<ActionId, ToppingError> {
        self.check_playing()?;
        self.check_player(player)?;
        let points = self.config.timeout_points(elapsed);
        info!(%player, elapsed, points, "timeout reached");
        self.record(ToppingAction::player_move(&self.table, player, "", points.saturating_neg()))
    }

    /// Give a penalty to a player, in the current turn.
    pub fn add_penalty(&mut self, player: PlayerId, points: i32) -> Result<ActionId, ToppingError> {
        self.check_playing()?;
        self.check_player(player)?;
        debug!(%player, points, "adding penalty");
        let action = ToppingAction::penalty(&self.table, player, points);
        Ok(self.history.insert_action(action)?)
    }

    /// Withdraw a penalty of the current turn.
    pub fn remove_penalty(&mut self, id: ActionId) -> Result<(), ToppingError> {
        debug!(%id, "removing penalty");
        Ok(self.history.drop_action(id)?)
    }

    /// Replace a move of the current turn, keeping its player.
    pub fn correct_move(&mut self, id: ActionId, word: &str, points: i32) -> Result<ActionId, ToppingError> {
        let player = match self.history.current_turn().get(id).map(ToppingAction::effect) {
            Some(Effect::PlayerMove { player, .. }) => *player,
            Some(_) => return Err(ToppingError::NotAMove(id)),
            None => return Err(HistoryError::ActionNotFound(id).into()),
        };
        debug!(%id, word, points, "correcting move");
        let action = ToppingAction::player_move(&self.table, player, word, points);
        Ok(self.history.replace_action(id, action)?)
    }

    /// Play the top move, open the next turn and draw its rack.
    ///
    /// Returns `false` when the bag could not fill the next rack, in which
    /// case the game is over.
    pub fn end_turn(&mut self, top_word: &str) -> Result<bool, ToppingError> {
        self.check_playing()?;
        info!(word = top_word, "end of turn");
        self.record(ToppingAction::game_move(&self.table, top_word))?;
        self.history.new_turn()?;
        self.history.log_state();

        match self.start() {
            Ok(_) => Ok(true),
            Err(ToppingError::BagExhausted { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Moves tried so far in the current turn.
    #[must_use]
    pub fn tried_moves(&self) -> Vec<TriedMove> {
        self.history
            .current_turn()
            .find_all(ToppingKind::PlayerMove)
            .into_iter()
            .filter_map(|action| match action.effect() {
                Effect::PlayerMove { player, word, points } => Some(TriedMove {
                    player: *player,
                    word: word.clone(),
                    points: *points,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn prev_turn(&mut self) -> Result<(), ToppingError> {
        Ok(self.history.prev_turn()?)
    }

    pub fn next_turn(&mut self) -> Result<(), ToppingError> {
        Ok(self.history.next_turn()?)
    }

    pub fn first_turn(&mut self) -> Result<(), ToppingError> {
        Ok(self.history.first_turn()?)
    }

    pub fn last_turn(&mut self) -> Result<(), ToppingError> {
        Ok(self.history.last_turn()?)
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> Option<i32> {
        self.table.borrow().score(player)
    }

    #[must_use]
    pub fn rack(&self) -> Rack {
        self.table.borrow().rack().iter().copied().collect()
    }

    #[must_use]
    pub fn words(&self) -> Vec<String> {
        self.table.borrow().words().to_vec()
    }

    #[must_use]
    pub fn bag_len(&self) -> usize {
        self.table.borrow().bag_len()
    }

    /// Whether the current turn has no rack and the bag cannot fill one.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.history.current_turn().find_last(ToppingKind::DrawRack).is_none()
            && self.table.borrow().bag_len() < self.config.rack_size
    }

    #[must_use]
    pub fn history(&self) -> &History<ToppingAction> {
        &self.history
    }

    /// Append an action, discarding the future first when rewound.
    fn record(&mut self, action: ToppingAction) -> Result<ActionId, ToppingError> {
        if !self.history.is_last_turn() {
            self.history.clear_future()?;
        }
        Ok(self.history.add_and_execute(action)?)
    }

    fn check_playing(&self) -> Result<(), ToppingError> {
        if self.is_finished() {
            Err(ToppingError::GameFinished)
        } else {
            Ok(())
        }
    }

    fn check_player(&self, player: PlayerId) -> Result<(), ToppingError> {
        if player.index() < self.config.player_count {
            Ok(())
        } else {
            Err(ToppingError::UnknownPlayer(player))
        }
    }
}
