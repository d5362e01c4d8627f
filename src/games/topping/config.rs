//! Topping game configuration.

use serde::{Deserialize, Serialize};

use super::error::ToppingError;

/// Default tile distribution (100 tiles).
pub const DEFAULT_LETTERS: &str = "AAAAAAAAABBCCDDDEEEEEEEEEEEEEEEFFGGHHIIIIIIIIJKLLLLLMMMNNNNNNOOOOOOPPQRRRRRRSSSSSSTTTTTTUUUUUUVVWXYZ";

/// Configuration of a topping session.
///
/// Every field has a default, so a partial JSON/YAML document is enough:
///
/// ```
/// use turn_history::games::topping::ToppingConfig;
///
/// let config = ToppingConfig::new().with_seed(7).with_timeout_penalty(30);
/// assert_eq!(config.rack_size, 7);
/// assert_eq!(config.timeout_penalty, 30);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToppingConfig {
    /// Number of players (1-255).
    pub player_count: usize,

    /// Tiles drawn at the start of every turn.
    pub rack_size: usize,

    /// Seed of the tile RNG.
    pub seed: u64,

    /// Points lost by a player who lets the timer run out.
    pub timeout_penalty: i32,

    /// Whether elapsed seconds are added to the timeout penalty.
    pub elapsed_penalty: bool,

    /// Tile distribution of the bag, one character per tile.
    pub letters: String,
}

impl Default for ToppingConfig {
    fn default() -> Self {
        Self {
            player_count: 1,
            rack_size: 7,
            seed: 0,
            timeout_penalty: 60,
            elapsed_penalty: false,
            letters: DEFAULT_LETTERS.to_string(),
        }
    }
}

impl ToppingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_players(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn with_rack_size(mut self, size: usize) -> Self {
        self.rack_size = size;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_timeout_penalty(mut self, points: i32) -> Self {
        self.timeout_penalty = points;
        self
    }

    /// Add elapsed seconds to the timeout penalty.
    #[must_use]
    pub fn with_elapsed_penalty(mut self) -> Self {
        self.elapsed_penalty = true;
        self
    }

    #[must_use]
    pub fn with_letters(mut self, letters: impl Into<String>) -> Self {
        self.letters = letters.into();
        self
    }

    /// Penalty for a timeout after `elapsed` seconds.
    #[must_use]
    pub fn timeout_points(&self, elapsed: u32) -> i32 {
        let extra = if self.elapsed_penalty {
            i32::try_from(elapsed).unwrap_or(i32::MAX)
        } else {
            0
        };
        self.timeout_penalty.saturating_add(extra)
    }

    pub fn validate(&self) -> Result<(), ToppingError> {
        if self.player_count == 0 || self.player_count > 255 {
            return Err(ToppingError::InvalidConfig(format!(
                "player count must be 1-255, got {}",
                self.player_count
            )));
        }
        if self.rack_size == 0 {
            return Err(ToppingError::InvalidConfig("rack size must be positive".to_string()));
        }
        if self.letters.is_empty() {
            return Err(ToppingError::InvalidConfig("the bag is empty".to_string()));
        }
        Ok(())
    }
}
