//! Round configuration and difficulty presets.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{GameError, Result};

/// Named preset controlling how long a mole stays up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase", from = "String"))]
pub enum Difficulty {
    Easy,
    Normal,
    #[default]
    Hard,
    /// Any name we do not recognise; plays at the normal pace.
    Other,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Other => "other",
        }
    }
}

impl From<&str> for Difficulty {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "normal" => Difficulty::Normal,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other,
        }
    }
}

// Deserialization goes through here so JSON names match the same way page
// calls do.
impl From<String> for Difficulty {
    fn from(name: String) -> Self {
        Difficulty::from(name.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Difficulty::from(s))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_SLOT_COUNT: usize = 9;
pub const DEFAULT_DURATION_SECS: u32 = 30;
pub const DEFAULT_HIT_COOLDOWN_MS: u64 = 500;
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Everything a round needs to know before it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Number of holes on the board.
    pub slot_count: usize,
    /// Round length in countdown ticks (seconds with the default tick).
    pub duration_secs: u32,
    pub difficulty: Difficulty,
    /// How many moles may be up at once (independent appearance chains).
    pub max_active: usize,
    /// How long the "hit" cue stays on a whacked mole.
    pub hit_cooldown_ms: u64,
    /// Countdown period.
    pub tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            duration_secs: DEFAULT_DURATION_SECS,
            difficulty: Difficulty::default(),
            max_active: 1,
            hit_cooldown_ms: DEFAULT_HIT_COOLDOWN_MS,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl GameConfig {
    pub fn with_slots(mut self, slot_count: usize) -> Self {
        self.slot_count = slot_count;
        self
    }

    pub fn with_duration(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_max_active(mut self, max_active: usize) -> Self {
        self.max_active = max_active;
        self
    }

    pub fn with_tick(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Reject boards a round cannot be played on.
    pub fn validate(&self) -> Result<()> {
        if self.slot_count == 0 {
            return Err(GameError::InvalidConfiguration(
                "board has no slots".to_string(),
            ));
        }
        if self.max_active == 0 || self.max_active > self.slot_count {
            return Err(GameError::InvalidConfiguration(format!(
                "max_active must be within 1..={}, got {}",
                self.slot_count, self.max_active
            )));
        }
        if self.duration_secs == 0 {
            return Err(GameError::InvalidConfiguration(
                "round duration must be at least one tick".to_string(),
            ));
        }
        if self.tick_ms == 0 {
            return Err(GameError::InvalidConfiguration(
                "tick period must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
