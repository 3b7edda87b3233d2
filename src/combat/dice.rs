//! Dice rolling system
//!
//! Parses and rolls dice notation like "2d6+3", "1d20", "4d6-2".
//! Rolls take the caller's RNG so a seeded combat replays identically.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dice notation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("missing 'd' in dice notation: {0}")]
    MissingSeparator(String),

    #[error("invalid dice count: {0}")]
    InvalidCount(String),

    #[error("dice count must be at least 1")]
    ZeroCount,

    #[error("invalid die sides: {0}")]
    InvalidSides(String),

    #[error("die sides must be at least 1")]
    ZeroSides,

    #[error("invalid modifier: {0}")]
    InvalidModifier(String),
}

/// A parsed dice roll specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier to add/subtract
    pub modifier: i32,
}

impl DiceRoll {
    /// Create a new dice roll
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Roll the dice. Never below zero.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let sum: i64 = (0..self.count)
            .map(|_| i64::from(roll_die(rng, self.sides)))
            .sum();
        (sum + i64::from(self.modifier)).clamp(0, i64::from(i32::MAX)) as i32
    }

    /// Get the minimum possible result
    pub fn min(&self) -> i32 {
        (self.count as i32 + self.modifier).max(0)
    }

    /// Get the maximum possible result
    pub fn max(&self) -> i32 {
        (self.count * self.sides) as i32 + self.modifier
    }
}

impl Default for DiceRoll {
    /// Bare hands
    fn default() -> Self {
        Self::new(1, 2, 0)
    }
}

impl FromStr for DiceRoll {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dice(s)
    }
}

impl TryFrom<String> for DiceRoll {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_dice(&value)
    }
}

impl From<DiceRoll> for String {
    fn from(roll: DiceRoll) -> Self {
        roll.to_string()
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.modifier {
            m if m > 0 => write!(f, "{}d{}+{}", self.count, self.sides, m),
            m if m < 0 => write!(f, "{}d{}{}", self.count, self.sides, m),
            _ => write!(f, "{}d{}", self.count, self.sides),
        }
    }
}

/// Parse a dice notation string like "2d6+3"
pub fn parse_dice(notation: &str) -> Result<DiceRoll, DiceError> {
    let notation = notation.trim().to_lowercase();

    let (count_str, rest) = notation
        .split_once('d')
        .ok_or_else(|| DiceError::MissingSeparator(notation.clone()))?;

    // "d6" means "1d6"
    let count: u32 = if count_str.is_empty() {
        1
    } else {
        count_str
            .parse()
            .map_err(|_| DiceError::InvalidCount(count_str.to_string()))?
    };
    if count == 0 {
        return Err(DiceError::ZeroCount);
    }

    let (sides_str, modifier) = match rest.find(['+', '-']) {
        Some(pos) => {
            let mod_str = &rest[pos..];
            let modifier: i32 = mod_str
                .trim_start_matches('+')
                .parse()
                .map_err(|_| DiceError::InvalidModifier(mod_str.to_string()))?;
            (&rest[..pos], modifier)
        }
        None => (rest, 0),
    };

    let sides: u32 = sides_str
        .parse()
        .map_err(|_| DiceError::InvalidSides(sides_str.to_string()))?;
    if sides == 0 {
        return Err(DiceError::ZeroSides);
    }

    Ok(DiceRoll {
        count,
        sides,
        modifier,
    })
}

/// Roll one die, 1..=sides
pub fn roll_die<R: Rng + ?Sized>(rng: &mut R, sides: u32) -> u32 {
    rng.random_range(1..=sides.max(1))
}

/// Percentile check: true with `chance` percent probability
pub fn percent_chance<R: Rng + ?Sized>(rng: &mut R, chance: u8) -> bool {
    roll_die(rng, 100) <= u32::from(chance)
}
