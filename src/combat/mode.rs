//! Combat view modes and menu state

use serde::{Deserialize, Serialize};

/// What the combat view is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    NextRound,
    MonsterAdvances,
    MonsterAttack,
    MonsterSpell,
    Infiltration,
    WaitsForOpening,
    MonstersAffected,
    SelectOption,
    CharAttacks,
    NoEffect,
    SpellResult,
    MonsterFlees,
    MonsterWanders,
    DefeatedMonsters,
}

impl Mode {
    /// Modes during which a monster is highlighted as the actor
    pub fn is_monster_turn(&self) -> bool {
        matches!(
            self,
            Mode::MonsterAdvances | Mode::MonsterAttack | Mode::MonsterSpell
        )
    }

    /// Seconds the mode's reveal stays up before its timeout runs.
    /// `None` for modes that wait on input or on their own message.
    pub fn reveal_seconds(&self) -> Option<u32> {
        match self {
            Mode::NextRound => Some(1),
            Mode::MonsterAdvances
            | Mode::MonsterAttack
            | Mode::MonsterSpell
            | Mode::WaitsForOpening
            | Mode::MonstersAffected
            | Mode::MonsterFlees
            | Mode::MonsterWanders => Some(2),
            Mode::Infiltration | Mode::CharAttacks | Mode::NoEffect | Mode::DefeatedMonsters => {
                Some(3)
            }
            Mode::SelectOption | Mode::SpellResult => None,
        }
    }
}

/// Sub-selection pending in the option menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectedOption {
    #[default]
    None,
    Fight,
    Shoot,
    Exchange,
    Delay,
    Cast,
}

/// Per-round bias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handicap {
    #[default]
    Even,
    /// Party favoured by the delta
    Party(u8),
    /// Monsters favoured by the delta
    Monster(u8),
}

impl Handicap {
    /// Compare the two sides' rolls
    pub fn from_rolls(party: u32, monster: u32) -> Self {
        match party.cmp(&monster) {
            std::cmp::Ordering::Equal => Handicap::Even,
            std::cmp::Ordering::Greater => Handicap::Party((party - monster).min(255) as u8),
            std::cmp::Ordering::Less => Handicap::Monster((monster - party).min(255) as u8),
        }
    }

    /// Initiative bias for the party side
    pub fn party_bias(&self) -> i32 {
        match self {
            Handicap::Party(delta) => i32::from(*delta),
            _ => 0,
        }
    }

    /// Initiative bias for the monster side
    pub fn monster_bias(&self) -> i32 {
        match self {
            Handicap::Monster(delta) => i32::from(*delta),
            _ => 0,
        }
    }
}

/// A staged line of text. Lines sharing `y` are revealed one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLine {
    pub x: u16,
    pub y: u16,
    pub text: String,
}

impl ResultLine {
    pub fn new(x: u16, y: u16, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// How a combat ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    Victory,
    Retreated,
    PartyDefeated,
}
