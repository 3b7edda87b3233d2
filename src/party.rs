//! Party roster
//!
//! Characters that take part in combat. The roster is handed to a combat
//! session for the duration of a fight and handed back afterwards.

use std::path::Path;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::combat::{DiceRoll, SpellId};
use crate::config::{load_toml, LoadError};

bitflags! {
    /// Character condition bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Condition: u8 {
        const ASLEEP = 0x01;
        const PARALYZED = 0x02;
        const POISONED = 0x04;
        const DISEASED = 0x08;
        const SILENCED = 0x10;
        const BLINDED = 0x20;
        const UNCONSCIOUS = 0x40;
        const DEAD = 0x80;

        /// Conditions that take a character out of the fight for good
        const BAD = Self::UNCONSCIOUS.bits() | Self::DEAD.bits();
    }
}

/// Character classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    #[default]
    Knight,
    Paladin,
    Archer,
    Cleric,
    Sorcerer,
    Robber,
}

/// A party member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: u8,
    pub hp: i32,
    pub max_hp: i32,
    /// Spell points
    pub sp: i32,
    pub max_sp: i32,
    /// Armour class, higher is harder to hit
    pub ac: i32,
    pub speed: i32,
    /// To-hit bonus
    pub accuracy: i32,
    /// Melee weapon damage
    pub melee: DiceRoll,
    /// Missile weapon damage, if one is carried
    pub missile: Option<DiceRoll>,
    pub condition: Condition,
    /// Combat spells known
    pub spells: Vec<SpellId>,
    pub experience: u32,
    /// Whether the character may melee this round (front rank)
    #[serde(skip)]
    pub can_attack: bool,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: String::new(),
            class: CharacterClass::default(),
            level: 1,
            hp: 10,
            max_hp: 10,
            sp: 0,
            max_sp: 0,
            ac: 0,
            speed: 10,
            accuracy: 0,
            melee: DiceRoll::default(),
            missile: None,
            condition: Condition::empty(),
            spells: Vec::new(),
            experience: 0,
            can_attack: false,
        }
    }
}

impl Character {
    /// Create a character with default stats
    pub fn new(name: &str, class: CharacterClass) -> Self {
        Self {
            name: name.to_string(),
            class,
            ..Default::default()
        }
    }

    /// Set current and maximum hit points
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self.max_hp = hp;
        self
    }

    /// Set current and maximum spell points
    pub fn with_sp(mut self, sp: i32) -> Self {
        self.sp = sp;
        self.max_sp = sp;
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_melee(mut self, melee: DiceRoll) -> Self {
        self.melee = melee;
        self
    }

    pub fn with_missile(mut self, missile: DiceRoll) -> Self {
        self.missile = Some(missile);
        self
    }

    pub fn with_spells(mut self, spells: &[SpellId]) -> Self {
        self.spells = spells.to_vec();
        self
    }

    /// Neither unconscious nor dead
    pub fn is_conscious(&self) -> bool {
        !self.condition.intersects(Condition::BAD)
    }

    /// Able to take a turn
    pub fn can_act(&self) -> bool {
        self.is_conscious()
            && !self
                .condition
                .intersects(Condition::ASLEEP | Condition::PARALYZED)
    }

    /// Swings per fight action
    pub fn attacks_per_round(&self) -> u32 {
        1 + u32::from(self.level / 5)
    }
}

/// Ordered party roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub members: Vec<Character>,
}

impl Party {
    pub fn new(members: Vec<Character>) -> Self {
        Self { members }
    }

    /// Load a roster from a TOML file with `[[members]]` tables
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        load_toml(path)
    }

    /// A small adventuring party
    pub fn sample() -> Self {
        Self::new(vec![
            Character::new("GALA", CharacterClass::Knight)
                .with_hp(24)
                .with_level(3)
                .with_melee(DiceRoll::new(1, 8, 1)),
            Character::new("BRON", CharacterClass::Paladin)
                .with_hp(20)
                .with_sp(4)
                .with_level(2)
                .with_melee(DiceRoll::new(1, 8, 0))
                .with_spells(&[SpellId::CureWounds]),
            Character::new("SYLA", CharacterClass::Archer)
                .with_hp(14)
                .with_level(2)
                .with_speed(13)
                .with_melee(DiceRoll::new(1, 6, 0))
                .with_missile(DiceRoll::new(1, 6, 1)),
            Character::new("MERL", CharacterClass::Sorcerer)
                .with_hp(8)
                .with_sp(8)
                .with_level(3)
                .with_melee(DiceRoll::new(1, 4, 0))
                .with_spells(&[SpellId::Sleep, SpellId::FlameArrow, SpellId::Silence]),
        ])
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Character> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Character> {
        self.members.get_mut(index)
    }

    /// Whether any member is still standing
    pub fn any_conscious(&self) -> bool {
        self.members.iter().any(Character::is_conscious)
    }
}
