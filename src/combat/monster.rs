//! Monsters and encounters
//!
//! An `Encounter` owns the monster roster for one fight. The combat session
//! refers to monsters by roster index only.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::dice::DiceRoll;
use super::spells::MonsterSpell;
use super::status::{self, MonsterStatus, STATUS_DEAD};
use crate::config::{load_toml, LoadError};

/// Rider effect of a monster's hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchEffect {
    #[default]
    None,
    Poison,
    Paralyze,
    /// Puts the target to sleep; halves the blow
    Sleep,
    /// Drains all spell points
    DrainSpellPoints,
    /// Doubles the blow
    Crush,
}

/// A monster in an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monster {
    pub name: String,
    pub hp: i32,
    /// Full hit points; 0 in data files means "same as hp"
    pub default_hp: i32,
    pub level: u8,
    pub ac: i32,
    pub speed: i32,
    /// Attacks per turn
    pub attacks: u32,
    pub damage: DiceRoll,
    /// Index into the attack verb table ("BITES", "CLAWS AT", ...)
    pub attack_style: u8,
    pub experience: u32,
    /// Status bitfield, see `combat::status`
    pub status: u8,
    pub spell: Option<MonsterSpell>,
    /// Percent chance to cast instead of attacking
    pub spell_chance: u8,
    /// Steps from the back rank into the front rank
    pub advances: bool,
    /// Slips past the front rank to strike the back of the party
    pub infiltrates: bool,
    pub regenerates: bool,
    pub resists_spells: bool,
    pub immune_to_weapons: bool,
    pub wander_chance: u8,
    pub flee_chance: u8,
    pub touch: TouchEffect,
    /// Ran away this combat
    #[serde(skip)]
    pub fled: bool,
}

impl Default for Monster {
    fn default() -> Self {
        Self {
            name: String::new(),
            hp: 4,
            default_hp: 0,
            level: 1,
            ac: 0,
            speed: 8,
            attacks: 1,
            damage: DiceRoll::new(1, 4, 0),
            attack_style: 0,
            experience: 10,
            status: 0,
            spell: None,
            spell_chance: 0,
            advances: false,
            infiltrates: false,
            regenerates: false,
            resists_spells: false,
            immune_to_weapons: false,
            wander_chance: 0,
            flee_chance: 0,
            touch: TouchEffect::None,
            fled: false,
        }
    }
}

impl Monster {
    /// Create a monster at full health
    pub fn new(name: &str, hp: i32) -> Self {
        Self {
            name: name.to_string(),
            hp,
            default_hp: hp,
            ..Default::default()
        }
    }

    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_damage(mut self, damage: DiceRoll) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_attack_style(mut self, style: u8) -> Self {
        self.attack_style = style;
        self
    }

    pub fn with_spell(mut self, spell: MonsterSpell, chance: u8) -> Self {
        self.spell = Some(spell);
        self.spell_chance = chance;
        self
    }

    pub fn with_touch(mut self, touch: TouchEffect) -> Self {
        self.touch = touch;
        self
    }

    /// Whether the status byte holds the dead flag
    pub fn is_dead(&self) -> bool {
        self.status == STATUS_DEAD
    }

    /// Whether the monster can take its turn
    pub fn can_act(&self) -> bool {
        status::can_act(self.status)
    }

    /// Status shown next to the monster's name
    pub fn display_status(&self) -> Option<MonsterStatus> {
        status::decode_status(self.status, self.hp, self.default_hp)
    }

    /// Take damage. Returns true if this killed the monster.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.hp = (self.hp - amount).max(0);
        if self.hp == 0 {
            self.status = STATUS_DEAD;
            return true;
        }
        false
    }

    /// Fill in derived defaults after loading
    fn normalize(&mut self) {
        if self.default_hp == 0 {
            self.default_hp = self.hp;
        }
        self.attacks = self.attacks.max(1);
    }
}

/// The monsters of one fight
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub monsters: Vec<Monster>,
    /// Front rank size override for this encounter
    pub attackers_count: Option<usize>,
}

impl Encounter {
    pub fn new(monsters: Vec<Monster>) -> Self {
        let mut encounter = Self {
            monsters,
            attackers_count: None,
        };
        encounter.monsters.iter_mut().for_each(Monster::normalize);
        encounter
    }

    /// Load an encounter from a TOML file with `[[monsters]]` tables
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let mut encounter: Encounter = load_toml(path)?;
        encounter.monsters.iter_mut().for_each(Monster::normalize);
        Ok(encounter)
    }

    /// A mixed band of monsters
    pub fn sample() -> Self {
        Self::new(vec![
            Monster::new("ORC", 9)
                .with_experience(20)
                .with_damage(DiceRoll::new(1, 6, 0))
                .with_attack_style(5),
            Monster::new("GIANT SPIDER", 7)
                .with_experience(25)
                .with_speed(12)
                .with_attack_style(1)
                .with_touch(TouchEffect::Poison),
            Monster {
                advances: true,
                ..Monster::new("GOBLIN", 5).with_experience(12).with_attack_style(2)
            },
            Monster {
                infiltrates: true,
                ..Monster::new("THIEF", 6).with_experience(15).with_speed(14)
            },
            Monster::new("KOBOLD SHAMAN", 6)
                .with_experience(30)
                .with_spell(MonsterSpell::FireBlast, 40),
        ])
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}
