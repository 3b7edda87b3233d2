//! Combat view
//!
//! Turn-based party vs monsters combat:
//! - Dice rolling (e.g., "2d6+3") against a seeded RNG
//! - Monster status bits and their display
//! - Attack, touch effect and damage resolution
//! - Combat spells for characters and monsters
//! - The combat session: modes, timed reveals, option menu, turn order

mod damage;
mod dice;
mod menu;
mod mode;
mod monster;
mod session;
mod spells;
pub mod status;
mod turns;

pub use damage::{
    apply_damage_to_character, attack_string, character_attack, monster_attack, resolve_touch,
    roll_attacks, AttackOutcome, CharAttack, DamageTaken,
};
pub use dice::{parse_dice, percent_chance, roll_die, DiceError, DiceRoll};
pub use mode::{CombatOutcome, Handicap, Mode, ResultLine, SelectedOption};
pub use monster::{Encounter, Monster, TouchEffect};
pub use session::{
    AllowedActions, Collaborators, CombatSession, CombatSnapshot, Combatant, MonsterSnapshot,
    SessionError, GAME_TOPIC, MAX_PARTY_SIZE,
};
pub use spells::{
    cast_spell, monster_cast, Continuation, MonsterSpell, SpellId, SpellResultMessage,
    MONSTER_SPELL_HEADER_Y, MONSTER_SPELL_TARGET_Y,
};
pub use status::{decode_status, MonsterStatus, STATUS_DEAD};
