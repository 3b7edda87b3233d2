//! Monster status bitfield
//!
//! Monsters carry a one-byte status. Each bit is a condition, ordered from
//! least to most severe:
//! - bit 0 paralyzed .. bit 7 afraid
//! - the whole byte set (`0xFF`) is the dedicated dead flag
//!
//! Only one status is ever reported: the dead flag wins, otherwise the
//! lowest set bit.

use serde::{Deserialize, Serialize};

/// Value of a slain monster's status byte
pub const STATUS_DEAD: u8 = 0xFF;

pub const STATUS_PARALYZED: u8 = 1 << 0;
pub const STATUS_WEBBED: u8 = 1 << 1;
pub const STATUS_HELD: u8 = 1 << 2;
pub const STATUS_ASLEEP: u8 = 1 << 3;
pub const STATUS_MINDLESS: u8 = 1 << 4;
pub const STATUS_SILENCED: u8 = 1 << 5;
pub const STATUS_BLINDED: u8 = 1 << 6;
pub const STATUS_AFRAID: u8 = 1 << 7;

/// Reported monster status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterStatus {
    Paralyzed,
    Webbed,
    Held,
    Asleep,
    Mindless,
    Silenced,
    Blinded,
    Afraid,
    Dead,
    /// No status bits but below default hit points
    Wounded,
}

impl MonsterStatus {
    const BY_BIT: [MonsterStatus; 8] = [
        MonsterStatus::Paralyzed,
        MonsterStatus::Webbed,
        MonsterStatus::Held,
        MonsterStatus::Asleep,
        MonsterStatus::Mindless,
        MonsterStatus::Silenced,
        MonsterStatus::Blinded,
        MonsterStatus::Afraid,
    ];

    /// String table key for the status label
    pub fn key(&self) -> &'static str {
        match self {
            MonsterStatus::Paralyzed => "combat.status.paralyzed",
            MonsterStatus::Webbed => "combat.status.webbed",
            MonsterStatus::Held => "combat.status.held",
            MonsterStatus::Asleep => "combat.status.asleep",
            MonsterStatus::Mindless => "combat.status.mindless",
            MonsterStatus::Silenced => "combat.status.silenced",
            MonsterStatus::Blinded => "combat.status.blinded",
            MonsterStatus::Afraid => "combat.status.afraid",
            MonsterStatus::Dead => "combat.status.dead",
            MonsterStatus::Wounded => "combat.status.wounded",
        }
    }
}

/// Decode a status byte into the single status shown for a monster.
///
/// Zero bits fall through to the wounded check before any scan, so the
/// scan always finds a bit within the eight positions.
pub fn decode_status(bits: u8, hp: i32, default_hp: i32) -> Option<MonsterStatus> {
    if bits == STATUS_DEAD {
        return Some(MonsterStatus::Dead);
    }
    if bits == 0 {
        return (hp != default_hp).then_some(MonsterStatus::Wounded);
    }
    (0..8)
        .find(|bit| bits & (1 << bit) != 0)
        .map(|bit| MonsterStatus::BY_BIT[bit])
}

/// Whether a monster with these status bits can take its turn
pub fn can_act(bits: u8) -> bool {
    bits != STATUS_DEAD
        && bits & (STATUS_PARALYZED | STATUS_WEBBED | STATUS_HELD | STATUS_ASLEEP) == 0
}

/// Status bits a spell effect can wear off at upkeep
pub const OVERCOMABLE: u8 =
    STATUS_PARALYZED | STATUS_WEBBED | STATUS_HELD | STATUS_ASLEEP | STATUS_SILENCED | STATUS_BLINDED;
