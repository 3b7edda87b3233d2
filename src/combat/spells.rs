//! Combat spells
//!
//! Character spells resolve into a `SpellResultMessage` shown under the
//! combat screen. Monster spells resolve into staged result lines: a header
//! on line 20 and one line per target sharing line 21, revealed one at a
//! time.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::damage::{apply_damage_to_character, damage_line, DamageTaken};
use super::dice::{percent_chance, roll_die, DiceRoll};
use super::mode::ResultLine;
use super::monster::Monster;
use super::status::{STATUS_ASLEEP, STATUS_SILENCED};
use crate::party::{Condition, Party};
use crate::ui::strings::{format, Arg};
use crate::ui::StringTable;

/// Lines available under the combat screen for a spell result
const RESULT_LINES: usize = 5;

/// Line of a monster spell's header
pub const MONSTER_SPELL_HEADER_Y: u16 = 20;
/// Line shared by a monster spell's per-target results
pub const MONSTER_SPELL_TARGET_Y: u16 = 21;

/// Percent chance a spell-resistant monster shrugs off a spell
const RESIST_CHANCE: u8 = 50;

/// d20 + level/2 at or above this resists a monster spell
const SPELL_SAVE: i32 = 18;

/// Spells a character can cast in combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellId {
    /// Puts the front rank to sleep
    Sleep,
    /// Burns the lead monster
    FlameArrow,
    /// Heals the most wounded party member
    CureWounds,
    /// Wakes the whole party
    Awaken,
    /// Silences the lead monster
    Silence,
}

impl SpellId {
    /// Spell point cost
    pub fn cost(&self) -> i32 {
        match self {
            SpellId::Sleep | SpellId::CureWounds | SpellId::Awaken => 1,
            SpellId::FlameArrow | SpellId::Silence => 2,
        }
    }

    /// String table key of the spell's name
    pub fn name_key(&self) -> &'static str {
        match self {
            SpellId::Sleep => "spells.sleep",
            SpellId::FlameArrow => "spells.flame_arrow",
            SpellId::CureWounds => "spells.cure_wounds",
            SpellId::Awaken => "spells.awaken",
            SpellId::Silence => "spells.silence",
        }
    }
}

/// Spells a monster can cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterSpell {
    /// Burns every conscious party member
    FireBlast,
    /// Every conscious party member must save or sleep
    MassSleep,
    /// One party member loses all spell points
    Drain,
}

impl MonsterSpell {
    pub fn name_key(&self) -> &'static str {
        match self {
            MonsterSpell::FireBlast => "spells.fire_blast",
            MonsterSpell::MassSleep => "spells.mass_sleep",
            MonsterSpell::Drain => "spells.drain",
        }
    }
}

/// What happens once a spell result has been shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    /// The acting character is done
    #[default]
    EndTurn,
    /// Back to the option menu for the same character
    Resume,
}

/// Result text shown under the combat screen.
///
/// Line `y` values are offsets from line 20.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellResultMessage {
    pub lines: Vec<ResultLine>,
    /// Seconds to show the result; 0 waits for a key
    pub delay_seconds: u32,
    pub continuation: Continuation,
}

impl SpellResultMessage {
    /// Stack `texts` from the first result line down
    pub fn new(texts: Vec<String>, delay_seconds: u32, continuation: Continuation) -> Self {
        let lines = texts
            .into_iter()
            .take(RESULT_LINES)
            .enumerate()
            .map(|(y, text)| ResultLine::new(0, y as u16, text))
            .collect();
        Self {
            lines,
            delay_seconds,
            continuation,
        }
    }

    /// A single line at column `x` on the second result line
    pub fn single(x: u16, text: impl Into<String>, delay_seconds: u32) -> Self {
        Self {
            lines: vec![ResultLine::new(x, 1, text)],
            delay_seconds,
            continuation: Continuation::EndTurn,
        }
    }
}

fn resists<R: Rng + ?Sized>(rng: &mut R, monster: &Monster) -> bool {
    monster.resists_spells && percent_chance(rng, RESIST_CHANCE)
}

/// Cast a character spell.
///
/// `targets` are indices into `monsters` the caster can reach, lead first.
/// Spell points are the caller's concern.
pub fn cast_spell<R: Rng + ?Sized>(
    rng: &mut R,
    spell: SpellId,
    caster: usize,
    party: &mut Party,
    monsters: &mut [Monster],
    targets: &[usize],
    strings: &dyn StringTable,
) -> Vec<String> {
    let (caster_name, caster_level) = match party.get(caster) {
        Some(c) => (c.name.clone(), c.level),
        None => return Vec::new(),
    };
    let spell_name = strings.get(spell.name_key());
    let mut lines = vec![format(
        &strings.get("combat.spell.casts"),
        &[Arg::Str(&caster_name), Arg::Str(&spell_name)],
    )];

    match spell {
        SpellId::Sleep => {
            for &idx in targets {
                let Some(monster) = monsters.get_mut(idx) else {
                    continue;
                };
                let key = if resists(rng, monster) {
                    "combat.spell.resists"
                } else {
                    monster.status |= STATUS_ASLEEP;
                    "combat.spell.falls_asleep"
                };
                lines.push(format(&strings.get(key), &[Arg::Str(&monster.name)]));
            }
        }
        SpellId::FlameArrow => {
            if let Some(monster) = targets.first().and_then(|&i| monsters.get_mut(i)) {
                if resists(rng, monster) {
                    lines.push(format(
                        &strings.get("combat.spell.resists"),
                        &[Arg::Str(&monster.name)],
                    ));
                } else {
                    let damage = DiceRoll::new(1, 6, i32::from(caster_level)).roll(rng);
                    let killed = monster.take_damage(damage);
                    lines.push(format(
                        &strings.get("combat.spell.takes_damage"),
                        &[Arg::Str(&monster.name), Arg::Int(i64::from(damage))],
                    ));
                    if killed {
                        lines.push(format!(
                            "{} {}",
                            monster.name,
                            strings.get("combat.goes_down")
                        ));
                    }
                }
            }
        }
        SpellId::CureWounds => {
            let patient = party
                .members
                .iter_mut()
                .filter(|c| c.is_conscious())
                .max_by_key(|c| c.max_hp - c.hp);
            if let Some(patient) = patient {
                let healed = (roll_die(rng, 8) as i32).min(patient.max_hp - patient.hp);
                patient.hp += healed;
                lines.push(format(
                    &strings.get("combat.spell.healed"),
                    &[Arg::Str(&patient.name), Arg::Int(i64::from(healed))],
                ));
            }
        }
        SpellId::Awaken => {
            for member in party.members.iter_mut().filter(|c| c.is_conscious()) {
                member.condition.remove(Condition::ASLEEP);
            }
            lines.push(strings.get("combat.spell.awakened"));
        }
        SpellId::Silence => {
            if let Some(monster) = targets.first().and_then(|&i| monsters.get_mut(i)) {
                let key = if resists(rng, monster) {
                    "combat.spell.resists"
                } else {
                    monster.status |= STATUS_SILENCED;
                    "combat.spell.silenced"
                };
                lines.push(format(&strings.get(key), &[Arg::Str(&monster.name)]));
            }
        }
    }

    if lines.len() == 1 {
        lines.push(strings.get("combat.spell.no_effect"));
    }
    lines
}

/// Cast a monster spell at the party
pub fn monster_cast<R: Rng + ?Sized>(
    rng: &mut R,
    spell: MonsterSpell,
    caster_name: &str,
    party: &mut Party,
    strings: &dyn StringTable,
) -> Vec<ResultLine> {
    let spell_name = strings.get(spell.name_key());
    let mut lines = vec![ResultLine::new(
        0,
        MONSTER_SPELL_HEADER_Y,
        format(
            &strings.get("combat.spell.casts"),
            &[Arg::Str(caster_name), Arg::Str(&spell_name)],
        ),
    )];
    let target_line = |text: String| ResultLine::new(0, MONSTER_SPELL_TARGET_Y, text);

    match spell {
        MonsterSpell::FireBlast => {
            for member in party.members.iter_mut().filter(|c| c.is_conscious()) {
                let damage = DiceRoll::new(2, 4, 0).roll(rng);
                let taken = apply_damage_to_character(member, damage);
                let text = match taken {
                    DamageTaken::Hurt => format(
                        &strings.get("combat.spell.takes_damage"),
                        &[Arg::Str(&member.name), Arg::Int(i64::from(damage))],
                    ),
                    _ => damage_line(taken, &member.name, strings).unwrap_or_default(),
                };
                lines.push(target_line(text));
            }
        }
        MonsterSpell::MassSleep => {
            for member in party.members.iter_mut().filter(|c| c.is_conscious()) {
                let save = roll_die(rng, 20) as i32 + i32::from(member.level / 2);
                let key = if save >= SPELL_SAVE {
                    "combat.spell.resists"
                } else {
                    member.condition |= Condition::ASLEEP;
                    "combat.spell.falls_asleep"
                };
                lines.push(target_line(format(
                    &strings.get(key),
                    &[Arg::Str(&member.name)],
                )));
            }
        }
        MonsterSpell::Drain => {
            let candidates: Vec<usize> = party
                .members
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_conscious())
                .map(|(i, _)| i)
                .collect();
            if let Some(member) = candidates
                .choose(rng)
                .and_then(|&i| party.members.get_mut(i))
            {
                member.sp = 0;
                lines.push(target_line(format(
                    &strings.get("combat.spell.drained"),
                    &[Arg::Str(&member.name)],
                )));
            }
        }
    }

    if lines.len() == 1 {
        lines.push(target_line(strings.get("combat.spell.no_effect")));
    }
    lines
}
