//! Attack and damage resolution
//!
//! Handles:
//! - To-hit rolls (natural 20 always hits, natural 1 always misses)
//! - Multi-attack outcomes (attempts, hits, displayed damage)
//! - Monster touch effects, which can change the damage dealt
//! - Applying damage to characters and monsters
//! - Attack report text

use rand::Rng;

use super::dice::{roll_die, DiceRoll};
use super::monster::{Monster, TouchEffect};
use crate::party::{Character, Condition};
use crate::ui::strings::{format, Arg};
use crate::ui::StringTable;

/// Base armour value added to a target's armour class
const BASE_DEFENSE: i32 = 10;

/// d20 + level/2 at or above this resists a touch effect
const TOUCH_SAVE: i32 = 18;

/// Attack reports shorter than this get " OF DAMAGE" appended
const SHORT_REPORT: usize = 30;

/// Result of a volley of attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackOutcome {
    /// Times attacked
    pub attempts: u32,
    /// Times hit
    pub hits: u32,
    /// Damage shown to the player. Zero with hits means no effect, not a miss.
    pub damage: i32,
}

/// Whether a single d20 roll hits
pub fn attack_hits(roll: u32, to_hit: i32, target_ac: i32) -> bool {
    match roll {
        20 => true,
        1 => false,
        _ => roll as i32 + to_hit >= BASE_DEFENSE + target_ac,
    }
}

/// Roll `attempts` attacks and total the damage of those that land
pub fn roll_attacks<R: Rng + ?Sized>(
    rng: &mut R,
    attempts: u32,
    to_hit: i32,
    target_ac: i32,
    dice: &DiceRoll,
) -> AttackOutcome {
    let mut outcome = AttackOutcome {
        attempts,
        ..Default::default()
    };
    for _ in 0..attempts {
        if attack_hits(roll_die(rng, 20), to_hit, target_ac) {
            outcome.hits += 1;
            outcome.damage += dice.roll(rng);
        }
    }
    outcome
}

/// What damage did to a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageTaken {
    Hurt,
    Unconscious,
    Killed,
}

/// Subtract damage from a character. Exactly zero hit points knocks the
/// character out, anything below kills.
pub fn apply_damage_to_character(target: &mut Character, damage: i32) -> DamageTaken {
    if target.condition.contains(Condition::DEAD) {
        return DamageTaken::Killed;
    }
    let remaining = target.hp - damage;
    if remaining > 0 {
        target.hp = remaining;
        DamageTaken::Hurt
    } else if remaining == 0 {
        target.hp = 0;
        target.condition |= Condition::UNCONSCIOUS;
        DamageTaken::Unconscious
    } else {
        target.hp = 0;
        target.condition = Condition::DEAD;
        DamageTaken::Killed
    }
}

/// Report line for a character going down
pub fn damage_line(taken: DamageTaken, name: &str, strings: &dyn StringTable) -> Option<String> {
    let key = match taken {
        DamageTaken::Hurt => return None,
        DamageTaken::Unconscious => "combat.unconscious",
        DamageTaken::Killed => "combat.killed",
    };
    Some(format(&strings.get(key), &[Arg::Str(name)]))
}

/// Resolve a monster's touch effect against a character that was hit.
///
/// May adjust `damage`. Returns the line to report, if anything happened.
pub fn resolve_touch<R: Rng + ?Sized>(
    rng: &mut R,
    touch: TouchEffect,
    target: &mut Character,
    damage: &mut i32,
    strings: &dyn StringTable,
) -> Option<String> {
    if touch == TouchEffect::None {
        return None;
    }
    let save = roll_die(rng, 20) as i32 + i32::from(target.level / 2);
    if save >= TOUCH_SAVE {
        return None;
    }

    let name = Arg::Str(&target.name);
    let line = match touch {
        TouchEffect::None => return None,
        TouchEffect::Poison => {
            target.condition |= Condition::POISONED;
            format(&strings.get("combat.touch.poison"), &[name])
        }
        TouchEffect::Paralyze => {
            target.condition |= Condition::PARALYZED;
            format(&strings.get("combat.touch.paralyze"), &[name])
        }
        TouchEffect::Sleep => {
            target.condition |= Condition::ASLEEP;
            *damage /= 2;
            format(&strings.get("combat.touch.sleep"), &[name])
        }
        TouchEffect::DrainSpellPoints => {
            target.sp = 0;
            format(&strings.get("combat.touch.drain"), &[name])
        }
        TouchEffect::Crush => {
            *damage *= 2;
            strings.get("combat.touch.crush")
        }
    };
    Some(line)
}

/// "ONCE AND MISSES" / "3 TIMES AND HITS 2 TIMES FOR 9 POINTS!"
pub fn attack_string(outcome: &AttackOutcome, strings: &dyn StringTable) -> String {
    let times = |n: u32| {
        if n == 1 {
            strings.get("combat.once")
        } else {
            format!("{} {}", n, strings.get("combat.times"))
        }
    };

    let mut line = times(outcome.attempts);
    line.push_str(&format!(" {} ", strings.get("combat.and")));

    if outcome.hits == 0 {
        line.push_str(&strings.get("combat.misses"));
        return line;
    }

    line.push_str(&strings.get("combat.hit"));
    if outcome.attempts > 1 {
        line.push(' ');
        line.push_str(&times(outcome.hits));
    }

    let unit = if outcome.damage == 1 {
        "combat.point"
    } else {
        "combat.points"
    };
    line.push_str(&format!(
        " {} {} {}",
        strings.get("combat.for"),
        outcome.damage,
        strings.get(unit)
    ));

    if line.chars().count() < SHORT_REPORT {
        line.push(' ');
        line.push_str(&strings.get("combat.of_damage"));
    } else {
        line.push('!');
    }
    line
}

/// Full report of a monster attacking a character.
///
/// Damage is applied here, after the touch effect had its say.
pub fn monster_attack<R: Rng + ?Sized>(
    rng: &mut R,
    monster: &Monster,
    target: &mut Character,
    strings: &dyn StringTable,
) -> Vec<String> {
    let verb = strings.get(&format!("combat.attack_types.{}", monster.attack_style));
    let mut lines = vec![format!("{} {} {}", monster.name, verb, target.name)];

    let to_hit = i32::from(monster.level);
    let outcome = roll_attacks(rng, monster.attacks, to_hit, target.ac, &monster.damage);
    lines.push(attack_string(&outcome, strings));

    if outcome.hits > 0 {
        // Blows wake a sleeper that is still in the fight
        if target.is_conscious() {
            target.condition.remove(Condition::ASLEEP);
        }

        let mut damage = outcome.damage;
        if let Some(line) = resolve_touch(rng, monster.touch, target, &mut damage, strings) {
            lines.push(line);
        }

        let taken = apply_damage_to_character(target, damage);
        if let Some(line) = damage_line(taken, &target.name, strings) {
            lines.push(line);
        }
    }
    lines
}

/// A character's attack on a monster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharAttack {
    pub outcome: AttackOutcome,
    /// The weapon cannot hurt this monster
    pub no_effect: bool,
    pub killed: bool,
}

/// Resolve a fight or shoot action
pub fn character_attack<R: Rng + ?Sized>(
    rng: &mut R,
    attacker: &Character,
    monster: &mut Monster,
    shooting: bool,
) -> CharAttack {
    if monster.immune_to_weapons {
        return CharAttack {
            outcome: AttackOutcome::default(),
            no_effect: true,
            killed: false,
        };
    }

    let (attempts, dice) = match (shooting, attacker.missile) {
        (true, Some(missile)) => (1, missile),
        _ => (attacker.attacks_per_round(), attacker.melee),
    };
    let to_hit = attacker.accuracy + i32::from(attacker.level);
    let outcome = roll_attacks(rng, attempts, to_hit, monster.ac, &dice);
    let killed = monster.take_damage(outcome.damage);

    CharAttack {
        outcome,
        no_effect: false,
        killed,
    }
}
