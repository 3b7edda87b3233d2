//! Turn sequencer
//!
//! A round runs:
//! - round number and handicap roll (`NextRound`)
//! - advance phase: one back-rank monster may step forward
//! - upkeep: regeneration and monsters shaking off spells
//! - the turn queue, monsters and characters by initiative
//!
//! After each resolved action dead and fled monsters are purged from the
//! alive list, keeping the order of the rest.

use rand::seq::IndexedRandom;
use tracing::{debug, info};

use super::damage::monster_attack;
use super::dice::{percent_chance, roll_die};
use super::mode::{CombatOutcome, Handicap, Mode};
use super::session::{CombatSession, Combatant, GAME_TOPIC};
use super::spells::monster_cast;
use super::status::{OVERCOMABLE, STATUS_DEAD, STATUS_SILENCED};
use crate::ui::GameMessage;

impl CombatSession {
    /// Mark the front rank as able to melee
    pub(super) fn setup_can_attacks(&mut self) {
        for (pos, &member) in self.order.iter().enumerate() {
            let c = &mut self.party.members[member];
            c.can_attack = pos < self.rules.front_rank && c.is_conscious();
        }
    }

    pub(super) fn next_round(&mut self) {
        self.round_num += 1;
        let die = self.rules.handicap_die.max(1);
        let party_roll = roll_die(&mut self.rng, die);
        let monster_roll = roll_die(&mut self.rng, die);
        self.handicap = Handicap::from_rolls(party_roll, monster_roll);
        debug!("round {} handicap {:?}", self.round_num, self.handicap);

        self.turn_queue.clear();
        self.setup_can_attacks();
        self.set_mode(Mode::NextRound);
    }

    /// Advance phase
    pub(super) fn next_round2(&mut self) {
        let front = self.attackers_count;
        if self.remaining.len() > front {
            let advancer = (front..self.remaining.len()).find(|&slot| {
                let m = &self.encounter.monsters[self.remaining[slot]];
                m.advances && m.can_act()
            });
            if let Some(slot) = advancer {
                let roster = self.remaining.remove(slot);
                self.remaining.insert(front - 1, roster);
                debug!("{} advances", self.encounter.monsters[roster].name);

                self.acting_monster = Some(roster);
                self.active_monster = Some(front - 1);
                self.set_mode(Mode::MonsterAdvances);
                return;
            }
        }

        self.next_round3();
    }

    /// Upkeep, then the round's turns
    pub(super) fn next_round3(&mut self) {
        self.monsters_regenerate = false;
        self.monsters_resist_spells = false;

        for &roster in &self.remaining {
            let m = &mut self.encounter.monsters[roster];
            if m.is_dead() {
                continue;
            }
            if m.regenerates && m.hp < m.default_hp {
                m.hp = (m.hp + i32::from(m.level) + 1).min(m.default_hp);
                self.monsters_regenerate = true;
            }
            if m.status & OVERCOMABLE != 0 {
                let chance = (20 + 5 * u32::from(m.level)).min(95) as u8;
                if percent_chance(&mut self.rng, chance) {
                    m.status &= !OVERCOMABLE;
                    self.monsters_resist_spells = true;
                }
            }
        }

        self.build_turn_queue();

        if self.monsters_regenerate || self.monsters_resist_spells {
            self.set_mode(Mode::MonstersAffected);
        } else {
            self.combat_loop();
        }
    }

    /// Order every alive monster and able character by speed plus the
    /// handicap bias of their side. Ties go to the monsters unless the
    /// party is favoured.
    pub(super) fn build_turn_queue(&mut self) {
        let party_first = matches!(self.handicap, Handicap::Party(_));
        let monster_bias = self.handicap.monster_bias();
        let party_bias = self.handicap.party_bias();

        let mut entries: Vec<(i32, Combatant)> = self
            .remaining
            .iter()
            .map(|&roster| {
                let speed = self.encounter.monsters[roster].speed;
                (speed + monster_bias, Combatant::Monster(roster))
            })
            .collect();
        entries.extend(self.order.iter().filter_map(|&member| {
            let c = &self.party.members[member];
            c.can_act()
                .then_some((c.speed + party_bias, Combatant::Character(member)))
        }));

        let side = |c: &Combatant| match (c, party_first) {
            (Combatant::Monster(_), false) | (Combatant::Character(_), true) => 0,
            _ => 1,
        };
        entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| side(&a.1).cmp(&side(&b.1))));

        self.turn_queue = entries.into_iter().map(|(_, c)| c).collect();
    }

    /// Hand control to the next actor, starting a new round when the
    /// queue runs dry
    pub(super) fn combat_loop(&mut self) {
        if self.remaining.is_empty() {
            self.defeated_monsters();
            return;
        }

        while let Some(next) = self.turn_queue.pop_front() {
            match next {
                Combatant::Monster(roster) => {
                    let m = &self.encounter.monsters[roster];
                    if self.remaining.contains(&roster) && !m.fled && m.can_act() {
                        self.monster_turn(roster);
                        return;
                    }
                }
                Combatant::Character(member) => {
                    if self.party.members[member].can_act() {
                        self.current_member = member;
                        self.current_char = self.position_of(member);
                        self.set_mode(Mode::SelectOption);
                        return;
                    }
                }
            }
        }

        self.next_round();
    }

    fn monster_turn(&mut self, roster: usize) {
        let Some(slot) = self.remaining.iter().position(|&r| r == roster) else {
            return;
        };
        self.acting_monster = Some(roster);
        let m = self.encounter.monsters[roster].clone();

        if m.flee_chance > 0 && percent_chance(&mut self.rng, m.flee_chance) {
            self.encounter.monsters[roster].fled = true;
            debug!("{} flees", m.name);
            self.set_mode(Mode::MonsterFlees);
            return;
        }

        if let Some(spell) = m.spell {
            if m.status & STATUS_SILENCED == 0 && percent_chance(&mut self.rng, m.spell_chance) {
                debug!("{} casts {:?}", m.name, spell);
                self.monster_spell_message = monster_cast(
                    &mut self.rng,
                    spell,
                    &m.name,
                    &mut self.party,
                    self.io.strings.as_ref(),
                );
                self.active_monster = Some(slot);
                self.set_mode(Mode::MonsterSpell);
                return;
            }
        }

        if slot >= self.attackers_count {
            if m.infiltrates {
                // Slips through to the head of the line
                self.remaining.remove(slot);
                self.remaining.insert(0, roster);
                self.set_mode(Mode::Infiltration);
            } else {
                self.set_mode(Mode::WaitsForOpening);
            }
            return;
        }

        if m.wander_chance > 0 && percent_chance(&mut self.rng, m.wander_chance) {
            self.set_mode(Mode::MonsterWanders);
            return;
        }

        let Some(target) = self.pick_target() else {
            self.check_party();
            return;
        };
        self.monster_attack_lines = monster_attack(
            &mut self.rng,
            &m,
            &mut self.party.members[target],
            self.io.strings.as_ref(),
        );
        self.active_monster = Some(slot);
        self.set_mode(Mode::MonsterAttack);
    }

    /// A conscious character for a monster to strike, front rank first
    fn pick_target(&mut self) -> Option<usize> {
        let conscious: Vec<(usize, usize)> = self
            .order
            .iter()
            .enumerate()
            .filter(|&(_, &member)| self.party.members[member].is_conscious())
            .map(|(pos, &member)| (pos, member))
            .collect();
        let front: Vec<usize> = conscious
            .iter()
            .filter(|(pos, _)| *pos < self.rules.front_rank)
            .map(|&(_, member)| member)
            .collect();

        if front.is_empty() {
            conscious.choose(&mut self.rng).map(|&(_, member)| member)
        } else {
            front.choose(&mut self.rng).copied()
        }
    }

    /// Drop dead and fled monsters from the alive list, keeping order
    pub(super) fn remove_dead_monsters(&mut self) {
        let monsters = &self.encounter.monsters;
        self.remaining
            .retain(|&roster| !monsters[roster].is_dead() && !monsters[roster].fled);
        self.active_monster = None;
        self.attackable_count = self.attackable_count.min(self.remaining.len());
    }

    pub(super) fn defeated_monsters(&mut self) {
        // Only monsters killed in this combat count
        let monsters = &self.encounter.monsters;
        self.total_experience = self
            .starting
            .iter()
            .map(|&roster| &monsters[roster])
            .filter(|m| m.status == STATUS_DEAD)
            .map(|m| m.experience)
            .sum();
        self.set_mode(Mode::DefeatedMonsters);
    }

    /// Reveal the next monster spell line, or move on once all are shown
    pub(super) fn check_monster_spell_done(&mut self) {
        let lines = &self.monster_spell_lines;
        if let Some(i) = (1..lines.len()).find(|&i| lines[i].y == lines[i - 1].y) {
            self.monster_spell_lines.remove(i - 1);
            self.redraw();
            return;
        }

        self.check_party();
    }

    /// End the combat if nobody is left standing, otherwise carry on
    pub(super) fn check_party(&mut self) {
        if self.party.any_conscious() {
            self.combat_loop();
        } else {
            info!("party defeated");
            self.io.events.send(GAME_TOPIC, GameMessage::PartyDefeated);
            self.close(CombatOutcome::PartyDefeated);
        }
    }

    /// Share out the experience and close the view
    pub(super) fn combat_done(&mut self) {
        let mut survivors: Vec<_> = self
            .party
            .members
            .iter_mut()
            .filter(|c| c.is_conscious())
            .collect();
        if !survivors.is_empty() {
            let share = self.total_experience / survivors.len() as u32;
            for c in survivors.iter_mut() {
                c.experience += share;
            }
        }

        self.close(CombatOutcome::Victory);
        self.io.events.send(GAME_TOPIC, GameMessage::Update);
    }
}
