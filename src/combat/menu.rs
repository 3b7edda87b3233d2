//! Option menu
//!
//! The acting character's choices. The top level lists what the character
//! may do; Fight, Shoot, Exchange, Delay and Cast open a sub-selection that
//! Escape backs out of without using up the turn.

use tracing::debug;

use super::damage::character_attack;
use super::dice::percent_chance;
use super::mode::{CombatOutcome, Mode, SelectedOption};
use super::session::{CharAttackReport, CombatSession, GAME_TOPIC};
use super::spells::{self, Continuation};
use crate::party::{CharacterClass, Condition};
use crate::ui::strings::Arg;
use crate::ui::{GameMessage, KeybindingMode};

impl CombatSession {
    pub(super) fn write_options(&mut self) {
        self.reset_bottom();

        match self.option {
            SelectedOption::None => self.write_all_options(),
            SelectedOption::Delay => self.write_delay_select(),
            SelectedOption::Exchange => self.write_exchange_select(),
            SelectedOption::Fight => self.write_target_select("combat.fight_which"),
            SelectedOption::Shoot => self.write_target_select("combat.shoot_which"),
            SelectedOption::Cast => self.write_cast_select(),
        }
    }

    fn write_all_options(&mut self) {
        assert_eq!(
            self.order.get(self.current_char),
            Some(&self.current_member),
            "acting character is not in its combat order slot"
        );
        let c = &self.party.members[self.current_member];
        let (name, can_attack, archer, has_missile, can_cast) = (
            c.name.clone(),
            c.can_attack,
            c.class == CharacterClass::Archer,
            c.missile.is_some(),
            c.sp > 0 && !c.condition.contains(Condition::SILENCED),
        );

        let header = self.text("combat.options_for");
        self.write(0, 20, &header);
        self.write(0, 22, &name);

        // Highlight the acting character's number
        let pos = self.current_char;
        self.io.canvas.write_inverse(
            3 + 4 * (pos % 2) as u16,
            3 + (pos / 2) as u16,
            &(pos + 1).to_string(),
        );

        let test_shoot = if can_attack {
            let attack = self.text("combat.attack");
            let fight = self.text("combat.fight");
            self.write(16, 20, &attack);
            self.write(16, 21, &fight);
            self.allowed.attack = true;
            self.allowed.fight = true;

            // Archers can always shoot
            archer
        } else {
            true
        };
        if test_shoot && has_missile {
            self.allowed.shoot = true;
            let shoot = self.text("combat.shoot");
            self.write(30, 20, &shoot);
        }

        if can_cast {
            self.allowed.cast = true;
            let cast = self.text("combat.cast");
            self.write(30, 21, &cast);
        }

        let exchange = self.text("combat.exchange_use");
        let retreat = self.text("combat.retreat_block");
        self.write(16, 22, &exchange);
        self.write(16, 23, &retreat);
    }

    fn write_delay_select(&mut self) {
        let title = self.text("combat.set_delay");
        let current =
            self.format_text("combat.delay_currently", &[Arg::Int(i64::from(self.delay))]);
        self.write(0, 20, &title);
        self.write(0, 22, &current);
        self.esc_to_go_back(0, 23);
    }

    fn write_exchange_select(&mut self) {
        let last = (b'0' + self.order.len().min(9) as u8) as char;
        let title = self.format_text("combat.exchange_places", &[Arg::Char(last)]);
        self.write(7, 20, &title);
        self.esc_to_go_back(12, 23);
    }

    fn write_target_select(&mut self, key: &str) {
        self.attackable_count = self.attackers_count.min(self.remaining.len());

        let last = (b'A' + self.attackable_count.saturating_sub(1) as u8) as char;
        let title = self.format_text(key, &[Arg::Char(last)]);
        self.write(10, 20, &title);
        self.esc_to_go_back(12, 23);
    }

    fn write_cast_select(&mut self) {
        let known: Vec<String> = self.party.members[self.current_member]
            .spells
            .iter()
            .map(|s| self.text(s.name_key()))
            .collect();

        let title = self.format_text("combat.cast_which", &[Arg::Int(known.len() as i64)]);
        self.write(10, 20, &title);
        for (i, name) in known.iter().enumerate().take(4) {
            let text = format!("{}) {}", i + 1, name);
            self.write(20 * (i % 2) as u16, 21 + (i / 2) as u16, &text);
        }
        self.esc_to_go_back(12, 24);
    }

    fn esc_to_go_back(&mut self, x: u16, y: u16) {
        let text = self.text("combat.esc");
        self.write(x, y, &text);
    }

    /// Open a sub-selection
    pub(super) fn set_option(&mut self, option: SelectedOption) {
        self.io.bindings.set_mode(if option == SelectedOption::Exchange {
            KeybindingMode::PartyMenus
        } else {
            KeybindingMode::Menus
        });
        self.option = option;
        self.redraw();
    }

    /// Strike the lead monster
    pub(super) fn attack(&mut self) {
        if self.allowed.attack {
            self.attack_monster(0, false);
        }
    }

    pub(super) fn fight(&mut self) {
        if self.allowed.fight {
            if self.remaining.len() < 2 {
                self.attack_monster(0, false);
            } else {
                self.set_option(SelectedOption::Fight);
            }
        }
    }

    pub(super) fn shoot(&mut self) {
        if self.allowed.shoot {
            if self.remaining.len() < 2 {
                self.attack_monster(0, true);
            } else {
                self.set_option(SelectedOption::Shoot);
            }
        }
    }

    pub(super) fn cast(&mut self) {
        if self.allowed.cast {
            self.set_option(SelectedOption::Cast);
        }
    }

    pub(super) fn delay_option(&mut self) {
        self.set_option(SelectedOption::Delay);
    }

    pub(super) fn exchange(&mut self) {
        if self.order.len() > 1 {
            self.set_option(SelectedOption::Exchange);
        }
    }

    /// Swap the acting character with the one at `slot`. Uses up the turn.
    pub(super) fn exchange_with(&mut self, slot: usize) {
        debug!(
            "exchanging combat positions {} and {}",
            self.current_char, slot
        );
        self.order.swap(self.current_char, slot);
        self.current_char = slot;
        self.setup_can_attacks();
        self.character_done();
    }

    pub(super) fn retreat(&mut self) {
        if percent_chance(&mut self.rng, self.rules.retreat_chance) {
            self.io.events.send(GAME_TOPIC, GameMessage::Retreated);
            self.close(CombatOutcome::Retreated);
        } else {
            let text = self.text("combat.couldnt_escape");
            self.show_result(vec![text], Continuation::EndTurn);
        }
    }

    /// Do nothing this turn
    pub(super) fn block(&mut self) {
        self.character_done();
    }

    /// Fight or shoot the monster in alive-list slot `slot`
    pub(super) fn attack_monster(&mut self, slot: usize, shooting: bool) {
        let Some(&roster) = self.remaining.get(slot) else {
            return;
        };
        let attacker = &self.party.members[self.current_member];
        let monster = &mut self.encounter.monsters[roster];
        let result = character_attack(&mut self.rng, attacker, monster, shooting);

        if result.killed {
            debug!("{} killed {}", attacker.name, monster.name);
        }
        self.char_attack = Some(CharAttackReport {
            attacker: attacker.name.clone(),
            monster: roster,
            shooting,
            outcome: result.outcome,
        });
        self.set_mode(if result.no_effect {
            Mode::NoEffect
        } else {
            Mode::CharAttacks
        });
    }

    /// Monsters within reach, lead first
    pub(super) fn front_rank_targets(&self) -> Vec<usize> {
        self.remaining
            .iter()
            .take(self.attackers_count)
            .copied()
            .collect()
    }

    /// Cast the acting character's `index`th known spell
    pub(super) fn cast_selected(&mut self, index: usize) {
        let member = self.current_member;
        let Some(&spell) = self.party.members[member].spells.get(index) else {
            return;
        };

        if self.party.members[member].sp < spell.cost() {
            let text = self.text("combat.not_enough_sp");
            self.show_result(vec![text], Continuation::Resume);
            return;
        }
        self.party.members[member].sp -= spell.cost();

        let targets = self.front_rank_targets();
        let lines = spells::cast_spell(
            &mut self.rng,
            spell,
            member,
            &mut self.party,
            &mut self.encounter.monsters,
            &targets,
            self.io.strings.as_ref(),
        );
        self.show_result(lines, Continuation::EndTurn);
    }

    /// The acting character's action is resolved
    pub(super) fn character_done(&mut self) {
        self.remove_dead_monsters();
        self.combat_loop();
    }
}
