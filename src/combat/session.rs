//! Combat session
//!
//! The combat view's state machine. Each `Mode` has one draw routine and one
//! timeout routine:
//! - entering a mode requests a redraw, the draw runs once the current
//!   event has been handled
//! - reveal modes schedule a delay when drawn; the delay's expiry (or a
//!   key that cuts it short) runs the mode's timeout
//! - input is interpreted by mode and pending menu option
//!
//! Rounds and monster turns live in `turns`, the option menu in `menu`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::damage::AttackOutcome;
use super::mode::{CombatOutcome, Handicap, Mode, ResultLine, SelectedOption};
use super::monster::{Encounter, Monster};
use super::spells::{Continuation, SpellResultMessage};
use super::status::MonsterStatus;
use crate::config::{CombatRules, Config};
use crate::party::{Character, Party};
use crate::timers::DelayScheduler;
use crate::ui::strings::{format, Arg};
use crate::ui::{
    Action, AudioCue, EventBus, GameMessage, InputBindings, InputEvent, Key, KeybindingMode,
    Sound, StringTable, TextCanvas, ViewRequest, SCREEN_WIDTH,
};

/// Topic of messages to the surrounding game loop
pub const GAME_TOPIC: &str = "Game";

/// Party positions the view can lay out and address
pub const MAX_PARTY_SIZE: usize = 6;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot start combat without a party")]
    NoParty,

    #[error("cannot start combat without monsters")]
    NoMonsters,

    #[error("party of {0} is larger than {max}", max = MAX_PARTY_SIZE)]
    PartyTooLarge(usize),
}

/// Services the combat view talks to
pub struct Collaborators {
    pub canvas: Box<dyn TextCanvas>,
    pub audio: Box<dyn AudioCue>,
    pub strings: Arc<dyn StringTable>,
    pub bindings: Arc<dyn InputBindings>,
    pub events: Box<dyn EventBus>,
}

/// An entry in the round's turn queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combatant {
    /// Encounter roster index
    Monster(usize),
    /// Party member index
    Character(usize),
}

/// Staged report of a character's attack
#[derive(Debug, Clone)]
pub(super) struct CharAttackReport {
    pub attacker: String,
    /// Encounter roster index
    pub monster: usize,
    pub shooting: bool,
    pub outcome: AttackOutcome,
}

/// Actions the option menu currently allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowedActions {
    pub attack: bool,
    pub fight: bool,
    pub shoot: bool,
    pub cast: bool,
}

/// Serializable view of a combat in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub round: u32,
    pub mode: Mode,
    pub handicap: Handicap,
    pub delay: u8,
    pub total_experience: u32,
    /// Alive monsters in display order
    pub monsters: Vec<MonsterSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSnapshot {
    pub name: String,
    pub hp: i32,
    pub status: Option<MonsterStatus>,
}

/// The combat view
pub struct CombatSession {
    pub(super) rules: CombatRules,
    pub(super) io: Collaborators,
    pub(super) rng: StdRng,
    pub(super) scheduler: DelayScheduler,
    pub(super) party: Party,
    /// Combat order: position to party member index
    pub(super) order: Vec<usize>,
    pub(super) encounter: Encounter,
    /// Alive list: roster indices in display order
    pub(super) remaining: Vec<usize>,
    /// Roster indices alive when the combat began
    pub(super) starting: Vec<usize>,
    pub(super) mode: Mode,
    pub(super) option: SelectedOption,
    pub(super) round_num: u32,
    pub(super) handicap: Handicap,
    /// Combat order position of the acting character
    pub(super) current_char: usize,
    /// Party member index of the acting character
    pub(super) current_member: usize,
    /// Highlighted alive-list slot during monster turns
    pub(super) active_monster: Option<usize>,
    /// Roster index of the monster whose action is on screen
    pub(super) acting_monster: Option<usize>,
    pub(super) allowed: AllowedActions,
    pub(super) attackers_count: usize,
    pub(super) attackable_count: usize,
    pub(super) total_experience: u32,
    pub(super) turn_queue: VecDeque<Combatant>,
    pub(super) monsters_regenerate: bool,
    pub(super) monsters_resist_spells: bool,
    pub(super) monster_attack_lines: Vec<String>,
    pub(super) char_attack: Option<CharAttackReport>,
    /// Written by monster spells as they resolve
    pub(super) monster_spell_message: Vec<ResultLine>,
    /// Copy being revealed in `Mode::MonsterSpell`
    pub(super) monster_spell_lines: Vec<ResultLine>,
    pub(super) spell_result: SpellResultMessage,
    /// Combat delay setting (0-9)
    pub(super) delay: u8,
    pub(super) needs_redraw: bool,
    pub(super) open: bool,
    pub(super) outcome: Option<CombatOutcome>,
}

impl CombatSession {
    /// Create a session. Nothing happens until a `Combat` message arrives.
    pub fn new(
        config: &Config,
        io: Collaborators,
        party: Party,
        encounter: Encounter,
    ) -> Result<Self, SessionError> {
        if party.is_empty() {
            return Err(SessionError::NoParty);
        }
        if party.len() > MAX_PARTY_SIZE {
            return Err(SessionError::PartyTooLarge(party.len()));
        }
        if encounter.is_empty() {
            return Err(SessionError::NoMonsters);
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let order = (0..party.len()).collect();

        Ok(Self {
            rules: config.rules.clone(),
            io,
            rng,
            scheduler: DelayScheduler::new(),
            party,
            order,
            encounter,
            remaining: Vec::new(),
            starting: Vec::new(),
            mode: Mode::NextRound,
            option: SelectedOption::None,
            round_num: 0,
            handicap: Handicap::Even,
            current_char: 0,
            current_member: 0,
            active_monster: None,
            acting_monster: None,
            allowed: AllowedActions::default(),
            attackers_count: config.rules.attackers_count,
            attackable_count: 0,
            total_experience: 0,
            turn_queue: VecDeque::new(),
            monsters_regenerate: false,
            monsters_resist_spells: false,
            monster_attack_lines: Vec::new(),
            char_attack: None,
            monster_spell_message: Vec::new(),
            monster_spell_lines: Vec::new(),
            spell_result: SpellResultMessage::default(),
            delay: config.delay.min(9),
            needs_redraw: false,
            open: false,
            outcome: None,
        })
    }

    /// Handle a game message. Returns whether it was consumed.
    pub fn msg_game(&mut self, msg: GameMessage) -> bool {
        let handled = match msg {
            GameMessage::Combat => {
                self.begin();
                true
            }
            GameMessage::SpellResult { x, text } => {
                assert!(
                    usize::from(x) < SCREEN_WIDTH,
                    "spell result column {} off screen",
                    x
                );
                self.spell_result = SpellResultMessage::single(x, text, 3);
                self.set_mode(Mode::SpellResult);
                true
            }
            GameMessage::DisableAttacks => {
                self.disable_attacks();
                true
            }
            _ => false,
        };
        self.flush();
        handled
    }

    /// Start the combat
    pub fn start(&mut self) {
        self.msg_game(GameMessage::Combat);
    }

    fn begin(&mut self) {
        self.open = true;
        self.outcome = None;
        self.round_num = 0;
        self.total_experience = 0;
        self.option = SelectedOption::None;
        self.turn_queue.clear();
        self.scheduler.end_delay();
        self.io.canvas.clear();

        self.remaining = (0..self.encounter.monsters.len())
            .filter(|&i| !self.encounter.monsters[i].is_dead())
            .collect();
        self.starting = self.remaining.clone();
        self.attackers_count = self
            .encounter
            .attackers_count
            .unwrap_or(self.rules.attackers_count)
            .max(1);
        self.attackable_count = self.attackers_count.min(self.remaining.len());
        self.setup_can_attacks();

        info!(
            "combat started: {} characters vs {} monsters",
            self.party.len(),
            self.remaining.len()
        );
        self.combat_loop();
    }

    /// Handle an input event. Returns whether it was consumed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if !self.open {
            return false;
        }
        let handled = match event {
            InputEvent::Keypress(key) => self.msg_keypress(key),
            InputEvent::Action(action) => self.msg_action(action),
        };
        self.flush();
        handled
    }

    /// Poll the delay against the wall clock
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Poll the delay as of `now`, running the timeout if it is due
    pub fn tick_at(&mut self, now: Instant) {
        if self.open && self.scheduler.poll(now) {
            self.timeout();
        }
        self.flush();
    }

    /// Cut a pending delay short, running its timeout immediately.
    /// Returns false, doing nothing, when no delay is pending.
    pub fn end_delay(&mut self) -> bool {
        let ended = self.finish_delay();
        self.flush();
        ended
    }

    /// The view gained focus
    pub fn focus(&mut self) {
        if self.open && self.mode == Mode::SelectOption {
            self.current_char = self.position_of(self.current_member);
        }
        self.io.bindings.set_mode(KeybindingMode::Combat);
    }

    /// The view lost focus
    pub fn unfocus(&mut self) {
        self.io.bindings.set_mode(KeybindingMode::Menus);
    }

    /// Show a result from another view (item use, spell screen).
    /// A zero delay is shown for three seconds.
    pub fn display_spell_result(&mut self, mut msg: SpellResultMessage) {
        if msg.delay_seconds == 0 {
            msg.delay_seconds = 3;
        }
        self.spell_result = msg;
        self.set_mode(Mode::SpellResult);
        self.flush();
    }

    /// Serializable state for the save collaborator
    pub fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot {
            round: self.round_num,
            mode: self.mode,
            handicap: self.handicap,
            delay: self.delay,
            total_experience: self.total_experience,
            monsters: self
                .alive_monsters()
                .into_iter()
                .map(|m| MonsterSnapshot {
                    name: m.name.clone(),
                    hp: m.hp,
                    status: m.display_status(),
                })
                .collect(),
        }
    }

    /// Hand the party back
    pub fn into_party(self) -> Party {
        self.party
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn option(&self) -> SelectedOption {
        self.option
    }

    pub fn round(&self) -> u32 {
        self.round_num
    }

    pub fn handicap(&self) -> Handicap {
        self.handicap
    }

    /// Highlighted alive-list slot
    pub fn active_monster(&self) -> Option<usize> {
        self.active_monster
    }

    pub fn attackers_count(&self) -> usize {
        self.attackers_count
    }

    pub fn attackable_count(&self) -> usize {
        self.attackable_count
    }

    pub fn total_experience(&self) -> u32 {
        self.total_experience
    }

    /// Combat delay setting
    pub fn delay_setting(&self) -> u8 {
        self.delay
    }

    pub fn allowed(&self) -> AllowedActions {
        self.allowed
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_delay_active(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        self.outcome
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    /// Alive list as roster indices
    pub fn alive_indices(&self) -> &[usize] {
        &self.remaining
    }

    /// Alive monsters in display order
    pub fn alive_monsters(&self) -> Vec<&Monster> {
        self.remaining
            .iter()
            .map(|&i| &self.encounter.monsters[i])
            .collect()
    }

    /// Combat order as party member indices
    pub fn combat_order(&self) -> &[usize] {
        &self.order
    }

    /// Combat order position of the acting character
    pub fn current_position(&self) -> usize {
        self.current_char
    }

    /// The acting character
    pub fn current_character(&self) -> Option<&Character> {
        self.party.get(self.current_member)
    }

    pub fn spell_result(&self) -> &SpellResultMessage {
        &self.spell_result
    }

    /// Monster spell lines still to be revealed
    pub fn monster_spell_lines(&self) -> &[ResultLine] {
        &self.monster_spell_lines
    }

    // ---- state machine ----

    pub(super) fn set_mode(&mut self, mode: Mode) {
        debug!("combat mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;

        if mode == Mode::SelectOption {
            self.option = SelectedOption::None;
            self.io.bindings.set_mode(KeybindingMode::Combat);
        } else {
            self.io.bindings.set_mode(KeybindingMode::Menus);
        }

        if mode == Mode::MonsterSpell {
            self.monster_spell_lines = self.monster_spell_message.clone();
        }

        if !mode.is_monster_turn() {
            self.active_monster = None;
        }

        self.redraw();
    }

    pub(super) fn redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Run pending draws
    pub(super) fn flush(&mut self) {
        while self.needs_redraw && self.open {
            self.needs_redraw = false;
            self.draw();
        }
    }

    fn finish_delay(&mut self) -> bool {
        if self.scheduler.end_delay() {
            self.timeout();
            true
        } else {
            false
        }
    }

    fn draw(&mut self) {
        match self.mode {
            Mode::NextRound => {
                self.write_monsters();
                self.reset_bottom();
                self.highlight_next_round();
            }
            Mode::MonsterAdvances => {
                let line = format!(
                    "{} {}",
                    self.acting_monster_name(),
                    self.text("combat.advances")
                );
                self.write(0, 20, &format!("{:<30}", line));
                self.write_round();
                self.write_monsters();
            }
            Mode::MonstersAffected => self.write_monster_effects(),
            Mode::MonsterSpell => self.write_monster_spell(),
            Mode::Infiltration => self.write_infiltration(),
            Mode::WaitsForOpening => self.write_waits_for_opening(),
            Mode::CharAttacks => {
                self.write_monsters();
                self.write_char_attack_damage();
            }
            Mode::NoEffect => self.write_char_attack_no_effect(),
            Mode::DefeatedMonsters => {
                self.write_defeat();
                self.io.audio.play(Sound::Fanfare);
            }
            Mode::SelectOption
            | Mode::SpellResult
            | Mode::MonsterAttack
            | Mode::MonsterFlees
            | Mode::MonsterWanders => {
                self.io.canvas.clear();
                self.write_static_content();
                self.write_handicap();
                self.write_round();
                self.write_party_numbers();
                self.write_monsters();
                self.write_party();

                match self.mode {
                    Mode::SelectOption => self.write_options(),
                    Mode::SpellResult => self.write_spell_result(),
                    Mode::MonsterAttack => self.write_monster_attack(),
                    Mode::MonsterFlees => self.write_monster_action(true),
                    Mode::MonsterWanders => self.write_monster_action(false),
                    _ => {}
                }
            }
        }

        if let Some(seconds) = self.mode.reveal_seconds() {
            self.scheduler.delay_seconds(seconds);
        } else if self.mode == Mode::SpellResult && self.spell_result.delay_seconds > 0 {
            self.scheduler.delay_seconds(self.spell_result.delay_seconds);
        }
    }

    fn timeout(&mut self) {
        debug!("combat timeout in {:?}", self.mode);
        match self.mode {
            Mode::NextRound => self.next_round2(),
            Mode::MonsterAdvances => self.next_round3(),
            Mode::MonstersAffected | Mode::CharAttacks | Mode::NoEffect | Mode::MonsterFlees => {
                self.remove_dead_monsters();
                self.combat_loop();
            }
            Mode::MonsterWanders | Mode::Infiltration | Mode::MonsterAttack => {
                self.write_party();
                self.write_monsters();
                self.check_party();
            }
            Mode::MonsterSpell => self.check_monster_spell_done(),
            Mode::WaitsForOpening => self.combat_loop(),
            Mode::DefeatedMonsters => self.combat_done(),
            Mode::SpellResult => self.run_continuation(),
            Mode::SelectOption => {}
        }
    }

    fn msg_keypress(&mut self, key: Key) -> bool {
        if self.finish_delay() {
            return true;
        }

        if self.mode == Mode::SelectOption && self.option != SelectedOption::None {
            match self.option {
                SelectedOption::Fight | SelectedOption::Shoot => {
                    if let Some(idx) = key.letter_index() {
                        if idx < self.attackable_count {
                            let shooting = self.option == SelectedOption::Shoot;
                            self.attack_monster(idx, shooting);
                        }
                    }
                }
                SelectedOption::Delay => {
                    if let Some(digit) = key.digit() {
                        self.delay = digit;
                        debug!("combat delay set to {}", digit);
                        self.set_mode(Mode::SelectOption);
                    }
                }
                SelectedOption::Cast => {
                    if let Some(digit) = key.digit() {
                        let known = self
                            .current_character()
                            .map_or(0, |c| c.spells.len());
                        if digit >= 1 && usize::from(digit) <= known {
                            self.cast_selected(usize::from(digit) - 1);
                        }
                    }
                }
                SelectedOption::Exchange | SelectedOption::None => {}
            }
        } else if self.mode == Mode::SpellResult && !self.scheduler.is_active() {
            // A result that waits for a key
            self.run_continuation();
        }

        true
    }

    fn msg_action(&mut self, action: Action) -> bool {
        if self.finish_delay() {
            return true;
        }

        if self.mode == Mode::SelectOption
            && self.option != SelectedOption::None
            && action == Action::Escape
        {
            self.set_mode(Mode::SelectOption);
            return true;
        }

        if self.mode != Mode::SelectOption
            || (self.option != SelectedOption::None && self.option != SelectedOption::Exchange)
        {
            return false;
        }

        match action {
            Action::ViewParty(slot) => {
                let slot = usize::from(slot);
                if slot < self.order.len() {
                    if self.option == SelectedOption::Exchange {
                        if slot != self.current_char {
                            self.exchange_with(slot);
                        }
                    } else {
                        self.io.events.send(
                            GAME_TOPIC,
                            GameMessage::OpenView(ViewRequest::CharacterView(slot)),
                        );
                    }
                }
            }
            Action::Attack => self.attack(),
            Action::Block => self.block(),
            Action::Cast => self.cast(),
            Action::Delay => self.delay_option(),
            Action::Exchange => self.exchange(),
            Action::Fight => self.fight(),
            Action::Protect => self.open_view(ViewRequest::Protect),
            Action::Quickref => self.open_view(ViewRequest::QuickRef),
            Action::Retreat => self.retreat(),
            Action::Shoot => self.shoot(),
            Action::Use => self.open_view(ViewRequest::Use),
            Action::Escape => {}
        }

        true
    }

    pub(super) fn run_continuation(&mut self) {
        match self.spell_result.continuation {
            Continuation::EndTurn => self.block(),
            Continuation::Resume => self.set_mode(Mode::SelectOption),
        }
    }

    /// Show a result of an action taken in this view
    pub(super) fn show_result(&mut self, texts: Vec<String>, continuation: Continuation) {
        self.spell_result = SpellResultMessage::new(texts, u32::from(self.delay), continuation);
        self.set_mode(Mode::SpellResult);
    }

    pub(super) fn disable_attacks(&mut self) {
        self.allowed = AllowedActions::default();
    }

    pub(super) fn open_view(&mut self, view: ViewRequest) {
        self.io.events.send(GAME_TOPIC, GameMessage::OpenView(view));
    }

    pub(super) fn close(&mut self, outcome: CombatOutcome) {
        info!("combat over after {} rounds: {:?}", self.round_num, outcome);
        self.outcome = Some(outcome);
        self.open = false;
        self.scheduler.end_delay();
        self.turn_queue.clear();
        self.io.bindings.set_mode(KeybindingMode::Menus);
    }

    pub(super) fn position_of(&self, member: usize) -> usize {
        self.order.iter().position(|&m| m == member).unwrap_or(0)
    }

    // ---- drawing helpers ----

    pub(super) fn text(&self, key: &str) -> String {
        self.io.strings.get(key)
    }

    pub(super) fn write(&mut self, x: u16, y: u16, text: &str) {
        self.io.canvas.write_str(x, y, text);
    }

    pub(super) fn acting_monster_name(&self) -> String {
        self.acting_monster
            .and_then(|i| self.encounter.monsters.get(i))
            .map(|m| m.name.clone())
            .unwrap_or_default()
    }

    /// Blank the message area and forbid menu actions until redrawn
    pub(super) fn reset_bottom(&mut self) {
        self.io.canvas.clear_lines(20, 24);
        self.allowed = AllowedActions::default();
    }

    fn write_static_content(&mut self) {
        let labels = [
            (0, "combat.combat"),
            (1, "combat.round"),
            (7, "combat.delay"),
            (8, "combat.protect"),
            (9, "combat.quickref"),
            (10, "combat.view_char"),
            (12, "combat.handicap"),
        ];
        for (y, key) in labels {
            let text = self.text(key);
            self.write(0, y, &text);
        }
        self.write(0, 15, &"-".repeat(SCREEN_WIDTH));
    }

    fn write_handicap(&mut self) {
        let text = match self.handicap {
            Handicap::Even => self.text("combat.even"),
            Handicap::Party(delta) => format!("{}{}", self.text("combat.party_plus"), delta),
            Handicap::Monster(delta) => format!("{}{}", self.text("combat.monster_plus"), delta),
        };
        self.write(0, 13, &format!("{:<10}", text));
    }

    fn write_round(&mut self) {
        let round = self.round_num.to_string();
        self.write(7, 1, &round);
    }

    fn highlight_next_round(&mut self) {
        let text = format!("{}{}", self.text("combat.round"), self.round_num);
        self.io.canvas.write_inverse(0, 1, &text);
    }

    fn write_party_numbers(&mut self) {
        for (pos, &member) in self.order.iter().enumerate() {
            let can_attack = self.party.members[member].can_attack;
            let text = format!("{}{}", if can_attack { '+' } else { ' ' }, pos + 1);
            self.io
                .canvas
                .write_str(2 + 4 * (pos % 2) as u16, 3 + (pos / 2) as u16, &text);
        }
    }

    pub(super) fn write_monsters(&mut self) {
        let blank = " ".repeat(30);
        let highlight = if self.mode.is_monster_turn() {
            self.active_monster
        } else {
            None
        };

        let mut y = 0u16;
        for (slot, &roster) in self.remaining.iter().enumerate().take(15) {
            let monster = &self.encounter.monsters[roster];
            self.io.canvas.write_str(10, y, &blank);

            let rank = if slot < self.attackers_count { "+" } else { " " };
            self.io.canvas.write_str(11, y, rank);
            let letter = ((b'A' + slot as u8) as char).to_string();
            if highlight == Some(slot) {
                self.io.canvas.write_inverse(12, y, &letter);
            } else {
                self.io.canvas.write_str(12, y, &letter);
            }
            let name = format!(") {}", monster.name);
            self.io.canvas.write_str(13, y, &name);

            if let Some(status) = monster.display_status() {
                let end = 13 + name.chars().count();
                if end < 30 {
                    self.io.canvas.write_str(end as u16, y, &".".repeat(30 - end));
                }
                let label = self.io.strings.get(status.key());
                self.io.canvas.write_str(end.max(30) as u16, y, &label);
            }
            y += 1;
        }

        for y in y..15 {
            self.io.canvas.write_str(10, y, &blank);
        }
    }

    pub(super) fn write_party(&mut self) {
        self.io.canvas.clear_lines(16, 18);
        for (pos, &member) in self.order.iter().enumerate() {
            let c = &self.party.members[member];
            let text = format!(
                "{}{}) {}",
                if c.condition.is_empty() { ' ' } else { '*' },
                pos + 1,
                c.name
            );
            self.io
                .canvas
                .write_str(21 * (pos % 2) as u16, 16 + (pos / 2) as u16, &text);
        }
    }

    fn write_defeat(&mut self) {
        let border = format!("+{}+", "-".repeat(28));
        let side = format!("!{}!", " ".repeat(28));
        self.write(10, 0, &border);
        for y in 1..8 {
            self.write(10, y, &side);
        }
        self.write(10, 8, &border);

        let line1 = self.text("combat.defeating1");
        let line2 = self.text("combat.defeating2");
        let xp = format!("{} {}", self.total_experience, self.text("combat.xp"));
        self.write(11, 2, &line1);
        self.write(11, 4, &line2);
        self.write(14, 6, &xp);
    }

    fn write_monster_effects(&mut self) {
        let mut y = 20;
        if self.monsters_regenerate {
            y = 21;
            let text = self.text("combat.regenerate");
            self.write(0, y, &text);
        }
        if self.monsters_resist_spells {
            let text = self.text("combat.overcome");
            self.write(0, y + 1, &text);
        }
        self.write_monsters();
    }

    fn write_monster_action(&mut self, flees: bool) {
        self.reset_bottom();
        let key = if flees {
            "combat.monster_flees"
        } else {
            "combat.monster_wanders"
        };
        let line = format!("{} {}", self.acting_monster_name(), self.text(key));
        self.write(0, 20, &line);
    }

    /// Show staged lines while their rows keep increasing; a repeated row
    /// waits for the next reveal step.
    fn write_monster_spell(&mut self) {
        self.reset_bottom();
        let mut last_y = None;
        let lines = self.monster_spell_lines.clone();
        for line in &lines {
            if last_y.is_some_and(|y| line.y <= y) {
                break;
            }
            self.write(line.x, line.y, &line.text);
            last_y = Some(line.y);
        }
    }

    fn write_monster_attack(&mut self) {
        let lines = self.monster_attack_lines.clone();
        for (offset, line) in lines.iter().enumerate().take(5) {
            self.write(0, 20 + offset as u16, line);
        }
    }

    fn write_infiltration(&mut self) {
        let line = format!(
            "{} {}",
            self.acting_monster_name(),
            self.text("combat.infiltration")
        );
        self.reset_bottom();
        self.write(0, 20, &line);
        self.io.audio.play(Sound::Alert);
        self.io.audio.play(Sound::Alert);
    }

    fn write_waits_for_opening(&mut self) {
        let line = format!(
            "{} {}",
            self.acting_monster_name(),
            self.text("combat.waits_for_opening")
        );
        self.reset_bottom();
        self.write(0, 20, &line);
    }

    fn char_attack_header(&self, report: &CharAttackReport) -> String {
        let verb = if report.shooting {
            "combat.shoots"
        } else {
            "combat.attacks"
        };
        format!(
            "{} {} {}",
            report.attacker,
            self.text(verb),
            self.encounter.monsters[report.monster].name
        )
    }

    fn write_char_attack_damage(&mut self) {
        self.reset_bottom();
        let Some(report) = self.char_attack.clone() else {
            return;
        };
        let header = self.char_attack_header(&report);
        self.write(0, 20, &header);
        let attack = super::damage::attack_string(&report.outcome, self.io.strings.as_ref());
        self.write(0, 21, &attack);

        let monster = &self.encounter.monsters[report.monster];
        if monster.is_dead() {
            let line = format!("{} {}", monster.name, self.text("combat.goes_down"));
            self.write(0, 22, &line);
        }
    }

    fn write_char_attack_no_effect(&mut self) {
        self.reset_bottom();
        let Some(report) = self.char_attack.clone() else {
            return;
        };
        let header = self.char_attack_header(&report);
        self.write(0, 20, &header);
        let text = self.text("combat.weapon_no_effect");
        self.write(0, 21, &text);
    }

    fn write_spell_result(&mut self) {
        let lines = self.spell_result.lines.clone();
        for line in &lines {
            self.write(line.x, line.y + 20, &line.text);
        }
    }

    pub(super) fn format_text(&self, key: &str, args: &[Arg<'_>]) -> String {
        format(&self.text(key), args)
    }
}
