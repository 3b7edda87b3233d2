//! Option menu scenarios

use skirmish::combat::{Encounter, Mode, Monster, SelectedOption, SpellId, GAME_TOPIC};
use skirmish::party::{Character, CharacterClass};
use skirmish::ui::{GameMessage, InputBindings, KeybindingMode, ViewRequest};

use crate::harness::{knight, party_of, test_config, CombatHarness};

fn one_orc() -> Encounter {
    Encounter::new(vec![Monster::new("ORC", 40)])
}

/// Even round, one monster, a melee character without spell points
#[test]
fn test_fight_single_monster_resolves_immediately() {
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), one_orc());
    h.start();
    assert!(h.advance_until(Mode::SelectOption));

    assert_eq!(h.session.handicap(), skirmish::combat::Handicap::Even);
    assert!(h.screen.contains("EVEN"));

    let allowed = h.session.allowed();
    assert!(allowed.attack);
    assert!(allowed.fight);
    assert!(!allowed.cast);
    assert!(h.screen.contains("A) ATTACK"));
    assert!(h.screen.contains("F) FIGHT"));
    assert!(!h.screen.contains("C) CAST"));

    h.press('f');
    assert!(matches!(
        h.session.mode(),
        Mode::CharAttacks | Mode::NoEffect
    ));
    assert!(!h.screen.contains("FIGHT WHICH"));
    assert!(h.screen.contains("GALA ATTACKS ORC"));
}

#[test]
fn test_delay_digit_sets_delay_and_redisplays_menu() {
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), one_orc());
    h.start();
    assert!(h.advance_until(Mode::SelectOption));
    let actor = h.session.current_position();

    h.press('d');
    assert_eq!(h.session.option(), SelectedOption::Delay);
    assert!(h.screen.contains("SET DELAY (0-9)"));
    assert!(h.screen.contains("CURRENTLY: 5"));
    assert_eq!(h.keymap.mode(), KeybindingMode::Menus);

    h.press('7');
    assert_eq!(h.session.delay_setting(), 7);
    assert_eq!(h.session.mode(), Mode::SelectOption);
    assert_eq!(h.session.option(), SelectedOption::None);
    assert_eq!(h.session.current_position(), actor);
    assert!(h.screen.contains("OPTIONS FOR:"));
    assert!(!h.screen.contains("SET DELAY"));
    assert_eq!(h.keymap.mode(), KeybindingMode::Combat);
}

#[test]
fn test_fight_target_out_of_range_is_ignored() {
    let encounter = Encounter::new(vec![Monster::new("ORC", 40), Monster::new("GOBLIN", 40)]);
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), encounter);
    h.start();
    assert!(h.advance_until(Mode::SelectOption));

    h.press('f');
    assert_eq!(h.session.option(), SelectedOption::Fight);
    assert_eq!(h.session.attackable_count(), 2);
    assert!(h.screen.contains("FIGHT WHICH (A-B)"));

    // Only A and B are targets
    h.press('c');
    assert_eq!(h.session.mode(), Mode::SelectOption);
    assert_eq!(h.session.option(), SelectedOption::Fight);
    h.press('z');
    assert_eq!(h.session.mode(), Mode::SelectOption);

    h.press('b');
    assert!(matches!(
        h.session.mode(),
        Mode::CharAttacks | Mode::NoEffect
    ));
    assert!(h.screen.contains("GALA ATTACKS GOBLIN"));
}

#[test]
fn test_escape_backs_out_without_using_turn() {
    let encounter = Encounter::new(vec![Monster::new("ORC", 40), Monster::new("GOBLIN", 40)]);
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), encounter);
    h.start();
    assert!(h.advance_until(Mode::SelectOption));
    let round = h.session.round();

    h.press('f');
    assert!(h.screen.contains("ESC TO GO BACK"));
    h.escape();

    assert_eq!(h.session.mode(), Mode::SelectOption);
    assert_eq!(h.session.option(), SelectedOption::None);
    assert_eq!(h.session.round(), round);
    assert_eq!(
        h.session.current_character().map(|c| c.name.as_str()),
        Some("GALA")
    );
    assert!(h.screen.contains("OPTIONS FOR:"));
}

#[test]
fn test_exchange_swaps_positions_and_ends_turn() {
    let party = party_of(vec![knight("GALA"), knight("BRON"), knight("MERL")]);
    let mut h = CombatHarness::new(party, one_orc());
    h.start();
    assert!(h.advance_until(Mode::SelectOption));
    assert_eq!(h.session.current_position(), 0);

    h.press('e');
    assert_eq!(h.session.option(), SelectedOption::Exchange);
    assert_eq!(h.keymap.mode(), KeybindingMode::PartyMenus);
    assert!(h.screen.contains("EXCHANGE PLACES WITH (1-3)"));

    h.press('3');
    assert_eq!(h.session.combat_order(), &[2, 1, 0]);
    assert!(h.session.party().members[2].can_attack);
    assert!(!h.session.party().members[0].can_attack);

    // BRON is next
    assert_eq!(h.session.mode(), Mode::SelectOption);
    assert_eq!(
        h.session.current_character().map(|c| c.name.as_str()),
        Some("BRON")
    );
}

#[test]
fn test_exchange_needs_a_partner() {
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), one_orc());
    h.start();
    assert!(h.advance_until(Mode::SelectOption));

    h.press('e');
    assert_eq!(h.session.option(), SelectedOption::None);
}

#[test]
fn test_back_rank_archer_can_shoot() {
    let archer = Character::new("SYLA", CharacterClass::Archer)
        .with_hp(100)
        .with_missile("1d6".parse().unwrap());
    let wizard = Character::new("MERL", CharacterClass::Sorcerer)
        .with_hp(100)
        .with_sp(5)
        .with_spells(&[SpellId::FlameArrow]);
    let party = party_of(vec![knight("GALA"), knight("BRON"), archer, wizard]);
    let mut h = CombatHarness::new(party, one_orc());
    h.start();

    // GALA, BRON, SYLA, MERL in combat order; skip to SYLA
    assert!(h.advance_until(Mode::SelectOption));
    h.press('b');
    assert!(h.advance_until(Mode::SelectOption));
    h.press('b');
    assert!(h.advance_until(Mode::SelectOption));

    assert_eq!(
        h.session.current_character().map(|c| c.name.as_str()),
        Some("SYLA")
    );
    let allowed = h.session.allowed();
    assert!(!allowed.fight);
    assert!(allowed.shoot);
    assert!(h.screen.contains("S) SHOOT"));

    h.press('s');
    assert!(h.screen.contains("SYLA SHOOTS ORC"));
    assert!(h.advance_until(Mode::SelectOption));

    assert_eq!(
        h.session.current_character().map(|c| c.name.as_str()),
        Some("MERL")
    );
    assert!(h.session.allowed().cast);
    assert!(h.screen.contains("C) CAST"));
}

#[test]
fn test_cast_without_enough_points_returns_to_menu() {
    let wizard = Character::new("MERL", CharacterClass::Sorcerer)
        .with_hp(100)
        .with_sp(1)
        .with_spells(&[SpellId::FlameArrow]);
    let mut h = CombatHarness::new(party_of(vec![wizard]), one_orc());
    h.start();
    assert!(h.advance_until(Mode::SelectOption));

    h.press('c');
    assert_eq!(h.session.option(), SelectedOption::Cast);
    assert!(h.screen.contains("CAST WHICH (1-1)"));

    // Out of range spell number
    h.press('2');
    assert_eq!(h.session.option(), SelectedOption::Cast);

    h.press('1');
    assert_eq!(h.session.mode(), Mode::SpellResult);
    assert!(h.screen.contains("NOT ENOUGH SPELL POINTS"));

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::SelectOption);
    assert_eq!(
        h.session.current_character().map(|c| c.name.as_str()),
        Some("MERL")
    );
    assert_eq!(h.session.party().members[0].sp, 1);
}

#[test]
fn test_cast_spends_points_and_ends_turn() {
    let wizard = Character::new("MERL", CharacterClass::Sorcerer)
        .with_hp(100)
        .with_sp(4)
        .with_spells(&[SpellId::FlameArrow]);
    let mut h = CombatHarness::new(party_of(vec![wizard]), one_orc());
    h.start();
    assert!(h.advance_until(Mode::SelectOption));
    let round = h.session.round();

    h.press('c');
    h.press('1');
    assert_eq!(h.session.mode(), Mode::SpellResult);
    assert_eq!(h.session.party().members[0].sp, 2);

    assert!(h.advance_until(Mode::SelectOption));
    assert!(h.session.round() > round);
}

#[test]
fn test_view_requests_go_to_the_game() {
    let party = party_of(vec![knight("GALA"), knight("BRON")]);
    let mut h = CombatHarness::new(party, one_orc());
    h.start();
    assert!(h.advance_until(Mode::SelectOption));

    h.press('p');
    h.press('q');
    h.press('u');
    h.press('2');

    for view in [
        ViewRequest::Protect,
        ViewRequest::QuickRef,
        ViewRequest::Use,
        ViewRequest::CharacterView(1),
    ] {
        assert!(h.events.contains(GAME_TOPIC, &GameMessage::OpenView(view)));
    }
    // None of them use up the turn
    assert_eq!(h.session.mode(), Mode::SelectOption);
    assert_eq!(h.session.current_position(), 0);
}

#[test]
fn test_item_result_from_game() {
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), one_orc());
    h.start();
    assert!(h.advance_until(Mode::SelectOption));
    let round = h.session.round();

    h.press('u');
    h.session.msg_game(GameMessage::SpellResult {
        x: 2,
        text: "THE WAND GLOWS".into(),
    });
    assert_eq!(h.session.mode(), Mode::SpellResult);
    assert!(h.screen.contains("  THE WAND GLOWS"));

    // The item used up the turn
    assert!(h.advance_until(Mode::SelectOption));
    assert!(h.session.round() > round);
}

#[test]
fn test_zero_delay_result_waits_for_a_key() {
    let mut config = test_config();
    config.delay = 0;
    config.rules.retreat_chance = 0;
    let mut h = CombatHarness::with_config(config, party_of(vec![knight("GALA")]), one_orc());
    h.start();
    assert!(h.advance_until(Mode::SelectOption));

    h.press('r');
    assert_eq!(h.session.mode(), Mode::SpellResult);
    assert!(h.screen.contains("THE PARTY COULDN'T ESCAPE!"));
    assert!(!h.session.is_delay_active());
    assert!(!h.skip());

    h.press('x');
    assert_ne!(h.session.mode(), Mode::SpellResult);
    assert!(h.session.is_open());
}
