//! Invariants that hold at every step of a fight

use skirmish::combat::status::STATUS_PARALYZED;
use skirmish::combat::{
    decode_status, CombatSession, Encounter, Mode, Monster, MonsterSpell, MonsterStatus,
    SelectedOption, STATUS_DEAD,
};
use skirmish::ui::{InputBindings, KeybindingMode, Keymap};

use crate::harness::{knight, party_of, CombatHarness};

fn mixed_encounter() -> Encounter {
    let mut goblin = Monster::new("GOBLIN", 3);
    goblin.advances = true;
    let mut thief = Monster::new("THIEF", 2).with_speed(15);
    thief.infiltrates = true;
    let witch = Monster::new("WITCH", 3)
        .with_speed(12)
        .with_spell(MonsterSpell::FireBlast, 30);

    Encounter::new(vec![
        Monster::new("ORC", 3),
        Monster::new("RAT", 1),
        goblin,
        witch,
        thief,
    ])
}

fn check_invariants(session: &CombatSession, keymap: &Keymap) {
    if !session.is_open() {
        return;
    }
    let mode = session.mode();

    if !mode.is_monster_turn() {
        assert_eq!(session.active_monster(), None, "highlight left on in {:?}", mode);
    }

    if mode != Mode::SelectOption {
        assert_eq!(keymap.mode(), KeybindingMode::Menus, "bindings in {:?}", mode);
    } else if session.option() == SelectedOption::None {
        assert_eq!(keymap.mode(), KeybindingMode::Combat);
    }

    assert!(session.attackable_count() <= session.alive_indices().len());
    assert!(session.attackable_count() <= session.attackers_count());
}

#[test]
fn test_invariants_through_a_whole_fight() {
    let party = party_of(vec![knight("GALA"), knight("BRON")]);
    let mut h = CombatHarness::new(party, mixed_encounter());
    h.start();

    for _ in 0..1000 {
        check_invariants(&h.session, &h.keymap);
        if !h.session.is_open() {
            break;
        }

        if h.session.mode() == Mode::SelectOption {
            h.press('f');
            check_invariants(&h.session, &h.keymap);
            if h.session.option() == SelectedOption::Fight {
                // Last target in reach
                let last = h.session.attackable_count() - 1;
                h.press((b'a' + last as u8) as char);
            }
        } else {
            assert!(h.skip(), "stalled in {:?}", h.session.mode());
        }
    }

    assert!(!h.session.is_open());
    assert_eq!(
        h.session.outcome(),
        Some(skirmish::combat::CombatOutcome::Victory)
    );
    assert_eq!(h.session.total_experience(), 50);
}

#[test]
fn test_attackable_count_recomputed_after_death() {
    let encounter = Encounter::new(vec![Monster::new("RAT", 1), Monster::new("ORC", 400)]);
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), encounter);
    h.start();

    assert!(h.advance_until(Mode::SelectOption));
    h.press('f');
    assert_eq!(h.session.attackable_count(), 2);

    // Keep hitting the rat until it is gone
    for _ in 0..30 {
        if !h.session.alive_indices().contains(&0) {
            break;
        }
        if h.session.option() != SelectedOption::Fight {
            h.press('f');
        }
        h.press('a');
        assert!(h.advance_until(Mode::SelectOption));
    }
    assert_eq!(h.session.alive_indices(), &[1]);
    assert!(h.session.attackable_count() <= 1);

    // One monster left: Fight strikes it without a sub-menu
    h.press('f');
    assert_ne!(h.session.option(), SelectedOption::Fight);
    assert!(h.screen.contains("GALA ATTACKS ORC"));
}

#[test]
fn test_end_delay_without_pending_delay() {
    let mut h = CombatHarness::new(
        party_of(vec![knight("GALA")]),
        Encounter::new(vec![Monster::new("ORC", 40)]),
    );
    h.start();
    assert!(h.advance_until(Mode::SelectOption));
    assert!(!h.session.is_delay_active());

    let generation = h.screen.generation();
    let snapshot = h.session.snapshot();
    let events = h.events.len();

    assert!(!h.skip());
    assert!(!h.skip());

    assert_eq!(h.screen.generation(), generation);
    assert_eq!(h.session.snapshot(), snapshot);
    assert_eq!(h.session.mode(), Mode::SelectOption);
    assert_eq!(h.events.len(), events);
}

#[test]
fn test_status_decoding() {
    assert_eq!(decode_status(0b0000_0001, 5, 5), Some(MonsterStatus::Paralyzed));
    assert_eq!(decode_status(STATUS_PARALYZED, 1, 5), Some(MonsterStatus::Paralyzed));
    assert_eq!(decode_status(STATUS_DEAD, 0, 5), Some(MonsterStatus::Dead));
    assert_eq!(decode_status(STATUS_DEAD, 5, 5), Some(MonsterStatus::Dead));
    assert_eq!(decode_status(0, 3, 5), Some(MonsterStatus::Wounded));
    assert_eq!(decode_status(0, 5, 5), None);
    assert_eq!(decode_status(0b1000_0000, 5, 5), Some(MonsterStatus::Afraid));
}
