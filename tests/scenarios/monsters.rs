//! Monster turn scenarios

use skirmish::combat::status::{STATUS_ASLEEP, STATUS_WEBBED};
use skirmish::combat::{Encounter, Mode, Monster, MonsterSpell};
use skirmish::ui::{InputBindings, KeybindingMode, Sound};

use crate::harness::{knight, party_of, CombatHarness};

fn front_rank_of_one(monsters: Vec<Monster>) -> Encounter {
    let mut encounter = Encounter::new(monsters);
    encounter.attackers_count = Some(1);
    encounter
}

#[test]
fn test_back_rank_monster_advances() {
    let mut goblin = Monster::new("GOBLIN", 20);
    goblin.advances = true;
    let encounter = front_rank_of_one(vec![Monster::new("ORC", 20), goblin]);
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), encounter);
    h.start();

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::MonsterAdvances);
    assert_eq!(h.session.alive_indices(), &[1, 0]);
    assert_eq!(h.session.active_monster(), Some(0));
    assert!(h.screen.contains("GOBLIN ADVANCES!"));
    assert!(h.screen.has_inverse(0));
    assert_eq!(h.keymap.mode(), KeybindingMode::Menus);

    assert!(h.advance_until(Mode::SelectOption));
    assert_eq!(h.session.active_monster(), None);
}

#[test]
fn test_infiltrator_slips_to_the_front() {
    let mut thief = Monster::new("THIEF", 10).with_speed(20);
    thief.infiltrates = true;
    let encounter = front_rank_of_one(vec![Monster::new("ORC", 20).with_speed(1), thief]);
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), encounter);
    h.start();

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::Infiltration);
    assert_eq!(h.session.alive_indices(), &[1, 0]);
    assert_eq!(h.session.active_monster(), None);
    assert!(h.screen.contains("THIEF INFILTRATES THE PARTY!"));
    assert_eq!(h.sounds.count(Sound::Alert), 2);

    assert!(h.advance_until(Mode::SelectOption));
}

#[test]
fn test_back_rank_monster_waits_for_opening() {
    let encounter = front_rank_of_one(vec![
        Monster::new("ORC", 20).with_speed(1),
        Monster::new("KOBOLD", 10).with_speed(20),
    ]);
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), encounter);
    h.start();

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::WaitsForOpening);
    assert!(h.screen.contains("KOBOLD WAITS FOR AN OPENING"));
    assert_eq!(h.session.alive_indices(), &[0, 1]);

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::SelectOption);
}

/// Two staged lines on one row are shown one after the other
#[test]
fn test_monster_spell_reveals_shared_rows_one_at_a_time() {
    let witch = Monster::new("WITCH", 30)
        .with_speed(20)
        .with_spell(MonsterSpell::FireBlast, 100);
    let party = party_of(vec![knight("GALA"), knight("BRON")]);
    let mut h = CombatHarness::new(party, Encounter::new(vec![witch]));
    h.start();

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::MonsterSpell);
    assert_eq!(h.session.active_monster(), Some(0));

    let staged: Vec<_> = h.session.monster_spell_lines().to_vec();
    assert_eq!(staged.len(), 3);
    assert_eq!(staged[0].text, "WITCH CASTS FIRE BLAST");
    assert_eq!(staged[1].y, staged[2].y);
    assert!(h.screen.contains(&staged[0].text));
    assert!(h.screen.contains(&staged[1].text));
    assert!(!h.screen.contains(&staged[2].text));

    // The first of the pair is dropped and the view redrawn
    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::MonsterSpell);
    assert_eq!(h.session.monster_spell_lines().len(), 2);
    assert!(h.screen.contains(&staged[2].text));
    assert!(!h.screen.contains(&staged[1].text));
    assert!(h.session.is_delay_active());

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::SelectOption);
    for member in &h.session.party().members {
        assert!(member.hp < 1000);
    }
}

#[test]
fn test_monster_flees() {
    let mut orc = Monster::new("ORC", 20).with_speed(20);
    orc.flee_chance = 100;
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), Encounter::new(vec![orc]));
    h.start();

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::MonsterFlees);
    assert!(h.screen.contains("ORC FLEES!"));

    // Nobody left to fight, and nothing was killed
    assert!(h.skip());
    assert!(h.session.alive_indices().is_empty());
    assert_eq!(h.session.mode(), Mode::DefeatedMonsters);
    assert_eq!(h.session.total_experience(), 0);
}

#[test]
fn test_monster_wanders() {
    let mut orc = Monster::new("ORC", 20).with_speed(20);
    orc.wander_chance = 100;
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), Encounter::new(vec![orc]));
    h.start();

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::MonsterWanders);
    assert!(h.screen.contains("ORC WANDERS AIMLESSLY"));
    assert_eq!(h.session.party().members[0].hp, 1000);
}

#[test]
fn test_monster_attack_shows_lines() {
    let orc = Monster::new("ORC", 20).with_speed(20).with_attack_style(1);
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), Encounter::new(vec![orc]));
    h.start();

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::MonsterAttack);
    assert_eq!(h.session.active_monster(), Some(0));
    assert!(h.screen.line(20).starts_with("ORC BITES GALA"));
    assert!(h.screen.line(21).contains("MISSES") || h.screen.line(21).contains("HITS"));
}

#[test]
fn test_regenerating_monster() {
    let mut troll = Monster::new("TROLL", 20).with_speed(1);
    troll.regenerates = true;
    troll.hp = 10;
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), Encounter::new(vec![troll]));
    h.start();
    assert!(h.screen.contains("WOUNDED"));

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::MonstersAffected);
    assert!(h.screen.contains("MONSTERS REGENERATE!"));
    assert_eq!(h.session.encounter().monsters[0].hp, 12);

    assert!(h.skip());
    assert_eq!(h.session.mode(), Mode::SelectOption);
}

#[test]
fn test_status_labels_on_roster() {
    let mut bat = Monster::new("BAT", 5);
    bat.status = STATUS_ASLEEP | STATUS_WEBBED;
    let mut rat = Monster::new("RAT", 5);
    rat.hp = 3;
    let encounter = Encounter::new(vec![bat, rat, Monster::new("ORC", 5)]);
    let mut h = CombatHarness::new(party_of(vec![knight("GALA")]), encounter);
    h.start();

    // Lowest set bit wins
    assert!(h.screen.line(0).contains("A) BAT"));
    assert!(h.screen.line(0).ends_with("WEBBED"));
    assert!(h.screen.line(1).ends_with("WOUNDED"));
    assert!(h.screen.line(2).ends_with("C) ORC"));
}
