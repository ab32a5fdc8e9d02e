//! Auto-battle runs against the shipped data

use std::time::Duration;

use hex_tactics::battle::ai::load_personality;
use hex_tactics::battle::*;
use hex_tactics::core::config::{BattleConfig, PresentationConfig};
use hex_tactics::core::types::TeamId;
use hex_tactics::grid::HexGrid;
use hex_tactics::render::{retire_projectiles, FixedStep, PresentationTable};

const PARTY: [&str; 4] = ["KNIGHT", "ARCHER", "MAGE", "CLERIC"];

fn party(catalog: &Catalog, level: i32) -> Vec<PartyMember> {
    PARTY
        .iter()
        .enumerate()
        .map(|(i, class)| {
            let unit = catalog
                .spawn_unit(class, level, TeamId::PLAYER, &StandardFormulas)
                .unwrap();
            PartyMember::new(unit, -4, i as i32)
        })
        .collect()
}

fn auto_battle(chapter: u32, stage: u32, seed: u64, config: BattleConfig) -> BattleSystem<RecordingHost> {
    let catalog = Catalog::builtin().unwrap();
    let setup = BattleSetup {
        chapter,
        stage,
        party: party(&catalog, 3),
    };
    let options = BattleOptions::headless(seed)
        .with_config(config)
        .with_auto_battle(true);
    BattleSystem::new(HexGrid::new(), RecordingHost::new(), &catalog, setup, options).unwrap()
}

#[test]
fn test_same_seed_same_battle() {
    let mut first = auto_battle(1, 1, 99, BattleConfig::headless());
    let mut second = auto_battle(1, 1, 99, BattleConfig::headless());

    first.run_until_idle();
    second.run_until_idle();

    assert_eq!(first.drain_events(), second.drain_events());
    assert_eq!(first.outcome(), second.outcome());
    assert_eq!(first.host().results, second.host().results);
}

#[test]
fn test_auto_battles_finish() {
    for (chapter, stage) in [(1, 1), (2, 1)] {
        let mut battle = auto_battle(chapter, stage, 5, BattleConfig::headless());
        battle.run_until_idle();

        assert!(battle.is_over(), "stage {chapter}-{stage} did not finish");
        assert_eq!(battle.host().results.len(), 1);
        let result = battle.host().last().unwrap();
        assert_eq!((result.chapter, result.stage), (chapter, stage));
        assert!(!result.surrender);
    }
}

#[test]
fn test_enemies_act_without_auto_battle() {
    let catalog = Catalog::builtin().unwrap();
    let mut battle = BattleSystem::new(
        HexGrid::new(),
        RecordingHost::new(),
        &catalog,
        BattleSetup {
            chapter: 1,
            stage: 1,
            party: party(&catalog, 1),
        },
        BattleOptions::headless(11),
    )
    .unwrap();

    for _ in 0..PARTY.len() {
        battle.run_until_idle();
        if battle.is_over() {
            break;
        }
        assert_eq!(battle.phase(), BattlePhase::AwaitingInput);
        assert!(battle.current_unit().unwrap().is_player_side());
        battle.end_turn().unwrap();
    }
    battle.run_until_idle();

    let enemy_turns = battle
        .drain_events()
        .iter()
        .filter(|e| match e.event_type {
            BattleEventType::TurnStarted { unit_id } => !battle.unit(unit_id).unwrap().is_player_side(),
            _ => false,
        })
        .count();
    assert!(enemy_turns > 0);
}

#[test]
fn test_shipped_personalities_load() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/data/ai_personalities");
    for name in ["default", "aggressive", "skirmisher"] {
        let personality = load_personality(dir, name).unwrap();
        assert!(personality.validate().is_ok(), "{name} failed validation");
    }
}

#[test]
fn test_frame_loop_with_presentation() {
    let mut battle = auto_battle(1, 1, 21, BattleConfig::default());
    let mut clock = FixedStep::from_step(Duration::from_millis(10));
    let mut table = PresentationTable::new(PresentationConfig::default());
    table.sync(battle.units(), battle.grid());
    let mut saw_projectile = false;

    for _ in 0..500_000 {
        if battle.is_over() {
            break;
        }
        for _ in 0..clock.advance_duration(Duration::from_millis(16)) {
            battle.tick();
        }
        let events = battle.drain_events();
        table.absorb(&events, battle.grid());
        table.step(0.016);
        saw_projectile |= !battle.projectiles().is_empty();
        retire_projectiles(battle.projectiles_mut(), 0.016);
    }

    assert!(battle.is_over());
    assert!(saw_projectile, "archers and mages fire from range");
    assert_eq!(table.len(), battle.units().len());
}
