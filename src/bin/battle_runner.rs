//! Headless Battle Runner
//!
//! Auto-battles one stage with a generated party and prints the result as
//! JSON or text. Useful for balancing data files and AI personalities.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use hex_tactics::battle::ai::{load_personality, AiCommander, AiPersonality};
use hex_tactics::battle::{
    BattleEventType, BattleOptions, BattleOutcome, BattleResult, BattleSetup, BattleSystem,
    Catalog, PartyMember, RecordingHost, StandardFormulas,
};
use hex_tactics::core::config::EngineConfig;
use hex_tactics::core::error::Result;
use hex_tactics::core::types::TeamId;
use hex_tactics::grid::HexGrid;

/// Headless Battle Runner - auto-battle a stage
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Auto-battle a stage and print the result")]
struct Args {
    #[arg(long, default_value_t = 1)]
    chapter: u32,

    #[arg(long, default_value_t = 1)]
    stage: u32,

    /// Party classes, leader first
    #[arg(long, value_delimiter = ',', default_value = "KNIGHT,ARCHER,MAGE,CLERIC")]
    party: Vec<String>,

    /// Party level
    #[arg(long, default_value_t = 1)]
    level: i32,

    /// Data directory holding classes/skills/campaign TOML; builtin data if omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// Engine config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// AI personality name (loaded from data/ai_personalities/)
    #[arg(long, default_value = "default")]
    personality: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before giving up
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the event log to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    outcome: String,
    finished: bool,
    rounds: u32,
    ticks: u64,
    player_survivors: usize,
    enemy_survivors: usize,
    result: Option<BattleResult>,
    personality: String,
    seed: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hex_tactics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "Battle runner failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);

    let catalog = match &args.data {
        Some(dir) => Catalog::load_dir(dir)?,
        None => Catalog::builtin()?,
    };
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.battle.turn_settle_ticks = 0;
    config.battle.max_idle_ticks = args.max_ticks;

    let personality_dir = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from("data"))
        .join("ai_personalities");
    let personality = load_personality(&personality_dir, &args.personality).unwrap_or_else(|e| {
        tracing::warn!(name = %args.personality, %e, "Using default personality");
        AiPersonality::default()
    });
    let personality_name = personality.name.clone();

    let mut party = Vec::new();
    for (i, class) in args.party.iter().enumerate() {
        let unit = catalog.spawn_unit(class, args.level, TeamId::PLAYER, &StandardFormulas)?;
        party.push(PartyMember::new(unit, -4, i as i32));
    }

    let options = BattleOptions::default()
        .with_config(config.battle.clone())
        .with_strategy(AiCommander::with_seed(personality, seed))
        .with_auto_battle(true);

    let mut battle = BattleSystem::new(
        HexGrid::with_projection(config.projection),
        RecordingHost::new(),
        &catalog,
        BattleSetup {
            chapter: args.chapter,
            stage: args.stage,
            party,
        },
        options,
    )?;

    let ticks = battle.run_until_idle();
    let events = battle.drain_events();

    if args.verbose {
        for event in &events {
            eprintln!("  [{} r{}] {}", event.tick, event.round, event.description);
        }
    }
    let spawn_skips = events
        .iter()
        .filter(|e| matches!(e.event_type, BattleEventType::SpawnSkipped { .. }))
        .count();
    if spawn_skips > 0 {
        tracing::warn!(spawn_skips, "Some enemies were not spawned");
    }

    let alive = |player: bool| {
        battle
            .units()
            .iter()
            .filter(|u| u.is_alive() && u.is_player_side() == player)
            .count()
    };
    let report = RunReport {
        outcome: match battle.outcome() {
            Some(BattleOutcome::Victory) => "victory".to_string(),
            Some(BattleOutcome::Defeat) => "defeat".to_string(),
            None => "unfinished".to_string(),
        },
        finished: battle.is_over(),
        rounds: battle.round(),
        ticks,
        player_survivors: alive(true),
        enemy_survivors: alive(false),
        result: battle.host().last().cloned(),
        personality: personality_name,
        seed,
    };

    match args.format.as_str() {
        "text" => {
            println!("Battle Result");
            println!("=============");
            println!("Stage: {}-{}", args.chapter, args.stage);
            println!("Outcome: {}", report.outcome);
            println!("Rounds: {}", report.rounds);
            println!("Ticks: {}", report.ticks);
            println!("Survivors: {} vs {}", report.player_survivors, report.enemy_survivors);
            if let Some(result) = &report.result {
                println!("Gold: {}", result.reward_gold);
            }
            println!();
            println!("Personality: {}", report.personality);
            println!("Seed: {}", report.seed);
        }
        other => {
            if other != "json" {
                tracing::warn!(format = %other, "Unknown format, defaulting to json");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
