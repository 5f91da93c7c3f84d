// ═══════════════════════════════════════════════════════════════════════
// Runner: CLI entry point for headless campaigns and planner inspection.
// ═══════════════════════════════════════════════════════════════════════

mod sim;

use clap::{Parser, Subcommand};
use march_engine::map;
use march_engine::rules::MapVariant;
use march_engine::setup::create_initial_state;
use march_engine::types::Faction;
use march_planner::{plan_road_defense, MissionKind, MissionList, PlannerConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Parser)]
#[command(name = "march-runner", about = "Greymarch border-war campaign simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a campaign and print the closing ledger
    Play {
        #[arg(short, long, default_value_t = 20)]
        turns: u32,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Map variant: "greymarch" or "base"
        #[arg(short, long, default_value = "greymarch")]
        variant: String,
    },
    /// Show the defense missions a faction would open with
    Plan {
        /// Faction: "corvayne", "drakmar", "ilvress", or "thornwood"
        #[arg(short, long, default_value = "drakmar")]
        faction: String,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
    /// Run a campaign and write the final state as JSON
    Snapshot {
        #[arg(short, long, default_value_t = 20)]
        turns: u32,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Output path; stdout when omitted
        #[arg(short, long)]
        out: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            turns,
            seed,
            variant,
        } => cmd_play(turns, seed, &variant),
        Commands::Plan { faction, seed } => cmd_plan(&faction, seed),
        Commands::Snapshot { turns, seed, out } => cmd_snapshot(turns, seed, out.as_deref()),
    }
}

fn parse_variant(name: &str) -> MapVariant {
    match name {
        "base" => MapVariant::Base,
        _ => MapVariant::Greymarch,
    }
}

fn parse_faction(name: &str) -> Faction {
    match name.to_lowercase().as_str() {
        "corvayne" => Faction::Corvayne,
        "ilvress" => Faction::Ilvress,
        "thornwood" => Faction::Thornwood,
        _ => Faction::Drakmar,
    }
}

fn cmd_play(turns: u32, seed: u64, variant: &str) {
    println!("=== Greymarch Campaign ===\n");
    println!(
        "Running campaign: turns={}, seed={}, variant={}\n",
        turns, seed, variant
    );

    let result = sim::run_campaign(parse_variant(variant), turns, seed);

    println!("Campaign finished after turn {}.", result.state.turn);
    println!(
        "  Commands issued: {}, rejected: {}",
        result.commands_issued, result.commands_rejected
    );
    println!();
    println!("  Closing ledger:");
    for &faction in &Faction::ALL {
        let fs = result.state.faction(faction);
        let holdings = result
            .state
            .locations
            .iter()
            .filter(|l| l.owner == Some(faction))
            .count();
        let men: u32 = result
            .state
            .armies
            .iter()
            .filter(|a| a.faction == faction)
            .map(|a| a.strength)
            .sum();
        println!(
            "    {:10} -- gold: {}, holdings: {}, men under arms: {}",
            faction.to_string(),
            fs.gold,
            holdings,
            men
        );
    }
}

fn cmd_plan(faction_name: &str, seed: u64) {
    let faction = parse_faction(faction_name);
    let state = create_initial_state(MapVariant::Greymarch);
    let mut book = MissionList::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    plan_road_defense(
        &state,
        faction,
        state.turn,
        &mut book,
        &PlannerConfig::default(),
        &mut rng,
    );

    println!("=== Opening missions: {} ===\n", faction);
    if book.is_empty() {
        println!("No defense missions. The border is quiet.");
        return;
    }
    for mission in book.by_priority() {
        let MissionKind::RoadDefense {
            road,
            stage,
            objective,
        } = mission.kind;
        println!(
            "  {:>6.1}  {:?} {} on {}",
            mission.priority,
            objective,
            map::stage_name(stage),
            map::road_name(road)
        );
    }
}

fn cmd_snapshot(turns: u32, seed: u64, out: Option<&str>) {
    let result = sim::run_campaign(MapVariant::Greymarch, turns, seed);

    match serde_json::to_string_pretty(&result.state) {
        Ok(json) => match out {
            Some(path) => match std::fs::write(path, &json) {
                Ok(()) => println!("Snapshot after turn {} written to {}", result.state.turn, path),
                Err(e) => eprintln!("Snapshot error: {}", e),
            },
            None => println!("{}", json),
        },
        Err(e) => eprintln!("Snapshot error: {}", e),
    }
}
