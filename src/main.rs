//! Space War headless driver
//!
//! Runs the arena at a fixed 30 Hz step with a scripted player and prints
//! the final score snapshot as JSON.
//!
//! Usage:
//!   space-war --ticks 900 --seed 7
//!   RUST_LOG=debug space-war --options arena.json --fire-every 10

use anyhow::{Context, Result, bail};
use clap::Parser;

use space_war::ArenaOptions;
use space_war::consts::SIM_DT;
use space_war::sim::{Arena, PlayerCommand, TickInput, tick};

#[derive(Parser)]
#[command(name = "space-war")]
#[command(about = "Run the Space War arena headless and report the score")]
struct Args {
    /// Number of 30 Hz ticks to simulate
    #[arg(long, default_value_t = 900)]
    ticks: u64,

    /// RNG seed (overrides the options file)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with arena options
    #[arg(long)]
    options: Option<String>,

    /// Scripted player fires every N ticks (0 disables firing)
    #[arg(long, default_value_t = 15)]
    fire_every: u64,
}

/// Commands for the scripted player on tick `n`
fn scripted_commands(n: u64, fire_every: u64) -> Vec<PlayerCommand> {
    let mut commands = Vec::new();
    if n % 20 == 0 {
        commands.push(PlayerCommand::TurnLeft);
    }
    if fire_every > 0 && n % fire_every == 0 {
        commands.push(PlayerCommand::FireBullet);
    }
    if fire_every > 0 && n % (fire_every * 8) == 0 {
        commands.push(PlayerCommand::FireBounce);
    }
    if n > 0 && n % 300 == 0 {
        commands.push(PlayerCommand::FireBomb);
    }
    commands
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.ticks == 0 {
        bail!("--ticks must be > 0");
    }

    let mut options = match &args.options {
        Some(path) => ArenaOptions::load(path)
            .with_context(|| format!("loading arena options from {path}"))?,
        None => ArenaOptions::default(),
    };
    if let Some(seed) = args.seed {
        options.seed = seed;
    }

    log::info!("Space War (headless) starting, {} ticks", args.ticks);
    let mut arena = Arena::new(options);

    for n in 0..args.ticks {
        let input = TickInput {
            commands: scripted_commands(n, args.fire_every),
            ..Default::default()
        };
        tick(&mut arena, &input, SIM_DT);
    }
    arena.quit();

    let snapshot = arena.get_score_snapshot();
    let json = serde_json::to_string_pretty(&snapshot).context("serializing score snapshot")?;
    println!("{json}");
    Ok(())
}
