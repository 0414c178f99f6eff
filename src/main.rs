use std::error::Error;
use std::path::Path;

use clap::Parser;
use rand::Rng;

use holt::{Directory, load_config};

/// Headless smoke run over the world core: boot the directory, join a
/// player, wander, mine, and report. Useful for eyeballing a store file and
/// for checking a config without any client attached.
#[derive(Parser, Debug)]
#[command(name = "holt")]
struct Args {
    /// Runtime config file.
    #[arg(long, default_value = "holt.toml")]
    config: String,
    /// Player id to join with.
    #[arg(long, default_value = "smoke")]
    player: String,
    /// Display name for the player.
    #[arg(long, default_value = "Smoke")]
    name: String,
    /// World to join.
    #[arg(long)]
    world: Option<String>,
    /// Random walk steps to attempt.
    #[arg(long, default_value_t = 16)]
    steps: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let cfg = load_config(Path::new(&args.config));
    let mut dir = Directory::new(&cfg)?;

    let (world_id, spawn, population) = {
        let (world, player) = dir.join_world(&args.player, &args.name, args.world.as_deref())?;
        (world.id.clone(), player.pos, world.players.len())
    };
    log::info!("joined {world_id} at {spawn:?} ({population} player(s) total)");

    let mut rng = rand::rng();
    let mut moved = 0u32;
    for _ in 0..args.steps {
        let (dx, dy) = [(1, 0), (-1, 0), (0, 1), (0, -1)][rng.random_range(0..4)];
        // Try level ground first, then a step up or down, like a client
        // nudging a player across terrain.
        for dz in [0, 1, -1] {
            if dir.move_player(&args.player, dx, dy, dz) {
                moved += 1;
                break;
            }
        }
    }

    if let Some((x, y, z)) = dir.get_player_position(&args.player) {
        log::info!("wandered {moved}/{} steps, now at ({x},{y},{z})", args.steps);
        match dir.break_block(&args.player, x, y, z - 1) {
            Some(drop) => log::info!(
                "mined the block underfoot, picked up {}",
                dir.registry().name_of(drop).unwrap_or("?")
            ),
            None => log::info!("nothing mineable underfoot"),
        }
    }

    let others = dir.list_online(&args.player);
    log::info!("{} other player(s) online", others.len());
    for entry in others {
        log::info!("  {} hp={} at {:?}", entry.name, entry.health, entry.pos);
    }
    Ok(())
}
