use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use rand::Rng;

use holt_blocks::{BlockId, BlockRegistry};
use holt_world::{GameRules, Player, ViewCell, World, WorldGenParams, load_params_from_path};

use crate::config::Config;

pub const DEFAULT_WORLD: &str = "default";

/// One row of `list_online`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OnlineEntry {
    pub name: String,
    pub health: i32,
    pub pos: (i32, i32, i32),
}

/// Top-level registry: owns every world and the player→world mapping, and
/// flushes the whole store after each mutating operation. All mutation goes
/// through `&mut self`; embedders that need concurrency wrap the directory
/// in their own mutual-exclusion boundary.
pub struct Directory {
    worlds: HashMap<String, World>,
    player_worlds: HashMap<String, String>,
    reg: Arc<BlockRegistry>,
    params: WorldGenParams,
    rules: GameRules,
    seed: i32,
    store_path: PathBuf,
}

impl Directory {
    /// Loads the catalog (fatal if missing), the worldgen params (defaults
    /// if missing), and the persisted store (empty if missing).
    pub fn new(cfg: &Config) -> Result<Self, Box<dyn Error>> {
        let reg = Arc::new(BlockRegistry::from_path(&cfg.blocks_path)?);
        let params = if cfg.worldgen_path.exists() {
            match load_params_from_path(&cfg.worldgen_path) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!(
                        "{} parse error: {e}; using worldgen defaults",
                        cfg.worldgen_path.display()
                    );
                    WorldGenParams::default()
                }
            }
        } else {
            log::info!(
                "worldgen config {} not found; using defaults",
                cfg.worldgen_path.display()
            );
            WorldGenParams::default()
        };
        let loaded = holt_io::load_store(&cfg.store_path, cfg.seed, &params, &cfg.rules, &reg)?;
        let mut worlds = HashMap::new();
        let mut player_worlds = HashMap::new();
        for world in loaded {
            for pid in world.players.keys() {
                player_worlds.insert(pid.clone(), world.id.clone());
            }
            worlds.insert(world.id.clone(), world);
        }
        log::info!(
            "directory up: {} world(s), {} player(s)",
            worlds.len(),
            player_worlds.len()
        );
        Ok(Self {
            worlds,
            player_worlds,
            reg,
            params,
            rules: cfg.rules.clone(),
            seed: cfg.seed,
            store_path: cfg.store_path.clone(),
        })
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    pub fn world(&self, world_id: &str) -> Option<&World> {
        self.worlds.get(world_id)
    }

    pub fn world_mut(&mut self, world_id: &str) -> Option<&mut World> {
        self.worlds.get_mut(world_id)
    }

    fn world_of(&self, player_id: &str) -> Option<&World> {
        let wid = self.player_worlds.get(player_id)?;
        self.worlds.get(wid)
    }

    fn world_of_mut(&mut self, player_id: &str) -> Option<&mut World> {
        let wid = self.player_worlds.get(player_id)?;
        self.worlds.get_mut(wid)
    }

    /// Every mutating operation ends here. A failed flush is logged and the
    /// operation still counts: the in-memory state is authoritative until
    /// the next successful write.
    fn flush(&self) {
        if let Err(e) = holt_io::save_store(&self.store_path, self.worlds.values(), &self.reg) {
            log::error!("failed to write store {}: {e}", self.store_path.display());
        }
    }

    fn home(&self) -> (i32, i32, i32) {
        (0, 0, self.params.air_height + 1)
    }

    /// Joins (or re-joins) a player to a world, creating both lazily. New
    /// players spawn at a uniformly random column near the origin; terrain
    /// solidity at the spawn point is deliberately not checked.
    pub fn join_world(
        &mut self,
        player_id: &str,
        name: &str,
        world_id: Option<&str>,
    ) -> Result<(&World, &Player), Box<dyn Error>> {
        let wid = world_id.unwrap_or(DEFAULT_WORLD).to_string();
        if !self.worlds.contains_key(&wid) {
            let world = World::new(&wid, self.seed, &self.params, self.rules.clone(), self.reg.clone())?;
            self.worlds.insert(wid.clone(), world);
        }
        let spawn = {
            let r = self.rules.spawn_radius;
            let mut rng = rand::rng();
            (
                rng.random_range(-r..=r),
                rng.random_range(-r..=r),
                self.params.air_height + 1,
            )
        };
        if let Some(world) = self.worlds.get_mut(&wid) {
            world.add_player(player_id, name, spawn);
        }
        self.player_worlds.insert(player_id.to_string(), wid.clone());
        self.flush();
        let world = self.worlds.get(&wid).ok_or("world vanished during join")?;
        let player = world
            .get_player(player_id)
            .ok_or("player vanished during join")?;
        Ok((world, player))
    }

    /// Attacks whoever stands exactly at the target coordinate in the
    /// attacker's world. A lethal hit teleports the target home and heals
    /// them to full within this same call; there is no separate death event.
    pub fn attack(
        &mut self,
        attacker_id: &str,
        target: (i32, i32, i32),
    ) -> (Option<String>, i32) {
        let damage = self.rules.attack_damage;
        let home = self.home();
        let Some(world) = self.world_of_mut(attacker_id) else {
            return (None, 0);
        };
        let target_id = world
            .find_player_at(target.0, target.1, target.2, Some(attacker_id))
            .map(|p| p.id.clone());
        let Some(tid) = target_id else {
            return (None, 0);
        };
        let Some(target_player) = world.players.get_mut(&tid) else {
            return (None, 0);
        };
        let name = target_player.name.clone();
        if !target_player.take_damage(damage) {
            target_player.pos = home;
            target_player.heal(holt_world::MAX_HEALTH);
        }
        self.flush();
        (Some(name), damage)
    }

    /// Everyone else in the caller's world.
    pub fn list_online(&self, player_id: &str) -> Vec<OnlineEntry> {
        let Some(world) = self.world_of(player_id) else {
            return Vec::new();
        };
        world
            .players
            .values()
            .filter(|p| p.id != player_id)
            .map(|p| OnlineEntry {
                name: p.name.clone(),
                health: p.health,
                pos: p.pos,
            })
            .collect()
    }

    pub fn get_player_position(&self, player_id: &str) -> Option<(i32, i32, i32)> {
        self.world_of(player_id)?.get_player_position(player_id)
    }

    pub fn get_block(&self, player_id: &str, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.world_of(player_id)
            .map(|w| w.get_block(x, y, z, Some(player_id)))
    }

    pub fn get_view(&self, player_id: &str) -> Vec<Vec<ViewCell>> {
        self.world_of(player_id)
            .map(|w| w.get_view(player_id))
            .unwrap_or_default()
    }

    pub fn move_player(&mut self, player_id: &str, dx: i32, dy: i32, dz: i32) -> bool {
        let moved = self
            .world_of_mut(player_id)
            .map(|w| w.move_player(player_id, dx, dy, dz))
            .unwrap_or(false);
        if moved {
            self.flush();
        }
        moved
    }

    pub fn break_block(&mut self, player_id: &str, x: i32, y: i32, z: i32) -> Option<BlockId> {
        let dropped = self
            .world_of_mut(player_id)
            .and_then(|w| w.break_block(x, y, z, player_id));
        if dropped.is_some() {
            self.flush();
        }
        dropped
    }

    pub fn place_block(&mut self, player_id: &str, x: i32, y: i32, z: i32, block: BlockId) -> bool {
        let placed = self
            .world_of_mut(player_id)
            .map(|w| w.place_block(x, y, z, block, player_id))
            .unwrap_or(false);
        if placed {
            self.flush();
        }
        placed
    }
}
