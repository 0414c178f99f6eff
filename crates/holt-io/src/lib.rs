//! Whole-store persistence for worlds and players.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use holt_blocks::BlockRegistry;
use holt_edit::EditLayer;
use holt_world::{GameRules, MAX_HEALTH, Player, World, WorldGenParams};

/// Serialized form of one world. Blocks are stored by catalog name, not id,
/// so a store survives catalog renumbering; `BTreeMap` keeps the output
/// stable and diffable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldRecord {
    pub world_id: String,
    #[serde(default)]
    pub global_edits: BTreeMap<String, String>,
    /// Raw JSON per player, so one malformed record cannot sink the rest of
    /// the world on load.
    #[serde(default)]
    pub players: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub pos: [i32; 3],
    pub health: i32,
    #[serde(default)]
    pub inventory: BTreeMap<String, u32>,
    #[serde(default)]
    pub edits: BTreeMap<String, String>,
}

/// The persisted store: world id to serialized world.
pub type StoreFile = BTreeMap<String, WorldRecord>;

fn coord_key(x: i32, y: i32, z: i32) -> String {
    format!("{x},{y},{z}")
}

fn parse_coord_key(key: &str) -> Option<(i32, i32, i32)> {
    let mut parts = key.split(',');
    let x = parts.next()?.trim().parse().ok()?;
    let y = parts.next()?.trim().parse().ok()?;
    let z = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((x, y, z))
}

fn encode_layer(layer: &EditLayer, reg: &BlockRegistry, what: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for ((x, y, z), b) in layer.iter() {
        match reg.name_of(b) {
            Some(name) if !name.is_empty() => {
                out.insert(coord_key(x, y, z), name.to_string());
            }
            _ => log::warn!("{what}: dropping override at {x},{y},{z}: block id {b} has no name"),
        }
    }
    out
}

fn decode_layer(map: &BTreeMap<String, String>, reg: &BlockRegistry, what: &str) -> EditLayer {
    let mut layer = EditLayer::new();
    for (key, name) in map {
        let Some((x, y, z)) = parse_coord_key(key) else {
            log::warn!("{what}: skipping malformed coordinate key {key:?}");
            continue;
        };
        match reg.id_by_name(name) {
            Some(id) => layer.set(x, y, z, id),
            None => log::warn!("{what}: skipping override at {key}: unknown block {name:?}"),
        }
    }
    layer
}

pub fn encode_world(world: &World, reg: &BlockRegistry) -> WorldRecord {
    let mut players = BTreeMap::new();
    for (pid, p) in &world.players {
        let mut inventory = BTreeMap::new();
        for (&item, &count) in &p.inventory {
            match reg.name_of(item) {
                Some(name) if !name.is_empty() => {
                    inventory.insert(name.to_string(), count);
                }
                _ => log::warn!("player {pid}: dropping inventory item id {item} with no name"),
            }
        }
        let rec = PlayerRecord {
            id: p.id.clone(),
            name: p.name.clone(),
            pos: [p.pos.0, p.pos.1, p.pos.2],
            health: p.health,
            inventory,
            edits: encode_layer(&p.edits, reg, &format!("player {pid}")),
        };
        match serde_json::to_value(&rec) {
            Ok(v) => {
                players.insert(pid.clone(), v);
            }
            Err(e) => log::warn!("world {}: failed to encode player {pid}: {e}", world.id),
        }
    }
    WorldRecord {
        world_id: world.id.clone(),
        global_edits: encode_layer(&world.global_edits, reg, &format!("world {}", world.id)),
        players,
    }
}

/// Rebuilds a world from its record. Generator state is reconstructed from
/// (seed, params), never from the store; decoration is regenerated around
/// every surviving player. A malformed player record is logged and skipped.
pub fn decode_world(
    rec: &WorldRecord,
    seed: i32,
    params: &WorldGenParams,
    rules: &GameRules,
    reg: &Arc<BlockRegistry>,
) -> Result<World, Box<dyn Error>> {
    let mut world = World::new(&rec.world_id, seed, params, rules.clone(), reg.clone())?;
    world.global_edits = decode_layer(&rec.global_edits, reg, &format!("world {}", rec.world_id));
    for (pid, raw) in &rec.players {
        match serde_json::from_value::<PlayerRecord>(raw.clone()) {
            Ok(pr) => {
                let mut p = Player::new(pid, &pr.name, (pr.pos[0], pr.pos[1], pr.pos[2]));
                p.health = pr.health.clamp(0, MAX_HEALTH);
                for (name, &count) in &pr.inventory {
                    if count == 0 {
                        continue;
                    }
                    match reg.id_by_name(name) {
                        Some(id) => p.add_to_inventory(id, count),
                        None => {
                            log::warn!("player {pid}: skipping unknown inventory item {name:?}")
                        }
                    }
                }
                p.edits = decode_layer(&pr.edits, reg, &format!("player {pid}"));
                world.players.insert(pid.clone(), p);
            }
            Err(e) => {
                log::warn!(
                    "world {}: skipping malformed player record {pid}: {e}",
                    rec.world_id
                );
            }
        }
    }
    let positions: Vec<(i32, i32)> = world.players.values().map(|p| (p.pos.0, p.pos.1)).collect();
    for (x, y) in positions {
        world.decorate_area(x, y);
    }
    Ok(world)
}

/// Rewrites the entire store. Last writer wins; there is no staging file or
/// atomic rename, so a crash mid-write can corrupt the store (accepted
/// limitation of the format).
pub fn save_store<'a>(
    path: &Path,
    worlds: impl IntoIterator<Item = &'a World>,
    reg: &BlockRegistry,
) -> Result<(), Box<dyn Error>> {
    let mut store = StoreFile::new();
    for w in worlds {
        store.insert(w.id.clone(), encode_world(w, reg));
    }
    let json = serde_json::to_string_pretty(&store)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads the whole store. A missing file is an empty store; an unreadable or
/// unparseable file is an error. The map key is canonical for the world id.
pub fn load_store(
    path: &Path,
    seed: i32,
    params: &WorldGenParams,
    rules: &GameRules,
    reg: &Arc<BlockRegistry>,
) -> Result<Vec<World>, Box<dyn Error>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("store {} not found; starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let store: StoreFile = serde_json::from_str(&text)?;
    let mut worlds = Vec::with_capacity(store.len());
    for (world_id, rec) in &store {
        let rec = if &rec.world_id == world_id {
            rec.clone()
        } else {
            log::warn!(
                "store entry {world_id:?} carries world_id {:?}; using the entry key",
                rec.world_id
            );
            let mut fixed = rec.clone();
            fixed.world_id = world_id.clone();
            fixed
        };
        worlds.push(decode_world(&rec, seed, params, rules, reg)?);
    }
    Ok(worlds)
}
