use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use holt_blocks::{BlockId, BlockRegistry};
use holt_edit::EditLayer;

use crate::generation::TerrainGen;
use crate::player::Player;
use crate::rules::GameRules;
use crate::worldgen::WorldGenParams;

/// One cell of a player's view window.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ViewCell {
    Terrain(BlockId),
    Player,
}

/// A single world: generated terrain, the global override layer, and the
/// players inside it. All mutation goes through `&mut self`; under the
/// sequential event model no further synchronization is needed.
pub struct World {
    pub id: String,
    pub global_edits: EditLayer,
    pub players: HashMap<String, Player>,
    terrain: TerrainGen,
    reg: Arc<BlockRegistry>,
    rules: GameRules,
}

impl World {
    pub fn new(
        id: &str,
        seed: i32,
        params: &WorldGenParams,
        rules: GameRules,
        reg: Arc<BlockRegistry>,
    ) -> Result<Self, Box<dyn Error>> {
        let mut terrain = TerrainGen::new(seed, params.clone(), &reg)?;
        // New worlds start with the origin area decorated.
        terrain.decorate_area(0, 0);
        Ok(Self {
            id: id.to_string(),
            global_edits: EditLayer::new(),
            players: HashMap::new(),
            terrain,
            reg,
            rules,
        })
    }

    #[inline]
    pub fn air(&self) -> BlockId {
        self.terrain.air()
    }

    #[inline]
    pub fn air_height(&self) -> i32 {
        self.terrain.air_height()
    }

    pub fn decorate_area(&mut self, center_x: i32, center_y: i32) {
        self.terrain.decorate_area(center_x, center_y);
    }

    pub fn get_player(&self, player_id: &str) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn get_player_position(&self, player_id: &str) -> Option<(i32, i32, i32)> {
        self.players.get(player_id).map(|p| p.pos)
    }

    /// Registers a player at the given spawn and decorates the area around
    /// it. Joining twice is idempotent: the existing player is returned
    /// untouched.
    pub fn add_player(&mut self, id: &str, name: &str, spawn: (i32, i32, i32)) -> &Player {
        if !self.players.contains_key(id) {
            self.players
                .insert(id.to_string(), Player::new(id, name, spawn));
            self.terrain.decorate_area(spawn.0, spawn.1);
        }
        &self.players[id]
    }

    /// Layered block resolution: the global layer shadows the viewer's
    /// private layer, which shadows generation.
    pub fn get_block(&self, x: i32, y: i32, z: i32, viewer: Option<&str>) -> BlockId {
        if let Some(b) = self.global_edits.get(x, y, z) {
            return b;
        }
        if let Some(pid) = viewer {
            if let Some(p) = self.players.get(pid) {
                if let Some(b) = p.edits.get(x, y, z) {
                    return b;
                }
            }
        }
        self.terrain.block_at(x, y, z)
    }

    /// Writes an override. Air is never stored: writing air deletes the
    /// global entry and, when an actor is given, the actor's private entry
    /// as well, so the coordinate falls back to generation. Non-air writes
    /// land in the actor's private layer, or the global layer without one.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId, actor: Option<&str>) {
        if block == self.terrain.air() {
            self.global_edits.remove(x, y, z);
            if let Some(pid) = actor {
                if let Some(p) = self.players.get_mut(pid) {
                    p.edits.remove(x, y, z);
                }
            }
        } else if let Some(pid) = actor {
            if let Some(p) = self.players.get_mut(pid) {
                p.edits.set(x, y, z, block);
            }
        } else {
            self.global_edits.set(x, y, z, block);
        }
    }

    /// Breaks the block the player sees at the coordinate. Air and
    /// non-mineable blocks are a no-op returning `None`; otherwise the
    /// override is cleared and the catalog drop is credited and returned.
    pub fn break_block(&mut self, x: i32, y: i32, z: i32, player_id: &str) -> Option<BlockId> {
        let block = self.get_block(x, y, z, Some(player_id));
        if block == self.terrain.air() {
            return None;
        }
        let (mineable, drop) = {
            let ty = self.reg.get(block)?;
            (ty.mineable, ty.drop)
        };
        if !mineable {
            return None;
        }
        let air = self.terrain.air();
        self.set_block(x, y, z, air, Some(player_id));
        if let Some(p) = self.players.get_mut(player_id) {
            p.add_to_inventory(drop, 1);
        }
        Some(drop)
    }

    /// Places a block from the player's inventory. Fails without mutating
    /// when the target is not air or the inventory lacks the item. A
    /// successful placement writes the global layer, so every player sees
    /// it.
    pub fn place_block(&mut self, x: i32, y: i32, z: i32, block: BlockId, player_id: &str) -> bool {
        if block == self.terrain.air() {
            return false;
        }
        if self.get_block(x, y, z, Some(player_id)) != self.terrain.air() {
            return false;
        }
        let Some(p) = self.players.get_mut(player_id) else {
            return false;
        };
        if !p.remove_from_inventory(block, 1) {
            return false;
        }
        self.global_edits.set(x, y, z, block);
        true
    }

    /// A cell is enterable if it is solid (standing on it) or air with a
    /// solid block directly below (standing in it). No clearance or gravity
    /// checks beyond this pair.
    pub fn can_move_to(&self, x: i32, y: i32, z: i32, viewer: Option<&str>) -> bool {
        let target = self.get_block(x, y, z, viewer);
        if self.reg.is_solid(target) {
            return true;
        }
        if target == self.terrain.air() {
            let below = self.get_block(x, y, z - 1, viewer);
            return self.reg.is_solid(below);
        }
        false
    }

    /// Validates and commits a single-step move atomically: either the full
    /// delta applies or the position is untouched. Crossing the expansion
    /// threshold decorates the area around the new position.
    pub fn move_player(&mut self, player_id: &str, dx: i32, dy: i32, dz: i32) -> bool {
        let Some(p) = self.players.get(player_id) else {
            return false;
        };
        let (nx, ny, nz) = (p.pos.0 + dx, p.pos.1 + dy, p.pos.2 + dz);
        if !self.can_move_to(nx, ny, nz, Some(player_id)) {
            return false;
        }
        if let Some(p) = self.players.get_mut(player_id) {
            p.pos = (nx, ny, nz);
        }
        let threshold = self.rules.expansion_threshold;
        if nx.abs() > threshold || ny.abs() > threshold {
            self.terrain.decorate_area(nx, ny);
        }
        true
    }

    /// First player standing exactly at the coordinate, skipping
    /// `excluding`. Linear scan; overlapping players are not expected but
    /// first match wins if they happen.
    pub fn find_player_at(
        &self,
        x: i32,
        y: i32,
        z: i32,
        excluding: Option<&str>,
    ) -> Option<&Player> {
        self.players
            .values()
            .find(|p| excluding != Some(p.id.as_str()) && p.pos == (x, y, z))
    }

    /// Square window centered on the player at the player's z level. Other
    /// players at the same cell show as markers; the center cell is always
    /// the viewer's own marker.
    pub fn get_view(&self, player_id: &str) -> Vec<Vec<ViewCell>> {
        let Some(p) = self.players.get(player_id) else {
            return Vec::new();
        };
        let (px, py, pz) = p.pos;
        let half = (self.rules.view_size / 2) as i32;
        let side = (half * 2 + 1) as usize;
        let mut view = Vec::with_capacity(side);
        for dy in -half..=half {
            let mut row = Vec::with_capacity(side);
            for dx in -half..=half {
                let (wx, wy) = (px + dx, py + dy);
                if dx == 0 && dy == 0 {
                    row.push(ViewCell::Player);
                } else if self.find_player_at(wx, wy, pz, Some(player_id)).is_some() {
                    row.push(ViewCell::Player);
                } else {
                    row.push(ViewCell::Terrain(self.get_block(wx, wy, pz, Some(player_id))));
                }
            }
            view.push(row);
        }
        view
    }
}
