use std::error::Error;

use hashbrown::HashSet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use holt_blocks::{BlockId, BlockRegistry};

use crate::worldgen::WorldGenParams;

// Purpose salts keep the ore stream and the decoration stream independent at
// the same coordinates.
const ORE_SALT: u64 = 0x51ED_1E55;
const DECOR_SALT: u64 = 0xB10C_F1A6;

#[derive(Clone, Copy, Debug)]
struct CompiledOre {
    block: BlockId,
    min_depth: i32,
    max_depth: i32,
    probability: f64,
}

/// Deterministic terrain: a pure function of (coordinate, seed) plus
/// memoized decoration flags per column. Each world owns its own generator,
/// so decoration state never leaks between worlds.
pub struct TerrainGen {
    seed: i32,
    params: WorldGenParams,
    air: BlockId,
    top: BlockId,
    soil: BlockId,
    deep: BlockId,
    trunk: BlockId,
    leaves: BlockId,
    mushroom: BlockId,
    ores: Vec<CompiledOre>,
    decorated_cells: HashSet<(i32, i32)>,
    tree_columns: HashSet<(i32, i32)>,
    mushroom_columns: HashSet<(i32, i32)>,
}

fn resolve(reg: &BlockRegistry, name: &str) -> Result<BlockId, Box<dyn Error>> {
    reg.id_by_name(name)
        .ok_or_else(|| format!("block {name:?} missing from catalog").into())
}

impl TerrainGen {
    /// Resolves every configured block name up front; a name the catalog does
    /// not define is a construction error, since terrain cannot be computed
    /// without it.
    pub fn new(
        seed: i32,
        params: WorldGenParams,
        reg: &BlockRegistry,
    ) -> Result<Self, Box<dyn Error>> {
        let mut ores = Vec::with_capacity(params.ores.len());
        for rule in &params.ores {
            ores.push(CompiledOre {
                block: resolve(reg, &rule.block)?,
                min_depth: rule.min_depth,
                max_depth: rule.max_depth,
                probability: rule.probability,
            });
        }
        Ok(Self {
            seed,
            air: resolve(reg, "air")?,
            top: resolve(reg, &params.top)?,
            soil: resolve(reg, &params.soil)?,
            deep: resolve(reg, &params.deep)?,
            trunk: resolve(reg, &params.trunk)?,
            leaves: resolve(reg, &params.leaves)?,
            mushroom: resolve(reg, &params.mushroom)?,
            ores,
            params,
            decorated_cells: HashSet::new(),
            tree_columns: HashSet::new(),
            mushroom_columns: HashSet::new(),
        })
    }

    #[inline]
    pub fn air(&self) -> BlockId {
        self.air
    }

    #[inline]
    pub fn air_height(&self) -> i32 {
        self.params.air_height
    }

    /// Stable spatial hash of a cell, folded with the world seed and a
    /// purpose salt. Seeds one ChaCha stream per cell; streams at different
    /// cells never correlate.
    fn cell_seed(&self, x: i32, y: i32, z: i32, salt: u64) -> u64 {
        (x as u64)
            .wrapping_mul(73_856_093)
            .wrapping_add((y as u64).wrapping_mul(19_349_663))
            .wrapping_add((z as u64).wrapping_mul(83_492_791))
            .wrapping_add((self.seed as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add(salt)
    }

    fn cell_rng(&self, x: i32, y: i32, z: i32, salt: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.cell_seed(x, y, z, salt))
    }

    /// Block at a coordinate, layered by height. Decoration flags only affect
    /// the band directly above the surface and only exist for columns covered
    /// by a previous `decorate_area` call.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        let ah = self.params.air_height;
        if z > ah {
            if self.tree_columns.contains(&(x, y)) {
                if z == ah + 1 || z == ah + 4 {
                    return self.leaves;
                }
                if z == ah + 2 || z == ah + 3 {
                    return self.trunk;
                }
            }
            if z == ah + 1 && self.mushroom_columns.contains(&(x, y)) {
                return self.mushroom;
            }
            self.air
        } else if z == ah {
            self.top
        } else if z > ah - self.params.dirt_thickness {
            self.soil
        } else {
            let depth = ah - z - self.params.dirt_thickness;
            let mut rng = self.cell_rng(x, y, z, ORE_SALT);
            for ore in &self.ores {
                // Every rule consumes a draw, so a shallow rule can still
                // fire after a deeper one was checked and missed.
                let roll: f64 = rng.random();
                if depth >= ore.min_depth && depth <= ore.max_depth && roll < ore.probability {
                    return ore.block;
                }
            }
            self.deep
        }
    }

    /// Rolls tree/mushroom flags for every column within the decoration
    /// radius of the center. Memoized per macro-cell of the center: repeat
    /// calls for an already-decorated region are no-ops.
    pub fn decorate_area(&mut self, center_x: i32, center_y: i32) {
        let cell = (
            center_x.div_euclid(self.params.cell_size),
            center_y.div_euclid(self.params.cell_size),
        );
        if !self.decorated_cells.insert(cell) {
            return;
        }
        let r = self.params.decoration_radius;
        for x in (center_x - r)..=(center_x + r) {
            for y in (center_y - r)..=(center_y + r) {
                let mut rng = self.cell_rng(x, y, 0, DECOR_SALT);
                if rng.random::<f64>() < self.params.tree_probability {
                    self.tree_columns.insert((x, y));
                }
                if rng.random::<f64>() < self.params.mushroom_probability {
                    self.mushroom_columns.insert((x, y));
                }
            }
        }
    }

    #[inline]
    pub fn is_tree_column(&self, x: i32, y: i32) -> bool {
        self.tree_columns.contains(&(x, y))
    }

    #[inline]
    pub fn is_mushroom_column(&self, x: i32, y: i32) -> bool {
        self.mushroom_columns.contains(&(x, y))
    }
}
