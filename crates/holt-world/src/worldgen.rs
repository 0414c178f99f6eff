use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default = "default_ores")]
    pub ores: Vec<OreRule>,
    #[serde(default)]
    pub decoration: Decoration,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            terrain: Terrain::default(),
            ores: default_ores(),
            decoration: Decoration::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_air_height")]
    pub air_height: i32,
    #[serde(default = "default_dirt_thickness")]
    pub dirt_thickness: i32,
    #[serde(default = "default_top")]
    pub top: String,
    #[serde(default = "default_soil")]
    pub soil: String,
    #[serde(default = "default_deep")]
    pub deep: String,
}
fn default_air_height() -> i32 {
    20
}
fn default_dirt_thickness() -> i32 {
    5
}
fn default_top() -> String {
    "grass".into()
}
fn default_soil() -> String {
    "dirt".into()
}
fn default_deep() -> String {
    "stone".into()
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            air_height: default_air_height(),
            dirt_thickness: default_dirt_thickness(),
            top: default_top(),
            soil: default_soil(),
            deep: default_deep(),
        }
    }
}

/// One ore band. Rules run in declaration order; depth counts down from the
/// top of the deep layer, bands are inclusive.
#[derive(Clone, Debug, Deserialize)]
pub struct OreRule {
    pub block: String,
    pub min_depth: i32,
    pub max_depth: i32,
    pub probability: f64,
}

fn default_ores() -> Vec<OreRule> {
    vec![
        OreRule {
            block: "diamond_ore".into(),
            min_depth: 25,
            max_depth: 30,
            probability: 0.05,
        },
        OreRule {
            block: "gold_ore".into(),
            min_depth: 15,
            max_depth: 25,
            probability: 0.07,
        },
        OreRule {
            block: "iron_ore".into(),
            min_depth: 8,
            max_depth: 15,
            probability: 0.10,
        },
        OreRule {
            block: "coal_ore".into(),
            min_depth: 3,
            max_depth: 15,
            probability: 0.15,
        },
    ]
}

#[derive(Clone, Debug, Deserialize)]
pub struct Decoration {
    #[serde(default = "default_tree_probability")]
    pub tree_probability: f64,
    #[serde(default = "default_mushroom_probability")]
    pub mushroom_probability: f64,
    #[serde(default = "default_radius")]
    pub radius: i32,
    #[serde(default = "default_cell_size")]
    pub cell_size: i32,
    #[serde(default = "default_trunk")]
    pub trunk: String,
    #[serde(default = "default_leaves")]
    pub leaves: String,
    #[serde(default = "default_mushroom")]
    pub mushroom: String,
}
fn default_tree_probability() -> f64 {
    0.3
}
fn default_mushroom_probability() -> f64 {
    0.2
}
fn default_radius() -> i32 {
    25
}
fn default_cell_size() -> i32 {
    50
}
fn default_trunk() -> String {
    "wood".into()
}
fn default_leaves() -> String {
    "leaves".into()
}
fn default_mushroom() -> String {
    "mushroom".into()
}
impl Default for Decoration {
    fn default() -> Self {
        Self {
            tree_probability: default_tree_probability(),
            mushroom_probability: default_mushroom_probability(),
            radius: default_radius(),
            cell_size: default_cell_size(),
            trunk: default_trunk(),
            leaves: default_leaves(),
            mushroom: default_mushroom(),
        }
    }
}

// Flattened params used by the generator (snapshot of config)
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub air_height: i32,
    pub dirt_thickness: i32,
    pub top: String,
    pub soil: String,
    pub deep: String,
    pub ores: Vec<OreRule>,
    pub tree_probability: f64,
    pub mushroom_probability: f64,
    pub decoration_radius: i32,
    pub cell_size: i32,
    pub trunk: String,
    pub leaves: String,
    pub mushroom: String,
}

impl WorldGenParams {
    pub fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }

    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            air_height: cfg.terrain.air_height,
            dirt_thickness: cfg.terrain.dirt_thickness,
            top: cfg.terrain.top.clone(),
            soil: cfg.terrain.soil.clone(),
            deep: cfg.terrain.deep.clone(),
            ores: cfg.ores.clone(),
            tree_probability: cfg.decoration.tree_probability,
            mushroom_probability: cfg.decoration.mushroom_probability,
            decoration_radius: cfg.decoration.radius,
            cell_size: cfg.decoration.cell_size,
            trunk: cfg.decoration.trunk.clone(),
            leaves: cfg.decoration.leaves.clone(),
            mushroom: cfg.decoration.mushroom.clone(),
        }
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    Ok(WorldGenParams::from_config(&cfg))
}
