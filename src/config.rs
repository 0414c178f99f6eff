use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use holt_world::GameRules;

/// Runtime configuration (`holt.toml`). Every field has a default, so a
/// missing file or a partial file both work.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_blocks_path")]
    pub blocks_path: PathBuf,
    #[serde(default = "default_worldgen_path")]
    pub worldgen_path: PathBuf,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub rules: GameRules,
}

fn default_seed() -> i32 {
    12345
}
fn default_blocks_path() -> PathBuf {
    PathBuf::from("assets/blocks.toml")
}
fn default_worldgen_path() -> PathBuf {
    PathBuf::from("assets/worldgen.toml")
}
fn default_store_path() -> PathBuf {
    PathBuf::from("world_store.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            blocks_path: default_blocks_path(),
            worldgen_path: default_worldgen_path(),
            store_path: default_store_path(),
            rules: GameRules::default(),
        }
    }
}

/// Reads the config file. Missing file means defaults; a file that fails to
/// parse is logged and replaced by defaults rather than aborting startup.
pub fn load_config(path: &Path) -> Config {
    match fs::read_to_string(path) {
        Ok(s) => match toml::from_str(&s) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("{} parse error: {e}; using defaults", path.display());
                Config::default()
            }
        },
        Err(_) => {
            log::info!("config {} not found; using defaults", path.display());
            Config::default()
        }
    }
}
