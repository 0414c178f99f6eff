//! Deterministic terrain, per-world state, players, and movement.
#![forbid(unsafe_code)]

pub mod generation;
pub mod player;
pub mod rules;
pub mod world;
pub mod worldgen;

pub use generation::TerrainGen;
pub use player::{MAX_HEALTH, Player};
pub use rules::GameRules;
pub use world::{ViewCell, World};
pub use worldgen::{WorldGenConfig, WorldGenParams, load_params_from_path};
