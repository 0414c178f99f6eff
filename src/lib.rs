//! Shared persistent voxel world: the directory of worlds, runtime config,
//! and the public operations a presentation layer drives.
#![forbid(unsafe_code)]

pub mod config;
pub mod directory;

pub use config::{Config, load_config};
pub use directory::{DEFAULT_WORLD, Directory, OnlineEntry};
