use serde::Deserialize;

/// Gameplay tunables shared by worlds and the directory. The health maximum
/// is not here: it is an invariant of [`crate::player::Player`], not a knob.
#[derive(Clone, Debug, Deserialize)]
pub struct GameRules {
    /// Side length of the square view window. The window is centered on the
    /// player, so even values behave like the next odd size up.
    #[serde(default = "default_view_size")]
    pub view_size: usize,
    /// Spawn positions are drawn uniformly within this distance of origin on
    /// both horizontal axes.
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: i32,
    /// Moving past this distance from origin decorates the area around the
    /// player's new position.
    #[serde(default = "default_expansion_threshold")]
    pub expansion_threshold: i32,
    #[serde(default = "default_attack_damage")]
    pub attack_damage: i32,
}

fn default_view_size() -> usize {
    9
}
fn default_spawn_radius() -> i32 {
    25
}
fn default_expansion_threshold() -> i32 {
    50
}
fn default_attack_damage() -> i32 {
    1
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            view_size: default_view_size(),
            spawn_radius: default_spawn_radius(),
            expansion_threshold: default_expansion_threshold(),
            attack_damage: default_attack_damage(),
        }
    }
}
