use std::sync::Arc;

use holt_blocks::{BlockId, BlockRegistry};
use holt_world::{GameRules, ViewCell, World, WorldGenParams};

const CATALOG: &str = r#"
    [[blocks]]
    name = "air"
    solid = false
    mineable = false

    [[blocks]]
    name = "grass"
    drop = "dirt"

    [[blocks]]
    name = "dirt"

    [[blocks]]
    name = "stone"

    [[blocks]]
    name = "coal_ore"

    [[blocks]]
    name = "iron_ore"

    [[blocks]]
    name = "gold_ore"

    [[blocks]]
    name = "diamond_ore"

    [[blocks]]
    name = "wood"

    [[blocks]]
    name = "leaves"

    [[blocks]]
    name = "mushroom"

    [[blocks]]
    name = "bedrock"
    mineable = false
"#;

fn registry() -> Arc<BlockRegistry> {
    Arc::new(BlockRegistry::from_toml_str(CATALOG).expect("catalog"))
}

fn world(reg: &Arc<BlockRegistry>) -> World {
    World::new(
        "test",
        12345,
        &WorldGenParams::default(),
        GameRules::default(),
        reg.clone(),
    )
    .expect("world")
}

fn id(reg: &BlockRegistry, name: &str) -> BlockId {
    reg.id_by_name(name).expect("known block")
}

#[test]
fn global_override_shadows_private_shadows_generation() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    w.add_player("b", "Bob", (7, 5, 21));
    let stone = id(&reg, "stone");
    let dirt = id(&reg, "dirt");
    let air = w.air();
    // (100, 100, 30) is high air far outside any decorated area.
    let c = (100, 100, 30);

    // With neither layer set, all readers get the generated block.
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("a")), air);
    assert_eq!(w.get_block(c.0, c.1, c.2, None), air);

    // Private override is visible to its owner only.
    w.set_block(c.0, c.1, c.2, stone, Some("a"));
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("a")), stone);
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("b")), air);
    assert_eq!(w.get_block(c.0, c.1, c.2, None), air);

    // Global override shadows the private one for everybody.
    w.set_block(c.0, c.1, c.2, dirt, None);
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("a")), dirt);
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("b")), dirt);

    // Clearing the global layer uncovers the private entry again.
    w.set_block(c.0, c.1, c.2, air, None);
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("a")), stone);
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("b")), air);

    // An air write with the actor clears the private entry too.
    w.set_block(c.0, c.1, c.2, air, Some("a"));
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("a")), air);
    assert!(w.global_edits.is_empty());
    assert!(w.players["a"].edits.is_empty());
}

#[test]
fn override_then_air_restores_generated_block_exactly() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    let stone = id(&reg, "stone");
    let air = w.air();
    for &(x, y, z) in &[(0, 0, 25), (-3, 9, 10), (50, -50, 18)] {
        let generated = w.get_block(x, y, z, None);
        w.set_block(x, y, z, stone, None);
        assert_eq!(w.get_block(x, y, z, Some("a")), stone);
        w.set_block(x, y, z, air, None);
        assert_eq!(w.get_block(x, y, z, Some("a")), generated);
        assert_eq!(w.get_block(x, y, z, None), generated);
    }
    assert!(w.global_edits.is_empty());
}

#[test]
fn break_placed_block_clears_override_and_credits_drop() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    let stone = id(&reg, "stone");
    let air = w.air();
    let c = (100, 100, 30);
    w.set_block(c.0, c.1, c.2, stone, None);
    assert_eq!(w.break_block(c.0, c.1, c.2, "a"), Some(stone));
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("a")), air);
    assert!(w.players["a"].has(stone, 1));
}

#[test]
fn break_generated_surface_credits_catalog_drop() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    let dirt = id(&reg, "dirt");
    // Grass drops dirt per the catalog.
    assert_eq!(w.break_block(200, 200, 20, "a"), Some(dirt));
    assert!(w.players["a"].has(dirt, 1));
    // No override was stored: the coordinate still resolves to generation.
    assert_eq!(w.get_block(200, 200, 20, Some("a")), id(&reg, "grass"));
}

#[test]
fn break_air_or_unmineable_is_a_noop() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    let bedrock = id(&reg, "bedrock");
    let c = (100, 100, 30);
    assert_eq!(w.break_block(c.0, c.1, c.2, "a"), None);
    w.set_block(c.0, c.1, c.2, bedrock, None);
    assert_eq!(w.break_block(c.0, c.1, c.2, "a"), None);
    // The unmineable override stays put.
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("a")), bedrock);
    assert!(w.players["a"].inventory.is_empty());
}

#[test]
fn placement_is_globally_visible_and_debits_inventory() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    w.add_player("b", "Bob", (7, 5, 21));
    let stone = id(&reg, "stone");
    let c = (5, 5, 40);
    if let Some(p) = w.players.get_mut("a") {
        p.add_to_inventory(stone, 1);
    }
    assert!(w.place_block(c.0, c.1, c.2, stone, "a"));
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("a")), stone);
    assert_eq!(w.get_block(c.0, c.1, c.2, Some("b")), stone);
    assert_eq!(w.get_block(c.0, c.1, c.2, None), stone);
    assert!(w.players["a"].inventory.is_empty());
}

#[test]
fn placement_requires_air_target_and_stock() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    let stone = id(&reg, "stone");
    // No stock.
    assert!(!w.place_block(5, 5, 40, stone, "a"));
    if let Some(p) = w.players.get_mut("a") {
        p.add_to_inventory(stone, 2);
    }
    // Target below the surface is not air.
    assert!(!w.place_block(5, 5, 10, stone, "a"));
    assert_eq!(w.players["a"].inventory[&stone], 2);
    // Placing air is never valid.
    assert!(!w.place_block(5, 5, 40, w.air(), "a"));
    // And a successful placement blocks the next one at the same target.
    assert!(w.place_block(5, 5, 40, stone, "a"));
    assert!(!w.place_block(5, 5, 40, stone, "a"));
    assert_eq!(w.players["a"].inventory[&stone], 1);
}

#[test]
fn move_commits_fully_or_not_at_all() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    // Stepping into open air with no support fails and leaves the position
    // untouched.
    assert!(!w.move_player("a", 0, 0, 5));
    assert_eq!(w.get_player_position("a"), Some((5, 5, 21)));
    // Walking along the surface keeps support underfoot.
    assert!(w.move_player("a", 1, 0, 0));
    assert_eq!(w.get_player_position("a"), Some((6, 5, 21)));
    // Unknown players cannot move.
    assert!(!w.move_player("ghost", 1, 0, 0));
}

#[test]
fn moving_past_the_expansion_threshold_decorates_new_ground() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (49, 0, 21));
    assert!(w.move_player("a", 1, 0, 0));
    assert!(w.move_player("a", 1, 0, 0));
    assert_eq!(w.get_player_position("a"), Some((51, 0, 21)));
    // The second step crossed the threshold and decorated around (51, 0);
    // flags may now exist well beyond the spawn decoration.
    let mut flagged = 0usize;
    for x in 31..=76 {
        for y in -25..=25 {
            if w.get_block(x, y, 21, None) != w.air() {
                flagged += 1;
            }
        }
    }
    assert!(flagged > 0, "no decoration appeared past the threshold");
}

#[test]
fn view_window_marks_players_and_self() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    w.add_player("b", "Bob", (7, 5, 21));
    let view = w.get_view("a");
    assert_eq!(view.len(), 9);
    assert_eq!(view[0].len(), 9);
    // Center cell is the viewer.
    assert_eq!(view[4][4], ViewCell::Player);
    // Bob stands two cells east at the same z.
    assert_eq!(view[4][6], ViewCell::Player);
    // Everything else is terrain.
    assert!(matches!(view[4][5], ViewCell::Terrain(_)));
    assert!(w.get_view("ghost").is_empty());
}

#[test]
fn players_on_other_levels_do_not_mark_the_view() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    w.add_player("b", "Bob", (7, 5, 30));
    let view = w.get_view("a");
    assert!(matches!(view[4][6], ViewCell::Terrain(_)));
}

#[test]
fn find_player_at_matches_exact_coordinates() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    w.add_player("b", "Bob", (7, 5, 21));
    assert_eq!(
        w.find_player_at(7, 5, 21, Some("a")).map(|p| p.id.as_str()),
        Some("b")
    );
    assert!(w.find_player_at(7, 5, 20, Some("a")).is_none());
    assert!(w.find_player_at(7, 5, 21, Some("b")).is_none());
    assert_eq!(
        w.find_player_at(5, 5, 21, None).map(|p| p.id.as_str()),
        Some("a")
    );
}

#[test]
fn rejoining_keeps_the_existing_player() {
    let reg = registry();
    let mut w = world(&reg);
    w.add_player("a", "Alice", (5, 5, 21));
    assert!(w.move_player("a", 1, 0, 0));
    let (name, pos) = {
        let p = w.add_player("a", "Alice Again", (0, 0, 21));
        (p.name.clone(), p.pos)
    };
    assert_eq!(name, "Alice");
    assert_eq!(pos, (6, 5, 21));
    assert_eq!(w.players.len(), 1);
}
