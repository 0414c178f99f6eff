use holt_blocks::BlockRegistry;

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
"#;

#[test]
fn positional_ids_and_name_lookup() {
    let reg = BlockRegistry::from_toml_str(CATALOG).expect("registry");
    assert_eq!(reg.id_by_name("air"), Some(0));
    assert_eq!(reg.id_by_name("grass"), Some(1));
    assert_eq!(reg.id_by_name("stone"), Some(3));
    assert_eq!(reg.name_of(2), Some("dirt"));
    assert_eq!(reg.id_by_name("bedrock"), None);
}

#[test]
fn solidity_and_mineability_defaults() {
    let reg = BlockRegistry::from_toml_str(CATALOG).expect("registry");
    let air = reg.id_by_name("air").unwrap();
    let stone = reg.id_by_name("stone").unwrap();
    assert!(!reg.is_solid(air));
    assert!(!reg.is_mineable(air));
    assert!(reg.is_solid(stone));
    assert!(reg.is_mineable(stone));
    // Ids outside the catalog are neither solid nor mineable.
    assert!(!reg.is_solid(999));
}

#[test]
fn drop_defaults_to_self_and_resolves_references() {
    let reg = BlockRegistry::from_toml_str(CATALOG).expect("registry");
    let grass = reg.id_by_name("grass").unwrap();
    let dirt = reg.id_by_name("dirt").unwrap();
    let stone = reg.id_by_name("stone").unwrap();
    assert_eq!(reg.get(grass).unwrap().drop, dirt);
    assert_eq!(reg.get(stone).unwrap().drop, stone);
}

#[test]
fn drop_reference_may_point_forward() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "grass"
        drop = "dirt"

        [[blocks]]
        name = "dirt"
    "#,
    )
    .expect("registry");
    let grass = reg.id_by_name("grass").unwrap();
    let dirt = reg.id_by_name("dirt").unwrap();
    assert_eq!(reg.get(grass).unwrap().drop, dirt);
}

#[test]
fn unknown_drop_falls_back_to_self() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "grass"
        drop = "nonexistent"
    "#,
    )
    .expect("registry");
    let grass = reg.id_by_name("grass").unwrap();
    assert_eq!(reg.get(grass).unwrap().drop, grass);
}

#[test]
fn explicit_ids_win_and_gaps_are_padded() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "air"
        id = 0
        solid = false
        mineable = false

        [[blocks]]
        name = "obsidian"
        id = 5
    "#,
    )
    .expect("registry");
    assert_eq!(reg.id_by_name("obsidian"), Some(5));
    assert_eq!(reg.blocks.len(), 6);
    // Padding entries are inert: no name, not solid, not mineable.
    assert_eq!(reg.name_of(3), Some(""));
    assert!(!reg.is_solid(3));
}

#[test]
fn missing_catalog_file_is_an_error() {
    assert!(BlockRegistry::from_path("does/not/exist.toml").is_err());
}

#[test]
fn malformed_catalog_is_an_error() {
    assert!(BlockRegistry::from_toml_str("[[blocks]]\nmineable = true").is_err());
}
