use std::fs;

use survivor_content::{ContentFactory, SaveLoader};
use survivor_core::{CombatEvent, GameConfig, GameSession, Intent, MetaProgression};

#[test]
fn builtin_content_loads_without_warnings() {
    let factory = ContentFactory::builtin();
    let (catalog, warnings) = factory.load_validated_catalog().unwrap();

    assert!(warnings.is_empty(), "{warnings:?}");
    assert!(catalog.ships().count() >= 3);
    assert!(catalog.enemies().any(|e| e.min_wave == 1));
    for ship in catalog.ships() {
        assert!(!ship.starting_weapons.is_empty(), "{} has no weapon", ship.id);
        assert!(!ship.loot_pool.is_empty(), "{} has no loot", ship.id);
    }
}

#[test]
fn shipped_config_matches_compiled_defaults() {
    let config = ContentFactory::builtin().load_config().unwrap();
    assert_eq!(config, GameConfig::default());
}

#[test]
fn directory_and_builtin_content_agree() {
    let dir = tempfile::tempdir().unwrap();
    let source = concat!(env!("CARGO_MANIFEST_DIR"), "/data");
    for name in ContentFactory::required_files() {
        fs::copy(format!("{source}/{name}"), dir.path().join(name)).unwrap();
    }

    let from_dir = ContentFactory::new(dir.path());
    let builtin = ContentFactory::builtin();
    assert_eq!(from_dir.load_catalog().unwrap(), builtin.load_catalog().unwrap());
    assert_eq!(from_dir.load_config().unwrap(), builtin.load_config().unwrap());
}

#[test]
fn directory_with_broken_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = concat!(env!("CARGO_MANIFEST_DIR"), "/data");
    for name in ContentFactory::required_files() {
        fs::copy(format!("{source}/{name}"), dir.path().join(name)).unwrap();
    }
    fs::write(dir.path().join("enemies.ron"), "[ (id: \"gnat\", ").unwrap();

    let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
    assert!(err.to_string().contains("enemies.ron"), "{err}");
}

#[test]
fn save_file_seeds_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    fs::write(&path, r#"{ "maxHealth": 40, "baseDamagePct": 20 }"#).unwrap();
    let meta = SaveLoader::load(&path).unwrap();

    let factory = ContentFactory::builtin();
    let catalog = factory.load_catalog().unwrap();
    let config = factory.load_config().unwrap();
    let fresh = GameSession::new(
        &catalog,
        config.clone(),
        MetaProgression::default(),
        "interceptor",
        1,
    )
    .unwrap();
    let seeded = GameSession::new(&catalog, config, meta, "interceptor", 1).unwrap();

    assert!(
        (seeded.stats().max_structure - fresh.stats().max_structure - 40.0).abs() < 1e-9
    );
    assert!(seeded.stats().damage_multiplier > fresh.stats().damage_multiplier);
}

#[test]
fn every_ship_survives_the_opening_wave() {
    let factory = ContentFactory::builtin();
    let catalog = factory.load_catalog().unwrap();
    let config = factory.load_config().unwrap();

    for ship in catalog.ships() {
        let mut session = GameSession::new(
            &catalog,
            config.clone(),
            MetaProgression::default(),
            &ship.id,
            3,
        )
        .unwrap();
        let mut hits = 0;
        for _ in 0..(10 * 60) {
            hits += session
                .update(1.0 / 60.0, Intent::default())
                .iter()
                .filter(|e| matches!(e, CombatEvent::Hit { .. }))
                .count();
        }
        assert!(hits > 0, "{} never fired", ship.id);
        assert!(session.kills() > 0, "{} killed nothing", ship.id);
        assert!(!session.is_over(), "{} died in wave one", ship.id);
    }
}
