//! Catalog loader.
//!
//! Each table is a RON list of entries:
//!
//! ```ron
//! [
//!     (id: "autocannon", name: "Autocannon", damage: 12.0, ...),
//!     (id: "pulse_laser", name: "Pulse Laser", damage: 8.0, ...),
//! ]
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use survivor_core::Catalog;

use crate::loaders::{LoadResult, read_file};

/// File names of the catalog tables inside a data directory.
pub const SHIPS_FILE: &str = "ships.ron";
pub const WEAPONS_FILE: &str = "weapons.ron";
pub const MODULES_FILE: &str = "modules.ron";
pub const SYNERGIES_FILE: &str = "synergies.ron";
pub const KEYSTONES_FILE: &str = "keystones.ron";
pub const UPGRADES_FILE: &str = "upgrades.ron";
pub const ENEMIES_FILE: &str = "enemies.ron";

/// Raw RON text of every table.
#[derive(Clone, Copy, Debug)]
pub struct CatalogSources<'a> {
    pub ships: &'a str,
    pub weapons: &'a str,
    pub modules: &'a str,
    pub synergies: &'a str,
    pub keystones: &'a str,
    pub upgrades: &'a str,
    pub enemies: &'a str,
}

/// Loader for the reference catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load every table from `dir`.
    pub fn load_dir(dir: &Path) -> LoadResult<Catalog> {
        let ships = read_file(&dir.join(SHIPS_FILE))?;
        let weapons = read_file(&dir.join(WEAPONS_FILE))?;
        let modules = read_file(&dir.join(MODULES_FILE))?;
        let synergies = read_file(&dir.join(SYNERGIES_FILE))?;
        let keystones = read_file(&dir.join(KEYSTONES_FILE))?;
        let upgrades = read_file(&dir.join(UPGRADES_FILE))?;
        let enemies = read_file(&dir.join(ENEMIES_FILE))?;

        Self::parse(CatalogSources {
            ships: &ships,
            weapons: &weapons,
            modules: &modules,
            synergies: &synergies,
            keystones: &keystones,
            upgrades: &upgrades,
            enemies: &enemies,
        })
    }

    /// Build a catalog from already-read sources.
    pub fn parse(sources: CatalogSources<'_>) -> LoadResult<Catalog> {
        let mut catalog = Catalog::new();

        for ship in parse_table(SHIPS_FILE, sources.ships)? {
            report_duplicate(SHIPS_FILE, catalog.insert_ship(ship).map(|old| old.id));
        }
        for weapon in parse_table(WEAPONS_FILE, sources.weapons)? {
            report_duplicate(WEAPONS_FILE, catalog.insert_weapon(weapon).map(|old| old.id));
        }
        for module in parse_table(MODULES_FILE, sources.modules)? {
            report_duplicate(MODULES_FILE, catalog.insert_module(module).map(|old| old.id));
        }
        for synergy in parse_table(SYNERGIES_FILE, sources.synergies)? {
            report_duplicate(
                SYNERGIES_FILE,
                catalog.insert_synergy(synergy).map(|old| old.id),
            );
        }
        for keystone in parse_table(KEYSTONES_FILE, sources.keystones)? {
            report_duplicate(
                KEYSTONES_FILE,
                catalog.insert_keystone(keystone).map(|old| old.id),
            );
        }
        for upgrade in parse_table(UPGRADES_FILE, sources.upgrades)? {
            report_duplicate(UPGRADES_FILE, catalog.insert_upgrade(upgrade).map(|old| old.id));
        }
        for enemy in parse_table(ENEMIES_FILE, sources.enemies)? {
            report_duplicate(ENEMIES_FILE, catalog.insert_enemy(enemy).map(|old| old.id));
        }

        tracing::debug!(
            ships = catalog.ships().count(),
            weapons = catalog.weapons().count(),
            modules = catalog.modules().count(),
            enemies = catalog.enemies().count(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

fn parse_table<T: DeserializeOwned>(name: &str, content: &str) -> LoadResult<Vec<T>> {
    ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", name, e))
}

/// Later entries replace earlier ones with the same id.
fn report_duplicate(table: &str, replaced: Option<String>) {
    if let Some(id) = replaced {
        tracing::warn!(table, id = %id, "duplicate id, keeping the last entry");
    }
}

#[cfg(test)]
mod tests {
    use survivor_core::{DamageType, EnemyDefense, Tag};

    use super::*;

    const EMPTY: CatalogSources<'static> = CatalogSources {
        ships: "[]",
        weapons: "[]",
        modules: "[]",
        synergies: "[]",
        keystones: "[]",
        upgrades: "[]",
        enemies: "[]",
    };

    #[test]
    fn parses_weapons_and_drops_unknown_tags() {
        let catalog = CatalogLoader::parse(CatalogSources {
            weapons: r#"[
                (
                    id: "flak",
                    name: "Flak Cannon",
                    damage: 6.0,
                    fire_rate: 1.5,
                    damage_type: explosive,
                    tags: ["explosive", "area", "sparkly"],
                    projectile_speed: 500.0,
                    range: 350.0,
                ),
            ]"#,
            ..EMPTY
        })
        .unwrap();

        let flak = catalog.weapon("flak").unwrap();
        assert_eq!(flak.damage_type, DamageType::Explosive);
        assert_eq!(flak.tags, vec![Tag::Explosive, Tag::Area]);
        assert_eq!(flak.projectile_radius, 4.0);
        assert_eq!(flak.pierce, 0);
    }

    #[test]
    fn parses_enemy_defense_variants() {
        let catalog = CatalogLoader::parse(CatalogSources {
            enemies: r#"[
                (
                    id: "gnat",
                    name: "Gnat",
                    cost: 1,
                    defense: health(max: 12.0),
                    speed: 120.0,
                    radius: 8.0,
                    contact_damage: 4.0,
                    damage_type: kinetic,
                    xp_value: 1.0,
                ),
                (
                    id: "warden",
                    name: "Warden",
                    cost: 8,
                    min_wave: 3,
                    defense: layered(shield: 40.0, armor: 60.0, structure: 80.0),
                    speed: 50.0,
                    radius: 20.0,
                    contact_damage: 18.0,
                    damage_type: thermal,
                    xp_value: 6.0,
                ),
            ]"#,
            ..EMPTY
        })
        .unwrap();

        let gnat = catalog.enemy("gnat").unwrap();
        assert_eq!(gnat.min_wave, 1);
        assert_eq!(gnat.defense, EnemyDefense::Health { max: 12.0 });
        let warden = catalog.enemy("warden").unwrap();
        assert!(matches!(
            warden.defense,
            EnemyDefense::Layered { structure, .. } if structure == 80.0
        ));
    }

    #[test]
    fn syntax_errors_name_the_table() {
        let err = CatalogLoader::parse(CatalogSources {
            modules: "[ (id: ",
            ..EMPTY
        })
        .unwrap_err();
        assert!(err.to_string().contains(MODULES_FILE), "{err}");
    }

    #[test]
    fn duplicate_ids_keep_the_last_entry() {
        let catalog = CatalogLoader::parse(CatalogSources {
            keystones: r#"[
                (id: "overclock", name: "First"),
                (id: "overclock", name: "Second"),
            ]"#,
            ..EMPTY
        })
        .unwrap();
        assert_eq!(catalog.keystone("overclock").unwrap().name, "Second");
    }
}
