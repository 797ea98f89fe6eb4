//! Content factory for building the catalog and configuration.

use std::path::{Path, PathBuf};

use survivor_core::{Catalog, GameConfig};

use crate::loaders::catalog::{
    ENEMIES_FILE, KEYSTONES_FILE, MODULES_FILE, SHIPS_FILE, SYNERGIES_FILE, UPGRADES_FILE,
    WEAPONS_FILE,
};
use crate::loaders::{CatalogLoader, CatalogSources, ConfigLoader, LoadResult};
use crate::validate::{ContentWarning, validate_catalog};

const CONFIG_FILE: &str = "config.toml";

macro_rules! builtin {
    ($file:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/", $file))
    };
}

const BUILTIN: CatalogSources<'static> = CatalogSources {
    ships: builtin!("ships.ron"),
    weapons: builtin!("weapons.ron"),
    modules: builtin!("modules.ron"),
    synergies: builtin!("synergies.ron"),
    keystones: builtin!("keystones.ron"),
    upgrades: builtin!("upgrades.ron"),
    enemies: builtin!("enemies.ron"),
};

const BUILTIN_CONFIG: &str = builtin!("config.toml");

/// Where content comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Source {
    Directory(PathBuf),
    Builtin,
}

/// Content factory that loads all game content from a data directory, or
/// from the copy embedded in the crate.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── ships.ron
/// ├── weapons.ron
/// ├── modules.ron
/// ├── synergies.ron
/// ├── keystones.ron
/// ├── upgrades.ron
/// └── enemies.ron
/// ```
#[derive(Clone, Debug)]
pub struct ContentFactory {
    source: Source,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Directory(data_dir.into()),
        }
    }

    /// Creates a factory serving the data shipped with this crate.
    pub fn builtin() -> Self {
        Self {
            source: Source::Builtin,
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        match &self.source {
            Source::Directory(dir) => ConfigLoader::load(&dir.join(CONFIG_FILE)),
            Source::Builtin => ConfigLoader::parse(BUILTIN_CONFIG),
        }
    }

    /// Load every catalog table.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        match &self.source {
            Source::Directory(dir) => CatalogLoader::load_dir(dir),
            Source::Builtin => CatalogLoader::parse(BUILTIN),
        }
    }

    /// Load the catalog and run the cross-reference checks on it.
    pub fn load_validated_catalog(&self) -> LoadResult<(Catalog, Vec<ContentWarning>)> {
        let catalog = self.load_catalog()?;
        let warnings = validate_catalog(&catalog);
        Ok((catalog, warnings))
    }

    /// Returns the data directory path, `None` for built-in content.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.source {
            Source::Directory(dir) => Some(dir),
            Source::Builtin => None,
        }
    }

    /// Names of the files a data directory must contain.
    pub fn required_files() -> [&'static str; 8] {
        [
            CONFIG_FILE,
            SHIPS_FILE,
            WEAPONS_FILE,
            MODULES_FILE,
            SYNERGIES_FILE,
            KEYSTONES_FILE,
            UPGRADES_FILE,
            ENEMIES_FILE,
        ]
    }
}
