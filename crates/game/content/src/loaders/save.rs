//! Meta progression save loader.

use std::path::Path;

use survivor_core::MetaProgression;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`MetaProgression`] saves stored as JSON.
///
/// Saves are read-only here. Writing them back is up to the host.
pub struct SaveLoader;

impl SaveLoader {
    pub fn load(path: &Path) -> LoadResult<MetaProgression> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid save {}: {}", path.display(), e))
    }

    /// Loads a save, or starts from scratch when the file does not exist.
    pub fn load_or_default(path: &Path) -> LoadResult<MetaProgression> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no save found, starting fresh");
            return Ok(MetaProgression::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> LoadResult<MetaProgression> {
        serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse save JSON: {}", e))
    }
}
