//! Data-driven content for the survivors combat core.
//!
//! This crate owns every file format the core never sees:
//! - Catalog tables: ships, weapons, modules, synergies, keystones,
//!   upgrades and enemy profiles (RON)
//! - Game configuration (TOML)
//! - Meta progression saves (JSON)
//!
//! The same files are embedded in the crate, so a host can run without a
//! data directory via [`ContentFactory::builtin`].
//!
//! Loaded content is validated with [`validate_catalog`]; problems are soft
//! and come back as [`ContentWarning`]s.

pub mod validate;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use validate::{ContentWarning, validate_catalog};

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, CatalogSources, ConfigLoader, ContentFactory, LoadResult, SaveLoader,
};
