//! Cross-reference checks over a loaded [`Catalog`].
//!
//! Nothing here is fatal. The engines already skip unknown stats and ids at
//! runtime; these checks surface the same problems once, at load time, so
//! that content authors see them without having to play.

use survivor_core::{Catalog, StatField, StatModifier};

/// A soft content problem found while validating a catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContentWarning {
    #[error("{owner}: modifier targets unknown stat `{stat}`")]
    UnknownStat { owner: String, stat: String },

    #[error("{owner}: references unknown {kind} `{id}`")]
    DanglingId {
        owner: String,
        kind: &'static str,
        id: String,
    },

    #[error("{owner}: has no tiers")]
    EmptySynergy { owner: String },
}

/// Checks every table and logs each finding with `warn!`.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ContentWarning> {
    let mut warnings = Vec::new();

    for ship in catalog.ships() {
        let owner = format!("ship:{}", ship.id);
        for id in &ship.starting_weapons {
            if catalog.weapon(id).is_none() {
                warnings.push(dangling(&owner, "weapon", id));
            }
        }
        for id in &ship.loot_pool.weapons {
            if catalog.weapon(id).is_none() {
                warnings.push(dangling(&owner, "weapon", id));
            }
        }
        for id in &ship.loot_pool.modules {
            if catalog.module(id).is_none() {
                warnings.push(dangling(&owner, "module", id));
            }
        }
        for id in &ship.loot_pool.upgrades {
            if catalog.upgrade(id).is_none() {
                warnings.push(dangling(&owner, "upgrade", id));
            }
        }
    }

    for module in catalog.modules() {
        check_modifiers(&format!("module:{}", module.id), &module.modifiers, &mut warnings);
    }
    for keystone in catalog.keystones() {
        check_modifiers(
            &format!("keystone:{}", keystone.id),
            &keystone.modifiers,
            &mut warnings,
        );
    }
    for upgrade in catalog.upgrades() {
        check_modifiers(
            &format!("upgrade:{}", upgrade.id),
            &upgrade.per_level,
            &mut warnings,
        );
    }
    for synergy in catalog.synergies() {
        let owner = format!("synergy:{}", synergy.id);
        if synergy.tiers.is_empty() {
            warnings.push(ContentWarning::EmptySynergy {
                owner: owner.clone(),
            });
        }
        for tier in &synergy.tiers {
            check_modifiers(&owner, &tier.modifiers, &mut warnings);
        }
    }

    for warning in &warnings {
        tracing::warn!(%warning, "content warning");
    }
    warnings
}

fn check_modifiers(owner: &str, modifiers: &[StatModifier], warnings: &mut Vec<ContentWarning>) {
    for modifier in modifiers {
        if StatField::parse(&modifier.stat).is_none() {
            warnings.push(ContentWarning::UnknownStat {
                owner: owner.to_string(),
                stat: modifier.stat.clone(),
            });
        }
    }
}

fn dangling(owner: &str, kind: &'static str, id: &str) -> ContentWarning {
    ContentWarning::DanglingId {
        owner: owner.to_string(),
        kind,
        id: id.to_string(),
    }
}
