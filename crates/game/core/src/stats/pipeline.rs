//! Loadout → final snapshot.
//!
//! The only place modifier sources are collected. Sources are gathered in a
//! fixed order (modules, synergies, upgrades, keystones) and applied in one
//! [`ModifierEngine`] pass; the engine's two-phase rule makes the final
//! numbers independent of that order anyway, but a fixed order keeps skip
//! reports stable.

use std::collections::BTreeMap;

use super::engine::{ModifierEngine, SkippedModifier};
use super::model::{StatModel, StatModelError};
use super::modifier::{ModifierKind, StatModifier};
use crate::catalog::{Catalog, ModuleData, UpgradeData, WeaponData};
use crate::config::TagConfig;
use crate::defense::ModuleEffects;
use crate::error::{ErrorSeverity, GameError};
use crate::meta::MetaProgression;
use crate::tags::{ActiveSynergy, TagEffects, TagSynergyEngine, evaluate_synergies};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("unknown ship `{0}`")]
    UnknownShip(String),

    #[error("ship base stats are unusable: {0}")]
    InvalidBase(#[from] StatModelError),
}

impl GameError for PipelineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownShip(_) => ErrorSeverity::Validation,
            Self::InvalidBase(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownShip(_) => "PIPELINE_UNKNOWN_SHIP",
            Self::InvalidBase(_) => "PIPELINE_INVALID_BASE",
        }
    }
}

/// What the player has equipped, by catalog id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Loadout {
    pub ship: String,
    pub weapons: Vec<String>,
    pub modules: Vec<String>,
    /// Upgrade id → level.
    pub upgrades: BTreeMap<String, u32>,
    pub keystones: Vec<String>,
}

impl Loadout {
    pub fn new(ship: impl Into<String>) -> Self {
        Self {
            ship: ship.into(),
            ..Self::default()
        }
    }
}

/// Everything derived from a loadout in one recompute.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedLoadout {
    pub stats: StatModel,
    pub tag_effects: TagEffects,
    pub module_effects: ModuleEffects,
    pub active_synergies: Vec<ActiveSynergy>,
    pub skipped: Vec<SkippedModifier>,
}

/// Computes stat snapshots from loadouts.
#[derive(Clone, Debug, Default)]
pub struct StatPipeline {
    tags: TagSynergyEngine,
}

impl StatPipeline {
    pub fn new(config: TagConfig) -> Self {
        Self {
            tags: TagSynergyEngine::new(config),
        }
    }

    pub fn tag_engine(&self) -> &TagSynergyEngine {
        &self.tags
    }

    pub fn compute(
        &self,
        catalog: &Catalog,
        loadout: &Loadout,
        meta: &MetaProgression,
    ) -> Result<ComputedLoadout, PipelineError> {
        let ship = catalog
            .ship(&loadout.ship)
            .ok_or_else(|| PipelineError::UnknownShip(loadout.ship.clone()))?;

        let overrides: Vec<_> = ship
            .base_stats
            .iter()
            .map(|(field, value)| (*field, *value))
            .collect();
        let base = meta.seed(&StatModel::from_config(&overrides));
        base.validate()?;

        let weapons: Vec<&WeaponData> =
            resolve(&loadout.weapons, "weapon", |id| catalog.weapon(id));
        let modules: Vec<&ModuleData> =
            resolve(&loadout.modules, "module", |id| catalog.module(id));

        let tag_effects = self.tags.calculate_tag_effects(&weapons, &modules);
        let (active_synergies, synergy_modifiers) =
            evaluate_synergies(catalog.synergies(), &tag_effects);

        let mut modifiers: Vec<StatModifier> = Vec::new();
        for module in &modules {
            let source = format!("module:{}", module.id);
            modifiers.extend(
                module
                    .modifiers
                    .iter()
                    .map(|m| m.clone().with_source(source.clone())),
            );
        }
        modifiers.extend(synergy_modifiers);
        for (id, level) in &loadout.upgrades {
            match catalog.upgrade(id) {
                Some(upgrade) => modifiers.extend(upgrade_modifiers(upgrade, *level)),
                None => tracing::warn!(upgrade = %id, "ignoring unknown upgrade"),
            }
        }
        for id in &loadout.keystones {
            match catalog.keystone(id) {
                Some(keystone) => {
                    let source = format!("keystone:{}", keystone.id);
                    modifiers.extend(
                        keystone
                            .modifiers
                            .iter()
                            .map(|m| m.clone().with_source(source.clone())),
                    );
                }
                None => tracing::warn!(keystone = %id, "ignoring unknown keystone"),
            }
        }

        let (stats, skipped) = ModifierEngine::calculate_with_report(&base, &modifiers);
        let stats = stats.sanitized();

        let module_effects = ModuleEffects {
            resistance_bonuses: modules
                .iter()
                .flat_map(|m| m.resistances.iter().copied())
                .collect(),
        };

        tracing::debug!(
            ship = %ship.id,
            modifiers = modifiers.len(),
            skipped = skipped.len(),
            synergies = active_synergies.len(),
            "loadout recomputed"
        );

        Ok(ComputedLoadout {
            stats,
            tag_effects,
            module_effects,
            active_synergies,
            skipped,
        })
    }
}

fn resolve<'c, T>(
    ids: &[String],
    what: &'static str,
    lookup: impl Fn(&str) -> Option<&'c T>,
) -> Vec<&'c T> {
    ids.iter()
        .filter_map(|id| {
            let found = lookup(id);
            if found.is_none() {
                tracing::warn!(kind = what, id = %id, "ignoring unknown catalog id");
            }
            found
        })
        .collect()
}

/// Modifiers of `upgrade` at `level`, clamped to its max level.
pub fn upgrade_modifiers(upgrade: &UpgradeData, level: u32) -> Vec<StatModifier> {
    let level = level.min(upgrade.max_level);
    if level == 0 {
        return Vec::new();
    }
    let source = format!("upgrade:{}:{}", upgrade.id, level);
    upgrade
        .per_level
        .iter()
        .map(|m| {
            let value = match m.kind {
                ModifierKind::Additive => m.value * f64::from(level),
                ModifierKind::Multiplicative => {
                    m.value.powi(i32::try_from(level).unwrap_or(i32::MAX))
                }
            };
            StatModifier::new(m.stat.clone(), m.kind, value, source.clone())
        })
        .collect()
}
