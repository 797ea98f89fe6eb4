//! Persistent meta-progression, consumed read-only at session start.

use std::collections::BTreeSet;

use crate::stats::StatModel;

/// Unlocks and permanent upgrades bought between runs.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct MetaProgression {
    pub unlocked_weapons: BTreeSet<String>,
    pub unlocked_modules: BTreeSet<String>,
    pub unlocked_passives: BTreeSet<String>,
    /// Flat structure added to the ship.
    pub max_health: f64,
    /// Percent added to the damage multiplier (10 → +0.10).
    pub base_damage_pct: f64,
    /// Percent added to the XP multiplier.
    pub xp_bonus_pct: f64,
}

impl MetaProgression {
    /// Applies the permanent upgrades to a base snapshot. Runs before any
    /// modifier so that modifiers scale the seeded values.
    pub fn seed(&self, base: &StatModel) -> StatModel {
        let mut seeded = base.clone();
        if self.max_health.is_finite() {
            seeded.max_structure += self.max_health;
        }
        if self.base_damage_pct.is_finite() {
            seeded.damage_multiplier += self.base_damage_pct / 100.0;
        }
        if self.xp_bonus_pct.is_finite() {
            seeded.xp_multiplier += self.xp_bonus_pct / 100.0;
        }
        seeded
    }

    pub fn is_weapon_unlocked(&self, id: &str) -> bool {
        self.unlocked_weapons.contains(id)
    }
}
