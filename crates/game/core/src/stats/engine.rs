//! Modifier application.
//!
//! Every snapshot in the game goes through the same two-phase stack:
//!
//! ```text
//! clone(base) → Σ additive → Π multiplicative → final
//! ```
//!
//! The fixed order makes the output independent of the order in which
//! modifiers were collected: with base `1.0`, `+0.5` and `×1.2` always give
//! `(1.0 + 0.5) × 1.2 = 1.8`, never `1.0 × 1.2 + 0.5 = 1.7`.

use std::collections::BTreeMap;

use super::model::{StatField, StatModel, StatModelError};
use super::modifier::{ModifierKind, StatModifier};

/// Why a modifier was left out of a calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The stat name does not match any [`StatField`].
    UnknownStat,
    /// The modifier value is NaN or infinite.
    NonFiniteValue,
}

/// Diagnostic record for a discarded modifier.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedModifier {
    pub stat: String,
    pub source: String,
    pub reason: SkipReason,
}

/// Aggregated totals for one stat, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModifierTotals {
    /// Sum of every additive modifier (0 when none).
    pub additive: f64,
    /// Product of every multiplicative modifier (1 when none).
    pub multiplicative: f64,
}

impl Default for ModifierTotals {
    fn default() -> Self {
        Self {
            additive: 0.0,
            multiplicative: 1.0,
        }
    }
}

/// Pure modifier engine. Holds no state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModifierEngine;

impl ModifierEngine {
    /// Applies `modifiers` to a copy of `base`.
    ///
    /// Invalid modifiers are skipped with a warning; see
    /// [`calculate_with_report`](Self::calculate_with_report) to inspect them.
    pub fn calculate(base: &StatModel, modifiers: &[StatModifier]) -> StatModel {
        Self::calculate_with_report(base, modifiers).0
    }

    /// Same as [`calculate`](Self::calculate), but rejects a base snapshot
    /// that is not usable (non-finite fields).
    pub fn calculate_checked(
        base: &StatModel,
        modifiers: &[StatModifier],
    ) -> Result<StatModel, StatModelError> {
        base.validate()?;
        Ok(Self::calculate(base, modifiers))
    }

    /// Applies modifiers and returns the list of entries that were discarded.
    pub fn calculate_with_report(
        base: &StatModel,
        modifiers: &[StatModifier],
    ) -> (StatModel, Vec<SkippedModifier>) {
        let mut result = base.clone();
        let mut skipped = Vec::new();

        let mut additive = Vec::new();
        let mut multiplicative = Vec::new();

        for modifier in modifiers {
            match Self::validate(modifier) {
                Ok(field) => match modifier.kind {
                    ModifierKind::Additive => additive.push((field, modifier.value)),
                    ModifierKind::Multiplicative => multiplicative.push((field, modifier.value)),
                },
                Err(reason) => {
                    tracing::warn!(
                        stat = %modifier.stat,
                        source = %modifier.source,
                        ?reason,
                        "skipping invalid stat modifier"
                    );
                    skipped.push(SkippedModifier {
                        stat: modifier.stat.clone(),
                        source: modifier.source.clone(),
                        reason,
                    });
                }
            }
        }

        for (field, value) in additive {
            *result.get_mut(field) += value;
        }
        for (field, value) in multiplicative {
            *result.get_mut(field) *= value;
        }

        (result, skipped)
    }

    /// Sum of additive and product of multiplicative modifiers targeting
    /// `stat_name`. Invalid entries are ignored.
    pub fn get_total_modifiers(modifiers: &[StatModifier], stat_name: &str) -> ModifierTotals {
        let target = StatField::parse(stat_name);
        modifiers
            .iter()
            .filter(|m| m.value.is_finite())
            .filter(|m| match target {
                Some(field) => m.field() == Some(field),
                None => m.stat == stat_name,
            })
            .fold(ModifierTotals::default(), |mut totals, m| {
                match m.kind {
                    ModifierKind::Additive => totals.additive += m.value,
                    ModifierKind::Multiplicative => totals.multiplicative *= m.value,
                }
                totals
            })
    }

    /// Groups modifiers by the stat name they target, in name order.
    pub fn group_modifiers_by_stat(
        modifiers: &[StatModifier],
    ) -> BTreeMap<&str, Vec<&StatModifier>> {
        let mut groups: BTreeMap<&str, Vec<&StatModifier>> = BTreeMap::new();
        for modifier in modifiers {
            groups
                .entry(modifier.stat.as_str())
                .or_default()
                .push(modifier);
        }
        groups
    }

    fn validate(modifier: &StatModifier) -> Result<StatField, SkipReason> {
        let field = modifier.field().ok_or(SkipReason::UnknownStat)?;
        if !modifier.value.is_finite() {
            return Err(SkipReason::NonFiniteValue);
        }
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn additive_applies_before_multiplicative() {
        let base = StatModel::new();
        // Collected in "wrong" order on purpose
        let mods = vec![
            StatModifier::multiplicative(StatField::DamageMultiplier, 1.2, "upgrade"),
            StatModifier::additive(StatField::DamageMultiplier, 0.5, "module"),
        ];

        let result = ModifierEngine::calculate(&base, &mods);
        assert_close(result.damage_multiplier, 1.8);
    }

    #[test]
    fn base_is_never_mutated() {
        let base = StatModel::new();
        let before = base.damage_multiplier.to_bits();
        let mods = vec![StatModifier::additive(
            StatField::DamageMultiplier,
            3.0,
            "test",
        )];

        let result = ModifierEngine::calculate(&base, &mods);
        assert_eq!(base.damage_multiplier.to_bits(), before);
        assert_close(result.damage_multiplier, 4.0);
    }

    #[test]
    fn empty_modifier_list_returns_equal_copy() {
        let base = StatModel::new();
        assert_eq!(ModifierEngine::calculate(&base, &[]), base);
    }

    #[test]
    fn invalid_modifiers_are_skipped_and_reported() {
        let base = StatModel::new();
        let mods = vec![
            StatModifier::new("warpDrive", ModifierKind::Additive, 5.0, "module:bogus"),
            StatModifier::additive(StatField::MaxShield, f64::NAN, "module:nan"),
            StatModifier::additive(StatField::MaxShield, 30.0, "module:ok"),
        ];

        let (result, skipped) = ModifierEngine::calculate_with_report(&base, &mods);
        assert_close(result.max_shield, 150.0);
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].reason, SkipReason::UnknownStat);
        assert_eq!(skipped[0].source, "module:bogus");
        assert_eq!(skipped[1].reason, SkipReason::NonFiniteValue);
    }

    #[test]
    fn calculate_checked_rejects_broken_base() {
        let mut base = StatModel::new();
        base.max_armor = f64::INFINITY;
        assert!(ModifierEngine::calculate_checked(&base, &[]).is_err());
    }

    #[test]
    fn totals_sum_and_multiply_per_stat() {
        let mods = vec![
            StatModifier::additive(StatField::CritChance, 0.05, "a"),
            StatModifier::additive(StatField::CritChance, 0.10, "b"),
            StatModifier::multiplicative(StatField::CritChance, 2.0, "c"),
            StatModifier::multiplicative(StatField::CritChance, 1.5, "d"),
            StatModifier::additive(StatField::MaxShield, 99.0, "e"),
        ];

        let totals = ModifierEngine::get_total_modifiers(&mods, "crit_chance");
        assert_close(totals.additive, 0.15);
        assert_close(totals.multiplicative, 3.0);

        let none = ModifierEngine::get_total_modifiers(&mods, "maxArmor");
        assert_eq!(none, ModifierTotals::default());
    }

    #[test]
    fn grouping_is_keyed_by_stat_name() {
        let mods = vec![
            StatModifier::additive(StatField::MaxShield, 10.0, "a"),
            StatModifier::additive(StatField::MaxArmor, 10.0, "b"),
            StatModifier::multiplicative(StatField::MaxShield, 1.1, "c"),
        ];

        let groups = ModifierEngine::group_modifiers_by_stat(&mods);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["maxShield"].len(), 2);
        assert_eq!(groups["maxArmor"][0].source, "b");
    }

    #[test]
    fn calculation_is_idempotent() {
        let base = StatModel::new();
        let mods = vec![
            StatModifier::additive(StatField::FireRateMultiplier, 0.25, "a"),
            StatModifier::multiplicative(StatField::MaxStructure, 1.3, "b"),
        ];
        assert_eq!(
            ModifierEngine::calculate(&base, &mods),
            ModifierEngine::calculate(&base, &mods)
        );
    }
}
