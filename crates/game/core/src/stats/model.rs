//! Final computed ship statistics.
//!
//! A [`StatModel`] is an immutable snapshot: the pipeline clones the base,
//! applies modifiers, sanitizes the result and hands it out read-only. Nothing
//! mutates a snapshot after it has been produced; equipment changes produce a
//! new one.

use strum::IntoEnumIterator;

use crate::error::{ErrorSeverity, GameError};

/// Name of a single numeric field in [`StatModel`].
///
/// Modifiers address stats by name so that content files can target them.
/// The canonical spelling is camelCase (`damageMultiplier`); [`StatField::parse`]
/// also accepts snake_case.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum StatField {
    DamageMultiplier,
    FireRateMultiplier,
    CritChance,
    CritMultiplier,
    MaxShield,
    MaxArmor,
    MaxStructure,
    ShieldRegen,
    ArmorRegen,
    StructureRegen,
    ArmorReduction,
    HeatGenerationMultiplier,
    CooldownReduction,
    Lifesteal,
    MaxHeat,
    HeatCooling,
    MoveSpeed,
    PickupRadius,
    XpMultiplier,
}

impl StatField {
    /// Resolves a stat name, accepting both `critChance` and `crit_chance`.
    pub fn parse(name: &str) -> Option<Self> {
        if let Ok(field) = name.parse::<Self>() {
            return Some(field);
        }
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::iter().find(|field| field.as_ref().to_ascii_lowercase() == normalized)
    }
}

/// Error raised when a value cannot serve as a base snapshot.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StatModelError {
    #[error("stat `{field}` is not a finite number ({value})")]
    NonFinite { field: StatField, value: f64 },
}

impl GameError for StatModelError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonFinite { .. } => "STAT_NON_FINITE",
        }
    }
}

/// Snapshot of a ship's final statistics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct StatModel {
    pub damage_multiplier: f64,
    pub fire_rate_multiplier: f64,
    /// Probability in `[0, 1]`.
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub max_shield: f64,
    pub max_armor: f64,
    pub max_structure: f64,
    /// Shield HP per second once the regen delay has elapsed.
    pub shield_regen: f64,
    pub armor_regen: f64,
    pub structure_regen: f64,
    /// Flat damage removed at the armor stage (player only).
    pub armor_reduction: f64,
    pub heat_generation_multiplier: f64,
    /// Fraction in `[0, 1]` shaved off weapon intervals.
    pub cooldown_reduction: f64,
    /// Fraction of dealt damage returned as structure HP.
    pub lifesteal: f64,
    pub max_heat: f64,
    pub heat_cooling: f64,
    pub move_speed: f64,
    pub pickup_radius: f64,
    pub xp_multiplier: f64,
}

impl StatModel {
    pub const DEFAULT_DAMAGE_MULTIPLIER: f64 = 1.0;
    pub const DEFAULT_FIRE_RATE_MULTIPLIER: f64 = 1.0;
    pub const DEFAULT_CRIT_CHANCE: f64 = 0.0;
    pub const DEFAULT_CRIT_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_MAX_SHIELD: f64 = 120.0;
    pub const DEFAULT_MAX_ARMOR: f64 = 150.0;
    pub const DEFAULT_MAX_STRUCTURE: f64 = 130.0;
    pub const DEFAULT_SHIELD_REGEN: f64 = 8.0;
    pub const DEFAULT_ARMOR_REDUCTION: f64 = 0.0;
    pub const DEFAULT_HEAT_GENERATION_MULTIPLIER: f64 = 1.0;
    pub const DEFAULT_COOLDOWN_REDUCTION: f64 = 0.0;
    pub const DEFAULT_MAX_HEAT: f64 = 100.0;
    pub const DEFAULT_HEAT_COOLING: f64 = 15.0;
    pub const DEFAULT_MOVE_SPEED: f64 = 160.0;
    pub const DEFAULT_PICKUP_RADIUS: f64 = 60.0;

    /// Snapshot with every field at its documented default.
    pub const fn new() -> Self {
        Self {
            damage_multiplier: Self::DEFAULT_DAMAGE_MULTIPLIER,
            fire_rate_multiplier: Self::DEFAULT_FIRE_RATE_MULTIPLIER,
            crit_chance: Self::DEFAULT_CRIT_CHANCE,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            max_shield: Self::DEFAULT_MAX_SHIELD,
            max_armor: Self::DEFAULT_MAX_ARMOR,
            max_structure: Self::DEFAULT_MAX_STRUCTURE,
            shield_regen: Self::DEFAULT_SHIELD_REGEN,
            armor_regen: 0.0,
            structure_regen: 0.0,
            armor_reduction: Self::DEFAULT_ARMOR_REDUCTION,
            heat_generation_multiplier: Self::DEFAULT_HEAT_GENERATION_MULTIPLIER,
            cooldown_reduction: Self::DEFAULT_COOLDOWN_REDUCTION,
            lifesteal: 0.0,
            max_heat: Self::DEFAULT_MAX_HEAT,
            heat_cooling: Self::DEFAULT_HEAT_COOLING,
            move_speed: Self::DEFAULT_MOVE_SPEED,
            pickup_radius: Self::DEFAULT_PICKUP_RADIUS,
            xp_multiplier: 1.0,
        }
    }

    /// Builds a snapshot from a partial list of overrides; every field not
    /// mentioned keeps its default.
    pub fn from_config<'a>(overrides: impl IntoIterator<Item = &'a (StatField, f64)>) -> Self {
        let mut stats = Self::new();
        for (field, value) in overrides {
            *stats.get_mut(*field) = *value;
        }
        stats
    }

    pub fn get(&self, field: StatField) -> f64 {
        match field {
            StatField::DamageMultiplier => self.damage_multiplier,
            StatField::FireRateMultiplier => self.fire_rate_multiplier,
            StatField::CritChance => self.crit_chance,
            StatField::CritMultiplier => self.crit_multiplier,
            StatField::MaxShield => self.max_shield,
            StatField::MaxArmor => self.max_armor,
            StatField::MaxStructure => self.max_structure,
            StatField::ShieldRegen => self.shield_regen,
            StatField::ArmorRegen => self.armor_regen,
            StatField::StructureRegen => self.structure_regen,
            StatField::ArmorReduction => self.armor_reduction,
            StatField::HeatGenerationMultiplier => self.heat_generation_multiplier,
            StatField::CooldownReduction => self.cooldown_reduction,
            StatField::Lifesteal => self.lifesteal,
            StatField::MaxHeat => self.max_heat,
            StatField::HeatCooling => self.heat_cooling,
            StatField::MoveSpeed => self.move_speed,
            StatField::PickupRadius => self.pickup_radius,
            StatField::XpMultiplier => self.xp_multiplier,
        }
    }

    pub fn get_mut(&mut self, field: StatField) -> &mut f64 {
        match field {
            StatField::DamageMultiplier => &mut self.damage_multiplier,
            StatField::FireRateMultiplier => &mut self.fire_rate_multiplier,
            StatField::CritChance => &mut self.crit_chance,
            StatField::CritMultiplier => &mut self.crit_multiplier,
            StatField::MaxShield => &mut self.max_shield,
            StatField::MaxArmor => &mut self.max_armor,
            StatField::MaxStructure => &mut self.max_structure,
            StatField::ShieldRegen => &mut self.shield_regen,
            StatField::ArmorRegen => &mut self.armor_regen,
            StatField::StructureRegen => &mut self.structure_regen,
            StatField::ArmorReduction => &mut self.armor_reduction,
            StatField::HeatGenerationMultiplier => &mut self.heat_generation_multiplier,
            StatField::CooldownReduction => &mut self.cooldown_reduction,
            StatField::Lifesteal => &mut self.lifesteal,
            StatField::MaxHeat => &mut self.max_heat,
            StatField::HeatCooling => &mut self.heat_cooling,
            StatField::MoveSpeed => &mut self.move_speed,
            StatField::PickupRadius => &mut self.pickup_radius,
            StatField::XpMultiplier => &mut self.xp_multiplier,
        }
    }

    /// Checks that the snapshot is usable as a modifier base.
    pub fn validate(&self) -> Result<(), StatModelError> {
        for field in StatField::iter() {
            let value = self.get(field);
            if !value.is_finite() {
                return Err(StatModelError::NonFinite { field, value });
            }
        }
        Ok(())
    }

    /// Returns a copy with every field clamped into its declared range.
    ///
    /// Probabilities and fractions land in `[0, 1]`; everything else is
    /// floored at zero.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        for field in StatField::iter() {
            let value = out.get_mut(field);
            *value = match field {
                StatField::CritChance | StatField::CooldownReduction => value.clamp(0.0, 1.0),
                _ => value.max(0.0),
            };
        }
        out
    }
}

impl Default for StatModel {
    fn default() -> Self {
        Self::new()
    }
}
