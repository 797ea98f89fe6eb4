//! Game configuration and tunable parameters.
//!
//! Every section has a `Default` matching the shipped balance, so a config
//! file only needs to mention what it changes.

use crate::defense::{LayerKind, RESISTANCE_CAP, ResistanceTable};
use crate::error::{ErrorSeverity, GameError};

/// Error raised by [`GameConfig::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{section}.{field} is out of range: {reason}")]
    OutOfRange {
        section: &'static str,
        field: &'static str,
        reason: &'static str,
    },
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        "CONFIG_OUT_OF_RANGE"
    }
}

fn check(
    ok: bool,
    section: &'static str,
    field: &'static str,
    reason: &'static str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            section,
            field,
            reason,
        })
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub defense: DefenseConfig,
    pub tags: TagConfig,
    pub heat: HeatConfig,
    pub waves: WaveConfig,
    pub arena: ArenaConfig,
    pub player: PlayerConfig,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects values that would break an invariant at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.defense.validate()?;
        self.tags.validate()?;
        self.heat.validate()?;
        self.waves.validate()?;
        self.arena.validate()?;
        self.player.validate()
    }
}

// ============================================================================
// Defense
// ============================================================================

/// Regeneration delays and baseline resistances.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefenseConfig {
    pub shield_regen_delay: f64,
    pub armor_regen_delay: f64,
    pub structure_regen_delay: f64,
    pub shield_resistances: ResistanceTable,
    pub armor_resistances: ResistanceTable,
    pub structure_resistances: ResistanceTable,
    /// Invulnerability window granted to the player after a contact hit.
    pub contact_invulnerability: f64,
}

impl DefenseConfig {
    pub const DEFAULT_SHIELD_REGEN_DELAY: f64 = 3.0;
    pub const DEFAULT_ARMOR_REGEN_DELAY: f64 = 5.0;
    pub const DEFAULT_STRUCTURE_REGEN_DELAY: f64 = 5.0;
    pub const DEFAULT_CONTACT_INVULNERABILITY: f64 = 0.5;

    pub fn base_resistances(&self, layer: LayerKind) -> ResistanceTable {
        match layer {
            LayerKind::Shield => self.shield_resistances,
            LayerKind::Armor => self.armor_resistances,
            LayerKind::Structure => self.structure_resistances,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for delay in [
            self.shield_regen_delay,
            self.armor_regen_delay,
            self.structure_regen_delay,
        ] {
            check(
                delay.is_finite() && delay >= 0.0,
                "defense",
                "regen_delay",
                "must be a non-negative number of seconds",
            )?;
        }
        for table in [
            self.shield_resistances,
            self.armor_resistances,
            self.structure_resistances,
        ] {
            for value in [table.em, table.thermal, table.kinetic, table.explosive] {
                check(
                    (0.0..=RESISTANCE_CAP).contains(&value),
                    "defense",
                    "resistances",
                    "must lie within [0, 0.75]",
                )?;
            }
        }
        check(
            self.contact_invulnerability.is_finite() && self.contact_invulnerability >= 0.0,
            "defense",
            "contact_invulnerability",
            "must be a non-negative number of seconds",
        )
    }
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self {
            shield_regen_delay: Self::DEFAULT_SHIELD_REGEN_DELAY,
            armor_regen_delay: Self::DEFAULT_ARMOR_REGEN_DELAY,
            structure_regen_delay: Self::DEFAULT_STRUCTURE_REGEN_DELAY,
            shield_resistances: ResistanceTable::new(0.0, 0.2, 0.4, 0.5),
            armor_resistances: ResistanceTable::new(0.5, 0.35, 0.25, 0.1),
            structure_resistances: ResistanceTable::new(0.1, 0.1, 0.1, 0.1),
            contact_invulnerability: Self::DEFAULT_CONTACT_INVULNERABILITY,
        }
    }
}

// ============================================================================
// Tags
// ============================================================================

/// Tag tier thresholds and the majority malus.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TagConfig {
    pub low_tier_count: u32,
    pub low_tier_bonus: f64,
    pub high_tier_count: u32,
    pub high_tier_bonus: f64,
    /// Applied to every non-majority offensive tag (negative).
    pub malus: f64,
}

impl TagConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check(
            self.low_tier_count > 0 && self.low_tier_count < self.high_tier_count,
            "tags",
            "low_tier_count",
            "must be positive and below high_tier_count",
        )?;
        check(
            self.malus <= 0.0 && self.malus > -1.0,
            "tags",
            "malus",
            "must lie within (-1, 0]",
        )
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            low_tier_count: 3,
            low_tier_bonus: 0.08,
            high_tier_count: 5,
            high_tier_bonus: 0.18,
            malus: -0.10,
        }
    }
}

// ============================================================================
// Heat
// ============================================================================

/// Overheat hysteresis parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeatConfig {
    /// Passive heat per second while not overheated.
    pub passive_generation: f64,
    /// Overheat clears at or below this fraction of max heat...
    pub recovery_ratio: f64,
    /// ...and only after this many seconds in the overheated state.
    pub min_disable_time: f64,
}

impl HeatConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check(
            self.recovery_ratio > 0.0 && self.recovery_ratio < 1.0,
            "heat",
            "recovery_ratio",
            "must lie within (0, 1)",
        )?;
        check(
            self.min_disable_time >= 0.0 && self.passive_generation >= 0.0,
            "heat",
            "min_disable_time",
            "timers and generation must be non-negative",
        )
    }
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            passive_generation: 2.0,
            recovery_ratio: 0.6,
            min_disable_time: 2.0,
        }
    }
}

// ============================================================================
// Waves
// ============================================================================

/// Spawn economy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaveConfig {
    /// Seconds per wave.
    pub wave_duration: f64,
    pub base_budget: u32,
    /// Extra budget per wave after the first.
    pub budget_growth: u32,
    /// Seconds between spawn ticks.
    pub spawn_interval: f64,
    /// Spawning pauses while this many enemies are alive.
    pub max_alive: usize,
}

impl WaveConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check(
            self.wave_duration > 0.0 && self.spawn_interval > 0.0,
            "waves",
            "wave_duration",
            "durations must be positive",
        )?;
        check(
            self.max_alive > 0,
            "waves",
            "max_alive",
            "must allow at least one enemy",
        )
    }

    /// Budget available at the start of `wave` (1-based).
    pub fn budget_for(&self, wave: u32) -> u32 {
        self.base_budget
            .saturating_add(self.budget_growth.saturating_mul(wave.saturating_sub(1)))
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            wave_duration: 30.0,
            base_budget: 20,
            budget_growth: 10,
            spawn_interval: 0.75,
            max_alive: 120,
        }
    }
}

// ============================================================================
// Arena / Player
// ============================================================================

/// Play field size and spawn ring.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
    /// Enemies appear on a ring this far from the player.
    pub spawn_distance: f64,
}

impl ArenaConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check(
            self.width > 0.0 && self.height > 0.0 && self.spawn_distance > 0.0,
            "arena",
            "width",
            "dimensions must be positive",
        )
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1200.0,
            spawn_distance: 520.0,
        }
    }
}

/// Player-side tunables that are not stats.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    pub radius: f64,
    /// XP needed for level 2; later levels scale by `xp_growth`.
    pub base_xp: f64,
    pub xp_growth: f64,
    /// Shortest interval any weapon can reach, in seconds.
    pub min_fire_interval: f64,
}

impl PlayerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check(
            self.base_xp > 0.0 && self.xp_growth >= 1.0,
            "player",
            "base_xp",
            "xp curve must be positive and non-decreasing",
        )?;
        check(
            self.min_fire_interval > 0.0,
            "player",
            "min_fire_interval",
            "must be positive",
        )
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 16.0,
            base_xp: 10.0,
            xp_growth: 1.25,
            min_fire_interval: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn resistance_above_cap_is_rejected() {
        let mut config = GameConfig::default();
        config.defense.armor_resistances.kinetic = 0.9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                section: "defense",
                ..
            })
        ));
    }

    #[test]
    fn overlapping_tag_tiers_are_rejected() {
        let mut config = GameConfig::default();
        config.tags.low_tier_count = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn wave_budget_grows_linearly() {
        let waves = WaveConfig::default();
        assert_eq!(waves.budget_for(1), 20);
        assert_eq!(waves.budget_for(3), 40);
    }
}
