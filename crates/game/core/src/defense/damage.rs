//! Damage types and validated damage packets.

use crate::error::{ErrorSeverity, GameError};

// ============================================================================
// Damage Type
// ============================================================================

/// Damage type used to look up layer resistances.
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
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    /// Electromagnetic damage. Also accepted under the legacy name `energy`.
    #[strum(to_string = "em", serialize = "energy")]
    #[cfg_attr(feature = "serde", serde(alias = "energy"))]
    Em,
    Thermal,
    Kinetic,
    Explosive,
}

impl DamageType {
    pub const ALL: [DamageType; 4] = [
        DamageType::Em,
        DamageType::Thermal,
        DamageType::Kinetic,
        DamageType::Explosive,
    ];

    pub const fn index(self) -> usize {
        match self {
            DamageType::Em => 0,
            DamageType::Thermal => 1,
            DamageType::Kinetic => 2,
            DamageType::Explosive => 3,
        }
    }
}

// ============================================================================
// Damage Packet
// ============================================================================

/// Errors raised while building a [`DamagePacket`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DamagePacketError {
    #[error("damage must be a finite, non-negative number (got {0})")]
    InvalidDamage(f64),

    #[error("unknown damage type `{0}`")]
    UnknownDamageType(String),

    #[error("crit multiplier must be a finite, non-negative number (got {0})")]
    InvalidCritMultiplier(f64),

    #[error("{field} must be a number (got {value})")]
    InvalidRatio { field: &'static str, value: f64 },
}

impl GameError for DamagePacketError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDamage(_) => "DAMAGE_INVALID_AMOUNT",
            Self::UnknownDamageType(_) => "DAMAGE_UNKNOWN_TYPE",
            Self::InvalidCritMultiplier(_) => "DAMAGE_INVALID_CRIT",
            Self::InvalidRatio { .. } => "DAMAGE_INVALID_RATIO",
        }
    }
}

/// One hit worth of damage, validated at construction.
///
/// Fields are private so a packet cannot change after it has been built;
/// builder methods consume and return a new packet.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DamagePacket {
    damage: f64,
    damage_type: DamageType,
    crit_multiplier: f64,
    shield_penetration: f64,
    armor_penetration: f64,
}

impl DamagePacket {
    /// Creates a non-critical, non-penetrating packet.
    pub fn new(damage: f64, damage_type: DamageType) -> Result<Self, DamagePacketError> {
        if !damage.is_finite() || damage < 0.0 {
            return Err(DamagePacketError::InvalidDamage(damage));
        }
        Ok(Self {
            damage,
            damage_type,
            crit_multiplier: 1.0,
            shield_penetration: 0.0,
            armor_penetration: 0.0,
        })
    }

    /// Builds a packet from loosely typed inputs (e.g. a relayed message).
    pub fn from_parts(
        damage: f64,
        damage_type: &str,
        crit_multiplier: f64,
        shield_penetration: f64,
        armor_penetration: f64,
    ) -> Result<Self, DamagePacketError> {
        let damage_type = damage_type
            .parse::<DamageType>()
            .map_err(|_| DamagePacketError::UnknownDamageType(damage_type.to_string()))?;
        Self::new(damage, damage_type)?
            .with_crit_multiplier(crit_multiplier)?
            .with_shield_penetration(shield_penetration)?
            .with_armor_penetration(armor_penetration)
    }

    pub fn with_crit_multiplier(mut self, multiplier: f64) -> Result<Self, DamagePacketError> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(DamagePacketError::InvalidCritMultiplier(multiplier));
        }
        self.crit_multiplier = multiplier;
        Ok(self)
    }

    /// Sets the shield penetration ratio, clamped into `[0, 1]`.
    pub fn with_shield_penetration(mut self, ratio: f64) -> Result<Self, DamagePacketError> {
        self.shield_penetration = clamp_ratio("shield_penetration", ratio)?;
        Ok(self)
    }

    /// Sets the armor penetration ratio, clamped into `[0, 1]`.
    pub fn with_armor_penetration(mut self, ratio: f64) -> Result<Self, DamagePacketError> {
        self.armor_penetration = clamp_ratio("armor_penetration", ratio)?;
        Ok(self)
    }

    pub fn damage(&self) -> f64 {
        self.damage
    }

    pub fn damage_type(&self) -> DamageType {
        self.damage_type
    }

    pub fn crit_multiplier(&self) -> f64 {
        self.crit_multiplier
    }

    pub fn is_critical(&self) -> bool {
        self.crit_multiplier > 1.0
    }

    pub fn shield_penetration(&self) -> f64 {
        self.shield_penetration
    }

    pub fn armor_penetration(&self) -> f64 {
        self.armor_penetration
    }

    /// Base damage times the crit multiplier. This is the raw amount that
    /// enters the defense pipeline.
    pub fn final_damage(&self) -> f64 {
        self.damage * self.crit_multiplier
    }
}

fn clamp_ratio(field: &'static str, value: f64) -> Result<f64, DamagePacketError> {
    if value.is_nan() {
        return Err(DamagePacketError::InvalidRatio { field, value });
    }
    Ok(value.clamp(0.0, 1.0))
}
