//! Weapon cooldowns and shot construction.

use crate::catalog::WeaponData;
use crate::defense::{DamagePacket, DamagePacketError};
use crate::heat::{HeatController, HeatTransition};
use crate::rng::SessionRng;
use crate::stats::StatModel;

/// Seconds between shots for `weapon` under `stats`, never below
/// `min_interval`. A non-positive rate never fires.
pub fn fire_interval(weapon: &WeaponData, stats: &StatModel, min_interval: f64) -> f64 {
    let rate = weapon.fire_rate * stats.fire_rate_multiplier;
    if rate <= 0.0 || !rate.is_finite() {
        return f64::INFINITY;
    }
    let reduction = 1.0 - stats.cooldown_reduction.clamp(0.0, 1.0);
    (reduction / rate).max(min_interval)
}

/// Packet for one shot: weapon damage scaled by the damage multiplier and
/// the weapon's tag multiplier, with the crit multiplier when `critical`.
pub fn build_packet(
    weapon: &WeaponData,
    stats: &StatModel,
    tag_multiplier: f64,
    critical: bool,
) -> Result<DamagePacket, DamagePacketError> {
    let damage = weapon.damage * stats.damage_multiplier * tag_multiplier;
    let crit = if critical { stats.crit_multiplier } else { 1.0 };
    DamagePacket::new(damage, weapon.damage_type)?
        .with_crit_multiplier(crit)?
        .with_shield_penetration(weapon.shield_penetration)?
        .with_armor_penetration(weapon.armor_penetration)
}

/// A fired shot, ready to become a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub packet: DamagePacket,
    pub critical: bool,
    /// Set when this shot pushed the heat controller into overheat.
    pub heat: Option<HeatTransition>,
}

/// One equipped weapon and its cooldown.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponSlot {
    pub weapon_id: String,
    cooldown: f64,
}

impl WeaponSlot {
    pub fn new(weapon_id: impl Into<String>) -> Self {
        Self {
            weapon_id: weapon_id.into(),
            cooldown: 0.0,
        }
    }

    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    pub fn tick(&mut self, dt: f64) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    /// Fires if the slot is ready and the ship is not overheated. Adds the
    /// shot's heat and rolls crit with `rng`.
    pub fn fire(
        &mut self,
        weapon: &WeaponData,
        stats: &StatModel,
        tag_multiplier: f64,
        min_interval: f64,
        heat: &mut HeatController,
        rng: &mut SessionRng,
    ) -> Option<Shot> {
        if !self.is_ready() || heat.is_overheated() {
            return None;
        }
        self.cooldown = fire_interval(weapon, stats, min_interval);

        let critical = rng.chance(stats.crit_chance);
        let packet = match build_packet(weapon, stats, tag_multiplier, critical) {
            Ok(packet) => packet,
            Err(error) => {
                tracing::warn!(weapon = %weapon.id, %error, "weapon produced an invalid packet");
                return None;
            }
        };
        let heat = heat.add_heat(weapon.heat_per_shot);
        Some(Shot {
            packet,
            critical,
            heat,
        })
    }
}
