//! Read-only reference data: ships, weapons, modules, keystones, upgrades,
//! synergies and enemy profiles.
//!
//! A [`Catalog`] is built once (usually by the content crate) and passed by
//! reference to whatever needs it. Lookups of unknown ids return `None`;
//! callers log and skip.

use std::collections::BTreeMap;

use crate::defense::{DamageType, ResistanceBonus};
use crate::stats::{StatField, StatModifier};
use crate::tags::{SynergyData, Tag, Tagged};

/// Items a ship may be offered when leveling up.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShipLootPool {
    pub weapons: Vec<String>,
    pub modules: Vec<String>,
    pub upgrades: Vec<String>,
}

impl ShipLootPool {
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty() && self.modules.is_empty() && self.upgrades.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipData {
    pub id: String,
    pub name: String,
    /// Overrides on top of the default snapshot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_stats: BTreeMap<StatField, f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_weapons: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot_pool: ShipLootPool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponData {
    pub id: String,
    pub name: String,
    pub damage: f64,
    /// Shots per second before stat multipliers.
    pub fire_rate: f64,
    pub damage_type: DamageType,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::tags::lenient::deserialize")
    )]
    pub tags: Vec<Tag>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub heat_per_shot: f64,
    pub projectile_speed: f64,
    pub range: f64,
    #[cfg_attr(feature = "serde", serde(default = "WeaponData::default_radius"))]
    pub projectile_radius: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shield_penetration: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor_penetration: f64,
    /// Extra enemies a projectile passes through.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pierce: u32,
}

impl WeaponData {
    pub const DEFAULT_PROJECTILE_RADIUS: f64 = 4.0;

    #[cfg(feature = "serde")]
    fn default_radius() -> f64 {
        Self::DEFAULT_PROJECTILE_RADIUS
    }
}

impl Tagged for WeaponData {
    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleData {
    pub id: String,
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::tags::lenient::deserialize")
    )]
    pub tags: Vec<Tag>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Vec<ResistanceBonus>,
}

impl Tagged for ModuleData {
    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeystoneData {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifier>,
}

/// A leveled ship upgrade. `per_level` is scaled by the level: additive
/// values linearly, multiplicative values as `value^level`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeData {
    pub id: String,
    pub name: String,
    pub max_level: u32,
    pub per_level: Vec<StatModifier>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnemyDefense {
    Health {
        max: f64,
    },
    Layered {
        shield: f64,
        armor: f64,
        structure: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        resistances: Vec<ResistanceBonus>,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyProfile {
    pub id: String,
    pub name: String,
    /// Spawn budget consumed by one instance.
    pub cost: u32,
    /// First wave this enemy may appear in.
    #[cfg_attr(feature = "serde", serde(default = "EnemyProfile::default_min_wave"))]
    pub min_wave: u32,
    pub defense: EnemyDefense,
    pub speed: f64,
    pub radius: f64,
    pub contact_damage: f64,
    pub damage_type: DamageType,
    pub xp_value: f64,
}

impl EnemyProfile {
    #[cfg(feature = "serde")]
    fn default_min_wave() -> u32 {
        1
    }
}

/// All reference tables, keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    ships: BTreeMap<String, ShipData>,
    weapons: BTreeMap<String, WeaponData>,
    modules: BTreeMap<String, ModuleData>,
    keystones: BTreeMap<String, KeystoneData>,
    upgrades: BTreeMap<String, UpgradeData>,
    synergies: BTreeMap<String, SynergyData>,
    enemies: BTreeMap<String, EnemyProfile>,
}

macro_rules! table {
    ($field:ident, $ty:ty, $get:ident, $insert:ident, $iter:ident) => {
        pub fn $get(&self, id: &str) -> Option<&$ty> {
            self.$field.get(id)
        }

        /// Inserts (or replaces) an entry; returns the previous one.
        pub fn $insert(&mut self, entry: $ty) -> Option<$ty> {
            self.$field.insert(entry.id.clone(), entry)
        }

        /// Entries in id order.
        pub fn $iter(&self) -> impl Iterator<Item = &$ty> {
            self.$field.values()
        }
    };
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    table!(ships, ShipData, ship, insert_ship, ships);
    table!(weapons, WeaponData, weapon, insert_weapon, weapons);
    table!(modules, ModuleData, module, insert_module, modules);
    table!(keystones, KeystoneData, keystone, insert_keystone, keystones);
    table!(upgrades, UpgradeData, upgrade, insert_upgrade, upgrades);
    table!(synergies, SynergyData, synergy, insert_synergy, synergies);
    table!(enemies, EnemyProfile, enemy, insert_enemy, enemies);
}
