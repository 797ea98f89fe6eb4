//! Entity identifiers and the per-archetype entity structs.
//!
//! Each archetype is an explicit struct. Capabilities an entity may or may
//! not have are named fields (`Option` where absence is meaningful) rather
//! than lookups in a component bag.

use std::fmt;

use arrayvec::ArrayVec;
use glam::DVec2;

use crate::catalog::{EnemyDefense, EnemyProfile};
use crate::combat::WeaponSlot;
use crate::config::DefenseConfig;
use crate::defense::{
    DamagePacket, DamagePacketError, DefenseComponent, DefenseLayer, HealthComponent, LayerKind,
    ModuleEffects, ResistanceTable, Vitals,
};
use crate::heat::HeatController;
use crate::stats::StatModel;

/// Maximum number of weapons the player can carry.
pub const MAX_WEAPON_SLOTS: usize = 6;

/// Unique identifier for any entity in a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the player ship.
    pub const PLAYER: Self = Self(0);

    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
    Pickup,
}

/// What destruction callbacks and events receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRef {
    pub id: EntityId,
    pub kind: EntityKind,
}

impl EntityRef {
    pub const PLAYER: Self = Self {
        id: EntityId::PLAYER,
        kind: EntityKind::Player,
    };

    pub const fn new(id: EntityId, kind: EntityKind) -> Self {
        Self { id, kind }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}

/// The player ship.
#[derive(Clone, Debug)]
pub struct Player {
    pub position: DVec2,
    pub radius: f64,
    pub vitals: Vitals,
    pub heat: HeatController,
    pub weapons: ArrayVec<WeaponSlot, MAX_WEAPON_SLOTS>,
    pub level: u32,
    pub xp: f64,
}

impl Player {
    pub fn entity(&self) -> EntityRef {
        EntityRef::PLAYER
    }

    pub fn defense(&self) -> Option<&DefenseComponent> {
        match &self.vitals {
            Vitals::Layered(defense) => Some(defense),
            Vitals::Simple(_) => None,
        }
    }

    pub fn defense_mut(&mut self) -> Option<&mut DefenseComponent> {
        match &mut self.vitals {
            Vitals::Layered(defense) => Some(defense),
            Vitals::Simple(_) => None,
        }
    }
}

/// A hostile ship spawned from an [`EnemyProfile`].
#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub profile_id: String,
    pub position: DVec2,
    pub radius: f64,
    pub speed: f64,
    pub vitals: Vitals,
    /// Packet applied to the player on contact.
    pub contact: DamagePacket,
    pub xp_value: f64,
}

impl Enemy {
    /// Builds an enemy at `position`. Fails if the profile's contact damage
    /// does not form a valid packet.
    pub fn from_profile(
        id: EntityId,
        profile: &EnemyProfile,
        position: DVec2,
    ) -> Result<Self, DamagePacketError> {
        let contact = DamagePacket::new(profile.contact_damage, profile.damage_type)?;
        Ok(Self {
            id,
            profile_id: profile.id.clone(),
            position,
            radius: profile.radius,
            speed: profile.speed,
            vitals: enemy_vitals(&profile.defense),
            contact,
            xp_value: profile.xp_value,
        })
    }

    pub fn entity(&self) -> EntityRef {
        EntityRef::new(self.id, EntityKind::Enemy)
    }
}

fn enemy_vitals(defense: &EnemyDefense) -> Vitals {
    match defense {
        EnemyDefense::Health { max } => Vitals::Simple(HealthComponent::new(*max)),
        EnemyDefense::Layered {
            shield,
            armor,
            structure,
            resistances,
        } => {
            let effects = ModuleEffects {
                resistance_bonuses: resistances.clone(),
            };
            let layer = |kind: LayerKind, max: f64| {
                DefenseLayer::new(max)
                    .with_resistances(effects.resistances_for(kind, ResistanceTable::default()))
            };
            Vitals::Layered(DefenseComponent::new(
                layer(LayerKind::Shield, *shield),
                layer(LayerKind::Armor, *armor),
                layer(LayerKind::Structure, *structure),
            ))
        }
    }
}

/// A shot in flight.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: EntityRef,
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub packet: DamagePacket,
    /// Distance left before the projectile expires.
    pub remaining_range: f64,
    /// Additional enemies the projectile may pass through.
    pub pierce: u32,
    /// Enemies already hit; a projectile never hits the same enemy twice.
    pub hits: Vec<EntityId>,
    pub spent: bool,
}

impl Projectile {
    pub fn entity(&self) -> EntityRef {
        EntityRef::new(self.id, EntityKind::Projectile)
    }

    /// Records a hit and returns whether the projectile is used up.
    pub fn register_hit(&mut self, enemy: EntityId) -> bool {
        self.hits.push(enemy);
        if self.pierce == 0 {
            self.spent = true;
        } else {
            self.pierce -= 1;
        }
        self.spent
    }
}

/// An XP orb.
#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    pub id: EntityId,
    pub position: DVec2,
    pub xp: f64,
}

impl Pickup {
    pub fn entity(&self) -> EntityRef {
        EntityRef::new(self.id, EntityKind::Pickup)
    }
}

/// Every live entity of a session.
#[derive(Clone, Debug)]
pub struct World {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    next_id: u32,
}

impl World {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            next_id: EntityId::PLAYER.0 + 1,
        }
    }

    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies
            .iter()
            .filter(|enemy| !enemy.vitals.is_destroyed())
            .count()
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }
}

/// Player layered defense freshly sized from a snapshot.
pub fn player_vitals(stats: &StatModel, effects: &ModuleEffects, config: &DefenseConfig) -> Vitals {
    Vitals::Layered(DefenseComponent::from_stats(stats, effects, config))
}
