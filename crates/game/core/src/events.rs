//! Events emitted by a session for presentation collaborators.

use crate::defense::{DamageResult, DamageType};
use crate::entity::EntityRef;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum CombatEvent {
    Hit {
        source: EntityRef,
        target: EntityRef,
        damage_type: DamageType,
        critical: bool,
        result: DamageResult,
    },
    Destroyed {
        entity: EntityRef,
    },
    Healed {
        entity: EntityRef,
        amount: f64,
    },
    Overheated {
        entity: EntityRef,
    },
    HeatRecovered {
        entity: EntityRef,
    },
    WaveStarted {
        wave: u32,
        budget: u32,
    },
    EnemySpawned {
        entity: EntityRef,
        profile: String,
    },
    PickupCollected {
        entity: EntityRef,
        xp: f64,
    },
    LevelUp {
        level: u32,
    },
    PlayerDestroyed,
}

impl CombatEvent {
    /// Short name, stable across releases; used for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hit { .. } => "hit",
            Self::Destroyed { .. } => "destroyed",
            Self::Healed { .. } => "healed",
            Self::Overheated { .. } => "overheated",
            Self::HeatRecovered { .. } => "heat_recovered",
            Self::WaveStarted { .. } => "wave_started",
            Self::EnemySpawned { .. } => "enemy_spawned",
            Self::PickupCollected { .. } => "pickup_collected",
            Self::LevelUp { .. } => "level_up",
            Self::PlayerDestroyed => "player_destroyed",
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_a_type_tag() {
        let json = serde_json::to_value(CombatEvent::WaveStarted { wave: 2, budget: 30 }).unwrap();
        assert_eq!(json["event"], "wave_started");
        assert_eq!(json["wave"], 2);

        let json = serde_json::to_value(CombatEvent::PlayerDestroyed).unwrap();
        assert_eq!(json["event"], CombatEvent::PlayerDestroyed.name());
    }
}
