//! Deterministic combat core for a survivors-like shooter.
//!
//! `survivor-core` owns the rules: stat snapshots and the modifier stack,
//! tag synergies, layered defense and damage resolution, heat, waves and the
//! per-frame session loop. It performs no I/O; reference data arrives as a
//! [`Catalog`] built by the content crate and passed by reference.
pub mod catalog;
pub mod combat;
pub mod config;
pub mod defense;
pub mod entity;
pub mod error;
pub mod events;
pub mod heat;
pub mod meta;
pub mod rng;
pub mod session;
pub mod stats;
pub mod tags;
pub mod wave;

pub use catalog::{
    Catalog, EnemyDefense, EnemyProfile, KeystoneData, ModuleData, ShipData, ShipLootPool,
    UpgradeData, WeaponData,
};
pub use combat::{CombatOrchestrator, WeaponSlot};
pub use config::{
    ArenaConfig, ConfigError, DefenseConfig, GameConfig, HeatConfig, PlayerConfig, TagConfig,
    WaveConfig,
};
pub use defense::{
    DamagePacket, DamagePacketError, DamageResult, DamageTarget, DamageType, DefenseComponent,
    DefenseLayer, DefenseResolver, HealthComponent, Invulnerability, LayerKind, ModuleEffects,
    RESISTANCE_CAP, ResistanceBonus, ResistanceTable, Resistances, Vitals, calculate_overflow,
};
pub use entity::{Enemy, EntityId, EntityKind, EntityRef, Pickup, Player, Projectile, World};
pub use error::{ErrorSeverity, GameError};
pub use events::CombatEvent;
pub use heat::{HeatController, HeatTransition};
pub use meta::MetaProgression;
pub use rng::SessionRng;
pub use session::{GameSession, Intent, SessionError};
pub use stats::{
    ComputedLoadout, Loadout, ModifierEngine, ModifierKind, ModifierTotals, PipelineError,
    SkipReason, SkippedModifier, StatField, StatModel, StatModelError, StatModifier, StatPipeline,
};
pub use tags::{
    ActiveSynergy, SynergyData, SynergyTier, Tag, TagEffects, TagSynergyEngine, Tagged,
    weapon_tag_multiplier,
};
pub use wave::{SpawnRequest, WaveDirector, WaveTick};
