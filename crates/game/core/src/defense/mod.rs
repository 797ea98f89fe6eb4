//! Three-layer defense model and damage resolution.
//!
//! Incoming damage meets shield, then armor, then structure. Each layer has
//! its own resistance table (capped at [`RESISTANCE_CAP`]), its own HP pool
//! and its own regeneration timer. [`DefenseResolver`] is the only code that
//! writes layer HP in response to a hit.

pub mod component;
pub mod damage;
pub mod layer;
pub mod resolver;

pub use component::{
    DefenseComponent, HealthComponent, Invulnerability, ModuleEffects, ResistanceBonus, Vitals,
};
pub use damage::{DamagePacket, DamagePacketError, DamageType};
pub use layer::{DefenseLayer, LayerKind, RESISTANCE_CAP, ResistanceTable, Resistances};
pub use resolver::{DamageResult, DamageTarget, DefenseResolver, calculate_overflow};
