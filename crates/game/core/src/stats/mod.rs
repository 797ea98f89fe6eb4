//! Stat snapshots and the modifier stack that produces them.
//!
//! ```text
//! ship base → meta seed → [modules, synergies, upgrades, keystones] → ModifierEngine → sanitized snapshot
//! ```
//!
//! Every modifier source contributes [`StatModifier`]s; the engine applies
//! them in one pass (all additive, then all multiplicative). Nothing else
//! writes to a snapshot.

pub mod engine;
pub mod model;
pub mod modifier;
pub mod pipeline;

pub use engine::{ModifierEngine, ModifierTotals, SkipReason, SkippedModifier};
pub use model::{StatField, StatModel, StatModelError};
pub use modifier::{ModifierKind, StatModifier};
pub use pipeline::{ComputedLoadout, Loadout, PipelineError, StatPipeline};
