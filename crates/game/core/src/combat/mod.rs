//! Weapons, collision checks and hit resolution.
//!
//! Everything here runs inside [`GameSession::update`](crate::GameSession::update);
//! the [`CombatOrchestrator`] is the bridge between spatial overlap and the
//! [`DefenseResolver`](crate::defense::DefenseResolver).

pub mod collision;
pub mod orchestrator;
pub mod weapon;

pub use collision::{circles_overlap, nearest_within};
pub use orchestrator::CombatOrchestrator;
pub use weapon::{Shot, WeaponSlot, build_packet, fire_interval};
