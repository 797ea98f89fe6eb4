//! Item tags, tier bonuses and named synergies.

pub mod engine;
pub mod synergy;
pub mod tag;

pub use engine::{TagEffects, TagSynergyEngine, weapon_tag_multiplier};
pub use synergy::{ActiveSynergy, SynergyData, SynergyTier, evaluate_synergies};
pub use tag::{Tag, Tagged, parse_tags};

/// Serde helper for tag lists in content files: unknown names are logged and
/// dropped instead of failing the whole file.
#[cfg(feature = "serde")]
pub mod lenient {
    use serde::{Deserialize, Deserializer};

    use super::{Tag, parse_tags};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Tag>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        let (tags, _unknown) = parse_tags(names.iter().map(String::as_str));
        Ok(tags)
    }
}
