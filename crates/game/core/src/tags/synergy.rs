//! Named synergies: content-defined stat bonuses unlocked by tag counts.

use super::engine::TagEffects;
use super::tag::Tag;
use crate::stats::StatModifier;

/// One threshold of a synergy and what it grants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynergyTier {
    pub threshold: u32,
    pub modifiers: Vec<StatModifier>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynergyData {
    pub id: String,
    pub name: String,
    pub tag: Tag,
    pub tiers: Vec<SynergyTier>,
}

impl SynergyData {
    /// Highest tier whose threshold `count` meets.
    pub fn tier_for(&self, count: u32) -> Option<&SynergyTier> {
        self.tiers
            .iter()
            .filter(|tier| count >= tier.threshold)
            .max_by_key(|tier| tier.threshold)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSynergy {
    pub id: String,
    /// Threshold of the tier that is active.
    pub threshold: u32,
}

/// Returns the active synergies and the modifiers they contribute, each
/// attributed to `synergy:<id>`.
pub fn evaluate_synergies<'a>(
    synergies: impl IntoIterator<Item = &'a SynergyData>,
    effects: &TagEffects,
) -> (Vec<ActiveSynergy>, Vec<StatModifier>) {
    let mut active = Vec::new();
    let mut modifiers = Vec::new();
    for synergy in synergies {
        let Some(tier) = synergy.tier_for(effects.count(synergy.tag)) else {
            continue;
        };
        let source = format!("synergy:{}", synergy.id);
        modifiers.extend(
            tier.modifiers
                .iter()
                .map(|modifier| modifier.clone().with_source(source.clone())),
        );
        active.push(ActiveSynergy {
            id: synergy.id.clone(),
            threshold: tier.threshold,
        });
    }
    (active, modifiers)
}
