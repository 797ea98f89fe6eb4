//! Tag counting, bonus tiers and the majority-tag malus.

use std::collections::BTreeMap;

use super::tag::{Tag, Tagged};
use crate::config::TagConfig;

/// Result of a tag pass over the equipped items.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagEffects {
    /// Occurrences of every tag across weapons and modules.
    pub tag_counts: BTreeMap<Tag, u32>,
    /// Tier bonus per tag (only tags that reached a tier).
    pub bonuses: BTreeMap<Tag, f64>,
    /// Malus per non-majority offensive tag.
    pub maluses: BTreeMap<Tag, f64>,
    /// Offensive tag with the highest count, if any offensive tag is present.
    pub majority_tag: Option<Tag>,
}

impl TagEffects {
    pub fn count(&self, tag: Tag) -> u32 {
        self.tag_counts.get(&tag).copied().unwrap_or(0)
    }

    pub fn bonus(&self, tag: Tag) -> f64 {
        self.bonuses.get(&tag).copied().unwrap_or(0.0)
    }

    pub fn malus(&self, tag: Tag) -> f64 {
        self.maluses.get(&tag).copied().unwrap_or(0.0)
    }

    /// `1 + bonus + malus` for a single tag.
    pub fn multiplier(&self, tag: Tag) -> f64 {
        1.0 + self.bonus(tag) + self.malus(tag)
    }
}

/// Derives tag bonuses from the current loadout. Pure; recompute whenever the
/// equipped items change.
#[derive(Clone, Debug, Default)]
pub struct TagSynergyEngine {
    config: TagConfig,
}

impl TagSynergyEngine {
    pub fn new(config: TagConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    pub fn calculate_tag_effects<W, M>(&self, weapons: &[W], modules: &[M]) -> TagEffects
    where
        W: Tagged,
        M: Tagged,
    {
        let mut tag_counts: BTreeMap<Tag, u32> = BTreeMap::new();
        let all_tags = weapons
            .iter()
            .flat_map(|w| w.tags())
            .chain(modules.iter().flat_map(|m| m.tags()));
        for tag in all_tags {
            *tag_counts.entry(*tag).or_insert(0) += 1;
        }

        let bonuses: BTreeMap<Tag, f64> = tag_counts
            .iter()
            .filter_map(|(tag, count)| {
                let bonus = self.tier_bonus(*count);
                (bonus != 0.0).then_some((*tag, bonus))
            })
            .collect();

        let majority_tag = Self::majority(&tag_counts);

        let maluses: BTreeMap<Tag, f64> = Tag::offensive()
            .filter(|tag| Some(*tag) != majority_tag)
            .filter(|tag| tag_counts.get(tag).copied().unwrap_or(0) > 0)
            .map(|tag| (tag, self.config.malus))
            .collect();

        TagEffects {
            tag_counts,
            bonuses,
            maluses,
            majority_tag,
        }
    }

    /// Bonus for a tag count. Only the highest tier reached applies.
    pub fn tier_bonus(&self, count: u32) -> f64 {
        if count >= self.config.high_tier_count {
            self.config.high_tier_bonus
        } else if count >= self.config.low_tier_count {
            self.config.low_tier_bonus
        } else {
            0.0
        }
    }

    /// First offensive tag with the strictly highest count, scanning damage
    /// types before behaviors.
    fn majority(tag_counts: &BTreeMap<Tag, u32>) -> Option<Tag> {
        let mut best: Option<(Tag, u32)> = None;
        for tag in Tag::offensive() {
            let count = tag_counts.get(&tag).copied().unwrap_or(0);
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((tag, count)),
            }
        }
        best.map(|(tag, _)| tag)
    }
}

/// Damage multiplier for one weapon: the product of the multipliers of all
/// its tags. Stacking is multiplicative on purpose (`1.08 × 0.9 = 0.972`).
pub fn weapon_tag_multiplier(weapon: &(impl Tagged + ?Sized), effects: &TagEffects) -> f64 {
    weapon
        .tags()
        .iter()
        .map(|tag| effects.multiplier(*tag))
        .product()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn engine() -> TagSynergyEngine {
        TagSynergyEngine::new(TagConfig::default())
    }

    #[test]
    fn counts_span_weapons_and_modules() {
        let weapons = vec![vec![Tag::Kinetic, Tag::Ballistic], vec![Tag::Kinetic]];
        let modules = vec![vec![Tag::Kinetic, Tag::Shield]];

        let effects = engine().calculate_tag_effects(&weapons, &modules);
        assert_eq!(effects.count(Tag::Kinetic), 3);
        assert_eq!(effects.count(Tag::Shield), 1);
        assert_eq!(effects.count(Tag::Beam), 0);
    }

    #[test]
    fn only_highest_tier_applies() {
        let e = engine();
        assert_eq!(e.tier_bonus(2), 0.0);
        assert_eq!(e.tier_bonus(3), 0.08);
        assert_eq!(e.tier_bonus(4), 0.08);
        assert_eq!(e.tier_bonus(5), 0.18);
        assert_eq!(e.tier_bonus(9), 0.18);
    }

    #[test]
    fn majority_tie_keeps_first_in_scan_order() {
        // Thermal and Beam tie at 2; damage types are scanned first.
        let weapons = vec![vec![Tag::Beam, Tag::Thermal], vec![Tag::Beam, Tag::Thermal]];
        let effects = engine().calculate_tag_effects(&weapons, &Vec::<Vec<Tag>>::new());

        assert_eq!(effects.majority_tag, Some(Tag::Thermal));
        assert_eq!(effects.malus(Tag::Beam), -0.10);
        assert_eq!(effects.malus(Tag::Thermal), 0.0);
    }

    #[test]
    fn utility_tags_never_take_malus() {
        let modules = vec![vec![Tag::Shield], vec![Tag::Shield], vec![Tag::Shield]];
        let weapons = vec![vec![Tag::Em]];
        let effects = engine().calculate_tag_effects(&weapons, &modules);

        assert_eq!(effects.majority_tag, Some(Tag::Em));
        assert!(effects.maluses.is_empty());
        assert_close(effects.multiplier(Tag::Shield), 1.08);
    }

    #[test]
    fn no_offensive_tags_means_no_majority() {
        let modules = vec![vec![Tag::Armor]];
        let effects = engine().calculate_tag_effects(&Vec::<Vec<Tag>>::new(), &modules);
        assert_eq!(effects.majority_tag, None);
    }

    #[test]
    fn bonus_and_malus_combine_on_one_tag() {
        // Kinetic 5 (majority, +18%), Thermal 3 (+8% and -10%)
        let weapons = vec![
            vec![Tag::Kinetic, Tag::Thermal],
            vec![Tag::Kinetic, Tag::Thermal],
            vec![Tag::Kinetic, Tag::Thermal],
            vec![Tag::Kinetic],
            vec![Tag::Kinetic],
        ];
        let effects = engine().calculate_tag_effects(&weapons, &Vec::<Vec<Tag>>::new());

        assert_close(effects.multiplier(Tag::Kinetic), 1.18);
        assert_close(effects.multiplier(Tag::Thermal), 0.98);
    }

    #[test]
    fn weapon_multiplier_compounds_across_tags() {
        // Kinetic 4 (majority, +8%), Thermal 2 (malus only)
        let weapons = vec![
            vec![Tag::Kinetic, Tag::Thermal],
            vec![Tag::Kinetic, Tag::Thermal],
            vec![Tag::Kinetic],
            vec![Tag::Kinetic],
        ];
        let effects = engine().calculate_tag_effects(&weapons, &Vec::<Vec<Tag>>::new());

        let multiplier = weapon_tag_multiplier(&weapons[0], &effects);
        assert_close(multiplier, 1.08 * 0.9);
        assert_close(multiplier, 0.972);
    }

    #[test]
    fn untagged_weapon_is_neutral() {
        let effects = TagEffects::default();
        assert_eq!(weapon_tag_multiplier(&Vec::<Tag>::new(), &effects), 1.0);
    }

    #[test]
    fn tag_effects_are_idempotent() {
        let weapons = vec![vec![Tag::Missile, Tag::Explosive], vec![Tag::Beam]];
        let modules = vec![vec![Tag::Explosive, Tag::Heat]];
        let e = engine();
        assert_eq!(
            e.calculate_tag_effects(&weapons, &modules),
            e.calculate_tag_effects(&weapons, &modules)
        );
    }
}
