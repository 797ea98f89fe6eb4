//! Per-entity defense state: the three-layer component, the flat health
//! fallback and the invulnerability flags shared by both.

use super::damage::DamageType;
use super::layer::{DefenseLayer, LayerKind, ResistanceTable, Resistances};
use crate::config::DefenseConfig;
use crate::stats::StatModel;

/// God mode and timed invulnerability windows.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Invulnerability {
    pub god_mode: bool,
    /// Seconds left in the current invulnerability window.
    remaining: f64,
}

impl Invulnerability {
    pub fn god_mode() -> Self {
        Self {
            god_mode: true,
            remaining: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.god_mode || self.remaining > 0.0
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Opens (or extends) a window of `seconds`.
    pub fn grant(&mut self, seconds: f64) {
        self.remaining = self.remaining.max(seconds);
    }

    pub fn tick(&mut self, dt: f64) {
        self.remaining = (self.remaining - dt).max(0.0);
    }
}

/// Flat health pool for entities without layered defense.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthComponent {
    current: f64,
    max: f64,
    pub invulnerability: Invulnerability,
}

impl HealthComponent {
    pub fn new(max: f64) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            invulnerability: Invulnerability::default(),
        }
    }

    #[must_use]
    pub fn with_current(mut self, current: f64) -> Self {
        self.set_current(current);
        self
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn set_current(&mut self, current: f64) {
        self.current = current.clamp(0.0, self.max);
    }

    pub fn heal(&mut self, amount: f64) -> f64 {
        let before = self.current;
        self.set_current(self.current + amount.max(0.0));
        self.current - before
    }

    pub fn is_destroyed(&self) -> bool {
        self.current <= 0.0
    }
}

/// Additive resistance granted by a module (or an enemy profile).
///
/// `damage_type: None` applies the value to every damage type of the layer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResistanceBonus {
    pub layer: LayerKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: Option<DamageType>,
    pub value: f64,
}

/// Defense-side effects of the equipped modules.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleEffects {
    pub resistance_bonuses: Vec<ResistanceBonus>,
}

impl ModuleEffects {
    /// Base table for `layer` plus every matching bonus, capped once.
    pub fn resistances_for(&self, layer: LayerKind, base: ResistanceTable) -> Resistances {
        let mut raw = base;
        for bonus in self.resistance_bonuses.iter().filter(|b| b.layer == layer) {
            match bonus.damage_type {
                Some(DamageType::Em) => raw.em += bonus.value,
                Some(DamageType::Thermal) => raw.thermal += bonus.value,
                Some(DamageType::Kinetic) => raw.kinetic += bonus.value,
                Some(DamageType::Explosive) => raw.explosive += bonus.value,
                None => {
                    raw.em += bonus.value;
                    raw.thermal += bonus.value;
                    raw.kinetic += bonus.value;
                    raw.explosive += bonus.value;
                }
            }
        }
        Resistances::from(raw)
    }
}

/// Shield, armor and structure. Damage meets them in that order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenseComponent {
    pub shield: DefenseLayer,
    pub armor: DefenseLayer,
    pub structure: DefenseLayer,
    pub invulnerability: Invulnerability,
}

impl DefenseComponent {
    pub fn new(shield: DefenseLayer, armor: DefenseLayer, structure: DefenseLayer) -> Self {
        Self {
            shield,
            armor,
            structure,
            invulnerability: Invulnerability::default(),
        }
    }

    /// Full layers sized from a stat snapshot.
    pub fn from_stats(stats: &StatModel, effects: &ModuleEffects, config: &DefenseConfig) -> Self {
        let mut component = Self::new(
            DefenseLayer::new(stats.max_shield),
            DefenseLayer::new(stats.max_armor),
            DefenseLayer::new(stats.max_structure),
        );
        component.refresh(stats, effects, config);
        component
    }

    /// Pushes a new stat snapshot into the layers: maxima, regen rates and
    /// resistances follow the snapshot, current HP is kept where possible.
    pub fn refresh(&mut self, stats: &StatModel, effects: &ModuleEffects, config: &DefenseConfig) {
        self.shield.set_max(stats.max_shield);
        self.shield.regen = stats.shield_regen.max(0.0);
        self.shield.regen_delay_max = config.shield_regen_delay;

        self.armor.set_max(stats.max_armor);
        self.armor.regen = stats.armor_regen.max(0.0);
        self.armor.regen_delay_max = config.armor_regen_delay;

        self.structure.set_max(stats.max_structure);
        self.structure.regen = stats.structure_regen.max(0.0);
        self.structure.regen_delay_max = config.structure_regen_delay;

        for kind in LayerKind::ORDER {
            let resistances = effects.resistances_for(kind, config.base_resistances(kind));
            self.layer_mut(kind).resistances = resistances;
        }
    }

    pub fn layer(&self, kind: LayerKind) -> &DefenseLayer {
        match kind {
            LayerKind::Shield => &self.shield,
            LayerKind::Armor => &self.armor,
            LayerKind::Structure => &self.structure,
        }
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut DefenseLayer {
        match kind {
            LayerKind::Shield => &mut self.shield,
            LayerKind::Armor => &mut self.armor,
            LayerKind::Structure => &mut self.structure,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.structure.is_depleted()
    }

    /// Regenerates every layer. Destroyed entities stay destroyed.
    ///
    /// Invulnerability windows are ticked separately, at the start of a frame.
    pub fn update(&mut self, dt: f64) {
        if self.is_destroyed() {
            return;
        }
        self.shield.update(dt);
        self.armor.update(dt);
        self.structure.update(dt);
    }
}

/// What an entity can take damage with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vitals {
    Layered(DefenseComponent),
    Simple(HealthComponent),
}

impl Vitals {
    pub fn is_destroyed(&self) -> bool {
        match self {
            Vitals::Layered(defense) => defense.is_destroyed(),
            Vitals::Simple(health) => health.is_destroyed(),
        }
    }

    pub fn invulnerability(&self) -> &Invulnerability {
        match self {
            Vitals::Layered(defense) => &defense.invulnerability,
            Vitals::Simple(health) => &health.invulnerability,
        }
    }

    pub fn invulnerability_mut(&mut self) -> &mut Invulnerability {
        match self {
            Vitals::Layered(defense) => &mut defense.invulnerability,
            Vitals::Simple(health) => &mut health.invulnerability,
        }
    }

    /// Current and maximum of the pool that decides destruction.
    pub fn hull(&self) -> (f64, f64) {
        match self {
            Vitals::Layered(defense) => (defense.structure.current(), defense.structure.max()),
            Vitals::Simple(health) => (health.current(), health.max()),
        }
    }

    /// Heals the structure (or flat health), capped at its max.
    pub fn heal_hull(&mut self, amount: f64) -> f64 {
        match self {
            Vitals::Layered(defense) => defense.structure.heal(amount),
            Vitals::Simple(health) => health.heal(amount),
        }
    }

    /// Layer regeneration. Flat health does not regenerate.
    pub fn update(&mut self, dt: f64) {
        if let Vitals::Layered(defense) = self {
            defense.update(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defense::RESISTANCE_CAP;

    #[test]
    fn invulnerability_window_expires() {
        let mut inv = Invulnerability::default();
        assert!(!inv.is_active());
        inv.grant(0.5);
        assert!(inv.is_active());
        inv.tick(0.3);
        inv.grant(0.1);
        assert!((inv.remaining() - 0.2).abs() < 1e-12);
        inv.tick(0.3);
        assert!(!inv.is_active());
        assert!(Invulnerability::god_mode().is_active());
    }

    #[test]
    fn from_stats_sizes_layers() {
        let stats = StatModel::new();
        let defense = DefenseComponent::from_stats(
            &stats,
            &ModuleEffects::default(),
            &DefenseConfig::default(),
        );
        assert_eq!(defense.shield.current(), 120.0);
        assert_eq!(defense.armor.max(), 150.0);
        assert_eq!(defense.structure.max(), 130.0);
        assert_eq!(defense.shield.regen, 8.0);
    }

    #[test]
    fn module_resistances_stack_but_stay_capped() {
        let effects = ModuleEffects {
            resistance_bonuses: vec![
                ResistanceBonus {
                    layer: LayerKind::Armor,
                    damage_type: Some(DamageType::Kinetic),
                    value: 0.4,
                },
                ResistanceBonus {
                    layer: LayerKind::Armor,
                    damage_type: None,
                    value: 0.4,
                },
                ResistanceBonus {
                    layer: LayerKind::Shield,
                    damage_type: Some(DamageType::Em),
                    value: 0.1,
                },
            ],
        };
        let base = ResistanceTable::new(0.0, 0.1, 0.2, 0.0);

        let armor = effects.resistances_for(LayerKind::Armor, base);
        assert_eq!(armor.get(DamageType::Kinetic), RESISTANCE_CAP);
        assert!((armor.get(DamageType::Thermal) - 0.5).abs() < 1e-12);

        let structure = effects.resistances_for(LayerKind::Structure, base);
        assert!((structure.get(DamageType::Kinetic) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn refresh_follows_new_snapshot() {
        let config = DefenseConfig::default();
        let effects = ModuleEffects::default();
        let mut defense = DefenseComponent::from_stats(&StatModel::new(), &effects, &config);
        defense.shield.absorb(20.0);

        let mut upgraded = StatModel::new();
        upgraded.max_shield = 150.0;
        upgraded.max_structure = 100.0;
        defense.refresh(&upgraded, &effects, &config);

        assert_eq!(defense.shield.max(), 150.0);
        assert_eq!(defense.shield.current(), 130.0);
        assert_eq!(defense.structure.current(), 100.0);
    }

    #[test]
    fn simple_vitals_heal_is_capped() {
        let mut vitals = Vitals::Simple(HealthComponent::new(100.0).with_current(90.0));
        assert_eq!(vitals.heal_hull(25.0), 10.0);
        assert_eq!(vitals.hull(), (100.0, 100.0));
    }
}
