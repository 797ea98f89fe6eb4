//! A single defense layer and its resistance table.

use super::damage::DamageType;

/// Ceiling on any single layer/damage-type resistance.
pub const RESISTANCE_CAP: f64 = 0.75;

// Overflow re-expression divides by `1 - resistance`.
const _: () = assert!(RESISTANCE_CAP < 1.0);

/// The three layers, in the order incoming damage meets them.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum LayerKind {
    Shield,
    Armor,
    Structure,
}

impl LayerKind {
    pub const ORDER: [LayerKind; 3] = [LayerKind::Shield, LayerKind::Armor, LayerKind::Structure];
}

/// Plain resistance values per damage type, as written in config files.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResistanceTable {
    pub em: f64,
    pub thermal: f64,
    pub kinetic: f64,
    pub explosive: f64,
}

impl ResistanceTable {
    pub const fn new(em: f64, thermal: f64, kinetic: f64, explosive: f64) -> Self {
        Self {
            em,
            thermal,
            kinetic,
            explosive,
        }
    }
}

/// Resistance per damage type, always within `[0, RESISTANCE_CAP]`.
///
/// Every write goes through a clamp, so additive stacking from modules can
/// never push a value past the cap.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "ResistanceTable", into = "ResistanceTable")
)]
pub struct Resistances {
    values: [f64; 4],
}

impl Resistances {
    pub const fn none() -> Self {
        Self { values: [0.0; 4] }
    }

    pub fn get(&self, damage_type: DamageType) -> f64 {
        self.values[damage_type.index()]
    }

    pub fn set(&mut self, damage_type: DamageType, value: f64) {
        self.values[damage_type.index()] = clamp_resistance(value);
    }

    /// Stacks `value` on top of the current resistance (still capped).
    pub fn add(&mut self, damage_type: DamageType, value: f64) {
        let current = self.get(damage_type);
        self.set(damage_type, current + value);
    }

    pub fn add_all(&mut self, value: f64) {
        for damage_type in DamageType::ALL {
            self.add(damage_type, value);
        }
    }

    #[must_use]
    pub fn with(mut self, damage_type: DamageType, value: f64) -> Self {
        self.set(damage_type, value);
        self
    }
}

impl From<ResistanceTable> for Resistances {
    fn from(table: ResistanceTable) -> Self {
        Self::none()
            .with(DamageType::Em, table.em)
            .with(DamageType::Thermal, table.thermal)
            .with(DamageType::Kinetic, table.kinetic)
            .with(DamageType::Explosive, table.explosive)
    }
}

impl From<Resistances> for ResistanceTable {
    fn from(res: Resistances) -> Self {
        Self::new(
            res.get(DamageType::Em),
            res.get(DamageType::Thermal),
            res.get(DamageType::Kinetic),
            res.get(DamageType::Explosive),
        )
    }
}

fn clamp_resistance(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, RESISTANCE_CAP)
}

/// One defense layer (shield, armor or structure).
///
/// `current` stays within `[0, max]` across every mutation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenseLayer {
    current: f64,
    max: f64,
    /// HP per second once `regen_delay` has run out.
    pub regen: f64,
    /// Seconds left before regeneration resumes.
    regen_delay: f64,
    /// Seconds without damage required before regeneration resumes.
    pub regen_delay_max: f64,
    pub resistances: Resistances,
}

impl DefenseLayer {
    /// A full layer with no regeneration and no resistances.
    pub fn new(max: f64) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            regen: 0.0,
            regen_delay: 0.0,
            regen_delay_max: 0.0,
            resistances: Resistances::none(),
        }
    }

    /// A layer with zero capacity; it passes every hit through.
    pub fn empty() -> Self {
        Self::new(0.0)
    }

    #[must_use]
    pub fn with_current(mut self, current: f64) -> Self {
        self.set_current(current);
        self
    }

    #[must_use]
    pub fn with_regen(mut self, regen: f64, delay: f64) -> Self {
        self.regen = regen.max(0.0);
        self.regen_delay_max = delay.max(0.0);
        self
    }

    #[must_use]
    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances = resistances;
        self
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn regen_delay(&self) -> f64 {
        self.regen_delay
    }

    pub fn resistance(&self, damage_type: DamageType) -> f64 {
        self.resistances.get(damage_type)
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn set_current(&mut self, current: f64) {
        self.current = current.clamp(0.0, self.max);
    }

    /// Changes capacity. A larger max grants the difference to `current`;
    /// a smaller max clamps it.
    pub fn set_max(&mut self, max: f64) {
        let max = max.max(0.0);
        let grown = (max - self.max).max(0.0);
        self.max = max;
        self.set_current(self.current + grown);
    }

    /// Removes up to `amount` HP and returns how much was actually removed.
    /// Any removal restarts the regeneration delay.
    pub fn absorb(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let absorbed = amount.min(self.current);
        self.current -= absorbed;
        if absorbed > 0.0 {
            self.regen_delay = self.regen_delay_max;
        }
        absorbed
    }

    /// Restores up to `amount` HP and returns how much was restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let before = self.current;
        self.set_current(self.current + amount);
        self.current - before
    }

    /// Advances regeneration by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        if self.regen_delay > 0.0 {
            self.regen_delay = (self.regen_delay - dt).max(0.0);
            return;
        }
        if self.regen > 0.0 && self.current < self.max {
            self.set_current(self.current + self.regen * dt);
        }
    }
}
