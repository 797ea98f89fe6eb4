//! Stat modifiers contributed by modules, synergies, upgrades and keystones.

use super::model::StatField;

/// How a modifier combines with the stat it targets.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ModifierKind {
    /// `value += modifier` (applied first, summed).
    Additive,
    /// `value *= modifier` (applied second, multiplied).
    Multiplicative,
}

/// A single change to one named stat.
///
/// The stat is kept as a name rather than a [`StatField`] so that content
/// typos survive loading and are reported by the engine instead of aborting
/// a whole catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: String,
    pub kind: ModifierKind,
    pub value: f64,
    /// Free-form origin, e.g. `module:reactive_plating`. Diagnostics only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: String,
}

impl StatModifier {
    pub fn new(
        stat: impl Into<String>,
        kind: ModifierKind,
        value: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            stat: stat.into(),
            kind,
            value,
            source: source.into(),
        }
    }

    pub fn additive(stat: StatField, value: f64, source: impl Into<String>) -> Self {
        Self::new(stat.as_ref(), ModifierKind::Additive, value, source)
    }

    pub fn multiplicative(stat: StatField, value: f64, source: impl Into<String>) -> Self {
        Self::new(stat.as_ref(), ModifierKind::Multiplicative, value, source)
    }

    /// Returns a copy attributed to `source`.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Resolved target field, if the name is known.
    pub fn field(&self) -> Option<StatField> {
        StatField::parse(&self.stat)
    }
}
