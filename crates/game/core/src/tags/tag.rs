//! Item tags.

/// Tag carried by weapons and modules.
///
/// Offensive tags are the four damage types followed by the six weapon
/// behaviors. Their declaration order is the scan order used to break
/// majority ties.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Tag {
    // Damage types
    Em,
    Thermal,
    Kinetic,
    Explosive,

    // Weapon behaviors
    Ballistic,
    Beam,
    Missile,
    Homing,
    Area,
    Drone,

    // Utility
    Shield,
    Armor,
    Structure,
    Heat,
    Crit,
    Lifesteal,
    Mobility,
    Utility,
}

impl Tag {
    pub const DAMAGE_TYPES: [Tag; 4] = [Tag::Em, Tag::Thermal, Tag::Kinetic, Tag::Explosive];

    pub const BEHAVIORS: [Tag; 6] = [
        Tag::Ballistic,
        Tag::Beam,
        Tag::Missile,
        Tag::Homing,
        Tag::Area,
        Tag::Drone,
    ];

    /// Damage types first, then behaviors.
    pub fn offensive() -> impl Iterator<Item = Tag> {
        Self::DAMAGE_TYPES.into_iter().chain(Self::BEHAVIORS)
    }

    pub fn is_offensive(self) -> bool {
        Self::offensive().any(|tag| tag == self)
    }
}

/// Anything that carries tags (weapons, modules).
pub trait Tagged {
    fn tags(&self) -> &[Tag];
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn tags(&self) -> &[Tag] {
        (**self).tags()
    }
}

impl Tagged for [Tag] {
    fn tags(&self) -> &[Tag] {
        self
    }
}

impl Tagged for Vec<Tag> {
    fn tags(&self) -> &[Tag] {
        self
    }
}

/// Parses tag names, dropping (and logging) the ones that are not known.
///
/// Returns the parsed tags and the rejected names.
pub fn parse_tags<'a>(names: impl IntoIterator<Item = &'a str>) -> (Vec<Tag>, Vec<String>) {
    let mut tags = Vec::new();
    let mut unknown = Vec::new();
    for name in names {
        match name.parse::<Tag>() {
            Ok(tag) => tags.push(tag),
            Err(_) => {
                tracing::warn!(tag = name, "ignoring unknown tag");
                unknown.push(name.to_string());
            }
        }
    }
    (tags, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offensive_scan_order() {
        let order: Vec<Tag> = Tag::offensive().collect();
        assert_eq!(order.len(), 10);
        assert_eq!(order[0], Tag::Em);
        assert_eq!(order[4], Tag::Ballistic);
        assert!(!Tag::Shield.is_offensive());
        assert!(Tag::Drone.is_offensive());
    }

    #[test]
    fn parse_drops_unknown_names() {
        let (tags, unknown) = parse_tags(["kinetic", "Beam", "sparkles"]);
        assert_eq!(tags, vec![Tag::Kinetic, Tag::Beam]);
        assert_eq!(unknown, vec!["sparkles".to_string()]);
    }
}
