//! Layered damage resolution.
//!
//! # Pipeline
//!
//! ```text
//! invulnerable?  → zero result, nothing mutates
//! simple health  → health -= final_damage
//! layered        → raw = damage × crit
//!                  shield:    resistance → penetration split → absorb → overflow
//!                  armor:     resistance → penetration split → flat reduction → absorb → overflow
//!                  structure: resistance → absorb
//! structure == 0 → destroyed, callbacks fire
//! ```
//!
//! Overflow leaving a layer is absolute HP. Before it enters the next layer it
//! is re-expressed as raw damage, `overflow / (1 - next_resistance)`, so that
//! after the next layer's own resistance the same absolute amount lands.

use super::component::{DefenseComponent, HealthComponent, Vitals};
use super::damage::{DamagePacket, DamageType};
use super::layer::{LayerKind, RESISTANCE_CAP};
use crate::entity::EntityRef;

/// Outcome of one `apply_damage` call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DamageResult {
    pub shield_damage: f64,
    pub armor_damage: f64,
    /// Flat reduction removed at the armor stage (player only), in HP after
    /// resistance: exactly the HP this hit did not take.
    pub armor_reduction: f64,
    pub structure_damage: f64,
    pub total_damage: f64,
    /// True when this hit brought the entity to zero.
    pub destroyed: bool,
}

/// A damageable entity as seen by the resolver.
pub struct DamageTarget<'a> {
    pub entity: EntityRef,
    pub vitals: &'a mut Vitals,
    /// Flat armor-stage reduction; zero for everything except the player.
    pub armor_reduction: f64,
}

impl<'a> DamageTarget<'a> {
    pub fn new(entity: EntityRef, vitals: &'a mut Vitals) -> Self {
        Self {
            entity,
            vitals,
            armor_reduction: 0.0,
        }
    }

    #[must_use]
    pub fn with_armor_reduction(mut self, armor_reduction: f64) -> Self {
        self.armor_reduction = armor_reduction.max(0.0);
        self
    }
}

type DestructionCallback = Box<dyn FnMut(EntityRef)>;

/// Applies damage packets to entities and announces destruction.
///
/// The resolver is the only writer of layer HP. It assumes a validated
/// [`DamagePacket`] and never fails.
#[derive(Default)]
pub struct DefenseResolver {
    on_destroyed: Vec<DestructionCallback>,
}

impl std::fmt::Debug for DefenseResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefenseResolver")
            .field("destruction_callbacks", &self.on_destroyed.len())
            .finish()
    }
}

impl DefenseResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback invoked synchronously, in registration order,
    /// whenever a hit destroys an entity.
    pub fn on_entity_destroyed(&mut self, callback: impl FnMut(EntityRef) + 'static) {
        self.on_destroyed.push(Box::new(callback));
    }

    pub fn apply_damage(&mut self, target: DamageTarget<'_>, packet: &DamagePacket) -> DamageResult {
        let DamageTarget {
            entity,
            vitals,
            armor_reduction,
        } = target;

        if vitals.invulnerability().is_active() {
            tracing::trace!(%entity, "hit ignored: invulnerable");
            return DamageResult::default();
        }
        if vitals.is_destroyed() {
            return DamageResult::default();
        }

        let result = match vitals {
            Vitals::Simple(health) => apply_to_health(health, packet),
            Vitals::Layered(defense) => apply_to_layers(defense, packet, armor_reduction),
        };

        tracing::trace!(
            %entity,
            damage_type = %packet.damage_type(),
            raw = packet.final_damage(),
            shield = result.shield_damage,
            armor = result.armor_damage,
            structure = result.structure_damage,
            "damage resolved"
        );

        if result.destroyed {
            tracing::debug!(%entity, "entity destroyed");
            for callback in &mut self.on_destroyed {
                callback(entity);
            }
        }
        result
    }
}

/// Re-expresses absolute overflow as raw damage for a layer with
/// `next_resistance`.
pub fn calculate_overflow(overflow: f64, next_resistance: f64) -> f64 {
    let resistance = next_resistance.clamp(0.0, RESISTANCE_CAP);
    overflow / (1.0 - resistance)
}

fn apply_to_health(health: &mut HealthComponent, packet: &DamagePacket) -> DamageResult {
    let damage = packet.final_damage();
    health.set_current(health.current() - damage);
    DamageResult {
        structure_damage: damage,
        total_damage: damage,
        destroyed: health.is_destroyed(),
        ..DamageResult::default()
    }
}

fn apply_to_layers(
    defense: &mut DefenseComponent,
    packet: &DamagePacket,
    armor_reduction: f64,
) -> DamageResult {
    let damage_type = packet.damage_type();
    let mut result = DamageResult::default();

    let raw = packet.final_damage();

    // Shield
    let to_armor = if defense.shield.is_depleted() {
        raw
    } else {
        let effective = raw * (1.0 - defense.shield.resistance(damage_type));
        let penetrating = effective * packet.shield_penetration();
        let absorbable = effective - penetrating;
        result.shield_damage = defense.shield.absorb(absorbable);
        let overflow = absorbable - result.shield_damage;
        let next = next_absorbing_resistance(defense, LayerKind::Armor, damage_type);
        penetrating + calculate_overflow(overflow, next)
    };

    // Armor. Flat reduction applies even when the armor layer is empty; it is
    // measured in HP after the resistance of whichever layer takes the hit.
    let to_structure = if defense.armor.is_depleted() {
        let resistance = defense.structure.resistance(damage_type);
        let landing = to_armor * (1.0 - resistance);
        result.armor_reduction = armor_reduction.min(landing);
        to_armor - calculate_overflow(result.armor_reduction, resistance)
    } else {
        let effective = to_armor * (1.0 - defense.armor.resistance(damage_type));
        let penetrating = effective * packet.armor_penetration();
        let mut absorbable = effective - penetrating;
        result.armor_reduction = armor_reduction.min(absorbable);
        absorbable -= result.armor_reduction;
        result.armor_damage = defense.armor.absorb(absorbable);
        let overflow = absorbable - result.armor_damage;
        let next = defense.structure.resistance(damage_type);
        penetrating + calculate_overflow(overflow, next)
    };

    // Structure
    let effective = to_structure * (1.0 - defense.structure.resistance(damage_type));
    result.structure_damage = defense.structure.absorb(effective);

    result.total_damage = result.shield_damage + result.armor_damage + result.structure_damage;
    if defense.structure.is_depleted() {
        defense.structure.set_current(0.0);
        result.destroyed = true;
    }
    result
}

/// Resistance of the first layer from `from` onwards that will actually
/// absorb damage. Depleted layers pass damage through untouched.
fn next_absorbing_resistance(
    defense: &DefenseComponent,
    from: LayerKind,
    damage_type: DamageType,
) -> f64 {
    LayerKind::ORDER
        .into_iter()
        .filter(|kind| *kind >= from)
        .map(|kind| defense.layer(kind))
        .find(|layer| !layer.is_depleted())
        .unwrap_or(&defense.structure)
        .resistance(damage_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defense::{DefenseLayer, Resistances};
    use crate::entity::{EntityId, EntityKind};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn enemy() -> EntityRef {
        EntityRef::new(EntityId(7), EntityKind::Enemy)
    }

    fn packet(damage: f64, damage_type: DamageType) -> DamagePacket {
        DamagePacket::new(damage, damage_type).unwrap()
    }

    fn layered(shield: DefenseLayer, armor: DefenseLayer, structure: DefenseLayer) -> Vitals {
        Vitals::Layered(DefenseComponent::new(shield, armor, structure))
    }

    fn layers(vitals: &Vitals) -> &DefenseComponent {
        match vitals {
            Vitals::Layered(defense) => defense,
            Vitals::Simple(_) => panic!("expected layered vitals"),
        }
    }

    #[test]
    fn overflow_formula_inverts_resistance() {
        assert_close(calculate_overflow(30.0, 0.0), 30.0);
        assert_close(calculate_overflow(30.0, 0.5), 60.0);
        // Capped even if a caller passes something larger
        assert_close(calculate_overflow(30.0, 0.99), 120.0);
    }

    #[test]
    fn shield_resistance_reduces_before_absorption() {
        let shield = DefenseLayer::new(100.0)
            .with_resistances(Resistances::none().with(DamageType::Kinetic, 0.5));
        let mut vitals = layered(shield, DefenseLayer::empty(), DefenseLayer::new(100.0));
        let mut resolver = DefenseResolver::new();

        let result = resolver.apply_damage(
            DamageTarget::new(enemy(), &mut vitals),
            &packet(40.0, DamageType::Kinetic),
        );

        assert_close(result.shield_damage, 20.0);
        assert_close(layers(&vitals).shield.current(), 80.0);
        assert_close(layers(&vitals).structure.current(), 100.0);
    }

    #[test]
    fn overflow_lands_as_absolute_hp_on_resisted_layer() {
        // Shield has 10 HP left; armor resists 50% thermal.
        let shield = DefenseLayer::new(50.0).with_current(10.0);
        let armor = DefenseLayer::new(100.0)
            .with_resistances(Resistances::none().with(DamageType::Thermal, 0.5));
        let mut vitals = layered(shield, armor, DefenseLayer::new(100.0));
        let mut resolver = DefenseResolver::new();

        let result = resolver.apply_damage(
            DamageTarget::new(enemy(), &mut vitals),
            &packet(40.0, DamageType::Thermal),
        );

        assert_close(result.shield_damage, 10.0);
        // 30 overflow → 60 raw → 50% resisted → 30 HP
        assert_close(result.armor_damage, 30.0);
        assert_close(layers(&vitals).armor.current(), 70.0);
        assert_close(result.total_damage, 40.0);
    }

    #[test]
    fn overflow_skips_depleted_armor_and_targets_structure_resistance() {
        let shield = DefenseLayer::new(50.0).with_current(20.0);
        let structure = DefenseLayer::new(100.0)
            .with_resistances(Resistances::none().with(DamageType::Em, 0.25));
        let mut vitals = layered(shield, DefenseLayer::empty(), structure);
        let mut resolver = DefenseResolver::new();

        let result = resolver.apply_damage(
            DamageTarget::new(enemy(), &mut vitals),
            &packet(50.0, DamageType::Em),
        );

        assert_close(result.shield_damage, 20.0);
        assert_close(result.structure_damage, 30.0);
        assert_close(layers(&vitals).structure.current(), 70.0);
    }

    #[test]
    fn armor_penetration_skips_armor_absorption() {
        let armor = DefenseLayer::new(100.0);
        let mut vitals = layered(DefenseLayer::empty(), armor, DefenseLayer::new(100.0));
        let mut resolver = DefenseResolver::new();
        let hit = packet(40.0, DamageType::Explosive)
            .with_armor_penetration(0.25)
            .unwrap();

        let result = resolver.apply_damage(DamageTarget::new(enemy(), &mut vitals), &hit);

        assert_close(result.armor_damage, 30.0);
        assert_close(result.structure_damage, 10.0);
    }

    #[test]
    fn flat_reduction_comes_after_percentage_resistance() {
        let armor = DefenseLayer::new(5.0)
            .with_resistances(Resistances::none().with(DamageType::Kinetic, 0.5));
        let mut vitals = layered(DefenseLayer::empty(), armor, DefenseLayer::new(100.0));
        let mut resolver = DefenseResolver::new();

        // 40 raw → 20 after 50% → 10 after flat 10 → 5 armor, 5 overflow
        let result = resolver.apply_damage(
            DamageTarget::new(enemy(), &mut vitals).with_armor_reduction(10.0),
            &packet(40.0, DamageType::Kinetic),
        );

        assert_close(result.armor_reduction, 10.0);
        assert_close(result.armor_damage, 5.0);
        assert_close(result.structure_damage, 5.0);
    }

    #[test]
    fn flat_reduction_on_empty_armor_counts_structure_hp() {
        let structure = DefenseLayer::new(100.0)
            .with_resistances(Resistances::none().with(DamageType::Kinetic, 0.5));
        let mut vitals = layered(DefenseLayer::empty(), DefenseLayer::empty(), structure);
        let mut resolver = DefenseResolver::new();

        // 30 raw → 15 HP after 50% → 5 HP after flat 10
        let result = resolver.apply_damage(
            DamageTarget::new(EntityRef::PLAYER, &mut vitals).with_armor_reduction(10.0),
            &packet(30.0, DamageType::Kinetic),
        );

        assert_close(result.armor_reduction, 10.0);
        assert_close(result.structure_damage, 5.0);
        assert_close(layers(&vitals).structure.current(), 95.0);
    }

    #[test]
    fn flat_reduction_on_empty_armor_cannot_exceed_the_hit() {
        let structure = DefenseLayer::new(100.0)
            .with_resistances(Resistances::none().with(DamageType::Kinetic, 0.5));
        let mut vitals = layered(DefenseLayer::empty(), DefenseLayer::empty(), structure);
        let mut resolver = DefenseResolver::new();

        let result = resolver.apply_damage(
            DamageTarget::new(EntityRef::PLAYER, &mut vitals).with_armor_reduction(50.0),
            &packet(30.0, DamageType::Kinetic),
        );

        assert_close(result.armor_reduction, 15.0);
        assert_close(result.structure_damage, 0.0);
        assert_close(layers(&vitals).structure.current(), 100.0);
    }

    #[test]
    fn crit_is_applied_before_resistance() {
        let shield = DefenseLayer::new(200.0)
            .with_resistances(Resistances::none().with(DamageType::Em, 0.5));
        let mut vitals = layered(shield, DefenseLayer::empty(), DefenseLayer::new(100.0));
        let mut resolver = DefenseResolver::new();
        let hit = packet(40.0, DamageType::Em).with_crit_multiplier(2.0).unwrap();

        let result = resolver.apply_damage(DamageTarget::new(enemy(), &mut vitals), &hit);
        assert_close(result.shield_damage, 40.0);
    }

    #[test]
    fn already_destroyed_entity_is_not_hit_again() {
        let mut vitals = Vitals::Simple(HealthComponent::new(100.0).with_current(0.0));
        let mut resolver = DefenseResolver::new();
        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let seen = calls.clone();
        resolver.on_entity_destroyed(move |_| seen.set(seen.get() + 1));

        let result = resolver.apply_damage(
            DamageTarget::new(enemy(), &mut vitals),
            &packet(10.0, DamageType::Kinetic),
        );
        assert_eq!(result, DamageResult::default());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn fully_penetrating_shot_leaves_shield_regen_alone() {
        let shield = DefenseLayer::new(50.0).with_regen(5.0, 3.0);
        let mut vitals = layered(shield, DefenseLayer::empty(), DefenseLayer::new(100.0));
        let mut resolver = DefenseResolver::new();
        let hit = packet(10.0, DamageType::Kinetic)
            .with_shield_penetration(1.0)
            .unwrap();

        resolver.apply_damage(DamageTarget::new(enemy(), &mut vitals), &hit);
        assert_eq!(layers(&vitals).shield.regen_delay(), 0.0);
        assert_close(layers(&vitals).structure.current(), 90.0);
    }
}
