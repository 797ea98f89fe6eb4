//! Turns overlaps into resolved hits.
//!
//! Projectile hits and enemy contact both end in
//! [`DefenseResolver::apply_damage`]. Lifesteal is applied here, right after
//! a player projectile lands, from the packet's pre-resistance
//! `final_damage()` rather than from what the defender actually lost.

use std::cell::RefCell;
use std::rc::Rc;

use super::collision::circles_overlap;
use crate::config::DefenseConfig;
use crate::defense::{DamagePacket, DamageTarget, DefenseResolver};
use crate::entity::{EntityKind, EntityRef, Player, World};
use crate::events::CombatEvent;
use crate::stats::StatModel;

/// Owns the resolver and collects destroyed entities for cleanup.
#[derive(Debug)]
pub struct CombatOrchestrator {
    resolver: DefenseResolver,
    destroyed: Rc<RefCell<Vec<EntityRef>>>,
}

impl Default for CombatOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatOrchestrator {
    pub fn new() -> Self {
        let destroyed: Rc<RefCell<Vec<EntityRef>>> = Rc::default();
        let mut resolver = DefenseResolver::new();
        let sink = Rc::clone(&destroyed);
        resolver.on_entity_destroyed(move |entity| sink.borrow_mut().push(entity));
        Self {
            resolver,
            destroyed,
        }
    }

    /// Lets collaborators subscribe to destruction alongside cleanup.
    pub fn resolver_mut(&mut self) -> &mut DefenseResolver {
        &mut self.resolver
    }

    /// Entities destroyed since the last call, in destruction order.
    pub fn take_destroyed(&self) -> Vec<EntityRef> {
        std::mem::take(&mut *self.destroyed.borrow_mut())
    }

    /// Resolves every projectile that overlaps a live enemy it has not hit yet.
    pub fn resolve_projectile_hits(
        &mut self,
        world: &mut World,
        stats: &StatModel,
        events: &mut Vec<CombatEvent>,
    ) {
        let World {
            player,
            enemies,
            projectiles,
            ..
        } = world;

        for projectile in projectiles.iter_mut().filter(|p| !p.spent) {
            for enemy in enemies.iter_mut() {
                if projectile.spent {
                    break;
                }
                if enemy.vitals.is_destroyed()
                    || projectile.hits.contains(&enemy.id)
                    || !circles_overlap(
                        projectile.position,
                        projectile.radius,
                        enemy.position,
                        enemy.radius,
                    )
                {
                    continue;
                }

                let landed = !enemy.vitals.invulnerability().is_active();
                let target = enemy.entity();
                let result = self
                    .resolver
                    .apply_damage(DamageTarget::new(target, &mut enemy.vitals), &projectile.packet);
                events.push(CombatEvent::Hit {
                    source: projectile.owner,
                    target,
                    damage_type: projectile.packet.damage_type(),
                    critical: projectile.packet.is_critical(),
                    result,
                });
                projectile.register_hit(enemy.id);

                if landed && projectile.owner.kind == EntityKind::Player {
                    apply_lifesteal(player, stats, &projectile.packet, events);
                }
            }
        }
    }

    /// Applies contact damage from overlapping enemies to the player and
    /// opens the contact invulnerability window after each landed contact.
    pub fn resolve_contacts(
        &mut self,
        world: &mut World,
        stats: &StatModel,
        config: &DefenseConfig,
        events: &mut Vec<CombatEvent>,
    ) {
        let World {
            player, enemies, ..
        } = world;

        for enemy in enemies.iter() {
            if player.vitals.is_destroyed() || player.vitals.invulnerability().is_active() {
                break;
            }
            if enemy.vitals.is_destroyed()
                || !circles_overlap(player.position, player.radius, enemy.position, enemy.radius)
            {
                continue;
            }

            let target = DamageTarget::new(EntityRef::PLAYER, &mut player.vitals)
                .with_armor_reduction(stats.armor_reduction);
            let result = self.resolver.apply_damage(target, &enemy.contact);
            events.push(CombatEvent::Hit {
                source: enemy.entity(),
                target: EntityRef::PLAYER,
                damage_type: enemy.contact.damage_type(),
                critical: false,
                result,
            });
            player
                .vitals
                .invulnerability_mut()
                .grant(config.contact_invulnerability);

            if result.destroyed {
                tracing::info!(killer = %enemy.entity(), "player destroyed");
                events.push(CombatEvent::PlayerDestroyed);
            }
        }
    }
}

/// Heals the player by `final_damage × lifesteal`, capped at the hull max.
fn apply_lifesteal(
    player: &mut Player,
    stats: &StatModel,
    packet: &DamagePacket,
    events: &mut Vec<CombatEvent>,
) {
    if stats.lifesteal <= 0.0 || player.vitals.is_destroyed() {
        return;
    }
    let healed = player.vitals.heal_hull(packet.final_damage() * stats.lifesteal);
    if healed > 0.0 {
        events.push(CombatEvent::Healed {
            entity: EntityRef::PLAYER,
            amount: healed,
        });
    }
}

#[cfg(test)]
mod tests {
    use arrayvec::ArrayVec;
    use glam::DVec2;

    use super::*;
    use crate::config::HeatConfig;
    use crate::defense::{DamageType, DefenseComponent, DefenseLayer, HealthComponent, Vitals};
    use crate::entity::{Enemy, EntityId, Projectile};
    use crate::heat::HeatController;

    fn world(player_vitals: Vitals) -> World {
        World::new(Player {
            position: DVec2::ZERO,
            radius: 10.0,
            vitals: player_vitals,
            heat: HeatController::new(&HeatConfig::default(), &StatModel::new()),
            weapons: ArrayVec::new(),
            level: 1,
            xp: 0.0,
        })
    }

    fn enemy(id: u32, position: DVec2, health: f64) -> Enemy {
        Enemy {
            id: EntityId(id),
            profile_id: "drone".into(),
            position,
            radius: 10.0,
            speed: 0.0,
            vitals: Vitals::Simple(HealthComponent::new(health)),
            contact: DamagePacket::new(30.0, DamageType::Kinetic).unwrap(),
            xp_value: 1.0,
        }
    }

    fn projectile(id: u32, damage: f64, pierce: u32) -> Projectile {
        Projectile {
            id: EntityId(id),
            owner: EntityRef::PLAYER,
            position: DVec2::new(100.0, 0.0),
            velocity: DVec2::ZERO,
            radius: 5.0,
            packet: DamagePacket::new(damage, DamageType::Kinetic).unwrap(),
            remaining_range: 100.0,
            pierce,
            hits: Vec::new(),
            spent: false,
        }
    }

    fn hull(world: &World) -> f64 {
        world.player.vitals.hull().0
    }

    #[test]
    fn projectile_kills_enemy_and_reports_destruction() {
        let mut world = world(Vitals::Simple(HealthComponent::new(100.0)));
        world.enemies.push(enemy(1, DVec2::new(100.0, 0.0), 20.0));
        world.projectiles.push(projectile(2, 25.0, 0));
        let mut orchestrator = CombatOrchestrator::new();
        let mut events = Vec::new();

        orchestrator.resolve_projectile_hits(&mut world, &StatModel::new(), &mut events);

        assert!(world.enemies[0].vitals.is_destroyed());
        assert!(world.projectiles[0].spent);
        assert_eq!(
            orchestrator.take_destroyed(),
            vec![EntityRef::new(EntityId(1), EntityKind::Enemy)]
        );
        assert!(orchestrator.take_destroyed().is_empty());
    }

    #[test]
    fn piercing_projectile_hits_each_enemy_once() {
        let mut world = world(Vitals::Simple(HealthComponent::new(100.0)));
        world.enemies.push(enemy(1, DVec2::new(100.0, 0.0), 100.0));
        world.enemies.push(enemy(2, DVec2::new(102.0, 0.0), 100.0));
        world.projectiles.push(projectile(3, 10.0, 1));
        let mut orchestrator = CombatOrchestrator::new();
        let mut events = Vec::new();

        orchestrator.resolve_projectile_hits(&mut world, &StatModel::new(), &mut events);
        orchestrator.resolve_projectile_hits(&mut world, &StatModel::new(), &mut events);

        assert_eq!(events.len(), 2);
        assert_eq!(world.enemies[0].vitals.hull().0, 90.0);
        assert_eq!(world.enemies[1].vitals.hull().0, 90.0);
    }

    #[test]
    fn lifesteal_uses_pre_resistance_damage() {
        // Characterization: the enemy resists most of the hit, lifesteal
        // still pays out on the raw packet.
        let player = Vitals::Simple(HealthComponent::new(100.0).with_current(50.0));
        let mut world = world(player);
        let mut armored = enemy(1, DVec2::new(100.0, 0.0), 0.0);
        armored.vitals = Vitals::Layered(DefenseComponent::new(
            DefenseLayer::empty(),
            DefenseLayer::empty(),
            DefenseLayer::new(500.0).with_resistances(
                crate::defense::Resistances::none().with(DamageType::Kinetic, 0.75),
            ),
        ));
        world.enemies.push(armored);
        world.projectiles.push(projectile(2, 40.0, 0));
        let stats = StatModel {
            lifesteal: 0.25,
            ..StatModel::new()
        };
        let mut events = Vec::new();

        CombatOrchestrator::new().resolve_projectile_hits(&mut world, &stats, &mut events);

        assert_eq!(world.enemies[0].vitals.hull().0, 490.0);
        assert_eq!(hull(&world), 60.0);
        assert!(events.contains(&CombatEvent::Healed {
            entity: EntityRef::PLAYER,
            amount: 10.0
        }));
    }

    #[test]
    fn lifesteal_is_capped_at_max() {
        let mut world = world(Vitals::Simple(HealthComponent::new(100.0).with_current(99.0)));
        world.enemies.push(enemy(1, DVec2::new(100.0, 0.0), 100.0));
        world.projectiles.push(projectile(2, 40.0, 0));
        let stats = StatModel {
            lifesteal: 1.0,
            ..StatModel::new()
        };
        let mut events = Vec::new();

        CombatOrchestrator::new().resolve_projectile_hits(&mut world, &stats, &mut events);
        assert_eq!(hull(&world), 100.0);
    }

    #[test]
    fn contact_grants_invulnerability_window() {
        let mut world = world(Vitals::Simple(HealthComponent::new(100.0)));
        world.enemies.push(enemy(1, DVec2::new(5.0, 0.0), 10.0));
        world.enemies.push(enemy(2, DVec2::new(-5.0, 0.0), 10.0));
        let mut events = Vec::new();

        CombatOrchestrator::new().resolve_contacts(
            &mut world,
            &StatModel::new(),
            &DefenseConfig::default(),
            &mut events,
        );

        // Only the first contact lands; the second meets the window.
        assert_eq!(hull(&world), 70.0);
        assert_eq!(events.len(), 1);
        assert!(world.player.vitals.invulnerability().is_active());
    }

    #[test]
    fn lethal_contact_emits_player_destroyed() {
        let mut world = world(Vitals::Simple(HealthComponent::new(100.0).with_current(10.0)));
        world.enemies.push(enemy(1, DVec2::new(5.0, 0.0), 10.0));
        let mut events = Vec::new();
        let mut orchestrator = CombatOrchestrator::new();

        orchestrator.resolve_contacts(
            &mut world,
            &StatModel::new(),
            &DefenseConfig::default(),
            &mut events,
        );

        assert_eq!(events.last(), Some(&CombatEvent::PlayerDestroyed));
        assert_eq!(orchestrator.take_destroyed(), vec![EntityRef::PLAYER]);
    }
}
