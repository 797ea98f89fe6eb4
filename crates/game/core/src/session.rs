//! One run: the world, its director and the per-frame update.
//!
//! # Frame order
//!
//! ```text
//! invulnerability timers → player movement → wave spawns → enemy seek
//! → weapon fire → projectile flight → collisions → cleanup + XP drops
//! → pickups + levels → layer regeneration → heat
//! ```
//!
//! Equipment changes go through [`GameSession::equip_weapon`] and friends;
//! each one recomputes the loadout and pushes the new snapshot into the
//! player's defense layers and heat controller.

use arrayvec::ArrayVec;
use glam::DVec2;

use crate::catalog::Catalog;
use crate::combat::{CombatOrchestrator, WeaponSlot, nearest_within};
use crate::config::{ConfigError, GameConfig};
use crate::entity::{
    Enemy, EntityKind, EntityRef, MAX_WEAPON_SLOTS, Pickup, Player, Projectile, World,
    player_vitals,
};
use crate::error::{ErrorSeverity, GameError};
use crate::events::CombatEvent;
use crate::heat::{HeatController, HeatTransition};
use crate::meta::MetaProgression;
use crate::rng::SessionRng;
use crate::stats::{ComputedLoadout, Loadout, PipelineError, StatModel, StatPipeline};
use crate::tags::weapon_tag_multiplier;
use crate::wave::WaveDirector;

/// RNG sub-streams, so that adding a consumer never shifts another's rolls.
const STREAM_COMBAT: u64 = 1;
const STREAM_WAVES: u64 = 2;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("all {0} weapon slots are in use")]
    WeaponSlotsFull(usize),
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(error) => error.severity(),
            Self::Pipeline(error) => error.severity(),
            Self::WeaponSlotsFull(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(error) => error.error_code(),
            Self::Pipeline(error) => error.error_code(),
            Self::WeaponSlotsFull(_) => "SESSION_WEAPON_SLOTS_FULL",
        }
    }
}

/// Player input for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    /// Desired direction; normalized before use.
    pub movement: DVec2,
}

impl Intent {
    pub fn toward(direction: DVec2) -> Self {
        Self {
            movement: direction,
        }
    }
}

pub struct GameSession<'c> {
    catalog: &'c Catalog,
    config: GameConfig,
    meta: MetaProgression,
    pipeline: StatPipeline,
    loadout: Loadout,
    computed: ComputedLoadout,
    world: World,
    waves: WaveDirector,
    orchestrator: CombatOrchestrator,
    combat_rng: SessionRng,
    wave_rng: SessionRng,
    elapsed: f64,
    kills: u32,
    game_over: bool,
}

impl<'c> GameSession<'c> {
    /// Starts a run with the ship's starting weapons equipped. Fails on an
    /// invalid config or an unknown ship.
    pub fn new(
        catalog: &'c Catalog,
        config: GameConfig,
        meta: MetaProgression,
        ship: &str,
        seed: u64,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let pipeline = StatPipeline::new(config.tags.clone());
        let mut loadout = Loadout::new(ship);
        // Unknown ship ids fail here, before anything else is built.
        pipeline.compute(catalog, &loadout, &meta)?;

        let mut weapons = ArrayVec::new();
        if let Some(ship) = catalog.ship(ship) {
            for id in &ship.starting_weapons {
                if catalog.weapon(id).is_none() {
                    tracing::warn!(weapon = %id, "ignoring unknown starting weapon");
                    continue;
                }
                if weapons.try_push(WeaponSlot::new(id.clone())).is_err() {
                    tracing::warn!(weapon = %id, "no free weapon slot for starting weapon");
                    break;
                }
                loadout.weapons.push(id.clone());
            }
        }

        let computed = pipeline.compute(catalog, &loadout, &meta)?;
        let player = Player {
            position: DVec2::ZERO,
            radius: config.player.radius,
            vitals: player_vitals(&computed.stats, &computed.module_effects, &config.defense),
            heat: HeatController::new(&config.heat, &computed.stats),
            weapons,
            level: 1,
            xp: 0.0,
        };

        let rng = SessionRng::new(seed);
        tracing::info!(ship, seed, weapons = loadout.weapons.len(), "session started");

        Ok(Self {
            catalog,
            waves: WaveDirector::new(config.waves.clone()),
            config,
            meta,
            pipeline,
            loadout,
            computed,
            world: World::new(player),
            orchestrator: CombatOrchestrator::new(),
            combat_rng: rng.fork(STREAM_COMBAT),
            wave_rng: rng.fork(STREAM_WAVES),
            elapsed: 0.0,
            kills: 0,
            game_over: false,
        })
    }

    pub fn stats(&self) -> &StatModel {
        &self.computed.stats
    }

    pub fn computed(&self) -> &ComputedLoadout {
        &self.computed
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn orchestrator_mut(&mut self) -> &mut CombatOrchestrator {
        &mut self.orchestrator
    }

    pub fn wave(&self) -> u32 {
        self.waves.wave()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// XP needed to go from `level` to `level + 1`.
    pub fn xp_to_next(&self, level: u32) -> f64 {
        let exponent = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
        self.config.player.base_xp * self.config.player.xp_growth.powi(exponent)
    }

    // ------------------------------------------------------------------
    // Equipment changes
    // ------------------------------------------------------------------

    /// Adds a weapon. Unknown ids are logged and ignored (`Ok(false)`).
    pub fn equip_weapon(&mut self, id: &str) -> Result<bool, SessionError> {
        if self.catalog.weapon(id).is_none() {
            tracing::warn!(weapon = id, "ignoring unknown weapon");
            return Ok(false);
        }
        if self.world.player.weapons.is_full() {
            return Err(SessionError::WeaponSlotsFull(MAX_WEAPON_SLOTS));
        }
        self.world.player.weapons.push(WeaponSlot::new(id));
        self.loadout.weapons.push(id.to_string());
        self.recompute()?;
        Ok(true)
    }

    /// Adds a module. Unknown ids are logged and ignored (`Ok(false)`).
    pub fn equip_module(&mut self, id: &str) -> Result<bool, SessionError> {
        if self.catalog.module(id).is_none() {
            tracing::warn!(module = id, "ignoring unknown module");
            return Ok(false);
        }
        self.loadout.modules.push(id.to_string());
        self.recompute()?;
        Ok(true)
    }

    /// Sets an upgrade's level (clamped to its max). Unknown ids are logged
    /// and ignored (`Ok(false)`).
    pub fn set_upgrade_level(&mut self, id: &str, level: u32) -> Result<bool, SessionError> {
        let Some(upgrade) = self.catalog.upgrade(id) else {
            tracing::warn!(upgrade = id, "ignoring unknown upgrade");
            return Ok(false);
        };
        let level = level.min(upgrade.max_level);
        if level == 0 {
            self.loadout.upgrades.remove(id);
        } else {
            self.loadout.upgrades.insert(id.to_string(), level);
        }
        self.recompute()?;
        Ok(true)
    }

    pub fn upgrade_level(&self, id: &str) -> u32 {
        self.loadout.upgrades.get(id).copied().unwrap_or(0)
    }

    /// Adds a keystone. Unknown ids are logged and ignored (`Ok(false)`).
    pub fn add_keystone(&mut self, id: &str) -> Result<bool, SessionError> {
        if self.catalog.keystone(id).is_none() {
            tracing::warn!(keystone = id, "ignoring unknown keystone");
            return Ok(false);
        }
        self.loadout.keystones.push(id.to_string());
        self.recompute()?;
        Ok(true)
    }

    /// Recomputes the snapshot and pushes it into the player.
    fn recompute(&mut self) -> Result<(), PipelineError> {
        self.computed = self
            .pipeline
            .compute(self.catalog, &self.loadout, &self.meta)?;
        let player = &mut self.world.player;
        if let Some(defense) = player.defense_mut() {
            defense.refresh(
                &self.computed.stats,
                &self.computed.module_effects,
                &self.config.defense,
            );
        }
        player.heat.refresh(&self.computed.stats);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Advances the run by `dt` seconds and returns what happened.
    pub fn update(&mut self, dt: f64, intent: Intent) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        if self.game_over || dt <= 0.0 || !dt.is_finite() {
            return events;
        }
        self.elapsed += dt;

        self.tick_invulnerability(dt);
        self.move_player(dt, intent);
        self.run_waves(dt, &mut events);
        self.move_enemies(dt);
        self.fire_weapons(dt, &mut events);
        self.move_projectiles(dt);

        let stats = &self.computed.stats;
        self.orchestrator
            .resolve_projectile_hits(&mut self.world, stats, &mut events);
        self.orchestrator
            .resolve_contacts(&mut self.world, stats, &self.config.defense, &mut events);

        self.cleanup(&mut events);
        self.collect_pickups(&mut events);
        self.regenerate(dt);
        self.update_heat(dt, &mut events);

        events
    }

    fn tick_invulnerability(&mut self, dt: f64) {
        self.world.player.vitals.invulnerability_mut().tick(dt);
        for enemy in &mut self.world.enemies {
            enemy.vitals.invulnerability_mut().tick(dt);
        }
    }

    fn move_player(&mut self, dt: f64, intent: Intent) {
        let direction = intent.movement.normalize_or_zero();
        let player = &mut self.world.player;
        let half = DVec2::new(self.config.arena.width, self.config.arena.height) * 0.5;
        player.position = (player.position + direction * self.computed.stats.move_speed * dt)
            .clamp(-half, half);
    }

    fn run_waves(&mut self, dt: f64, events: &mut Vec<CombatEvent>) {
        let alive = self.world.alive_enemies();
        let tick = self
            .waves
            .update(dt, alive, self.catalog, &mut self.wave_rng);
        if let Some((wave, budget)) = tick.started {
            tracing::info!(wave, budget, "wave started");
            events.push(CombatEvent::WaveStarted { wave, budget });
        }

        for request in tick.spawns {
            let Some(profile) = self.catalog.enemy(&request.enemy_id) else {
                continue;
            };
            let angle = self.wave_rng.next_f64() * std::f64::consts::TAU;
            let position = self.world.player.position
                + DVec2::from_angle(angle) * self.config.arena.spawn_distance;
            let id = self.world.allocate_id();
            match Enemy::from_profile(id, profile, position) {
                Ok(enemy) => {
                    events.push(CombatEvent::EnemySpawned {
                        entity: enemy.entity(),
                        profile: profile.id.clone(),
                    });
                    self.world.enemies.push(enemy);
                }
                Err(error) => {
                    tracing::warn!(enemy = %profile.id, %error, "skipping invalid enemy profile");
                }
            }
        }
    }

    fn move_enemies(&mut self, dt: f64) {
        let target = self.world.player.position;
        for enemy in &mut self.world.enemies {
            let to_player = target - enemy.position;
            let step = enemy.speed * dt;
            if to_player.length_squared() <= step * step {
                enemy.position = target;
            } else {
                enemy.position += to_player.normalize_or_zero() * step;
            }
        }
    }

    fn fire_weapons(&mut self, dt: f64, events: &mut Vec<CombatEvent>) {
        let catalog = self.catalog;
        let stats = &self.computed.stats;
        let tag_effects = &self.computed.tag_effects;
        let min_interval = self.config.player.min_fire_interval;
        let player = &mut self.world.player;
        let enemies = &self.world.enemies;
        let mut shots = Vec::new();

        for slot in player.weapons.iter_mut() {
            slot.tick(dt);
            let Some(weapon) = catalog.weapon(&slot.weapon_id) else {
                continue;
            };
            if !slot.is_ready() || player.heat.is_overheated() {
                continue;
            }
            let live = enemies
                .iter()
                .filter(|e| !e.vitals.is_destroyed())
                .map(|e| (e.id, e.position));
            let Some((_, target)) = nearest_within(player.position, weapon.range, live) else {
                continue;
            };

            let multiplier = weapon_tag_multiplier(weapon, tag_effects);
            let Some(shot) = slot.fire(
                weapon,
                stats,
                multiplier,
                min_interval,
                &mut player.heat,
                &mut self.combat_rng,
            ) else {
                continue;
            };
            if shot.heat == Some(HeatTransition::Overheated) {
                events.push(CombatEvent::Overheated {
                    entity: EntityRef::PLAYER,
                });
            }
            let direction = (target - player.position).normalize_or(DVec2::X);
            shots.push((weapon, direction, shot));
        }

        let origin = self.world.player.position;
        for (weapon, direction, shot) in shots {
            let id = self.world.allocate_id();
            self.world.projectiles.push(Projectile {
                id,
                owner: EntityRef::PLAYER,
                position: origin,
                velocity: direction * weapon.projectile_speed,
                radius: weapon.projectile_radius,
                packet: shot.packet,
                remaining_range: weapon.range,
                pierce: weapon.pierce,
                hits: Vec::new(),
                spent: false,
            });
        }
    }

    fn move_projectiles(&mut self, dt: f64) {
        for projectile in &mut self.world.projectiles {
            let step = projectile.velocity * dt;
            projectile.position += step;
            projectile.remaining_range -= step.length();
            if projectile.remaining_range <= 0.0 {
                projectile.spent = true;
            }
        }
    }

    fn cleanup(&mut self, events: &mut Vec<CombatEvent>) {
        for entity in self.orchestrator.take_destroyed() {
            match entity.kind {
                EntityKind::Enemy => {
                    let Some(enemy) = self.world.enemy(entity.id) else {
                        continue;
                    };
                    let (position, xp) = (enemy.position, enemy.xp_value);
                    self.kills += 1;
                    events.push(CombatEvent::Destroyed { entity });
                    if xp > 0.0 {
                        let id = self.world.allocate_id();
                        self.world.pickups.push(Pickup { id, position, xp });
                    }
                }
                EntityKind::Player => {
                    self.game_over = true;
                }
                EntityKind::Projectile | EntityKind::Pickup => {}
            }
        }
        self.world.enemies.retain(|e| !e.vitals.is_destroyed());
        self.world.projectiles.retain(|p| !p.spent);
    }

    fn collect_pickups(&mut self, events: &mut Vec<CombatEvent>) {
        let reach = self.computed.stats.pickup_radius + self.world.player.radius;
        let origin = self.world.player.position;
        let xp_multiplier = self.computed.stats.xp_multiplier;

        let mut gained = 0.0;
        self.world.pickups.retain(|pickup| {
            if origin.distance_squared(pickup.position) > reach * reach {
                return true;
            }
            let xp = pickup.xp * xp_multiplier;
            gained += xp;
            events.push(CombatEvent::PickupCollected {
                entity: pickup.entity(),
                xp,
            });
            false
        });
        if gained <= 0.0 || self.game_over {
            return;
        }

        self.world.player.xp += gained;
        loop {
            let needed = self.xp_to_next(self.world.player.level);
            if needed.is_nan() || needed <= 0.0 || self.world.player.xp < needed {
                break;
            }
            self.world.player.xp -= needed;
            self.world.player.level += 1;
            let level = self.world.player.level;
            tracing::debug!(level, "level up");
            events.push(CombatEvent::LevelUp { level });
        }
    }

    fn regenerate(&mut self, dt: f64) {
        self.world.player.vitals.update(dt);
        for enemy in &mut self.world.enemies {
            enemy.vitals.update(dt);
        }
    }

    fn update_heat(&mut self, dt: f64, events: &mut Vec<CombatEvent>) {
        let entity = EntityRef::PLAYER;
        match self.world.player.heat.update(dt) {
            Some(HeatTransition::Overheated) => events.push(CombatEvent::Overheated { entity }),
            Some(HeatTransition::Recovered) => events.push(CombatEvent::HeatRecovered { entity }),
            None => {}
        }
    }
}
