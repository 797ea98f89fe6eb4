//! A scripted pilot: kites away from the closest enemy and picks a random
//! reward from the ship's loot pool on every level-up.

use glam::DVec2;
use survivor_core::rng::SessionRng;
use survivor_core::{Catalog, GameSession, Intent, MetaProgression, SessionError, World};

/// RNG stream for reward picks; kept apart from the session's own streams.
const STREAM_PILOT: u64 = 3;

/// One level-up reward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reward {
    Weapon(String),
    Module(String),
    /// Upgrade id and the level it goes to.
    Upgrade(String, u32),
}

impl Reward {
    pub fn apply(&self, session: &mut GameSession<'_>) -> Result<bool, SessionError> {
        match self {
            Reward::Weapon(id) => session.equip_weapon(id),
            Reward::Module(id) => session.equip_module(id),
            Reward::Upgrade(id, level) => session.set_upgrade_level(id, *level),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pilot {
    rng: SessionRng,
    /// Enemies closer than this push the pilot away.
    kite_radius: f64,
}

impl Pilot {
    pub const DEFAULT_KITE_RADIUS: f64 = 220.0;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: SessionRng::new(seed).fork(STREAM_PILOT),
            kite_radius: Self::DEFAULT_KITE_RADIUS,
        }
    }

    /// Flee the nearest enemy inside the kite radius, otherwise drift back
    /// toward the arena centre.
    pub fn intent(&self, world: &World) -> Intent {
        let position = world.player.position;
        let nearest = world
            .enemies
            .iter()
            .map(|enemy| enemy.position)
            .min_by(|a, b| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            });

        match nearest {
            Some(enemy) if enemy.distance(position) < self.kite_radius => {
                Intent::toward((position - enemy).normalize_or(DVec2::Y))
            }
            _ if position.length() > self.kite_radius => Intent::toward(-position),
            _ => Intent::default(),
        }
    }

    /// Everything the ship could take right now.
    pub fn offers(
        catalog: &Catalog,
        meta: &MetaProgression,
        session: &GameSession<'_>,
    ) -> Vec<Reward> {
        let Some(ship) = catalog.ship(&session.loadout().ship) else {
            return Vec::new();
        };
        let loadout = session.loadout();
        let mut offers = Vec::new();

        if !session.world().player.weapons.is_full() {
            let weapons = ship.loot_pool.weapons.iter().chain(&meta.unlocked_weapons);
            for id in weapons {
                let reward = Reward::Weapon(id.clone());
                if catalog.weapon(id).is_some()
                    && !loadout.weapons.contains(id)
                    && !offers.contains(&reward)
                {
                    offers.push(reward);
                }
            }
        }

        let modules = ship.loot_pool.modules.iter().chain(&meta.unlocked_modules);
        for id in modules {
            let reward = Reward::Module(id.clone());
            if catalog.module(id).is_some()
                && !loadout.modules.contains(id)
                && !offers.contains(&reward)
            {
                offers.push(reward);
            }
        }

        for id in &ship.loot_pool.upgrades {
            let Some(upgrade) = catalog.upgrade(id) else {
                continue;
            };
            let level = session.upgrade_level(id);
            if level < upgrade.max_level {
                offers.push(Reward::Upgrade(id.clone(), level + 1));
            }
        }

        offers
    }

    /// Picks and applies one reward. Returns what was taken, if anything.
    pub fn level_up(
        &mut self,
        catalog: &Catalog,
        meta: &MetaProgression,
        session: &mut GameSession<'_>,
    ) -> Result<Option<Reward>, SessionError> {
        let offers = Self::offers(catalog, meta, session);
        if offers.is_empty() {
            tracing::debug!("nothing left to offer");
            return Ok(None);
        }
        let reward = offers[self.rng.index(offers.len())].clone();
        reward.apply(session)?;
        tracing::info!(?reward, level = session.world().player.level, "reward taken");
        Ok(Some(reward))
    }
}
