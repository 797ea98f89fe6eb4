//! Time-boxed waves and the spawn budget.
//!
//! Each wave lasts `wave_duration` seconds and starts with a fresh budget.
//! Every `spawn_interval` the director buys at most one enemy it can afford
//! and that is unlocked for the current wave, picked with the session RNG.
//! Spawning pauses while `max_alive` enemies are alive and stops for the
//! rest of the wave once nothing is affordable.

use crate::catalog::{Catalog, EnemyProfile};
use crate::config::WaveConfig;
use crate::rng::SessionRng;

/// An enemy the session should spawn this frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    pub enemy_id: String,
    pub wave: u32,
}

/// What one director update produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveTick {
    /// `(wave, budget)` when a wave started during this update.
    pub started: Option<(u32, u32)>,
    pub spawns: Vec<SpawnRequest>,
}

#[derive(Clone, Debug)]
pub struct WaveDirector {
    config: WaveConfig,
    wave: u32,
    wave_timer: f64,
    spawn_timer: f64,
    budget: u32,
}

impl WaveDirector {
    pub fn new(config: WaveConfig) -> Self {
        Self {
            config,
            wave: 0,
            wave_timer: 0.0,
            spawn_timer: 0.0,
            budget: 0,
        }
    }

    /// Current wave, 0 before the first update.
    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn remaining_budget(&self) -> u32 {
        self.budget
    }

    pub fn update(
        &mut self,
        dt: f64,
        alive: usize,
        catalog: &Catalog,
        rng: &mut SessionRng,
    ) -> WaveTick {
        let mut tick = WaveTick::default();

        self.wave_timer -= dt;
        if self.wave == 0 || self.wave_timer <= 0.0 {
            self.start_next_wave();
            tick.started = Some((self.wave, self.budget));
        }

        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            self.spawn_timer = (self.spawn_timer + self.config.spawn_interval).max(0.0);
            if alive < self.config.max_alive {
                if let Some(profile) = self.pick(catalog, rng) {
                    self.budget -= profile.cost;
                    tick.spawns.push(SpawnRequest {
                        enemy_id: profile.id.clone(),
                        wave: self.wave,
                    });
                }
            }
        }

        tick
    }

    fn start_next_wave(&mut self) {
        self.wave += 1;
        self.wave_timer = self.config.wave_duration;
        self.spawn_timer = 0.0;
        self.budget = self.config.budget_for(self.wave);
        tracing::debug!(wave = self.wave, budget = self.budget, "wave started");
    }

    fn pick<'c>(&self, catalog: &'c Catalog, rng: &mut SessionRng) -> Option<&'c EnemyProfile> {
        let candidates: Vec<&EnemyProfile> = catalog
            .enemies()
            .filter(|e| e.min_wave <= self.wave && e.cost <= self.budget)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.index(candidates.len())])
    }
}
