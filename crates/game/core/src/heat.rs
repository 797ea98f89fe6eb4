//! Heat accumulation, cooling and overheat hysteresis.
//!
//! Cooling runs every frame, overheated or not. Passive generation pauses
//! while overheated. Overheat starts when heat reaches the maximum and ends
//! only once heat has dropped to `recovery_ratio × max` and the minimum
//! disable time has passed.

use crate::config::HeatConfig;
use crate::stats::StatModel;

/// State change reported by [`HeatController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeatTransition {
    Overheated,
    Recovered,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatController {
    current: f64,
    max: f64,
    cooling: f64,
    generation_multiplier: f64,
    passive_generation: f64,
    recovery_ratio: f64,
    min_disable_time: f64,
    overheated: bool,
    /// Seconds left before an overheat is allowed to clear.
    disable_timer: f64,
}

impl HeatController {
    pub fn new(config: &HeatConfig, stats: &StatModel) -> Self {
        let mut heat = Self {
            current: 0.0,
            max: 0.0,
            cooling: 0.0,
            generation_multiplier: 1.0,
            passive_generation: config.passive_generation.max(0.0),
            recovery_ratio: config.recovery_ratio,
            min_disable_time: config.min_disable_time.max(0.0),
            overheated: false,
            disable_timer: 0.0,
        };
        heat.refresh(stats);
        heat
    }

    /// Picks up a new stat snapshot. Current heat is kept (clamped).
    pub fn refresh(&mut self, stats: &StatModel) {
        self.max = stats.max_heat.max(0.0);
        self.cooling = stats.heat_cooling.max(0.0);
        self.generation_multiplier = stats.heat_generation_multiplier.max(0.0);
        self.current = self.current.clamp(0.0, self.max);
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Weapons must not fire while this is true.
    pub fn is_overheated(&self) -> bool {
        self.overheated
    }

    /// Adds the heat of one shot, scaled by the generation multiplier.
    pub fn add_heat(&mut self, per_shot: f64) -> Option<HeatTransition> {
        if per_shot <= 0.0 {
            return None;
        }
        self.current = (self.current + per_shot * self.generation_multiplier).min(self.max);
        self.check_enter()
    }

    /// Advances passive generation, cooling and the overheat timer.
    pub fn update(&mut self, dt: f64) -> Option<HeatTransition> {
        if dt <= 0.0 {
            return None;
        }
        if !self.overheated {
            self.current += self.passive_generation * dt;
        }
        self.current = (self.current - self.cooling * dt).clamp(0.0, self.max);

        if self.overheated {
            self.disable_timer = (self.disable_timer - dt).max(0.0);
            let threshold = self.max * self.recovery_ratio;
            if self.current <= threshold && self.disable_timer <= 0.0 {
                self.overheated = false;
                tracing::debug!(heat = self.current, "heat recovered");
                return Some(HeatTransition::Recovered);
            }
            None
        } else {
            self.check_enter()
        }
    }

    fn check_enter(&mut self) -> Option<HeatTransition> {
        if self.overheated || self.max <= 0.0 || self.current < self.max {
            return None;
        }
        self.overheated = true;
        self.disable_timer = self.min_disable_time;
        tracing::debug!(heat = self.current, "overheated");
        Some(HeatTransition::Overheated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(cooling: f64, passive: f64) -> HeatController {
        let stats = StatModel {
            heat_cooling: cooling,
            ..StatModel::new()
        };
        let config = HeatConfig {
            passive_generation: passive,
            ..HeatConfig::default()
        };
        HeatController::new(&config, &stats)
    }

    #[test]
    fn reaching_max_enters_overheat() {
        let mut heat = controller(0.0, 0.0);
        assert_eq!(heat.add_heat(60.0), None);
        assert_eq!(heat.add_heat(60.0), Some(HeatTransition::Overheated));
        assert!(heat.is_overheated());
        assert_eq!(heat.current(), 100.0);
    }

    #[test]
    fn recovery_needs_both_threshold_and_timer() {
        // Cooling 50/s: from 100 to 60 takes 0.8 s, timer needs 2.0 s.
        let mut heat = controller(50.0, 0.0);
        heat.add_heat(100.0);

        assert_eq!(heat.update(1.0), None);
        assert!(heat.current() <= 60.0);
        assert!(heat.is_overheated());

        assert_eq!(heat.update(1.0), Some(HeatTransition::Recovered));
        assert!(!heat.is_overheated());
    }

    #[test]
    fn timer_alone_does_not_clear_overheat() {
        let mut heat = controller(5.0, 0.0);
        heat.add_heat(100.0);
        assert_eq!(heat.update(3.0), None);
        assert!((heat.current() - 85.0).abs() < 1e-9);
        assert!(heat.is_overheated());
    }

    #[test]
    fn cooling_continues_while_overheated_despite_passive_heat() {
        // Passive generation outpaces cooling, but it pauses while overheated.
        let mut heat = controller(10.0, 30.0);
        heat.add_heat(100.0);
        let mut recovered = false;
        for _ in 0..100 {
            if heat.update(0.1) == Some(HeatTransition::Recovered) {
                recovered = true;
                break;
            }
        }
        assert!(recovered);
    }

    #[test]
    fn generation_multiplier_scales_shots() {
        let stats = StatModel {
            heat_generation_multiplier: 0.5,
            ..StatModel::new()
        };
        let mut heat = HeatController::new(&HeatConfig::default(), &stats);
        heat.add_heat(40.0);
        assert_eq!(heat.current(), 20.0);
    }

    #[test]
    fn heat_never_exceeds_max_or_drops_below_zero() {
        let mut heat = controller(1000.0, 0.0);
        heat.add_heat(1e9);
        assert_eq!(heat.current(), heat.max());
        heat.update(1.0);
        assert_eq!(heat.current(), 0.0);
    }
}
