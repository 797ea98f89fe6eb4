//! Run summary and the JSON-lines event log.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use survivor_core::{CombatEvent, EntityKind};

/// Running totals over a session's events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub waves: u32,
    pub spawned: u32,
    pub kills: u32,
    pub level: u32,
    pub xp_collected: f64,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub crits: u32,
    pub healed: f64,
    pub overheats: u32,
    pub destroyed: bool,
}

impl Summary {
    pub fn record(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::Hit {
                target,
                critical,
                result,
                ..
            } => {
                if target.kind == EntityKind::Player {
                    self.damage_taken += result.total_damage;
                } else {
                    self.damage_dealt += result.total_damage;
                    self.crits += u32::from(*critical);
                }
            }
            CombatEvent::Destroyed { .. } => self.kills += 1,
            CombatEvent::Healed { amount, .. } => self.healed += amount,
            CombatEvent::Overheated { .. } => self.overheats += 1,
            CombatEvent::HeatRecovered { .. } => {}
            CombatEvent::WaveStarted { wave, .. } => self.waves = self.waves.max(*wave),
            CombatEvent::EnemySpawned { .. } => self.spawned += 1,
            CombatEvent::PickupCollected { xp, .. } => self.xp_collected += xp,
            CombatEvent::LevelUp { level } => self.level = self.level.max(*level),
            CombatEvent::PlayerDestroyed => self.destroyed = true,
        }
    }
}

#[derive(Serialize)]
struct Record<'a> {
    time: f64,
    #[serde(flatten)]
    event: &'a CombatEvent,
}

/// Writes one JSON object per event, stamped with the session time.
pub struct EventLog {
    writer: BufWriter<File>,
    written: u64,
}

impl EventLog {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create events file {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write(&mut self, time: f64, event: &CombatEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &Record { time, event })?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use survivor_core::{DamageResult, DamageType, EntityId, EntityRef};

    use super::*;

    #[test]
    fn summary_splits_damage_by_side() {
        let enemy = EntityRef::new(EntityId(4), EntityKind::Enemy);
        let hit = |source, target, total| CombatEvent::Hit {
            source,
            target,
            damage_type: DamageType::Kinetic,
            critical: true,
            result: DamageResult {
                total_damage: total,
                ..DamageResult::default()
            },
        };

        let mut summary = Summary::default();
        summary.record(&hit(EntityRef::PLAYER, enemy, 12.0));
        summary.record(&hit(enemy, EntityRef::PLAYER, 5.0));
        summary.record(&CombatEvent::Destroyed { entity: enemy });
        summary.record(&CombatEvent::LevelUp { level: 3 });

        assert_eq!(summary.damage_dealt, 12.0);
        assert_eq!(summary.damage_taken, 5.0);
        assert_eq!(summary.crits, 1);
        assert_eq!(summary.kills, 1);
        assert_eq!(summary.level, 3);
    }

    #[test]
    fn event_log_writes_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let mut log = EventLog::create(&path).unwrap();
        log.write(0.5, &CombatEvent::WaveStarted { wave: 1, budget: 20 })
            .unwrap();
        log.write(1.0, &CombatEvent::PlayerDestroyed).unwrap();
        assert_eq!(log.finish().unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "wave_started");
        assert_eq!(lines[0]["wave"], 1);
        assert_eq!(lines[0]["time"], 0.5);
        assert_eq!(lines[1]["event"], "player_destroyed");
    }
}
