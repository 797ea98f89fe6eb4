//! Headless simulation entry point.
//!
//! Loads content, runs one session on a fixed timestep with a scripted
//! pilot and logs a summary. Configure with `SIM_*` environment variables
//! (see [`config::SimConfig`]) or a `.env` file.
mod config;
mod pilot;
mod report;

use std::path::Path;

use anyhow::{Context, Result};
use config::SimConfig;
use pilot::Pilot;
use report::{EventLog, Summary};
use survivor_content::{ContentFactory, SaveLoader};
use survivor_core::{CombatEvent, GameSession, MetaProgression};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimConfig::from_env();
    let _guard = setup_logging(config.log_dir.as_deref())?;

    run(&config)
}

/// Logs to stderr, and to `<log_dir>/sim.log` when a directory is given.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, "sim.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn run(config: &SimConfig) -> Result<()> {
    let factory = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::builtin(),
    };
    let (catalog, warnings) = factory
        .load_validated_catalog()
        .context("Failed to load catalog")?;
    let game_config = factory.load_config().context("Failed to load config")?;
    let meta = match &config.save_file {
        Some(path) => SaveLoader::load_or_default(path)?,
        None => MetaProgression::default(),
    };

    tracing::info!(
        source = ?factory.data_dir(),
        ships = catalog.ships().count(),
        warnings = warnings.len(),
        "content loaded"
    );

    let mut session = GameSession::new(
        &catalog,
        game_config,
        meta.clone(),
        &config.ship,
        config.seed,
    )
    .with_context(|| format!("Failed to start session for ship `{}`", config.ship))?;
    let mut pilot = Pilot::new(config.seed);
    let mut log = config
        .events_file
        .as_deref()
        .map(EventLog::create)
        .transpose()?;
    let mut summary = Summary {
        level: 1,
        ..Summary::default()
    };

    let dt = config.step();
    for _ in 0..config.frames() {
        let intent = pilot.intent(session.world());
        let events = session.update(dt, intent);

        for event in &events {
            summary.record(event);
            if let Some(log) = log.as_mut() {
                log.write(session.elapsed(), event)?;
            }
        }
        for event in &events {
            if let CombatEvent::LevelUp { .. } = event {
                pilot.level_up(&catalog, &meta, &mut session)?;
            }
        }

        if session.is_over() {
            tracing::warn!(elapsed = session.elapsed(), "ship destroyed");
            break;
        }
    }

    if let Some(log) = log {
        let written = log.finish()?;
        tracing::info!(events = written, "event log written");
    }

    let stats = session.stats();
    tracing::info!(
        ship = %config.ship,
        seed = config.seed,
        elapsed = session.elapsed(),
        wave = summary.waves,
        spawned = summary.spawned,
        kills = summary.kills,
        level = summary.level,
        xp = summary.xp_collected,
        dealt = summary.damage_dealt,
        taken = summary.damage_taken,
        crits = summary.crits,
        healed = summary.healed,
        overheats = summary.overheats,
        destroyed = summary.destroyed,
        "run finished"
    );
    tracing::info!(
        damage = stats.damage_multiplier,
        fire_rate = stats.fire_rate_multiplier,
        max_shield = stats.max_shield,
        max_armor = stats.max_armor,
        max_structure = stats.max_structure,
        weapons = ?session.loadout().weapons,
        modules = ?session.loadout().modules,
        "final loadout"
    );

    Ok(())
}
