//! Bouncy Grid entry point
//!
//! Builds a scenario from settings and command line flags, then runs the
//! tick loop, redrawing the grid in place after every tick.

use std::io::{Write, stdout};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;

use bouncy_grid::render::{HiddenCursor, render_frame, repaint_prefix};
use bouncy_grid::sim::{SimError, World, tick};
use bouncy_grid::{Scenario, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "bouncy-grid",
    version,
    about = "Elastic particles bouncing around a text grid"
)]
struct Cli {
    /// JSON settings file; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting layout.
    #[arg(short, long, default_value = "random", value_parser = parse_scenario)]
    scenario: Scenario,

    /// Number of ticks to run.
    #[arg(short, long)]
    ticks: Option<u64>,

    /// RNG seed for placement and velocities.
    #[arg(long)]
    seed: Option<u64>,

    /// Delay between frames in milliseconds.
    #[arg(long)]
    clock_ms: Option<u64>,

    /// Grid rows (random scenario).
    #[arg(long)]
    rows: Option<u32>,

    /// Grid columns (random scenario).
    #[arg(long)]
    cols: Option<u32>,

    /// Entity count (random scenario).
    #[arg(long)]
    entities: Option<usize>,

    /// Run without drawing frames.
    #[arg(long)]
    headless: bool,

    /// Print the final world snapshot as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_scenario(s: &str) -> Result<Scenario, String> {
    Scenario::from_str(s).ok_or_else(|| {
        let names: Vec<&str> = Scenario::ALL.iter().map(|s| s.as_str()).collect();
        format!("unknown scenario '{s}' (expected one of: {})", names.join(", "))
    })
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(ticks) = self.ticks {
            settings.ticks = ticks;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(clock_ms) = self.clock_ms {
            settings.clock_ms = clock_ms;
        }
        if let Some(rows) = self.rows {
            settings.rows = rows;
        }
        if let Some(cols) = self.cols {
            settings.cols = cols;
        }
        if let Some(entities) = self.entities {
            settings.entities = entities;
        }
        Ok(settings)
    }
}

/// Draw one frame, over the previous one when there is one
fn draw(out: &mut impl Write, world: &World, repaint: bool) -> Result<()> {
    if repaint {
        write!(out, "{}", repaint_prefix(world.rows() - 1))?;
    }
    write!(out, "{}", render_frame(world))?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = cli.settings()?;

    let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
    log::info!(
        "Starting scenario '{}' with seed {}",
        cli.scenario.as_str(),
        seed
    );

    let mut world = cli
        .scenario
        .build(&settings, seed)
        .context("failed to build scenario")?;

    let mut out = stdout().lock();
    // Shows the cursor again however the loop ends
    let cursor = if cli.headless {
        None
    } else {
        Some(HiddenCursor::new(&mut out)?)
    };

    let clock = Duration::from_millis(settings.clock_ms);
    let mut stalled = 0u64;
    for n in 0..settings.ticks {
        if cursor.is_some() {
            thread::sleep(clock);
            draw(&mut out, &world, n > 0)?;
        }
        match tick(&mut world) {
            Ok(_) => {}
            Err(err @ SimError::ResolverDiverged { .. }) => {
                // Stuck bodies held still this tick; keep going
                stalled += 1;
                log::warn!("tick {}: {err}", world.time_ticks());
            }
            Err(err) => return Err(err).context("simulation failed"),
        }
    }

    if cursor.is_some() {
        // State after the last tick
        draw(&mut out, &world, settings.ticks > 0)?;
    }
    drop(cursor);

    if stalled > 0 {
        log::warn!("{stalled} ticks could not be resolved");
    }
    log::info!("Finished after {} ticks", world.time_ticks());

    if cli.json {
        let json = serde_json::to_string_pretty(&world.snapshot())?;
        writeln!(out, "{json}")?;
    }
    Ok(())
}
