//! Airblox: headless arcade flight session.
//!
//! Loads `config.ron`, binds one aircraft profile and flight policy, then
//! flies it for a fixed number of ticks driven by an optional input script,
//! logging through `tracing` and the flight recorder.
//!
//! Run with: `cargo run -p airblox-game -- --aircraft scout --script w:120,none:240`

mod camera;
mod error;
mod script;
mod session;

use airblox_config::{CliArgs, Config};
use airblox_debug::{DEFAULT_EXPORT_FILE, SystemClock};
use clap::Parser;
use script::InputScript;
use session::FlightSession;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// CLI arguments for the game binary.
#[derive(Parser, Debug)]
#[command(name = "airblox", about = "Airblox arcade flight simulator")]
struct GameArgs {
    #[command(flatten)]
    cli: CliArgs,

    /// Input script, e.g. `w:120,none:60,d+w:30`. Overrides `--ticks`.
    #[arg(long)]
    script: Option<String>,

    /// Write the flight recorder buffer as JSON on exit.
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
    export: Option<PathBuf>,

    /// Pace ticks in wall-clock time instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Log the HUD every N ticks (0 = only at the end).
    #[arg(long, default_value_t = 0)]
    hud_every: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = GameArgs::parse();

    let config_dir = args.cli.config.clone().or_else(Config::default_dir);
    let mut config = match &config_dir {
        Some(dir) => Config::load_or_create(dir)?,
        None => Config::default(),
    };
    config.apply_cli_overrides(&args.cli);
    config.validate()?;

    let log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    airblox_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));
    info!("Airblox {}", env!("CARGO_PKG_VERSION"));

    let script = match &args.script {
        Some(script) => script.parse::<InputScript>()?,
        None => InputScript::idle(config.sim.ticks),
    };

    let mut session = if args.realtime {
        FlightSession::new(&config, Arc::new(SystemClock::new()), None)?
    } else {
        FlightSession::headless(&config)?
    };
    info!(
        "Flying {} ticks ({} script steps) at {} Hz",
        script.total_ticks(),
        script.steps().len(),
        config.sim.tick_rate_hz
    );

    let started = Instant::now();
    for keys in script.ticks() {
        let tick_start = Instant::now();
        session.hold(keys);
        let report = session.step();
        if args.hud_every > 0 && report.tick % args.hud_every == 0 {
            info!("tick {}\n{}", report.tick, session.hud_text());
        }
        if args.realtime {
            std::thread::sleep(session.tick_dt().saturating_sub(tick_start.elapsed()));
        }
    }
    session.finish();
    info!(
        "Simulated {} ticks in {:.1} ms\n{}",
        session.model().tick(),
        started.elapsed().as_secs_f64() * 1000.0,
        session.hud_text()
    );

    if let Some(path) = args.export {
        session.export(&path)?;
    }
    Ok(())
}
