//! Bounce Arena entry point
//!
//! Headless host: starts the requested number of balls, lets them run for a
//! while, then disposes the simulation and prints where every ball ended up.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use bounce_arena::{Settings, Simulation, SpeedPreset};

#[derive(Parser, Debug)]
#[command(name = "bounce-arena", version, about = "Thread-per-ball bouncing simulation")]
struct Args {
    /// Number of balls to place
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    balls: u32,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick cadence preset (slow, normal, fast)
    #[arg(short, long, value_parser = parse_preset)]
    preset: Option<SpeedPreset>,

    /// How long to run before disposing
    #[arg(short, long, default_value_t = 5.0)]
    seconds: f64,

    /// Placement seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn parse_preset(s: &str) -> std::result::Result<SpeedPreset, String> {
    SpeedPreset::from_str(s).ok_or_else(|| format!("unknown preset '{}'", s))
}

/// Negative values run for zero time; NaN, infinity and overflow are errors
fn run_duration(seconds: f64) -> Result<Duration> {
    let seconds_or_zero = if seconds < 0.0 { 0.0 } else { seconds };
    Duration::try_from_secs_f64(seconds_or_zero)
        .with_context(|| format!("--seconds {} is not a usable duration", seconds))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Bounce Arena starting...");
    let run_for = run_duration(args.seconds)?;

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(preset) = args.preset {
        log::info!("Speed preset: {}", preset.as_str());
        settings.apply_preset(preset);
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let mut sim = Simulation::new(settings)?;
    sim.start(args.balls as usize, |pos, handle| {
        log::info!(
            "Ball {} created at ({:.1}, {:.1}), mass {:.2}",
            handle.id(),
            pos.x,
            pos.y,
            handle.mass()
        );
    })
    .context("failed to start simulation")?;

    let report_every = Duration::from_secs(1);
    let mut elapsed = Duration::ZERO;
    while elapsed < run_for {
        let nap = report_every.min(run_for - elapsed);
        thread::sleep(nap);
        elapsed += nap;
        let stats = sim.stats()?;
        log::info!(
            "t={:.1}s steps={} collisions={}",
            elapsed.as_secs_f64(),
            stats.steps,
            stats.collisions
        );
    }

    let stats = sim.stats()?;
    let bodies = sim.snapshot()?;
    sim.dispose()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&bodies)?);
    } else {
        for body in &bodies {
            println!(
                "ball {:>3}: pos=({:7.2}, {:7.2}) vel=({:6.2}, {:6.2})",
                body.id, body.pos.x, body.pos.y, body.vel.x, body.vel.y
            );
        }
    }
    println!(
        "{} balls, {} steps, {} collisions",
        stats.bodies, stats.steps, stats.collisions
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_duration_accepts_ordinary_values() {
        assert_eq!(run_duration(2.5).unwrap(), Duration::from_millis(2500));
        assert_eq!(run_duration(-3.0).unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_run_duration_rejects_unrepresentable_values() {
        assert!(run_duration(1e20).is_err());
        assert!(run_duration(f64::INFINITY).is_err());
        assert!(run_duration(f64::NAN).is_err());
    }

    #[test]
    fn test_preset_names_parse_back() {
        for preset in [SpeedPreset::Slow, SpeedPreset::Normal, SpeedPreset::Fast] {
            assert_eq!(parse_preset(preset.as_str()), Ok(preset));
        }
        assert!(parse_preset("warp").is_err());
    }
}
