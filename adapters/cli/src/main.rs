#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs lander waves headlessly.

mod session;
mod settings;

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{session::Session, settings::Settings};

/// Runs the lander formation, projectile director and surveyor against a
/// scripted player.
#[derive(Debug, Parser)]
#[command(name = "landers", version)]
struct Args {
    /// TOML settings file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(short, long, default_value_t = 3_600)]
    frames: u32,
    /// Seconds advanced per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// Overrides the session and director seeds.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Overrides the frames between scripted kills.
    #[arg(long)]
    kill_every: Option<u32>,
    /// Writes every command as a JSON line to stdout.
    #[arg(long)]
    emit_commands: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!(error))
        .context("failed to install tracing subscriber")?;

    let mut settings = match &args.config {
        Some(path) => Settings::from_path(path)?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.session.seed = seed;
        settings.director.rng_seed = seed;
    }
    if let Some(kill_every) = args.kill_every {
        settings.session.kill_every = kill_every;
    }
    anyhow::ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "--dt must be positive, got {}",
        args.dt
    );

    let mut session = Session::new(&settings)?;
    session.start_round();

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    for _ in 0..args.frames {
        session.step(args.dt, |command| {
            if args.emit_commands {
                serde_json::to_writer(&mut writer, command)
                    .context("failed to encode command")?;
                writeln!(writer).context("failed to write command")?;
            }
            Ok(())
        })?;
    }

    let summary = session.summary();
    info!(frames = summary.frames, "session finished");
    writeln!(
        writer,
        "frames={} score={} kills={} projectiles={} waves_cleared={} shooter_changes={}",
        summary.frames,
        summary.score,
        summary.kills,
        summary.projectiles,
        summary.waves_cleared,
        summary.shooter_changes
    )?;
    writer.flush().context("failed to flush stdout")?;
    Ok(())
}
