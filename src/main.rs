mod config;
mod engine;
mod model;
mod report;
mod stats;

use crate::config::Config;
use crate::engine::Engine;
use anyhow::{Context, Result};
use clap::Parser;
use std::{
    io::Write,
    path::PathBuf,
    time::Instant,
};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Override the configured random seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mut cfg = Config::from_file(&args.config).context("failed to load config")?;
    if let Some(seed) = args.seed {
        cfg.run.seed = Some(seed);
    }
    log::info!("{cfg:#?}");

    let mut engine = Engine::new(cfg.clone()).context("failed to construct engine")?;

    let start = Instant::now();
    let outcome = engine.run().context("failed to run simulation")?;
    let elapsed = start.elapsed();

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    report::write_report(&mut writer, &cfg, &outcome, elapsed).context("failed to write report")?;
    writer.flush().context("failed to flush writer stream")?;

    Ok(())
}
