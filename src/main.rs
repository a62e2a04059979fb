//! VenueSender binary entry point

use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use venuesender::config::{resolve_config_path, Settings};
use venuesender::shell::{self, Shell};

/// Email booking requests to filtered music venues
#[derive(Parser, Debug)]
#[command(name = "venuesender", version, about)]
struct Cli {
    /// Path to the config file (defaults to ./venuesender.json, then the
    /// user config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = resolve_config_path(cli.config)?;
    let settings = Settings::load(&config_path)?;
    info!(config = %config_path.display(), "settings loaded");

    let outcome = shell::load_venues_with_fallback(&settings)?;
    if !outcome.skipped.is_empty() {
        eprintln!(
            "Warning: {} malformed venue record(s) were skipped.",
            outcome.skipped.len()
        );
    }
    info!(venues = outcome.venues.len(), "venues loaded");

    let stdin = std::io::stdin();
    let mut input = BufReader::new(stdin.lock());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut shell = Shell::new(settings, outcome.venues);
    shell.run(&mut input, &mut out)?;
    out.flush()?;
    Ok(())
}
