//! ecg - synthesized cardiac trace on a terminal sweep display
//!
//! Run with: cargo run -- scope

mod app;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::Level;

use app::{dump, load_config, DumpFormat, Scope};

#[derive(Parser)]
#[command(name = "ecg")]
#[command(about = "Parametrized cardiac waveform on a scrolling sweep", long_about = None)]
struct Cli {
    /// Waveform configuration file (TOML); defaults are used without one
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Scroll speed in distance units per second (default: 150)
    #[arg(short, long, default_value = "150", global = true)]
    speed: f64,

    /// Viewport height in distance units (default: 400)
    #[arg(long, default_value = "400", global = true)]
    height: f64,

    /// Maximum log level: error, warn, info, debug or trace
    #[arg(long, default_value = "info", global = true)]
    log_level: Level,

    /// Write logs to this file (the scope never logs to the terminal)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the terminal sweep display
    Scope {
        /// Viewport width in distance units (default: 1000)
        #[arg(short, long, default_value = "1000")]
        width: f64,

        /// Frames per second (default: 60)
        #[arg(long, default_value = "60")]
        fps: u32,
    },
    /// Print synthesized points and exit
    Dump {
        /// Time units to cover (default: 5.0)
        #[arg(short, long, default_value = "5.0")]
        duration: f64,

        /// Emit JSON with beat summaries instead of x,y CSV
        #[arg(long)]
        json: bool,
    },
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let headless = matches!(cli.command, Some(Commands::Dump { .. }));
    init_logging(cli.log_level, cli.log_file.as_deref(), headless)?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Default::default(),
    };

    match cli.command.unwrap_or(Commands::Scope {
        width: 1000.0,
        fps: 60,
    }) {
        Commands::Scope { width, fps } => Scope::new(config)
            .viewport(width, cli.height)
            .speed(cli.speed)
            .fps(fps)
            .run(),
        Commands::Dump { duration, json } => {
            let format = if json { DumpFormat::Json } else { DumpFormat::Csv };
            dump(&config, duration, cli.speed, cli.height, format)
        }
    }
}

/// Route `tracing` output. The scope owns the terminal, so it only logs when
/// a file is given; headless commands fall back to stderr.
fn init_logging(level: Level, file: Option<&Path>, headless: bool) -> EyreResult<()> {
    match file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if headless => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}
