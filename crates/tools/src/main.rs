use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dataset::Dataset;
use selection::{SelectionConfig, SelectionSynchronizer};
use tools::render::render_regions;
use tools::script::parse_script;
use tools::session::run_session;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Car park vacancy viewer")]
struct Args {
    /// JSON array of vacancy records (defaults to the built-in sample)
    #[arg(long, global = true, env = "CARPARK_DATA")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List regions and their car parks
    Regions,

    /// Replay a script of region/location/click events
    Session {
        /// Map click hit radius in degrees (else CARPARK_CLICK_THRESHOLD, else 0.01)
        #[arg(long)]
        threshold: Option<f64>,

        /// Print every selection-changed notification as JSON
        #[arg(long)]
        events: bool,

        /// Script file, one event per line
        script: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let dataset = match &args.data {
        Some(path) => {
            info!("loading dataset from {}", path.display());
            Dataset::load_json(path)?
        }
        None => Dataset::sample(),
    };

    match args.command {
        Command::Regions => {
            print!("{}", render_regions(&dataset));
            Ok(())
        }
        Command::Session {
            threshold,
            events,
            script,
        } => {
            let config = match threshold {
                Some(t) => SelectionConfig::new(t)?,
                None => SelectionConfig::from_env()?,
            };
            let source = fs::read_to_string(&script)
                .map_err(|e| format!("read {}: {e}", script.display()))?;
            let steps = parse_script(&source)?;
            let sync = SelectionSynchronizer::new(Arc::new(dataset), config)?;
            let stdout = io::stdout();
            run_session(&sync, &steps, events, &mut stdout.lock())
        }
    }
}
