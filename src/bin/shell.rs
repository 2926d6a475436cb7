//! keytable Shell Binary
//!
//! Runs a command script against an in-memory table.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use keytable::shell::Session;
use keytable::{Shape, TableConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// keytable Shell
#[derive(Parser, Debug)]
#[command(name = "keytable-shell")]
#[command(about = "Run table commands against an in-memory keyed record table")]
#[command(version)]
struct Args {
    /// Table name
    #[arg(short, long, default_value = "records")]
    table: String,

    /// Field list, e.g. `id:int,name:text,active:bool`
    #[arg(short, long)]
    fields: String,

    /// Iterate in primary-key order instead of random order
    #[arg(short, long)]
    ordered: bool,

    /// Seed for the random iteration order
    #[arg(short, long)]
    seed: Option<u64>,

    /// Script file (reads stdin when omitted)
    script: Option<PathBuf>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,keytable=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("keytable shell v{}", keytable::VERSION);

    let shape = match Shape::parse(&args.fields) {
        Ok(shape) => shape,
        Err(e) => {
            tracing::error!("Invalid field list: {}", e);
            std::process::exit(2);
        }
    };

    let mut config = TableConfig::builder().name(&args.table);
    if let Some(seed) = args.seed {
        config = config.random_seed(seed);
    }
    let config = config.build();

    let mut session = Session::from_config(&config, shape, args.ordered);
    let stdout = io::stdout();

    let result = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => session.run(BufReader::new(file), stdout.lock()),
            Err(e) => {
                tracing::error!("Failed to open {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => session.run(io::stdin().lock(), stdout.lock()),
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "script finished"
            );
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Shell error: {}", e);
            std::process::exit(1);
        }
    }
}
