//! State Migrate
//!
//! Applies pending migrations to a persisted state document.

use anyhow::{Context, Result};
use clap::Parser;
use state_migrations::{MigrationRunner, MigratorConfig, VersionedState};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "state-migrate")]
#[command(about = "Apply pending migrations to a persisted state document")]
struct Args {
    /// State document to migrate
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the migrated document (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Migrator configuration file
    #[arg(short, long, env = "STATE_MIGRATE_CONFIG")]
    config: Option<PathBuf>,

    /// Stop after this migration version
    #[arg(long)]
    target_version: Option<u64>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Also write the applied migration records as JSON
    #[arg(long)]
    records: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("state_migrations=info".parse()?)
                .add_directive("state_migrate=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MigratorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MigratorConfig::default(),
    };

    let file = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let state = VersionedState::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", args.input.display()))?;

    info!("Migrating {}", args.input.display());
    info!("  Current version: {}", state.version());

    info!(
        "  Known chain ids: {}",
        config.networks.chain_ids().collect::<Vec<_>>().join(", ")
    );

    let runner = MigrationRunner::builtin(Arc::new(config.networks));
    let target = args.target_version.or(config.target_version);
    let outcome = runner
        .run_pending(&state, target)
        .context("migration failed, nothing written")?;

    for record in &outcome.applied {
        info!(
            version = record.version,
            checksum = %record.checksum,
            "Applied {}",
            record.name
        );
    }

    let pretty = config.pretty && !args.compact;
    let rendered = outcome.state.to_json_string(pretty)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered + "\n")
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote version {} to {}", outcome.state.version(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", rendered)?;
        }
    }

    if let Some(path) = &args.records {
        let records = serde_json::to_string_pretty(&outcome.applied)?;
        std::fs::write(path, records + "\n")
            .with_context(|| format!("writing records {}", path.display()))?;
    }

    Ok(())
}
