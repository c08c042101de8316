use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use eden_core::{resolve_base_dir, validate, StatusProvider};

/// Eden: inspect the status snapshot served by the dashboard
#[derive(Parser, Debug)]
#[command(name = "eden")]
#[command(about = "Inspect and validate the Eden status snapshot", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved snapshot file path
    Path(LocationArgs),
    /// Print the snapshot the dashboard would serve right now
    Show(ShowArgs),
    /// Parse a snapshot file and report problems
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct LocationArgs {
    /// Directory containing status.json (defaults to ~/clawd)
    #[arg(long, env = "CLAWD_DIR")]
    dir: Option<String>,

    /// Snapshot file to use instead of <dir>/status.json (takes precedence)
    #[arg(long)]
    file: Option<PathBuf>,
}

impl LocationArgs {
    fn provider(&self) -> StatusProvider {
        let provider = match &self.file {
            Some(file) => StatusProvider::new(file),
            None => StatusProvider::from_base_dir(resolve_base_dir(
                self.dir.clone(),
                dirs::home_dir(),
            )),
        };
        debug!("Using snapshot file {}", provider.path().display());
        provider
    }
}

#[derive(Parser, Debug)]
struct ShowArgs {
    #[command(flatten)]
    location: LocationArgs,

    /// Print on a single line
    #[arg(long)]
    compact: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    location: LocationArgs,

    /// Fail when advisory issues are found, not only on parse errors
    #[arg(long)]
    strict: bool,
}

fn run_path(args: LocationArgs) -> Result<()> {
    println!("{}", args.provider().path().display());
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let snapshot = args.location.provider().snapshot();
    let rendered = if args.compact {
        serde_json::to_string(&snapshot)
    } else {
        serde_json::to_string_pretty(&snapshot)
    }
    .context("Failed to serialize snapshot")?;
    println!("{}", rendered);
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let provider = args.location.provider();
    let snapshot = provider
        .load()
        .with_context(|| format!("{} is not a usable snapshot", provider.path().display()))?;

    let issues = validate(&snapshot);
    println!(
        "{}: {} PRs, {} tasks",
        provider.path().display(),
        snapshot.prs.len(),
        snapshot.tasks.len()
    );
    for issue in &issues {
        warn!("{}: {}", provider.path().display(), issue);
        println!("  warning: {}", issue);
    }

    if issues.is_empty() {
        println!("OK");
        Ok(())
    } else if args.strict {
        Err(anyhow!("{} issue(s) found", issues.len()))
    } else {
        println!("{} warning(s)", issues.len());
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Path(args) => run_path(args),
        Commands::Show(args) => run_show(args),
        Commands::Check(args) => run_check(args),
    }
}
