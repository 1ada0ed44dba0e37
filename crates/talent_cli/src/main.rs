//! `talent` command line entry point.
//!
//! # Responsibility
//! - Open the candidate store described by config, env and flags.
//! - Map each subcommand onto one repository operation.
//! - Print results as pretty JSON on stdout.

use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use talent_core::{
    filter, init_logging, AnalysisResult, CandidateFilter, CandidateRepository, CandidateStatus,
    RecordStore, SqliteRecordStore, TalentConfig, WriteOutcome,
};

#[derive(Debug, Parser)]
#[command(name = "talent", version, about = "Candidate pipeline store")]
struct Cli {
    /// SQLite database file; overrides config and `TALENT_DB_PATH`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON config file; `TALENT_*` environment variables override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List candidates, optionally filtered
    List(ListArgs),
    /// Show one candidate
    Show { id: String },
    /// Create or update a candidate from an analysis result file
    Ingest { analysis: PathBuf },
    /// Set a candidate's workflow status
    Status { id: String, status: CandidateStatus },
    /// Delete a candidate
    Delete { id: String },
    /// Compare two candidates metric by metric
    Compare { id1: String, id2: String },
    /// Print the core library version
    Version,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive substring of name or GitHub username
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, default_value = "all")]
    status: String,

    #[arg(long, default_value = "all")]
    position: String,

    /// Score band: all, high, medium or low
    #[arg(long, default_value = "all")]
    score: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Command::Version = cli.command {
        println!("{}", talent_core::core_version());
        return Ok(());
    }

    let config = load_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let store = match &config.db_path {
        Some(path) => SqliteRecordStore::open(path)?,
        None => SqliteRecordStore::open_in_memory()?,
    };
    let repo = CandidateRepository::new(store);

    run(&repo, cli.command).await
}

fn load_config(cli: &Cli) -> Result<TalentConfig, Box<dyn Error>> {
    let mut config =
        TalentConfig::resolve(cli.config.as_deref(), |key| std::env::var(key).ok())?;
    if let Some(db) = &cli.db {
        config.db_path = Some(db.clone());
    }
    config.validate()?;
    Ok(config)
}

async fn run<S: RecordStore>(
    repo: &CandidateRepository<S>,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List(args) => {
            let criteria = CandidateFilter::from_params(
                &args.search,
                &args.status,
                &args.position,
                &args.score,
            );
            let candidates = repo.list().await;
            print_json(&filter(&candidates, &criteria))
        }
        Command::Show { id } => match repo.get_by_id(&id).await {
            Some(candidate) => print_json(&candidate),
            None => Err(format!("candidate `{id}` not found").into()),
        },
        Command::Ingest { analysis } => {
            let raw = std::fs::read_to_string(&analysis)?;
            let analysis: AnalysisResult = serde_json::from_str(&raw)?;
            info!(
                "event=cli_ingest module=cli status=start username={}",
                analysis.profile.github_username
            );
            let candidate = report(repo.upsert_from_analysis(analysis).await);
            print_json(&candidate)
        }
        Command::Status { id, status } => match report(repo.update_status(&id, status).await) {
            Some(candidate) => print_json(&candidate),
            None => Err(format!("candidate `{id}` not found").into()),
        },
        Command::Delete { id } => {
            let deleted = report(repo.delete(&id).await);
            print_json(&serde_json::json!({ "id": id, "deleted": deleted }))
        }
        Command::Compare { id1, id2 } => {
            // Comparison reads the cache only; fill it from the store first.
            repo.list().await;
            match repo.compare(&id1, &id2) {
                Some(comparison) => print_json(&comparison),
                None => Err(format!("candidates `{id1}` and `{id2}` are not both known").into()),
            }
        }
        Command::Version => {
            println!("{}", talent_core::core_version());
            Ok(())
        }
    }
}

/// Unwraps a write outcome, noting a degraded store write on stderr.
fn report<T>(outcome: WriteOutcome<T>) -> T {
    if let Some(cause) = outcome.cause() {
        eprintln!("warning: store write failed, result kept in cache only: {cause}");
    }
    outcome.into_value()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
