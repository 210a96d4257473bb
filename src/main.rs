use anyhow::{Context, Result};
use clap::Parser;
use midindex::config::{AppConfig, Overrides, RunConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "midindex",
    version,
    about = "Catalog a MIDI library by key signature and write an HTML index"
)]
struct Cli {
    /// Rescan the root directory before writing the report
    #[arg(long)]
    scan: bool,

    /// Directory tree to scan for .mid files
    #[arg(long)]
    rootdir: Option<PathBuf>,

    /// Path of the HTML report to write
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path to the SQLite database
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// URL prefix for file links in the report
    #[arg(long)]
    base_url: Option<String>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = AppConfig::load();

    let run = RunConfig::resolve(
        Overrides {
            scan: cli.scan,
            root_dir: cli.rootdir,
            output: cli.output,
            db_path: cli.db_path,
            base_url: cli.base_url,
        },
        config,
    )
    .context("Invalid configuration")?;
    log::info!("Database: {}", run.db_path.display());

    let db = midindex::db::Database::open(&run.db_path)
        .context("Failed to open database")?;

    if run.scan {
        let result = midindex::scanner::scan(&db, &run.root_dir)
            .context("Scan failed")?;
        println!(
            "Scan complete: {} scanned, {} analyzed, {} errors",
            result.scanned, result.analyzed, result.errors
        );
    }

    let summary = midindex::report::write_report(&db, &run.output, &run.base_url)
        .context("Report failed")?;
    println!(
        "Report written to {}: {} groupings, {} files",
        run.output.display(),
        summary.groupings,
        summary.files_listed
    );

    let stats = db.stats().context("Failed to get stats")?;
    if stats.error_files > 0 {
        println!(
            "{} of {} indexed files failed to parse and are not listed",
            stats.error_files, stats.total_files
        );
    }

    Ok(())
}
