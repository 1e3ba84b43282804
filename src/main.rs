//! Update Packager - Main entry point
//!
//! Builds full or incremental update packages from directory trees.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use update_packager::archive::builder;
use update_packager::config::Config;
use update_packager::diff::diff;
use update_packager::exclude::ExcludePolicy;
use update_packager::scanner::scan;
use update_packager::utils;
use update_packager::{PackagerError, Result};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a full snapshot package from one tree
    Full {
        source_dir: PathBuf,
        output_file: PathBuf,

        /// Version label recorded in the manifest (defaults to the
        /// source directory name)
        #[arg(long)]
        label: Option<String>,
    },

    /// Build an incremental package from an old and a new tree
    Incremental {
        old_dir: PathBuf,
        new_dir: PathBuf,
        output_file: PathBuf,

        /// Old version label (defaults to the old directory name)
        #[arg(long)]
        old_label: Option<String>,

        /// New version label (defaults to the new directory name)
        #[arg(long)]
        new_label: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    if let Err(e) = utils::logger::init(log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting update-packager v{}", env!("CARGO_PKG_VERSION"));

    // Cooperative cancellation on Ctrl-C, checked between files and entries
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            signal_cancel.cancel();
        }
    });

    if let Err(e) = run(args.command, &config, cancel).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, config: &Config, cancel: CancellationToken) -> Result<()> {
    let policy = ExcludePolicy::from_config(&config.exclude);
    let workers = config.scan.hash_workers;

    match command {
        Command::Full {
            source_dir,
            output_file,
            label,
        } => {
            require_dir(&source_dir, "source directory")?;

            let outcome = scan(&source_dir, &policy, workers, &cancel).await?;
            let version = label.unwrap_or_else(|| dir_label(&source_dir));

            let build_cancel = cancel.clone();
            tokio::task::spawn_blocking(move || {
                builder::build_full(&source_dir, &outcome, &version, &output_file, &build_cancel)
            })
            .await
            .map_err(|e| PackagerError::Build(format!("build task panicked: {e}")))??;
        }

        Command::Incremental {
            old_dir,
            new_dir,
            output_file,
            old_label,
            new_label,
        } => {
            require_dir(&old_dir, "old directory")?;
            require_dir(&new_dir, "new directory")?;

            // The two scans are independent read-only passes
            let (old_scan, new_scan) = tokio::try_join!(
                scan(&old_dir, &policy, workers, &cancel),
                scan(&new_dir, &policy, workers, &cancel),
            )?;

            let changes = diff(&old_scan.inventory, &new_scan.inventory);
            info!(
                "Diff: {} added, {} modified, {} deleted",
                changes.added.len(),
                changes.modified.len(),
                changes.deleted.len()
            );

            let old_version = old_label.unwrap_or_else(|| dir_label(&old_dir));
            let new_version = new_label.unwrap_or_else(|| dir_label(&new_dir));

            let build_cancel = cancel.clone();
            tokio::task::spawn_blocking(move || {
                builder::build_incremental(
                    &new_dir,
                    &changes,
                    &old_version,
                    &new_version,
                    &output_file,
                    &build_cancel,
                )
            })
            .await
            .map_err(|e| PackagerError::Build(format!("build task panicked: {e}")))??;
        }
    }

    Ok(())
}

fn require_dir(path: &Path, what: &str) -> Result<()> {
    if !path.is_dir() {
        return Err(PackagerError::Validation(format!(
            "{} does not exist or is not a directory: {}",
            what,
            path.display()
        )));
    }
    Ok(())
}

fn dir_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
