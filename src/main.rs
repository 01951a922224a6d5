mod changelist;
mod cli;
mod config;
mod constants;
mod error;
mod git;
mod notify;
mod renamer;
mod ui;
mod workflow;

use crate::cli::Cli;
use crate::config::Config;
use anyhow::{Context, Result};

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // settings: an explicit env file must exist, ./.env is optional
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
        }
        None => {
            if let Err(e) = dotenvy::dotenv()
                && !e.not_found()
            {
                return Err(e).context("failed to load .env");
            }
        }
    }
    let config = Config::from_env()?;
    let transport = notify::smtp_transport(&config)?;

    match workflow::run(&config, &cli.change_list, &transport) {
        Ok(mapping) => {
            status!(
                "revision complete, commit pushed, and summary emailed ({} renamed)",
                mapping.len()
            );
            Ok(())
        }
        Err(aborted) => {
            if !aborted.renamed.is_empty() {
                warning!("renamed on disk before the failure (not rolled back):");
                for entry in &aborted.renamed {
                    info!("{} → {}", entry.original_file, entry.new_file);
                }
            }
            let class = aborted.source.class();
            Err(anyhow::Error::new(aborted).context(format!("{class} error")))
        }
    }
}
