use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::info;

use crate::catalog::{default_assets, AssetType};
use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct InitArgs {
    /// JSON file with catalog entries; defaults to the built-in reference assets
    #[arg(long)]
    pub seed_file: Option<PathBuf>,
}

pub struct InitCommand {
    args: InitArgs,
}

impl InitCommand {
    pub fn new(args: InitArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        let entries: Vec<AssetType> = match &self.args.seed_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read seed file {}", path.display()))?;
                serde_json::from_str(&raw).context("seed file is not a valid catalog listing")?
            }
            None => default_assets(),
        };

        info!(count = entries.len(), "seeding asset catalog");
        ledger.catalog().seed(&entries).await?;

        println!("{} seeded {} catalog entries", "✓".green(), entries.len());
        for entry in &entries {
            println!(
                "  {:>3}  {} ({}) @ {}",
                entry.id, entry.name, entry.asset_class, entry.unit_price
            );
        }
        Ok(())
    }
}
