use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct RemoveArgs {
    /// User whose holding to remove
    pub user: String,

    /// Asset id to drop from the portfolio
    pub asset_id: u32,
}

pub struct RemoveCommand {
    args: RemoveArgs,
}

impl RemoveCommand {
    pub fn new(args: RemoveArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        ledger
            .delete_holding(&self.args.user, self.args.asset_id)
            .await?;
        println!(
            "{} removed asset {} from {}",
            "✓".green(),
            self.args.asset_id,
            self.args.user.bold()
        );
        Ok(())
    }
}
