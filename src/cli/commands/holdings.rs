use anyhow::Result;
use clap::Args;
use comfy_table::Table;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct HoldingsArgs {
    /// User whose holdings to list
    pub user: String,
}

pub struct HoldingsCommand {
    args: HoldingsArgs,
}

impl HoldingsCommand {
    pub fn new(args: HoldingsArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        let holdings = ledger.list_holdings(&self.args.user).await?;

        if holdings.is_empty() {
            println!("{} holds no assets", self.args.user);
            return Ok(());
        }

        let mut table = Table::new();
        table.set_header(vec!["Asset ID", "Name"]);
        for holding in &holdings {
            table.add_row(vec![holding.asset_id.to_string(), holding.name.clone()]);
        }
        println!("{table}");
        Ok(())
    }
}
