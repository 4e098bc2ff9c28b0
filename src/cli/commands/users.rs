use anyhow::Result;
use clap::Args;
use comfy_table::Table;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct UsersArgs {}

pub struct UsersCommand {
    #[allow(dead_code)]
    args: UsersArgs,
}

impl UsersCommand {
    pub fn new(args: UsersArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        let summaries = ledger.list_users().await?;

        if summaries.is_empty() {
            println!("No users registered");
            return Ok(());
        }

        let mut table = Table::new();
        table.set_header(vec!["User", "Holdings", "NAV"]);
        for summary in &summaries {
            table.add_row(vec![
                summary.user.clone(),
                summary.holding_count.to_string(),
                summary.nav.to_string(),
            ]);
        }
        println!("{table}");
        Ok(())
    }
}
