use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct AddArgs {
    /// User whose portfolio to add to
    pub user: String,

    /// Asset id from the catalog
    pub asset_id: u32,

    /// Quantity to hold (must be strictly positive)
    pub quantity: Decimal,
}

pub struct AddCommand {
    args: AddArgs,
}

impl AddCommand {
    pub fn new(args: AddArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        ledger
            .create_holding(&self.args.user, self.args.asset_id, self.args.quantity)
            .await?;
        println!(
            "{} {} now holds {} of asset {}",
            "✓".green(),
            self.args.user.bold(),
            self.args.quantity,
            self.args.asset_id
        );
        Ok(())
    }
}
