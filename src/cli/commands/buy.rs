use anyhow::{bail, Result};
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct BuyArgs {
    /// User whose holding to increase
    pub user: String,

    /// Asset id of an already-held asset
    pub asset_id: u32,

    /// Quantity to buy
    pub quantity: Decimal,
}

pub struct BuyCommand {
    args: BuyArgs,
}

impl BuyCommand {
    pub fn new(args: BuyArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        if self.args.quantity <= Decimal::ZERO {
            bail!("buy quantity must be positive, got {}", self.args.quantity);
        }

        ledger
            .adjust_holding(&self.args.user, self.args.asset_id, self.args.quantity)
            .await?;
        println!(
            "{} bought {} of asset {} for {}",
            "✓".green(),
            self.args.quantity,
            self.args.asset_id,
            self.args.user.bold()
        );
        Ok(())
    }
}
