use anyhow::{bail, Result};
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct SellArgs {
    /// User whose holding to decrease
    pub user: String,

    /// Asset id of an already-held asset
    pub asset_id: u32,

    /// Quantity to sell; selling down to exactly zero removes the holding
    pub quantity: Decimal,
}

pub struct SellCommand {
    args: SellArgs,
}

impl SellCommand {
    pub fn new(args: SellArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        if self.args.quantity <= Decimal::ZERO {
            bail!("sell quantity must be positive, got {}", self.args.quantity);
        }

        ledger
            .adjust_holding(&self.args.user, self.args.asset_id, -self.args.quantity)
            .await?;
        println!(
            "{} sold {} of asset {} for {}",
            "✓".green(),
            self.args.quantity,
            self.args.asset_id,
            self.args.user.bold()
        );
        Ok(())
    }
}
