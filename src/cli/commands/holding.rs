use anyhow::Result;
use clap::Args;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct HoldingArgs {
    /// User whose holding to show
    pub user: String,

    /// Asset id of the holding
    pub asset_id: u32,
}

pub struct HoldingCommand {
    args: HoldingArgs,
}

impl HoldingCommand {
    pub fn new(args: HoldingArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        let detail = ledger
            .get_holding(&self.args.user, self.args.asset_id)
            .await?;

        println!("{}", detail.name);
        println!("  quantity:     {}", detail.quantity);
        println!("  market value: {}", detail.market_value);
        Ok(())
    }
}
