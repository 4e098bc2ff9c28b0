use anyhow::Result;
use clap::Args;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct NavArgs {
    /// User whose net asset value to show
    pub user: String,
}

pub struct NavCommand {
    args: NavArgs,
}

impl NavCommand {
    pub fn new(args: NavArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        let nav = ledger.get_nav(&self.args.user).await?;
        println!("{nav}");
        Ok(())
    }
}
