use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct DeleteUserArgs {
    /// User name to delete
    pub user: String,
}

pub struct DeleteUserCommand {
    args: DeleteUserArgs,
}

impl DeleteUserCommand {
    pub fn new(args: DeleteUserArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        ledger.delete_user(&self.args.user).await?;
        println!("{} deleted user {}", "✓".green(), self.args.user.bold());
        Ok(())
    }
}
