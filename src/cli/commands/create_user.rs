use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use crate::gateway::Ledger;

#[derive(Args, Clone)]
pub struct CreateUserArgs {
    /// User name to register
    pub user: String,
}

pub struct CreateUserCommand {
    args: CreateUserArgs,
}

impl CreateUserCommand {
    pub fn new(args: CreateUserArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, ledger: &Ledger) -> Result<()> {
        ledger.create_user(&self.args.user).await?;
        println!("{} registered user {}", "✓".green(), self.args.user.bold());
        Ok(())
    }
}
