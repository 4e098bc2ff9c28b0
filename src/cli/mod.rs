//! CLI module for folio
//!
//! Command-line front end for the portfolio ledger. Uses clap for argument
//! parsing and one command struct per subcommand; every command executes
//! against a [`Ledger`] built over the configured key-value store.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

pub mod commands;

use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::gateway::Ledger;
use crate::logging::{init_logging, LoggingConfig};
use crate::store::memory::MemoryStore;
use crate::store::rocks::RocksStore;
use crate::store::KvStore;

use commands::add::{AddArgs, AddCommand};
use commands::buy::{BuyArgs, BuyCommand};
use commands::create_user::{CreateUserArgs, CreateUserCommand};
use commands::delete_user::{DeleteUserArgs, DeleteUserCommand};
use commands::holding::{HoldingArgs, HoldingCommand};
use commands::holdings::{HoldingsArgs, HoldingsCommand};
use commands::init::{InitArgs, InitCommand};
use commands::nav::{NavArgs, NavCommand};
use commands::remove::{RemoveArgs, RemoveCommand};
use commands::sell::{SellArgs, SellCommand};
use commands::users::{UsersArgs, UsersCommand};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Portfolio ledger over a key-value store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Use a volatile in-memory store instead of RocksDB
    #[arg(long, global = true)]
    pub memory: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed the asset catalog
    Init(InitArgs),

    /// List registered users with holding counts and NAV
    Users(UsersArgs),

    /// Register a new user with an empty portfolio
    CreateUser(CreateUserArgs),

    /// Delete a user and their portfolio
    DeleteUser(DeleteUserArgs),

    /// List the holdings of a user
    Holdings(HoldingsArgs),

    /// Show one holding of a user
    Holding(HoldingArgs),

    /// Show a user's net asset value
    Nav(NavArgs),

    /// Add a new holding to a portfolio (conflicts if already held)
    Add(AddArgs),

    /// Buy more of an already-held asset
    Buy(BuyArgs),

    /// Sell some or all of a held asset
    Sell(SellArgs),

    /// Remove a holding outright
    Remove(RemoveArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);
        data_paths.ensure_directories()?;
        init_logging(LoggingConfig::new(data_paths.clone()))?;

        let store: Arc<dyn KvStore> = if self.memory {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(
                RocksStore::open(data_paths.store())
                    .context("failed to open the key-value store")?,
            )
        };
        store
            .ping()
            .await
            .context("key-value store is unreachable")?;

        let ledger = Ledger::new(store);

        match self.command {
            Commands::Init(args) => InitCommand::new(args).execute(&ledger).await,
            Commands::Users(args) => UsersCommand::new(args).execute(&ledger).await,
            Commands::CreateUser(args) => CreateUserCommand::new(args).execute(&ledger).await,
            Commands::DeleteUser(args) => DeleteUserCommand::new(args).execute(&ledger).await,
            Commands::Holdings(args) => HoldingsCommand::new(args).execute(&ledger).await,
            Commands::Holding(args) => HoldingCommand::new(args).execute(&ledger).await,
            Commands::Nav(args) => NavCommand::new(args).execute(&ledger).await,
            Commands::Add(args) => AddCommand::new(args).execute(&ledger).await,
            Commands::Buy(args) => BuyCommand::new(args).execute(&ledger).await,
            Commands::Sell(args) => SellCommand::new(args).execute(&ledger).await,
            Commands::Remove(args) => RemoveCommand::new(args).execute(&ledger).await,
        }
    }
}
