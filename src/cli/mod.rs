use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::application::WalletService;
use crate::http::{self, AppState};

/// Wallet balance service
#[derive(Parser)]
#[command(name = "wallet-balance")]
#[command(about = "Serve and administer a concurrency-safe wallet balance store")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "WALLET_DATABASE", default_value = "wallet.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Run the HTTP service
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "WALLET_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },

    /// Wallet provisioning commands
    #[command(subcommand)]
    Wallet(WalletCommands),

    /// Show the balance of a wallet
    Balance {
        /// Wallet ID (UUID)
        wallet_id: String,
    },
}

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Create a new wallet and print its ID
    Create {
        /// Opening balance (e.g., "100.00")
        #[arg(short, long, default_value = "0")]
        balance: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                WalletService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Serve { bind } => {
                // Serving implies a usable schema, so create it if needed.
                let service = WalletService::init(&self.database).await?;
                tracing::info!(database = %self.database, "database ready");
                http::serve(bind, AppState::new(service)).await?;
            }

            Commands::Wallet(WalletCommands::Create { balance }) => {
                let service = WalletService::connect(&self.database).await?;
                let balance = Decimal::from_str(&balance)
                    .with_context(|| format!("Invalid balance '{}'. Use '100.00' or '100'", balance))?;

                let wallet = service.create_wallet(balance).await?;
                println!("Created wallet: {} (balance {})", wallet.id, wallet.balance);
            }

            Commands::Balance { wallet_id } => {
                let service = WalletService::connect(&self.database).await?;
                let response = service.get_balance(&wallet_id).await;

                match (response.result, response.error) {
                    (Some(balance), _) => println!("{}: {}", wallet_id, balance),
                    (None, Some(error)) => anyhow::bail!(error),
                    (None, None) => anyhow::bail!("No balance returned for {}", wallet_id),
                }
            }
        }

        Ok(())
    }
}
