use anyhow::Result;
use clap::Parser;
use wallet_balance::cli::Cli;
use wallet_balance::logging::init_logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    cli.run().await
}
