use anyhow::Result;
use clap::Parser;

use fee_compare::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.execute().await
}
