use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod handlers;
mod openapi_tests;
mod router;
mod schemas;
mod serializers;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    model::init_tracing();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
