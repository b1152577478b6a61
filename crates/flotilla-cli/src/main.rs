mod cli;
mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use client::ApiClient;
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Import(args) => {
            if args.via_server {
                let client = ApiClient::new(&cli.server);
                commands::import::run_via_server(&client).await?;
            } else {
                commands::import::run(args).await?;
            }
        }
        Commands::ImportStatus(args) => {
            let client = ApiClient::new(&cli.server);
            commands::status::show(&client, &args.id, format).await?;
        }
        Commands::Health => {
            let client = ApiClient::new(&cli.server);
            commands::health::check(&client, &cli.server).await?;
        }
    }

    Ok(())
}
