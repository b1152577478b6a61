use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "flotilla")]
#[command(about = "Flotilla CLI — operate the back-office service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides FLOTILLA_URL env var)
    #[arg(short, long, global = true, env = "FLOTILLA_URL", default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Siigo payables import against the configured database
    Import(ImportArgs),
    /// Show one import request
    ImportStatus(ImportStatusArgs),
    /// Check server health
    Health,
}

#[derive(clap::Args)]
pub struct ImportArgs {
    /// Path to the config file (defaults to FLOTILLA_CONFIG, then flotilla.toml)
    #[arg(short, long)]
    pub config: Option<String>,
    /// Ask the running server to import instead of connecting directly
    #[arg(long)]
    pub via_server: bool,
}

#[derive(clap::Args)]
pub struct ImportStatusArgs {
    /// Import request id
    pub id: String,
}
