use std::sync::Arc;

use anyhow::{Context, Result, bail};
use colored::Colorize;

use flotilla_core::ImportStatus;
use flotilla_db_postgres::PostgresStorage;
use flotilla_siigo::{PayablesImporter, SiigoClient};

use crate::cli::ImportArgs;
use crate::client::ApiClient;
use crate::config;
use crate::output::{print_error, print_success};

/// Runs the payables import directly against the configured database.
pub async fn run(args: &ImportArgs) -> Result<()> {
    let path = config::resolve_path(&args.config);
    let cfg = config::load_import_config(&path)?;

    let Some(siigo_cfg) = cfg.siigo else {
        bail!("No [siigo] section in {path}; cannot import");
    };

    let storage = PostgresStorage::new(cfg.storage.postgres)
        .await
        .context("Failed to connect to the database")?;
    let client = Arc::new(SiigoClient::new(siigo_cfg).context("Failed to build Siigo client")?);

    println!("Importing payables from Siigo...");
    let summary = PayablesImporter::new(client, storage)
        .run()
        .await
        .context("Import failed")?;

    let line = format!(
        "request {}: {} pages, {} imported, {} failed",
        summary.request_id.to_string().cyan(),
        summary.pages_processed,
        summary.rows_imported,
        summary.rows_failed,
    );
    match summary.status {
        ImportStatus::Success => print_success(&line),
        ImportStatus::Partial => println!("{} {line}", "!".yellow()),
        _ => print_error(&line),
    }
    Ok(())
}

/// Asks the running server to start an import and prints the request id.
pub async fn run_via_server(client: &ApiClient) -> Result<()> {
    let accepted = client.start_import().await?;
    let id = accepted.get("id").and_then(|v| v.as_str()).unwrap_or("?");
    print_success(&format!("Import started: {}", id.cyan()));
    println!("Check progress with: flotilla import-status {id}");
    Ok(())
}
