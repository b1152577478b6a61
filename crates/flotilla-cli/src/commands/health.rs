use anyhow::Result;
use colored::Colorize;

use crate::client::ApiClient;

pub async fn check(client: &ApiClient, server: &str) -> Result<()> {
    let (code, body) = client.health().await?;
    if code == 200 {
        println!("{} {} is {}", "✓".green(), server.cyan(), "healthy".green());
        if !body.is_empty() {
            println!("  {body}");
        }
    } else {
        println!(
            "{} {} returned {} {}",
            "✗".red(),
            server.cyan(),
            code.to_string().red(),
            body
        );
    }

    let (code, body) = client.ready().await?;
    if code == 200 {
        println!("{} storage is {}", "✓".green(), "ready".green());
    } else {
        println!(
            "{} readiness check returned {} {}",
            "✗".red(),
            code.to_string().red(),
            body
        );
    }
    Ok(())
}
