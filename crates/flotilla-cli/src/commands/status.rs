use anyhow::Result;

use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::output::print_value;

pub async fn show(client: &ApiClient, id: &str, format: OutputFormat) -> Result<()> {
    let request = client.import_status(id).await?;
    print_value(&request, format);
    Ok(())
}
