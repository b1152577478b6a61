use anyhow::{Context, Result, bail};
use serde::Deserialize;

use flotilla_db_postgres::PostgresConfig;
use flotilla_siigo::SiigoConfig;

/// Subset of the server config file the CLI needs for a direct import.
#[derive(Debug, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub storage: StorageSection,
    pub siigo: Option<SiigoConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageSection {
    #[serde(default)]
    pub postgres: PostgresConfig,
}

/// `--config` beats `FLOTILLA_CONFIG` beats `flotilla.toml`.
pub fn resolve_path(flag: &Option<String>) -> String {
    flag.clone()
        .or_else(|| std::env::var("FLOTILLA_CONFIG").ok())
        .unwrap_or_else(|| "flotilla.toml".to_string())
}

pub fn load_import_config(path: &str) -> Result<ImportConfig> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    let cfg: ImportConfig =
        toml::from_str(&raw).with_context(|| format!("Failed to parse config: {path}"))?;
    if let Some(siigo) = &cfg.siigo {
        if let Err(e) = siigo.validate() {
            bail!("Invalid [siigo] section in {path}: {e}");
        }
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let cfg: ImportConfig = toml::from_str(
            r#"
            [storage.postgres]
            url = "postgres://localhost/flotilla_test"

            [siigo]
            base_url = "https://api.siigo.test"
            username = "ops@example.com"
            access_key = "k"
            partner_id = "flotilla"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage.postgres.url, "postgres://localhost/flotilla_test");
        assert!(cfg.siigo.is_some());
    }

    #[test]
    fn siigo_section_is_optional() {
        let cfg: ImportConfig = toml::from_str("").unwrap();
        assert!(cfg.siigo.is_none());
    }
}
