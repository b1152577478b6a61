//! Embedded schema migrations.
//!
//! The SQL ships inside the binary via `include_str!` so deployments are
//! a single artifact; applied versions are tracked in `_sqlx_migrations`.

use std::borrow::Cow;

use sqlx_core::migrate::{Migration, MigrationType, Migrator};
use sqlx_postgres::PgPool;
use tracing::info;

use crate::error::{PostgresError, Result};

// (version, description, sql). Append new migrations at the end,
// versions strictly increasing.
macro_rules! embedded_migrations {
    () => {
        &[(
            20260115000001i64,
            "consolidated_schema",
            include_str!("../../migrations/20260115000001_consolidated_schema.sql"),
        )]
    };
}

fn embedded() -> Vec<Migration> {
    embedded_migrations!()
        .iter()
        .map(|(version, description, sql)| Migration {
            version: *version,
            description: Cow::Borrowed(description),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]),
            no_tx: false,
        })
        .collect()
}

/// Applies any migrations the database has not seen yet.
///
/// Safe to call on every startup; already-applied versions are skipped.
pub async fn run(pool: &PgPool) -> Result<()> {
    let migrations = embedded();
    info!(count = migrations.len(), "applying embedded migrations");

    let migrator = Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| PostgresError::Migration(e.to_string()))?;

    info!("schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_strictly_increasing() {
        let versions: Vec<i64> = embedded().iter().map(|m| m.version).collect();
        assert!(!versions.is_empty());
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
