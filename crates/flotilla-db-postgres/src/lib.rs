//! PostgreSQL storage backend for the Flotilla back-office.
//!
//! Implements every repository trait from `flotilla-storage` over a single
//! connection pool. Migrations are embedded in the binary and run on
//! startup when configured.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
mod queries;
mod storage;

pub use config::PostgresConfig;
pub use error::PostgresError;
pub use storage::PostgresStorage;
