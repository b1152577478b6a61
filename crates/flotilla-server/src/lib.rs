//! HTTP API server for the Flotilla back-office.
//!
//! Routes live under `/api`; `/healthz` and `/readyz` serve liveness and
//! readiness probes. See [`server::build_app`] for the full router.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use error::ApiError;
pub use server::{FlotillaServer, ServerBuilder, build_app};
pub use state::AppState;
