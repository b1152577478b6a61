use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get, routing::post};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use flotilla_db_postgres::PostgresStorage;
use flotilla_notifications::{EmailRecipient, EmailSender, NotificationService};
use flotilla_siigo::SiigoClient;

use crate::{
    config::AppConfig, handlers, middleware as app_middleware, state::AppState,
};

pub struct FlotillaServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(cfg: &AppConfig, state: AppState) -> Router {
    let router = Router::new()
        // Health and info endpoints
        .route("/", get(handlers::system::root))
        .route("/healthz", get(handlers::system::healthz))
        .route("/readyz", get(handlers::system::readyz))
        // Fleet
        .route(
            "/api/vehicles",
            get(handlers::vehicles::list).post(handlers::vehicles::create),
        )
        .route(
            "/api/vehicles/{id}",
            get(handlers::vehicles::get)
                .put(handlers::vehicles::update)
                .delete(handlers::vehicles::delete),
        )
        .route(
            "/api/drivers",
            get(handlers::drivers::list).post(handlers::drivers::create),
        )
        .route(
            "/api/drivers/{id}",
            get(handlers::drivers::get)
                .put(handlers::drivers::update)
                .delete(handlers::drivers::delete),
        )
        // Catalog
        .route(
            "/api/materials",
            get(handlers::materials::list).post(handlers::materials::create),
        )
        .route(
            "/api/materials/{id}",
            get(handlers::materials::get)
                .put(handlers::materials::update)
                .delete(handlers::materials::delete),
        )
        .route(
            "/api/materials/{id}/prices",
            get(handlers::materials::list_prices).post(handlers::materials::add_price),
        )
        .route(
            "/api/materials/{id}/prices/{price_id}",
            axum::routing::delete(handlers::materials::deactivate_price),
        )
        .route(
            "/api/projects",
            get(handlers::projects::list).post(handlers::projects::create),
        )
        .route(
            "/api/projects/{id}",
            get(handlers::projects::get)
                .put(handlers::projects::update)
                .delete(handlers::projects::delete),
        )
        // Operations
        .route(
            "/api/trips",
            get(handlers::trips::list).post(handlers::trips::create),
        )
        .route(
            "/api/trips/{id}",
            get(handlers::trips::get)
                .put(handlers::trips::update)
                .delete(handlers::trips::delete),
        )
        .route(
            "/api/fuel-purchases",
            get(handlers::fuel::list).post(handlers::fuel::create),
        )
        .route(
            "/api/fuel-purchases/{id}",
            get(handlers::fuel::get).delete(handlers::fuel::delete),
        )
        .route(
            "/api/inspections",
            get(handlers::inspections::list).post(handlers::inspections::create),
        )
        .route("/api/inspections/{id}", get(handlers::inspections::get))
        // Accounting
        .route(
            "/api/payables",
            get(handlers::payables::list).post(handlers::payables::upsert),
        )
        .route("/api/payables/{id}", get(handlers::payables::get))
        .route("/api/siigo/import", post(handlers::imports::start))
        .route("/api/siigo/import/{id}", get(handlers::imports::get))
        .with_state(state);
    apply_middleware(router, cfg)
}

// Middleware stack (order: request id -> compression/cors/trace -> timeout -> body limit).
// Split out from `build_app` so the stack can be exercised without a database.
fn apply_middleware(router: Router, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    router
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %method,
                        http.target = %uri,
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(TimeoutLayer::new(cfg.request_timeout()))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    #[must_use]
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    #[must_use]
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    #[must_use]
    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Connects to storage, wires the optional Siigo and email pieces,
    /// and builds the router.
    ///
    /// # Errors
    ///
    /// Fails when the database is unreachable or the Siigo client cannot
    /// be constructed from the configuration.
    pub async fn build(self) -> anyhow::Result<FlotillaServer> {
        let storage = PostgresStorage::new(self.config.storage.postgres.clone()).await?;
        let mut state = AppState::new(storage);

        if let Some(siigo_cfg) = self.config.siigo.clone() {
            state = state.with_siigo(Arc::new(SiigoClient::new(siigo_cfg)?));
        }

        if let Some(email_cfg) = self.config.email.clone()
            && let Some(recipient) = email_cfg.import_summary_recipient.clone()
        {
            let sender = match (email_cfg.smtp, email_cfg.sendgrid) {
                (Some(smtp), _) => EmailSender::smtp(smtp),
                (None, Some(sendgrid)) => EmailSender::sendgrid(sendgrid),
                (None, None) => anyhow::bail!("email configured without a transport"),
            };
            state = state.with_notifier(
                Arc::new(NotificationService::new(sender)),
                EmailRecipient::new(recipient),
            );
        }

        let app = build_app(&self.config, state);
        Ok(FlotillaServer {
            addr: self.addr,
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlotillaServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn slow_requests_are_cut_off_at_the_configured_timeout() {
        let mut cfg = AppConfig::default();
        cfg.server.request_timeout_ms = 50;

        let slow = apply_middleware(
            Router::new().route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }),
            ),
            &cfg,
        );
        let res = slow
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);

        let fast = apply_middleware(Router::new().route("/fast", get(|| async {})), &cfg);
        let res = fast
            .oneshot(Request::get("/fast").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
