pub mod chart;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use secrecy::ExposeSecret;
use tower_http::trace::TraceLayer;

use chart::FinanceEngine;
use config::Config;
use services::Database;

#[derive(Clone)]
pub struct AppState {
    pub engine: FinanceEngine,
    /// Present when the service runs against a real database; the health
    /// endpoint probes it. Absent under test, where collaborators are
    /// in-memory.
    pub db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(engine: FinanceEngine) -> Self {
        Self { engine, db: None }
    }

    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.db = Some(db);
        self
    }
}

/// Build the service router. Exposed separately so tests can mount the
/// engine on in-memory collaborators.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/finance/chart", get(handlers::finance::monthly_chart))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .with_state(state)
}

pub struct Application {
    port: u16,
    router: Router,
}

impl Application {
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        db.run_migrations().await?;

        services::init_metrics();

        let db = Arc::new(db);
        let engine = FinanceEngine::new(db.clone(), db.clone());
        let router = build_router(AppState::new(engine).with_database(db));

        Ok(Self {
            port: config.server.port,
            router,
        })
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!("Listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
