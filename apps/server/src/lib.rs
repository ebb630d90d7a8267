pub mod config;
pub mod error;
pub mod routes;
pub mod template;

use std::path::Path;
use std::sync::Arc;

use axum::{handler::HandlerWithoutStateExt, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::template::{PageContext, Template};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The game page, rendered once at startup.
    pub index_html: Arc<str>,
}

impl AppState {
    pub fn new(index_html: impl Into<Arc<str>>) -> Self {
        Self {
            index_html: index_html.into(),
        }
    }
}

/// Render the page template named by `config`.
pub fn render_index(config: &ServerConfig) -> error::Result<String> {
    let template = Template::load(&config.index_template())?;
    template.render(&PageContext::for_page(config))
}

/// `/` serves the rendered page; every other path comes from `static_dir`.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let static_files = ServeDir::new(static_dir).not_found_service(routes::not_found.into_service());

    Router::new()
        .route("/", get(routes::index))
        .fallback_service(static_files)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;

    tracing::info!("Rendering {}...", config.index_template().display());
    let state = AppState::new(render_index(&config)?);

    let app = build_router(state, &config.static_dir);

    let addr = config.addr();
    tracing::info!(
        "🎮 Memory Game server running at http://localhost:{} (static root {})",
        config.port,
        config.static_dir.display()
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
