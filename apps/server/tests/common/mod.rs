//! Common test utilities for integration tests.
//!
//! Builds the router against this crate's own `views/` and `public/`
//! directories, so no environment setup is required.

use std::path::PathBuf;

use axum::Router;

use poke_memory_server::config::ServerConfig;
use poke_memory_server::{build_router, render_index, AppState};

/// Test context holding the configuration and the router under test.
pub struct TestContext {
    pub config: ServerConfig,
    app: Router,
}

impl TestContext {
    /// Create a context with default settings.
    pub fn new() -> Self {
        Self::with_title(None)
    }

    /// Create a context with a custom page title.
    pub fn with_title(title: Option<&str>) -> Self {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let mut config = ServerConfig {
            static_dir: root.join("public"),
            views_dir: root.join("views"),
            ..ServerConfig::default()
        };
        if let Some(title) = title {
            config.page_title = title.to_string();
        }

        let html = render_index(&config).expect("Failed to render index template");
        let app = build_router(AppState::new(html), &config.static_dir);

        Self { config, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}
