//! Server configuration from environment variables.

use std::path::PathBuf;

use crate::error::{AppError, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TITLE: &str = "Poke Memory";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Root served verbatim for every path other than `/`.
    pub static_dir: PathBuf,
    /// Directory holding `index.html`, the page template.
    pub views_dir: PathBuf,
    pub page_title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
            views_dir: PathBuf::from("views"),
            page_title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// Recognised vars: HOST, PORT, STATIC_DIR, VIEWS_DIR, PAGE_TITLE.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| {
                AppError::Config(format!("PORT must be a number between 0 and 65535, got {value:?}"))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            views_dir: lookup("VIEWS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.views_dir),
            page_title: lookup("PAGE_TITLE").unwrap_or(defaults.page_title),
        })
    }

    /// Socket address to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn index_template(&self) -> PathBuf {
        self.views_dir.join("index.html")
    }

    /// Where `render-index` writes the pre-rendered page.
    pub fn rendered_index(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}
