//! Page template rendering.
//!
//! Templates are plain HTML with `{{ name }}` placeholders. Every placeholder
//! must have a value in the [`PageContext`]; a missing one is an error so a
//! broken page never reaches the browser.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ServerConfig;
use crate::error::{AppError, Result};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    values: BTreeMap<String, String>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for the game page.
    pub fn for_page(config: &ServerConfig) -> Self {
        Self::new()
            .with("title", &config.page_title)
            .with("version", env!("CARGO_PKG_VERSION"))
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// A loaded template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
}

impl Template {
    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Read a template from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        Ok(Self::from_source(path.display().to_string(), source))
    }

    pub fn render(&self, context: &PageContext) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];

            let end = after_open.find(CLOSE).ok_or_else(|| {
                AppError::Template(format!("{}: unclosed placeholder", self.name))
            })?;

            let key = after_open[..end].trim();
            let value = context.get(key).ok_or_else(|| {
                AppError::Template(format!("{}: no value for `{}`", self.name, key))
            })?;
            out.push_str(&escape_html(value));

            rest = &after_open[end + CLOSE.len()..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
