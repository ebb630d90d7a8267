//! Page endpoints

use axum::{extract::State, http::Uri, response::Html};

use crate::error::AppError;
use crate::AppState;

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.to_string())
}

/// Fallback for paths the static root does not have.
pub async fn not_found(uri: Uri) -> AppError {
    tracing::debug!("No static file for {}", uri.path());
    AppError::NotFound(uri.path().to_string())
}
