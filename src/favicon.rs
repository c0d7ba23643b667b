//! Serves the site icon from the static directory.

use std::path::PathBuf;

use axum::{
    extract::{FromRef, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::AppState;

/// The directory the favicon is read from.
#[derive(Debug, Clone)]
pub struct StaticDir(pub PathBuf);

impl FromRef<AppState> for StaticDir {
    fn from_ref(state: &AppState) -> Self {
        Self(state.static_dir.clone())
    }
}

/// A route handler that sends `favicon.ico` from the static directory, or an
/// empty 204 response if there is no icon.
pub async fn get_favicon(State(StaticDir(static_dir)): State<StaticDir>) -> Response {
    let path = static_dir.join("favicon.ico");

    match tokio::fs::read(&path).await {
        Ok(icon) => ([(CONTENT_TYPE, "image/vnd.microsoft.icon")], icon).into_response(),
        Err(error) => {
            tracing::debug!("no favicon at {}: {error}", path.display());
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
