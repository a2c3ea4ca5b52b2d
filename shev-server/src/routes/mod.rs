pub mod events;

use std::path::Path;

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use shev_core::ShevError;
use tower_http::services::ServeDir;

use crate::state::AppState;
use crate::templates;

const NOT_FOUND_MESSAGE: &str = "Failed to get event";

/// All pages plus static files from `public_dir` as fallback.
pub fn build_router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .merge(events::router())
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
}

/// Error page response. The underlying cause is logged, never shown.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
}

impl AppError {
    /// Map a core error, using `message` for anything but not-found.
    pub fn from_shev(err: ShevError, message: &'static str) -> Self {
        match err {
            ShevError::EventNotFound(id) => {
                tracing::info!(id, "Event not found");
                AppError {
                    status: StatusCode::NOT_FOUND,
                    message: NOT_FOUND_MESSAGE,
                }
            }
            other => {
                tracing::error!(error = %other, "{message}");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message,
                }
            }
        }
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        tracing::error!(error = %err, "Template rendering failed");
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to render page.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match templates::render_error(self.message) {
            Ok(page) => (self.status, Html(page)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Error page rendering failed");
                (self.status, self.message).into_response()
            }
        }
    }
}
