//! Ledgerly is a web backend for tracking personal income and expenses.
//!
//! Transactions are recorded per user, listed back newest first, and can be
//! exported as a spreadsheet or a PDF report.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod config;
mod endpoints;
mod favicon;
mod html;
mod logging;
mod not_found;
mod pages;
mod report;
mod routing;
mod store;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::{ConfigError, FIREBASE_KEY_ENV, ServiceAccountKey, load_credential};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{FontTier, Report, ReportFormat};
pub use routing::build_router;
pub use store::{SQLiteTransactionStore, SortOrder, TransactionQuery, TransactionStore};
pub use timezone::LocalTimezone;
pub use transaction::{
    NewTransaction, OwnerId, Transaction, TransactionId, TransactionPayload, TransactionService,
    TransactionType, TransactionView,
};

use crate::not_found::get_404_not_found_response;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for the Ctrl+C signal: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur while handling a request.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not identify the user that owns the transactions.
    #[error("a user ID is required")]
    Unauthorized,

    /// A required field was missing or could not be parsed.
    ///
    /// The string describes which field was at fault and is safe to show to
    /// the client.
    #[error("{0}")]
    MalformedRequest(String),

    /// The transaction store could not complete the request.
    ///
    /// The string should only be logged on the server.
    #[error("the transaction store is unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Could not acquire the lock on the database connection.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The spreadsheet or PDF document could not be built.
    #[error("could not render the report: {0}")]
    RenderFailure(String),

    /// A canonical timezone name did not match any known timezone.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::UpstreamUnavailable(value.to_string())
    }
}

impl Error {
    /// The status code used when this error is sent to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamUnavailable(_) | Error::DatabaseLockError => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::RenderFailure(_) | Error::InvalidTimezone(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Send the error as a JSON object `{"error": message}` with `status_code`.
    ///
    /// Details of server-side failures are logged and replaced with a
    /// generic message.
    pub(crate) fn into_json_response(self, status_code: StatusCode) -> Response {
        let message = match self {
            Error::Unauthorized | Error::MalformedRequest(_) | Error::NotFound => self.to_string(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                match error {
                    Error::RenderFailure(_) => "could not generate the report".to_owned(),
                    _ => "the transaction store is unavailable, try again later".to_owned(),
                }
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            error => {
                let status_code = error.status_code();
                error.into_json_response(status_code)
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    use crate::Error;

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");
        serde_json::from_slice(&body).expect("Could not parse body as JSON")
    }

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(Error::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::MalformedRequest("amount is required".to_owned()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::UpstreamUnavailable("disk I/O error".to_owned()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            Error::RenderFailure("out of memory".to_owned()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn malformed_request_message_is_sent_to_client() {
        let response = Error::MalformedRequest("amount is required".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "amount is required");
    }

    #[tokio::test]
    async fn upstream_details_are_not_sent_to_client() {
        let response = Error::UpstreamUnavailable("/var/db/secret.sqlite3".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        let message = body["error"].as_str().expect("error should be a string");
        assert!(!message.contains("secret"), "leaked details: {message}");
    }
}
