//! Defines the endpoints for recording a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Error, endpoints,
    transaction::{AmountInput, TransactionPayload, TransactionService},
};

/// The form data for recording a transaction from the landing page.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The ID of the user recording the transaction.
    pub uid: Option<String>,
    /// What the money was for.
    pub category: Option<String>,
    /// The amount as typed into the form.
    pub amount: Option<String>,
    /// A free text description.
    pub note: Option<String>,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl From<TransactionForm> for TransactionPayload {
    fn from(form: TransactionForm) -> Self {
        Self {
            uid: form.uid,
            category: form.category,
            amount: form.amount.map(AmountInput::Text),
            note: form.note,
            kind: form.kind,
        }
    }
}

/// A route handler for recording a transaction from a form, redirects to the
/// landing page on success.
///
/// Responds with 401 if the form has no user ID.
pub async fn create_transaction_form_endpoint(
    State(service): State<TransactionService>,
    Form(form): Form<TransactionForm>,
) -> Response {
    match service.create(form.into()) {
        Ok(transaction) => {
            tracing::info!("recorded transaction {} from form", transaction.id);
            Redirect::to(endpoints::ROOT).into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// A route handler for recording a transaction from a JSON body.
///
/// Responds with `{"status": "success", "id": ...}` on success and
/// `{"error": ...}` otherwise. A missing user ID is a bad request (400) and
/// a store failure is an internal server error (500).
pub async fn create_transaction_json_endpoint(
    State(service): State<TransactionService>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            return Error::MalformedRequest(rejection.body_text())
                .into_json_response(StatusCode::BAD_REQUEST);
        }
    };

    match service.create(payload) {
        Ok(transaction) => {
            tracing::info!("recorded transaction {} from JSON", transaction.id);
            Json(json!({ "status": "success", "id": transaction.id })).into_response()
        }
        Err(Error::Unauthorized) => {
            Error::Unauthorized.into_json_response(StatusCode::BAD_REQUEST)
        }
        Err(error @ (Error::UpstreamUnavailable(_) | Error::DatabaseLockError)) => {
            error.into_json_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(error) => error.into_response(),
    }
}
