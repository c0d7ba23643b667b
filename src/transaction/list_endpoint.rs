//! Defines the endpoints for listing a user's transactions.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::transaction::TransactionService;

/// Identifies whose transactions to list.
#[derive(Debug, Default, Deserialize)]
pub struct OwnerParams {
    /// The ID of the user. Missing means no transactions are listed.
    pub uid: Option<String>,
}

/// A route handler that lists the transactions of the user given by the `uid`
/// query parameter as a JSON array, most recent first.
pub async fn get_transactions_endpoint(
    State(service): State<TransactionService>,
    Query(params): Query<OwnerParams>,
) -> Response {
    list_transactions(&service, params)
}

/// A route handler that lists the transactions of the user given by the
/// `uid` field of the JSON body, most recent first.
///
/// A missing or unparsable body is treated as a missing user ID.
pub async fn post_get_transactions_endpoint(
    State(service): State<TransactionService>,
    body: Result<Json<OwnerParams>, JsonRejection>,
) -> Response {
    let params = match body {
        Ok(Json(params)) => params,
        Err(rejection) => {
            tracing::debug!("ignoring transaction list body: {}", rejection.body_text());
            OwnerParams::default()
        }
    };

    list_transactions(&service, params)
}

fn list_transactions(service: &TransactionService, params: OwnerParams) -> Response {
    match service.list(params.uid.as_deref()) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}
