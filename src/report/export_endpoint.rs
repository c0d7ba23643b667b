//! Defines the endpoint for downloading a transaction report.

use std::path::PathBuf;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    report::{FontTier, Report, ReportFormat},
    transaction::TransactionService,
};

/// The state needed to export a report.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// Reads the transactions to report on.
    pub transaction_service: TransactionService,
    /// The TTF/OTF font used for PDF reports.
    pub font_path: PathBuf,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_service: TransactionService::from_ref(state),
            font_path: state.font_path.clone(),
        }
    }
}

/// The query parameters for [export_report_endpoint].
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// "excel" or "pdf". Missing or unknown values export Excel.
    pub format: Option<String>,
    /// Only report this user's transactions. Missing reports every user.
    pub uid: Option<String>,
}

/// A route handler that sends the transactions as a downloadable Excel or
/// PDF report, oldest first.
pub async fn export_report_endpoint(
    State(state): State<ExportState>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let format = ReportFormat::from_query(query.format.as_deref());

    let transactions = match state.transaction_service.export_rows(query.uid.as_deref()) {
        Ok(transactions) => transactions,
        Err(error) => return error.into_response(),
    };

    let transaction_count = transactions.len();
    let local_timezone = state.transaction_service.local_timezone();
    let font_path = state.font_path;

    // Rendering is CPU bound, keep it off the async worker threads.
    let rendered = tokio::task::spawn_blocking(move || {
        Report::render(&transactions, local_timezone, format, &font_path)
    })
    .await;

    let report = match rendered {
        Ok(Ok(report)) => report,
        Ok(Err(error)) => return error.into_response(),
        Err(error) => {
            return Error::RenderFailure(format!("report task failed: {error}")).into_response();
        }
    };

    if let Some(FontTier::Builtin) = report.font_tier {
        tracing::warn!("PDF report rendered without a CJK font, some text may not display");
    }
    tracing::info!(
        "exported {} transaction(s) as {}",
        transaction_count,
        format.file_name()
    );

    report.into_response()
}
