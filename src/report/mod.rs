//! Generates downloadable transaction reports.
//!
//! Transactions are first tabulated into a [table::ReportTable] and then
//! written out as either an Excel workbook or a PDF document.

mod excel;
mod export_endpoint;
mod font;
mod pdf;
mod table;

use std::path::Path;

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

pub use export_endpoint::{ExportQuery, ExportState, export_report_endpoint};
pub use font::FontTier;

use crate::{
    Error, report::table::ReportTable, timezone::LocalTimezone, transaction::Transaction,
};

/// The title of the report, also used as the sheet name and download file name.
pub const REPORT_TITLE: &str = "記帳報表";

/// [REPORT_TITLE] percent-encoded as UTF-8 for the `filename*` parameter.
const ENCODED_REPORT_TITLE: &str = "%E8%A8%98%E5%B8%B3%E5%A0%B1%E8%A1%A8";

/// The document formats a report can be exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// An xlsx workbook.
    #[default]
    Excel,
    /// An A4 PDF document.
    Pdf,
}

impl ReportFormat {
    /// Pick the format named by a `format` query parameter.
    ///
    /// `"pdf"` in any case selects [ReportFormat::Pdf]. Anything else,
    /// including no value, selects [ReportFormat::Excel].
    pub fn from_query(format: Option<&str>) -> Self {
        match format.map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("pdf") => ReportFormat::Pdf,
            None | Some("") => ReportFormat::Excel,
            Some(format) if format.eq_ignore_ascii_case("excel") => ReportFormat::Excel,
            Some(unknown) => {
                tracing::warn!("unknown report format {unknown:?}, exporting as Excel");
                ReportFormat::Excel
            }
        }
    }

    /// The file extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Excel => "xlsx",
            ReportFormat::Pdf => "pdf",
        }
    }

    /// The file name the report is downloaded as.
    pub fn file_name(self) -> String {
        format!("{REPORT_TITLE}.{}", self.extension())
    }

    /// The MIME type of the document.
    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Pdf => "application/pdf",
        }
    }

    fn content_disposition(self) -> String {
        let extension = self.extension();

        format!(
            "attachment; filename=\"report.{extension}\"; \
             filename*=UTF-8''{ENCODED_REPORT_TITLE}.{extension}"
        )
    }
}

/// A rendered report document.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// The format of `bytes`.
    pub format: ReportFormat,
    /// The document contents.
    pub bytes: Vec<u8>,
    /// The font a PDF report was rendered with, `None` for Excel reports.
    pub font_tier: Option<FontTier>,
}

impl Report {
    /// Render `transactions` in the given order as a `format` document.
    ///
    /// Dates are shown in `local_timezone`. PDF reports use the font at
    /// `font_path` if it can be loaded, otherwise the built-in font.
    ///
    /// # Errors
    /// Returns [Error::RenderFailure] if the document could not be built.
    pub fn render(
        transactions: &[Transaction],
        local_timezone: LocalTimezone,
        format: ReportFormat,
        font_path: &Path,
    ) -> Result<Self, Error> {
        let table = ReportTable::from_transactions(transactions, local_timezone);

        match format {
            ReportFormat::Excel => Ok(Report {
                format,
                bytes: excel::render_workbook(&table)?,
                font_tier: None,
            }),
            ReportFormat::Pdf => {
                let (bytes, font_tier) = pdf::render_pdf(&table, font::resolve_font(font_path))?;

                Ok(Report {
                    format,
                    bytes,
                    font_tier: Some(font_tier),
                })
            }
        }
    }
}

impl IntoResponse for Report {
    fn into_response(self) -> Response {
        (
            [
                (CONTENT_TYPE, self.format.content_type().to_owned()),
                (CONTENT_DISPOSITION, self.format.content_disposition()),
            ],
            self.bytes,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use time::macros::datetime;

    use crate::{
        report::{FontTier, Report, ReportFormat},
        timezone::LocalTimezone,
        transaction::{OwnerId, Transaction, TransactionId, TransactionType},
    };

    #[test]
    fn parses_format_leniently() {
        assert_eq!(ReportFormat::from_query(None), ReportFormat::Excel);
        assert_eq!(ReportFormat::from_query(Some("")), ReportFormat::Excel);
        assert_eq!(ReportFormat::from_query(Some("excel")), ReportFormat::Excel);
        assert_eq!(ReportFormat::from_query(Some("pdf")), ReportFormat::Pdf);
        assert_eq!(ReportFormat::from_query(Some("PDF")), ReportFormat::Pdf);
        assert_eq!(ReportFormat::from_query(Some("docx")), ReportFormat::Excel);
    }

    #[test]
    fn file_names_use_report_title() {
        assert_eq!(ReportFormat::Excel.file_name(), "記帳報表.xlsx");
        assert_eq!(ReportFormat::Pdf.file_name(), "記帳報表.pdf");
    }

    #[test]
    fn excel_report_has_no_font_tier() {
        let report = Report::render(
            &[],
            LocalTimezone::from_name("Etc/UTC").unwrap(),
            ReportFormat::Excel,
            "missing.ttf".as_ref(),
        )
        .unwrap();

        assert_eq!(report.format, ReportFormat::Excel);
        assert_eq!(report.font_tier, None);
        // xlsx files are zip archives.
        assert!(report.bytes.starts_with(b"PK"));
    }

    #[test]
    fn pdf_report_falls_back_to_builtin_font() {
        let transactions = [Transaction {
            id: TransactionId::from_stored("a".to_owned()),
            owner_id: OwnerId::new_unchecked("u1"),
            category: "food".to_owned(),
            amount: 80.0,
            note: "noodles".to_owned(),
            kind: TransactionType::Expense,
            timestamp: datetime!(2025-10-05 12:00 UTC),
        }];

        let report = Report::render(
            &transactions,
            LocalTimezone::from_name("Etc/UTC").unwrap(),
            ReportFormat::Pdf,
            "does/not/exist.ttf".as_ref(),
        )
        .unwrap();

        assert_eq!(report.font_tier, Some(FontTier::Builtin));
        assert!(report.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn response_is_an_attachment() {
        let report = Report {
            format: ReportFormat::Pdf,
            bytes: b"%PDF-1.3".to_vec(),
            font_tier: Some(FontTier::Builtin),
        };

        let response = report.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/pdf");
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"report.pdf\"; \
             filename*=UTF-8''%E8%A8%98%E5%B8%B3%E5%A0%B1%E8%A1%A8.pdf"
        );
    }
}
