//! Renders a [ReportTable] as a single-sheet Excel workbook.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};

use crate::{
    Error,
    report::{
        REPORT_TITLE,
        table::{COLUMN_KEYS, ReportTable},
    },
};

impl From<XlsxError> for Error {
    fn from(value: XlsxError) -> Self {
        Error::RenderFailure(value.to_string())
    }
}

const COLUMN_WIDTHS: [f64; 5] = [18.0, 10.0, 16.0, 28.0, 14.0];

/// The most characters Excel allows in one cell.
const MAX_CELL_CHARS: usize = 32_767;

/// Cut `text` to at most [MAX_CELL_CHARS] characters.
fn fit_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            tracing::warn!(
                "cut a {} character cell to fit the {MAX_CELL_CHARS} character limit",
                text.chars().count()
            );
            &text[..end]
        }
        None => text,
    }
}

/// Render `table` as an xlsx workbook.
///
/// The sheet has one header row followed by one row per transaction.
///
/// # Errors
/// Returns [Error::RenderFailure] if the workbook cannot be built.
pub(crate) fn render_workbook(table: &ReportTable) -> Result<Vec<u8>, Error> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0xADD8E6))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let amount_format = Format::new().set_num_format("#,##0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(REPORT_TITLE)?;

    for (column, (key, width)) in COLUMN_KEYS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let column = column as u16;
        worksheet.write_string_with_format(0, column, *key, &header_format)?;
        worksheet.set_column_width(column, width)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = index as u32 + 1;

        worksheet.write_string(row_number, 0, &row.date)?;
        worksheet.write_string(row_number, 1, row.kind.as_str())?;
        worksheet.write_string(row_number, 2, fit_cell(&row.category))?;
        worksheet.write_string(row_number, 3, fit_cell(&row.item))?;
        worksheet.write_number_with_format(row_number, 4, row.amount, &amount_format)?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(
        "rendered workbook with {} data row(s), {} bytes",
        table.rows.len(),
        bytes.len()
    );

    Ok(bytes)
}
