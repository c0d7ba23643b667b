//! Renders a [ReportTable] as an A4 PDF document.

use std::io::Cursor;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb, path::PaintMode,
};

use crate::{
    Error,
    report::{
        REPORT_TITLE,
        font::{FontSource, FontTier},
        table::{COLUMN_LABELS, PrintedRow, ReportTable, printed_rows},
    },
};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 15.0;

/// Column widths in millimetres: date, type, category, item, amount.
const COLUMN_WIDTHS: [f32; 5] = [40.0, 22.0, 38.0, 48.0, 32.0];
const ROW_HEIGHT: f32 = 8.0;
const CELL_PADDING: f32 = 1.5;

const TITLE_FONT_SIZE: f32 = 18.0;
const TABLE_FONT_SIZE: f32 = 10.0;
const MM_PER_PT: f32 = 0.352_778;

const HEADER_BACKGROUND: (f32, f32, f32) = (0.678, 0.847, 0.902);
const HEADER_TEXT: (f32, f32, f32) = (1.0, 1.0, 1.0);
const BODY_TEXT: (f32, f32, f32) = (0.0, 0.0, 0.0);
const GRID: (f32, f32, f32) = (0.502, 0.502, 0.502);

/// Render `table` as a PDF, returning the document bytes and the font tier used.
///
/// # Errors
/// Returns [Error::RenderFailure] if the document cannot be built.
pub(crate) fn render_pdf(
    table: &ReportTable,
    font_source: FontSource,
) -> Result<(Vec<u8>, FontTier), Error> {
    let (document, page, layer) = PdfDocument::new(REPORT_TITLE, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let (font, tier) = load_font(&document, font_source)?;

    let first_layer = document.get_page(page).get_layer(layer);
    let title_width = text_width(REPORT_TITLE, TITLE_FONT_SIZE);
    set_fill(&first_layer, BODY_TEXT);
    first_layer.use_text(
        REPORT_TITLE,
        TITLE_FONT_SIZE,
        Mm((PAGE_WIDTH.0 - title_width) / 2.0),
        Mm(PAGE_HEIGHT.0 - MARGIN - 7.0),
        &font,
    );

    let mut cursor = TableCursor {
        document: &document,
        font: &font,
        layer: first_layer,
        top: PAGE_HEIGHT.0 - MARGIN - 15.0,
        page_count: 1,
    };

    cursor.draw_header();

    for row in printed_rows(table) {
        cursor.ensure_room();

        match row {
            PrintedRow::Cells(cells) => cursor.draw_cells(&cells),
            PrintedRow::Placeholder(text) => cursor.draw_placeholder(text),
        }
    }

    let page_count = cursor.page_count;
    let bytes = document
        .save_to_bytes()
        .map_err(|error| Error::RenderFailure(format!("could not save PDF: {error}")))?;
    tracing::debug!(
        "rendered PDF report with {page_count} page(s), {} bytes, font {tier:?}",
        bytes.len()
    );

    Ok((bytes, tier))
}

/// Add the font to the document, falling back to the built-in font if the
/// font file cannot be parsed.
fn load_font(
    document: &PdfDocumentReference,
    font_source: FontSource,
) -> Result<(IndirectFontRef, FontTier), Error> {
    let tier = font_source.tier();

    if let FontSource::Embedded { path, data } = font_source {
        match document.add_external_font(Cursor::new(data)) {
            Ok(font) => return Ok((font, tier)),
            Err(error) => tracing::warn!(
                "could not load font {}, falling back to the built-in font: {error}",
                path.display()
            ),
        }
    }

    let font = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|error| Error::RenderFailure(format!("could not add built-in font: {error}")))?;

    Ok((font, FontTier::Builtin))
}

/// Tracks where the next table row goes and starts new pages as needed.
struct TableCursor<'a> {
    document: &'a PdfDocumentReference,
    font: &'a IndirectFontRef,
    layer: PdfLayerReference,
    /// The y position of the top edge of the next row.
    top: f32,
    page_count: usize,
}

impl TableCursor<'_> {
    fn table_left() -> f32 {
        (PAGE_WIDTH.0 - COLUMN_WIDTHS.iter().sum::<f32>()) / 2.0
    }

    /// Start a new page with a repeated header if the next row would run
    /// into the bottom margin.
    fn ensure_room(&mut self) {
        if self.top - ROW_HEIGHT >= MARGIN {
            return;
        }

        self.page_count += 1;
        let (page, layer) = self.document.add_page(
            PAGE_WIDTH,
            PAGE_HEIGHT,
            format!("Layer {}", self.page_count),
        );
        self.layer = self.document.get_page(page).get_layer(layer);
        self.top = PAGE_HEIGHT.0 - MARGIN;
        self.draw_header();
    }

    fn draw_header(&mut self) {
        let bottom = self.top - ROW_HEIGHT;
        let mut left = Self::table_left();

        for (label, width) in COLUMN_LABELS.iter().zip(COLUMN_WIDTHS) {
            set_fill(&self.layer, HEADER_BACKGROUND);
            self.draw_cell_border(left, bottom, width, true);
            set_fill(&self.layer, HEADER_TEXT);
            self.draw_centered_text(label, left, bottom, width);
            left += width;
        }

        self.top = bottom;
    }

    fn draw_cells(&mut self, cells: &[String; 5]) {
        let bottom = self.top - ROW_HEIGHT;
        let mut left = Self::table_left();

        set_fill(&self.layer, BODY_TEXT);
        for (text, width) in cells.iter().zip(COLUMN_WIDTHS) {
            self.draw_cell_border(left, bottom, width, false);
            self.draw_centered_text(text, left, bottom, width);
            left += width;
        }

        self.top = bottom;
    }

    fn draw_placeholder(&mut self, text: &str) {
        let bottom = self.top - ROW_HEIGHT;
        let left = Self::table_left();
        let width: f32 = COLUMN_WIDTHS.iter().sum();

        set_fill(&self.layer, BODY_TEXT);
        self.draw_cell_border(left, bottom, width, false);
        self.draw_centered_text(text, left, bottom, width);

        self.top = bottom;
    }

    /// Outline a cell, filling it with the current fill colour if `filled`.
    fn draw_cell_border(&self, left: f32, bottom: f32, width: f32, filled: bool) {
        set_outline(&self.layer, GRID);
        self.layer.set_outline_thickness(1.0);

        if !filled {
            let corners = [
                (left, bottom),
                (left + width, bottom),
                (left + width, bottom + ROW_HEIGHT),
                (left, bottom + ROW_HEIGHT),
            ];
            self.layer.add_line(Line {
                points: corners
                    .iter()
                    .map(|&(x, y)| (Point::new(Mm(x), Mm(y)), false))
                    .collect(),
                is_closed: true,
            });
        } else {
            self.layer.add_rect(
                Rect::new(
                    Mm(left),
                    Mm(bottom),
                    Mm(left + width),
                    Mm(bottom + ROW_HEIGHT),
                )
                .with_mode(PaintMode::FillStroke),
            );
        }
    }

    fn draw_centered_text(&self, text: &str, left: f32, bottom: f32, width: f32) {
        let text = fit_text(text, width - 2.0 * CELL_PADDING, TABLE_FONT_SIZE);
        let text_width = text_width(&text, TABLE_FONT_SIZE);
        let x = left + (width - text_width) / 2.0;
        // Roughly centre the cap height in the row.
        let y = bottom + (ROW_HEIGHT - TABLE_FONT_SIZE * MM_PER_PT * 0.7) / 2.0;

        self.layer
            .use_text(text, TABLE_FONT_SIZE, Mm(x), Mm(y), self.font);
    }
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

fn set_outline(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

/// Estimate the printed width of `c` in millimetres.
///
/// Full-width (CJK) characters take a whole em, Latin characters about half.
fn char_width(c: char, font_size: f32) -> f32 {
    let ems = if c.is_ascii() { 0.55 } else { 1.0 };

    ems * font_size * MM_PER_PT
}

/// Estimate the printed width of `text` in millimetres.
fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(|c| char_width(c, font_size)).sum()
}

/// Shorten `text` with a trailing "..." so that it fits in `max_width` millimetres.
fn fit_text(text: &str, max_width: f32, font_size: f32) -> String {
    if text_width(text, font_size) <= max_width {
        return text.to_owned();
    }

    let budget = max_width - text_width("...", font_size);
    let mut used = 0.0;
    let mut end = 0;

    for (index, c) in text.char_indices() {
        used += char_width(c, font_size);
        if used > budget {
            break;
        }
        end = index + c.len_utf8();
    }

    format!("{}...", &text[..end])
}
