//! Tabulates transactions into the rows shared by both report formats.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::{
    timezone::LocalTimezone,
    transaction::{Transaction, TransactionType},
};

/// The spreadsheet column headers, in column order.
pub const COLUMN_KEYS: [&str; 5] = ["date", "type", "category", "item", "amount"];

/// The printed report column headers, in column order.
pub const COLUMN_LABELS: [&str; 5] = ["日期", "類型", "類別", "項目", "金額"];

/// The text shown in place of the data rows when there is nothing to report.
pub const NO_DATA_PLACEHOLDER: &str = "無資料";

/// One transaction as a report row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Local time formatted as "YYYY-MM-DD HH:MM".
    pub date: String,
    /// Income or expense.
    pub kind: TransactionType,
    /// What the money was for.
    pub category: String,
    /// The transaction note.
    pub item: String,
    /// The amount of money.
    pub amount: f64,
}

/// The rows of a report in the order they should be written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportTable {
    /// One row per transaction.
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Tabulate `transactions`, keeping their order.
    pub fn from_transactions(transactions: &[Transaction], local_timezone: LocalTimezone) -> Self {
        let rows = transactions
            .iter()
            .map(|transaction| ReportRow {
                date: local_timezone.format_timestamp(transaction.timestamp),
                kind: transaction.kind,
                category: transaction.category.clone(),
                item: transaction.note.clone(),
                amount: transaction.amount,
            })
            .collect();

        Self { rows }
    }

    /// Whether there are no rows to report.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row of text cells in the printed report.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintedRow {
    /// The five cells of a transaction row.
    Cells([String; 5]),
    /// A single cell spanning the table when there is no data.
    Placeholder(&'static str),
}

/// The body rows of the printed report: one row per transaction with
/// localized types and formatted amounts, or a single placeholder row when
/// the table is empty.
pub fn printed_rows(table: &ReportTable) -> Vec<PrintedRow> {
    if table.is_empty() {
        return vec![PrintedRow::Placeholder(NO_DATA_PLACEHOLDER)];
    }

    table
        .rows
        .iter()
        .map(|row| {
            PrintedRow::Cells([
                row.date.clone(),
                row.kind.label().to_owned(),
                row.category.clone(),
                row.item.clone(),
                format_amount(row.amount),
            ])
        })
        .collect()
}

/// Format `amount` with thousands separators and two decimal places, e.g. "1,200.00".
pub fn format_amount(amount: f64) -> String {
    static GROUPING_FMT: OnceLock<Formatter> = OnceLock::new();

    let grouping_fmt = GROUPING_FMT.get_or_init(|| {
        Formatter::currency("")
            .expect("an empty prefix is valid")
            .precision(Precision::Decimals(0))
    });

    // Round to cents first so that carries, e.g. 999.999 -> 1,000.00, reach the whole part.
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let whole = match whole.parse::<f64>() {
        // numfmt renders zero as "0" with no separators, which is what we want here.
        Ok(whole) if whole > 0.0 => grouping_fmt.fmt_string(whole),
        _ => whole.to_owned(),
    };

    let sign = if amount < 0.0 && fixed != "0.00" {
        "-"
    } else {
        ""
    };

    format!("{sign}{whole}.{cents}")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        report::table::{PrintedRow, ReportTable, format_amount, printed_rows},
        timezone::LocalTimezone,
        transaction::{OwnerId, Transaction, TransactionId, TransactionType},
    };

    fn transaction(category: &str, amount: f64, kind: TransactionType) -> Transaction {
        Transaction {
            id: TransactionId::from_stored(format!("id-{category}")),
            owner_id: OwnerId::new_unchecked("u1"),
            category: category.to_owned(),
            amount,
            note: format!("{category} note"),
            kind,
            timestamp: datetime!(2025-10-05 04:30 UTC),
        }
    }

    #[test]
    fn formats_amounts() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(12.5), "12.50");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1200.0), "1,200.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-45.99), "-45.99");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn tabulates_in_input_order() {
        let timezone = LocalTimezone::from_name("Asia/Taipei").unwrap();
        let transactions = vec![
            transaction("salary", 50000.0, TransactionType::Income),
            transaction("food", 120.0, TransactionType::Expense),
        ];

        let table = ReportTable::from_transactions(&transactions, timezone);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].category, "salary");
        assert_eq!(table.rows[0].date, "2025-10-05 12:30");
        assert_eq!(table.rows[0].item, "salary note");
        assert_eq!(table.rows[1].category, "food");
        assert_eq!(table.rows[1].kind, TransactionType::Expense);
    }

    #[test]
    fn printed_rows_use_labels_and_formatted_amounts() {
        let timezone = LocalTimezone::from_name("Etc/UTC").unwrap();
        let transactions = vec![
            transaction("rent", 1200.0, TransactionType::Expense),
            transaction("bonus", 300.5, TransactionType::Income),
        ];
        let table = ReportTable::from_transactions(&transactions, timezone);

        let rows = printed_rows(&table);

        assert_eq!(
            rows,
            vec![
                PrintedRow::Cells([
                    "2025-10-05 04:30".to_owned(),
                    "支出".to_owned(),
                    "rent".to_owned(),
                    "rent note".to_owned(),
                    "1,200.00".to_owned(),
                ]),
                PrintedRow::Cells([
                    "2025-10-05 04:30".to_owned(),
                    "收入".to_owned(),
                    "bonus".to_owned(),
                    "bonus note".to_owned(),
                    "300.50".to_owned(),
                ]),
            ]
        );
    }

    #[test]
    fn empty_table_prints_placeholder() {
        let rows = printed_rows(&ReportTable::default());

        assert_eq!(rows, vec![PrintedRow::Placeholder("無資料")]);
    }
}
