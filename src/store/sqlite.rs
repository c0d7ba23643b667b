//! Implements a SQLite backed transaction store.
//!
//! Each row is one transaction document. The `(owner_id, id)` primary key
//! gives every user their own namespace, mirroring the
//! `users/{uid}/transactions/{id}` layout of a document database.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    store::{SortOrder, TransactionQuery, TransactionStore},
    transaction::{NewTransaction, OwnerId, Transaction, TransactionId, TransactionType},
};

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// This function creates the transaction table if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::UpstreamUnavailable] if the table cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        create_transaction_table(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Insert a transaction with a freshly generated ID.
    fn add(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let id = TransactionId::generate();
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO transaction_document (owner_id, id, category, amount, note, kind, timestamp_us)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                transaction.owner_id.as_str(),
                id.as_str(),
                &transaction.category,
                transaction.amount,
                &transaction.note,
                transaction.kind.as_str(),
                to_unix_micros(transaction.timestamp),
            ),
        )?;

        tracing::debug!(
            "stored transaction {id} for owner {}",
            transaction.owner_id.as_str()
        );

        Ok(transaction.into_transaction(id))
    }

    /// Query for transactions, ties on timestamp are broken by insertion order.
    fn list(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![
            "SELECT owner_id, id, category, amount, note, kind, timestamp_us FROM transaction_document"
                .to_owned(),
        ];
        let mut query_parameters = vec![];

        if let Some(owner_id) = query.owner_id {
            query_string_parts.push("WHERE owner_id = ?1".to_owned());
            query_parameters.push(Value::Text(owner_id.as_str().to_owned()));
        }

        match query.sort_timestamp {
            SortOrder::Ascending => {
                query_string_parts.push("ORDER BY timestamp_us ASC, rowid ASC".to_owned())
            }
            SortOrder::Descending => {
                query_string_parts.push("ORDER BY timestamp_us DESC, rowid DESC".to_owned())
            }
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());
        let connection = self.lock()?;

        let transactions = connection
            .prepare(&query_string)?
            .query_map(params, map_transaction_row)?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;

        Ok(transactions)
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaction_document (
                owner_id TEXT NOT NULL,
                id TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                timestamp_us INTEGER NOT NULL,
                PRIMARY KEY (owner_id, id)
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_document_owner_timestamp
         ON transaction_document(owner_id, timestamp_us);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let owner_id: String = row.get(0)?;
    let id: String = row.get(1)?;
    let kind: String = row.get(5)?;
    let timestamp_us: i64 = row.get(6)?;

    let kind = kind.parse::<TransactionType>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(error))
    })?;
    let timestamp = from_unix_micros(timestamp_us).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Integer, Box::new(error))
    })?;

    Ok(Transaction {
        id: TransactionId::from_stored(id),
        owner_id: OwnerId::from_stored(owner_id),
        category: row.get(2)?,
        amount: row.get(3)?,
        note: row.get(4)?,
        kind,
        timestamp,
    })
}

/// Timestamps are stored as microseconds since the Unix epoch so that they
/// sort numerically.
fn to_unix_micros(timestamp: OffsetDateTime) -> i64 {
    (timestamp.unix_timestamp_nanos() / 1_000) as i64
}

fn from_unix_micros(micros: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
}
