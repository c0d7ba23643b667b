//! Implements a struct that holds the state of the REST server.

use std::{path::PathBuf, sync::Arc};

use rusqlite::Connection;

use crate::{
    Error,
    store::{SQLiteTransactionStore, TransactionStore},
    timezone::LocalTimezone,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where transactions are persisted.
    pub transaction_store: Arc<dyn TransactionStore>,

    /// The timezone that transaction dates are displayed in.
    pub local_timezone: LocalTimezone,

    /// The TTF/OTF font used for PDF reports.
    pub font_path: PathBuf,

    /// The directory static files, such as the favicon, are served from.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create a new [AppState] backed by a SQLite database connection.
    ///
    /// This function will create the transaction table if it does not exist.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Taipei".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the timezone is unknown.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        font_path: PathBuf,
        static_dir: PathBuf,
    ) -> Result<Self, Error> {
        let local_timezone = LocalTimezone::from_name(local_timezone)?;
        let store = SQLiteTransactionStore::new(db_connection)?;

        Ok(Self {
            transaction_store: Arc::new(store),
            local_timezone,
            font_path,
            static_dir,
        })
    }
}
