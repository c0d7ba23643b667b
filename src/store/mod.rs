//! Contains the trait and implementations for persisting [transactions](crate::Transaction).

mod sqlite;

pub use sqlite::SQLiteTransactionStore;

use std::fmt::Debug;

use crate::{
    Error,
    transaction::{NewTransaction, OwnerId, Transaction},
};

/// Handles the creation and retrieval of transactions.
///
/// Transactions are partitioned by owner. The store assigns each
/// transaction its ID and orders results by timestamp.
pub trait TransactionStore: Debug + Send + Sync {
    /// Write a new transaction into its owner's namespace.
    ///
    /// # Errors
    /// Returns [Error::UpstreamUnavailable] if the store cannot complete the write.
    fn add(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve transactions in the way defined by `query`.
    ///
    /// # Errors
    /// Returns [Error::UpstreamUnavailable] if the store cannot complete the read.
    fn list(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;
}

/// Defines how transactions should be fetched from [TransactionStore::list].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions belonging to this owner. `None` includes
    /// every owner.
    pub owner_id: Option<OwnerId>,
    /// Orders transactions by their timestamp.
    pub sort_timestamp: SortOrder,
}

impl TransactionQuery {
    /// Fetch one owner's transactions, most recent first.
    pub fn newest_first(owner_id: OwnerId) -> Self {
        Self {
            owner_id: Some(owner_id),
            sort_timestamp: SortOrder::Descending,
        }
    }
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}
