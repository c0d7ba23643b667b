//! Records transactions in, and reads them back out of, a [TransactionStore].

use std::sync::Arc;

use axum::extract::FromRef;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    store::{SortOrder, TransactionQuery, TransactionStore},
    timezone::LocalTimezone,
    transaction::{OwnerId, Transaction, TransactionPayload, TransactionView},
};

/// Validates, records and lists transactions on behalf of the HTTP handlers.
#[derive(Debug, Clone)]
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
    local_timezone: LocalTimezone,
}

impl FromRef<AppState> for TransactionService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.transaction_store.clone(), state.local_timezone)
    }
}

impl TransactionService {
    /// Create a service that reads and writes `store` and displays dates in `local_timezone`.
    pub fn new(store: Arc<dyn TransactionStore>, local_timezone: LocalTimezone) -> Self {
        Self {
            store,
            local_timezone,
        }
    }

    /// The timezone dates are displayed in.
    pub fn local_timezone(&self) -> LocalTimezone {
        self.local_timezone
    }

    /// Record a transaction stamped with the current time.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::Unauthorized] if the payload has no user ID,
    /// - [Error::MalformedRequest] if a required field is missing or invalid,
    /// - [Error::UpstreamUnavailable] if the store could not save the transaction.
    pub fn create(&self, payload: TransactionPayload) -> Result<Transaction, Error> {
        let transaction = payload.validate(OffsetDateTime::now_utc())?;

        self.store.add(transaction)
    }

    /// List a user's transactions, most recent first.
    ///
    /// A missing or blank `uid` yields an empty list rather than an error.
    ///
    /// # Errors
    /// Returns [Error::UpstreamUnavailable] if the store could not be read.
    pub fn list(&self, uid: Option<&str>) -> Result<Vec<TransactionView>, Error> {
        let Ok(owner_id) = OwnerId::new(uid) else {
            return Ok(Vec::new());
        };

        let transactions = self.store.list(TransactionQuery::newest_first(owner_id))?;

        Ok(transactions
            .into_iter()
            .map(|transaction| self.to_view(transaction))
            .collect())
    }

    /// Fetch the transactions to include in a report, oldest first.
    ///
    /// With a `uid` only that user's transactions are returned, otherwise
    /// every user's transactions are returned.
    ///
    /// # Errors
    /// Returns [Error::UpstreamUnavailable] if the store could not be read.
    pub fn export_rows(&self, uid: Option<&str>) -> Result<Vec<Transaction>, Error> {
        self.store.list(TransactionQuery {
            owner_id: OwnerId::new(uid).ok(),
            sort_timestamp: SortOrder::Ascending,
        })
    }

    fn to_view(&self, transaction: Transaction) -> TransactionView {
        TransactionView {
            date: self.local_timezone.format_timestamp(transaction.timestamp),
            id: transaction.id,
            uid: transaction.owner_id.to_string(),
            category: transaction.category,
            amount: transaction.amount,
            note: transaction.note,
            kind: transaction.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        Error,
        store::{SQLiteTransactionStore, test_doubles::UnavailableStore},
        timezone::LocalTimezone,
        transaction::{AmountInput, TransactionPayload, TransactionService, TransactionType},
    };

    fn get_service() -> TransactionService {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let store = SQLiteTransactionStore::new(connection).expect("Could not create store");

        TransactionService::new(Arc::new(store), LocalTimezone::from_name("Etc/UTC").unwrap())
    }

    fn payload(uid: &str, category: &str, amount: f64) -> TransactionPayload {
        TransactionPayload {
            uid: Some(uid.to_owned()),
            category: Some(category.to_owned()),
            amount: Some(AmountInput::Number(amount)),
            note: None,
            kind: None,
        }
    }

    #[test]
    fn created_transaction_is_listed() {
        let service = get_service();
        let today = OffsetDateTime::now_utc().date().to_string();

        let created = service
            .create(TransactionPayload {
                kind: Some("expense".to_owned()),
                ..payload("u1", "food", 12.5)
            })
            .unwrap();
        let listed = service.list(Some("u1")).unwrap();

        assert_eq!(listed.len(), 1);
        let view = &listed[0];
        assert_eq!(view.id, created.id);
        assert!(!view.id.as_str().is_empty());
        assert_eq!(view.amount, 12.5);
        assert_eq!(view.category, "food");
        assert_eq!(view.kind, TransactionType::Expense);
        assert!(
            view.date.starts_with(&today),
            "want date on {today}, got {}",
            view.date
        );
    }

    #[test]
    fn lists_newest_first() {
        let service = get_service();
        let first = service.create(payload("u1", "first", 1.0)).unwrap();
        let second = service.create(payload("u1", "second", 2.0)).unwrap();

        let listed = service.list(Some("u1")).unwrap();

        let ids: Vec<_> = listed.into_iter().map(|view| view.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn list_without_uid_is_empty() {
        let service = get_service();
        service.create(payload("u1", "food", 1.0)).unwrap();

        assert_eq!(service.list(None), Ok(vec![]));
        assert_eq!(service.list(Some("")), Ok(vec![]));
    }

    #[test]
    fn list_is_scoped_to_owner() {
        let service = get_service();
        service.create(payload("u1", "food", 1.0)).unwrap();
        service.create(payload("u2", "rent", 2.0)).unwrap();

        let listed = service.list(Some("u2")).unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "rent");
        assert_eq!(listed[0].uid, "u2");
    }

    #[test]
    fn create_without_uid_is_unauthorized() {
        let service = get_service();

        let result = service.create(TransactionPayload {
            uid: None,
            ..payload("u1", "food", 1.0)
        });

        assert_eq!(result, Err(Error::Unauthorized));
        assert_eq!(service.export_rows(None), Ok(vec![]));
    }

    #[test]
    fn export_rows_oldest_first() {
        let service = get_service();
        let first = service.create(payload("u1", "first", 1.0)).unwrap();
        let second = service.create(payload("u2", "second", 2.0)).unwrap();

        assert_eq!(
            service.export_rows(None),
            Ok(vec![first.clone(), second.clone()])
        );
        assert_eq!(service.export_rows(Some("u2")), Ok(vec![second]));
    }

    #[test]
    fn store_failure_is_upstream_unavailable() {
        let service = TransactionService::new(
            Arc::new(UnavailableStore),
            LocalTimezone::from_name("Etc/UTC").unwrap(),
        );

        let create_result = service.create(payload("u1", "food", 1.0));
        let list_result = service.list(Some("u1"));

        assert!(matches!(create_result, Err(Error::UpstreamUnavailable(_))));
        assert!(matches!(list_result, Err(Error::UpstreamUnavailable(_))));
    }
}
