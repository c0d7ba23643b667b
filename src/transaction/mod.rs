//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the payload it is validated from
//! - The `TransactionService` for recording and listing transactions
//! - The HTTP handlers for the transaction endpoints

mod create_endpoint;
mod domain;
mod list_endpoint;
mod service;

pub use create_endpoint::{create_transaction_form_endpoint, create_transaction_json_endpoint};
pub use domain::{
    AmountInput, NewTransaction, OwnerId, Transaction, TransactionId, TransactionPayload,
    TransactionType, TransactionView,
};
pub use list_endpoint::{get_transactions_endpoint, post_get_transactions_endpoint};
pub use service::TransactionService;
