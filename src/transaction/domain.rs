//! Defines the core data models for transactions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Identifies the user namespace that a transaction belongs to.
///
/// An owner ID is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create an owner ID from a raw user ID.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    /// Returns [Error::Unauthorized] if `uid` is missing or blank.
    pub fn new(uid: Option<&str>) -> Result<Self, Error> {
        match uid.map(str::trim) {
            Some(uid) if !uid.is_empty() => Ok(Self(uid.to_owned())),
            _ => Err(Error::Unauthorized),
        }
    }

    /// Wrap an owner ID read back from the store.
    pub fn from_stored(uid: String) -> Self {
        Self(uid)
    }

    /// Create an owner ID without trimming or checking for blank strings.
    #[cfg(test)]
    pub fn new_unchecked(uid: &str) -> Self {
        Self(uid.to_owned())
    }

    /// The owner ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The opaque identifier the store assigns to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Wrap an identifier read back from the store.
    pub fn from_stored(id: String) -> Self {
        Self(id)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    #[default]
    Expense,
}

impl TransactionType {
    /// The value used on the wire and in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The label shown in printed reports.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "收入",
            TransactionType::Expense => "支出",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" | "Income" | "收入" => Ok(TransactionType::Income),
            "expense" | "Expense" | "支出" => Ok(TransactionType::Expense),
            other => Err(Error::MalformedRequest(format!(
                "type must be \"income\" or \"expense\", got \"{other}\""
            ))),
        }
    }
}

/// An expense or income recorded by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID the store assigned to the transaction.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub owner_id: OwnerId,
    /// What the money was for, e.g. "food".
    pub category: String,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// A free text description, may be empty.
    pub note: String,
    /// Whether the money was earned or spent.
    pub kind: TransactionType,
    /// When the transaction was recorded, in UTC.
    pub timestamp: OffsetDateTime,
}

/// A validated transaction that has not been written to the store yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user the transaction belongs to.
    pub owner_id: OwnerId,
    /// What the money was for.
    pub category: String,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// A free text description, may be empty.
    pub note: String,
    /// Whether the money was earned or spent.
    pub kind: TransactionType,
    /// When the transaction was recorded.
    pub timestamp: OffsetDateTime,
}

impl NewTransaction {
    /// Attach the store-assigned `id`.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            owner_id: self.owner_id,
            category: self.category,
            amount: self.amount,
            note: self.note,
            kind: self.kind,
            timestamp: self.timestamp,
        }
    }
}

/// An amount as sent by the client, either a JSON number or text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A JSON number.
    Number(f64),
    /// Text such as a form field, parsed later.
    Text(String),
}

impl AmountInput {
    fn parse(&self) -> Result<f64, Error> {
        let amount = match self {
            AmountInput::Number(number) => *number,
            AmountInput::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                Error::MalformedRequest(format!("amount must be a number, got \"{text}\""))
            })?,
        };

        if amount.is_finite() {
            Ok(amount)
        } else {
            Err(Error::MalformedRequest(format!(
                "amount must be a finite number, got {amount}"
            )))
        }
    }
}

/// The unvalidated fields of a request to record a transaction.
///
/// Every field is optional so that missing fields can be reported with the
/// right error instead of a generic deserialization failure.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionPayload {
    /// The ID of the user recording the transaction.
    pub uid: Option<String>,
    /// What the money was for.
    pub category: Option<String>,
    /// The amount of money earned or spent.
    pub amount: Option<AmountInput>,
    /// A free text description.
    pub note: Option<String>,
    /// "income" or "expense", defaults to "expense".
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TransactionPayload {
    /// Check the payload and stamp it with `timestamp`.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::Unauthorized] if `uid` is missing or blank,
    /// - [Error::MalformedRequest] if `category` or `amount` are missing, `amount` is not a
    ///   number, or `type` is not a known transaction type.
    pub fn validate(self, timestamp: OffsetDateTime) -> Result<NewTransaction, Error> {
        let owner_id = OwnerId::new(self.uid.as_deref())?;

        let category = match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category.to_owned(),
            _ => return Err(Error::MalformedRequest("category is required".to_owned())),
        };

        let amount = self
            .amount
            .as_ref()
            .ok_or_else(|| Error::MalformedRequest("amount is required".to_owned()))?
            .parse()?;

        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => TransactionType::default(),
            Some(kind) => kind.parse()?,
        };

        Ok(NewTransaction {
            owner_id,
            category,
            amount,
            note: self.note.unwrap_or_default(),
            kind,
            timestamp,
        })
    }
}

/// A transaction as listed back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    /// The ID the store assigned to the transaction.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub uid: String,
    /// What the money was for.
    pub category: String,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// A free text description.
    pub note: String,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// When the transaction was recorded, formatted in local time as "YYYY-MM-DD HH:MM".
    pub date: String,
}

// ============================================================================
// TESTS
// ============================================================================
