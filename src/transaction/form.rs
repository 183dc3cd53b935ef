//! Checks the shape of client input for transactions.
//!
//! Every problem found is collected into [ValidationErrors] instead of
//! stopping at the first one, so the client can fix all fields at once.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::transaction::{NewTransaction, TransactionType};

/// A problem with a single field of the client's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The name of the offending field, e.g. "amount".
    pub field: String,
    /// What is wrong with the field.
    pub message: String,
}

/// All the problems found while validating client input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Record a problem with `field`.
    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError {
            field: field.to_owned(),
            message: message.to_owned(),
        });
    }

    /// A single problem with `field`.
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    /// Whether no problems were found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The problems found, in the order they were recorded.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();

        write!(f, "{}", messages.join(", "))
    }
}

/// The largest magnitude accepted for an amount.
///
/// Keeps the sum of a session's amounts finite.
pub const MAX_AMOUNT: f64 = 1e15;

/// The body of a request to record a transaction, e.g.
/// `{"title": "Rent", "amount": 400, "type": "debit"}`.
///
/// Each field is kept as raw JSON so that [TransactionForm::validate] can
/// report a problem for every field instead of failing on the first one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    #[serde(default)]
    pub title: Option<Value>,
    /// The value of the transaction, before the type's sign is applied.
    #[serde(default)]
    pub amount: Option<Value>,
    /// Either "credit" or "debit".
    #[serde(default, rename = "type")]
    pub transaction_type: Option<Value>,
}

impl TransactionForm {
    /// Check that `title` is a non-empty string, `amount` is a number no
    /// larger in magnitude than [MAX_AMOUNT] and `type` is either "credit" or
    /// "debit".
    ///
    /// # Errors
    /// Returns every problem found if any field is missing or malformed.
    pub fn validate(self) -> Result<NewTransaction, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = match self.title.map(String::deserialize) {
            None => {
                errors.push("title", "required");
                None
            }
            Some(Ok(title)) if title.is_empty() => {
                errors.push("title", "must not be empty");
                None
            }
            Some(Ok(title)) => Some(title),
            Some(Err(_)) => {
                errors.push("title", "expected a string");
                None
            }
        };

        let amount = match self.amount.map(f64::deserialize) {
            None => {
                errors.push("amount", "required");
                None
            }
            Some(Ok(amount)) if amount.is_finite() && amount.abs() <= MAX_AMOUNT => Some(amount),
            Some(Ok(_)) => {
                errors.push("amount", "amount out of range");
                None
            }
            Some(Err(_)) => {
                errors.push("amount", "expected a number");
                None
            }
        };

        let transaction_type = match self.transaction_type.map(TransactionType::deserialize) {
            None => {
                errors.push("type", "required");
                None
            }
            Some(Ok(transaction_type)) => Some(transaction_type),
            Some(Err(_)) => {
                errors.push("type", "expected one of \"credit\", \"debit\"");
                None
            }
        };

        match (title, amount, transaction_type) {
            (Some(title), Some(amount), Some(transaction_type)) if errors.is_empty() => {
                Ok(NewTransaction {
                    title,
                    amount,
                    transaction_type,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Parse a transaction ID given as a path parameter.
///
/// Only the hyphenated form, e.g. "67e55044-10b1-426f-9247-bb680e5fe0c8", is
/// accepted. Letters may be in either case.
///
/// # Errors
/// Returns a validation error for the field "id" if `id` is not a UUID.
pub fn parse_transaction_id(id: &str) -> Result<Uuid, ValidationErrors> {
    let invalid = || ValidationErrors::single("id", "expected a UUID");

    if id.len() != uuid::fmt::Hyphenated::LENGTH {
        return Err(invalid());
    }

    Uuid::parse_str(id).map_err(|_| invalid())
}
