//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated `NewTransaction` input
//! - Database functions for storing and querying a session's transactions
//! - Route handlers for recording and reading transactions

mod core;
mod create_endpoint;
mod form;
mod query_endpoints;

pub use core::{
    NewTransaction, Summary, Transaction, TransactionType, create_transaction,
    create_transaction_table, get_summary, get_transaction, get_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use form::{FieldError, TransactionForm, ValidationErrors};
pub use query_endpoints::{
    SummaryResponse, TransactionResponse, TransactionsResponse, get_summary_endpoint,
    get_transaction_endpoint, list_transactions_endpoint,
};

#[cfg(test)]
pub use core::count_transactions;
