//! Defines the read-only endpoints for a session's transactions.
//!
//! All of these routes sit behind the session guard, so each handler receives
//! the caller's [SessionId] and only ever sees that session's rows.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    session::SessionId,
    transaction::{
        Transaction,
        core::{Summary, get_summary, get_transaction, get_transactions},
        form::parse_transaction_id,
    },
};

/// The state needed to query transactions.
#[derive(Debug, Clone)]
pub struct QueryTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for QueryTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl QueryTransactionsState {
    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

/// The response body listing a session's transactions.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionsResponse {
    /// Every transaction recorded by the session.
    pub transactions: Vec<Transaction>,
}

/// The response body for a single transaction lookup.
///
/// The field keeps the plural name used by the list endpoint. A missing
/// transaction is `null` rather than a 404.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// The matching transaction, if the session recorded one with the ID.
    pub transactions: Option<Transaction>,
}

/// The response body for the sum of a session's transactions.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The aggregate over the session's transactions.
    pub summary: Summary,
}

/// A route handler for listing the caller's transactions.
pub async fn list_transactions_endpoint(
    State(state): State<QueryTransactionsState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<TransactionsResponse>, Error> {
    let connection = state.lock_connection()?;

    let transactions = get_transactions(&session_id, &connection)?;

    Ok(Json(TransactionsResponse { transactions }))
}

/// A route handler for getting one of the caller's transactions by its ID.
///
/// Responds with `{"transactions": null}` if the caller has no transaction
/// with the ID, including when the ID belongs to another session.
pub async fn get_transaction_endpoint(
    State(state): State<QueryTransactionsState>,
    Extension(session_id): Extension<SessionId>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;
    let connection = state.lock_connection()?;

    let transaction = get_transaction(transaction_id, &session_id, &connection)?;

    Ok(Json(TransactionResponse {
        transactions: transaction,
    }))
}

/// A route handler for the sum of the caller's transaction amounts.
pub async fn get_summary_endpoint(
    State(state): State<QueryTransactionsState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<SummaryResponse>, Error> {
    let connection = state.lock_connection()?;

    let summary = get_summary(&session_id, &connection)?;

    Ok(Json(SummaryResponse { summary }))
}
