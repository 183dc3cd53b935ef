//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, OptionalExtension, Row, named_params, types::Type};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, session::SessionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, stored as a positive amount.
    Credit,
    /// Money spent, stored as a negative amount.
    Debit,
}

impl TransactionType {
    /// Apply the sign of the transaction type to `amount`.
    ///
    /// Credits keep `amount` as is and debits negate it.
    pub fn signed_amount(self, amount: f64) -> f64 {
        match self {
            TransactionType::Credit => amount,
            TransactionType::Debit => -amount,
        }
    }
}

/// An expense or income recorded by an anonymous session.
///
/// The sign of `amount` is the only record of whether the transaction was a
/// credit or a debit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The globally unique ID of the transaction.
    pub id: Uuid,
    /// A text label describing what the transaction was for.
    pub title: String,
    /// The signed amount: positive for credits, negative for debits.
    pub amount: f64,
    /// The session that recorded the transaction.
    pub session_id: SessionId,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated request to record a transaction.
///
/// Use [crate::transaction::TransactionForm::validate] to build one from
/// client input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A non-empty text label.
    pub title: String,
    /// The amount as supplied by the client, before the type's sign is applied.
    pub amount: f64,
    /// Whether the amount is a credit or a debit.
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    /// The amount as it is stored, with the sign of the transaction type applied.
    pub fn signed_amount(&self) -> f64 {
        self.transaction_type.signed_amount(self.amount)
    }
}

/// The sum of the amounts of a session's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The total, zero if the session has no transactions.
    pub amount: f64,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Record a new transaction for `session_id`.
///
/// A fresh ID and creation time are assigned to the transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    session_id: &SessionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (id, title, amount, session_id, created_at)
             VALUES (:id, :title, :amount, :session_id, :created_at)
             RETURNING id, title, amount, session_id, created_at",
        )?
        .query_row(
            named_params! {
                ":id": Uuid::new_v4().to_string(),
                ":title": new_transaction.title,
                ":amount": new_transaction.signed_amount(),
                ":session_id": session_id.as_str(),
                ":created_at": OffsetDateTime::now_utc(),
            },
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve all transactions recorded by `session_id`, in storage order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    session_id: &SessionId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut statement = connection.prepare(
        "SELECT id, title, amount, session_id, created_at FROM transactions
         WHERE session_id = :session_id",
    )?;

    let transactions = statement
        .query_map(
            named_params! { ":session_id": session_id.as_str() },
            map_transaction_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}

/// Retrieve the transaction with `id` if it was recorded by `session_id`.
///
/// Transactions belonging to other sessions are treated as missing.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transaction(
    id: Uuid,
    session_id: &SessionId,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, amount, session_id, created_at FROM transactions
             WHERE id = :id AND session_id = :session_id",
        )?
        .query_row(
            named_params! {
                ":id": id.to_string(),
                ":session_id": session_id.as_str(),
            },
            map_transaction_row,
        )
        .optional()?;

    Ok(transaction)
}

/// Sum the amounts of the transactions recorded by `session_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_summary(session_id: &SessionId, connection: &Connection) -> Result<Summary, Error> {
    let amount = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0.0) FROM transactions WHERE session_id = :session_id",
        named_params! { ":session_id": session_id.as_str() },
        |row| row.get(0),
    )?;

    Ok(Summary { amount })
}

/// Create the transactions table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                session_id TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Every query filters by session.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_session_id ON transactions(session_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(error)))?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let session_id: String = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(Transaction {
        id,
        title,
        amount,
        session_id: SessionId::new(&session_id).ok_or(rusqlite::Error::InvalidColumnType(
            3,
            "session_id".to_owned(),
            Type::Text,
        ))?,
        created_at,
    })
}

/// Get the total number of transactions in the database across all sessions.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use uuid::Uuid;

    use crate::{
        db::initialize,
        session::SessionId,
        transaction::{
            NewTransaction, TransactionType, count_transactions, create_transaction,
            get_summary, get_transaction, get_transactions,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_transaction(title: &str, amount: f64, transaction_type: TransactionType) -> NewTransaction {
        NewTransaction {
            title: title.to_owned(),
            amount,
            transaction_type,
        }
    }

    #[test]
    fn create_credit_stores_positive_amount() {
        let conn = get_test_connection();
        let session_id = SessionId::generate();

        let transaction = create_transaction(
            new_transaction("Salary", 1000.0, TransactionType::Credit),
            &session_id,
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.amount, 1000.0);
        assert_eq!(transaction.title, "Salary");
        assert_eq!(transaction.session_id, session_id);
    }

    #[test]
    fn create_debit_stores_negative_amount() {
        let conn = get_test_connection();
        let session_id = SessionId::generate();

        let transaction = create_transaction(
            new_transaction("Rent", 400.0, TransactionType::Debit),
            &session_id,
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.amount, -400.0);
    }

    #[test]
    fn create_assigns_unique_ids() {
        let conn = get_test_connection();
        let session_id = SessionId::generate();

        let first = create_transaction(
            new_transaction("Coffee", 4.5, TransactionType::Debit),
            &session_id,
            &conn,
        )
        .unwrap();
        let second = create_transaction(
            new_transaction("Coffee", 4.5, TransactionType::Debit),
            &session_id,
            &conn,
        )
        .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(count_transactions(&conn).unwrap(), 2);
    }

    #[test]
    fn get_transactions_only_returns_own_session() {
        let conn = get_test_connection();
        let session_id = SessionId::generate();
        let other_session_id = SessionId::generate();
        let want = create_transaction(
            new_transaction("Salary", 1000.0, TransactionType::Credit),
            &session_id,
            &conn,
        )
        .unwrap();
        create_transaction(
            new_transaction("Groceries", 80.0, TransactionType::Debit),
            &other_session_id,
            &conn,
        )
        .unwrap();

        let got = get_transactions(&session_id, &conn).unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn get_transactions_for_new_session_is_empty() {
        let conn = get_test_connection();

        let got = get_transactions(&SessionId::generate(), &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn get_transaction_succeeds() {
        let conn = get_test_connection();
        let session_id = SessionId::generate();
        let want = create_transaction(
            new_transaction("Salary", 1000.0, TransactionType::Credit),
            &session_id,
            &conn,
        )
        .unwrap();

        let got = get_transaction(want.id, &session_id, &conn).unwrap();

        assert_eq!(got, Some(want));
    }

    #[test]
    fn get_transaction_from_other_session_returns_none() {
        let conn = get_test_connection();
        let owner = SessionId::generate();
        let transaction = create_transaction(
            new_transaction("Salary", 1000.0, TransactionType::Credit),
            &owner,
            &conn,
        )
        .unwrap();

        let got = get_transaction(transaction.id, &SessionId::generate(), &conn).unwrap();

        assert_eq!(got, None);
    }

    #[test]
    fn get_missing_transaction_returns_none() {
        let conn = get_test_connection();

        let got = get_transaction(Uuid::new_v4(), &SessionId::generate(), &conn).unwrap();

        assert_eq!(got, None);
    }

    #[test]
    fn summary_sums_session_amounts() {
        let conn = get_test_connection();
        let session_id = SessionId::generate();
        create_transaction(
            new_transaction("Salary", 1000.0, TransactionType::Credit),
            &session_id,
            &conn,
        )
        .unwrap();
        create_transaction(
            new_transaction("Rent", 400.0, TransactionType::Debit),
            &session_id,
            &conn,
        )
        .unwrap();
        create_transaction(
            new_transaction("Bonus", 50.0, TransactionType::Credit),
            &SessionId::generate(),
            &conn,
        )
        .unwrap();

        let summary = get_summary(&session_id, &conn).unwrap();

        assert_eq!(summary.amount, 600.0);
    }

    #[test]
    fn summary_matches_sum_of_listed_amounts() {
        let conn = get_test_connection();
        let session_id = SessionId::generate();
        for (i, amount) in [12.5, 3.25, 99.0, 0.75].into_iter().enumerate() {
            let transaction_type = if i % 2 == 0 {
                TransactionType::Credit
            } else {
                TransactionType::Debit
            };
            create_transaction(
                new_transaction("Item", amount, transaction_type),
                &session_id,
                &conn,
            )
            .unwrap();
        }

        let listed_total: f64 = get_transactions(&session_id, &conn)
            .unwrap()
            .iter()
            .map(|transaction| transaction.amount)
            .sum();
        let summary = get_summary(&session_id, &conn).unwrap();

        assert!((summary.amount - listed_total).abs() < 1e-9);
    }

    #[test]
    fn summary_without_transactions_is_zero() {
        let conn = get_test_connection();

        let summary = get_summary(&SessionId::generate(), &conn).unwrap();

        assert_eq!(summary.amount, 0.0);
    }
}
