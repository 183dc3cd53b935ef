//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::CookieJar;
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState, Error,
    session::{SessionId, get_session_id, set_session_cookie},
    transaction::{TransactionForm, ValidationErrors, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// How long a newly minted session cookie stays valid on the client.
    pub session_duration: Duration,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            session_duration: state.session_duration,
        }
    }
}

/// A route handler for recording a new transaction, responds with 201 Created
/// and an empty body on success.
///
/// Clients without a session cookie are given a new session, which is set as a
/// cookie on the response. An existing session cookie is reused unchanged.
/// Nothing is stored and no cookie is set if the body is invalid.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    jar: CookieJar,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<(StatusCode, CookieJar), Error> {
    let Json(form) = form.map_err(|rejection| {
        tracing::debug!("could not parse transaction body: {rejection}");
        ValidationErrors::single("body", &rejection.body_text())
    })?;

    let new_transaction = form.validate()?;

    let (jar, session_id) = match get_session_id(&jar) {
        Some(session_id) => (jar, session_id),
        None => {
            let session_id = SessionId::generate();
            tracing::debug!("Starting new session {session_id}");
            let jar = set_session_cookie(jar, &session_id, state.session_duration);
            (jar, session_id)
        }
    };

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    create_transaction(new_transaction, &session_id, &connection)?;

    Ok((StatusCode::CREATED, jar))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode};
    use axum_extra::extract::{CookieJar, cookie::Cookie};
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        Error,
        db::initialize,
        session::{DEFAULT_SESSION_DURATION, SESSION_COOKIE, SessionId},
        transaction::{
            TransactionForm, count_transactions,
            create_endpoint::{CreateTransactionState, create_transaction_endpoint},
            get_transactions,
        },
    };

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            session_duration: DEFAULT_SESSION_DURATION,
        }
    }

    fn form(body: Value) -> TransactionForm {
        serde_json::from_value(body).expect("Could not deserialize transaction form")
    }

    #[tokio::test]
    async fn can_create_transaction_with_new_session() {
        let state = get_test_state();
        let body = json!({"title": "Salary", "amount": 1000, "type": "credit"});

        let (status, jar) =
            create_transaction_endpoint(State(state.clone()), CookieJar::new(), Ok(Json(form(body))))
                .await
                .expect("Could not create transaction");

        assert_eq!(status, StatusCode::CREATED);
        let cookie = jar.get(SESSION_COOKIE).expect("session cookie was not set");
        let session_id = SessionId::new(cookie.value()).unwrap();
        let transactions = get_transactions(&session_id, &state.db_connection.lock().unwrap())
            .unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 1000.0);
        assert_eq!(transactions[0].title, "Salary");
    }

    #[tokio::test]
    async fn reuses_existing_session() {
        let state = get_test_state();
        let session_id = SessionId::generate();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, session_id.to_string()));
        let body = json!({"title": "Rent", "amount": 400, "type": "debit"});

        let (status, jar) = create_transaction_endpoint(State(state.clone()), jar, Ok(Json(form(body))))
            .await
            .expect("Could not create transaction");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_owned()),
            Some(session_id.to_string())
        );
        let transactions = get_transactions(&session_id, &state.db_connection.lock().unwrap())
            .unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, -400.0);
    }

    #[tokio::test]
    async fn invalid_type_is_rejected_before_storage() {
        let state = get_test_state();
        let body = json!({"title": "Rent", "amount": 400, "type": "refund"});

        let result =
            create_transaction_endpoint(State(state.clone()), CookieJar::new(), Ok(Json(form(body))))
                .await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(
            count_transactions(&state.db_connection.lock().unwrap()).unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_storage() {
        let state = get_test_state();
        let body = json!({"title": "Rent"});

        let result =
            create_transaction_endpoint(State(state.clone()), CookieJar::new(), Ok(Json(form(body))))
                .await;

        let Err(Error::Validation(errors)) = result else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(
            count_transactions(&state.db_connection.lock().unwrap()).unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn storage_failure_is_sql_error() {
        let state = get_test_state();
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE transactions", ())
            .unwrap();
        let body = json!({"title": "Salary", "amount": 1000, "type": "credit"});

        let result =
            create_transaction_endpoint(State(state), CookieJar::new(), Ok(Json(form(body))))
                .await;

        assert!(matches!(result, Err(Error::SqlError(_))));
    }
}
