//! The endpoint for listing all recorded expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{AppState, Error, expense::get_all_expenses};

/// The state needed for listing expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List every recorded expense as JSON, newest first.
pub async fn get_expenses_endpoint(
    State(state): State<ListExpensesState>,
) -> Result<impl IntoResponse, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let expenses = get_all_expenses(&connection)?;

    Ok(Json(expenses))
}

#[cfg(test)]
mod get_expenses_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{endpoints, expense::Expense, test_utils::new_test_server};

    #[tokio::test]
    async fn list_expenses_returns_empty_array_for_fresh_database() {
        let (server, _) = new_test_server();

        let response = server.get(endpoints::EXPENSES).await;

        response.assert_status(StatusCode::OK);
        let expenses: Vec<Expense> = response.json();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn list_expenses_returns_newest_first() {
        let (server, _) = new_test_server();

        for name in ["first", "second", "third"] {
            server
                .post(endpoints::EXPENSES)
                .json(&json!({"name": name, "amount": 1.0}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get(endpoints::EXPENSES).await;

        response.assert_status(StatusCode::OK);
        let expenses: Vec<Expense> = response.json();
        assert_eq!(expenses.len(), 3);
        assert!(
            expenses
                .windows(2)
                .all(|pair| pair[0].created_at >= pair[1].created_at)
        );
    }
}
