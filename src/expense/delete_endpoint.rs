//! The endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{AppState, Error, expense::delete_expense};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete an expense by its ID.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    delete_expense(&expense_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod delete_expense_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{endpoints, expense::Expense, test_utils::new_test_server};

    #[tokio::test]
    async fn delete_expense_removes_it() {
        let (server, _) = new_test_server();
        let expense: Expense = server
            .post(endpoints::EXPENSES)
            .json(&json!({"name": "Coffee", "amount": 4.5}))
            .await
            .json();

        let response = server.delete(&format!("/expenses/{}", expense.id)).await;

        response.assert_status(StatusCode::NO_CONTENT);

        let expenses: Vec<Expense> = server.get(endpoints::EXPENSES).await.json();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_expense_returns_not_found() {
        let (server, _) = new_test_server();

        let response = server.delete("/expenses/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Expense not found");
    }
}
