//! The endpoint for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    expense::{NewExpense, create_expense},
};

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseBody {
    /// A text label describing the expense.
    pub name: String,
    /// The amount of money spent, must be greater than zero.
    pub amount: f64,
    /// The category the expense belongs to. Blank or missing categories
    /// become "General".
    pub category: Option<String>,
}

/// Record a new expense and return it as JSON with its generated ID and
/// creation timestamp.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Json(body): Json<CreateExpenseBody>,
) -> Result<impl IntoResponse, Error> {
    let new_expense = NewExpense::new(&body.name, body.amount, body.category.as_deref())?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let expense = create_expense(new_expense, &connection)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

#[cfg(test)]
mod create_expense_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints,
        expense::{Expense, get_expense},
        test_utils::new_test_server,
    };

    #[tokio::test]
    async fn create_expense_returns_created_with_expense() {
        let (server, state) = new_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({"name": "Coffee", "amount": 4.5, "category": "Food"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let expense: Expense = response.json();
        assert_eq!(expense.name, "Coffee");
        assert_eq!(expense.amount, 4.5);
        assert_eq!(expense.category, "Food");
        assert!(!expense.id.is_empty());

        let stored = get_expense(&expense.id, &state.db_connection.lock().unwrap())
            .expect("expense should be persisted");
        assert_eq!(stored, expense);
    }

    #[tokio::test]
    async fn create_expense_defaults_category() {
        let (server, _) = new_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({"name": "Coffee", "amount": 4.5}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let expense: Expense = response.json();
        assert_eq!(expense.category, "General");
    }

    #[tokio::test]
    async fn create_expense_fails_on_empty_name() {
        let (server, _) = new_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({"name": "   ", "amount": 4.5}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Expense name cannot be empty");
    }

    #[tokio::test]
    async fn create_expense_fails_on_non_positive_amount() {
        let (server, _) = new_test_server();

        for amount in [0.0, -12.34] {
            let response = server
                .post(endpoints::EXPENSES)
                .json(&json!({"name": "Coffee", "amount": amount}))
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
        }
    }
}
