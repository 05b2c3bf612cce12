//! The endpoint for overall spending totals.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// Totals computed over every recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all expense amounts, 0.0 when there are no expenses.
    pub total_spent: f64,
    /// The number of recorded expenses.
    pub expense_count: i64,
    /// The mean expense amount, 0.0 when there are no expenses.
    pub avg_expense: f64,
}

/// Compute totals over all expenses. No recency window is applied.
pub fn summarize_expenses(connection: &Connection) -> Result<Summary, Error> {
    let (total_spent, expense_count) = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0.0), COUNT(id) FROM expenses",
        [],
        |row| Ok((row.get::<_, f64>(0)?, row.get::<_, i64>(1)?)),
    )?;

    let avg_expense = if expense_count > 0 {
        total_spent / expense_count as f64
    } else {
        0.0
    };

    Ok(Summary {
        total_spent,
        expense_count,
        avg_expense,
    })
}

/// The state needed for the summary endpoint.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Report the total, count and average over all recorded expenses.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
) -> Result<impl IntoResponse, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let summary = summarize_expenses(&connection)?;

    Ok(Json(summary))
}

#[cfg(test)]
mod summary_tests {
    use axum::http::StatusCode;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        db::initialize,
        endpoints,
        expense::{NewExpense, create_expense},
        test_utils::new_test_server,
    };

    use super::{Summary, summarize_expenses};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn summary_of_empty_table_is_all_zeroes() {
        let conn = get_test_connection();

        let summary = summarize_expenses(&conn).expect("could not summarize");

        assert_eq!(
            summary,
            Summary {
                total_spent: 0.0,
                expense_count: 0,
                avg_expense: 0.0,
            }
        );
    }

    #[test]
    fn summary_totals_match_inserted_amounts() {
        let conn = get_test_connection();
        for amount in [1.0, 2.0, 6.0] {
            create_expense(NewExpense::new("Coffee", amount, None).unwrap(), &conn).unwrap();
        }

        let summary = summarize_expenses(&conn).expect("could not summarize");

        assert_eq!(summary.total_spent, 9.0);
        assert_eq!(summary.expense_count, 3);
        assert_eq!(summary.avg_expense, 3.0);
    }

    #[tokio::test]
    async fn summary_endpoint_returns_totals() {
        let (server, _) = new_test_server();
        server
            .post(endpoints::EXPENSES)
            .json(&json!({"name": "Coffee", "amount": 4.5}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get(endpoints::INSIGHTS_SUMMARY).await;

        response.assert_status(StatusCode::OK);
        let summary: Summary = response.json();
        assert_eq!(summary.total_spent, 4.5);
        assert_eq!(summary.expense_count, 1);
        assert_eq!(summary.avg_expense, 4.5);
    }
}
