//! The endpoint for partially updating an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{ExpenseChanges, update_expense},
};

/// The state needed for updating an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Overwrite the fields present in the request body and return the updated
/// expense as JSON. Absent fields keep their prior values.
pub async fn update_expense_endpoint(
    State(state): State<UpdateExpenseState>,
    Path(expense_id): Path<String>,
    Json(changes): Json<ExpenseChanges>,
) -> Result<impl IntoResponse, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let expense = update_expense(&expense_id, changes, &connection)?;

    Ok(Json(expense))
}
