//! The endpoint for importing expenses from an uploaded CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Multipart, State, multipart::Field},
    response::IntoResponse,
};
use rusqlite::{Connection, params};
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    csv_import::parse_expenses_csv,
    expense::{Expense, encode_timestamp},
};

/// The state needed for importing expenses.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Import expenses from an uploaded CSV file and report how many rows were
/// inserted.
///
/// The file must be named with a `.csv` extension and its header row must
/// contain the columns `name`, `amount` and `category`. Rows are validated
/// independently, so a bad row is skipped rather than failing the import.
pub async fn import_expenses_endpoint(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let field = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
        .ok_or_else(|| Error::MultipartError("expected a file upload field".to_owned()))?;

    let csv_text = read_csv_field(field).await?;

    let expenses = parse_expenses_csv(&csv_text, OffsetDateTime::now_utc())?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let inserted = insert_expense_batch(&expenses, &connection)?;

    tracing::info!("imported {inserted} expenses from CSV upload");

    Ok(Json(json!({ "inserted": inserted })))
}

/// Check the uploaded file's name and decode its bytes as UTF-8, substituting
/// the replacement character for invalid sequences.
async fn read_csv_field(field: Field<'_>) -> Result<String, Error> {
    let file_name = field
        .file_name()
        .ok_or_else(|| {
            Error::MultipartError("could not get file name from upload field".to_owned())
        })?
        .to_owned();

    if !file_name.to_lowercase().ends_with(".csv") {
        return Err(Error::NotCsv);
    }

    let bytes = field.bytes().await.map_err(|error| {
        tracing::error!("could not read data from multipart form field: {error}");
        Error::MultipartError("could not read data from upload field".to_owned())
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Insert the parsed expenses in a single transaction so an import is
/// all-or-nothing once row validation has already happened.
fn insert_expense_batch(expenses: &[Expense], connection: &Connection) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    {
        let mut statement = tx.prepare(
            "INSERT INTO expenses (id, name, amount, category, created_at) \
            VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for expense in expenses {
            statement.execute(params![
                expense.id,
                expense.name,
                expense.amount,
                expense.category,
                encode_timestamp(expense.created_at)?,
            ])?;
        }
    }

    tx.commit()?;

    Ok(expenses.len())
}
