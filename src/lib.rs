//! Budget Insights is a personal finance tracking backend.
//!
//! This library provides a JSON REST API for recording expenses, editing and
//! removing them, aggregating them into summary/category/time-series views,
//! and bulk-importing them from CSV files.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod csv_import;
mod db;
mod endpoints;
mod expense;
mod insights;
mod routing;
mod state;
#[cfg(test)]
mod test_utils;

pub use db::initialize;
pub use routing::{build_cors_layer, build_router};
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for an expense name.
    #[error("Expense name cannot be empty")]
    EmptyExpenseName,

    /// A zero or negative amount was used for an expense.
    #[error("Expense amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// The `range` query parameter was neither "all" nor a non-negative
    /// number of days.
    #[error("range must be \"all\" or a non-negative number of days, got \"{0}\"")]
    InvalidRange(String),

    /// The uploaded file name does not end in `.csv`.
    #[error("Please upload a .csv file")]
    NotCsv,

    /// The CSV header row is missing one or more required columns.
    #[error("CSV must include columns: name, amount, category")]
    MissingCsvColumns,

    /// The multipart form could not be parsed as a file upload.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The requested expense could not be found.
    ///
    /// The client should check that the expense ID is correct and that the
    /// expense has been created. Internally, this error may occur when a
    /// query returns no rows.
    #[error("Expense not found")]
    NotFound,

    /// Tried to update an expense that does not exist.
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist.
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// A timestamp could not be formatted for storage or parsed back from the
    /// database.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Error::EmptyExpenseName
            | Error::NonPositiveAmount(_)
            | Error::InvalidRange(_)
            | Error::NotCsv
            | Error::MissingCsvColumns
            | Error::MultipartError(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::NotFound | Error::UpdateMissingExpense | Error::DeleteMissingExpense => {
                (StatusCode::NOT_FOUND, "Expense not found".to_owned())
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
