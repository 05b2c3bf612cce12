//! The endpoint for per-day spending totals.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    expense::encode_timestamp,
    insights::{RangeQuery, Window},
};

/// The summed spending for one UTC calendar date within a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTotal {
    /// The calendar date in `YYYY-MM-DD` form.
    pub date: String,
    /// The sum of amounts for expenses created on the date.
    pub total: f64,
}

/// Sum expense amounts by UTC calendar date for expenses created within
/// `window` of `now`, ordered by ascending date.
///
/// Dates with no expenses are omitted rather than zero-filled.
pub fn total_by_date(
    window: Window,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Vec<DateTotal>, Error> {
    let map_row = |row: &rusqlite::Row| {
        Ok(DateTotal {
            date: row.get(0)?,
            total: row.get(1)?,
        })
    };

    // Timestamps are stored as fixed-width UTC text, so the first ten
    // characters are the calendar date.
    let rows = match window.cutoff(now) {
        Some(cutoff) => connection
            .prepare(
                "SELECT substr(created_at, 1, 10) AS date, COALESCE(SUM(amount), 0.0) \
                FROM expenses \
                WHERE created_at >= ?1 \
                GROUP BY date \
                ORDER BY date ASC;",
            )?
            .query_map([encode_timestamp(cutoff)?], map_row)?
            .collect::<Result<Vec<_>, _>>(),
        None => connection
            .prepare(
                "SELECT substr(created_at, 1, 10) AS date, COALESCE(SUM(amount), 0.0) \
                FROM expenses \
                GROUP BY date \
                ORDER BY date ASC;",
            )?
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>(),
    }?;

    Ok(rows)
}

/// The state needed for the over-time endpoint.
#[derive(Debug, Clone)]
pub struct OverTimeState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for OverTimeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Report per-day totals for expenses within the requested window.
pub async fn get_over_time_endpoint(
    State(state): State<OverTimeState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, Error> {
    let window = query.window()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let totals = total_by_date(window, OffsetDateTime::now_utc(), &connection)?;

    Ok(Json(totals))
}
