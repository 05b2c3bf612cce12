//! The endpoint for per-category spending totals.

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

/// The summed spending for one category within a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The expense category.
    pub category: String,
    /// The sum of amounts for the category within the window.
    pub total: f64,
}

/// Sum expense amounts by category for expenses created within `window` of
/// `now`, ordered by descending total.
pub fn total_by_category(
    window: Window,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    let map_row = |row: &rusqlite::Row| {
        Ok(CategoryTotal {
            category: row.get(0)?,
            total: row.get(1)?,
        })
    };

    let rows = match window.cutoff(now) {
        Some(cutoff) => connection
            .prepare(
                "SELECT category, COALESCE(SUM(amount), 0.0) FROM expenses \
                WHERE created_at >= ?1 \
                GROUP BY category \
                ORDER BY SUM(amount) DESC;",
            )?
            .query_map([encode_timestamp(cutoff)?], map_row)?
            .collect::<Result<Vec<_>, _>>(),
        None => connection
            .prepare(
                "SELECT category, COALESCE(SUM(amount), 0.0) FROM expenses \
                GROUP BY category \
                ORDER BY SUM(amount) DESC;",
            )?
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>(),
    }?;

    Ok(rows)
}

/// The state needed for the by-category endpoint.
#[derive(Debug, Clone)]
pub struct ByCategoryState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ByCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Report per-category totals for expenses within the requested window.
pub async fn get_by_category_endpoint(
    State(state): State<ByCategoryState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, Error> {
    let window = query.window()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let totals = total_by_category(window, OffsetDateTime::now_utc(), &connection)?;

    Ok(Json(totals))
}
