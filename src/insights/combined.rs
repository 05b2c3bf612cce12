//! The endpoint that combines both windowed aggregates in one response.

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
    insights::{CategoryTotal, DateTotal, RangeQuery, total_by_category, total_by_date},
};

/// Both windowed aggregates, computed at the same instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// Per-category totals within the window.
    pub by_category: Vec<CategoryTotal>,
    /// Per-day totals within the window.
    pub over_time: Vec<DateTotal>,
}

/// The state needed for the combined insights endpoint.
#[derive(Debug, Clone)]
pub struct InsightsState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Report per-category and per-day totals for the requested window.
pub async fn get_insights_endpoint(
    State(state): State<InsightsState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, Error> {
    let window = query.window()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    // Evaluate both aggregates against the same instant so they describe the
    // same set of expenses.
    let now = OffsetDateTime::now_utc();

    let insights = Insights {
        by_category: total_by_category(window, now, &connection)?,
        over_time: total_by_date(window, now, &connection)?,
    };

    Ok(Json(insights))
}
