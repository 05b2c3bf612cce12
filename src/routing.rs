//! Application router configuration and the CORS policy.

use axum::{
    Json, Router,
    http::{Method, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState,
    csv_import::import_expenses_endpoint,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expenses_endpoint,
        update_expense_endpoint,
    },
    insights::{
        get_by_category_endpoint, get_insights_endpoint, get_over_time_endpoint,
        get_summary_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::EXPENSES,
            get(get_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            patch(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(endpoints::INSIGHTS_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::INSIGHTS_BY_CATEGORY,
            get(get_by_category_endpoint),
        )
        .route(endpoints::INSIGHTS_OVER_TIME, get(get_over_time_endpoint))
        .route(endpoints::INSIGHTS, get(get_insights_endpoint))
        .route(endpoints::IMPORT, post(import_expenses_endpoint))
        .with_state(state)
}

/// The liveness probe.
async fn get_health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// Build the cross-origin policy for the configured origins.
///
/// A single `"*"` entry allows any origin, in which case credentialed
/// requests are disallowed since browsers reject the combination of a
/// wildcard origin and credentials.
///
/// # Panics
/// Panics at startup if any configured origin is not a valid header value,
/// since starting with a misconfigured CORS policy would lock clients out
/// silently.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<_> = origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .unwrap_or_else(|error| panic!("Invalid CORS origin '{origin}': {error}"))
        })
        .collect();

    layer.allow_origin(origins).allow_credentials(true)
}
