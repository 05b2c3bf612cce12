//! The API endpoint URIs.

/// The liveness probe.
pub const HEALTH: &str = "/health";
/// The route to list and create expenses.
pub const EXPENSES: &str = "/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";
/// The route for totals over all expenses.
pub const INSIGHTS_SUMMARY: &str = "/insights/summary";
/// The route for per-category totals within a window.
pub const INSIGHTS_BY_CATEGORY: &str = "/insights/by-category";
/// The route for per-day totals within a window.
pub const INSIGHTS_OVER_TIME: &str = "/insights/over-time";
/// The route for both aggregates combined.
pub const INSIGHTS: &str = "/insights";
/// The route to upload a CSV file for importing expenses.
pub const IMPORT: &str = "/transactions/import";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::HEALTH);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::INSIGHTS_SUMMARY);
        assert_endpoint_is_valid_uri(endpoints::INSIGHTS_BY_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::INSIGHTS_OVER_TIME);
        assert_endpoint_is_valid_uri(endpoints::INSIGHTS);
        assert_endpoint_is_valid_uri(endpoints::IMPORT);
    }
}
