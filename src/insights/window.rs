//! The recency window shared by the insight endpoints.

use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use crate::Error;

/// The window applied when the `range` query parameter is omitted.
const DEFAULT_RANGE: &str = "30";

/// The query parameters accepted by the windowed insight endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    /// Either `"all"` or a non-negative number of days before now.
    pub range: Option<String>,
}

impl RangeQuery {
    /// Parse the `range` parameter, falling back to the last 30 days when it
    /// is omitted.
    ///
    /// # Errors
    /// Returns [Error::InvalidRange] if the parameter is neither `"all"` nor
    /// a non-negative integer.
    pub fn window(&self) -> Result<Window, Error> {
        Window::parse(self.range.as_deref().unwrap_or(DEFAULT_RANGE))
    }
}

/// A recency filter over expense creation timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Include every expense regardless of age.
    All,
    /// Include expenses created within the last N days.
    Days(u32),
}

impl Window {
    /// Parse a window from its query-parameter form.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        if raw == "all" {
            return Ok(Self::All);
        }

        raw.parse::<u32>()
            .map(Self::Days)
            .map_err(|_| Error::InvalidRange(raw.to_owned()))
    }

    /// The earliest creation timestamp included in the window, or `None` when
    /// the window is unbounded.
    ///
    /// A day count that reaches past the representable time range also yields
    /// `None`, since a cutoff earlier than every representable timestamp
    /// excludes nothing.
    pub fn cutoff(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        match self {
            Self::All => None,
            Self::Days(days) => now.checked_sub(Duration::days(i64::from(days))),
        }
    }
}

#[cfg(test)]
mod window_tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{RangeQuery, Window};

    #[test]
    fn parse_all() {
        assert_eq!(Window::parse("all"), Ok(Window::All));
    }

    #[test]
    fn parse_days() {
        assert_eq!(Window::parse("7"), Ok(Window::Days(7)));
        assert_eq!(Window::parse("0"), Ok(Window::Days(0)));
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in ["-1", "week", "7.5", "", "ALL"] {
            assert_eq!(Window::parse(raw), Err(Error::InvalidRange(raw.to_owned())));
        }
    }

    #[test]
    fn missing_range_defaults_to_thirty_days() {
        let query = RangeQuery::default();

        assert_eq!(query.window(), Ok(Window::Days(30)));
    }

    #[test]
    fn cutoff_with_huge_day_count_is_unbounded() {
        let now = datetime!(2025-06-15 12:00:00 UTC);

        assert_eq!(Window::Days(4_000_000_000).cutoff(now), None);
    }

    #[test]
    fn cutoff_subtracts_days() {
        let now = datetime!(2025-06-15 12:00:00 UTC);

        assert_eq!(
            Window::Days(7).cutoff(now),
            Some(datetime!(2025-06-08 12:00:00 UTC))
        );
        assert_eq!(Window::All.cutoff(now), None);
    }
}
