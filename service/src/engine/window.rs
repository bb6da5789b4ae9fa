//! Date [`Window`]s the calendar is looked through.

use common::DateTime;

/// Number of months a calendar [`Window`] is extended by on both sides by
/// default.
pub const DEFAULT_BUFFER_MONTHS: u8 = 1;

/// Half-open range of [`DateTime`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    /// Beginning of this [`Window`].
    start: DateTime,

    /// Exclusive end of this [`Window`].
    end: DateTime,
}

impl Window {
    /// Creates a new [`Window`] from `start` until `end`.
    ///
    /// [`None`] is returned if `end` precedes `start`.
    #[must_use]
    pub fn new(start: DateTime, end: DateTime) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Returns the beginning of this [`Window`].
    #[must_use]
    pub const fn start(&self) -> DateTime {
        self.start
    }

    /// Returns the exclusive end of this [`Window`].
    #[must_use]
    pub const fn end(&self) -> DateTime {
        self.end
    }

    /// Indicates whether a period from `start` until `end` intersects this
    /// [`Window`].
    #[must_use]
    pub fn overlaps(&self, start: DateTime, end: DateTime) -> bool {
        start < self.end && end > self.start
    }
}

/// Extends the provided [`Window`] by the given number of calendar `months`
/// on both sides.
///
/// Day of month is clamped to the length of the resulting month. A side that
/// would leave the supported date range is kept as is.
#[must_use]
pub fn buffered(window: Window, months: u8) -> Window {
    let months = i32::from(months);
    Window {
        start: window
            .start
            .checked_sub_months(months)
            .unwrap_or(window.start),
        end: window.end.checked_add_months(months).unwrap_or(window.end),
    }
}

/// Extends the range from `start` until `end` by
/// [`DEFAULT_BUFFER_MONTHS`] on both sides.
#[must_use]
pub fn buffered_range(start: DateTime, end: DateTime) -> (DateTime, DateTime) {
    let window = buffered(Window { start, end }, DEFAULT_BUFFER_MONTHS);
    (window.start, window.end)
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use super::{buffered, buffered_range, Window};

    fn dt(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn window(start: &str, end: &str) -> Window {
        Window::new(dt(start), dt(end)).unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        assert!(Window::new(dt("2024-02-01T00:00:00Z"), dt("2024-01-01T00:00:00Z"))
            .is_none());
    }

    #[test]
    fn buffers_by_a_month() {
        assert_eq!(
            buffered_range(
                dt("2024-01-15T00:00:00Z"),
                dt("2024-01-20T00:00:00Z"),
            ),
            (dt("2023-12-15T00:00:00Z"), dt("2024-02-20T00:00:00Z")),
        );
    }

    #[test]
    fn clamps_month_overflow() {
        let w = buffered(
            window("2024-03-31T00:00:00Z", "2024-03-31T00:00:00Z"),
            1,
        );

        assert_eq!(w.start(), dt("2024-02-29T00:00:00Z"));
        assert_eq!(w.end(), dt("2024-04-30T00:00:00Z"));

        let (start, _) = buffered_range(
            dt("2024-01-31T00:00:00Z"),
            dt("2024-02-01T00:00:00Z"),
        );
        assert_eq!(start, dt("2023-12-31T00:00:00Z"));
    }

    #[test]
    fn buffers_by_configured_months() {
        let w = buffered(window("2024-01-15T00:00:00Z", "2024-01-20T00:00:00Z"), 3);

        assert_eq!(w.start(), dt("2023-10-15T00:00:00Z"));
        assert_eq!(w.end(), dt("2024-04-20T00:00:00Z"));
        assert_eq!(
            buffered(window("2024-01-15T00:00:00Z", "2024-01-20T00:00:00Z"), 0),
            window("2024-01-15T00:00:00Z", "2024-01-20T00:00:00Z"),
        );
    }

    #[test]
    fn detects_overlaps() {
        let w = window("2024-01-10T00:00:00Z", "2024-01-20T00:00:00Z");

        // Straddling either boundary.
        assert!(w.overlaps(dt("2024-01-01T00:00:00Z"), dt("2024-01-11T00:00:00Z")));
        assert!(w.overlaps(dt("2024-01-19T00:00:00Z"), dt("2024-02-01T00:00:00Z")));
        // Enclosing the whole window.
        assert!(w.overlaps(dt("2023-01-01T00:00:00Z"), dt("2025-01-01T00:00:00Z")));
        // Touching boundaries only.
        assert!(!w.overlaps(dt("2024-01-01T00:00:00Z"), dt("2024-01-10T00:00:00Z")));
        assert!(!w.overlaps(dt("2024-01-20T00:00:00Z"), dt("2024-01-25T00:00:00Z")));
    }
}
