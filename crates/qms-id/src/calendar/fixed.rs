use crate::{CalendarSource, YearMonth};

/// A calendar frozen on one month.
///
/// Useful for tests and for back-filling records into a past month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedCalendar(pub YearMonth);

impl CalendarSource for FixedCalendar {
    fn current_period(&self) -> YearMonth {
        self.0
    }
}
