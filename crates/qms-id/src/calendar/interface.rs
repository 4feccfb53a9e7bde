use std::sync::Arc;

use crate::YearMonth;

/// A source of the current calendar month.
///
/// This abstraction lets you plug in the system clock pinned to a timezone,
/// or a fixed month in tests. Allocators never read wall-clock time
/// themselves.
///
/// # Example
///
/// ```
/// use qms_id::{CalendarSource, YearMonth};
///
/// struct October;
/// impl CalendarSource for October {
///     fn current_period(&self) -> YearMonth {
///         YearMonth::new(2025, 10).unwrap()
///     }
/// }
///
/// assert_eq!(October.current_period().to_string(), "2025-10");
/// ```
pub trait CalendarSource {
    /// Returns the month new identifiers are allocated in.
    fn current_period(&self) -> YearMonth;
}

impl<C: CalendarSource + ?Sized> CalendarSource for &C {
    fn current_period(&self) -> YearMonth {
        (**self).current_period()
    }
}

impl<C: CalendarSource + ?Sized> CalendarSource for Arc<C> {
    fn current_period(&self) -> YearMonth {
        (**self).current_period()
    }
}
