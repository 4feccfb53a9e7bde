use chrono::{FixedOffset, Offset, Utc};

use crate::{CalendarSource, YearMonth};

/// Wall-clock calendar pinned to a single fixed UTC offset.
///
/// Every instance configured with the same offset agrees on which month an
/// instant belongs to, so month partitions stay deterministic across hosts
/// regardless of each host's local timezone. The default offset is UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemCalendar {
    offset: FixedOffset,
}

impl Default for SystemCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl SystemCalendar {
    /// A calendar that partitions by UTC months.
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// A calendar that partitions by months at the given offset.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::FixedOffset;
    /// use qms_id::{CalendarSource, SystemCalendar};
    ///
    /// let ist: FixedOffset = "+05:30".parse().unwrap();
    /// let calendar = SystemCalendar::with_offset(ist);
    /// assert_eq!(calendar.offset(), ist);
    /// let _period = calendar.current_period();
    /// ```
    pub const fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl CalendarSource for SystemCalendar {
    fn current_period(&self) -> YearMonth {
        YearMonth::saturating_from(&Utc::now().with_timezone(&self.offset))
    }
}
