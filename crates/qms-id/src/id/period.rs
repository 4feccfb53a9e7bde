use core::{fmt, str::FromStr};

use chrono::Datelike;

use crate::{Error, Result};

/// A calendar month: the `YYYY-MM` segment of an identifier.
///
/// Years render as four zero-padded digits and months as two, so the string
/// form always has the fixed shape `YYYY-MM`. Ordering is chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct YearMonth {
    year: u16,
    month: u8,
}

impl YearMonth {
    /// Earliest representable period, `0000-01`.
    pub const MIN: Self = Self { year: 0, month: 1 };
    /// Latest representable period, `9999-12`.
    pub const MAX: Self = Self {
        year: 9999,
        month: 12,
    };

    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPeriod`] unless `year` is in `0..=9999` and
    /// `month` in `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(Error::InvalidPeriod {
                year: i64::from(year),
                month: i64::from(month),
            });
        }
        Ok(Self {
            year: year as u16,
            month: month as u8,
        })
    }

    /// Takes the year and month of any chrono date, clamping years outside
    /// `0..=9999` to [`YearMonth::MIN`] / [`YearMonth::MAX`].
    pub fn saturating_from<D: Datelike>(date: &D) -> Self {
        match date.year() {
            y if y < 0 => Self::MIN,
            y if y > 9999 => Self::MAX,
            y => Self {
                year: y as u16,
                month: date.month() as u8,
            },
        }
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parses the strict `YYYY-MM` form.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPeriod { year: -1, month: -1 };
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = parse_digits(year).ok_or_else(invalid)?;
        let month = parse_digits(month).ok_or_else(invalid)?;
        Self::new(year as i32, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(period: YearMonth) -> Self {
        period.to_string()
    }
}

/// Parses a run of ASCII digits; `None` for empty input, signs or overflow.
pub(crate) fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
