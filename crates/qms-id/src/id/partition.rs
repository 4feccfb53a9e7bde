use core::fmt;

use crate::id::{Prefix, YearMonth, sequence};

/// The `(prefix, year, month)` scope that owns a sequence counter.
///
/// Sequence numbers are unique and monotonic inside one partition and never
/// shared across partitions. The partition's [`key`](Partition::key) is the
/// literal `PREFIX-YYYY-MM-` string every identifier in it starts with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Partition {
    prefix: Prefix,
    period: YearMonth,
}

impl Partition {
    pub const fn new(prefix: Prefix, period: YearMonth) -> Self {
        Self { prefix, period }
    }

    pub const fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub const fn period(&self) -> YearMonth {
        self.period
    }

    /// The literal `PREFIX-YYYY-MM-` string, trailing hyphen included.
    pub fn key(&self) -> String {
        format!("{}-{}-", self.prefix, self.period)
    }

    /// Returns the sequence number of `candidate` if it belongs to this
    /// partition and ends in a canonical suffix.
    ///
    /// Membership is a plain string-prefix test against [`Self::key`]. The
    /// suffix is the last `-`-delimited segment after the key, so legacy
    /// members like `CCFS-2025-10-LEGACY-007` count as `7`. Members whose last
    /// segment is malformed yield `None`.
    pub fn sequence_of(&self, candidate: &str) -> Option<u32> {
        self.sequence_after_key(&self.key(), candidate)
    }

    pub(crate) fn sequence_after_key(&self, key: &str, candidate: &str) -> Option<u32> {
        candidate
            .strip_prefix(key)
            .and_then(sequence::parse_trailing_segment)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.period)
    }
}
