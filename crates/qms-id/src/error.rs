use crate::store::StoreError;

/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `qms-id` can emit.
///
/// Malformed identifiers found in an issued set are *not* errors: the
/// allocator skips them when computing the next sequence. Only identifiers a
/// caller explicitly asks to parse surface as
/// [`Error::MalformedIdentifier`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A prefix was empty, too long, or contained characters other than ASCII
    /// uppercase letters and digits.
    #[error("invalid prefix '{prefix}': {reason}")]
    InvalidPrefix {
        prefix: String,
        reason: &'static str,
    },

    /// A year/month pair was outside `0000-01..=9999-12`.
    #[error("invalid period {year}-{month}")]
    InvalidPeriod { year: i64, month: i64 },

    /// The category has no mapping and the table rejects unknown categories.
    #[error("unknown category '{category}'")]
    UnknownCategory { category: String },

    /// Two table entries normalize to the same category key.
    #[error("duplicate category '{category}'")]
    DuplicateCategory { category: String },

    /// A string handed to the parser is not a canonical identifier.
    #[error("malformed identifier '{input}': {reason}")]
    MalformedIdentifier {
        input: String,
        reason: &'static str,
    },

    /// Every sequence number representable in the partition is taken.
    #[error("sequence exhausted in partition {partition}")]
    SequenceExhausted { partition: String },

    /// The store kept reporting conflicts after every retry.
    #[error("gave up issuing in partition {partition} after {attempts} attempts")]
    RetriesExhausted { partition: String, attempts: u32 },

    /// The issuer lock was **poisoned** by a panicking writer.
    ///
    /// When the `parking-lot` feature is enabled, mutexes do **not** poison,
    /// so this variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("issuer lock poisoned")]
    LockPoisoned,

    /// The identifier store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// Returns true if the caller supplied bad input rather than the system
    /// failing.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidPrefix { .. }
                | Self::InvalidPeriod { .. }
                | Self::UnknownCategory { .. }
                | Self::DuplicateCategory { .. }
                | Self::MalformedIdentifier { .. }
        )
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::mutex::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
