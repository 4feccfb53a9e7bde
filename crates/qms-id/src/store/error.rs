/// Errors reported by an [`IdentifierStore`](crate::IdentifierStore).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The identifier is already persisted. Stores must enforce uniqueness
    /// so that racing writers are detected rather than duplicated.
    #[error("identifier {id} already issued")]
    Conflict { id: String },

    /// The backing store could not be reached or refused the operation.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// The store's lock was poisoned by a panicking writer.
    #[cfg(not(feature = "parking-lot"))]
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::mutex::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for StoreError {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
