#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Allocation, BasicAllocator, CalendarSource, Error, IdIssuer, IdentifierStore, Result,
    next_in_partition,
};

/// An issuer that relies on the store's uniqueness constraint.
///
/// No lock is taken. Each attempt re-reads the partition, allocates one past
/// its maximum, and inserts. When the insert reports
/// [`StoreError::Conflict`](crate::StoreError::Conflict) another writer won
/// the race; the attempt is repeated against a fresh read, up to
/// `max_attempts` times.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Works with several independent writers sharing one store
///
/// ## Recommended When
/// - Multiple processes or instances issue into the same store
/// - The store rejects duplicate keys
///
/// ## See Also
/// - [`LockIssuer`](crate::LockIssuer)
pub struct RetryIssuer<S, C> {
    allocator: BasicAllocator<C>,
    store: S,
    max_attempts: u32,
}

impl<S, C> RetryIssuer<S, C>
where
    S: IdentifierStore,
    C: CalendarSource,
{
    /// Attempts made before giving up when no limit is given.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

    pub fn new(allocator: BasicAllocator<C>, store: S) -> Self {
        Self::with_max_attempts(allocator, store, Self::DEFAULT_MAX_ATTEMPTS)
    }

    /// Creates an issuer that gives up after `max_attempts` conflicts. A
    /// value of zero is treated as one.
    pub fn with_max_attempts(allocator: BasicAllocator<C>, store: S, max_attempts: u32) -> Self {
        Self {
            allocator,
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Issues the next identifier for `category`, retrying on conflicts.
    ///
    /// # Errors
    ///
    /// - The category is rejected by the prefix table.
    /// - A store read fails, or a write fails with anything but a conflict.
    /// - [`Error::RetriesExhausted`] if every attempt conflicted.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_issue(&self, category: &str) -> Result<Allocation> {
        let mut last_partition = None;

        for _attempt in 1..=self.max_attempts {
            // Re-resolved per attempt so a month boundary mid-retry moves on
            // to the new partition.
            let (partition, prefix_source) = self.allocator.partition_for(category)?;
            let issued = self.store.list_with_prefix(&partition.key())?;
            let id = next_in_partition(&partition, &issued)?;

            match self.store.insert(&id) {
                Ok(()) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(id = %id, attempt = _attempt, ?prefix_source, "issued identifier");
                    return Ok(Allocation { id, prefix_source });
                }
                Err(e) if e.is_conflict() => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(id = %id, attempt = _attempt, "identifier taken concurrently, retrying");
                    last_partition = Some(partition);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(Error::RetriesExhausted {
            partition: last_partition.map(|p| p.to_string()).unwrap_or_default(),
            attempts: self.max_attempts,
        })
    }
}

impl<S, C> IdIssuer for RetryIssuer<S, C>
where
    S: IdentifierStore,
    C: CalendarSource + Send + Sync,
{
    fn try_issue(&self, category: &str) -> Result<Allocation> {
        self.try_issue(category)
    }
}
