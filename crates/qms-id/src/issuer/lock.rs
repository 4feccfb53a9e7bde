#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Allocation, BasicAllocator, CalendarSource, IdIssuer, IdentifierStore, Result,
    mutex::Mutex, next_in_partition,
};

/// A lock-based issuer that serializes read-max-then-persist.
///
/// One mutex is held across listing the partition, computing the next
/// sequence, and inserting it, so two callers never allocate against the
/// same snapshot.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ No retries: every call costs one read and one write
///
/// ## Recommended When
/// - This issuer is the only writer of the store
/// - The store cannot enforce uniqueness on its own
///
/// ## See Also
/// - [`RetryIssuer`](crate::RetryIssuer)
///
/// # Example
///
/// ```
/// use qms_id::{
///     BasicAllocator, FixedCalendar, IdIssuer, LockIssuer, MemoryStore, PrefixTable, YearMonth,
/// };
///
/// let allocator = BasicAllocator::new(
///     PrefixTable::complaints(),
///     FixedCalendar(YearMonth::new(2025, 10)?),
/// );
/// let issuer = LockIssuer::new(allocator, MemoryStore::with_issued(["CCFS-2025-10-001"]));
///
/// let issued = issuer.try_issue("food-safety")?;
/// assert_eq!(issued.id.to_string(), "CCFS-2025-10-002");
/// # Ok::<(), qms_id::Error>(())
/// ```
pub struct LockIssuer<S, C> {
    allocator: BasicAllocator<C>,
    store: S,
    writer: Mutex<()>,
}

impl<S, C> LockIssuer<S, C>
where
    S: IdentifierStore,
    C: CalendarSource,
{
    pub fn new(allocator: BasicAllocator<C>, store: S) -> Self {
        Self {
            allocator,
            store,
            writer: Mutex::new(()),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn allocator(&self) -> &BasicAllocator<C> {
        &self.allocator
    }

    /// Issues the next identifier for `category` under the writer lock.
    ///
    /// # Errors
    ///
    /// - The category is rejected by the prefix table.
    /// - The store read or write fails. A conflict here means another writer
    ///   bypassed this issuer and is reported as a store error.
    /// - The writer lock is poisoned (std mutex only).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_issue(&self, category: &str) -> Result<Allocation> {
        let (partition, prefix_source) = self.allocator.partition_for(category)?;

        let _writer = {
            #[cfg(feature = "parking-lot")]
            {
                self.writer.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.writer.lock()?
            }
        };

        let issued = self.store.list_with_prefix(&partition.key())?;
        let id = next_in_partition(&partition, &issued)?;
        if let Err(e) = self.store.insert(&id) {
            #[cfg(feature = "tracing")]
            tracing::warn!(id = %id, error = %e, "insert failed under writer lock");
            return Err(e.into());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(id = %id, ?prefix_source, "issued identifier");
        Ok(Allocation { id, prefix_source })
    }
}

impl<S, C> IdIssuer for LockIssuer<S, C>
where
    S: IdentifierStore,
    C: CalendarSource + Send + Sync,
{
    fn try_issue(&self, category: &str) -> Result<Allocation> {
        self.try_issue(category)
    }
}
