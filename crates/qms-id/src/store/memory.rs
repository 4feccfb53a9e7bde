use core::ops::Bound;
use std::collections::BTreeSet;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Identifier, IdentifierStore, StoreError,
    mutex::{Mutex, MutexGuard},
};

/// An in-process [`IdentifierStore`] backed by an ordered set.
///
/// Uniqueness is enforced on insert, and prefix listing is a range scan over
/// the ordered keys. The set is guarded by a mutex (std by default,
/// `parking_lot` with the `parking-lot` feature).
///
/// # Example
///
/// ```
/// use qms_id::{IdentifierStore, MemoryStore};
///
/// let store = MemoryStore::with_issued(["CCFS-2025-10-001", "CCNFS-2025-10-001"]);
/// let listed = store.list_with_prefix("CCFS-2025-10-").unwrap();
/// assert_eq!(listed, vec!["CCFS-2025-10-001".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    issued: Mutex<BTreeSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw entries, malformed legacy strings included.
    pub fn with_issued<I, S>(issued: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            issued: Mutex::new(issued.into_iter().map(Into::into).collect()),
        }
    }

    /// Copies every stored entry, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn snapshot(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.iter().cloned().collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeSet<String>>, StoreError> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.issued.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.issued.lock()?)
        }
    }
}

impl IdentifierStore for MemoryStore {
    fn list_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let issued = self.lock()?;
        Ok(issued
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|id| id.starts_with(prefix))
            .cloned()
            .collect())
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(id = %id)))]
    fn insert(&self, id: &Identifier) -> Result<(), StoreError> {
        let id = id.to_string();
        let mut issued = self.lock()?;
        if issued.contains(&id) {
            return Err(StoreError::Conflict { id });
        }
        issued.insert(id);
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }
}
