use std::sync::Arc;

use crate::{Identifier, StoreError};

/// Persistence for issued identifiers.
///
/// The store is the system of record: allocators hold no counters and derive
/// the next sequence from what [`list_with_prefix`](Self::list_with_prefix)
/// returns. [`insert`](Self::insert) must enforce uniqueness and report a
/// duplicate as [`StoreError::Conflict`].
///
/// Entries are raw strings because stores may hold legacy or malformed
/// identifiers; allocators tolerate those.
pub trait IdentifierStore: Send + Sync {
    /// Returns every issued identifier whose string starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read. Callers must not
    /// allocate from a failed or partial read.
    fn list_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Persists a newly issued identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if it is already present.
    fn insert(&self, id: &Identifier) -> Result<(), StoreError>;

    /// Number of stored identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn len(&self) -> Result<usize, StoreError>;

    /// Returns true if the store is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl<S: IdentifierStore + ?Sized> IdentifierStore for Arc<S> {
    fn list_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).list_with_prefix(prefix)
    }

    fn insert(&self, id: &Identifier) -> Result<(), StoreError> {
        (**self).insert(id)
    }

    fn len(&self) -> Result<usize, StoreError> {
        (**self).len()
    }
}
