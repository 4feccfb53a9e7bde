use crate::{Allocation, Result};

/// Issues identifiers: reads the issued set, allocates, and persists, as one
/// operation that never hands out the same identifier twice.
pub trait IdIssuer: Send + Sync {
    /// Issues the next identifier for `category` and persists it.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCategory`](crate::Error::UnknownCategory) if the
    ///   prefix table rejects the category.
    /// - [`Error::Store`](crate::Error::Store) if the issued set cannot be
    ///   read or the new identifier cannot be written.
    /// - Implementation specific errors (lock poisoning, retry exhaustion).
    fn try_issue(&self, category: &str) -> Result<Allocation>;
}

impl<T: IdIssuer + ?Sized> IdIssuer for Box<T> {
    fn try_issue(&self, category: &str) -> Result<Allocation> {
        (**self).try_issue(category)
    }
}

impl<T: IdIssuer + ?Sized> IdIssuer for std::sync::Arc<T> {
    fn try_issue(&self, category: &str) -> Result<Allocation> {
        (**self).try_issue(category)
    }
}
