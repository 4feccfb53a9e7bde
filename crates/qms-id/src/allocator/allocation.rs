use crate::{Identifier, PrefixSource};

/// A freshly computed identifier and how its prefix was chosen.
///
/// Nothing is persisted yet; storing [`Allocation::id`] is the caller's (or
/// an [`IdIssuer`](crate::IdIssuer)'s) job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub id: Identifier,
    pub prefix_source: PrefixSource,
}

impl Allocation {
    /// Returns true if the category was unknown and the fallback prefix was
    /// used.
    pub fn used_fallback(&self) -> bool {
        self.prefix_source == PrefixSource::Fallback
    }
}
