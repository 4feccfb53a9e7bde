#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Allocation, CalendarSource, Error, Identifier, Partition, PrefixSource, PrefixTable, Result,
};

/// Computes the next identifier of `partition` from an issued set.
///
/// Entries are matched against the partition key with a plain string-prefix
/// test. Members whose last `-`-delimited segment is a canonical suffix
/// contribute its sequence number; all other members are skipped. The result is one past the
/// highest sequence found, or `001` if none was. Gaps are never filled.
///
/// # Errors
///
/// Returns [`Error::SequenceExhausted`] if the partition already holds
/// `u32::MAX`.
///
/// # Example
///
/// ```
/// use qms_id::{Partition, Prefix, YearMonth, next_in_partition};
///
/// let partition = Partition::new(Prefix::new("CCFS")?, YearMonth::new(2025, 10)?);
/// let issued = ["CCFS-2025-10-001", "CCFS-2025-10-002", "CCNFS-2025-10-005"];
/// let next = next_in_partition(&partition, issued)?;
/// assert_eq!(next.to_string(), "CCFS-2025-10-003");
/// # Ok::<(), qms_id::Error>(())
/// ```
pub fn next_in_partition<I, S>(partition: &Partition, issued: I) -> Result<Identifier>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let key = partition.key();
    let mut max = 0_u32;

    for candidate in issued {
        let candidate = candidate.as_ref();
        if !candidate.starts_with(key.as_str()) {
            continue;
        }
        match partition.sequence_after_key(&key, candidate) {
            Some(sequence) => max = max.max(sequence),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(candidate, partition = %partition, "skipping malformed identifier");
            }
        }
    }

    if max == 0 {
        return Ok(Identifier::first(partition.clone()));
    }
    let sequence = max.checked_add(1).ok_or_else(|| Error::SequenceExhausted {
        partition: partition.to_string(),
    })?;
    Identifier::new(partition.clone(), sequence)
}

/// Allocates the next identifier for `category`.
///
/// The prefix comes from `table`, the `YYYY-MM` period from `calendar`, and
/// the sequence from `issued` via [`next_in_partition`]. This is a pure
/// function: the same inputs give the same identifier, and nothing is
/// persisted.
///
/// # Errors
///
/// - [`Error::UnknownCategory`] if the table rejects the category.
/// - [`Error::SequenceExhausted`] if the partition is full.
pub fn allocate<I, S, C>(
    table: &PrefixTable,
    category: &str,
    issued: I,
    calendar: &C,
) -> Result<Allocation>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    C: CalendarSource + ?Sized,
{
    let resolution = table.resolve(category)?;
    let partition = Partition::new(resolution.prefix, calendar.current_period());
    let id = next_in_partition(&partition, issued)?;
    Ok(Allocation {
        id,
        prefix_source: resolution.source,
    })
}

/// A stateless allocator bound to a prefix table and a calendar.
///
/// It holds no counters. Every call recomputes the partition maximum from
/// the issued set it is given, so it is safe to share across threads. It
/// does **not** close the race between reading the issued set and persisting
/// the result; use an [`IdIssuer`](crate::IdIssuer) for that.
///
/// # Example
///
/// ```
/// use qms_id::{BasicAllocator, FixedCalendar, PrefixTable, YearMonth};
///
/// let allocator = BasicAllocator::new(
///     PrefixTable::complaints(),
///     FixedCalendar(YearMonth::new(2025, 1)?),
/// );
/// let allocation = allocator.allocate("non-food-safety", Vec::<String>::new())?;
/// assert_eq!(allocation.id.to_string(), "CCNFS-2025-01-001");
/// # Ok::<(), qms_id::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct BasicAllocator<C> {
    table: PrefixTable,
    calendar: C,
}

impl<C> BasicAllocator<C>
where
    C: CalendarSource,
{
    pub const fn new(table: PrefixTable, calendar: C) -> Self {
        Self { table, calendar }
    }

    pub const fn table(&self) -> &PrefixTable {
        &self.table
    }

    pub const fn calendar(&self) -> &C {
        &self.calendar
    }

    /// The partition `category` allocates into right now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCategory`] if the table rejects the category.
    pub fn partition_for(&self, category: &str) -> Result<(Partition, PrefixSource)> {
        let resolution = self.table.resolve(category)?;
        Ok((
            Partition::new(resolution.prefix, self.calendar.current_period()),
            resolution.source,
        ))
    }

    /// Allocates the next identifier for `category` given `issued`.
    ///
    /// # Errors
    ///
    /// See [`allocate`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, issued)))]
    pub fn allocate<I, S>(&self, category: &str, issued: I) -> Result<Allocation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        allocate(&self.table, category, issued, &self.calendar)
    }
}
