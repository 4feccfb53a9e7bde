use core::{fmt, str::FromStr};

use crate::{
    Error, Result,
    id::{Partition, Prefix, YearMonth, period, sequence},
};

/// A record identifier of the form `PREFIX-YYYY-MM-NNN`.
///
/// `NNN` is the sequence number within the [`Partition`], zero-padded to a
/// *minimum* of three digits: `001` … `999`, then `1000`, `1001`, … Padding
/// never truncates. The string form is the external contract shown to users,
/// printed on documents and embedded in URLs.
///
/// # Example
///
/// ```
/// use qms_id::Identifier;
///
/// let id: Identifier = "CCFS-2025-10-003".parse().unwrap();
/// assert_eq!(id.sequence(), 3);
/// assert_eq!(id.partition().key(), "CCFS-2025-10-");
/// assert_eq!(id.to_string(), "CCFS-2025-10-003");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Identifier {
    partition: Partition,
    sequence: u32,
}

impl Identifier {
    /// Creates an identifier in `partition`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIdentifier`] if `sequence` is zero; sequences
    /// start at 1.
    pub fn new(partition: Partition, sequence: u32) -> Result<Self> {
        if sequence == 0 {
            return Err(Error::MalformedIdentifier {
                input: format!("{}-000", partition),
                reason: "sequence numbers start at 1",
            });
        }
        Ok(Self {
            partition,
            sequence,
        })
    }

    /// The first identifier of a partition.
    pub(crate) const fn first(partition: Partition) -> Self {
        Self {
            partition,
            sequence: 1,
        }
    }

    pub const fn partition(&self) -> &Partition {
        &self.partition
    }

    pub const fn prefix(&self) -> &Prefix {
        self.partition.prefix()
    }

    pub const fn period(&self) -> YearMonth {
        self.partition.period()
    }

    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The next identifier in the same partition, or `None` at `u32::MAX`.
    pub fn successor(&self) -> Option<Self> {
        let sequence = self.sequence.checked_add(1)?;
        Some(Self {
            partition: self.partition.clone(),
            sequence,
        })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:0width$}",
            self.partition,
            self.sequence,
            width = sequence::MIN_WIDTH
        )
    }
}

impl FromStr for Identifier {
    type Err = Error;

    /// Parses the canonical `PREFIX-YYYY-MM-NNN` form.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = |reason| Error::MalformedIdentifier {
            input: s.to_owned(),
            reason,
        };

        let mut parts = s.splitn(4, '-');
        let (Some(prefix), Some(year), Some(month), Some(suffix)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("expected PREFIX-YYYY-MM-NNN"));
        };

        let prefix = Prefix::new(prefix).map_err(|_| malformed("invalid prefix"))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(malformed("period must be YYYY-MM"));
        }
        let period = match (period::parse_digits(year), period::parse_digits(month)) {
            (Some(y), Some(m)) => {
                YearMonth::new(y as i32, m).map_err(|_| malformed("month out of range"))?
            }
            _ => return Err(malformed("period must be YYYY-MM")),
        };
        let sequence = sequence::parse_suffix(suffix)
            .ok_or_else(|| malformed("sequence must be at least 3 digits, no extra leading zeros"))?;
        if sequence == 0 {
            return Err(malformed("sequence numbers start at 1"));
        }

        Ok(Self {
            partition: Partition::new(prefix, period),
            sequence,
        })
    }
}

impl TryFrom<String> for Identifier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition() -> Partition {
        Partition::new(
            Prefix::new("CCFS").unwrap(),
            YearMonth::new(2025, 10).unwrap(),
        )
    }

    #[test]
    fn pads_to_minimum_width() {
        let p = partition();
        assert_eq!(Identifier::new(p.clone(), 1).unwrap().to_string(), "CCFS-2025-10-001");
        assert_eq!(Identifier::new(p.clone(), 42).unwrap().to_string(), "CCFS-2025-10-042");
        assert_eq!(Identifier::new(p.clone(), 999).unwrap().to_string(), "CCFS-2025-10-999");
        assert_eq!(Identifier::new(p, 1000).unwrap().to_string(), "CCFS-2025-10-1000");
    }

    #[test]
    fn zero_sequence_is_rejected() {
        assert!(Identifier::new(partition(), 0).is_err());
        assert!("CCFS-2025-10-000".parse::<Identifier>().is_err());
    }

    #[test]
    fn parses_canonical_strings() {
        for s in ["CCFS-2025-10-001", "CCNFS-2025-01-999", "RCA-0999-12-12345"] {
            let id: Identifier = s.parse().unwrap();
            assert_eq!(id.to_string(), s);
        }
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in [
            "",
            "CCFS",
            "CCFS-2025-10",
            "CCFS-2025-10-",
            "CCFS-2025-10-01",
            "CCFS-2025-10-0001",
            "CCFS-2025-10-abc",
            "CCFS-2025-10-003-x",
            "ccfs-2025-10-003",
            "CCFS-25-10-003",
            "CCFS-2025-1-003",
            "CCFS-2025-13-003",
            "CCFS-2025-00-003",
        ] {
            let err = bad.parse::<Identifier>().unwrap_err();
            assert!(
                matches!(err, Error::MalformedIdentifier { ref input, .. } if input == bad),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn successor_stays_in_partition() {
        let id = Identifier::new(partition(), 999).unwrap();
        let next = id.successor().unwrap();
        assert_eq!(next.to_string(), "CCFS-2025-10-1000");
        assert_eq!(next.partition(), id.partition());
        assert!(Identifier::new(partition(), u32::MAX).unwrap().successor().is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_string_form() {
        let id: Identifier = "CCFS-2025-10-003".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"CCFS-2025-10-003\"");
        assert_eq!(serde_json::from_str::<Identifier>(&json).unwrap(), id);
        assert!(serde_json::from_str::<Identifier>("\"CCFS-2025-10-3\"").is_err());
    }
}
