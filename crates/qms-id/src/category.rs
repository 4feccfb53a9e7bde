use std::collections::BTreeMap;

use crate::{Error, Prefix, Result};

/// What a [`PrefixTable`] does with a category it has no entry for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Unknown categories resolve to this prefix.
    DefaultPrefix(Prefix),
    /// Unknown categories fail with [`Error::UnknownCategory`].
    Reject,
}

/// How a prefix was chosen for a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PrefixSource {
    /// The category has an entry in the table.
    Mapped,
    /// The category is unknown and the fallback prefix was used.
    Fallback,
}

/// The outcome of resolving a category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub prefix: Prefix,
    pub source: PrefixSource,
}

/// Deterministic lookup from category keys to identifier prefixes.
///
/// Keys are compared after trimming surrounding whitespace and
/// ASCII-lowercasing, so `" Food-Safety "` and `"food-safety"` are the same
/// category. Unknown categories follow the table's [`FallbackPolicy`].
///
/// # Example
///
/// ```
/// use qms_id::{PrefixSource, PrefixTable};
///
/// let table = PrefixTable::complaints();
/// let food = table.resolve("food-safety").unwrap();
/// assert_eq!(food.prefix.as_str(), "CCFS");
///
/// let unknown = table.resolve("packaging").unwrap();
/// assert_eq!(unknown.prefix.as_str(), "CCNFS");
/// assert_eq!(unknown.source, PrefixSource::Fallback);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixTable {
    entries: BTreeMap<String, Prefix>,
    fallback: FallbackPolicy,
}

impl PrefixTable {
    /// Category key for food-safety complaints.
    pub const FOOD_SAFETY: &'static str = "food-safety";
    /// Category key for all other complaints.
    pub const NON_FOOD_SAFETY: &'static str = "non-food-safety";

    /// Builds a table from `(category, prefix)` pairs.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateCategory`] if two categories normalize to the same
    ///   key.
    /// - [`Error::InvalidPrefix`] if a prefix is invalid.
    pub fn new<I, K, P>(entries: I, fallback: FallbackPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: AsRef<str>,
        P: TryInto<Prefix, Error = Error>,
    {
        let mut map = BTreeMap::new();
        for (category, prefix) in entries {
            let key = normalize(category.as_ref());
            let prefix = prefix.try_into()?;
            if map.insert(key.clone(), prefix).is_some() {
                return Err(Error::DuplicateCategory { category: key });
            }
        }
        Ok(Self {
            entries: map,
            fallback,
        })
    }

    /// The complaint table: `food-safety` → `CCFS`, `non-food-safety` →
    /// `CCNFS`, anything else → `CCNFS`.
    pub fn complaints() -> Self {
        Self::complaints_with(FallbackPolicy::DefaultPrefix(Self::ccnfs()))
    }

    /// The complaint table with a caller-chosen fallback policy.
    pub fn complaints_with(fallback: FallbackPolicy) -> Self {
        let entries = BTreeMap::from([
            (Self::FOOD_SAFETY.to_owned(), Self::ccfs()),
            (Self::NON_FOOD_SAFETY.to_owned(), Self::ccnfs()),
        ]);
        Self { entries, fallback }
    }

    fn ccfs() -> Prefix {
        Prefix::from_static("CCFS")
    }

    fn ccnfs() -> Prefix {
        Prefix::from_static("CCNFS")
    }

    pub const fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    /// Iterates `(normalized category, prefix)` entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Prefix)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolves `category` to a prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCategory`] for an unknown category when the
    /// policy is [`FallbackPolicy::Reject`].
    pub fn resolve(&self, category: &str) -> Result<Resolution> {
        let key = normalize(category);
        if let Some(prefix) = self.entries.get(&key) {
            return Ok(Resolution {
                prefix: prefix.clone(),
                source: PrefixSource::Mapped,
            });
        }

        match &self.fallback {
            FallbackPolicy::DefaultPrefix(prefix) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(category = %key, prefix = %prefix, "unknown category, using fallback prefix");
                Ok(Resolution {
                    prefix: prefix.clone(),
                    source: PrefixSource::Fallback,
                })
            }
            FallbackPolicy::Reject => Err(Error::UnknownCategory { category: key }),
        }
    }

    /// Resolves the boolean food-safety flag older callers still send.
    pub fn resolve_flag(&self, food_safety: bool) -> Result<Resolution> {
        self.resolve(if food_safety {
            Self::FOOD_SAFETY
        } else {
            Self::NON_FOOD_SAFETY
        })
    }
}

fn normalize(category: &str) -> String {
    category.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complaint_table_maps_known_categories() {
        let table = PrefixTable::complaints();
        let food = table.resolve("food-safety").unwrap();
        assert_eq!(food.prefix.as_str(), "CCFS");
        assert_eq!(food.source, PrefixSource::Mapped);
        let other = table.resolve("non-food-safety").unwrap();
        assert_eq!(other.prefix.as_str(), "CCNFS");
        assert_eq!(other.source, PrefixSource::Mapped);
    }

    #[test]
    fn keys_are_normalized() {
        let table = PrefixTable::complaints();
        let resolved = table.resolve("  Food-SAFETY\t").unwrap();
        assert_eq!(resolved.prefix.as_str(), "CCFS");
        assert_eq!(resolved.source, PrefixSource::Mapped);
    }

    #[test]
    fn unknown_category_uses_named_fallback() {
        let table = PrefixTable::complaints();
        for category in ["", "packaging", "food safety"] {
            let resolved = table.resolve(category).unwrap();
            assert_eq!(resolved.prefix.as_str(), "CCNFS");
            assert_eq!(resolved.source, PrefixSource::Fallback);
        }
    }

    #[test]
    fn reject_policy_fails_unknown_categories() {
        let table = PrefixTable::complaints_with(FallbackPolicy::Reject);
        assert!(table.resolve("food-safety").is_ok());
        assert_eq!(
            table.resolve(" Packaging ").unwrap_err(),
            Error::UnknownCategory {
                category: "packaging".into()
            }
        );
    }

    #[test]
    fn flag_resolution() {
        let table = PrefixTable::complaints();
        assert_eq!(table.resolve_flag(true).unwrap().prefix.as_str(), "CCFS");
        assert_eq!(table.resolve_flag(false).unwrap().prefix.as_str(), "CCNFS");
    }

    #[test]
    fn custom_tables_validate_entries() {
        let table = PrefixTable::new(
            [("license", "LIC"), ("rca", "RCA")],
            FallbackPolicy::Reject,
        )
        .unwrap();
        assert_eq!(table.resolve("RCA").unwrap().prefix.as_str(), "RCA");
        assert_eq!(table.entries().count(), 2);

        let dup = PrefixTable::new([("rca", "RCA"), (" RCA", "RCA2")], FallbackPolicy::Reject);
        assert_eq!(
            dup.unwrap_err(),
            Error::DuplicateCategory {
                category: "rca".into()
            }
        );

        let bad = PrefixTable::new([("rca", "rca")], FallbackPolicy::Reject);
        assert!(matches!(bad.unwrap_err(), Error::InvalidPrefix { .. }));
    }
}
