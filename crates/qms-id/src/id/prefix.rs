use core::{fmt, str::FromStr};

use crate::{Error, Result};

/// The leading segment of an identifier, naming a category or organization
/// (e.g. `CCFS`).
///
/// A prefix is 1 to [`Prefix::MAX_LEN`] ASCII uppercase letters or digits. It
/// can never contain `-`, which keeps every identifier unambiguously
/// hyphen-delimited.
///
/// # Example
///
/// ```
/// use qms_id::Prefix;
///
/// let prefix: Prefix = "CCFS".parse().unwrap();
/// assert_eq!(prefix.as_str(), "CCFS");
/// assert!(Prefix::new("ccfs").is_err());
/// assert!(Prefix::new("CC-FS").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Prefix(String);

impl Prefix {
    /// Longest accepted prefix, in bytes.
    pub const MAX_LEN: usize = 16;

    /// Validates and wraps a prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrefix`] if the value is empty, longer than
    /// [`Prefix::MAX_LEN`], or contains anything but `A-Z` and `0-9`.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if let Some(reason) = Self::violation(&value) {
            return Err(Error::InvalidPrefix {
                prefix: value,
                reason,
            });
        }
        Ok(Self(value))
    }

    /// Wraps a prefix literal known to be valid.
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(Self::violation(value).is_none(), "invalid prefix literal {value}");
        Self(value.to_owned())
    }

    fn violation(value: &str) -> Option<&'static str> {
        if value.is_empty() {
            return Some("must not be empty");
        }
        if value.len() > Self::MAX_LEN {
            return Some("longer than 16 characters");
        }
        if !value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Some("only A-Z and 0-9 are allowed");
        }
        None
    }

    /// Returns the prefix as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Prefix {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Prefix {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Prefix> for String {
    fn from(prefix: Prefix) -> Self {
        prefix.0
    }
}
