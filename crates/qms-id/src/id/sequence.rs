//! The canonical sequence-suffix rule.
//!
//! A suffix is canonical when it is all ASCII digits and either exactly
//! [`MIN_WIDTH`] wide, or wider with no leading zero (the widened form used
//! past 999). Everything else is legacy noise and contributes nothing to the
//! partition maximum.
//!
//! Inside a partition only the last `-`-delimited segment of a member counts,
//! so legacy members such as `CCFS-2025-10-LEGACY-007` still contribute `7`.

/// Minimum rendered width of a sequence number.
pub const MIN_WIDTH: usize = 3;

/// Parses a canonical suffix into its sequence number.
pub(crate) fn parse_suffix(suffix: &str) -> Option<u32> {
    let canonical_width = suffix.len() == MIN_WIDTH
        || (suffix.len() > MIN_WIDTH && !suffix.starts_with('0'));
    if !canonical_width {
        return None;
    }
    crate::id::period::parse_digits(suffix)
}

/// Parses the last `-`-delimited segment of the text following a partition
/// key.
pub(crate) fn parse_trailing_segment(rest: &str) -> Option<u32> {
    rest.rsplit('-').next().and_then(parse_suffix)
}
