//! `GroupSpec` newtype for one group of a split

use crate::error::{Error, Result};
use crate::share::MAX_SHARE_COUNT;

/// Member threshold and member count for one group (each 1..=16)
///
/// Invariants enforced at construction: `1 <= threshold <= count <= 16`, and
/// a threshold of 1 only with a single member, since several 1-of-N members
/// would be indistinguishable copies of the group secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    member_threshold: u8,
    member_count: u8,
}

impl GroupSpec {
    /// Creates a group specification, validating both bounds
    ///
    /// # Errors
    /// Returns an error if the threshold or count is outside 1..=16, the
    /// threshold exceeds the count, or a 1-of-N group with N > 1 is requested
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splinter::GroupSpec;
    ///
    /// let group = GroupSpec::new(2, 3).unwrap();
    /// assert_eq!(group.member_threshold(), 2);
    /// assert_eq!(group.member_count(), 3);
    ///
    /// assert!(GroupSpec::new(0, 3).is_err());
    /// assert!(GroupSpec::new(4, 3).is_err());
    /// assert!(GroupSpec::new(1, 2).is_err());
    /// assert!(GroupSpec::new(2, 17).is_err());
    /// ```
    pub fn new(member_threshold: u8, member_count: u8) -> Result<Self> {
        if member_threshold < 1 || member_threshold > MAX_SHARE_COUNT {
            return Err(Error::InvalidInput(format!(
                "member threshold must be between 1 and {MAX_SHARE_COUNT}, got {member_threshold}"
            )));
        }
        if member_count < 1 || member_count > MAX_SHARE_COUNT {
            return Err(Error::InvalidInput(format!(
                "member count must be between 1 and {MAX_SHARE_COUNT}, got {member_count}"
            )));
        }
        if member_threshold > member_count {
            return Err(Error::InvalidInput(format!(
                "member threshold {member_threshold} cannot exceed member count {member_count}"
            )));
        }
        if member_threshold == 1 && member_count > 1 {
            return Err(Error::InvalidInput(
                "multiple member shares with member threshold 1 are not allowed; \
                 use 1-of-1 member sharing instead"
                    .into(),
            ));
        }
        Ok(Self {
            member_threshold,
            member_count,
        })
    }

    /// Gets the member threshold
    #[must_use]
    pub fn member_threshold(&self) -> u8 {
        self.member_threshold
    }

    /// Gets the member count
    #[must_use]
    pub fn member_count(&self) -> u8 {
        self.member_count
    }
}
