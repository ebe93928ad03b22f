//! Configuration validation for two-level secret splits

use crate::error::{Error, Result};
use crate::share::MAX_SHARE_COUNT;

use super::GroupSpec;

/// Validated pair of group threshold and group list
///
/// Enforces `1 <= group_threshold <= groups.len() <= 16` at the type level,
/// so a split can never require more groups than it creates.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    group_threshold: u8,
    groups: Vec<GroupSpec>,
}

impl SplitConfig {
    /// Creates a new split configuration
    ///
    /// # Errors
    /// Returns an error if the group list is empty or longer than 16, or if
    /// the group threshold is zero or exceeds the number of groups
    ///
    /// # Examples
    ///
    /// ```rust
    /// use splinter::{GroupSpec, SplitConfig};
    ///
    /// let config = SplitConfig::new(
    ///     1,
    ///     vec![GroupSpec::new(2, 3).unwrap(), GroupSpec::new(3, 5).unwrap()],
    /// )
    /// .unwrap();
    /// assert_eq!(config.group_threshold(), 1);
    /// assert_eq!(config.groups().len(), 2);
    ///
    /// // Invalid: threshold exceeds the number of groups
    /// assert!(SplitConfig::new(3, vec![GroupSpec::new(1, 1).unwrap()]).is_err());
    /// ```
    pub fn new(group_threshold: u8, groups: Vec<GroupSpec>) -> Result<Self> {
        if groups.is_empty() || groups.len() > MAX_SHARE_COUNT as usize {
            return Err(Error::InvalidInput(format!(
                "the number of groups must be between 1 and {MAX_SHARE_COUNT}, got {}",
                groups.len()
            )));
        }
        if group_threshold < 1 || group_threshold as usize > groups.len() {
            return Err(Error::InvalidInput(format!(
                "group threshold {group_threshold} must be between 1 and the number \
                 of groups ({})",
                groups.len()
            )));
        }
        Ok(Self {
            group_threshold,
            groups,
        })
    }

    /// Gets the group threshold
    #[must_use]
    pub fn group_threshold(&self) -> u8 {
        self.group_threshold
    }

    /// Gets the group specifications
    #[must_use]
    pub fn groups(&self) -> &[GroupSpec] {
        &self.groups
    }
}
