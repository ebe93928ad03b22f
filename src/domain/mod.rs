//! Validated parameter types for two-level secret splits
//!
//! - [`GroupSpec`] - member threshold and member count for one group
//! - [`SplitConfig`] - group threshold over a validated list of groups

mod config;
mod group_spec;

pub use config::SplitConfig;
pub use group_spec::GroupSpec;
