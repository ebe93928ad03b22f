//! Split a master secret into SLIP-0039 mnemonic shares and recombine them.
//!
//! A split is two-level: the (passphrase-encrypted) master secret is divided
//! across *groups* with a group threshold, and each group's share is divided
//! across *members* with a member threshold. Any subset of mnemonics meeting
//! both thresholds reconstructs the secret; smaller subsets reveal nothing.
//!
//! ```rust
//! use splinter::{combine_mnemonics, generate_mnemonics, GroupSpec, SplitConfig};
//!
//! # fn main() -> Result<(), splinter::Error> {
//! let master_secret = [0xAB; 16];
//! let config = SplitConfig::new(1, vec![GroupSpec::new(2, 3)?])?;
//!
//! let groups = generate_mnemonics(&config, &master_secret, "passphrase", 1, false)?;
//!
//! // Any two of the three member shares recover the secret.
//! let subset = [groups[0][0].as_str(), groups[0][2].as_str()];
//! let recovered = combine_mnemonics(&subset, "passphrase")?;
//! assert_eq!(&*recovered, &master_secret);
//! # Ok(())
//! # }
//! ```

pub mod cipher;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod error;
pub mod gf256;
pub mod rs1024;
pub mod shamir;
pub mod share;
pub mod wordlist;

pub use domain::{GroupSpec, SplitConfig};
pub use error::Error;
pub use shamir::{
    combine_mnemonics, decode_mnemonic, generate_mnemonics, generate_mnemonics_with_rng,
};
pub use share::Share;
