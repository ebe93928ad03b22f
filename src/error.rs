//! Error taxonomy shared by every public entry point.

use thiserror::Error;

/// Failure kinds surfaced by the library.
///
/// Each public operation returns exactly one of these on failure and never a
/// partial result. A wrong passphrase is deliberately *not* represented here:
/// decryption with the wrong passphrase yields a different master secret
/// without any signal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An argument is outside its documented range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A mnemonic is malformed: unknown word, wrong word count, or a
    /// malformed header field.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// The RS1024 checksum did not verify.
    #[error("invalid mnemonic checksum for \"{prefix} ...\"")]
    InvalidChecksum {
        /// The first words of the offending mnemonic, for operator triage.
        prefix: String,
    },

    /// The presented shares disagree on parameters that must match.
    #[error("inconsistent set of shares: {0}")]
    InconsistentShares(String),

    /// Not enough members in a group, or not enough groups.
    #[error("insufficient shares: {0}")]
    InsufficientShares(String),

    /// The reconstructed secret failed its integrity digest; a share is
    /// corrupt or forged.
    #[error("invalid digest of the shared secret")]
    InvalidDigest,

    /// Padding bits were nonzero or too long for any valid share value.
    #[error("invalid mnemonic padding")]
    InvalidPadding,
}

pub type Result<T> = std::result::Result<T, Error>;
