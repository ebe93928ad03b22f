//! Four-round Feistel cipher keying the master secret to a passphrase.
//!
//! The round function is PBKDF2-HMAC-SHA256 with the round index prefixed to
//! the passphrase and the identifier bound into the salt, so no key material
//! can be precomputed across rounds or across splits. Decryption runs the
//! same rounds in reverse order. There is no authentication: a wrong
//! passphrase decrypts to a different, equally plausible master secret.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Total PBKDF2 iterations across the cipher at iteration exponent 0.
pub const BASE_ITERATION_COUNT: u32 = 10_000;

/// Number of Feistel rounds.
pub const ROUND_COUNT: u8 = 4;

/// Salt prefix for non-extendable shares. Extendable shares use no prefix.
const CUSTOMIZATION_STRING: &[u8] = b"shamir";

/// PBKDF2 iterations per round: `2500 * 2^e`.
fn round_iterations(iteration_exponent: u8) -> u32 {
    (BASE_ITERATION_COUNT / u32::from(ROUND_COUNT)) << iteration_exponent
}

/// Reject passphrases containing anything but printable ASCII (32..=126).
pub fn check_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.bytes().any(|b| !(32..=126).contains(&b)) {
        return Err(Error::InvalidInput(
            "the passphrase must contain only printable ASCII characters".into(),
        ));
    }
    Ok(())
}

/// Salt prefix binding each PBKDF2 call to one split.
fn salt_prefix(identifier: u16, extendable: bool) -> Vec<u8> {
    if extendable {
        Vec::new()
    } else {
        let mut salt = CUSTOMIZATION_STRING.to_vec();
        salt.extend_from_slice(&identifier.to_be_bytes());
        salt
    }
}

fn round_function(
    round: u8,
    passphrase: &str,
    iteration_exponent: u8,
    salt_prefix: &[u8],
    block: &[u8],
) -> Zeroizing<Vec<u8>> {
    let mut password = Zeroizing::new(Vec::with_capacity(1 + passphrase.len()));
    password.push(round);
    password.extend_from_slice(passphrase.as_bytes());

    let mut salt = Zeroizing::new(salt_prefix.to_vec());
    salt.extend_from_slice(block);

    let mut output = Zeroizing::new(vec![0u8; block.len()]);
    pbkdf2_hmac::<Sha256>(
        &password,
        &salt,
        round_iterations(iteration_exponent),
        &mut output,
    );
    output
}

fn crypt(
    input: &[u8],
    passphrase: &str,
    iteration_exponent: u8,
    identifier: u16,
    extendable: bool,
    rounds: impl Iterator<Item = u8>,
) -> Result<Zeroizing<Vec<u8>>> {
    check_passphrase(passphrase)?;
    if input.len() % 2 != 0 {
        return Err(Error::InvalidInput(
            "the length of the master secret in bytes must be an even number".into(),
        ));
    }

    let half = input.len() / 2;
    let salt = salt_prefix(identifier, extendable);
    let mut left = Zeroizing::new(input[..half].to_vec());
    let mut right = Zeroizing::new(input[half..].to_vec());

    for round in rounds {
        let f = round_function(round, passphrase, iteration_exponent, &salt, &right);
        let next_right = Zeroizing::new(
            left.iter()
                .zip(f.iter())
                .map(|(l, f)| l ^ f)
                .collect::<Vec<u8>>(),
        );
        left = right;
        right = next_right;
    }

    let mut output = Zeroizing::new(Vec::with_capacity(input.len()));
    output.extend_from_slice(&right);
    output.extend_from_slice(&left);
    Ok(output)
}

/// Encrypt a master secret under the passphrase and split parameters.
pub fn encrypt(
    master_secret: &[u8],
    passphrase: &str,
    iteration_exponent: u8,
    identifier: u16,
    extendable: bool,
) -> Result<Zeroizing<Vec<u8>>> {
    crypt(
        master_secret,
        passphrase,
        iteration_exponent,
        identifier,
        extendable,
        0..ROUND_COUNT,
    )
}

/// Invert [`encrypt`] by running the rounds in reverse order.
pub fn decrypt(
    encrypted_master_secret: &[u8],
    passphrase: &str,
    iteration_exponent: u8,
    identifier: u16,
    extendable: bool,
) -> Result<Zeroizing<Vec<u8>>> {
    crypt(
        encrypted_master_secret,
        passphrase,
        iteration_exponent,
        identifier,
        extendable,
        (0..ROUND_COUNT).rev(),
    )
}
