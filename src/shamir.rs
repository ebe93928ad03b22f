//! Shamir engine and the two-level split/combine protocol.
//!
//! The single-level engine splits a byte string over GF(256) with two
//! reserved abscissae: x = 255 carries the secret itself and x = 254 carries
//! a 4-byte HMAC-SHA256 digest tag followed by random filler, so a corrupted
//! or forged share is caught after interpolation instead of silently
//! decrypting to a wrong secret. The protocol layer runs the engine once
//! across groups and once per group across members.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::cipher;
use crate::domain::SplitConfig;
use crate::error::{Error, Result};
use crate::gf256;
use crate::share::{Share, ID_LENGTH_BITS, MAX_SHARE_COUNT, MIN_STRENGTH_BITS};

type HmacSha256 = Hmac<Sha256>;

/// Length of the digest tag carried at the digest point.
const DIGEST_LENGTH_BYTES: usize = 4;

/// Reserved abscissa carrying the shared secret.
const SECRET_INDEX: u8 = 255;

/// Reserved abscissa carrying the digest tag.
const DIGEST_INDEX: u8 = 254;

/// One point of the byte-parallel polynomial: an x-coordinate and the value
/// vector evaluated there.
struct RawShare {
    x: u8,
    data: Zeroizing<Vec<u8>>,
}

impl RawShare {
    fn points(shares: &[RawShare]) -> Vec<(u8, &[u8])> {
        shares.iter().map(|s| (s.x, s.data.as_slice())).collect()
    }
}

/// First four bytes of `HMAC-SHA256(key = random_data, msg = shared_secret)`.
fn create_digest(random_data: &[u8], shared_secret: &[u8]) -> [u8; DIGEST_LENGTH_BYTES] {
    let mut mac =
        HmacSha256::new_from_slice(random_data).expect("HMAC accepts keys of any length");
    mac.update(shared_secret);
    let code = mac.finalize().into_bytes();
    let mut digest = [0u8; DIGEST_LENGTH_BYTES];
    digest.copy_from_slice(&code[..DIGEST_LENGTH_BYTES]);
    digest
}

/// Split `shared_secret` into `share_count` shares, any `threshold` of which
/// reconstruct it.
///
/// For a threshold of 1 every share is a plain copy and no digest is used.
/// Otherwise `threshold - 2` shares are drawn at random, the digest and
/// secret points are fixed at the reserved abscissae, and the remaining
/// shares fall out of interpolation.
fn split_secret(
    threshold: u8,
    share_count: u8,
    shared_secret: &[u8],
    rng: &mut dyn RngCore,
) -> Result<Vec<RawShare>> {
    if threshold < 1 {
        return Err(Error::InvalidInput(
            "the threshold must be a positive integer".into(),
        ));
    }
    if threshold > share_count {
        return Err(Error::InvalidInput(
            "the threshold must not exceed the number of shares".into(),
        ));
    }
    if share_count > MAX_SHARE_COUNT {
        return Err(Error::InvalidInput(format!(
            "the number of shares must not exceed {MAX_SHARE_COUNT}"
        )));
    }

    if threshold == 1 {
        return Ok((0..share_count)
            .map(|x| RawShare {
                x,
                data: Zeroizing::new(shared_secret.to_vec()),
            })
            .collect());
    }

    let random_share_count = threshold - 2;
    let mut shares: Vec<RawShare> = (0..random_share_count)
        .map(|x| {
            let mut data = Zeroizing::new(vec![0u8; shared_secret.len()]);
            rng.fill_bytes(&mut data);
            RawShare { x, data }
        })
        .collect();

    let mut random_part =
        Zeroizing::new(vec![0u8; shared_secret.len() - DIGEST_LENGTH_BYTES]);
    rng.fill_bytes(&mut random_part);
    let mut digest_data = Zeroizing::new(create_digest(&random_part, shared_secret).to_vec());
    digest_data.extend_from_slice(&random_part);

    let derived = {
        let mut base_points: Vec<(u8, &[u8])> = RawShare::points(&shares);
        base_points.push((DIGEST_INDEX, digest_data.as_slice()));
        base_points.push((SECRET_INDEX, shared_secret));

        (random_share_count..share_count)
            .map(|x| {
                let data = Zeroizing::new(gf256::interpolate(&base_points, x)?);
                Ok(RawShare { x, data })
            })
            .collect::<Result<Vec<_>>>()?
    };
    shares.extend(derived);

    Ok(shares)
}

/// Recover the secret from at least `threshold` distinct shares, verifying
/// the digest tag when the threshold uses one.
fn recover_secret(threshold: u8, shares: &[RawShare]) -> Result<Zeroizing<Vec<u8>>> {
    if shares.len() < threshold as usize {
        return Err(Error::InsufficientShares(format!(
            "{} shares provided where {threshold} are required",
            shares.len()
        )));
    }

    if threshold == 1 {
        return Ok(shares[0].data.clone());
    }

    let points = RawShare::points(shares);
    let shared_secret = Zeroizing::new(gf256::interpolate(&points, SECRET_INDEX)?);
    let digest_share = Zeroizing::new(gf256::interpolate(&points, DIGEST_INDEX)?);

    let (digest, random_part) = digest_share.split_at(DIGEST_LENGTH_BYTES);
    let expected = create_digest(random_part, &shared_secret);
    if digest != expected.as_slice() {
        return Err(Error::InvalidDigest);
    }

    Ok(shared_secret)
}

/// The master secret after passphrase encryption, with the parameters every
/// share of the split carries.
pub(crate) struct EncryptedMasterSecret {
    pub identifier: u16,
    pub extendable: bool,
    pub iteration_exponent: u8,
    pub ciphertext: Zeroizing<Vec<u8>>,
}

impl EncryptedMasterSecret {
    fn from_master_secret(
        master_secret: &[u8],
        passphrase: &str,
        identifier: u16,
        extendable: bool,
        iteration_exponent: u8,
    ) -> Result<Self> {
        let ciphertext = cipher::encrypt(
            master_secret,
            passphrase,
            iteration_exponent,
            identifier,
            extendable,
        )?;
        Ok(Self {
            identifier,
            extendable,
            iteration_exponent,
            ciphertext,
        })
    }

    fn decrypt(&self, passphrase: &str) -> Result<Zeroizing<Vec<u8>>> {
        cipher::decrypt(
            &self.ciphertext,
            passphrase,
            self.iteration_exponent,
            self.identifier,
            self.extendable,
        )
    }
}

/// Split an encrypted master secret into groups of member shares.
fn split_ems(
    config: &SplitConfig,
    ems: &EncryptedMasterSecret,
    rng: &mut dyn RngCore,
) -> Result<Vec<Vec<Share>>> {
    let group_count = config.groups().len() as u8;
    let group_shares = split_secret(
        config.group_threshold(),
        group_count,
        &ems.ciphertext,
        rng,
    )?;

    config
        .groups()
        .iter()
        .zip(group_shares)
        .map(|(spec, group_share)| {
            let members = split_secret(
                spec.member_threshold(),
                spec.member_count(),
                &group_share.data,
                rng,
            )?;
            Ok(members
                .into_iter()
                .map(|member| Share {
                    identifier: ems.identifier,
                    extendable: ems.extendable,
                    iteration_exponent: ems.iteration_exponent,
                    group_index: group_share.x,
                    group_threshold: config.group_threshold(),
                    group_count,
                    member_index: member.x,
                    member_threshold: spec.member_threshold(),
                    value: member.data.to_vec(),
                })
                .collect())
        })
        .collect()
}

/// Draw a fresh 15-bit identifier.
fn random_identifier(rng: &mut dyn RngCore) -> u16 {
    let mut bytes = [0u8; 2];
    rng.fill_bytes(&mut bytes);
    u16::from_be_bytes(bytes) & ((1 << ID_LENGTH_BITS) - 1)
}

/// Split a master secret into two-level mnemonic shares, drawing randomness
/// from the operating system.
///
/// Returns one list of mnemonics per group, each of the group's member count.
pub fn generate_mnemonics(
    config: &SplitConfig,
    master_secret: &[u8],
    passphrase: &str,
    iteration_exponent: u8,
    extendable: bool,
) -> Result<Vec<Vec<String>>> {
    generate_mnemonics_with_rng(
        config,
        master_secret,
        passphrase,
        iteration_exponent,
        extendable,
        &mut OsRng,
    )
}

/// [`generate_mnemonics`] with an injected random source, so tests can pin a
/// deterministic generator.
pub fn generate_mnemonics_with_rng(
    config: &SplitConfig,
    master_secret: &[u8],
    passphrase: &str,
    iteration_exponent: u8,
    extendable: bool,
    rng: &mut dyn RngCore,
) -> Result<Vec<Vec<String>>> {
    if master_secret.len() * 8 < MIN_STRENGTH_BITS {
        return Err(Error::InvalidInput(format!(
            "the master secret must be at least {} bytes",
            MIN_STRENGTH_BITS / 8
        )));
    }
    if iteration_exponent > 15 {
        return Err(Error::InvalidInput(
            "the iteration exponent must be between 0 and 15".into(),
        ));
    }

    let identifier = random_identifier(rng);
    let ems = EncryptedMasterSecret::from_master_secret(
        master_secret,
        passphrase,
        identifier,
        extendable,
        iteration_exponent,
    )?;
    split_ems(config, &ems, rng)?
        .iter()
        .map(|group| group.iter().map(Share::to_mnemonic).collect())
        .collect()
}

/// Parse mnemonics into share groups keyed by group index, enforcing the
/// cross-share invariants.
fn decode_mnemonics(mnemonics: &[impl AsRef<str>]) -> Result<BTreeMap<u8, Vec<Share>>> {
    if mnemonics.is_empty() {
        return Err(Error::InvalidInput("the list of mnemonics is empty".into()));
    }

    let mut groups: BTreeMap<u8, Vec<Share>> = BTreeMap::new();
    let mut common = None;

    for mnemonic in mnemonics {
        let share = Share::from_mnemonic(mnemonic.as_ref())?;

        match &common {
            None => common = Some(share.common_parameters()),
            Some(params) if *params != share.common_parameters() => {
                return Err(Error::InconsistentShares(
                    "all shares must carry the same identifier, extendable flag, \
                     iteration exponent, group threshold, and group count"
                        .into(),
                ));
            }
            Some(_) => {}
        }

        let group = groups.entry(share.group_index).or_default();
        // Combine is a function of the share set; drop exact duplicates.
        if group.contains(&share) {
            continue;
        }
        if let Some(first) = group.first() {
            if first.member_threshold != share.member_threshold {
                return Err(Error::InconsistentShares(
                    "the member threshold must be the same within a group".into(),
                ));
            }
            if group.iter().any(|s| s.member_index == share.member_index) {
                return Err(Error::InconsistentShares(
                    "member indices must be distinct within a group".into(),
                ));
            }
        }
        group.push(share);
    }

    Ok(groups)
}

/// Recover the encrypted master secret from decoded share groups.
fn recover_ems(groups: &BTreeMap<u8, Vec<Share>>) -> Result<EncryptedMasterSecret> {
    let first = groups
        .values()
        .flat_map(|g| g.first())
        .next()
        .ok_or_else(|| Error::InvalidInput("the set of shares is empty".into()))?;
    let (identifier, extendable, iteration_exponent, group_threshold, _) =
        first.common_parameters();

    for group in groups.values() {
        let member_threshold = group[0].member_threshold;
        if member_threshold == 1 && group.len() > 1 {
            return Err(Error::InconsistentShares(
                "a group with member threshold 1 must contain exactly one share".into(),
            ));
        }
        if group.len() < member_threshold as usize {
            return Err(Error::InsufficientShares(format!(
                "group {} holds {} shares where {member_threshold} are required",
                group[0].group_index,
                group.len()
            )));
        }
    }

    if groups.len() < group_threshold as usize {
        return Err(Error::InsufficientShares(format!(
            "{} groups provided where {group_threshold} are required",
            groups.len()
        )));
    }

    let group_shares = groups
        .iter()
        .take(group_threshold as usize)
        .map(|(&group_index, group)| {
            let member_threshold = group[0].member_threshold;
            let mut members: Vec<RawShare> = group
                .iter()
                .map(|share| RawShare {
                    x: share.member_index,
                    data: Zeroizing::new(share.value.clone()),
                })
                .collect();
            members.sort_by_key(|m| m.x);
            members.truncate(member_threshold as usize);
            let data = recover_secret(member_threshold, &members)?;
            Ok(RawShare {
                x: group_index,
                data,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let ciphertext = recover_secret(group_threshold, &group_shares)?;
    Ok(EncryptedMasterSecret {
        identifier,
        extendable,
        iteration_exponent,
        ciphertext,
    })
}

/// Combine mnemonic shares and decrypt the recovered master secret.
///
/// The result depends only on the set of shares presented, not their order.
/// A wrong passphrase is not detectable here: it yields a different master
/// secret without any error.
pub fn combine_mnemonics(
    mnemonics: &[impl AsRef<str>],
    passphrase: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    let groups = decode_mnemonics(mnemonics)?;
    let ems = recover_ems(&groups)?;
    ems.decrypt(passphrase)
}

/// Decode a single mnemonic into its share record without recovering any
/// secret material.
pub fn decode_mnemonic(mnemonic: &str) -> Result<Share> {
    Share::from_mnemonic(mnemonic)
}
