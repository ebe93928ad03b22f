//! Property tests for split/combine workflows

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rand::rngs::StdRng;
use rand::SeedableRng;
use splinter::{
    combine_mnemonics, decode_mnemonic, generate_mnemonics_with_rng, Error, GroupSpec,
    SplitConfig,
};

/// Wrapper for master secrets of a valid length (16..=32 bytes, even)
#[derive(Clone, Debug)]
struct SecretBytes(Vec<u8>);

impl Arbitrary for SecretBytes {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = 16 + 2 * (usize::arbitrary(g) % 9);
        SecretBytes((0..len).map(|_| u8::arbitrary(g)).collect())
    }
}

/// Wrapper for a valid member threshold and count pair
#[derive(Clone, Copy, Debug)]
struct ValidParams {
    threshold: u8,
    count: u8,
}

impl Arbitrary for ValidParams {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = u8::arbitrary(g) % 16 + 1;
        let threshold = u8::arbitrary(g) % count + 1;
        if threshold == 1 {
            // 1-of-N is only valid as 1-of-1.
            ValidParams {
                threshold: 1,
                count: 1,
            }
        } else {
            ValidParams { threshold, count }
        }
    }
}

fn single_group_split(
    secret: &[u8],
    params: ValidParams,
    extendable: bool,
    seed: u64,
) -> Vec<String> {
    let config = SplitConfig::new(
        1,
        vec![GroupSpec::new(params.threshold, params.count).unwrap()],
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    generate_mnemonics_with_rng(&config, secret, "", 0, extendable, &mut rng)
        .unwrap()
        .remove(0)
}

/// Any threshold-sized prefix of the shares recovers the secret
#[quickcheck]
fn prop_split_combine_round_trip(
    secret: SecretBytes,
    params: ValidParams,
    extendable: bool,
    seed: u64,
) -> bool {
    let SecretBytes(secret) = secret;
    let shares = single_group_split(&secret, params, extendable, seed);
    if shares.len() != params.count as usize {
        return false;
    }

    let subset = &shares[..params.threshold as usize];
    match combine_mnemonics(subset, "") {
        Ok(recovered) => *recovered == secret,
        Err(_) => false,
    }
}

/// Any random threshold-sized selection of the shares recovers the secret
#[quickcheck]
fn prop_random_share_selection_works(
    secret: SecretBytes,
    params: ValidParams,
    seed: u64,
    selection_seed: u64,
) -> bool {
    let SecretBytes(secret) = secret;
    let shares = single_group_split(&secret, params, false, seed);

    // Shuffle indices deterministically from the selection seed.
    let mut indices: Vec<usize> = (0..shares.len()).collect();
    let mut state = selection_seed;
    for i in 0..indices.len() {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let j = i + (state % (indices.len() - i) as u64) as usize;
        indices.swap(i, j);
    }

    let subset: Vec<&String> = indices
        .iter()
        .take(params.threshold as usize)
        .map(|&i| &shares[i])
        .collect();
    match combine_mnemonics(&subset, "") {
        Ok(recovered) => *recovered == secret,
        Err(_) => false,
    }
}

/// One share short of the threshold is always refused
#[quickcheck]
fn prop_insufficient_shares_fail(secret: SecretBytes, params: ValidParams, seed: u64) -> bool {
    let SecretBytes(secret) = secret;
    if params.threshold == 1 {
        return true;
    }
    let shares = single_group_split(&secret, params, false, seed);
    let subset = &shares[..params.threshold as usize - 1];
    matches!(
        combine_mnemonics(subset, ""),
        Err(Error::InsufficientShares(_))
    )
}

/// Share metadata survives the round trip through the word encoding
#[quickcheck]
fn prop_share_metadata_preserved(
    secret: SecretBytes,
    params: ValidParams,
    extendable: bool,
    seed: u64,
) -> bool {
    let SecretBytes(secret) = secret;
    let shares = single_group_split(&secret, params, extendable, seed);

    let mut identifier = None;
    for (index, mnemonic) in shares.iter().enumerate() {
        let Ok(share) = decode_mnemonic(mnemonic) else {
            return false;
        };
        if share.extendable != extendable
            || share.group_threshold != 1
            || share.group_count != 1
            || share.group_index != 0
            || share.member_threshold != params.threshold
            || share.member_index != index as u8
            || share.value.len() != secret.len()
        {
            return false;
        }
        match identifier {
            None => identifier = Some(share.identifier),
            Some(id) if id != share.identifier => return false,
            Some(_) => {}
        }
    }
    true
}

/// Two-level splits recover through any satisfying group selection
#[quickcheck]
fn prop_two_group_round_trip(
    secret: SecretBytes,
    first: ValidParams,
    second: ValidParams,
    seed: u64,
) -> bool {
    let SecretBytes(secret) = secret;
    let config = SplitConfig::new(
        2,
        vec![
            GroupSpec::new(first.threshold, first.count).unwrap(),
            GroupSpec::new(second.threshold, second.count).unwrap(),
        ],
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let groups =
        generate_mnemonics_with_rng(&config, &secret, "", 0, false, &mut rng).unwrap();

    let mut subset: Vec<&String> = Vec::new();
    subset.extend(groups[0].iter().take(first.threshold as usize));
    subset.extend(groups[1].iter().take(second.threshold as usize));

    match combine_mnemonics(&subset, "") {
        Ok(recovered) => *recovered == secret,
        Err(_) => false,
    }
}

/// Combining under a different passphrase succeeds but yields another secret
#[quickcheck]
fn prop_wrong_passphrase_changes_the_result(
    secret: SecretBytes,
    params: ValidParams,
    seed: u64,
) -> bool {
    let SecretBytes(secret) = secret;
    let config = SplitConfig::new(
        1,
        vec![GroupSpec::new(params.threshold, params.count).unwrap()],
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let shares = generate_mnemonics_with_rng(&config, &secret, "right", 0, false, &mut rng)
        .unwrap()
        .remove(0);
    let subset = &shares[..params.threshold as usize];

    let Ok(wrong) = combine_mnemonics(subset, "wrong") else {
        return false;
    };
    *wrong != secret
}
