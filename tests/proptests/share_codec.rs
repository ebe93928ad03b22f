//! Property tests for the share record codec

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use splinter::wordlist;
use splinter::Share;

/// Wrapper generating shares whose fields all sit in their documented ranges
#[derive(Clone, Debug)]
struct ValidShare(Share);

impl Arbitrary for ValidShare {
    fn arbitrary(g: &mut Gen) -> Self {
        let group_count = u8::arbitrary(g) % 16 + 1;
        let group_threshold = u8::arbitrary(g) % group_count + 1;
        // Even value length between 16 and 32 bytes.
        let value_len = 16 + 2 * (usize::arbitrary(g) % 9);
        let value = (0..value_len).map(|_| u8::arbitrary(g)).collect();

        ValidShare(Share {
            identifier: u16::arbitrary(g) & 0x7FFF,
            extendable: bool::arbitrary(g),
            iteration_exponent: u8::arbitrary(g) % 16,
            group_index: u8::arbitrary(g) % 16,
            group_threshold,
            group_count,
            member_index: u8::arbitrary(g) % 16,
            member_threshold: u8::arbitrary(g) % 16 + 1,
            value,
        })
    }
}

/// Decoding an encoded share recovers the exact record
#[quickcheck]
fn prop_share_round_trip(share: ValidShare) -> bool {
    let ValidShare(share) = share;
    let mnemonic = match share.to_mnemonic() {
        Ok(m) => m,
        Err(_) => return false,
    };
    Share::from_mnemonic(&mnemonic) == Ok(share)
}

/// Re-encoding a decoded share reproduces the exact word sequence
#[quickcheck]
fn prop_encode_of_decode_preserves_words(share: ValidShare) -> bool {
    let ValidShare(share) = share;
    let Ok(mnemonic) = share.to_mnemonic() else {
        return false;
    };
    let Ok(decoded) = Share::from_mnemonic(&mnemonic) else {
        return false;
    };
    decoded.to_mnemonic().as_deref() == Ok(mnemonic.as_str())
}

/// Substituting any single word is always caught
#[quickcheck]
fn prop_single_word_substitution_is_detected(share: ValidShare, pos: usize, replacement: u16) -> bool {
    let ValidShare(share) = share;
    let Ok(mnemonic) = share.to_mnemonic() else {
        return false;
    };
    let mut words: Vec<&str> = mnemonic.split_whitespace().collect();
    let pos = pos % words.len();
    let replacement = wordlist::index_to_word(replacement % 1024);
    if words[pos] == replacement {
        return true;
    }
    words[pos] = replacement;
    Share::from_mnemonic(&words.join(" ")).is_err()
}

/// The word count tracks the value length: 7 metadata words plus one word
/// per 10 bits of value
#[quickcheck]
fn prop_word_count_matches_value_length(share: ValidShare) -> bool {
    let ValidShare(share) = share;
    let Ok(mnemonic) = share.to_mnemonic() else {
        return false;
    };
    let expected = 7 + (share.value.len() * 8 + 9) / 10;
    mnemonic.split_whitespace().count() == expected
}
