//! Share record codec: bit-packed header + payload + RS1024 checksum,
//! rendered as a sequence of wordlist words.
//!
//! Layout, high bit first: identifier (15), extendable flag (1), iteration
//! exponent (4), group index (4), group threshold - 1 (4), group count - 1
//! (4), member index (4), member threshold - 1 (4), zero padding to the next
//! 10-bit boundary, share value, 30-bit checksum. The padding precedes the
//! value bits, so the value is right-aligned within its words.

use crate::error::{Error, Result};
use crate::rs1024::{self, CHECKSUM_LENGTH_WORDS};
use crate::wordlist::{self, RADIX_BITS};

/// Bits in the random share-set identifier.
pub const ID_LENGTH_BITS: usize = 15;

/// Bits in the extendable backup flag.
const EXTENDABLE_FLAG_LENGTH_BITS: usize = 1;

/// Bits in the iteration exponent.
const ITERATION_EXP_LENGTH_BITS: usize = 4;

/// Words carrying identifier, extendable flag, and iteration exponent.
const ID_EXP_LENGTH_WORDS: usize =
    (ID_LENGTH_BITS + EXTENDABLE_FLAG_LENGTH_BITS + ITERATION_EXP_LENGTH_BITS) / RADIX_BITS;

/// Mnemonic length in words, not counting the share value.
const METADATA_LENGTH_WORDS: usize = ID_EXP_LENGTH_WORDS + 2 + CHECKSUM_LENGTH_WORDS;

/// Minimum entropy of the master secret in bits.
pub const MIN_STRENGTH_BITS: usize = 128;

/// Shortest possible share mnemonic in words.
pub const MIN_MNEMONIC_LENGTH_WORDS: usize =
    METADATA_LENGTH_WORDS + (MIN_STRENGTH_BITS + RADIX_BITS - 1) / RADIX_BITS;

/// Maximum share count and threshold at either level.
pub const MAX_SHARE_COUNT: u8 = 16;

/// One mnemonic share and its metadata.
///
/// Shares are constructed by [`crate::generate_mnemonics`] and are plain,
/// immutable-by-convention records from that point on; nothing here is
/// interpreted until the shares are combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Random 15-bit identifier common to all shares of one split.
    pub identifier: u16,
    /// Whether the split was created in extendable mode.
    pub extendable: bool,
    /// PBKDF2 work parameter `e`; iterations scale with `2^e`.
    pub iteration_exponent: u8,
    /// Index of the group this share belongs to.
    pub group_index: u8,
    /// Number of groups required to reconstruct the master secret.
    pub group_threshold: u8,
    /// Total number of groups in the split.
    pub group_count: u8,
    /// Index of this member within its group.
    pub member_index: u8,
    /// Number of members required to reconstruct the group secret.
    pub member_threshold: u8,
    /// The Shamir share value; same length as the encrypted master secret.
    pub value: Vec<u8>,
}

/// Streams values into 10-bit words through a small buffered state.
struct BitWriter {
    words: Vec<u16>,
    buffer: u32,
    bits: usize,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            words: Vec::new(),
            buffer: 0,
            bits: 0,
        }
    }

    /// Append the low `width` bits of `value`. `width` must be at most 16.
    fn push(&mut self, value: u32, width: usize) {
        self.buffer = (self.buffer << width) | (value & ((1 << width) - 1));
        self.bits += width;
        while self.bits >= RADIX_BITS {
            self.bits -= RADIX_BITS;
            self.words.push(((self.buffer >> self.bits) & 0x3FF) as u16);
        }
    }

    fn finish(self) -> Vec<u16> {
        debug_assert_eq!(self.bits, 0, "stream must end on a word boundary");
        self.words
    }
}

/// Reads fixed-width values back out of a 10-bit word stream.
struct BitReader<'a> {
    words: &'a [u16],
    pos: usize,
    buffer: u32,
    bits: usize,
}

impl<'a> BitReader<'a> {
    fn new(words: &'a [u16]) -> Self {
        Self {
            words,
            pos: 0,
            buffer: 0,
            bits: 0,
        }
    }

    /// Take the next `width` bits. `width` must be at most 16 and within the
    /// remaining stream.
    fn take(&mut self, width: usize) -> u32 {
        while self.bits < width {
            self.buffer = (self.buffer << RADIX_BITS) | u32::from(self.words[self.pos]);
            self.pos += 1;
            self.bits += RADIX_BITS;
        }
        self.bits -= width;
        (self.buffer >> self.bits) & ((1 << width) - 1)
    }
}

impl Share {
    /// Parameters every share of one split must agree on.
    pub(crate) fn common_parameters(&self) -> (u16, bool, u8, u8, u8) {
        (
            self.identifier,
            self.extendable,
            self.iteration_exponent,
            self.group_threshold,
            self.group_count,
        )
    }

    /// Parameters every share of one group must agree on.
    pub(crate) fn group_parameters(&self) -> (u16, bool, u8, u8, u8, u8, u8) {
        (
            self.identifier,
            self.extendable,
            self.iteration_exponent,
            self.group_index,
            self.group_threshold,
            self.group_count,
            self.member_threshold,
        )
    }

    fn validate_fields(&self) -> Result<()> {
        let in_range = self.identifier < 1 << ID_LENGTH_BITS
            && self.iteration_exponent < 1 << ITERATION_EXP_LENGTH_BITS
            && self.group_index < MAX_SHARE_COUNT
            && self.member_index < MAX_SHARE_COUNT
            && (1..=MAX_SHARE_COUNT).contains(&self.group_threshold)
            && (1..=MAX_SHARE_COUNT).contains(&self.group_count)
            && (1..=MAX_SHARE_COUNT).contains(&self.member_threshold)
            && self.group_threshold <= self.group_count;
        if !in_range {
            return Err(Error::InvalidInput("share field out of range".into()));
        }
        if self.value.len() * 8 < MIN_STRENGTH_BITS || self.value.len() % 2 != 0 {
            return Err(Error::InvalidInput(
                "share value must be at least 16 bytes and of even length".into(),
            ));
        }
        Ok(())
    }

    /// Render this share as its 10-bit word indices, checksum included.
    pub(crate) fn to_indices(&self) -> Result<Vec<u16>> {
        self.validate_fields()?;

        let mut writer = BitWriter::new();
        writer.push(u32::from(self.identifier), ID_LENGTH_BITS);
        writer.push(u32::from(self.extendable), EXTENDABLE_FLAG_LENGTH_BITS);
        writer.push(u32::from(self.iteration_exponent), ITERATION_EXP_LENGTH_BITS);
        writer.push(u32::from(self.group_index), 4);
        writer.push(u32::from(self.group_threshold - 1), 4);
        writer.push(u32::from(self.group_count - 1), 4);
        writer.push(u32::from(self.member_index), 4);
        writer.push(u32::from(self.member_threshold - 1), 4);

        let value_bits = self.value.len() * 8;
        let value_words = (value_bits + RADIX_BITS - 1) / RADIX_BITS;
        writer.push(0, value_words * RADIX_BITS - value_bits);
        for &byte in &self.value {
            writer.push(u32::from(byte), 8);
        }

        let mut words = writer.finish();
        let checksum = rs1024::create_checksum(&words, self.extendable);
        words.extend_from_slice(&checksum);
        Ok(words)
    }

    /// Render this share as a space-separated mnemonic.
    pub fn to_mnemonic(&self) -> Result<String> {
        Ok(wordlist::indices_to_mnemonic(&self.to_indices()?))
    }

    /// Parse a mnemonic back into a share record.
    ///
    /// Validation happens before any secret-bearing interpretation: word
    /// lookup, length, checksum, header fields, then padding.
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self> {
        let words = wordlist::mnemonic_to_indices(mnemonic)?;

        if words.len() < MIN_MNEMONIC_LENGTH_WORDS {
            return Err(Error::InvalidMnemonic(format!(
                "a share mnemonic must be at least {MIN_MNEMONIC_LENGTH_WORDS} words, got {}",
                words.len()
            )));
        }

        // Share values are an even number of bytes, so the value section
        // must fit a multiple of 16 bits plus at most 8 bits of padding.
        let value_words = words.len() - METADATA_LENGTH_WORDS;
        let padding_bits = (RADIX_BITS * value_words) % 16;
        if padding_bits > 8 {
            return Err(Error::InvalidPadding);
        }

        let mut header = BitReader::new(&words[..ID_EXP_LENGTH_WORDS]);
        let identifier = header.take(ID_LENGTH_BITS) as u16;
        let extendable = header.take(EXTENDABLE_FLAG_LENGTH_BITS) != 0;
        let iteration_exponent = header.take(ITERATION_EXP_LENGTH_BITS) as u8;

        if !rs1024::verify_checksum(&words, extendable) {
            let prefix = mnemonic
                .split_whitespace()
                .take(ID_EXP_LENGTH_WORDS + 2)
                .collect::<Vec<_>>()
                .join(" ");
            return Err(Error::InvalidChecksum { prefix });
        }

        let mut params = BitReader::new(&words[ID_EXP_LENGTH_WORDS..ID_EXP_LENGTH_WORDS + 2]);
        let group_index = params.take(4) as u8;
        let group_threshold = params.take(4) as u8 + 1;
        let group_count = params.take(4) as u8 + 1;
        let member_index = params.take(4) as u8;
        let member_threshold = params.take(4) as u8 + 1;

        if group_threshold > group_count {
            return Err(Error::InvalidMnemonic(
                "group threshold cannot exceed group count".into(),
            ));
        }

        let mut body =
            BitReader::new(&words[ID_EXP_LENGTH_WORDS + 2..words.len() - CHECKSUM_LENGTH_WORDS]);
        if body.take(padding_bits) != 0 {
            return Err(Error::InvalidPadding);
        }
        let value_byte_count = (RADIX_BITS * value_words - padding_bits) / 8;
        let value = (0..value_byte_count).map(|_| body.take(8) as u8).collect();

        Ok(Share {
            identifier,
            extendable,
            iteration_exponent,
            group_index,
            group_threshold,
            group_count,
            member_index,
            member_threshold,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_share() -> Share {
        Share {
            identifier: 0x1234,
            extendable: false,
            iteration_exponent: 1,
            group_index: 0,
            group_threshold: 1,
            group_count: 1,
            member_index: 2,
            member_threshold: 3,
            value: (0u8..16).collect(),
        }
    }

    #[test]
    fn mnemonic_round_trip_preserves_record() {
        for len in [16usize, 20, 24, 32] {
            let mut share = sample_share();
            share.value = (0..len as u8).map(|b| b.wrapping_mul(7)).collect();
            let mnemonic = share.to_mnemonic().unwrap();
            assert_eq!(Share::from_mnemonic(&mnemonic).unwrap(), share);
        }
    }

    #[test]
    fn word_counts_match_secret_sizes() {
        for (len, expected_words) in [(16usize, 20usize), (24, 26), (32, 33)] {
            let mut share = sample_share();
            share.value = vec![0xAB; len];
            let mnemonic = share.to_mnemonic().unwrap();
            assert_eq!(mnemonic.split_whitespace().count(), expected_words);
        }
    }

    #[test]
    fn encode_of_decode_preserves_words() {
        let mnemonic = sample_share().to_mnemonic().unwrap();
        let reencoded = Share::from_mnemonic(&mnemonic)
            .unwrap()
            .to_mnemonic()
            .unwrap();
        assert_eq!(reencoded, mnemonic);

        // Uppercase and irregular spacing normalize to the same record.
        let shouting = mnemonic.to_uppercase().replace(' ', "   ");
        let renormalized = Share::from_mnemonic(&shouting)
            .unwrap()
            .to_mnemonic()
            .unwrap();
        assert_eq!(renormalized, mnemonic);
    }

    #[test]
    fn extendable_flag_survives_and_changes_checksum() {
        let mut share = sample_share();
        share.extendable = true;
        let mnemonic = share.to_mnemonic().unwrap();
        let decoded = Share::from_mnemonic(&mnemonic).unwrap();
        assert!(decoded.extendable);
        assert_ne!(mnemonic, sample_share().to_mnemonic().unwrap());
    }

    #[test]
    fn unknown_word_is_invalid_mnemonic() {
        let mut words: Vec<String> = sample_share()
            .to_mnemonic()
            .unwrap()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        words[5] = "notaword".into();
        assert!(matches!(
            Share::from_mnemonic(&words.join(" ")),
            Err(Error::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn short_mnemonic_is_rejected() {
        let mnemonic = sample_share().to_mnemonic().unwrap();
        let short = mnemonic
            .split_whitespace()
            .take(MIN_MNEMONIC_LENGTH_WORDS - 1)
            .collect::<Vec<_>>()
            .join(" ");
        assert!(matches!(
            Share::from_mnemonic(&short),
            Err(Error::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn flipped_word_is_a_checksum_failure() {
        let mnemonic = sample_share().to_mnemonic().unwrap();
        let mut words: Vec<&str> = mnemonic.split_whitespace().collect();
        words[7] = if words[7] == "academic" { "zero" } else { "academic" };
        assert!(matches!(
            Share::from_mnemonic(&words.join(" ")),
            Err(Error::InvalidChecksum { .. })
        ));
    }

    #[test]
    fn threshold_exceeding_count_is_rejected() {
        // Build indices by hand: a syntactically valid stream whose header
        // says GT-1 = 3, G-1 = 1.
        let mut share = sample_share();
        share.group_threshold = 4;
        share.group_count = 2;
        // validate_fields would refuse, so pack the words directly.
        let mut writer = BitWriter::new();
        writer.push(u32::from(share.identifier), ID_LENGTH_BITS);
        writer.push(0, 1);
        writer.push(u32::from(share.iteration_exponent), 4);
        writer.push(u32::from(share.group_index), 4);
        writer.push(u32::from(share.group_threshold - 1), 4);
        writer.push(u32::from(share.group_count - 1), 4);
        writer.push(u32::from(share.member_index), 4);
        writer.push(u32::from(share.member_threshold - 1), 4);
        writer.push(0, 2);
        for &byte in &share.value {
            writer.push(u32::from(byte), 8);
        }
        let mut words = writer.finish();
        let checksum = rs1024::create_checksum(&words, false);
        words.extend_from_slice(&checksum);
        let mnemonic = wordlist::indices_to_mnemonic(&words);
        assert!(matches!(
            Share::from_mnemonic(&mnemonic),
            Err(Error::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn nonzero_padding_is_rejected() {
        let share = sample_share();
        let mut words = share.to_indices().unwrap();
        // The two padding bits are the top bits of the first value word.
        words[4] |= 0x200;
        let data_len = words.len() - CHECKSUM_LENGTH_WORDS;
        let checksum = rs1024::create_checksum(&words[..data_len], false);
        words[data_len..].copy_from_slice(&checksum);
        let mnemonic = wordlist::indices_to_mnemonic(&words);
        assert!(matches!(
            Share::from_mnemonic(&mnemonic),
            Err(Error::InvalidPadding)
        ));
    }

    #[test]
    fn overlong_padding_is_rejected() {
        // 21 words implies 14 value words and 12 bits of padding, which no
        // even-length value can produce.
        let share = sample_share();
        let mut words = share.to_indices().unwrap();
        let data_len = words.len() - CHECKSUM_LENGTH_WORDS;
        let mut padded: Vec<u16> = Vec::with_capacity(words.len() + 1);
        padded.extend_from_slice(&words[..data_len]);
        padded.push(0);
        let checksum = rs1024::create_checksum(&padded, false);
        padded.extend_from_slice(&checksum);
        words = padded;
        let mnemonic = wordlist::indices_to_mnemonic(&words);
        assert!(matches!(
            Share::from_mnemonic(&mnemonic),
            Err(Error::InvalidPadding)
        ));
    }

    #[test]
    fn out_of_range_fields_refuse_to_encode() {
        let mut share = sample_share();
        share.group_threshold = 0;
        assert!(share.to_mnemonic().is_err());

        let mut share = sample_share();
        share.identifier = 1 << ID_LENGTH_BITS;
        assert!(share.to_mnemonic().is_err());

        let mut share = sample_share();
        share.value = vec![0u8; 15];
        assert!(share.to_mnemonic().is_err());
    }
}
