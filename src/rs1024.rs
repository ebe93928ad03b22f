//! RS1024 Reed-Solomon checksum over 10-bit symbols.
//!
//! Any error touching at most 3 words is detected with certainty; larger
//! errors slip through with probability below 2^-30. The code only detects,
//! it never corrects.

/// Feedback coefficients of the SLIP-0039 generator polynomial.
const GEN: [u32; 10] = [
    0x00E0_E040,
    0x01C1_C080,
    0x0383_8100,
    0x0707_0200,
    0x0E0E_0009,
    0x1C0C_2412,
    0x3808_6C24,
    0x3090_FC48,
    0x21B1_F890,
    0x03F3_F120,
];

/// Customization string for non-extendable shares.
pub const CUSTOMIZATION_NON_EXTENDABLE: &[u8] = b"shamir";

/// Customization string for extendable shares.
pub const CUSTOMIZATION_EXTENDABLE: &[u8] = b"shamir_extendable";

/// Number of checksum words appended to a share.
pub const CHECKSUM_LENGTH_WORDS: usize = 3;

/// Select the customization string for the given extendable flag.
pub fn customization_string(extendable: bool) -> &'static [u8] {
    if extendable {
        CUSTOMIZATION_EXTENDABLE
    } else {
        CUSTOMIZATION_NON_EXTENDABLE
    }
}

fn polymod(values: impl Iterator<Item = u16>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let b = chk >> 20;
        chk = ((chk & 0xF_FFFF) << 10) ^ u32::from(v);
        for (i, gen) in GEN.iter().enumerate() {
            if (b >> i) & 1 != 0 {
                chk ^= gen;
            }
        }
    }
    chk
}

/// Compute the three checksum words for `data`.
pub fn create_checksum(data: &[u16], extendable: bool) -> [u16; 3] {
    let cs = customization_string(extendable);
    let values = cs
        .iter()
        .map(|&c| u16::from(c))
        .chain(data.iter().copied())
        .chain([0u16; 3]);
    let chk = polymod(values) ^ 1;
    [
        ((chk >> 20) & 0x3FF) as u16,
        ((chk >> 10) & 0x3FF) as u16,
        (chk & 0x3FF) as u16,
    ]
}

/// Verify a symbol sequence whose last three words are its checksum.
pub fn verify_checksum(data: &[u16], extendable: bool) -> bool {
    let cs = customization_string(extendable);
    polymod(cs.iter().map(|&c| u16::from(c)).chain(data.iter().copied())) == 1
}
