//! Arithmetic over GF(2^8) with the reducing polynomial x^8 + x^4 + x^3 + x + 1.
//!
//! Multiplication and division go through precomputed log/antilog tables for
//! generator 3. Table lookups are not constant-time; callers needing
//! side-channel resistance must control the cache behavior of the host.

use crate::error::{Error, Result};

/// Antilog table: `EXP[i] = 3^i` in GF(2^8).
const EXP: [u8; 255] = [
    1, 3, 5, 15, 17, 51, 85, 255, 26, 46, 114, 150, 161, 248, 19, 53,
    95, 225, 56, 72, 216, 115, 149, 164, 247, 2, 6, 10, 30, 34, 102, 170,
    229, 52, 92, 228, 55, 89, 235, 38, 106, 190, 217, 112, 144, 171, 230, 49,
    83, 245, 4, 12, 20, 60, 68, 204, 79, 209, 104, 184, 211, 110, 178, 205,
    76, 212, 103, 169, 224, 59, 77, 215, 98, 166, 241, 8, 24, 40, 120, 136,
    131, 158, 185, 208, 107, 189, 220, 127, 129, 152, 179, 206, 73, 219, 118, 154,
    181, 196, 87, 249, 16, 48, 80, 240, 11, 29, 39, 105, 187, 214, 97, 163,
    254, 25, 43, 125, 135, 146, 173, 236, 47, 113, 147, 174, 233, 32, 96, 160,
    251, 22, 58, 78, 210, 109, 183, 194, 93, 231, 50, 86, 250, 21, 63, 65,
    195, 94, 226, 61, 71, 201, 64, 192, 91, 237, 44, 116, 156, 191, 218, 117,
    159, 186, 213, 100, 172, 239, 42, 126, 130, 157, 188, 223, 122, 142, 137, 128,
    155, 182, 193, 88, 232, 35, 101, 175, 234, 37, 111, 177, 200, 67, 197, 84,
    252, 31, 33, 99, 165, 244, 7, 9, 27, 45, 119, 153, 176, 203, 70, 202,
    69, 207, 74, 222, 121, 139, 134, 145, 168, 227, 62, 66, 198, 81, 243, 14,
    18, 54, 90, 238, 41, 123, 141, 140, 143, 138, 133, 148, 167, 242, 13, 23,
    57, 75, 221, 124, 132, 151, 162, 253, 28, 36, 108, 180, 199, 82, 246,
];

/// Log table: `LOG[x]` is the discrete log of `x` base 3. `LOG[0]` is unused.
const LOG: [u8; 256] = [
    0, 0, 25, 1, 50, 2, 26, 198, 75, 199, 27, 104, 51, 238, 223, 3,
    100, 4, 224, 14, 52, 141, 129, 239, 76, 113, 8, 200, 248, 105, 28, 193,
    125, 194, 29, 181, 249, 185, 39, 106, 77, 228, 166, 114, 154, 201, 9, 120,
    101, 47, 138, 5, 33, 15, 225, 36, 18, 240, 130, 69, 53, 147, 218, 142,
    150, 143, 219, 189, 54, 208, 206, 148, 19, 92, 210, 241, 64, 70, 131, 56,
    102, 221, 253, 48, 191, 6, 139, 98, 179, 37, 226, 152, 34, 136, 145, 16,
    126, 110, 72, 195, 163, 182, 30, 66, 58, 107, 40, 84, 250, 133, 61, 186,
    43, 121, 10, 21, 155, 159, 94, 202, 78, 212, 172, 229, 243, 115, 167, 87,
    175, 88, 168, 80, 244, 234, 214, 116, 79, 174, 233, 213, 231, 230, 173, 232,
    44, 215, 117, 122, 235, 22, 11, 245, 89, 203, 95, 176, 156, 169, 81, 160,
    127, 12, 246, 111, 23, 196, 73, 236, 216, 67, 31, 45, 164, 118, 123, 183,
    204, 187, 62, 90, 251, 96, 177, 134, 59, 82, 161, 108, 170, 85, 41, 157,
    151, 178, 135, 144, 97, 190, 220, 252, 188, 149, 207, 205, 55, 63, 91, 209,
    83, 57, 132, 60, 65, 162, 109, 71, 20, 42, 158, 93, 86, 242, 211, 171,
    68, 17, 146, 217, 35, 32, 46, 137, 180, 124, 184, 38, 119, 153, 227, 165,
    103, 74, 237, 222, 197, 49, 254, 24, 13, 99, 140, 128, 192, 247, 112, 7,
];

/// Add two field elements. Subtraction is identical in characteristic 2.
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiply two field elements.
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    EXP[(LOG[a as usize] as usize + LOG[b as usize] as usize) % 255]
}

/// Divide `a` by a nonzero `b`.
#[inline]
pub fn div(a: u8, b: u8) -> Result<u8> {
    if b == 0 {
        return Err(Error::InvalidInput("division by zero in GF(256)".into()));
    }
    if a == 0 {
        return Ok(0);
    }
    Ok(EXP[(LOG[a as usize] as usize + 255 - LOG[b as usize] as usize) % 255])
}

/// Multiplicative inverse of a nonzero element.
#[inline]
pub fn inv(a: u8) -> Result<u8> {
    if a == 0 {
        return Err(Error::InvalidInput("zero has no inverse in GF(256)".into()));
    }
    Ok(EXP[(255 - LOG[a as usize] as usize) % 255])
}

/// Evaluate at `x` the unique polynomial of degree < `points.len()` passing
/// through the given points, byte-parallel over equal-length value vectors.
///
/// Every x-coordinate must be distinct and all value vectors must have the
/// same length. When `x` is itself one of the points, that point's value is
/// returned directly.
pub fn interpolate(points: &[(u8, &[u8])], x: u8) -> Result<Vec<u8>> {
    if points.is_empty() {
        return Err(Error::InvalidInput(
            "interpolation requires at least one point".into(),
        ));
    }

    let mut seen = [false; 256];
    for &(xi, _) in points {
        if seen[xi as usize] {
            return Err(Error::InconsistentShares(
                "share indices must be unique".into(),
            ));
        }
        seen[xi as usize] = true;
    }

    let len = points[0].1.len();
    if points.iter().any(|(_, ys)| ys.len() != len) {
        return Err(Error::InconsistentShares(
            "all share values must have the same length".into(),
        ));
    }

    if let Some(&(_, ys)) = points.iter().find(|&&(xi, _)| xi == x) {
        return Ok(ys.to_vec());
    }

    let mut result = vec![0u8; len];
    for &(xi, ys) in points {
        // Lagrange basis L_i(x) = prod_{j != i} (x - x_j) / (x_i - x_j)
        let mut basis = 1u8;
        for &(xj, _) in points {
            if xj != xi {
                basis = mul(basis, div(add(x, xj), add(xi, xj))?);
            }
        }
        for (r, &y) in result.iter_mut().zip(ys) {
            *r = add(*r, mul(y, basis));
        }
    }
    Ok(result)
}
