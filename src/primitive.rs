//! Fixed width integer primitives used by the TZif decoder.
//!
//! TZif stores every integer in network (big-endian) byte order. Counts and
//! offsets are four bytes wide; version 2+ transition and leap second
//! instants are eight bytes wide. Both are two's-complement signed.

/// Interprets `bytes` as an unsigned big-endian integer.
///
/// `bytes[0]` is the most significant byte. Widths of 1, 4 and 8 bytes are
/// the ones found in a TZif file. For slices longer than eight bytes only the
/// trailing eight bytes are significant.
///
/// ```rust
/// use tzif_rs::primitive::decode_uint;
///
/// assert_eq!(decode_uint(&[0x01]), 1);
/// assert_eq!(decode_uint(&[0x00, 0x00, 0x01, 0x00]), 256);
/// assert_eq!(decode_uint(&[0xff; 8]), u64::MAX);
/// ```
#[inline]
#[must_use]
pub fn decode_uint(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

/// Reinterprets `value` as a two's-complement signed integer of `width` bytes.
///
/// Any value above `2^(8 * width - 1) - 1` wraps to `value - 2^(8 * width)`.
/// The computation is carried out in 128 bits, so an eight byte width cannot
/// overflow. `width` is clamped to `1..=8`.
///
/// ```rust
/// use tzif_rs::primitive::to_signed;
///
/// assert_eq!(to_signed(0x7fff_ffff, 4), i64::from(i32::MAX));
/// assert_eq!(to_signed(0x8000_0000, 4), i64::from(i32::MIN));
/// assert_eq!(to_signed(u64::MAX, 8), -1);
/// ```
#[inline]
#[must_use]
pub fn to_signed(value: u64, width: usize) -> i64 {
    debug_assert!((1..=8).contains(&width), "unsupported width: {width}");
    let bits = 8 * width.clamp(1, 8) as u32;
    let max = (1u128 << (bits - 1)) - 1;
    let value = u128::from(value);
    if value > max {
        (value as i128 - (1i128 << bits)) as i64
    } else {
        value as i64
    }
}

/// Decodes a big-endian signed integer from `bytes`.
///
/// This is `to_signed(decode_uint(bytes), bytes.len())`.
#[inline]
#[must_use]
pub fn decode_int(bytes: &[u8]) -> i64 {
    to_signed(decode_uint(bytes), bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_unsigned_bits(value: i64, width: usize) -> u64 {
        let bits = 8 * width as u32;
        if bits == 64 {
            value as u64
        } else {
            (value as u64) & ((1u64 << bits) - 1)
        }
    }

    #[test]
    fn decode_uint_big_endian() {
        assert_eq!(decode_uint(&[]), 0);
        assert_eq!(decode_uint(&[0x2a]), 42);
        assert_eq!(decode_uint(&[0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
        assert_eq!(
            decode_uint(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]),
            0x0102_0304_0506_0708
        );
        for value in [0u64, 1, 255, 256, 0xdead_beef, u64::from(u32::MAX)] {
            assert_eq!(decode_uint(&(value as u32).to_be_bytes()), value);
        }
        for value in [0u64, 1, 0x0123_4567_89ab_cdef, u64::MAX] {
            assert_eq!(decode_uint(&value.to_be_bytes()), value);
        }
    }

    #[test]
    fn to_signed_boundaries() {
        let cases: [(i64, usize); 10] = [
            (0, 4),
            (-1, 4),
            (i64::from(i32::MAX), 4),
            (i64::from(i32::MIN), 4),
            (-2_334_101_314, 8),
            (0, 8),
            (-1, 8),
            (i64::MAX, 8),
            (i64::MIN, 8),
            (-128, 1),
        ];
        for (value, width) in cases {
            assert_eq!(
                to_signed(to_unsigned_bits(value, width), width),
                value,
                "value {value} with width {width}"
            );
        }
    }

    #[test]
    fn to_signed_positive_is_unchanged() {
        assert_eq!(to_signed(127, 1), 127);
        assert_eq!(to_signed(128, 1), -128);
        assert_eq!(to_signed(0x7fff_ffff_ffff_ffff, 8), i64::MAX);
        assert_eq!(to_signed(0x8000_0000_0000_0000, 8), i64::MIN);
    }

    #[test]
    fn decode_int_widths() {
        assert_eq!(decode_int(&[0xff, 0xff, 0xff, 0xff]), -1);
        assert_eq!(decode_int(&[0xff, 0xff, 0x8f, 0x80]), -28800);
        assert_eq!(
            decode_int(&[0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
            -576_460_752_303_423_488
        );
    }
}
