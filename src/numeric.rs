//! Numeric narrow/widen helpers
//!
//! Every integer on the wire is treated as unsigned. Values travel through
//! the codecs as `u64`; these helpers move between that carrier, the
//! declared wire width, and signed record fields.

/// Mask covering the low `bits` bits (0..=64)
pub fn bit_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Mask covering `width` whole bytes
pub fn width_mask(width: usize) -> u64 {
    bit_mask((width as u32).saturating_mul(8))
}

/// Truncate `value` to `width` bytes, dropping the high bits
pub fn narrow(value: u64, width: usize) -> u64 {
    value & width_mask(width)
}

/// Whether `value` survives narrowing to `width` bytes unchanged
pub fn fits(value: u64, width: usize) -> bool {
    narrow(value, width) == value
}

/// Two's-complement bits of a signed value, kept to `width` bytes
pub fn unsigned_from_signed(value: i64, width: usize) -> u64 {
    narrow(value as u64, width)
}

/// Sign-extend the low `width` bytes of `value`
pub fn signed_from_unsigned(value: u64, width: usize) -> i64 {
    let bits = (width as u32).saturating_mul(8);
    if bits == 0 {
        return 0;
    }
    if bits >= 64 {
        return value as i64;
    }
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

/// Accumulate big-endian bytes into an unsigned integer (byte 0 most significant)
///
/// Only the last eight bytes contribute when `bytes` is longer than a `u64`.
pub fn from_be_bytes(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Split the low `width` bytes of `value` into big-endian order
pub fn to_be_bytes(value: u64, width: usize) -> Vec<u8> {
    (0..width)
        .rev()
        .map(|i| {
            if i >= 8 {
                0
            } else {
                (value >> (i * 8)) as u8
            }
        })
        .collect()
}
