//! Big-endian byte-order correction for FITS sample data.
//!
//! FITS stores every binary value most-significant byte first. Samples are
//! first reinterpreted in host order, then corrected with the swaps below,
//! which are no-ops on big-endian hosts.

/// 8-bit values have no byte order; this is the identity.
#[inline]
pub const fn swap8(value: u8) -> u8 {
    value
}

/// Exchange the two bytes of a 16-bit value.
#[inline]
pub const fn swap16(value: u16) -> u16 {
    value.rotate_left(8)
}

/// Reverse the four bytes of a 32-bit value.
#[inline]
pub const fn swap32(value: u32) -> u32 {
    ((value & 0x0000_00ff) << 24)
        | ((value & 0x0000_ff00) << 8)
        | ((value >> 8) & 0x0000_ff00)
        | ((value >> 24) & 0x0000_00ff)
}

/// Reverse the eight bytes of a 64-bit value.
#[inline]
pub const fn swap64(value: u64) -> u64 {
    ((swap32(value as u32) as u64) << 32) | swap32((value >> 32) as u32) as u64
}

const HOST_IS_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");

/// Convert a 16-bit value read in host order from big-endian bytes.
#[inline]
pub const fn be_to_native16(value: u16) -> u16 {
    if HOST_IS_LITTLE_ENDIAN {
        swap16(value)
    } else {
        value
    }
}

/// Convert a 32-bit value read in host order from big-endian bytes.
#[inline]
pub const fn be_to_native32(value: u32) -> u32 {
    if HOST_IS_LITTLE_ENDIAN {
        swap32(value)
    } else {
        value
    }
}

/// Convert a 64-bit value read in host order from big-endian bytes.
#[inline]
pub const fn be_to_native64(value: u64) -> u64 {
    if HOST_IS_LITTLE_ENDIAN {
        swap64(value)
    } else {
        value
    }
}

/// Inverse of [`be_to_native16`] (the same swap).
#[inline]
pub const fn native_to_be16(value: u16) -> u16 {
    be_to_native16(value)
}

/// Inverse of [`be_to_native32`] (the same swap).
#[inline]
pub const fn native_to_be32(value: u32) -> u32 {
    be_to_native32(value)
}

/// Inverse of [`be_to_native64`] (the same swap).
#[inline]
pub const fn native_to_be64(value: u64) -> u64 {
    be_to_native64(value)
}
