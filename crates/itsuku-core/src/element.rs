// crates/itsuku-core/src/element.rs

//! A 512-bit `Element`: eight 64-bit lanes with lane-wise arithmetic.
//!
//! `Element` is the unit of memory in the Itsuku builder and the unit of
//! leaf data in the Merkle tree. All arithmetic is lane-wise and wrapping;
//! the canonical byte form is little-endian per lane.

use serde::{Deserialize, Serialize};

/// Number of 64-bit lanes in an [`Element`].
pub const LANES: usize = 8;

/// Byte width of an [`Element`] in its canonical little-endian form.
pub const ELEMENT_BYTES: usize = LANES * 8;

/// A 512-bit value represented as eight 64-bit lanes.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Element {
    lanes: [u64; LANES],
}

impl Element {
    /// The all-zero element.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self { lanes: [0; LANES] }
    }

    /// Borrow the lanes directly.
    #[inline]
    #[must_use]
    pub const fn lanes(&self) -> &[u64; LANES] {
        &self.lanes
    }

    /// Mutably borrow the lanes directly.
    #[inline]
    pub fn lanes_mut(&mut self) -> &mut [u64; LANES] {
        &mut self.lanes
    }

    /// Lane-wise wrapping add.
    #[inline]
    pub fn add_assign(&mut self, other: &Self) {
        for (a, b) in self.lanes.iter_mut().zip(other.lanes.iter()) {
            *a = a.wrapping_add(*b);
        }
    }

    /// Lane-wise XOR.
    #[inline]
    pub fn xor_assign(&mut self, other: &Self) {
        for (a, b) in self.lanes.iter_mut().zip(other.lanes.iter()) {
            *a ^= *b;
        }
    }

    /// XOR the first `min(slice.len(), 64)` bytes of `slice`, reinterpreted
    /// as little-endian 64-bit words (the final partial word, if any, is
    /// zero-padded before parsing), into the corresponding lanes. Lanes with
    /// no corresponding input bytes are left unchanged.
    pub fn xor_assign_bytes(&mut self, slice: &[u8]) {
        let take = slice.len().min(ELEMENT_BYTES);
        for (lane, chunk) in self.lanes.iter_mut().zip(slice[..take].chunks(8)) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            *lane ^= u64::from_le_bytes(buf);
        }
    }

    /// Serialize to exactly 64 bytes, little-endian per lane.
    #[inline]
    #[must_use]
    pub fn to_le_bytes(&self) -> [u8; ELEMENT_BYTES] {
        let mut out = [0u8; ELEMENT_BYTES];
        for (i, lane) in self.lanes.iter().enumerate() {
            out[i * 8..i * 8 + 8].copy_from_slice(&lane.to_le_bytes());
        }
        out
    }

    /// Parse an [`Element`] from at least 64 bytes, little-endian per lane.
    ///
    /// # Panics
    /// Panics if `bytes` is shorter than [`ELEMENT_BYTES`]; callers control
    /// hash output lengths and always finalize to at least 64 bytes.
    #[inline]
    #[must_use]
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() >= ELEMENT_BYTES,
            "element parse requires at least {ELEMENT_BYTES} bytes, got {}",
            bytes.len()
        );
        let mut lanes = [0u64; LANES];
        for (i, lane) in lanes.iter_mut().enumerate() {
            let start = i * 8;
            let word: [u8; 8] = bytes[start..start + 8]
                .try_into()
                .expect("8-byte window");
            *lane = u64::from_le_bytes(word);
        }
        Self { lanes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_all_zero_lanes() {
        assert_eq!(Element::zero().lanes(), &[0u64; LANES]);
    }

    #[test]
    fn add_assign_wraps() {
        let mut a = Element {
            lanes: [u64::MAX; LANES],
        };
        let one = Element {
            lanes: [1; LANES],
        };
        a.add_assign(&one);
        assert_eq!(a.lanes(), &[0u64; LANES]);
    }

    #[test]
    fn xor_assign_is_involution() {
        let mut a = Element { lanes: [5; LANES] };
        let b = Element { lanes: [9; LANES] };
        a.xor_assign(&b);
        a.xor_assign(&b);
        assert_eq!(a.lanes(), &[5u64; LANES]);
    }

    #[test]
    fn xor_assign_bytes_partial_lane_is_zero_padded() {
        let mut a = Element::zero();
        // 5 bytes -> only lane 0 touched, rest unchanged.
        a.xor_assign_bytes(&[1, 0, 0, 0, 0]);
        assert_eq!(a.lanes()[0], 1u64);
        assert_eq!(&a.lanes()[1..], &[0u64; LANES - 1]);
    }

    #[test]
    fn xor_assign_bytes_truncates_beyond_64() {
        let mut a = Element::zero();
        let long = vec![0xffu8; 100];
        a.xor_assign_bytes(&long);
        assert_eq!(a.lanes(), &[u64::MAX; LANES]);
    }

    #[test]
    fn roundtrip_le_bytes() {
        let e = Element {
            lanes: [1, 2, 3, 4, 5, 6, 7, 8],
        };
        let bytes = e.to_le_bytes();
        let back = Element::from_le_bytes(&bytes);
        assert_eq!(e, back);
    }
}
