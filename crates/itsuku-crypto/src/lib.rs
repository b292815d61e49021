// crates/itsuku-crypto/src/lib.rs

//! Minimal crypto substrate: a keyed, variable-output-length hash adapter.
//!
//! The Itsuku scheme is defined against an abstract hash primitive `H` with
//! `init`/`update`/`finalize-to-N-bytes` semantics (an XOF, in practice).
//! This crate pins that contract to a concrete backend — Blake3 — behind a
//! small trait so the rest of the workspace never calls `blake3` directly.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

use blake3::Hasher;
use std::io::Read;

/// A streaming hash that can finalize to an arbitrary output length.
///
/// Implementations must be deterministic: the same sequence of `update`
/// calls followed by `finalize_to` of the same length must always produce
/// the same bytes.
pub trait VariableOutputHash {
    /// Create a fresh hasher state.
    #[must_use]
    fn new() -> Self;

    /// Absorb more input bytes.
    fn update(&mut self, bytes: &[u8]);

    /// Finalize, writing exactly `out.len()` bytes of output.
    ///
    /// Finalizing does not consume `self`; the underlying state may keep
    /// being updated and finalized again (this mirrors `blake3::Hasher`,
    /// which is cheaply cloneable and whose XOF reader is independent of
    /// further updates to the hasher).
    fn finalize_to(&self, out: &mut [u8]);

    /// Convenience: absorb `bytes`, finalize to a freshly allocated `Vec<u8>`
    /// of length `n`.
    #[must_use]
    fn hash_to_vec(bytes: &[u8], n: usize) -> Vec<u8>
    where
        Self: Sized,
    {
        let mut h = Self::new();
        h.update(bytes);
        let mut out = vec![0u8; n];
        h.finalize_to(&mut out);
        out
    }

    /// Convenience: absorb `bytes`, finalize to a fixed 64-byte array.
    ///
    /// 64 bytes is the element width used throughout the memory builder and
    /// Merkle leaf/intermediate hashing before any Merkle-specific
    /// truncation to `M` bytes.
    #[must_use]
    fn hash_to_64(bytes: &[u8]) -> [u8; 64]
    where
        Self: Sized,
    {
        let mut h = Self::new();
        h.update(bytes);
        let mut out = [0u8; 64];
        h.finalize_to(&mut out);
        out
    }
}

/// Blake3-backed implementation of [`VariableOutputHash`].
///
/// Deterministic and collision-resistant for cryptographic use; supports
/// arbitrary output lengths via Blake3's XOF mode.
#[derive(Clone, Debug)]
pub struct Blake3Hash {
    st: Hasher,
}

impl VariableOutputHash for Blake3Hash {
    fn new() -> Self {
        Self { st: Hasher::new() }
    }

    fn update(&mut self, bytes: &[u8]) {
        self.st.update(bytes);
    }

    fn finalize_to(&self, out: &mut [u8]) {
        let mut rdr = self.st.finalize_xof();
        rdr.read_exact(out)
            .expect("blake3::OutputReader reads are infallible for any requested length");
    }
}

#[cfg(test)]
mod tests {
    use super::{Blake3Hash, VariableOutputHash};

    #[test]
    fn deterministic() {
        let a = Blake3Hash::hash_to_vec(b"hello", 40);
        let b = Blake3Hash::hash_to_vec(b"hello", 40);
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = Blake3Hash::hash_to_vec(b"hello", 32);
        let b = Blake3Hash::hash_to_vec(b"world", 32);
        assert_ne!(a, b);
    }

    #[test]
    fn output_length_is_exact() {
        for n in [1usize, 5, 32, 64, 128] {
            let out = Blake3Hash::hash_to_vec(b"x", n);
            assert_eq!(out.len(), n);
        }
    }

    #[test]
    fn incremental_update_matches_one_shot() {
        let mut h1 = Blake3Hash::new();
        h1.update(b"foo");
        h1.update(b"bar");
        let mut out1 = [0u8; 32];
        h1.finalize_to(&mut out1);

        let out2 = Blake3Hash::hash_to_vec(b"foobar", 32);
        assert_eq!(&out1[..], &out2[..]);
    }

    #[test]
    fn hash_to_64_is_a_convenience_alias() {
        let a = Blake3Hash::hash_to_64(b"payload");
        let b = Blake3Hash::hash_to_vec(b"payload", 64);
        assert_eq!(&a[..], &b[..]);
    }
}
