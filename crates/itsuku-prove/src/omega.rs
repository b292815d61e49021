// crates/itsuku-prove/src/omega.rs

//! The Omega chain: the nonce-driven hash walk that selects `L` leaves and
//! folds them into the final difficulty target.

use itsuku_core::{ChallengeId, Element};
use itsuku_crypto::{Blake3Hash, VariableOutputHash};

/// A read-only view over memory elements, abstracting over a full [`itsuku_core::Memory`]
/// (prover side) and a partially reconstructed map (verifier side).
pub trait ElementSource {
    /// Return the element at global index `index`.
    fn get_element(&self, index: u64) -> Element;
}

impl ElementSource for itsuku_core::Memory {
    fn get_element(&self, index: u64) -> Element {
        Self::get_element(self, index)
    }
}

/// The outputs of one Omega chain evaluation.
#[derive(Clone, Debug)]
pub struct OmegaResult {
    /// The final 64-byte difficulty target.
    pub omega: [u8; 64],
    /// The `L` selected leaf indices, in walk order.
    pub selected_leaves: Vec<u64>,
    /// The `L + 1` path hashes `Y[0..=L]`.
    pub path_hashes: Vec<[u8; 64]>,
}

/// Right-pad an `M`-byte Merkle root out to 64 bytes with zeros.
#[must_use]
pub fn pad_root(root: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    let take = root.len().min(64);
    out[..take].copy_from_slice(&root[..take]);
    out
}

/// Walk the Omega chain for one `nonce` against `source`, with `root_hash_padded`
/// and `memory_size = T` as fixed inputs.
#[must_use]
pub fn compute_omega<S: ElementSource>(
    challenge: &ChallengeId,
    source: &S,
    root_hash_padded: &[u8; 64],
    memory_size: u64,
    nonce: u64,
    l: u32,
) -> OmegaResult {
    let mut path_hashes = Vec::with_capacity(l as usize + 1);

    let mut h = Blake3Hash::new();
    h.update(&nonce.to_le_bytes());
    h.update(root_hash_padded);
    h.update(challenge.bytes());
    let mut y0 = [0u8; 64];
    h.finalize_to(&mut y0);
    path_hashes.push(y0);

    let mut selected_leaves = Vec::with_capacity(l as usize);
    for j in 0..l as usize {
        let yj = path_hashes[j];
        let leaf_bytes: [u8; 8] = yj[0..8].try_into().expect("8-byte window");
        let leaf = u64::from_le_bytes(leaf_bytes) % memory_size;
        selected_leaves.push(leaf);

        let mut e = source.get_element(leaf);
        e.xor_assign_bytes(challenge.bytes());

        let mut hh = Blake3Hash::new();
        hh.update(&yj);
        hh.update(&e.to_le_bytes());
        let mut yj1 = [0u8; 64];
        hh.finalize_to(&mut yj1);
        path_hashes.push(yj1);
    }

    let mut s = Blake3Hash::new();
    for yj in path_hashes[1..=l as usize].iter().rev() {
        s.update(yj);
    }
    let mut e0 = Element::from_le_bytes(&path_hashes[0]);
    e0.xor_assign_bytes(challenge.bytes());
    s.update(&e0.to_le_bytes());

    let mut omega = [0u8; 64];
    s.finalize_to(&mut omega);

    OmegaResult {
        omega,
        selected_leaves,
        path_hashes,
    }
}

/// Count leading zero bits from the most-significant end of byte 0. A fully
/// zero buffer counts all `8 * len` bits.
#[must_use]
pub fn leading_zero_bits(bytes: &[u8]) -> u32 {
    let mut count = 0u32;
    for &b in bytes {
        if b == 0 {
            count += 8;
            continue;
        }
        count += b.leading_zeros();
        break;
    }
    count
}
