// crates/itsuku-merkle/src/lib.rs

//! Flat-array Merkle commitment over Itsuku memory.
//!
//! - Node width `M` is derived from `(d, L)` so the root only needs to carry
//!   enough entropy relative to the difficulty target and search length.
//! - Leaves are hashed from memory elements; internal nodes fold their two
//!   children — both salted with the challenge id, same as the memory
//!   builder's own hashing.
//! - [`MerkleTree::trace_node`] walks a leaf's authentication path up to and
//!   including the root, inserting each node and its sibling into a caller
//!   supplied opening map.

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

use itsuku_core::{ChallengeId, Element, Memory};
use itsuku_crypto::{Blake3Hash, VariableOutputHash};
use std::collections::BTreeMap;

/// Derive the Merkle node width in bytes from difficulty `d` and search
/// length `L`:
/// `M = ceil((d + log2(1 + L + ceil(L/2)) + 6) / 8)`.
#[must_use]
pub fn node_size(d: u32, l: u32) -> usize {
    let ceil_half = (f64::from(l) / 2.0).ceil();
    let inner = 1.0 + f64::from(l) + ceil_half;
    let bits = f64::from(d) + inner.log2() + 6.0;
    (bits / 8.0).ceil() as usize
}

/// Hash a leaf: `H(element.to_le_bytes() || challenge_id.bytes)`, truncated
/// to `m` bytes.
#[must_use]
pub fn leaf_hash(element: &Element, challenge: &ChallengeId, m: usize) -> Vec<u8> {
    let mut h = Blake3Hash::new();
    h.update(&element.to_le_bytes());
    h.update(challenge.bytes());
    let mut out = vec![0u8; m];
    h.finalize_to(&mut out);
    out
}

/// Hash an intermediate node from its two children:
/// `H(left || right || challenge_id.bytes)`, truncated to `m` bytes.
#[must_use]
pub fn intermediate_hash(left: &[u8], right: &[u8], challenge: &ChallengeId, m: usize) -> Vec<u8> {
    let mut h = Blake3Hash::new();
    h.update(left);
    h.update(right);
    h.update(challenge.bytes());
    let mut out = vec![0u8; m];
    h.finalize_to(&mut out);
    out
}

/// A complete binary tree over `T` leaves, stored as a flat array of
/// `2T - 1` nodes of width `M` bytes. Node `0` is the root; children of `k`
/// are `2k+1` and `2k+2`; the leaf for global element index `g` is node
/// `T - 1 + g`.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    m: usize,
    t: u64,
    storage: Vec<u8>,
}

impl MerkleTree {
    /// Build the tree over `memory`'s elements, salted with `challenge`.
    ///
    /// Leaves are populated first, then internal nodes from `T - 2` down to
    /// `0` inclusive — node `0` is therefore computed exactly once.
    #[must_use]
    pub fn build(memory: &Memory, challenge: &ChallengeId) -> Self {
        let config = memory.config();
        let m = node_size(config.d, config.l);
        let t = memory.total_elements();
        let total_nodes = (2 * t - 1) as usize;

        tracing::info!(t, m, "building merkle tree");

        let mut storage = vec![0u8; total_nodes * m];

        for g in 0..t {
            let idx = (t - 1 + g) as usize;
            let elem = memory.get_element(g);
            let hash = leaf_hash(&elem, challenge, m);
            storage[idx * m..idx * m + m].copy_from_slice(&hash);
        }

        for p in (0..(t as usize - 1)).rev() {
            let (left, right) = (2 * p + 1, 2 * p + 2);
            let hash = intermediate_hash(
                &storage[left * m..left * m + m],
                &storage[right * m..right * m + m],
                challenge,
                m,
            );
            storage[p * m..p * m + m].copy_from_slice(&hash);
        }

        Self { m, t, storage }
    }

    /// Node width in bytes.
    #[inline]
    #[must_use]
    pub const fn node_width(&self) -> usize {
        self.m
    }

    /// Total leaf count `T`.
    #[inline]
    #[must_use]
    pub const fn leaf_count(&self) -> u64 {
        self.t
    }

    /// The leaf node index for global element index `g`.
    #[inline]
    #[must_use]
    pub const fn leaf_index(&self, g: u64) -> u64 {
        self.t - 1 + g
    }

    /// Borrow the `M` bytes stored at node index `k`.
    #[must_use]
    pub fn node(&self, k: u64) -> &[u8] {
        let k = k as usize;
        &self.storage[k * self.m..k * self.m + self.m]
    }

    /// The root hash (node 0).
    #[must_use]
    pub fn root(&self) -> &[u8] {
        self.node(0)
    }

    /// Walk the authentication path from leaf/node `k` to the root,
    /// inserting `k`, its sibling, and every ancestor-and-sibling pair along
    /// the way into `opening`. The root's sibling is never inserted.
    pub fn trace_node(&self, k: u64, opening: &mut BTreeMap<u64, Vec<u8>>) {
        let mut k = k;
        loop {
            opening.insert(k, self.node(k).to_vec());
            if k == 0 {
                return;
            }
            let sibling = if k % 2 == 0 { k - 1 } else { k + 1 };
            opening.insert(sibling, self.node(sibling).to_vec());
            k = (k - 1) / 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itsuku_core::Config;

    #[test]
    fn node_size_matches_spec_scenarios() {
        assert_eq!(node_size(24, 9), 5);
        assert_eq!(node_size(70, 9), 10);
    }

    #[test]
    fn auth_path_cardinality_scenario_7() {
        // T = 16: tracing the leaf at node 30 yields exactly these 9 nodes.
        let config = Config {
            ell: 16,
            p: 1,
            n: 4,
            d: 8,
            l: 1,
        };
        let challenge = ChallengeId::new((0u8..=63).collect());
        let mem = Memory::build(&config, &challenge, false).unwrap();
        let tree = MerkleTree::build(&mem, &challenge);

        let mut opening = BTreeMap::new();
        tree.trace_node(30, &mut opening);

        let expected: std::collections::BTreeSet<u64> =
            [0u64, 1, 2, 5, 6, 13, 14, 29, 30].into_iter().collect();
        let got: std::collections::BTreeSet<u64> = opening.keys().copied().collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn root_excludes_sibling() {
        let config = Config {
            ell: 8,
            p: 1,
            n: 2,
            d: 8,
            l: 1,
        };
        let challenge = ChallengeId::new(vec![0u8; 64]);
        let mem = Memory::build(&config, &challenge, false).unwrap();
        let tree = MerkleTree::build(&mem, &challenge);

        let mut opening = BTreeMap::new();
        tree.trace_node(0, &mut opening);
        assert_eq!(opening.len(), 1);
        assert!(opening.contains_key(&0));
    }

    #[test]
    fn golden_root_scenario_6() {
        // P=2, ell=8, n=4, I = [0,1,...,63]: node(0)[0..5] == 68 19 65 c4 ab.
        let config = Config {
            ell: 8,
            p: 2,
            n: 4,
            d: 24,
            l: 9,
        };
        let challenge = ChallengeId::new((0u8..=63).collect());
        let mem = Memory::build(&config, &challenge, false).unwrap();
        let tree = MerkleTree::build(&mem, &challenge);

        assert_eq!(tree.root()[0..5], [0x68, 0x19, 0x65, 0xc4, 0xab]);
    }

    #[test]
    fn leaf_hash_matches_tree_node() {
        let config = Config {
            ell: 8,
            p: 2,
            n: 4,
            d: 16,
            l: 4,
        };
        let challenge = ChallengeId::new(vec![7u8; 32]);
        let mem = Memory::build(&config, &challenge, false).unwrap();
        let tree = MerkleTree::build(&mem, &challenge);

        for g in 0..mem.total_elements() {
            let expected = leaf_hash(&mem.get_element(g), &challenge, tree.node_width());
            assert_eq!(tree.node(tree.leaf_index(g)), expected.as_slice());
        }
    }
}
