// crates/itsuku-prove/src/verify.rs

//! The verifier: reconstructs the selected memory elements and Merkle
//! opening from a compact [`Proof`], recomputes the authentication paths
//! bottom-up, replays the Omega chain, and checks the difficulty target.

use crate::omega::{compute_omega, leading_zero_bits, pad_root, ElementSource};
use crate::proof::Proof;
use itsuku_core::{compress, Element};
use std::collections::BTreeMap;

/// Everything that can go wrong while verifying a [`Proof`]. Each variant is
/// a distinct, stable failure mode; none carries unwinding semantics beyond
/// the value itself.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    /// A proof entry's antecedent count matches neither the seed case (1)
    /// nor the compression case (`n`), or disagrees with the leaf's
    /// position-derived expectation.
    #[error("leaf {leaf}: antecedent count {got} does not match expected {expected}")]
    InvalidAntecedentCount {
        /// The offending leaf index.
        leaf: u64,
        /// The antecedent count actually present.
        got: usize,
        /// The antecedent count the leaf's chunk position requires.
        expected: usize,
    },
    /// The opening map lacks a selected leaf's node entry.
    #[error("opening is missing leaf node {0}")]
    MissingOpeningForLeaf(u64),
    /// The recomputed leaf hash disagrees with the opened hash.
    #[error("leaf hash mismatch at node {0}")]
    LeafHashMismatch(u64),
    /// An internal-node recompute disagrees with its opening.
    #[error("intermediate hash mismatch at node {0}")]
    IntermediateHashMismatch(u64),
    /// The opening lacks the root entry (node 0).
    #[error("opening is missing the merkle root")]
    MissingMerkleRoot,
    /// The opening does not cover a required authentication path.
    #[error("opening does not fully cover the authentication path for leaf {0}")]
    MalformedProofPath(u64),
    /// The Omega replay selected a leaf with no corresponding antecedent
    /// entry in the proof.
    #[error("leaf {0} was selected during omega replay but has no antecedent entry")]
    UnprovenLeafInPath(u64),
    /// Omega has fewer than the configured leading zero bits.
    #[error("omega does not meet the configured difficulty")]
    DifficultyNotMet,
    /// A `leaf_antecedents` entry names a leaf index outside the valid
    /// `[0, T)` memory range, so no element could ever occupy that position.
    #[error("leaf {0} is outside the valid memory range for this configuration")]
    RequiredElementMissing(u64),
    /// A child node required for intermediate recomputation is absent from
    /// the opening.
    #[error("child node {0} required for intermediate recomputation is missing")]
    MissingChildNode(u64),
}

/// A memory view backed by the verifier's partially reconstructed elements.
/// A missing key falls back to a zero [`Element`] (the benign default — see
/// [`VerifyError::RequiredElementMissing`] for the eager, structural check
/// that catches genuinely out-of-range leaves before replay ever runs);
/// a miss here only ever means "Omega selected a leaf the prover never
/// supplied antecedents for", which step 5 reports as
/// [`VerifyError::UnprovenLeafInPath`].
struct PartialMemoryView<'a> {
    map: &'a BTreeMap<u64, Element>,
}

impl<'a> PartialMemoryView<'a> {
    const fn new(map: &'a BTreeMap<u64, Element>) -> Self {
        Self { map }
    }
}

impl ElementSource for PartialMemoryView<'_> {
    fn get_element(&self, index: u64) -> Element {
        self.map.get(&index).copied().unwrap_or_else(Element::zero)
    }
}

/// Verify `proof`, recomputing and cross-checking everything it claims.
///
/// # Errors
/// Returns the first [`VerifyError`] encountered, in the order described by
/// the component design: leaf-range and antecedent reconstruction, leaf
/// hashes, bottom-up intermediate recomputation, root presence, Omega
/// replay coverage, then the difficulty test.
pub fn verify(proof: &Proof) -> Result<(), VerifyError> {
    let config = &proof.config;
    let t = config.total_elements();
    let m = itsuku_merkle::node_size(config.d, config.l);

    tracing::debug!(nonce = proof.nonce, selected = proof.leaf_antecedents.len(), "verifying proof");

    // 1. Partial memory reconstruction.
    let mut partial_memory: BTreeMap<u64, Element> = BTreeMap::new();
    for (&leaf, antecedents) in &proof.leaf_antecedents {
        if leaf >= t {
            return Err(VerifyError::RequiredElementMissing(leaf));
        }
        let pos = leaf % config.ell;
        let expected = if pos < u64::from(config.n) { 1 } else { config.n as usize };

        let element = if antecedents.len() == 1 && expected == 1 {
            antecedents[0]
        } else if antecedents.len() == config.n as usize && expected == config.n as usize {
            compress(antecedents, config.n, leaf, &proof.challenge_id)
        } else {
            return Err(VerifyError::InvalidAntecedentCount {
                leaf,
                got: antecedents.len(),
                expected,
            });
        };
        partial_memory.insert(leaf, element);
    }

    // 2. Leaf verification.
    for (&leaf, element) in &partial_memory {
        let k = t - 1 + leaf;
        let computed = itsuku_merkle::leaf_hash(element, &proof.challenge_id, m);
        let opened = proof
            .tree_opening
            .get(&k)
            .ok_or(VerifyError::MissingOpeningForLeaf(leaf))?;
        if *opened != computed {
            return Err(VerifyError::LeafHashMismatch(leaf));
        }
    }

    // 2b. Strict bottom-up intermediate recomputation along every selected
    // leaf's authentication path.
    for &leaf in partial_memory.keys() {
        let mut k = t - 1 + leaf;
        while k != 0 {
            let sibling = if k % 2 == 0 { k - 1 } else { k + 1 };
            let parent = (k - 1) / 2;
            let (left_idx, right_idx) = if k % 2 == 1 { (k, sibling) } else { (sibling, k) };

            let left = proof
                .tree_opening
                .get(&left_idx)
                .ok_or(VerifyError::MissingChildNode(left_idx))?;
            let right = proof
                .tree_opening
                .get(&right_idx)
                .ok_or(VerifyError::MissingChildNode(right_idx))?;
            let expected_parent = itsuku_merkle::intermediate_hash(left, right, &proof.challenge_id, m);

            let got_parent = proof
                .tree_opening
                .get(&parent)
                .ok_or(VerifyError::MalformedProofPath(leaf))?;
            if *got_parent != expected_parent {
                return Err(VerifyError::IntermediateHashMismatch(parent));
            }
            k = parent;
        }
    }

    // 3. Root extraction.
    let root_opened = proof
        .tree_opening
        .get(&0)
        .ok_or(VerifyError::MissingMerkleRoot)?;
    let root_padded = pad_root(root_opened);

    // 4. Omega replay.
    let view = PartialMemoryView::new(&partial_memory);
    let result = compute_omega(&proof.challenge_id, &view, &root_padded, t, proof.nonce, config.l);

    // 5. Path coverage.
    for &leaf in &result.selected_leaves {
        if !proof.leaf_antecedents.contains_key(&leaf) {
            return Err(VerifyError::UnprovenLeafInPath(leaf));
        }
    }

    // 6. Difficulty.
    if leading_zero_bits(&result.omega) < config.d {
        return Err(VerifyError::DifficultyNotMet);
    }

    tracing::debug!(nonce = proof.nonce, "proof verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::search;
    use itsuku_core::{ChallengeId, Config};
    use itsuku_merkle::MerkleTree;

    fn small_config() -> Config {
        Config {
            ell: 64,
            p: 2,
            n: 4,
            d: 4,
            l: 9,
        }
    }

    #[test]
    fn out_of_range_leaf_is_required_element_missing() {
        let config = small_config();
        let proof = Proof {
            config,
            challenge_id: ChallengeId::new(vec![0u8; 64]),
            nonce: 1,
            leaf_antecedents: BTreeMap::from([(config.total_elements() + 5, vec![Element::zero()])]),
            tree_opening: BTreeMap::new(),
        };

        assert_eq!(
            verify(&proof),
            Err(VerifyError::RequiredElementMissing(config.total_elements() + 5))
        );
    }

    #[test]
    fn leaf_omega_selects_but_never_proved_is_unproven_leaf_in_path() {
        let config = small_config();
        let challenge = ChallengeId::new((0u8..=63).collect());
        let memory = itsuku_core::Memory::build(&config, &challenge, false).expect("valid config");
        let tree = MerkleTree::build(&memory, &challenge);

        let mut proof = search(&config, &challenge, &memory, &tree, false, Some(500_000))
            .expect("a solution exists within the bounded sweep at d=4");

        let dropped_leaf = *proof
            .leaf_antecedents
            .keys()
            .next()
            .expect("at least one selected leaf");
        proof.leaf_antecedents.remove(&dropped_leaf);

        assert_eq!(verify(&proof), Err(VerifyError::UnprovenLeafInPath(dropped_leaf)));
    }

    #[test]
    fn a_genuine_proof_verifies() {
        let config = small_config();
        let challenge = ChallengeId::new((0u8..=63).collect());
        let memory = itsuku_core::Memory::build(&config, &challenge, false).expect("valid config");
        let tree = MerkleTree::build(&memory, &challenge);

        let proof = search(&config, &challenge, &memory, &tree, false, Some(500_000))
            .expect("a solution exists within the bounded sweep at d=4");

        assert_eq!(verify(&proof), Ok(()));
    }
}
