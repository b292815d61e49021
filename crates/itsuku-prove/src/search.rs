// crates/itsuku-prove/src/search.rs

//! The prover's nonce sweep: repeatedly walk the Omega chain against the
//! real memory and tree until the difficulty target is met, then assemble
//! the proof from the winning nonce's selected leaves.

use crate::omega::{compute_omega, leading_zero_bits, pad_root};
use crate::proof::Proof;
use itsuku_core::{ChallengeId, Config, Memory};
use itsuku_merkle::MerkleTree;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Try a single nonce against `memory`/`tree`; `Some(proof)` if it meets the
/// difficulty target.
fn try_nonce(
    nonce: u64,
    config: &Config,
    challenge: &ChallengeId,
    memory: &Memory,
    tree: &MerkleTree,
    root_padded: &[u8; 64],
) -> Option<Proof> {
    let result = compute_omega(
        challenge,
        memory,
        root_padded,
        memory.total_elements(),
        nonce,
        config.l,
    );

    if leading_zero_bits(&result.omega) < config.d {
        return None;
    }

    let mut leaf_antecedents = BTreeMap::new();
    let mut tree_opening = BTreeMap::new();
    for &leaf in &result.selected_leaves {
        leaf_antecedents.insert(leaf, memory.trace_element(leaf));
        tree.trace_node(tree.leaf_index(leaf), &mut tree_opening);
    }

    Some(Proof {
        config: *config,
        challenge_id: challenge.clone(),
        nonce,
        leaf_antecedents,
        tree_opening,
    })
}

/// Sweep nonces starting at 1, up to and including `max_nonce` (unbounded if
/// `None`), looking for the first one whose Omega meets `config.d`.
///
/// When `parallel` is `true`, candidate nonces are tried concurrently across
/// `rayon`'s global thread pool and the first worker to find a solution wins
/// — other workers' in-flight attempts are simply discarded, never awaited.
///
/// Returns `None` if the swept range is exhausted without a solution; this
/// is the scheme's "absence" outcome, not an error.
#[must_use]
pub fn search(
    config: &Config,
    challenge: &ChallengeId,
    memory: &Memory,
    tree: &MerkleTree,
    parallel: bool,
    max_nonce: Option<u64>,
) -> Option<Proof> {
    let root_padded = pad_root(tree.root());
    let upper = max_nonce.unwrap_or(u64::MAX);

    tracing::info!(parallel, d = config.d, l = config.l, "starting nonce search");

    let found = if parallel {
        (1..=upper)
            .into_par_iter()
            .find_map_any(|nonce| try_nonce(nonce, config, challenge, memory, tree, &root_padded))
    } else {
        (1..=upper).find_map(|nonce| try_nonce(nonce, config, challenge, memory, tree, &root_padded))
    };

    match &found {
        Some(p) => tracing::info!(nonce = p.nonce, "found a solution"),
        None => tracing::warn!("nonce space exhausted without a solution"),
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use itsuku_core::ChallengeId;

    #[test]
    fn finds_a_solution_at_low_difficulty() {
        let config = Config {
            ell: 64,
            p: 1,
            n: 4,
            d: 4,
            l: 9,
        };
        let challenge = ChallengeId::new((0u8..=63).collect());
        let memory = Memory::build(&config, &challenge, false).unwrap();
        let tree = MerkleTree::build(&memory, &challenge);

        let proof = search(&config, &challenge, &memory, &tree, false, Some(100_000));
        assert!(proof.is_some());
    }

    #[test]
    fn sequential_and_parallel_search_both_find_valid_proofs() {
        let config = Config {
            ell: 64,
            p: 2,
            n: 4,
            d: 4,
            l: 9,
        };
        let challenge = ChallengeId::new((0u8..=63).collect());
        let memory = Memory::build(&config, &challenge, false).unwrap();
        let tree = MerkleTree::build(&memory, &challenge);

        let seq = search(&config, &challenge, &memory, &tree, false, Some(200_000));
        let par = search(&config, &challenge, &memory, &tree, true, Some(200_000));
        assert!(seq.is_some());
        assert!(par.is_some());

        let root_padded = pad_root(tree.root());
        for proof in [seq.unwrap(), par.unwrap()] {
            let result = compute_omega(
                &challenge,
                &memory,
                &root_padded,
                memory.total_elements(),
                proof.nonce,
                config.l,
            );
            assert!(leading_zero_bits(&result.omega) >= config.d);
        }
    }

    #[test]
    fn exhausted_range_returns_none() {
        let config = Config {
            ell: 8,
            p: 1,
            n: 4,
            d: 63,
            l: 9,
        };
        let challenge = ChallengeId::new((0u8..=63).collect());
        let memory = Memory::build(&config, &challenge, false).unwrap();
        let tree = MerkleTree::build(&memory, &challenge);

        let proof = search(&config, &challenge, &memory, &tree, false, Some(8));
        assert!(proof.is_none());
    }
}
