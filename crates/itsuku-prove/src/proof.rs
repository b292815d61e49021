// crates/itsuku-prove/src/proof.rs

//! The succinct proof format: a nonce, the antecedents of each selected
//! leaf, and the Merkle opening that lets a verifier authenticate them.

use itsuku_core::{ChallengeId, Config, Element};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete Itsuku proof: self-describing (carries its own `Config` and
/// `ChallengeId`) so a verifier needs nothing else.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Proof {
    /// The configuration the memory and tree were built under.
    pub config: Config,
    /// The challenge id that salted every hash and XOR step.
    pub challenge_id: ChallengeId,
    /// The winning nonce.
    pub nonce: u64,
    /// Selected leaf index → its antecedent elements (length 1 or `n`).
    pub leaf_antecedents: BTreeMap<u64, Vec<Element>>,
    /// Merkle node index → its `M`-byte hash, covering the root and every
    /// selected leaf's full authentication path.
    pub tree_opening: BTreeMap<u64, Vec<u8>>,
}
