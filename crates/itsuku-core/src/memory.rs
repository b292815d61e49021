// crates/itsuku-core/src/memory.rs

//! Deterministic memory builder: per-chunk seed + compression phases driven
//! by Argon2-style indexing, plus the antecedent trace used by provers and
//! verifiers alike.

use crate::challenge::ChallengeId;
use crate::config::{Config, ConfigError};
use crate::element::Element;
use crate::index::{argon2_index, phi};
use itsuku_crypto::{Blake3Hash, VariableOutputHash};
use rayon::prelude::*;

/// The compression function Φ: folds `n` antecedents plus a global index and
/// challenge id into a new [`Element`].
///
/// # Panics
/// Panics if `antecedents.len() != n as usize`; callers (the memory builder
/// and the verifier's partial reconstruction) both guarantee this by
/// construction.
#[must_use]
pub fn compress(antecedents: &[Element], n: u32, g: u64, challenge: &ChallengeId) -> Element {
    assert_eq!(
        antecedents.len(),
        n as usize,
        "compress requires exactly n antecedents"
    );

    let ceil_half = (u64::from(n) + 1) / 2;
    let floor_half = u64::from(n) / 2;

    let mut even = Element::zero();
    for k in 0..ceil_half {
        even.add_assign(&antecedents[(2 * k) as usize]);
    }
    even.lanes_mut()[0] ^= g;

    let mut odd = Element::zero();
    for k in 0..floor_half {
        odd.add_assign(&antecedents[(2 * k + 1) as usize]);
    }
    odd.xor_assign_bytes(challenge.bytes());

    let mut buf = Vec::with_capacity(128);
    buf.extend_from_slice(&even.to_le_bytes());
    buf.extend_from_slice(&odd.to_le_bytes());
    let out = Blake3Hash::hash_to_64(&buf);
    Element::from_le_bytes(&out)
}

/// Compute the `n` antecedent positions for index `i` within a chunk of size
/// `ell`, given the preceding element `prev` (whose first four LE bytes seed
/// the Argon2 index). Shared by both the builder's compression phase and
/// [`Memory::trace_element`] so the two never drift apart.
fn antecedent_indices(prev: &Element, i: u64, n: u32, ell: u64) -> Vec<u64> {
    let prev_bytes = prev.to_le_bytes();
    let a = argon2_index(&prev_bytes[0..4], i);
    (0..n).map(|k| phi(k, i, a) % ell).collect()
}

/// Build one chunk (seed phase + compression phase). Chunks are independent
/// given `challenge`, so this is the unit of parallelism across the builder.
fn build_chunk(c: u64, ell: u64, n: u32, challenge: &ChallengeId) -> Vec<Element> {
    let mut chunk = vec![Element::zero(); ell as usize];

    for i in 0..u64::from(n) {
        let mut h = Blake3Hash::new();
        h.update(&i.to_le_bytes());
        h.update(&c.to_le_bytes());
        h.update(challenge.bytes());
        let mut out = [0u8; 64];
        h.finalize_to(&mut out);
        chunk[i as usize] = Element::from_le_bytes(&out);
    }

    for i in u64::from(n)..ell {
        let prev = chunk[(i - 1) as usize];
        let idx = antecedent_indices(&prev, i, n, ell);
        let antecedents: Vec<Element> = idx.iter().map(|&j| chunk[j as usize]).collect();
        let g = c * ell + i;
        chunk[i as usize] = compress(&antecedents, n, g, challenge);
    }

    chunk
}

/// The prover/verifier's deterministic memory: `P` independently-built
/// chunks of `ell` elements each.
#[derive(Clone, Debug)]
pub struct Memory {
    config: Config,
    chunks: Vec<Vec<Element>>,
}

impl Memory {
    /// Build the full memory for `(config, challenge)`.
    ///
    /// When `parallel` is `true`, chunks are built concurrently across
    /// `rayon`'s global thread pool; chunks are independent so this never
    /// changes the resulting bytes relative to the sequential path.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `config` fails validation (§3 invariants).
    pub fn build(config: &Config, challenge: &ChallengeId, parallel: bool) -> Result<Self, ConfigError> {
        config.validate()?;
        let ell = config.ell;
        let p = config.p;
        let n = config.n;

        tracing::info!(p, ell, n, parallel, "building memory");

        let chunks: Vec<Vec<Element>> = if parallel {
            (0..p)
                .into_par_iter()
                .map(|c| build_chunk(c, ell, n, challenge))
                .collect()
        } else {
            (0..p).map(|c| build_chunk(c, ell, n, challenge)).collect()
        };

        tracing::debug!(chunks = chunks.len(), "memory build complete");

        Ok(Self { config: *config, chunks })
    }

    /// The configuration this memory was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Total element count `T = P * ell`.
    #[inline]
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.config.total_elements()
    }

    /// Read-only access to the element at global index `g`.
    ///
    /// # Panics
    /// Panics if `g >= total_elements()`.
    #[must_use]
    pub fn get_element(&self, g: u64) -> Element {
        let ell = self.config.ell;
        let c = (g / ell) as usize;
        let i = (g % ell) as usize;
        self.chunks[c][i]
    }

    /// Trace the antecedents of global element `g`: a single seed element if
    /// `g`'s position within its chunk is below `n`, otherwise the `n`
    /// antecedents that the compression phase folded together.
    ///
    /// # Panics
    /// Panics if `g >= total_elements()`.
    #[must_use]
    pub fn trace_element(&self, g: u64) -> Vec<Element> {
        let ell = self.config.ell;
        let n = self.config.n;
        let c = (g / ell) as usize;
        let i = g % ell;

        if i < u64::from(n) {
            vec![self.chunks[c][i as usize]]
        } else {
            let prev = self.chunks[c][(i - 1) as usize];
            antecedent_indices(&prev, i, n, ell)
                .into_iter()
                .map(|j| self.chunks[c][j as usize])
                .collect()
        }
    }
}
