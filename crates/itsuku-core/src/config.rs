// crates/itsuku-core/src/config.rs

//! Tunable parameters of the Itsuku scheme.

use serde::{Deserialize, Serialize};

/// Tunable parameters of an Itsuku instance.
///
/// Field names follow the scheme's own notation: `ell` (ℓ, chunk size in
/// elements), `p` (chunk count), `n` (antecedent count), `d` (required
/// leading-zero bits), `l` (search length / leaves per proof).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Chunk size, in 64-byte elements (ℓ).
    pub ell: u64,
    /// Chunk count (P).
    pub p: u64,
    /// Antecedent count (n); must satisfy `2 <= n <= ell`.
    pub n: u32,
    /// Required leading-zero bits of Omega (d).
    pub d: u32,
    /// Search length / leaves selected per proof (L).
    pub l: u32,
}

/// Errors raised when a [`Config`] fails validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `n` must be at least 2 (compression needs an even and an odd sum).
    #[error("antecedent count n={0} must be >= 2")]
    AntecedentCountTooSmall(u32),
    /// `n` must not exceed the chunk size `ell`.
    #[error("antecedent count n={n} exceeds chunk size ell={ell}")]
    AntecedentCountExceedsChunk {
        /// The offending `n`.
        n: u32,
        /// The configured `ell`.
        ell: u64,
    },
    /// Total element count `T = p * ell` must be at least 2.
    #[error("total element count T={0} must be >= 2")]
    TotalTooSmall(u64),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ell: 32_768,
            p: 1_024,
            n: 4,
            d: 24,
            l: 9,
        }
    }
}

impl Config {
    /// Total element count `T = P * ell`.
    #[inline]
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.p * self.ell
    }

    /// Validate the invariants required by the scheme (§3): `n >= 2`,
    /// `n <= ell`, `T >= 2`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n < 2 {
            return Err(ConfigError::AntecedentCountTooSmall(self.n));
        }
        if u64::from(self.n) > self.ell {
            return Err(ConfigError::AntecedentCountExceedsChunk {
                n: self.n,
                ell: self.ell,
            });
        }
        let total = self.total_elements();
        if total < 2 {
            return Err(ConfigError::TotalTooSmall(total));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let c = Config::default();
        assert_eq!(c.ell, 32_768);
        assert_eq!(c.p, 1_024);
        assert_eq!(c.n, 4);
        assert_eq!(c.d, 24);
        assert_eq!(c.l, 9);
        c.validate().unwrap();
    }

    #[test]
    fn n_below_two_is_rejected() {
        let c = Config {
            n: 1,
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::AntecedentCountTooSmall(1)));
    }

    #[test]
    fn n_above_ell_is_rejected() {
        let c = Config {
            ell: 3,
            n: 4,
            p: 4,
            ..Config::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::AntecedentCountExceedsChunk { n: 4, ell: 3 })
        ));
    }

    #[test]
    fn tiny_total_is_rejected() {
        let c = Config {
            ell: 1,
            p: 1,
            n: 2,
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::TotalTooSmall(1)));
    }
}
