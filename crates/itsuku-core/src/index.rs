// crates/itsuku-core/src/index.rs

//! Argon2-style seed→index mapping and the twelve φ antecedent selectors.

/// Number of distinct φ variants.
pub const PHI_VARIANTS: u32 = 12;

/// Compute the Argon2-style `argon2_index` for seed `s` (the low 4 bytes of
/// a little-endian-encoded value) and current index `i`.
///
/// `s` must be at least 4 bytes long; only `s[0..4]` is read.
#[must_use]
pub fn argon2_index(seed: &[u8], i: u64) -> u64 {
    let u = u32::from_le_bytes([seed[0], seed[1], seed[2], seed[3]]);
    let u = u64::from(u);
    let x = (u * u) >> 32;
    let y = (i.wrapping_mul(x)) >> 32;
    i.wrapping_sub(1).wrapping_sub(y)
}

/// Evaluate φ variant `k mod 12` at index `i`, given the Argon2 index `a`
/// already computed for `i`, and reduce the result modulo `i` (or return 0
/// when `i == 0`).
#[must_use]
pub fn phi(k: u32, i: u64, a: u64) -> u64 {
    if i == 0 {
        return 0;
    }
    let raw = match k % PHI_VARIANTS {
        0 => i - 1,
        1 => a,
        2 => (a + i) / 2,
        3 => 7 * i / 8,
        4 => (a + 3 * i) / 4,
        5 => (a + 5 * i) / 8,
        6 => 3 * i / 4,
        7 => i / 2,
        8 => i / 4,
        9 => 0,
        10 => 7 * a / 8,
        11 => 7 * i / 8,
        _ => unreachable!("k % 12 is always in 0..12"),
    };
    raw % i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argon2_index_matches_spec_scenario() {
        // seed = [0x01, 0, 0, 0], i = 1000 => argon2_index = 999.
        assert_eq!(argon2_index(&[0x01, 0, 0, 0], 1000), 999);
    }

    #[test]
    fn phi_variants_match_spec_scenario() {
        // i = 1024, argon2_index = 100.
        let i = 1024;
        let a = 100;
        assert_eq!(phi(0, i, a), 1023);
        assert_eq!(phi(2, i, a), 562);
        assert_eq!(phi(3, i, a), 896);
        assert_eq!(phi(10, i, a), 87);
        assert_eq!(phi(11, i, a), 896);
    }

    #[test]
    fn phi_of_zero_index_is_zero() {
        for k in 0..PHI_VARIANTS {
            assert_eq!(phi(k, 0, 12345), 0);
        }
    }

    #[test]
    fn phi_result_is_always_in_range() {
        for i in 1..50u64 {
            for a in 0..50u64 {
                for k in 0..PHI_VARIANTS {
                    assert!(phi(k, i, a) < i, "k={k} i={i} a={a}");
                }
            }
        }
    }

    #[test]
    fn variant_reduces_modulo_twelve() {
        // k = 12 behaves like k = 0.
        assert_eq!(phi(12, 1024, 100), phi(0, 1024, 100));
    }
}
