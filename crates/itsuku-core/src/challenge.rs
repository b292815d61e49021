// crates/itsuku-core/src/challenge.rs

//! The challenge identifier: an opaque byte string that salts every hash
//! and XOR-mixing step in the scheme.

use serde::{Deserialize, Serialize};

/// Owned, opaque challenge bytes (typically 64 bytes, but arbitrary length
/// is accepted).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChallengeId(Vec<u8>);

impl ChallengeId {
    /// Wrap an owned byte vector as a challenge id.
    #[inline]
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the underlying bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume, returning the owned bytes.
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ChallengeId {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for ChallengeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_bytes() {
        let c = ChallengeId::new(vec![1, 2, 3]);
        assert_eq!(c.bytes(), &[1, 2, 3]);
        assert_eq!(c.into_bytes(), vec![1, 2, 3]);
    }
}
