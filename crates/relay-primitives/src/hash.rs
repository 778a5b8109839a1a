//! 256-bit digests
//!
//! Tree roots, attestation leaves and Merkle nodes are all 32-byte digests.
//! They are compared for equality and ordered bytewise (for sorted-pair
//! hashing); their content is never interpreted.

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::{PrimitiveError, PrimitiveResult};

/// A 256-bit digest (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash256(pub [u8; 32]);

/// Root of an identity tree
pub type Root = Hash256;

impl Hash256 {
    /// Create a zero hash
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Place a small integer in the low-order bytes (big-endian)
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Create from a byte slice, which must be exactly 32 bytes long
    pub fn from_slice(bytes: &[u8]) -> PrimitiveResult<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| PrimitiveError::InvalidLength {
            what: "digest",
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Create from hex string (an optional `0x` prefix is accepted)
    pub fn from_hex(hex: &str) -> PrimitiveResult<Self> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let bytes = hex::decode(hex)?;
        Self::from_slice(&bytes)
    }

    /// Convert to hex string (lowercase, no 0x prefix)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero hash
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Compute SHA-256 hash of data
    pub fn sha256(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Compute SHA-256 with domain separation
    pub fn sha256_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Hash256 {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256(0x{})", self.to_hex())
    }
}

impl serde::Serialize for Hash256 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Hash256 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_from_hex() {
        let hex = "abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";
        let hash = Hash256::from_hex(hex).unwrap();
        assert_eq!(hash.to_hex(), hex);
    }

    #[test]
    fn test_hash_from_hex_with_prefix() {
        let hex = "0xabcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";
        let hash = Hash256::from_hex(hex).unwrap();
        assert_eq!(hash.to_hex(), &hex[2..]);
    }

    #[test]
    fn test_hash_from_hex_wrong_length() {
        let err = Hash256::from_hex("abcd").unwrap_err();
        assert!(matches!(
            err,
            PrimitiveError::InvalidLength { expected: 32, actual: 2, .. }
        ));
    }

    #[test]
    fn test_from_u64_is_big_endian() {
        let hash = Hash256::from_u64(0x0102);
        assert_eq!(hash.0[30], 0x01);
        assert_eq!(hash.0[31], 0x02);
        assert!(hash.0[..30].iter().all(|b| *b == 0));
        assert!(Hash256::from_u64(1) < Hash256::from_u64(2));
    }

    #[test]
    fn test_sha256_domain() {
        let hash1 = Hash256::sha256(b"test");
        let hash2 = Hash256::sha256_with_domain(b"domain", b"test");
        assert_ne!(hash1, hash2);
        assert!(!hash1.is_zero());
    }

    #[test]
    fn test_hash_serialization() {
        let hash = Hash256::sha256(b"test");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));
        let recovered: Hash256 = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, recovered);
    }

    #[test]
    fn test_display_has_prefix() {
        assert!(Hash256::zero().to_string().starts_with("0x"));
    }
}
