//! Principals
//!
//! A principal is a 20-byte identity. Owners, the attester and the origin
//! deployment are all principals. A secp256k1 key maps to the last 20 bytes
//! of the SHA-256 digest of its uncompressed encoding (without the 0x04 tag).

use secp256k1::PublicKey;
use std::fmt;
use std::str::FromStr;

use crate::error::{PrimitiveError, PrimitiveResult};
use crate::hash::Hash256;

/// Length of a principal in bytes
pub const PRINCIPAL_LEN: usize = 20;

/// A 20-byte identity
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Principal(pub [u8; PRINCIPAL_LEN]);

impl Principal {
    /// The all-zero principal
    pub const fn zero() -> Self {
        Self([0u8; PRINCIPAL_LEN])
    }

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; PRINCIPAL_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the principal controlled by a secp256k1 public key
    pub fn from_public_key(key: &PublicKey) -> Self {
        let uncompressed = key.serialize_uncompressed();
        let digest = Hash256::sha256(&uncompressed[1..]);
        let mut bytes = [0u8; PRINCIPAL_LEN];
        bytes.copy_from_slice(&digest.0[32 - PRINCIPAL_LEN..]);
        Self(bytes)
    }

    /// Create from hex string (an optional `0x` prefix is accepted)
    pub fn from_hex(hex: &str) -> PrimitiveResult<Self> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let bytes = hex::decode(hex)?;
        let arr: [u8; PRINCIPAL_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| PrimitiveError::InvalidLength {
                    what: "principal",
                    expected: PRINCIPAL_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Convert to hex string (lowercase, no 0x prefix)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; PRINCIPAL_LEN] {
        &self.0
    }

    /// Check if this is the zero principal
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; PRINCIPAL_LEN]
    }
}

impl FromStr for Principal {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal(0x{})", self.to_hex())
    }
}

impl serde::Serialize for Principal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", self.to_hex()))
    }
}

impl<'de> serde::Deserialize<'de> for Principal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
