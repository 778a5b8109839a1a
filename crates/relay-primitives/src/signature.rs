//! Attestation signatures
//!
//! The attester signs a batch root with a secp256k1 recoverable signature.
//! Signatures are carried as 65 bytes `r ‖ s ‖ v`; `v` is written as
//! `27 + recovery_id` and both the raw (0/1) and offset (27/28) forms are
//! accepted on input.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use std::fmt;

use crate::error::{PrimitiveError, PrimitiveResult};
use crate::hash::Hash256;
use crate::principal::Principal;

/// Length of an encoded recoverable signature
pub const SIGNATURE_LEN: usize = 65;

/// Offset added to the recovery id in the trailing byte
const RECOVERY_ID_OFFSET: u8 = 27;

/// A 65-byte recoverable signature over a batch root
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttestationSignature(pub [u8; SIGNATURE_LEN]);

impl AttestationSignature {
    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice, which must be exactly 65 bytes long
    pub fn from_slice(bytes: &[u8]) -> PrimitiveResult<Self> {
        let arr: [u8; SIGNATURE_LEN] =
            bytes
                .try_into()
                .map_err(|_| PrimitiveError::InvalidLength {
                    what: "signature",
                    expected: SIGNATURE_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Create from hex string (an optional `0x` prefix is accepted)
    pub fn from_hex(hex: &str) -> PrimitiveResult<Self> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        Self::from_slice(&hex::decode(hex)?)
    }

    /// Convert to hex string (lowercase, no 0x prefix)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    fn to_recoverable(&self) -> PrimitiveResult<RecoverableSignature> {
        let v = self.0[64];
        let id = match v {
            0 | 1 => v,
            27 | 28 => v - RECOVERY_ID_OFFSET,
            other => {
                return Err(PrimitiveError::invalid_signature(format!(
                    "unsupported recovery byte {other}"
                )))
            }
        };
        let recovery_id = RecoveryId::from_i32(i32::from(id))
            .map_err(|e| PrimitiveError::invalid_signature(e.to_string()))?;
        RecoverableSignature::from_compact(&self.0[..64], recovery_id)
            .map_err(|e| PrimitiveError::invalid_signature(e.to_string()))
    }

    /// Recover the principal that signed `digest`
    pub fn recover_signer(&self, digest: &Hash256) -> PrimitiveResult<Principal> {
        let signature = self.to_recoverable()?;
        let message = Message::from_digest(digest.0);
        let public_key = SECP256K1
            .recover_ecdsa(&message, &signature)
            .map_err(|e| PrimitiveError::invalid_signature(e.to_string()))?;
        Ok(Principal::from_public_key(&public_key))
    }
}

impl fmt::Debug for AttestationSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttestationSignature(0x{})", self.to_hex())
    }
}

impl serde::Serialize for AttestationSignature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for AttestationSignature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Secret signing key held by an attester
#[derive(Clone)]
pub struct AttesterKey {
    secret: SecretKey,
}

impl AttesterKey {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        let mut rng = secp256k1::rand::thread_rng();
        Self {
            secret: SecretKey::new(&mut rng),
        }
    }

    /// Create from raw secret bytes
    pub fn from_bytes(bytes: &[u8]) -> PrimitiveResult<Self> {
        let secret =
            SecretKey::from_slice(bytes).map_err(|e| PrimitiveError::InvalidKey(e.to_string()))?;
        Ok(Self { secret })
    }

    /// Create from a hex encoded secret (an optional `0x` prefix is accepted)
    pub fn from_hex(hex: &str) -> PrimitiveResult<Self> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        Self::from_bytes(&hex::decode(hex)?)
    }

    /// Hex encoded secret
    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret.secret_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_secret_key_global(&self.secret)
    }

    /// Principal controlled by this key
    pub fn principal(&self) -> Principal {
        Principal::from_public_key(&self.public_key())
    }

    /// Sign a 32-byte digest
    pub fn sign_digest(&self, digest: &Hash256) -> AttestationSignature {
        let message = Message::from_digest(digest.0);
        let signature = SECP256K1.sign_ecdsa_recoverable(&message, &self.secret);
        let (recovery_id, compact) = signature.serialize_compact();

        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..64].copy_from_slice(&compact);
        // recovery ids are 0..=3
        bytes[64] = RECOVERY_ID_OFFSET + recovery_id.to_i32() as u8;
        AttestationSignature(bytes)
    }
}

impl fmt::Debug for AttesterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttesterKey")
            .field("principal", &self.principal())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> AttesterKey {
        AttesterKey::from_bytes(&[byte; 32]).unwrap()
    }

    #[test]
    fn test_sign_and_recover() {
        let key = key(5);
        let digest = Hash256::sha256(b"batch root");
        let signature = key.sign_digest(&digest);

        assert!(signature.0[64] == 27 || signature.0[64] == 28);
        assert_eq!(signature.recover_signer(&digest).unwrap(), key.principal());
    }

    #[test]
    fn test_raw_recovery_byte_accepted() {
        let key = key(6);
        let digest = Hash256::sha256(b"root");
        let mut signature = key.sign_digest(&digest);
        signature.0[64] -= 27;
        assert_eq!(signature.recover_signer(&digest).unwrap(), key.principal());
    }

    #[test]
    fn test_wrong_digest_recovers_other_principal() {
        let key = key(7);
        let signature = key.sign_digest(&Hash256::sha256(b"a"));
        let recovered = signature.recover_signer(&Hash256::sha256(b"b"));
        assert!(recovered.map(|p| p != key.principal()).unwrap_or(true));
    }

    #[test]
    fn test_bad_recovery_byte_rejected() {
        let digest = Hash256::sha256(b"root");
        let mut signature = key(8).sign_digest(&digest);
        signature.0[64] = 5;
        assert!(matches!(
            signature.recover_signer(&digest),
            Err(PrimitiveError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_zero_signature_rejected() {
        let signature = AttestationSignature::from_bytes([0u8; SIGNATURE_LEN]);
        assert!(signature.recover_signer(&Hash256::sha256(b"x")).is_err());
    }

    #[test]
    fn test_key_hex_roundtrip() {
        let key = AttesterKey::generate();
        let restored = AttesterKey::from_hex(&key.secret_hex()).unwrap();
        assert_eq!(key.principal(), restored.principal());
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(matches!(
            AttesterKey::from_bytes(&[0u8; 32]),
            Err(PrimitiveError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = key(9);
        let debug = format!("{:?}", key);
        assert!(!debug.contains(&key.secret_hex()));
    }

    #[test]
    fn test_signature_length_checked() {
        assert!(matches!(
            AttestationSignature::from_slice(&[0u8; 64]),
            Err(PrimitiveError::InvalidLength { expected: 65, actual: 64, .. })
        ));
    }
}
