//! Secp256k1 ECDSA signature scheme.
//!
//! Messages are hashed with SHA3-256 before signing. Public keys travel in
//! their 65-byte uncompressed SEC1 form and signatures as 64-byte `r ‖ s`
//! with `s` in the lower half of the group order.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto::traits::{PublicKey, Signature, SigningKey, Verifier};
use crate::error::{WalletError, WalletResult};
use crate::hex_codec;
use k256::ecdsa::{
    signature::{DigestSigner, DigestVerifier},
    Signature as K256Signature, SigningKey as K256SigningKey, VerifyingKey,
};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;

/// Secp256k1 private key length in bytes.
pub const SECP256K1_PRIVATE_KEY_LENGTH: usize = 32;
/// Secp256k1 uncompressed public key length in bytes.
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 65;
/// Secp256k1 signature length in bytes.
pub const SECP256K1_SIGNATURE_LENGTH: usize = 64;

/// A Secp256k1 private key.
///
/// The key material is wiped when dropped and never printed.
#[derive(Clone)]
pub struct Secp256k1PrivateKey {
    inner: K256SigningKey,
}

impl Secp256k1PrivateKey {
    /// Generates a new random private key.
    pub fn generate() -> Self {
        Self {
            inner: K256SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Creates a private key from exactly 32 bytes.
    ///
    /// # Errors
    ///
    /// [`WalletError::LengthMismatch`] for the wrong length and
    /// [`WalletError::InvalidPrivateKey`] for zero or out-of-range scalars.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        if bytes.len() != SECP256K1_PRIVATE_KEY_LENGTH {
            return Err(WalletError::length_mismatch(
                "Secp256k1 private key",
                SECP256K1_PRIVATE_KEY_LENGTH,
                bytes.len(),
            ));
        }
        let inner = K256SigningKey::from_slice(bytes)
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        Self::from_bytes(&hex_codec::decode(hex_str)?)
    }

    /// Returns the private key bytes.
    ///
    /// **Warning**: the returned bytes are not wiped on drop.
    pub fn to_bytes(&self) -> [u8; SECP256K1_PRIVATE_KEY_LENGTH] {
        self.inner.to_bytes().into()
    }

    pub fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(self.to_bytes())
    }

    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey {
            inner: *self.inner.verifying_key(),
        }
    }

    /// Signs `SHA3-256(message)` and returns a low-S signature.
    pub fn sign(&self, message: &[u8]) -> WalletResult<Secp256k1Signature> {
        let signature: K256Signature = self
            .inner
            .try_sign_digest(Sha3_256::new_with_prefix(message))
            .map_err(|e| WalletError::InvalidSignature(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(Secp256k1Signature::from_k256(&signature))
    }
}

impl SigningKey for Secp256k1PrivateKey {
    type Signature = Secp256k1Signature;

    fn sign(&self, message: &[u8]) -> WalletResult<Secp256k1Signature> {
        Secp256k1PrivateKey::sign(self, message)
    }

    fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PrivateKey::public_key(self)
    }
}

impl fmt::Debug for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PrivateKey([REDACTED])")
    }
}

/// A Secp256k1 public key in uncompressed form.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    inner: VerifyingKey,
}

impl Secp256k1PublicKey {
    /// Creates a public key from its 65-byte uncompressed encoding.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        if bytes.len() != SECP256K1_PUBLIC_KEY_LENGTH {
            return Err(WalletError::length_mismatch(
                "Secp256k1 public key",
                SECP256K1_PUBLIC_KEY_LENGTH,
                bytes.len(),
            ));
        }
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| WalletError::InvalidPublicKey(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        Self::from_bytes(&hex_codec::decode(hex_str)?)
    }

    /// The 65-byte uncompressed encoding, starting with `0x04`.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_encoded_point(false).as_bytes().to_vec()
    }

    pub fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(self.to_bytes())
    }

    /// Verifies a signature over `SHA3-256(message)`. High-S signatures fail.
    pub fn verify(&self, message: &[u8], signature: &Secp256k1Signature) -> WalletResult<()> {
        let signature = K256Signature::from_slice(&signature.0)
            .map_err(|_| WalletError::SignatureVerificationFailed)?;
        if signature.normalize_s().is_some() {
            return Err(WalletError::SignatureVerificationFailed);
        }
        self.inner
            .verify_digest(Sha3_256::new_with_prefix(message), &signature)
            .map_err(|_| WalletError::SignatureVerificationFailed)
    }
}

impl PublicKey for Secp256k1PublicKey {
    const LENGTH: usize = SECP256K1_PUBLIC_KEY_LENGTH;

    fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        Secp256k1PublicKey::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        Secp256k1PublicKey::to_bytes(self)
    }
}

impl Verifier for Secp256k1PublicKey {
    type Signature = Secp256k1Signature;

    fn verify(&self, message: &[u8], signature: &Secp256k1Signature) -> WalletResult<()> {
        Secp256k1PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serializable for Secp256k1PublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.to_bytes());
    }
}

impl Deserializable for Secp256k1PublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Self::from_bytes(&deserializer.deserialize_bytes()?)
    }
}

impl Serialize for Secp256k1PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Secp256k1PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = <String as Deserialize>::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8> as Deserialize>::deserialize(deserializer)?;
            Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

/// A Secp256k1 signature, `r ‖ s`.
///
/// Any 64 bytes are accepted here; validity and low-S are checked when
/// verifying.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secp256k1Signature([u8; SECP256K1_SIGNATURE_LENGTH]);

impl Secp256k1Signature {
    pub const fn new(bytes: [u8; SECP256K1_SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    fn from_k256(signature: &K256Signature) -> Self {
        let mut bytes = [0u8; SECP256K1_SIGNATURE_LENGTH];
        bytes.copy_from_slice(&signature.to_bytes());
        Self(bytes)
    }

    /// Creates a signature from exactly 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        bytes.try_into().map(Self).map_err(|_| {
            WalletError::length_mismatch(
                "Secp256k1 signature",
                SECP256K1_SIGNATURE_LENGTH,
                bytes.len(),
            )
        })
    }

    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        Self::from_bytes(&hex_codec::decode(hex_str)?)
    }

    pub fn to_bytes(&self) -> [u8; SECP256K1_SIGNATURE_LENGTH] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(self.0)
    }
}

impl Signature for Secp256k1Signature {
    type PublicKey = Secp256k1PublicKey;
    const LENGTH: usize = SECP256K1_SIGNATURE_LENGTH;

    fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        Secp256k1Signature::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Signature({})", self.to_hex())
    }
}

impl fmt::Display for Secp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serializable for Secp256k1Signature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.0);
    }
}

impl Deserializable for Secp256k1Signature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Self::from_bytes(&deserializer.deserialize_bytes()?)
    }
}
