//! Ed25519 signature scheme.
//!
//! Ed25519 is the default scheme on Aptos. Verification is strict: it rejects
//! non-canonical `S` values and small-order points, so a malleated copy of a
//! valid signature never verifies.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::config::PROTOCOL;
use crate::crypto::auth_key::AuthenticationKey;
use crate::crypto::traits::{PublicKey, Signature, SigningKey, Verifier};
use crate::error::{WalletError, WalletResult};
use crate::hex_codec;
use crate::types::AccountAddress;
use ed25519_dalek::Signer as DalekSigner;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ed25519 private key length in bytes.
pub const ED25519_PRIVATE_KEY_LENGTH: usize = 32;
/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
/// Ed25519 signature length in bytes.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 private key.
///
/// The key material is wiped when dropped and never printed.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::crypto::{Ed25519PrivateKey, Verifier};
///
/// let private_key = Ed25519PrivateKey::generate();
/// let signature = private_key.sign(b"hello");
/// assert!(private_key.public_key().verify_signature(b"hello", &signature));
/// ```
#[derive(Clone)]
pub struct Ed25519PrivateKey {
    inner: ed25519_dalek::SigningKey,
}

impl Ed25519PrivateKey {
    /// Generates a new random private key.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            inner: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Creates a private key from exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        let key_bytes: [u8; ED25519_PRIVATE_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            WalletError::length_mismatch(
                "Ed25519 private key",
                ED25519_PRIVATE_KEY_LENGTH,
                bytes.len(),
            )
        })?;
        Ok(Self {
            inner: ed25519_dalek::SigningKey::from_bytes(&key_bytes),
        })
    }

    /// Creates a private key from hex, with or without `0x`.
    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        Self::from_bytes(&hex_codec::decode(hex_str)?)
    }

    /// Returns the private key bytes.
    ///
    /// **Warning**: the returned bytes are not wiped on drop.
    pub fn to_bytes(&self) -> [u8; ED25519_PRIVATE_KEY_LENGTH] {
        self.inner.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(self.inner.to_bytes())
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    /// Signs the message bytes directly.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.inner.sign(message).to_bytes())
    }
}

impl SigningKey for Ed25519PrivateKey {
    type Signature = Ed25519Signature;

    fn sign(&self, message: &[u8]) -> WalletResult<Ed25519Signature> {
        Ok(Ed25519PrivateKey::sign(self, message))
    }

    fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PrivateKey::public_key(self)
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PrivateKey([REDACTED])")
    }
}

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey {
    inner: ed25519_dalek::VerifyingKey,
}

impl Ed25519PublicKey {
    /// Creates a public key from exactly 32 bytes.
    ///
    /// # Errors
    ///
    /// [`WalletError::LengthMismatch`] for the wrong length and
    /// [`WalletError::InvalidPublicKey`] for bytes that are not a curve point.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        let key_bytes: [u8; ED25519_PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            WalletError::length_mismatch(
                "Ed25519 public key",
                ED25519_PUBLIC_KEY_LENGTH,
                bytes.len(),
            )
        })?;
        let inner = ed25519_dalek::VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| WalletError::InvalidPublicKey(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        Self::from_bytes(&hex_codec::decode(hex_str)?)
    }

    pub fn to_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        self.inner.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(self.inner.to_bytes())
    }

    /// Strict verification of a signature over the message bytes.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> WalletResult<()> {
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        self.inner
            .verify_strict(message, &signature)
            .map_err(|_| WalletError::SignatureVerificationFailed)
    }

    /// `SHA3-256(key ‖ 0x00)`, the legacy Ed25519 authentication key.
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key(&self.to_bytes(), PROTOCOL.schemes.ed25519)
    }

    /// The default account address for this key.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().account_address()
    }
}

impl PublicKey for Ed25519PublicKey {
    const LENGTH: usize = ED25519_PUBLIC_KEY_LENGTH;

    fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        Ed25519PublicKey::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }
}

impl Verifier for Ed25519PublicKey {
    type Signature = Ed25519Signature;

    fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> WalletResult<()> {
        Ed25519PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serializable for Ed25519PublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.to_bytes());
    }
}

impl Deserializable for Ed25519PublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Self::from_bytes(&deserializer.deserialize_bytes()?)
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.inner.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
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

/// An Ed25519 signature.
///
/// Any 64 bytes are accepted here; canonical form is checked when verifying.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; ED25519_SIGNATURE_LENGTH]);

impl Ed25519Signature {
    pub const fn new(bytes: [u8; ED25519_SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Creates a signature from exactly 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        bytes.try_into().map(Self).map_err(|_| {
            WalletError::length_mismatch(
                "Ed25519 signature",
                ED25519_SIGNATURE_LENGTH,
                bytes.len(),
            )
        })
    }

    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        Self::from_bytes(&hex_codec::decode(hex_str)?)
    }

    pub fn to_bytes(&self) -> [u8; ED25519_SIGNATURE_LENGTH] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(self.0)
    }
}

impl Signature for Ed25519Signature {
    type PublicKey = Ed25519PublicKey;
    const LENGTH: usize = ED25519_SIGNATURE_LENGTH;

    fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        Ed25519Signature::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({})", self.to_hex())
    }
}

impl fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serializable for Ed25519Signature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.0);
    }
}

impl Deserializable for Ed25519Signature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Self::from_bytes(&deserializer.deserialize_bytes()?)
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
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
