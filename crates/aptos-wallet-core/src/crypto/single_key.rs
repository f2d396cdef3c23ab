//! Scheme-tagged keys and signatures for single-key accounts.
//!
//! `AnyPublicKey` and `AnySignature` prefix the scheme's own encoding with a
//! ULEB128 variant: `0` for Ed25519 and `1` for Secp256k1. Multi-key accounts
//! reuse the same wrappers for every member key.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::config::PROTOCOL;
use crate::crypto::auth_key::AuthenticationKey;
use crate::crypto::ed25519::{Ed25519PublicKey, Ed25519Signature};
use crate::crypto::secp256k1::{Secp256k1PublicKey, Secp256k1Signature};
use crate::crypto::traits::Verifier;
use crate::error::{WalletError, WalletResult};
use crate::types::AccountAddress;
use std::fmt;

/// A public key tagged with its scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyPublicKey {
    Ed25519(Ed25519PublicKey),
    Secp256k1(Secp256k1PublicKey),
}

impl AnyPublicKey {
    const ED25519: u32 = 0;
    const SECP256K1: u32 = 1;

    /// The variant index written on the wire.
    pub fn variant(&self) -> u32 {
        match self {
            Self::Ed25519(_) => Self::ED25519,
            Self::Secp256k1(_) => Self::SECP256K1,
        }
    }

    /// The untagged key bytes.
    pub fn inner_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.to_bytes().to_vec(),
            Self::Secp256k1(key) => key.to_bytes(),
        }
    }

    /// Verifies a signature of the same scheme. A signature of another
    /// scheme is a verification failure, not a type error.
    pub fn verify(&self, message: &[u8], signature: &AnySignature) -> WalletResult<()> {
        match (self, signature) {
            (Self::Ed25519(key), AnySignature::Ed25519(sig)) => key.verify(message, sig),
            (Self::Secp256k1(key), AnySignature::Secp256k1(sig)) => key.verify(message, sig),
            _ => Err(WalletError::SignatureVerificationFailed),
        }
    }

    /// `SHA3-256(bcs(self) ‖ 0x02)`.
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key(&self.bcs_bytes(), PROTOCOL.schemes.single_key)
    }

    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().account_address()
    }
}

impl Verifier for AnyPublicKey {
    type Signature = AnySignature;

    fn verify(&self, message: &[u8], signature: &AnySignature) -> WalletResult<()> {
        AnyPublicKey::verify(self, message, signature)
    }
}

impl From<Ed25519PublicKey> for AnyPublicKey {
    fn from(key: Ed25519PublicKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<Secp256k1PublicKey> for AnyPublicKey {
    fn from(key: Secp256k1PublicKey) -> Self {
        Self::Secp256k1(key)
    }
}

impl fmt::Display for AnyPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(key) => write!(f, "ed25519:{key}"),
            Self::Secp256k1(key) => write!(f, "secp256k1:{key}"),
        }
    }
}

impl Serializable for AnyPublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.variant());
        match self {
            Self::Ed25519(key) => key.serialize(serializer),
            Self::Secp256k1(key) => key.serialize(serializer),
        }
    }
}

impl Deserializable for AnyPublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        match deserializer.deserialize_variant_index()? {
            Self::ED25519 => Ok(Self::Ed25519(Ed25519PublicKey::deserialize(deserializer)?)),
            Self::SECP256K1 => Ok(Self::Secp256k1(Secp256k1PublicKey::deserialize(
                deserializer,
            )?)),
            other => Err(WalletError::unknown_variant("AnyPublicKey", other)),
        }
    }
}

/// A signature tagged with its scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnySignature {
    Ed25519(Ed25519Signature),
    Secp256k1(Secp256k1Signature),
}

impl AnySignature {
    const ED25519: u32 = 0;
    const SECP256K1: u32 = 1;

    pub fn variant(&self) -> u32 {
        match self {
            Self::Ed25519(_) => Self::ED25519,
            Self::Secp256k1(_) => Self::SECP256K1,
        }
    }

    /// An all-zero signature of the scheme that `public_key` uses.
    pub fn zeroed_for(public_key: &AnyPublicKey) -> Self {
        match public_key {
            AnyPublicKey::Ed25519(_) => Self::Ed25519(Ed25519Signature::new([0u8; 64])),
            AnyPublicKey::Secp256k1(_) => Self::Secp256k1(Secp256k1Signature::new([0u8; 64])),
        }
    }
}

impl From<Ed25519Signature> for AnySignature {
    fn from(sig: Ed25519Signature) -> Self {
        Self::Ed25519(sig)
    }
}

impl From<Secp256k1Signature> for AnySignature {
    fn from(sig: Secp256k1Signature) -> Self {
        Self::Secp256k1(sig)
    }
}

impl Serializable for AnySignature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.variant());
        match self {
            Self::Ed25519(sig) => sig.serialize(serializer),
            Self::Secp256k1(sig) => sig.serialize(serializer),
        }
    }
}

impl Deserializable for AnySignature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        match deserializer.deserialize_variant_index()? {
            Self::ED25519 => Ok(Self::Ed25519(Ed25519Signature::deserialize(deserializer)?)),
            Self::SECP256K1 => Ok(Self::Secp256k1(Secp256k1Signature::deserialize(
                deserializer,
            )?)),
            other => Err(WalletError::unknown_variant("AnySignature", other)),
        }
    }
}
