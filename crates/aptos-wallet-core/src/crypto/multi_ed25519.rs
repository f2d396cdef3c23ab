//! Legacy multi-Ed25519 threshold signatures.
//!
//! A K-of-N account over plain Ed25519 keys. Newer accounts use
//! [`MultiKeyPublicKey`](crate::crypto::MultiKeyPublicKey), which also admits
//! mixed schemes.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::config::PROTOCOL;
use crate::crypto::auth_key::AuthenticationKey;
use crate::crypto::bitmap::{self, Bitmap, BITMAP_LENGTH, MAX_BITMAP_BITS};
use crate::crypto::ed25519::{
    Ed25519PublicKey, Ed25519Signature, ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
use crate::crypto::traits::Verifier;
use crate::error::{WalletError, WalletResult};
use std::fmt;

/// Maximum number of keys in a multi-Ed25519 account.
pub const MAX_NUM_OF_KEYS: usize = MAX_BITMAP_BITS;

/// Minimum number of keys in a multi-Ed25519 account.
pub const MIN_NUM_OF_KEYS: usize = 2;

/// A multi-Ed25519 public key: N Ed25519 keys and a threshold K.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::crypto::{Ed25519PrivateKey, MultiEd25519PublicKey};
///
/// let keys: Vec<_> = (0..3).map(|_| Ed25519PrivateKey::generate().public_key()).collect();
/// let multi = MultiEd25519PublicKey::new(keys, 2).unwrap();
/// assert_eq!(multi.to_bytes().len(), 3 * 32 + 1);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519PublicKey {
    public_keys: Vec<Ed25519PublicKey>,
    threshold: u8,
}

impl MultiEd25519PublicKey {
    /// Creates a K-of-N key.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidPublicKey`] unless `2 <= N <= 32` and
    /// `1 <= K <= N`.
    pub fn new(public_keys: Vec<Ed25519PublicKey>, threshold: u8) -> WalletResult<Self> {
        if public_keys.len() < MIN_NUM_OF_KEYS || public_keys.len() > MAX_NUM_OF_KEYS {
            return Err(WalletError::InvalidPublicKey(format!(
                "multi-Ed25519 needs {MIN_NUM_OF_KEYS} to {MAX_NUM_OF_KEYS} keys, got {}",
                public_keys.len()
            )));
        }
        if threshold == 0 || usize::from(threshold) > public_keys.len() {
            return Err(WalletError::InvalidPublicKey(format!(
                "threshold {threshold} must be between 1 and {}",
                public_keys.len()
            )));
        }
        Ok(Self {
            public_keys,
            threshold,
        })
    }

    pub fn public_keys(&self) -> &[Ed25519PublicKey] {
        &self.public_keys
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Keys concatenated, then the threshold byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.public_keys.len() * ED25519_PUBLIC_KEY_LENGTH + 1);
        for key in &self.public_keys {
            bytes.extend_from_slice(&key.to_bytes());
        }
        bytes.push(self.threshold);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        let Some((&threshold, keys)) = bytes.split_last() else {
            return Err(WalletError::InvalidPublicKey(
                "empty multi-Ed25519 public key".into(),
            ));
        };
        if keys.len() % ED25519_PUBLIC_KEY_LENGTH != 0 {
            return Err(WalletError::InvalidPublicKey(format!(
                "{} key bytes is not a multiple of {ED25519_PUBLIC_KEY_LENGTH}",
                keys.len()
            )));
        }
        let public_keys = keys
            .chunks_exact(ED25519_PUBLIC_KEY_LENGTH)
            .map(Ed25519PublicKey::from_bytes)
            .collect::<WalletResult<Vec<_>>>()?;
        Self::new(public_keys, threshold)
    }

    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key(&self.to_bytes(), PROTOCOL.schemes.multi_ed25519)
    }

    /// Verifies a multi-signature.
    ///
    /// The signature count must equal the number of set bits, the set bits
    /// must reach the threshold, and the n-th signature must verify under the
    /// key at the n-th set bit.
    pub fn verify(&self, message: &[u8], signature: &MultiEd25519Signature) -> WalletResult<()> {
        let bits = bitmap::check_bitmap(
            &signature.bitmap,
            signature.signatures.len(),
            self.public_keys.len(),
            usize::from(self.threshold),
        )?;
        for (sig, bit) in signature.signatures.iter().zip(bits) {
            self.public_keys[usize::from(bit)].verify(message, sig)?;
        }
        Ok(())
    }
}

impl Verifier for MultiEd25519PublicKey {
    type Signature = MultiEd25519Signature;

    fn verify(&self, message: &[u8], signature: &MultiEd25519Signature) -> WalletResult<()> {
        MultiEd25519PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiEd25519PublicKey({}-of-{})",
            self.threshold,
            self.public_keys.len()
        )
    }
}

impl Serializable for MultiEd25519PublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.to_bytes());
    }
}

impl Deserializable for MultiEd25519PublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Self::from_bytes(&deserializer.deserialize_bytes()?)
    }
}

/// A multi-Ed25519 signature: the signatures in ascending key order plus a
/// bitmap of which keys signed.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519Signature {
    signatures: Vec<Ed25519Signature>,
    bitmap: Bitmap,
}

impl MultiEd25519Signature {
    /// Pairs signatures with the ascending key positions that produced them.
    ///
    /// # Errors
    ///
    /// [`WalletError::BitmapInconsistency`] for bad positions and
    /// [`WalletError::SignatureMismatch`] if the counts differ.
    pub fn new(signatures: Vec<Ed25519Signature>, positions: &[u8]) -> WalletResult<Self> {
        let bitmap = bitmap::create_bitmap(positions)?;
        Self::from_parts(signatures, bitmap)
    }

    /// Wraps signatures and an existing bitmap.
    pub fn from_parts(signatures: Vec<Ed25519Signature>, bitmap: Bitmap) -> WalletResult<Self> {
        if signatures.len() > MAX_NUM_OF_KEYS {
            return Err(WalletError::SignatureMismatch(format!(
                "at most {MAX_NUM_OF_KEYS} signatures, got {}",
                signatures.len()
            )));
        }
        let set = bitmap::bitmap_count(&bitmap);
        if set != signatures.len() {
            return Err(WalletError::SignatureMismatch(format!(
                "{} signatures but {set} bits set",
                signatures.len()
            )));
        }
        Ok(Self { signatures, bitmap })
    }

    pub fn signatures(&self) -> &[Ed25519Signature] {
        &self.signatures
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Signatures concatenated, then the four bitmap bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(self.signatures.len() * ED25519_SIGNATURE_LENGTH + BITMAP_LENGTH);
        for sig in &self.signatures {
            bytes.extend_from_slice(&sig.to_bytes());
        }
        bytes.extend_from_slice(&self.bitmap);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        if bytes.len() < BITMAP_LENGTH {
            return Err(WalletError::length_mismatch(
                "multi-Ed25519 signature",
                BITMAP_LENGTH,
                bytes.len(),
            ));
        }
        let (sigs, bitmap) = bytes.split_at(bytes.len() - BITMAP_LENGTH);
        if sigs.len() % ED25519_SIGNATURE_LENGTH != 0 {
            return Err(WalletError::InvalidSignature(format!(
                "{} signature bytes is not a multiple of {ED25519_SIGNATURE_LENGTH}",
                sigs.len()
            )));
        }
        let signatures = sigs
            .chunks_exact(ED25519_SIGNATURE_LENGTH)
            .map(Ed25519Signature::from_bytes)
            .collect::<WalletResult<Vec<_>>>()?;
        Self::from_parts(signatures, bitmap::bitmap_from_slice(bitmap)?)
    }
}

impl fmt::Debug for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiEd25519Signature({} sigs, bits {:?})",
            self.signatures.len(),
            bitmap::bitmap_set_bits(&self.bitmap)
        )
    }
}

impl Serializable for MultiEd25519Signature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.to_bytes());
    }
}

impl Deserializable for MultiEd25519Signature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Self::from_bytes(&deserializer.deserialize_bytes()?)
    }
}
