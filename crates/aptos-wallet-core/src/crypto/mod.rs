//! Cryptographic primitives for Aptos accounts.
//!
//! Ed25519 and Secp256k1 keys, the legacy MultiEd25519 scheme, the
//! scheme-tagged single-key and multi-key wrappers, authentication keys and
//! mnemonic derivation.
//!
//! # Example
//!
//! ```rust
//! use aptos_wallet_core::crypto::{Ed25519PrivateKey, Verifier};
//!
//! let private_key = Ed25519PrivateKey::generate();
//! let signature = private_key.sign(b"hello world");
//! assert!(private_key.public_key().verify_signature(b"hello world", &signature));
//! ```

mod auth_key;
pub mod bitmap;
mod derivation;
mod ed25519;
mod hash;
mod multi_ed25519;
mod multi_key;
mod secp256k1;
mod single_key;
mod traits;

pub use auth_key::{AuthenticationKey, AUTHENTICATION_KEY_LENGTH};
pub use bitmap::{bitmap_count, bitmap_set_bits, create_bitmap, Bitmap};
pub use derivation::{
    derive_ed25519_private_key, derive_secp256k1_private_key, generate_mnemonic,
    mnemonic_to_seed, DerivationPath, HARDENED_OFFSET,
};
pub use ed25519::{
    Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature, ED25519_PRIVATE_KEY_LENGTH,
    ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
pub use hash::{sha2_256, sha3_256, sha3_256_of};
pub use multi_ed25519::{
    MultiEd25519PublicKey, MultiEd25519Signature, MAX_NUM_OF_KEYS, MIN_NUM_OF_KEYS,
};
pub use multi_key::{
    MultiKeyPublicKey, MultiKeySignature, MAX_NUM_OF_KEYS as MULTI_KEY_MAX_NUM_OF_KEYS,
};
pub use secp256k1::{
    Secp256k1PrivateKey, Secp256k1PublicKey, Secp256k1Signature, SECP256K1_PRIVATE_KEY_LENGTH,
    SECP256K1_PUBLIC_KEY_LENGTH, SECP256K1_SIGNATURE_LENGTH,
};
pub use single_key::{AnyPublicKey, AnySignature};
pub use traits::{PublicKey, Signature, SigningKey, Verifier};

use crate::error::{WalletError, WalletResult};
use crate::hex_codec::Hex;
use crate::types::AccountAddress;
use serde::{Deserialize, Serialize};

/// The curve a single private key lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    Ed25519,
    Secp256k1,
}

/// Every public key an account can be authenticated with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountPublicKey {
    Ed25519(Ed25519PublicKey),
    MultiEd25519(MultiEd25519PublicKey),
    SingleKey(AnyPublicKey),
    MultiKey(MultiKeyPublicKey),
}

/// Signature counterpart of [`AccountPublicKey`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountSignature {
    Ed25519(Ed25519Signature),
    MultiEd25519(MultiEd25519Signature),
    SingleKey(AnySignature),
    MultiKey(MultiKeySignature),
}

impl AccountPublicKey {
    pub fn authentication_key(&self) -> AuthenticationKey {
        match self {
            Self::Ed25519(key) => key.authentication_key(),
            Self::MultiEd25519(key) => key.authentication_key(),
            Self::SingleKey(key) => key.authentication_key(),
            Self::MultiKey(key) => key.authentication_key(),
        }
    }

    /// The address an account with this key gets on creation.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().account_address()
    }
}

impl Verifier for AccountPublicKey {
    type Signature = AccountSignature;

    /// A signature from a different scheme family fails like a bad signature.
    fn verify(&self, message: &[u8], signature: &AccountSignature) -> WalletResult<()> {
        match (self, signature) {
            (Self::Ed25519(key), AccountSignature::Ed25519(sig)) => key.verify(message, sig),
            (Self::MultiEd25519(key), AccountSignature::MultiEd25519(sig)) => {
                key.verify(message, sig)
            }
            (Self::SingleKey(key), AccountSignature::SingleKey(sig)) => key.verify(message, sig),
            (Self::MultiKey(key), AccountSignature::MultiKey(sig)) => key.verify(message, sig),
            _ => Err(WalletError::SignatureVerificationFailed),
        }
    }
}

impl From<Ed25519PublicKey> for AccountPublicKey {
    fn from(key: Ed25519PublicKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<MultiEd25519PublicKey> for AccountPublicKey {
    fn from(key: MultiEd25519PublicKey) -> Self {
        Self::MultiEd25519(key)
    }
}

impl From<AnyPublicKey> for AccountPublicKey {
    fn from(key: AnyPublicKey) -> Self {
        Self::SingleKey(key)
    }
}

impl From<MultiKeyPublicKey> for AccountPublicKey {
    fn from(key: MultiKeyPublicKey) -> Self {
        Self::MultiKey(key)
    }
}

impl From<Ed25519Signature> for AccountSignature {
    fn from(sig: Ed25519Signature) -> Self {
        Self::Ed25519(sig)
    }
}

impl From<MultiEd25519Signature> for AccountSignature {
    fn from(sig: MultiEd25519Signature) -> Self {
        Self::MultiEd25519(sig)
    }
}

impl From<AnySignature> for AccountSignature {
    fn from(sig: AnySignature) -> Self {
        Self::SingleKey(sig)
    }
}

impl From<MultiKeySignature> for AccountSignature {
    fn from(sig: MultiKeySignature) -> Self {
        Self::MultiKey(sig)
    }
}

/// Bytes to sign for a user-supplied message: `0x` hex decodes to raw
/// bytes, anything else is taken as UTF-8 text.
pub fn convert_signing_message(message: &str) -> Vec<u8> {
    if message.starts_with("0x") && Hex::is_valid(message) {
        if let Ok(hex) = Hex::from_hex_input(message) {
            return hex.into_bytes();
        }
    }
    message.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_matches_scheme() {
        let ed = Ed25519PrivateKey::generate();
        let k1 = Secp256k1PrivateKey::generate();
        let ed_key = AccountPublicKey::from(ed.public_key());
        let k1_key = AccountPublicKey::from(AnyPublicKey::from(k1.public_key()));

        let ed_sig = AccountSignature::from(ed.sign(b"msg"));
        let k1_sig = AccountSignature::from(AnySignature::from(k1.sign(b"msg").unwrap()));

        assert!(ed_key.verify_signature(b"msg", &ed_sig));
        assert!(k1_key.verify_signature(b"msg", &k1_sig));
        assert!(!ed_key.verify_signature(b"msg", &k1_sig));
        assert!(!k1_key.verify_signature(b"msg", &ed_sig));
        assert!(!ed_key.verify_signature(b"other", &ed_sig));
    }

    #[test]
    fn test_address_per_scheme() {
        let ed = Ed25519PrivateKey::generate().public_key();
        assert_eq!(AccountPublicKey::from(ed).to_address(), ed.to_address());
        assert_ne!(
            AccountPublicKey::from(AnyPublicKey::from(ed)).to_address(),
            ed.to_address()
        );
    }

    #[test]
    fn test_convert_signing_message() {
        assert_eq!(convert_signing_message("0x0102ff"), vec![1, 2, 0xff]);
        assert_eq!(convert_signing_message("hello"), b"hello".to_vec());
        assert_eq!(convert_signing_message("0xnot hex"), b"0xnot hex".to_vec());
        assert_eq!(convert_signing_message("0102"), b"0102".to_vec());
    }
}
