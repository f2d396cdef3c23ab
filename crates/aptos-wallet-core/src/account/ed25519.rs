//! Ed25519 account implementation.

use crate::account::Signer;
use crate::crypto::{
    derive_ed25519_private_key, AccountPublicKey, AccountSignature, Ed25519PrivateKey,
    Ed25519PublicKey, Ed25519Signature,
};
use crate::error::WalletResult;
use crate::types::AccountAddress;
use std::fmt;

/// An account holding one Ed25519 key under the legacy scheme.
///
/// This is the most common account type on Aptos.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::account::{Ed25519Account, Signer};
///
/// let account = Ed25519Account::generate();
/// assert_eq!(account.address(), account.public_key().to_address());
/// ```
#[derive(Clone)]
pub struct Ed25519Account {
    private_key: Ed25519PrivateKey,
    public_key: Ed25519PublicKey,
    address: AccountAddress,
}

impl Ed25519Account {
    /// Generates a new random Ed25519 account.
    pub fn generate() -> Self {
        Self::from_private_key(Ed25519PrivateKey::generate(), None)
    }

    /// Creates an account from a private key, at `address` if given.
    pub fn from_private_key(private_key: Ed25519PrivateKey, address: Option<AccountAddress>) -> Self {
        let public_key = private_key.public_key();
        let address = address.unwrap_or_else(|| public_key.to_address());
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Creates an account from a private key hex string.
    pub fn from_private_key_hex(hex_str: &str) -> WalletResult<Self> {
        Ok(Self::from_private_key(Ed25519PrivateKey::from_hex(hex_str)?, None))
    }

    /// Derives an account along a fully hardened path like
    /// `m/44'/637'/0'/0'/0'`.
    pub fn from_derivation_path(path: &str, mnemonic: &str) -> WalletResult<Self> {
        Ok(Self::from_private_key(
            derive_ed25519_private_key(path, mnemonic)?,
            None,
        ))
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    /// Returns a reference to the private key.
    ///
    /// **Warning**: Handle with care to avoid leaking sensitive key material.
    pub fn private_key(&self) -> &Ed25519PrivateKey {
        &self.private_key
    }

    pub fn sign_message(&self, message: &[u8]) -> Ed25519Signature {
        self.private_key.sign(message)
    }
}

impl Signer for Ed25519Account {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn public_key(&self) -> AccountPublicKey {
        AccountPublicKey::Ed25519(self.public_key)
    }

    fn sign(&self, message: &[u8]) -> WalletResult<AccountSignature> {
        Ok(AccountSignature::Ed25519(self.private_key.sign(message)))
    }
}

impl fmt::Debug for Ed25519Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
