//! MultiKey account implementation.
//!
//! This module provides the [`MultiKeyAccount`] type for K-of-N threshold
//! accounts whose member keys may mix schemes.

use crate::account::{SingleKeyAccount, Signer};
use crate::crypto::{
    AccountPublicKey, AccountSignature, Bitmap, MultiKeyPublicKey, MultiKeySignature,
};
use crate::error::{WalletError, WalletResult};
use crate::types::AccountAddress;
use std::fmt;
use tracing::trace;

/// A K-of-N multi-key account with the co-signers this party controls.
///
/// Co-signers are kept in ascending order of their position in the
/// multi-key so every signature this account produces carries its parts in
/// bitmap order. Verification rejects any other order.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::account::{MultiKeyAccount, SingleKeyAccount};
/// use aptos_wallet_core::crypto::{KeyScheme, MultiKeyPublicKey, Verifier};
///
/// let a = SingleKeyAccount::generate(KeyScheme::Ed25519);
/// let b = SingleKeyAccount::generate(KeyScheme::Secp256k1);
/// let c = SingleKeyAccount::generate(KeyScheme::Ed25519);
/// let multi_key = MultiKeyPublicKey::new(
///     vec![a.public_key().clone(), b.public_key().clone(), c.public_key().clone()],
///     2,
/// )
/// .unwrap();
///
/// // Signers may be passed in any order.
/// let account = MultiKeyAccount::new(multi_key, vec![c, a]).unwrap();
/// let signature = account.sign_message(b"hello").unwrap();
/// assert!(account.public_key().verify_signature(b"hello", &signature));
/// ```
#[derive(Clone)]
pub struct MultiKeyAccount {
    public_key: MultiKeyPublicKey,
    /// Sorted by bit position.
    signers: Vec<(u8, SingleKeyAccount)>,
    bitmap: Bitmap,
    address: AccountAddress,
}

impl MultiKeyAccount {
    /// Creates an account from the multi-key and the co-signers held here.
    ///
    /// # Errors
    ///
    /// [`WalletError::PublicKeyNotFound`] if a signer's key is not part of
    /// `public_key`, and [`WalletError::BitmapInconsistency`] if two signers
    /// share a key.
    pub fn new(public_key: MultiKeyPublicKey, signers: Vec<SingleKeyAccount>) -> WalletResult<Self> {
        let address = public_key.to_address();
        Self::with_address(public_key, signers, address)
    }

    /// Like [`MultiKeyAccount::new`] but at a fixed address, e.g. after key
    /// rotation.
    pub fn with_address(
        public_key: MultiKeyPublicKey,
        signers: Vec<SingleKeyAccount>,
        address: AccountAddress,
    ) -> WalletResult<Self> {
        let mut signers = signers
            .into_iter()
            .map(|signer| Ok((public_key.index_of(signer.public_key())?, signer)))
            .collect::<WalletResult<Vec<_>>>()?;
        signers.sort_by_key(|(index, _)| *index);

        let positions: Vec<u8> = signers.iter().map(|(index, _)| *index).collect();
        let bitmap = public_key.create_bitmap(&positions)?;

        Ok(Self {
            public_key,
            signers,
            bitmap,
            address,
        })
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn public_key(&self) -> &MultiKeyPublicKey {
        &self.public_key
    }

    pub fn signatures_required(&self) -> u8 {
        self.public_key.signatures_required()
    }

    /// Bit positions of the co-signers, ascending.
    pub fn signer_indices(&self) -> Vec<u8> {
        self.signers.iter().map(|(index, _)| *index).collect()
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Signs with every co-signer.
    ///
    /// # Errors
    ///
    /// [`WalletError::InsufficientSignatures`] when fewer co-signers are held
    /// than the multi-key requires.
    pub fn sign_message(&self, message: &[u8]) -> WalletResult<MultiKeySignature> {
        let required = usize::from(self.signatures_required());
        if self.signers.len() < required {
            return Err(WalletError::InsufficientSignatures {
                required,
                provided: self.signers.len(),
            });
        }
        trace!(signers = self.signers.len(), "multi-key signing");
        let signatures = self
            .signers
            .iter()
            .map(|(_, signer)| signer.sign_message(message))
            .collect::<WalletResult<Vec<_>>>()?;
        MultiKeySignature::new(signatures, self.bitmap)
    }
}

impl Signer for MultiKeyAccount {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn public_key(&self) -> AccountPublicKey {
        AccountPublicKey::MultiKey(self.public_key.clone())
    }

    fn sign(&self, message: &[u8]) -> WalletResult<AccountSignature> {
        Ok(AccountSignature::MultiKey(self.sign_message(message)?))
    }
}

impl fmt::Debug for MultiKeyAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiKeyAccount")
            .field("address", &self.address)
            .field("signatures_required", &self.signatures_required())
            .field("signer_indices", &self.signer_indices())
            .finish_non_exhaustive()
    }
}
