//! Accounts that sign transactions.
//!
//! Three account types implement [`Signer`]:
//!
//! - [`Ed25519Account`] - a single Ed25519 key under the legacy scheme
//! - [`SingleKeyAccount`] - an Ed25519 or Secp256k1 key under the single-key scheme
//! - [`MultiKeyAccount`] - k-of-n co-signers under the multi-key scheme
//!
//! [`Account`] holds any of them and offers the usual construction paths.
//!
//! # Example
//!
//! ```rust
//! use aptos_wallet_core::account::{Account, Signer, SigningScheme};
//! use aptos_wallet_core::crypto::Verifier;
//!
//! let account = Account::generate(SigningScheme::Ed25519);
//! let signature = account.sign(b"hello").unwrap();
//! assert!(account.public_key().verify_signature(b"hello", &signature));
//! ```

mod ed25519;
mod multi_key;
mod single_key;

pub use ed25519::Ed25519Account;
pub use multi_key::MultiKeyAccount;
pub use single_key::{AnyPrivateKey, SingleKeyAccount};

use crate::crypto::{
    derive_ed25519_private_key, derive_secp256k1_private_key, AccountPublicKey,
    AccountSignature, AuthenticationKey, KeyScheme,
};
use crate::error::WalletResult;
use crate::transaction::{
    generate_signing_message_for_transaction, AccountAuthenticator, AnyRawTransaction,
};
use crate::types::AccountAddress;
use tracing::debug;

/// Anything that can authorize transactions for an address.
pub trait Signer {
    /// The on-chain address. Defaults to the derived authentication key
    /// unless the account was created with an explicit address.
    fn address(&self) -> AccountAddress;

    fn public_key(&self) -> AccountPublicKey;

    fn authentication_key(&self) -> AuthenticationKey {
        self.public_key().authentication_key()
    }

    /// Signs raw message bytes.
    ///
    /// # Errors
    ///
    /// Fails if the underlying key cannot sign.
    fn sign(&self, message: &[u8]) -> WalletResult<AccountSignature>;

    /// Signs the domain-separated signing message of `transaction`.
    fn sign_transaction(&self, transaction: &AnyRawTransaction) -> WalletResult<AccountSignature> {
        let message = generate_signing_message_for_transaction(transaction);
        debug!(
            sender = %transaction.raw_transaction().sender,
            signer = %self.address(),
            "signing transaction"
        );
        self.sign(&message)
    }

    fn sign_with_authenticator(&self, message: &[u8]) -> WalletResult<AccountAuthenticator> {
        AccountAuthenticator::new(self.public_key(), self.sign(message)?)
    }

    /// Signs `transaction` and pairs the signature with this account's key.
    fn sign_transaction_with_authenticator(
        &self,
        transaction: &AnyRawTransaction,
    ) -> WalletResult<AccountAuthenticator> {
        AccountAuthenticator::new(self.public_key(), self.sign_transaction(transaction)?)
    }
}

/// How a generated or derived account authenticates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SigningScheme {
    /// Legacy Ed25519.
    Ed25519,
    /// The single-key scheme over the given curve.
    SingleKey(KeyScheme),
}

impl SigningScheme {
    fn key_scheme(self) -> KeyScheme {
        match self {
            Self::Ed25519 => KeyScheme::Ed25519,
            Self::SingleKey(scheme) => scheme,
        }
    }
}

/// Any account type.
#[derive(Clone, Debug)]
pub enum Account {
    Ed25519(Ed25519Account),
    SingleKey(SingleKeyAccount),
    MultiKey(MultiKeyAccount),
}

impl Account {
    /// A fresh random account.
    pub fn generate(scheme: SigningScheme) -> Self {
        match scheme {
            SigningScheme::Ed25519 => Ed25519Account::generate().into(),
            SigningScheme::SingleKey(scheme) => SingleKeyAccount::generate(scheme).into(),
        }
    }

    /// An account for an existing key.
    ///
    /// Ed25519 keys get a legacy [`Ed25519Account`], Secp256k1 keys a
    /// [`SingleKeyAccount`]. `address` overrides the derived address for
    /// accounts whose key was rotated.
    pub fn from_private_key(private_key: AnyPrivateKey, address: Option<AccountAddress>) -> Self {
        match private_key {
            AnyPrivateKey::Ed25519(key) => Ed25519Account::from_private_key(key, address).into(),
            key @ AnyPrivateKey::Secp256k1(_) => {
                SingleKeyAccount::from_private_key(key, address).into()
            }
        }
    }

    /// Derives an account from a mnemonic along a BIP-44 path such as
    /// `m/44'/637'/0'/0'/0'`.
    ///
    /// # Errors
    ///
    /// [`crate::error::WalletError::InvalidDerivationPath`] when the path is
    /// malformed or breaks the hardening rules of the scheme, and
    /// [`crate::error::WalletError::InvalidMnemonic`] for a bad phrase.
    pub fn from_derivation_path(
        scheme: SigningScheme,
        mnemonic: &str,
        path: &str,
    ) -> WalletResult<Self> {
        debug!(?scheme, %path, "deriving account");
        let private_key = match scheme.key_scheme() {
            KeyScheme::Ed25519 => {
                AnyPrivateKey::Ed25519(derive_ed25519_private_key(path, mnemonic)?)
            }
            KeyScheme::Secp256k1 => {
                AnyPrivateKey::Secp256k1(derive_secp256k1_private_key(path, mnemonic)?)
            }
        };
        Ok(match scheme {
            SigningScheme::Ed25519 => Self::from_private_key(private_key, None),
            SigningScheme::SingleKey(_) => {
                SingleKeyAccount::from_private_key(private_key, None).into()
            }
        })
    }
}

impl Signer for Account {
    fn address(&self) -> AccountAddress {
        match self {
            Self::Ed25519(account) => account.address(),
            Self::SingleKey(account) => account.address(),
            Self::MultiKey(account) => account.address(),
        }
    }

    fn public_key(&self) -> AccountPublicKey {
        match self {
            Self::Ed25519(account) => Signer::public_key(account),
            Self::SingleKey(account) => Signer::public_key(account),
            Self::MultiKey(account) => Signer::public_key(account),
        }
    }

    fn sign(&self, message: &[u8]) -> WalletResult<AccountSignature> {
        match self {
            Self::Ed25519(account) => Signer::sign(account, message),
            Self::SingleKey(account) => Signer::sign(account, message),
            Self::MultiKey(account) => Signer::sign(account, message),
        }
    }
}

impl From<Ed25519Account> for Account {
    fn from(account: Ed25519Account) -> Self {
        Self::Ed25519(account)
    }
}

impl From<SingleKeyAccount> for Account {
    fn from(account: SingleKeyAccount) -> Self {
        Self::SingleKey(account)
    }
}

impl From<MultiKeyAccount> for Account {
    fn from(account: MultiKeyAccount) -> Self {
        Self::MultiKey(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Ed25519PrivateKey, Secp256k1PrivateKey, Verifier};
    use crate::transaction::{EntryFunction, TransactionBuilder};
    use crate::types::ChainId;

    const MNEMONIC: &str =
        "shoot island position soft burden budget tooth cruel issue economy destroy above";

    #[test]
    fn test_generate_per_scheme() {
        assert!(matches!(
            Account::generate(SigningScheme::Ed25519),
            Account::Ed25519(_)
        ));
        let account = Account::generate(SigningScheme::SingleKey(KeyScheme::Secp256k1));
        assert!(matches!(account.public_key(), AccountPublicKey::SingleKey(_)));
        assert_eq!(account.address(), account.public_key().to_address());
    }

    #[test]
    fn test_from_private_key_address_override() {
        let key = Ed25519PrivateKey::generate();
        let derived = Account::from_private_key(key.clone().into(), None);
        assert_eq!(derived.address(), key.public_key().to_address());

        let rotated = Account::from_private_key(key.into(), Some(AccountAddress::A));
        assert_eq!(rotated.address(), AccountAddress::A);
        assert_eq!(rotated.public_key(), derived.public_key());

        let k1 = Account::from_private_key(Secp256k1PrivateKey::generate().into(), None);
        assert!(matches!(k1, Account::SingleKey(_)));
    }

    #[test]
    fn test_from_derivation_path() {
        let ed = Account::from_derivation_path(
            SigningScheme::Ed25519,
            MNEMONIC,
            "m/44'/637'/0'/0'/0'",
        )
        .unwrap();
        let again = Account::from_derivation_path(
            SigningScheme::Ed25519,
            MNEMONIC,
            "m/44'/637'/0'/0'/0'",
        )
        .unwrap();
        assert_eq!(ed.address(), again.address());

        let single = Account::from_derivation_path(
            SigningScheme::SingleKey(KeyScheme::Ed25519),
            MNEMONIC,
            "m/44'/637'/0'/0'/0'",
        )
        .unwrap();
        assert_ne!(ed.address(), single.address());

        assert!(Account::from_derivation_path(
            SigningScheme::SingleKey(KeyScheme::Secp256k1),
            MNEMONIC,
            "m/44'/637'/0'/0/0",
        )
        .is_ok());
        assert!(Account::from_derivation_path(
            SigningScheme::Ed25519,
            MNEMONIC,
            "m/44'/637'/0'/0/0",
        )
        .is_err());
    }

    #[test]
    fn test_sign_transaction_with_authenticator() {
        let account = Account::generate(SigningScheme::SingleKey(KeyScheme::Ed25519));
        let txn = TransactionBuilder::new()
            .sender(account.address())
            .sequence_number(0)
            .payload(
                EntryFunction::from_function_id("0x1::m::f", vec![], vec![])
                    .unwrap()
                    .into(),
            )
            .chain_id(ChainId::testnet())
            .build()
            .unwrap();

        let signature = account.sign_transaction(&txn).unwrap();
        let message = generate_signing_message_for_transaction(&txn);
        assert!(account.public_key().verify_signature(&message, &signature));

        let auth = account.sign_transaction_with_authenticator(&txn).unwrap();
        assert!(matches!(auth, AccountAuthenticator::SingleKey { .. }));
        auth.verify(&message).unwrap();
    }
}
