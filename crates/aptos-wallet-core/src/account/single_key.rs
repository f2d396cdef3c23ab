//! Single-key accounts over either supported curve.

use crate::account::Signer;
use crate::crypto::{
    derive_ed25519_private_key, derive_secp256k1_private_key, AccountPublicKey,
    AccountSignature, AnyPublicKey, AnySignature, Ed25519PrivateKey, KeyScheme,
    Secp256k1PrivateKey,
};
use crate::error::WalletResult;
use crate::types::AccountAddress;
use std::fmt;

/// A private key of any supported scheme.
#[derive(Clone)]
pub enum AnyPrivateKey {
    Ed25519(Ed25519PrivateKey),
    Secp256k1(Secp256k1PrivateKey),
}

impl AnyPrivateKey {
    pub fn generate(scheme: KeyScheme) -> Self {
        match scheme {
            KeyScheme::Ed25519 => Self::Ed25519(Ed25519PrivateKey::generate()),
            KeyScheme::Secp256k1 => Self::Secp256k1(Secp256k1PrivateKey::generate()),
        }
    }

    pub fn scheme(&self) -> KeyScheme {
        match self {
            Self::Ed25519(_) => KeyScheme::Ed25519,
            Self::Secp256k1(_) => KeyScheme::Secp256k1,
        }
    }

    pub fn public_key(&self) -> AnyPublicKey {
        match self {
            Self::Ed25519(key) => AnyPublicKey::Ed25519(key.public_key()),
            Self::Secp256k1(key) => AnyPublicKey::Secp256k1(key.public_key()),
        }
    }

    pub fn sign(&self, message: &[u8]) -> WalletResult<AnySignature> {
        Ok(match self {
            Self::Ed25519(key) => AnySignature::Ed25519(key.sign(message)),
            Self::Secp256k1(key) => AnySignature::Secp256k1(key.sign(message)?),
        })
    }
}

impl From<Ed25519PrivateKey> for AnyPrivateKey {
    fn from(key: Ed25519PrivateKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<Secp256k1PrivateKey> for AnyPrivateKey {
    fn from(key: Secp256k1PrivateKey) -> Self {
        Self::Secp256k1(key)
    }
}

impl fmt::Debug for AnyPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyPrivateKey({:?}, [REDACTED])", self.scheme())
    }
}

/// An account authenticated under the single-key scheme.
///
/// The address derives from the scheme-tagged public key, so the same
/// Ed25519 key yields a different address here than in an
/// [`Ed25519Account`](crate::account::Ed25519Account).
#[derive(Clone)]
pub struct SingleKeyAccount {
    private_key: AnyPrivateKey,
    public_key: AnyPublicKey,
    address: AccountAddress,
}

impl SingleKeyAccount {
    pub fn generate(scheme: KeyScheme) -> Self {
        Self::from_private_key(AnyPrivateKey::generate(scheme), None)
    }

    /// Creates an account from a private key, at `address` if given.
    pub fn from_private_key(private_key: AnyPrivateKey, address: Option<AccountAddress>) -> Self {
        let public_key = private_key.public_key();
        let address = address.unwrap_or_else(|| public_key.to_address());
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Derives an account from a mnemonic. Ed25519 paths must be fully
    /// hardened; Secp256k1 paths leave the last two segments unhardened.
    pub fn from_derivation_path(
        scheme: KeyScheme,
        path: &str,
        mnemonic: &str,
    ) -> WalletResult<Self> {
        let private_key: AnyPrivateKey = match scheme {
            KeyScheme::Ed25519 => derive_ed25519_private_key(path, mnemonic)?.into(),
            KeyScheme::Secp256k1 => derive_secp256k1_private_key(path, mnemonic)?.into(),
        };
        Ok(Self::from_private_key(private_key, None))
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn public_key(&self) -> &AnyPublicKey {
        &self.public_key
    }

    pub fn scheme(&self) -> KeyScheme {
        self.private_key.scheme()
    }

    pub fn sign_message(&self, message: &[u8]) -> WalletResult<AnySignature> {
        self.private_key.sign(message)
    }
}

impl Signer for SingleKeyAccount {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn public_key(&self) -> AccountPublicKey {
        AccountPublicKey::SingleKey(self.public_key.clone())
    }

    fn sign(&self, message: &[u8]) -> WalletResult<AccountSignature> {
        Ok(AccountSignature::SingleKey(self.private_key.sign(message)?))
    }
}

impl fmt::Debug for SingleKeyAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleKeyAccount")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Verifier;
    use crate::transaction::AccountAuthenticator;

    #[test]
    fn test_address_uses_single_key_scheme() {
        let key = Ed25519PrivateKey::generate();
        let account = SingleKeyAccount::from_private_key(key.clone().into(), None);
        assert_eq!(
            account.address(),
            AnyPublicKey::Ed25519(key.public_key()).to_address()
        );
        assert_ne!(account.address(), key.public_key().to_address());
    }

    #[test]
    fn test_secp256k1_sign_and_verify() {
        let account = SingleKeyAccount::generate(KeyScheme::Secp256k1);
        assert_eq!(account.scheme(), KeyScheme::Secp256k1);

        let signature = account.sign(b"message").unwrap();
        assert!(Signer::public_key(&account).verify_signature(b"message", &signature));
        assert!(!Signer::public_key(&account).verify_signature(b"other", &signature));

        let auth = account.sign_with_authenticator(b"message").unwrap();
        assert!(matches!(auth, AccountAuthenticator::SingleKey { .. }));
    }

    #[test]
    fn test_secp256k1_derivation_rules() {
        let phrase =
            "shoot island position soft burden budget tooth cruel issue economy destroy above";
        let derive = |path| SingleKeyAccount::from_derivation_path(KeyScheme::Secp256k1, path, phrase);
        let a = derive("m/44'/637'/0'/0/0").unwrap();
        assert_eq!(
            a.address(),
            AccountAddress::from_str_relaxed(
                "0x4b4aa8759fcef40ba49e999409eb73a98252f44f6612a4de2b23bad5c37b15a6"
            )
            .unwrap()
        );
        let b = derive("m/44'/637'/0'/0/1").unwrap();
        assert_ne!(a.address(), b.address());
        assert!(derive("m/44'/637'/0'/0'/0'").is_err());
    }

    #[test]
    fn test_debug_redacts() {
        let account = SingleKeyAccount::generate(KeyScheme::Ed25519);
        assert!(format!("{:?}", AnyPrivateKey::generate(KeyScheme::Secp256k1)).contains("REDACTED"));
        assert!(format!("{account:?}").starts_with("SingleKeyAccount"));
    }
}
