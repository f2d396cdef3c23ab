//! Authentication keys.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto::hash::sha3_256_of;
use crate::error::{WalletError, WalletResult};
use crate::hex_codec;
use crate::types::AccountAddress;
use std::fmt;

/// Authentication key length in bytes.
pub const AUTHENTICATION_KEY_LENGTH: usize = 32;

/// `SHA3-256(public_key_bytes ‖ scheme)`.
///
/// A freshly created account's address equals its authentication key. Key
/// rotation changes the key but not the address.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::crypto::{AuthenticationKey, Ed25519PrivateKey};
///
/// let public_key = Ed25519PrivateKey::generate().public_key();
/// let auth_key = AuthenticationKey::from_public_key(&public_key.to_bytes(), 0);
/// assert_eq!(auth_key.account_address(), public_key.to_address());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthenticationKey([u8; AUTHENTICATION_KEY_LENGTH]);

impl AuthenticationKey {
    pub const fn new(bytes: [u8; AUTHENTICATION_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derives the key for public key bytes under a scheme byte.
    pub fn from_public_key(public_key_bytes: &[u8], scheme: u8) -> Self {
        Self(sha3_256_of([public_key_bytes, std::slice::from_ref(&scheme)]))
    }

    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        bytes.try_into().map(Self).map_err(|_| {
            WalletError::length_mismatch(
                "authentication key",
                AUTHENTICATION_KEY_LENGTH,
                bytes.len(),
            )
        })
    }

    pub fn to_bytes(&self) -> [u8; AUTHENTICATION_KEY_LENGTH] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; AUTHENTICATION_KEY_LENGTH] {
        &self.0
    }

    /// The address of an account created with this key.
    pub fn account_address(&self) -> AccountAddress {
        AccountAddress::new(self.0)
    }
}

impl fmt::Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({self})")
    }
}

impl fmt::Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_codec::encode_prefixed(self.0))
    }
}

impl Serializable for AuthenticationKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_fixed_bytes(&self.0);
    }
}

impl Deserializable for AuthenticationKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_fixed_array().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sha3_256;

    #[test]
    fn test_digest_of_key_and_scheme() {
        let key = [7u8; 32];
        for scheme in 0..4u8 {
            let mut preimage = key.to_vec();
            preimage.push(scheme);
            assert_eq!(
                AuthenticationKey::from_public_key(&key, scheme).to_bytes(),
                sha3_256(&preimage)
            );
        }
        assert_ne!(
            AuthenticationKey::from_public_key(&key, 0),
            AuthenticationKey::from_public_key(&key, 2)
        );
    }

    #[test]
    fn test_address_equals_key() {
        let auth_key = AuthenticationKey::from_public_key(b"abc", 0);
        assert_eq!(auth_key.account_address().to_bytes(), auth_key.to_bytes());
    }

    #[test]
    fn test_from_bytes_length() {
        assert!(AuthenticationKey::from_bytes(&[0u8; 32]).is_ok());
        assert!(matches!(
            AuthenticationKey::from_bytes(&[0u8; 20]),
            Err(WalletError::LengthMismatch { .. })
        ));
    }
}
