//! Traits shared by every signature scheme.

use crate::error::WalletResult;
use crate::hex_codec;

/// A private key that can produce signatures.
pub trait SigningKey {
    /// The signature type produced by this key.
    type Signature: Signature;

    /// Signs the message bytes as given; no extra hashing is applied here
    /// beyond what the scheme itself defines.
    fn sign(&self, message: &[u8]) -> WalletResult<Self::Signature>;

    /// Returns the public key for this private key.
    fn public_key(&self) -> <Self::Signature as Signature>::PublicKey;
}

/// A public key that can check signatures.
pub trait Verifier {
    /// The signature type this key checks.
    type Signature;

    /// Verifies the signature, reporting why it failed.
    fn verify(&self, message: &[u8], signature: &Self::Signature) -> WalletResult<()>;

    /// Boolean form of [`Verifier::verify`]; never fails.
    fn verify_signature(&self, message: &[u8], signature: &Self::Signature) -> bool {
        self.verify(message, signature).is_ok()
    }
}

/// A fixed-length public key.
pub trait PublicKey: Clone + Sized {
    /// The length of the public key in bytes.
    const LENGTH: usize;

    fn from_bytes(bytes: &[u8]) -> WalletResult<Self>;

    fn to_bytes(&self) -> Vec<u8>;

    /// `0x`-prefixed hex.
    fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(self.to_bytes())
    }
}

/// A fixed-length signature.
pub trait Signature: Clone + Sized {
    /// The public key type for this signature scheme.
    type PublicKey: PublicKey;

    /// The length of the signature in bytes.
    const LENGTH: usize;

    fn from_bytes(bytes: &[u8]) -> WalletResult<Self>;

    fn to_bytes(&self) -> Vec<u8>;

    /// `0x`-prefixed hex.
    fn to_hex(&self) -> String {
        hex_codec::encode_prefixed(self.to_bytes())
    }
}
