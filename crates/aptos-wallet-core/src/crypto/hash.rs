//! Hash functions.
//!
//! SHA3-256 backs authentication keys, domain separation and Secp256k1
//! message digests. SHA2-512 is only used inside key derivation.

use sha3::Digest;

/// Computes the SHA3-256 hash of the input.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::crypto::sha3_256;
///
/// let hash = sha3_256(b"hello world");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    sha3::Sha3_256::digest(data).into()
}

/// Computes the SHA3-256 hash of several byte slices fed in order.
pub fn sha3_256_of<I, T>(items: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = sha3::Sha3_256::new();
    for item in items {
        hasher.update(item.as_ref());
    }
    hasher.finalize().into()
}

/// Computes the SHA2-256 hash of the input.
pub fn sha2_256(data: &[u8]) -> [u8; 32] {
    sha2::Sha256::digest(data).into()
}
