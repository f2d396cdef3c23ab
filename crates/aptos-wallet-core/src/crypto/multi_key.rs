//! K-of-N multi-key accounts over scheme-tagged keys.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::config::PROTOCOL;
use crate::crypto::auth_key::AuthenticationKey;
use crate::crypto::bitmap::{self, Bitmap, BITMAP_LENGTH, MAX_BITMAP_BITS};
use crate::crypto::single_key::{AnyPublicKey, AnySignature};
use crate::crypto::traits::Verifier;
use crate::error::{WalletError, WalletResult};
use crate::types::AccountAddress;
use std::fmt;

/// Maximum number of keys in a multi-key account.
pub const MAX_NUM_OF_KEYS: usize = MAX_BITMAP_BITS;

/// A multi-key public key: up to 32 [`AnyPublicKey`]s of any mix of schemes
/// and the number of signatures required.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiKeyPublicKey {
    public_keys: Vec<AnyPublicKey>,
    signatures_required: u8,
}

impl MultiKeyPublicKey {
    /// Creates a K-of-N key.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidPublicKey`] unless `1 <= N <= 32` and
    /// `1 <= K <= N`.
    pub fn new(public_keys: Vec<AnyPublicKey>, signatures_required: u8) -> WalletResult<Self> {
        if public_keys.is_empty() || public_keys.len() > MAX_NUM_OF_KEYS {
            return Err(WalletError::InvalidPublicKey(format!(
                "multi-key needs 1 to {MAX_NUM_OF_KEYS} keys, got {}",
                public_keys.len()
            )));
        }
        if signatures_required == 0 || usize::from(signatures_required) > public_keys.len() {
            return Err(WalletError::InvalidPublicKey(format!(
                "signatures required {signatures_required} must be between 1 and {}",
                public_keys.len()
            )));
        }
        Ok(Self {
            public_keys,
            signatures_required,
        })
    }

    pub fn public_keys(&self) -> &[AnyPublicKey] {
        &self.public_keys
    }

    pub fn signatures_required(&self) -> u8 {
        self.signatures_required
    }

    /// Position of `public_key` in the key list.
    ///
    /// # Errors
    ///
    /// [`WalletError::PublicKeyNotFound`] if the key is not a member.
    pub fn index_of(&self, public_key: &AnyPublicKey) -> WalletResult<u8> {
        self.public_keys
            .iter()
            .position(|k| k == public_key)
            .map(|i| i as u8)
            .ok_or_else(|| WalletError::PublicKeyNotFound(public_key.to_string()))
    }

    /// Builds the bitmap for signer positions; see [`bitmap::create_bitmap`].
    pub fn create_bitmap(&self, positions: &[u8]) -> WalletResult<Bitmap> {
        if let Some(&bit) = positions.iter().find(|&&b| usize::from(b) >= self.public_keys.len()) {
            return Err(WalletError::BitmapInconsistency(format!(
                "bit {bit} has no key ({} keys)",
                self.public_keys.len()
            )));
        }
        bitmap::create_bitmap(positions)
    }

    /// `SHA3-256(bcs(self) ‖ 0x03)`.
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key(&self.bcs_bytes(), PROTOCOL.schemes.multi_key)
    }

    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().account_address()
    }

    /// Verifies a multi-key signature.
    ///
    /// The signature count must equal the number of set bits, the set bits
    /// must reach the threshold, and the n-th signature must verify under the
    /// key at the n-th set bit.
    pub fn verify(&self, message: &[u8], signature: &MultiKeySignature) -> WalletResult<()> {
        let bits = bitmap::check_bitmap(
            &signature.bitmap,
            signature.signatures.len(),
            self.public_keys.len(),
            usize::from(self.signatures_required),
        )?;
        for (sig, bit) in signature.signatures.iter().zip(bits) {
            self.public_keys[usize::from(bit)].verify(message, sig)?;
        }
        Ok(())
    }
}

impl Verifier for MultiKeyPublicKey {
    type Signature = MultiKeySignature;

    fn verify(&self, message: &[u8], signature: &MultiKeySignature) -> WalletResult<()> {
        MultiKeyPublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for MultiKeyPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiKeyPublicKey({}-of-{})",
            self.signatures_required,
            self.public_keys.len()
        )
    }
}

impl Serializable for MultiKeyPublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_vector(&self.public_keys);
        serializer.serialize_u8(self.signatures_required);
    }
}

impl Deserializable for MultiKeyPublicKey {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        let public_keys = deserializer.deserialize_vector()?;
        let signatures_required = deserializer.deserialize_u8()?;
        Self::new(public_keys, signatures_required)
            .map_err(|e| WalletError::deserialization(e.to_string()))
    }
}

/// A multi-key signature: signatures in ascending key order plus a bitmap of
/// which keys signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiKeySignature {
    signatures: Vec<AnySignature>,
    bitmap: Bitmap,
}

impl MultiKeySignature {
    /// Wraps signatures and the bitmap of their positions.
    ///
    /// # Errors
    ///
    /// [`WalletError::SignatureMismatch`] if the signature count is not the
    /// number of set bits or exceeds 32.
    pub fn new(signatures: Vec<AnySignature>, bitmap: Bitmap) -> WalletResult<Self> {
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

    pub fn signatures(&self) -> &[AnySignature] {
        &self.signatures
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

impl Serializable for MultiKeySignature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_vector(&self.signatures);
        serializer.serialize_bytes(&self.bitmap);
    }
}

impl Deserializable for MultiKeySignature {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        let signatures = deserializer.deserialize_vector()?;
        let raw = deserializer.deserialize_bytes()?;
        let bitmap: Bitmap = raw.as_slice().try_into().map_err(|_| {
            WalletError::deserialization(format!(
                "bitmap is {} bytes (expected {BITMAP_LENGTH})",
                raw.len()
            ))
        })?;
        Self::new(signatures, bitmap).map_err(|e| WalletError::deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs::{from_bytes, to_bytes};
    use crate::crypto::{sha3_256, Ed25519PrivateKey, Secp256k1PrivateKey};

    enum TestKey {
        Ed(Ed25519PrivateKey),
        K1(Secp256k1PrivateKey),
    }

    impl TestKey {
        fn public(&self) -> AnyPublicKey {
            match self {
                TestKey::Ed(k) => k.public_key().into(),
                TestKey::K1(k) => k.public_key().into(),
            }
        }

        fn sign(&self, msg: &[u8]) -> AnySignature {
            match self {
                TestKey::Ed(k) => k.sign(msg).into(),
                TestKey::K1(k) => k.sign(msg).unwrap().into(),
            }
        }
    }

    fn mixed_keys() -> (Vec<TestKey>, MultiKeyPublicKey) {
        let keys = vec![
            TestKey::Ed(Ed25519PrivateKey::generate()),
            TestKey::K1(Secp256k1PrivateKey::generate()),
            TestKey::Ed(Ed25519PrivateKey::generate()),
        ];
        let multi = MultiKeyPublicKey::new(keys.iter().map(TestKey::public).collect(), 2).unwrap();
        (keys, multi)
    }

    fn sign_at(keys: &[TestKey], multi: &MultiKeyPublicKey, bits: &[u8], msg: &[u8]) -> MultiKeySignature {
        let sigs = bits.iter().map(|&b| keys[usize::from(b)].sign(msg)).collect();
        MultiKeySignature::new(sigs, multi.create_bitmap(bits).unwrap()).unwrap()
    }

    #[test]
    fn test_mixed_scheme_threshold() {
        let (keys, multi) = mixed_keys();
        let msg = b"mixed";
        assert!(multi.verify_signature(msg, &sign_at(&keys, &multi, &[0, 1], msg)));
        assert!(multi.verify_signature(msg, &sign_at(&keys, &multi, &[1, 2], msg)));
        assert!(!multi.verify_signature(msg, &sign_at(&keys, &multi, &[2], msg)));
    }

    #[test]
    fn test_out_of_order_signatures_fail() {
        let (keys, multi) = mixed_keys();
        let msg = b"order";
        let sigs = vec![keys[2].sign(msg), keys[0].sign(msg)];
        let sig = MultiKeySignature::new(sigs, multi.create_bitmap(&[0, 2]).unwrap()).unwrap();
        assert!(!multi.verify_signature(msg, &sig));
    }

    #[test]
    fn test_index_of() {
        let (keys, multi) = mixed_keys();
        assert_eq!(multi.index_of(&keys[1].public()).unwrap(), 1);
        let stranger: AnyPublicKey = Ed25519PrivateKey::generate().public_key().into();
        assert!(matches!(
            multi.index_of(&stranger),
            Err(WalletError::PublicKeyNotFound(_))
        ));
    }

    #[test]
    fn test_create_bitmap_checks_key_count() {
        let (_, multi) = mixed_keys();
        assert!(multi.create_bitmap(&[0, 3]).is_err());
        assert!(multi.create_bitmap(&[1, 0]).is_err());
    }

    #[test]
    fn test_limits() {
        assert!(MultiKeyPublicKey::new(vec![], 1).is_err());
        let one: AnyPublicKey = Ed25519PrivateKey::generate().public_key().into();
        assert!(MultiKeyPublicKey::new(vec![one.clone()], 0).is_err());
        assert!(MultiKeyPublicKey::new(vec![one.clone()], 2).is_err());
        assert!(MultiKeyPublicKey::new(vec![one], 1).is_ok());
    }

    #[test]
    fn test_bcs_layout_and_round_trip() {
        let (keys, multi) = mixed_keys();
        let bytes = to_bytes(&multi);
        assert_eq!(bytes[0], 3);
        assert_eq!(*bytes.last().unwrap(), 2);
        assert_eq!(from_bytes::<MultiKeyPublicKey>(&bytes).unwrap(), multi);

        let sig = sign_at(&keys, &multi, &[0, 2], b"m");
        let bytes = to_bytes(&sig);
        assert_eq!(bytes[0], 2);
        assert_eq!(&bytes[bytes.len() - 5..], &[4, 0b1010_0000, 0, 0, 0]);
        assert_eq!(from_bytes::<MultiKeySignature>(&bytes).unwrap(), sig);
    }

    #[test]
    fn test_bitmap_must_be_four_bytes() {
        let (keys, multi) = mixed_keys();
        let sig = sign_at(&keys, &multi, &[0], b"m");
        for raw in [&[0x80][..], &[0x80, 0, 0][..], &[0x80, 0, 0, 0, 0][..]] {
            let mut s = Serializer::new();
            s.serialize_vector(sig.signatures());
            s.serialize_bytes(raw);
            assert!(matches!(
                from_bytes::<MultiKeySignature>(&s.into_bytes()),
                Err(WalletError::Deserialization(_))
            ));
        }
        assert_eq!(from_bytes::<MultiKeySignature>(&to_bytes(&sig)).unwrap(), sig);
    }

    #[test]
    fn test_authentication_key_scheme_three() {
        let (_, multi) = mixed_keys();
        let mut preimage = to_bytes(&multi);
        preimage.push(3);
        assert_eq!(multi.authentication_key().to_bytes(), sha3_256(&preimage));
    }
}
