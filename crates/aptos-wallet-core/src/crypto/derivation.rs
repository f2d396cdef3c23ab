//! BIP-44 derivation of private keys from mnemonic phrases.
//!
//! Aptos uses coin type 637. Ed25519 keys follow SLIP-0010, which only
//! supports hardened children, so every segment must be hardened:
//! `m/44'/637'/{account}'/{change}'/{index}'`. Secp256k1 keys follow BIP-32
//! with an unhardened tail: `m/44'/637'/{account}'/{change}/{index}`.

use crate::crypto::ed25519::Ed25519PrivateKey;
use crate::crypto::secp256k1::Secp256k1PrivateKey;
use crate::crypto::KeyScheme;
use crate::error::{WalletError, WalletResult};
use hmac::{Hmac, Mac};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use sha2::Sha512;
use std::fmt;
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// Offset added to an index to mark it hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const PURPOSE: u32 = 44;
const APTOS_COIN_TYPE: u32 = 637;
const PATH_SEGMENTS: usize = 5;

static SECP256K1_ORDER: Lazy<BigUint> = Lazy::new(|| {
    BigUint::from_bytes_be(&[
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
        0x41, 0x41,
    ])
});

/// A validated `m/44'/637'/a'/c/i` path.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::crypto::{DerivationPath, KeyScheme};
///
/// assert!(DerivationPath::parse("m/44'/637'/0'/0'/0'", KeyScheme::Ed25519).is_ok());
/// assert!(DerivationPath::parse("m/44'/637'/0'/0/0", KeyScheme::Ed25519).is_err());
/// assert!(DerivationPath::parse("m/44'/637'/0'/0/0", KeyScheme::Secp256k1).is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivationPath {
    indices: [u32; PATH_SEGMENTS],
}

impl DerivationPath {
    /// Parses a path and checks the hardening rules of `scheme`.
    ///
    /// # Errors
    ///
    /// [`WalletError::InvalidDerivationPath`] for anything but five numeric
    /// segments after `m`, purpose 44, coin type 637, or the wrong hardening.
    pub fn parse(path: &str, scheme: KeyScheme) -> WalletResult<Self> {
        let invalid = |reason: &str| WalletError::InvalidDerivationPath(format!("'{path}': {reason}"));

        let mut segments = path.split('/');
        if segments.next() != Some("m") {
            return Err(invalid("must start with 'm/'"));
        }
        let segments: Vec<&str> = segments.collect();
        if segments.len() != PATH_SEGMENTS {
            return Err(invalid(&format!(
                "expected {PATH_SEGMENTS} segments, got {}",
                segments.len()
            )));
        }

        let mut indices = [0u32; PATH_SEGMENTS];
        for (position, segment) in segments.iter().enumerate() {
            let (digits, hardened) = match segment.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (*segment, false),
            };
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(&format!("segment '{segment}' is not a number")));
            }
            let value: u32 = digits
                .parse()
                .ok()
                .filter(|v| *v < HARDENED_OFFSET)
                .ok_or_else(|| invalid(&format!("segment '{segment}' is out of range")))?;

            let must_harden = match scheme {
                KeyScheme::Ed25519 => true,
                KeyScheme::Secp256k1 => position < 3,
            };
            if hardened != must_harden {
                return Err(invalid(&format!(
                    "segment {position} must {}be hardened for {scheme:?}",
                    if must_harden { "" } else { "not " }
                )));
            }
            indices[position] = if hardened {
                value | HARDENED_OFFSET
            } else {
                value
            };
        }

        if indices[0] != PURPOSE | HARDENED_OFFSET {
            return Err(invalid("purpose must be 44'"));
        }
        if indices[1] != APTOS_COIN_TYPE | HARDENED_OFFSET {
            return Err(invalid("coin type must be 637'"));
        }
        Ok(Self { indices })
    }

    /// The child indices with the hardened bit applied.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in self.indices {
            if index >= HARDENED_OFFSET {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

/// Generates a random English mnemonic of 12, 15, 18, 21 or 24 words.
pub fn generate_mnemonic(word_count: usize) -> WalletResult<String> {
    let entropy_bytes = match word_count {
        12 => 16,
        15 => 20,
        18 => 24,
        21 => 28,
        24 => 32,
        _ => {
            return Err(WalletError::InvalidMnemonic(format!(
                "invalid word count: {word_count}, must be 12, 15, 18, 21, or 24"
            )));
        }
    };
    let mut entropy = Zeroizing::new(vec![0u8; entropy_bytes]);
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut entropy);
    let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(mnemonic.to_string())
}

/// The BIP-39 seed of a mnemonic with an empty passphrase.
///
/// Words are trimmed, lower-cased and single-spaced first.
pub fn mnemonic_to_seed(mnemonic: &str) -> WalletResult<Zeroizing<[u8; 64]>> {
    let normalized = mnemonic
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    let parsed = bip39::Mnemonic::parse_normalized(&normalized)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(parsed.to_seed("")))
}

/// Derives the Ed25519 key at `path` from a mnemonic.
pub fn derive_ed25519_private_key(
    path: &str,
    mnemonic: &str,
) -> WalletResult<Ed25519PrivateKey> {
    let path = DerivationPath::parse(path, KeyScheme::Ed25519)?;
    let seed = mnemonic_to_seed(mnemonic)?;
    let key = slip10_ed25519(seed.as_slice(), path.indices())?;
    Ed25519PrivateKey::from_bytes(key.as_slice())
}

/// Derives the Secp256k1 key at `path` from a mnemonic.
pub fn derive_secp256k1_private_key(
    path: &str,
    mnemonic: &str,
) -> WalletResult<Secp256k1PrivateKey> {
    let path = DerivationPath::parse(path, KeyScheme::Secp256k1)?;
    let seed = mnemonic_to_seed(mnemonic)?;
    let key = bip32_secp256k1(seed.as_slice(), path.indices())?;
    Secp256k1PrivateKey::from_bytes(key.as_slice())
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> WalletResult<Zeroizing<[u8; 64]>> {
    let mut mac =
        HmacSha512::new_from_slice(key).map_err(|e| WalletError::KeyDerivation(e.to_string()))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn split(output: &[u8; 64]) -> (Zeroizing<[u8; 32]>, [u8; 32]) {
    let mut key = Zeroizing::new([0u8; 32]);
    let mut chain_code = [0u8; 32];
    key.copy_from_slice(&output[..32]);
    chain_code.copy_from_slice(&output[32..]);
    (key, chain_code)
}

/// SLIP-0010 derivation for Ed25519; every index must be hardened.
fn slip10_ed25519(seed: &[u8], indices: &[u32]) -> WalletResult<Zeroizing<[u8; 32]>> {
    let (mut key, mut chain_code) = split(&*hmac_sha512(b"ed25519 seed", &[seed])?);
    for &index in indices {
        if index < HARDENED_OFFSET {
            return Err(WalletError::KeyDerivation(
                "Ed25519 only supports hardened derivation".into(),
            ));
        }
        let output = hmac_sha512(&chain_code, &[&[0u8], key.as_slice(), &index.to_be_bytes()])?;
        (key, chain_code) = split(&output);
    }
    Ok(key)
}

/// BIP-32 private child derivation for Secp256k1.
fn bip32_secp256k1(seed: &[u8], indices: &[u32]) -> WalletResult<Zeroizing<[u8; 32]>> {
    let (mut key, mut chain_code) = split(&*hmac_sha512(b"Bitcoin seed", &[seed])?);
    check_scalar(key.as_slice())?;
    for &index in indices {
        let output = if index >= HARDENED_OFFSET {
            hmac_sha512(&chain_code, &[&[0u8], key.as_slice(), &index.to_be_bytes()])?
        } else {
            let secret = k256::SecretKey::from_slice(key.as_slice())
                .map_err(|e| WalletError::KeyDerivation(e.to_string()))?;
            let point = secret.public_key().to_encoded_point(true);
            hmac_sha512(&chain_code, &[point.as_bytes(), &index.to_be_bytes()])?
        };
        let (tweak, child_chain_code) = split(&output);
        let tweak = check_scalar(tweak.as_slice())?;
        let child = (tweak + BigUint::from_bytes_be(key.as_slice())) % &*SECP256K1_ORDER;
        if child == BigUint::from(0u8) {
            return Err(WalletError::KeyDerivation("derived a zero key".into()));
        }
        let child_bytes = Zeroizing::new(child.to_bytes_be());
        key.fill(0);
        key[32 - child_bytes.len()..].copy_from_slice(&child_bytes);
        chain_code = child_chain_code;
    }
    Ok(key)
}

fn check_scalar(bytes: &[u8]) -> WalletResult<BigUint> {
    let value = BigUint::from_bytes_be(bytes);
    if value >= *SECP256K1_ORDER {
        return Err(WalletError::KeyDerivation(
            "derived key is not below the curve order".into(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str =
        "shoot island position soft burden budget tooth cruel issue economy destroy above";

    fn seed_000102() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn test_slip10_vector_one() {
        let seed = seed_000102();
        assert_eq!(
            hex::encode(slip10_ed25519(&seed, &[]).unwrap().as_slice()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(slip10_ed25519(&seed, &[HARDENED_OFFSET]).unwrap().as_slice()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn test_bip32_vector_one() {
        let seed = seed_000102();
        assert_eq!(
            hex::encode(bip32_secp256k1(&seed, &[]).unwrap().as_slice()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(bip32_secp256k1(&seed, &[HARDENED_OFFSET]).unwrap().as_slice()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(
                bip32_secp256k1(&seed, &[HARDENED_OFFSET, 1])
                    .unwrap()
                    .as_slice()
            ),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
    }

    #[test]
    fn test_path_hardening_rules() {
        let ed = KeyScheme::Ed25519;
        let k1 = KeyScheme::Secp256k1;
        assert!(DerivationPath::parse("m/44'/637'/0'/0'/0'", ed).is_ok());
        assert!(DerivationPath::parse("m/44'/637'/5'/1'/9'", ed).is_ok());
        assert!(DerivationPath::parse("m/44'/637'/0'/0'/0", ed).is_err());
        assert!(DerivationPath::parse("m/44'/637'/0'/0/0", k1).is_ok());
        assert!(DerivationPath::parse("m/44'/637'/0'/0'/0'", k1).is_err());
        assert!(DerivationPath::parse("m/44'/637'/0/0/0", k1).is_err());
    }

    #[test]
    fn test_malformed_paths() {
        for path in [
            "",
            "m",
            "44'/637'/0'/0'/0'",
            "m/44'/637'/0'/0'",
            "m/44'/637'/0'/0'/0'/0'",
            "m/44'/638'/0'/0'/0'",
            "m/45'/637'/0'/0'/0'",
            "m/44'/637'/x'/0'/0'",
            "m/44'/637'/'/0'/0'",
            "m/44'/637'/2147483648'/0'/0'",
        ] {
            assert!(
                matches!(
                    DerivationPath::parse(path, KeyScheme::Ed25519),
                    Err(WalletError::InvalidDerivationPath(_))
                ),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trip() {
        let path = DerivationPath::parse("m/44'/637'/3'/0/7", KeyScheme::Secp256k1).unwrap();
        assert_eq!(path.to_string(), "m/44'/637'/3'/0/7");
    }

    #[test]
    fn test_mnemonic_derivation_is_deterministic() {
        let a = derive_ed25519_private_key("m/44'/637'/0'/0'/0'", PHRASE).unwrap();
        let b = derive_ed25519_private_key("m/44'/637'/0'/0'/0'", &format!("  {} ", PHRASE.to_uppercase()))
            .unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
        let c = derive_ed25519_private_key("m/44'/637'/0'/0'/1'", PHRASE).unwrap();
        assert_ne!(a.to_bytes(), c.to_bytes());

        let k1 = derive_secp256k1_private_key("m/44'/637'/0'/0/0", PHRASE).unwrap();
        let k1_again = derive_secp256k1_private_key("m/44'/637'/0'/0/0", PHRASE).unwrap();
        assert_eq!(k1.to_bytes(), k1_again.to_bytes());
    }

    #[test]
    fn test_aptos_ed25519_known_answer() {
        let key = derive_ed25519_private_key("m/44'/637'/0'/0'/0'", PHRASE).unwrap();
        assert_eq!(
            hex::encode(key.to_bytes()),
            "5d996aa76b3212142792d9130796cd2e11e3c445a93118c08414df4f66bc60ec"
        );
        assert_eq!(
            hex::encode(key.public_key().to_bytes()),
            "ea526ba1710343d953461ff68641f1b7df5f23b9042ffa2d2a798d3adb3f3d6c"
        );
    }

    #[test]
    fn test_aptos_secp256k1_known_answer() {
        let key = derive_secp256k1_private_key("m/44'/637'/0'/0/0", PHRASE).unwrap();
        assert_eq!(
            hex::encode(key.to_bytes()),
            "1eec55afc2f72c4ab7b46c84d761739035ac420a2b6b22cef3411adaf91ce1f7"
        );
        assert_eq!(
            hex::encode(key.public_key().to_bytes()),
            "04913871f1d6cb7b867e8671cf63cf7b4c43819539fa0074ff933434bf20bab825\
             b335535251f720fff72fd8b567e414af84aacf2f26ec804562081f2e0b0c9478"
        );
    }

    #[test]
    fn test_invalid_mnemonic() {
        assert!(matches!(
            derive_ed25519_private_key("m/44'/637'/0'/0'/0'", "not a real phrase"),
            Err(WalletError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_generate_mnemonic() {
        let phrase = generate_mnemonic(12).unwrap();
        assert_eq!(phrase.split_whitespace().count(), 12);
        assert!(mnemonic_to_seed(&phrase).is_ok());
        assert!(generate_mnemonic(13).is_err());
    }
}
