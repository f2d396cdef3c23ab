//! Error types for the wallet core.
//!
//! Every failure in this crate is local and synchronous: it points at a bad input
//! or a programming error, never at a transient condition, so nothing here is
//! retried. [`WalletError`] keeps the kinds distinguishable so callers can match
//! on them.

use std::fmt;
use thiserror::Error;

/// A specialized Result type for wallet core operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// The main error type for the wallet core.
#[derive(Error, Debug)]
pub enum WalletError {
    /// A key, signature or address had the wrong byte length
    #[error("{what} must be {expected} bytes, got {actual}")]
    LengthMismatch {
        /// What was being constructed
        what: &'static str,
        /// The required length
        expected: usize,
        /// The length that was supplied
        actual: usize,
    },

    /// Malformed BIP-44 path or a hardening violation for the requested scheme
    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    /// Malformed Move type signature text
    #[error("Invalid type tag: {0}")]
    TypeTagParse(String),

    /// The BCS reader ran out of bytes or found leftover bytes
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A tagged-union discriminant did not match any known variant
    #[error("Unknown variant index {index} for {what}")]
    UnknownVariant {
        /// The tagged union being decoded
        what: &'static str,
        /// The discriminant that was read
        index: u32,
    },

    /// Signature count does not line up with the bitmap or the key set
    #[error("Signature mismatch: {0}")]
    SignatureMismatch(String),

    /// Bitmap bits were duplicated, unsorted, out of range or under threshold
    #[error("Bitmap inconsistency: {0}")]
    BitmapInconsistency(String),

    /// A required authenticator was not supplied for the transaction shape
    #[error("Missing authenticator: {0}")]
    MissingAuthenticator(&'static str),

    /// A signing message was requested with a separator lacking the protocol prefix
    #[error("Domain separator must start with 'APTOS::', got '{0}'")]
    DomainSeparatorViolation(String),

    /// A numeric value does not fit the requested Move width
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// A BCS string did not hold valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Error occurred during hex encoding/decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Error occurred during JSON deserialization of an ABI or config
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Invalid signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// A signature did not verify against its public key and message
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// A co-signer's public key is not part of the multi-key
    #[error("Public key not found in multi-key: {0}")]
    PublicKeyNotFound(String),

    /// Not enough signatures to meet the threshold
    #[error("Insufficient signatures: need {required}, got {provided}")]
    InsufficientSignatures {
        /// Number of signatures required
        required: usize,
        /// Number of signatures provided
        provided: usize,
    },

    /// A transaction could not be built from the fields supplied
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Entry function arguments do not match the module ABI
    #[error("ABI mismatch: {0}")]
    AbiMismatch(String),

    /// Invalid mnemonic phrase
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Key derivation failed
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WalletError {
    /// Creates a deserialization error from any displayable value.
    pub fn deserialization<E: fmt::Display>(err: E) -> Self {
        Self::Deserialization(err.to_string())
    }

    /// Creates an out-of-range error from any displayable value.
    pub fn out_of_range<E: fmt::Display>(err: E) -> Self {
        Self::OutOfRange(err.to_string())
    }

    /// Creates a transaction building error.
    pub fn transaction<S: Into<String>>(msg: S) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a length mismatch error.
    pub fn length_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Creates an unknown variant error.
    pub fn unknown_variant(what: &'static str, index: u32) -> Self {
        Self::UnknownVariant { what, index }
    }

    /// Returns true if the error came from malformed caller input rather than
    /// corrupted wire data.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            Self::Deserialization(_) | Self::UnknownVariant { .. } | Self::InvalidUtf8(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let err = WalletError::length_mismatch("Ed25519 public key", 32, 31);
        assert_eq!(err.to_string(), "Ed25519 public key must be 32 bytes, got 31");
    }

    #[test]
    fn test_unknown_variant_display() {
        let err = WalletError::unknown_variant("AccountAuthenticator", 9);
        assert_eq!(
            err.to_string(),
            "Unknown variant index 9 for AccountAuthenticator"
        );
    }

    #[test]
    fn test_domain_separator_display() {
        let err = WalletError::DomainSeparatorViolation("FOO::Bar".into());
        assert!(err.to_string().contains("APTOS::"));
        assert!(err.to_string().contains("FOO::Bar"));
    }

    #[test]
    fn test_is_input_error() {
        assert!(WalletError::MissingAuthenticator("fee payer").is_input_error());
        assert!(WalletError::out_of_range("256 > u8").is_input_error());
        assert!(!WalletError::deserialization("eof").is_input_error());
        assert!(!WalletError::unknown_variant("AnyPublicKey", 7).is_input_error());
    }

    #[test]
    fn test_from_hex_error() {
        let err: WalletError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, WalletError::Hex(_)));
    }

    #[test]
    fn test_insufficient_signatures() {
        let err = WalletError::InsufficientSignatures {
            required: 2,
            provided: 1,
        };
        assert_eq!(err.to_string(), "Insufficient signatures: need 2, got 1");
    }
}
