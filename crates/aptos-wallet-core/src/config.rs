//! Protocol constants and transaction defaults.
//!
//! [`ProtocolConfig`] holds the values the network fixes: domain separator
//! salts, their precomputed hashes and the authentication key scheme bytes.
//! It is built once on first use and never mutated.
//!
//! [`TransactionConfig`] holds the defaults the [`TransactionBuilder`] applies
//! when a caller leaves gas or expiration unset. Hosts can load it from their
//! own configuration files through serde.
//!
//! [`TransactionBuilder`]: crate::transaction::TransactionBuilder

use crate::crypto::sha3_256;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Every domain separator must start with this prefix.
pub const DOMAIN_SEPARATOR_PREFIX: &str = "APTOS::";

/// Default maximum gas units per transaction.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 200_000;

/// Default gas unit price in octas.
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;

/// Default time until a transaction expires.
pub const DEFAULT_EXPIRATION_SECS: u64 = 20;

/// Authentication key scheme bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeBytes {
    /// Legacy single Ed25519 key.
    pub ed25519: u8,
    /// Legacy k-of-n Ed25519 key.
    pub multi_ed25519: u8,
    /// Any single key wrapped in `AnyPublicKey`.
    pub single_key: u8,
    /// k-of-n mixed keys.
    pub multi_key: u8,
}

/// Frozen protocol constants.
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    /// Salt for a transaction with no secondary signers and no fee payer.
    pub raw_transaction_salt: &'static str,
    /// Salt for multi-agent and fee payer transactions.
    pub raw_transaction_with_data_salt: &'static str,
    /// Salt for hashing a signed transaction into its id.
    pub transaction_salt: &'static str,
    /// `SHA3-256(raw_transaction_salt)`
    pub raw_transaction_prefix: [u8; 32],
    /// `SHA3-256(raw_transaction_with_data_salt)`
    pub raw_transaction_with_data_prefix: [u8; 32],
    /// `SHA3-256(transaction_salt)`
    pub transaction_prefix: [u8; 32],
    /// Byte appended to public key material when deriving an authentication key.
    pub schemes: SchemeBytes,
}

impl ProtocolConfig {
    fn mainline() -> Self {
        let raw_transaction_salt = "APTOS::RawTransaction";
        let raw_transaction_with_data_salt = "APTOS::RawTransactionWithData";
        let transaction_salt = "APTOS::Transaction";
        Self {
            raw_transaction_salt,
            raw_transaction_with_data_salt,
            transaction_salt,
            raw_transaction_prefix: sha3_256(raw_transaction_salt.as_bytes()),
            raw_transaction_with_data_prefix: sha3_256(raw_transaction_with_data_salt.as_bytes()),
            transaction_prefix: sha3_256(transaction_salt.as_bytes()),
            schemes: SchemeBytes {
                ed25519: 0,
                multi_ed25519: 1,
                single_key: 2,
                multi_key: 3,
            },
        }
    }
}

/// The process-wide protocol constants.
pub static PROTOCOL: Lazy<ProtocolConfig> = Lazy::new(ProtocolConfig::mainline);

/// Defaults for building raw transactions.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::config::TransactionConfig;
///
/// let config: TransactionConfig =
///     serde_json::from_str(r#"{ "max_gas_amount": 5000 }"#).unwrap();
/// assert_eq!(config.max_gas_amount, 5000);
/// assert_eq!(config.gas_unit_price, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Maximum gas units the sender pays for.
    /// Default: 200,000
    pub max_gas_amount: u64,
    /// Price per gas unit in octas.
    /// Default: 100
    pub gas_unit_price: u64,
    /// Seconds from "now" until the transaction expires.
    /// Default: 20
    pub expiration_secs: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            expiration_secs: DEFAULT_EXPIRATION_SECS,
        }
    }
}

impl TransactionConfig {
    /// The expiration window as a [`Duration`].
    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }

    /// Sets the maximum gas amount.
    #[must_use]
    pub fn with_max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    /// Sets the gas unit price in octas.
    #[must_use]
    pub fn with_gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = gas_unit_price;
        self
    }

    /// Sets the expiration window in seconds.
    #[must_use]
    pub fn with_expiration_secs(mut self, expiration_secs: u64) -> Self {
        self.expiration_secs = expiration_secs;
        self
    }
}
