//! Domain-separated signing messages.
//!
//! A signing message is `SHA3-256(domain_separator) ‖ bcs_bytes`. Signers sign
//! that concatenation as is; the hash of the separator is the only hashing
//! step.

use crate::bcs::{self, Serializable};
use crate::config::{DOMAIN_SEPARATOR_PREFIX, PROTOCOL};
use crate::crypto::sha3_256;
use crate::error::{WalletError, WalletResult};
use crate::transaction::types::{AnyRawTransaction, RawTransactionWithData};
use tracing::trace;

/// Prefixes `bytes` with the hash of `domain_separator`.
///
/// # Errors
///
/// [`WalletError::DomainSeparatorViolation`] unless the separator starts with
/// `APTOS::`.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::crypto::sha3_256;
/// use aptos_wallet_core::transaction::generate_signing_message;
///
/// let message = generate_signing_message(b"abc", "APTOS::Example").unwrap();
/// assert_eq!(&message[..32], &sha3_256(b"APTOS::Example"));
/// assert_eq!(&message[32..], b"abc");
/// assert!(generate_signing_message(b"abc", "OTHER::Example").is_err());
/// ```
pub fn generate_signing_message(bytes: &[u8], domain_separator: &str) -> WalletResult<Vec<u8>> {
    if !domain_separator.starts_with(DOMAIN_SEPARATOR_PREFIX) {
        return Err(WalletError::DomainSeparatorViolation(
            domain_separator.to_string(),
        ));
    }
    Ok(prefixed(&sha3_256(domain_separator.as_bytes()), bytes))
}

/// The signing message of any BCS value under `domain_separator`.
pub fn generate_signing_message_for_serializable<T: Serializable + ?Sized>(
    value: &T,
    domain_separator: &str,
) -> WalletResult<Vec<u8>> {
    generate_signing_message(&bcs::to_bytes(value), domain_separator)
}

/// The message every party of `transaction` signs.
///
/// A simple transaction without a fee payer uses `APTOS::RawTransaction`
/// over the raw transaction. Anything with a fee payer, or of the
/// multi-agent shape, uses `APTOS::RawTransactionWithData` over the matching
/// [`RawTransactionWithData`] variant.
pub fn generate_signing_message_for_transaction(transaction: &AnyRawTransaction) -> Vec<u8> {
    let raw_txn = transaction.raw_transaction().clone();
    let secondary_signer_addresses = transaction.secondary_signer_addresses().to_vec();

    if let Some(fee_payer_address) = transaction.fee_payer_address() {
        trace!(%fee_payer_address, "signing message for fee payer transaction");
        let with_data = RawTransactionWithData::MultiAgentWithFeePayer {
            raw_txn,
            secondary_signer_addresses,
            fee_payer_address,
        };
        prefixed(&PROTOCOL.raw_transaction_with_data_prefix, &bcs::to_bytes(&with_data))
    } else if let AnyRawTransaction::MultiAgent(_) = transaction {
        trace!(
            secondary_signers = secondary_signer_addresses.len(),
            "signing message for multi-agent transaction"
        );
        let with_data = RawTransactionWithData::MultiAgent {
            raw_txn,
            secondary_signer_addresses,
        };
        prefixed(&PROTOCOL.raw_transaction_with_data_prefix, &bcs::to_bytes(&with_data))
    } else {
        prefixed(&PROTOCOL.raw_transaction_prefix, &raw_txn.to_bcs())
    }
}

fn prefixed(prefix: &[u8; 32], bytes: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(prefix.len() + bytes.len());
    message.extend_from_slice(prefix);
    message.extend_from_slice(bytes);
    message
}
