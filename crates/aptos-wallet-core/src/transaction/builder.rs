//! Transaction builder.

use crate::config::TransactionConfig;
use crate::error::{WalletError, WalletResult};
use crate::transaction::payload::TransactionPayload;
use crate::transaction::types::{
    AnyRawTransaction, MultiAgentTransaction, RawTransaction, SimpleTransaction,
};
use crate::types::{AccountAddress, ChainId};
use std::time::{SystemTime, UNIX_EPOCH};

/// A builder for constructing unsigned transactions.
///
/// Gas and expiration fall back to [`TransactionConfig::default`]. Adding
/// secondary signers yields a multi-agent transaction; setting a fee payer
/// yields a sponsored one.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::transaction::{EntryFunction, TransactionBuilder};
/// use aptos_wallet_core::types::{AccountAddress, ChainId};
///
/// let payload = EntryFunction::from_function_id(
///     "0x1::aptos_account::transfer",
///     vec![],
///     vec![],
/// )
/// .unwrap();
///
/// let txn = TransactionBuilder::new()
///     .sender(AccountAddress::ONE)
///     .sequence_number(0)
///     .payload(payload.into())
///     .chain_id(ChainId::testnet())
///     .build()
///     .unwrap();
/// assert_eq!(txn.raw_transaction().max_gas_amount, 200_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: Option<TransactionPayload>,
    config: TransactionConfig,
    max_gas_amount: Option<u64>,
    gas_unit_price: Option<u64>,
    expiration_timestamp_secs: Option<u64>,
    chain_id: Option<ChainId>,
    secondary_signers: Vec<AccountAddress>,
    fee_payer: Option<AccountAddress>,
}

impl TransactionBuilder {
    /// Creates a new transaction builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the defaults used for gas and expiration.
    #[must_use]
    pub fn config(mut self, config: TransactionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn sender(mut self, sender: AccountAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    #[must_use]
    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    #[must_use]
    pub fn payload(mut self, payload: TransactionPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = Some(max_gas_amount);
        self
    }

    /// Sets the gas unit price in octas.
    #[must_use]
    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = Some(gas_unit_price);
        self
    }

    /// Sets the expiration timestamp in seconds since Unix epoch.
    #[must_use]
    pub fn expiration_timestamp_secs(mut self, expiration_timestamp_secs: u64) -> Self {
        self.expiration_timestamp_secs = Some(expiration_timestamp_secs);
        self
    }

    /// Sets the expiration time relative to now.
    #[must_use]
    pub fn expiration_from_now(mut self, seconds: u64) -> Self {
        self.expiration_timestamp_secs = Some(now_secs().saturating_add(seconds));
        self
    }

    #[must_use]
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    #[must_use]
    pub fn secondary_signer(mut self, address: AccountAddress) -> Self {
        self.secondary_signers.push(address);
        self
    }

    #[must_use]
    pub fn secondary_signers(mut self, addresses: &[AccountAddress]) -> Self {
        self.secondary_signers.extend_from_slice(addresses);
        self
    }

    /// Sets the account paying for gas.
    #[must_use]
    pub fn fee_payer(mut self, fee_payer: AccountAddress) -> Self {
        self.fee_payer = Some(fee_payer);
        self
    }

    /// Marks the transaction as sponsored by a fee payer not yet known.
    ///
    /// The fee payer address is `0x0` until the sponsor sets its own with
    /// [`AnyRawTransaction::with_fee_payer_address`].
    #[must_use]
    pub fn sponsored(self) -> Self {
        self.fee_payer(AccountAddress::ZERO)
    }

    /// Builds the unsigned transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if `sender`, `sequence_number`, `payload` or
    /// `chain_id` is missing.
    pub fn build(self) -> WalletResult<AnyRawTransaction> {
        let sender = self
            .sender
            .ok_or_else(|| WalletError::transaction("sender is required"))?;
        let sequence_number = self
            .sequence_number
            .ok_or_else(|| WalletError::transaction("sequence_number is required"))?;
        let payload = self
            .payload
            .ok_or_else(|| WalletError::transaction("payload is required"))?;
        let chain_id = self
            .chain_id
            .ok_or_else(|| WalletError::transaction("chain_id is required"))?;

        let expiration_timestamp_secs = self
            .expiration_timestamp_secs
            .unwrap_or_else(|| now_secs().saturating_add(self.config.expiration_secs));

        let raw_txn = RawTransaction::new(
            sender,
            sequence_number,
            payload,
            self.max_gas_amount.unwrap_or(self.config.max_gas_amount),
            self.gas_unit_price.unwrap_or(self.config.gas_unit_price),
            expiration_timestamp_secs,
            chain_id,
        );

        Ok(if self.secondary_signers.is_empty() {
            SimpleTransaction::new(raw_txn, self.fee_payer).into()
        } else {
            MultiAgentTransaction::new(raw_txn, self.secondary_signers, self.fee_payer).into()
        })
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
