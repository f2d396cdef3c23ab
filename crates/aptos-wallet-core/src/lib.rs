//! # Aptos Wallet Core
//!
//! Client-side transaction construction, serialization and signing for the
//! Aptos blockchain. Nothing here talks to the network: given the fields of a
//! transaction and the keys to sign it, the crate produces the exact bytes a
//! full node accepts.
//!
//! ## Quick Start
//!
//! ```rust
//! use aptos_wallet_core::account::{Ed25519Account, Signer};
//! use aptos_wallet_core::intent::transfer_coin_payload;
//! use aptos_wallet_core::transaction::{
//!     generate_signed_transaction, SignedTransactionInput, TransactionBuilder,
//! };
//! use aptos_wallet_core::{AccountAddress, ChainId};
//!
//! let account = Ed25519Account::generate();
//! let recipient = AccountAddress::from_str_relaxed("0xb0b").unwrap();
//!
//! let txn = TransactionBuilder::new()
//!     .sender(account.address())
//!     .sequence_number(0)
//!     .payload(transfer_coin_payload(recipient, 1_000, None).unwrap())
//!     .chain_id(ChainId::testnet())
//!     .build()
//!     .unwrap();
//!
//! let authenticator = account.sign_transaction_with_authenticator(&txn).unwrap();
//! let bytes = generate_signed_transaction(SignedTransactionInput::new(txn, authenticator)).unwrap();
//! assert!(!bytes.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`bcs`] - Binary Canonical Serialization
//! - [`types`] - addresses, identifiers and Move type tags
//! - [`move_values`] - typed Move values used as entry function arguments
//! - [`crypto`] - key schemes, authentication keys and HD derivation
//! - [`account`] - accounts that sign
//! - [`transaction`] - payloads, raw transactions, signing messages and assembly
//! - [`intent`] - wallet requests resolved against module ABIs
//! - [`config`] - protocol constants and transaction defaults

#![forbid(unsafe_code)]
#![warn(missing_debug_implementations, rust_2018_idioms)]

pub mod account;
pub mod bcs;
pub mod config;
pub mod crypto;
pub mod error;
pub mod hex_codec;
pub mod intent;
pub mod move_values;
pub mod transaction;
pub mod types;

pub use config::TransactionConfig;
pub use error::{WalletError, WalletResult};

pub use types::{AccountAddress, ChainId, TypeTag};
