//! Final assembly of signed transactions.
//!
//! The shape of the [`AnyRawTransaction`] decides which
//! [`TransactionAuthenticator`] variant wraps the collected account
//! authenticators:
//!
//! | shape                               | variant         |
//! |-------------------------------------|-----------------|
//! | fee payer set                       | `FeePayer`      |
//! | secondary signers, no fee payer     | `MultiAgent`    |
//! | sender only, Ed25519/MultiEd25519   | legacy variants |
//! | sender only, any other key          | `SingleSender`  |

use crate::crypto::AccountPublicKey;
use crate::error::{WalletError, WalletResult};
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::types::{AnyRawTransaction, SignedTransaction};
use tracing::debug;

/// Everything needed to assemble a submittable transaction.
#[derive(Clone, Debug)]
pub struct SignedTransactionInput {
    pub transaction: AnyRawTransaction,
    pub sender_authenticator: AccountAuthenticator,
    /// One per secondary signer, in the order of the transaction's
    /// secondary signer addresses.
    pub additional_signers_authenticators: Option<Vec<AccountAuthenticator>>,
    pub fee_payer_authenticator: Option<AccountAuthenticator>,
}

impl SignedTransactionInput {
    pub fn new(transaction: AnyRawTransaction, sender_authenticator: AccountAuthenticator) -> Self {
        Self {
            transaction,
            sender_authenticator,
            additional_signers_authenticators: None,
            fee_payer_authenticator: None,
        }
    }

    #[must_use]
    pub fn with_additional_signers(mut self, authenticators: Vec<AccountAuthenticator>) -> Self {
        self.additional_signers_authenticators = Some(authenticators);
        self
    }

    #[must_use]
    pub fn with_fee_payer(mut self, authenticator: AccountAuthenticator) -> Self {
        self.fee_payer_authenticator = Some(authenticator);
        self
    }

    /// Wraps the authenticators according to the transaction's shape.
    ///
    /// # Errors
    ///
    /// [`WalletError::MissingAuthenticator`] when the shape needs an
    /// authenticator that was not supplied, and
    /// [`WalletError::LengthMismatch`] when the secondary authenticators do
    /// not line up with the secondary signer addresses.
    pub fn into_signed_transaction(self) -> WalletResult<SignedTransaction> {
        let Self {
            transaction,
            sender_authenticator,
            additional_signers_authenticators,
            fee_payer_authenticator,
        } = self;

        let secondary_signer_addresses = transaction.secondary_signer_addresses().to_vec();
        let authenticator = if let Some(fee_payer_address) = transaction.fee_payer_address() {
            let fee_payer_signer =
                fee_payer_authenticator.ok_or(WalletError::MissingAuthenticator("fee payer"))?;
            let secondary_signers = additional_signers_authenticators.unwrap_or_default();
            check_secondary_count(secondary_signer_addresses.len(), secondary_signers.len())?;
            debug!(
                %fee_payer_address,
                secondary_signers = secondary_signers.len(),
                "assembling fee payer transaction"
            );
            TransactionAuthenticator::FeePayer {
                sender: sender_authenticator,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            }
        } else if !secondary_signer_addresses.is_empty() {
            let secondary_signers = additional_signers_authenticators
                .ok_or(WalletError::MissingAuthenticator("additional signers"))?;
            check_secondary_count(secondary_signer_addresses.len(), secondary_signers.len())?;
            debug!(
                secondary_signers = secondary_signers.len(),
                "assembling multi-agent transaction"
            );
            TransactionAuthenticator::MultiAgent {
                sender: sender_authenticator,
                secondary_signer_addresses,
                secondary_signers,
            }
        } else {
            debug!("assembling single sender transaction");
            TransactionAuthenticator::single_sender(sender_authenticator)
        };

        Ok(SignedTransaction::new(
            transaction.raw_transaction().clone(),
            authenticator,
        ))
    }
}

/// Assembles and BCS-encodes a signed transaction, ready for submission.
///
/// # Errors
///
/// See [`SignedTransactionInput::into_signed_transaction`].
pub fn generate_signed_transaction(input: SignedTransactionInput) -> WalletResult<Vec<u8>> {
    Ok(input.into_signed_transaction()?.to_bytes())
}

/// Public keys of the parties of a transaction that is only simulated.
///
/// `None` for a party means its key is not known yet, e.g. a sponsor that
/// will be picked later.
#[derive(Clone, Debug)]
pub struct SimulationInput {
    pub transaction: AnyRawTransaction,
    pub signer_public_key: Option<AccountPublicKey>,
    pub secondary_signers_public_keys: Option<Vec<Option<AccountPublicKey>>>,
    pub fee_payer_public_key: Option<AccountPublicKey>,
}

impl SimulationInput {
    pub fn new(transaction: AnyRawTransaction, signer_public_key: Option<AccountPublicKey>) -> Self {
        Self {
            transaction,
            signer_public_key,
            secondary_signers_public_keys: None,
            fee_payer_public_key: None,
        }
    }
}

/// Assembles a transaction for simulation.
///
/// Every known public key gets an authenticator with an all-zero signature,
/// unknown ones get `NoAccountAuthenticator`. A missing list of secondary
/// keys is treated as all unknown.
///
/// # Errors
///
/// [`WalletError::LengthMismatch`] when the secondary keys do not line up with
/// the secondary signer addresses.
pub fn generate_signed_transaction_for_simulation(input: SimulationInput) -> WalletResult<Vec<u8>> {
    let SimulationInput {
        transaction,
        signer_public_key,
        secondary_signers_public_keys,
        fee_payer_public_key,
    } = input;

    let secondary_count = transaction.secondary_signer_addresses().len();
    let secondary_keys =
        secondary_signers_public_keys.unwrap_or_else(|| vec![None; secondary_count]);
    check_secondary_count(secondary_count, secondary_keys.len())?;

    let sender_authenticator = simulated(signer_public_key.as_ref())?;
    let secondary = secondary_keys
        .iter()
        .map(|key| simulated(key.as_ref()))
        .collect::<WalletResult<Vec<_>>>()?;

    let mut assembly = SignedTransactionInput::new(transaction, sender_authenticator);
    if assembly.transaction.fee_payer_address().is_some() {
        assembly = assembly.with_fee_payer(simulated(fee_payer_public_key.as_ref())?);
    }
    if secondary_count > 0 {
        assembly = assembly.with_additional_signers(secondary);
    }
    debug!(
        has_sender_key = signer_public_key.is_some(),
        "assembling transaction for simulation"
    );
    generate_signed_transaction(assembly)
}

fn simulated(public_key: Option<&AccountPublicKey>) -> WalletResult<AccountAuthenticator> {
    match public_key {
        Some(public_key) => AccountAuthenticator::placeholder(public_key),
        None => Ok(AccountAuthenticator::NoAccountAuthenticator),
    }
}

fn check_secondary_count(expected: usize, actual: usize) -> WalletResult<()> {
    if expected != actual {
        return Err(WalletError::length_mismatch(
            "secondary signer authenticators",
            expected,
            actual,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;
    use crate::crypto::{AnyPublicKey, AnySignature, Ed25519PrivateKey, Secp256k1PrivateKey};
    use crate::transaction::payload::EntryFunction;
    use crate::transaction::signing_message::generate_signing_message_for_transaction;
    use crate::transaction::types::{MultiAgentTransaction, RawTransaction, SimpleTransaction};
    use crate::types::{AccountAddress, ChainId};

    fn raw(sender: AccountAddress) -> RawTransaction {
        RawTransaction::new(
            sender,
            7,
            EntryFunction::from_function_id("0x1::aptos_account::transfer", vec![], vec![])
                .unwrap()
                .into(),
            10_000,
            100,
            1_660_131_587,
            ChainId::testnet(),
        )
    }

    fn ed25519_auth(key: &Ed25519PrivateKey, txn: &AnyRawTransaction) -> AccountAuthenticator {
        let message = generate_signing_message_for_transaction(txn);
        AccountAuthenticator::new(key.public_key().into(), key.sign(&message).into()).unwrap()
    }

    fn decode(bytes: &[u8]) -> SignedTransaction {
        bcs::from_bytes::<SignedTransaction>(bytes).unwrap()
    }

    #[test]
    fn test_simple_ed25519_uses_legacy_variant() {
        let key = Ed25519PrivateKey::generate();
        let txn = AnyRawTransaction::from(raw(key.public_key().to_address()));
        let auth = ed25519_auth(&key, &txn);

        let bytes = generate_signed_transaction(SignedTransactionInput::new(txn.clone(), auth))
            .unwrap();
        let signed = decode(&bytes);
        assert_eq!(&signed.raw_txn, txn.raw_transaction());
        assert!(matches!(
            signed.authenticator,
            TransactionAuthenticator::Ed25519 { .. }
        ));
        // Raw transaction bytes, then variant 0.
        assert_eq!(bytes[txn.raw_transaction().to_bcs().len()], 0);
    }

    #[test]
    fn test_simple_secp256k1_uses_single_sender() {
        let key = Secp256k1PrivateKey::generate();
        let public_key = AnyPublicKey::from(key.public_key());
        let txn = AnyRawTransaction::from(raw(AccountPublicKey::from(public_key.clone()).to_address()));
        let message = generate_signing_message_for_transaction(&txn);
        let signature = AnySignature::from(key.sign(&message).unwrap());
        let auth = AccountAuthenticator::new(public_key.into(), signature.into()).unwrap();

        let signed = decode(
            &generate_signed_transaction(SignedTransactionInput::new(txn, auth)).unwrap(),
        );
        match signed.authenticator {
            TransactionAuthenticator::SingleSender { sender } => {
                sender.verify(&message).unwrap();
            }
            other => panic!("unexpected authenticator {other:?}"),
        }
    }

    #[test]
    fn test_fee_payer_requires_fee_payer_authenticator() {
        let key = Ed25519PrivateKey::generate();
        let txn = AnyRawTransaction::from(SimpleTransaction::new(
            raw(key.public_key().to_address()),
            Some(AccountAddress::ZERO),
        ));
        let auth = ed25519_auth(&key, &txn);
        let err = generate_signed_transaction(SignedTransactionInput::new(txn, auth)).unwrap_err();
        assert!(matches!(err, WalletError::MissingAuthenticator("fee payer")));
    }

    #[test]
    fn test_fee_payer_flow() {
        let sender = Ed25519PrivateKey::generate();
        let sponsor = Ed25519PrivateKey::generate();
        let sponsor_address = sponsor.public_key().to_address();

        // The sender signs before the sponsor is known.
        let txn = AnyRawTransaction::from(SimpleTransaction::new(
            raw(sender.public_key().to_address()),
            Some(AccountAddress::ZERO),
        ));
        let sender_auth = ed25519_auth(&sender, &txn);

        let sponsored = txn.with_fee_payer_address(sponsor_address);
        let sponsor_auth = ed25519_auth(&sponsor, &sponsored);

        let bytes = generate_signed_transaction(
            SignedTransactionInput::new(sponsored.clone(), sender_auth).with_fee_payer(sponsor_auth),
        )
        .unwrap();
        match decode(&bytes).authenticator {
            TransactionAuthenticator::FeePayer {
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
                ..
            } => {
                assert!(secondary_signer_addresses.is_empty());
                assert!(secondary_signers.is_empty());
                assert_eq!(fee_payer_address, sponsor_address);
                fee_payer_signer
                    .verify(&generate_signing_message_for_transaction(&sponsored))
                    .unwrap();
            }
            other => panic!("unexpected authenticator {other:?}"),
        }
    }

    #[test]
    fn test_multi_agent_checks_secondary_authenticators() {
        let sender = Ed25519PrivateKey::generate();
        let second = Ed25519PrivateKey::generate();
        let txn = AnyRawTransaction::from(MultiAgentTransaction::new(
            raw(sender.public_key().to_address()),
            vec![second.public_key().to_address()],
            None,
        ));
        let sender_auth = ed25519_auth(&sender, &txn);
        let second_auth = ed25519_auth(&second, &txn);

        let missing = SignedTransactionInput::new(txn.clone(), sender_auth.clone());
        assert!(matches!(
            generate_signed_transaction(missing),
            Err(WalletError::MissingAuthenticator("additional signers"))
        ));

        let too_many = SignedTransactionInput::new(txn.clone(), sender_auth.clone())
            .with_additional_signers(vec![second_auth.clone(), second_auth.clone()]);
        assert!(matches!(
            generate_signed_transaction(too_many),
            Err(WalletError::LengthMismatch { .. })
        ));

        let bytes = generate_signed_transaction(
            SignedTransactionInput::new(txn, sender_auth).with_additional_signers(vec![second_auth]),
        )
        .unwrap();
        assert!(matches!(
            decode(&bytes).authenticator,
            TransactionAuthenticator::MultiAgent { .. }
        ));
    }

    #[test]
    fn test_empty_multi_agent_is_single_sender() {
        let key = Ed25519PrivateKey::generate();
        let txn = AnyRawTransaction::from(MultiAgentTransaction::new(
            raw(key.public_key().to_address()),
            vec![],
            None,
        ));
        let auth = ed25519_auth(&key, &txn);
        let signed = decode(
            &generate_signed_transaction(SignedTransactionInput::new(txn, auth)).unwrap(),
        );
        assert!(matches!(
            signed.authenticator,
            TransactionAuthenticator::Ed25519 { .. }
        ));
    }

    #[test]
    fn test_simulation_uses_placeholders() {
        let sender = Ed25519PrivateKey::generate();
        let txn = AnyRawTransaction::from(SimpleTransaction::new(
            raw(sender.public_key().to_address()),
            Some(AccountAddress::ZERO),
        ));
        let input = SimulationInput::new(txn, Some(sender.public_key().into()));
        let bytes = generate_signed_transaction_for_simulation(input).unwrap();

        match decode(&bytes).authenticator {
            TransactionAuthenticator::FeePayer {
                sender: sender_auth,
                fee_payer_signer,
                ..
            } => {
                assert_eq!(sender_auth.public_key(), Some(sender.public_key().into()));
                match sender_auth {
                    AccountAuthenticator::Ed25519 { signature, .. } => {
                        assert_eq!(signature.to_bytes(), [0u8; 64]);
                    }
                    other => panic!("unexpected sender {other:?}"),
                }
                assert_eq!(fee_payer_signer, AccountAuthenticator::NoAccountAuthenticator);
            }
            other => panic!("unexpected authenticator {other:?}"),
        }
    }

    #[test]
    fn test_simulation_secondary_count_must_match() {
        let txn = AnyRawTransaction::from(MultiAgentTransaction::new(
            raw(AccountAddress::ONE),
            vec![AccountAddress::THREE, AccountAddress::FOUR],
            None,
        ));
        let mut input = SimulationInput::new(txn.clone(), None);
        input.secondary_signers_public_keys = Some(vec![None]);
        assert!(matches!(
            generate_signed_transaction_for_simulation(input),
            Err(WalletError::LengthMismatch { .. })
        ));

        let bytes = generate_signed_transaction_for_simulation(SimulationInput::new(txn, None))
            .unwrap();
        match decode(&bytes).authenticator {
            TransactionAuthenticator::MultiAgent {
                sender,
                secondary_signers,
                ..
            } => {
                assert_eq!(sender, AccountAuthenticator::NoAccountAuthenticator);
                assert_eq!(secondary_signers.len(), 2);
            }
            other => panic!("unexpected authenticator {other:?}"),
        }
    }
}
