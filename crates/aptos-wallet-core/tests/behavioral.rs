//! Behavioral tests for the wallet core.
//!
//! These tests drive the public API end to end: build, sign, assemble, and
//! check the bytes that would be submitted.

use aptos_wallet_core::account::{Ed25519Account, MultiKeyAccount, Signer, SingleKeyAccount};
use aptos_wallet_core::bcs::{from_bytes, to_bytes};
use aptos_wallet_core::config::PROTOCOL;
use aptos_wallet_core::crypto::{KeyScheme, MultiKeyPublicKey};
use aptos_wallet_core::intent::transfer_coin_payload;
use aptos_wallet_core::transaction::{
    generate_signed_transaction, generate_signing_message_for_transaction, AnyRawTransaction,
    SignedTransaction, SignedTransactionInput, TransactionAuthenticator, TransactionBuilder,
};
use aptos_wallet_core::{AccountAddress, ChainId, WalletError};

fn address(text: &str) -> AccountAddress {
    AccountAddress::from_str_relaxed(text).unwrap()
}

/// Byte offset of the transaction authenticator in a signed transaction.
fn authenticator_offset(txn: &AnyRawTransaction) -> usize {
    txn.raw_transaction().to_bcs().len()
}

mod wire_fixture_tests {
    use super::*;

    const SENDER: &str = "0x7eaead7c3b7c8d1e4f0a6b9c2d5e8f1a4b7c0d3e6f9a2b5c8d1e4f7a0b3c6d9e";
    const RECIPIENT: &str = "0x1f2e3d4c5b6a79880706f5e4d3c2b1a0ffeeddccbbaa99887766554433221100";

    fn sponsored_transfer() -> AnyRawTransaction {
        TransactionBuilder::new()
            .sender(address(SENDER))
            .sequence_number(1)
            .payload(transfer_coin_payload(address(RECIPIENT), 1000, None).unwrap())
            .max_gas_amount(10_000)
            .gas_unit_price(100)
            .expiration_timestamp_secs(1_660_131_587)
            .chain_id(ChainId::new(1))
            .fee_payer(address("0xfee"))
            .build()
            .unwrap()
    }

    fn expected_raw_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(address(SENDER).as_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        // EntryFunction payload.
        bytes.push(2);
        bytes.extend_from_slice(AccountAddress::ONE.as_bytes());
        bytes.push(13);
        bytes.extend_from_slice(b"aptos_account");
        bytes.push(8);
        bytes.extend_from_slice(b"transfer");
        bytes.push(0);
        bytes.push(2);
        bytes.push(32);
        bytes.extend_from_slice(address(RECIPIENT).as_bytes());
        bytes.push(8);
        bytes.extend_from_slice(&1000u64.to_le_bytes());
        bytes.extend_from_slice(&10_000u64.to_le_bytes());
        bytes.extend_from_slice(&100u64.to_le_bytes());
        bytes.extend_from_slice(&[0x03, 0x99, 0xf3, 0x62, 0, 0, 0, 0]);
        bytes.push(1);
        bytes
    }

    #[test]
    fn test_raw_transaction_layout() {
        let txn = sponsored_transfer();
        let raw = txn.raw_transaction().to_bcs();
        assert_eq!(raw, expected_raw_bytes());
        assert!(hex::encode(&raw).starts_with("7eaead7c"));
        assert!(hex::encode(&raw).ends_with("0399f3620000000001"));
    }

    #[test]
    fn test_fee_payer_signing_message() {
        let txn = sponsored_transfer();
        let mut expected = PROTOCOL.raw_transaction_with_data_prefix.to_vec();
        expected.push(1);
        expected.extend_from_slice(&expected_raw_bytes());
        expected.push(0);
        expected.extend_from_slice(address("0xfee").as_bytes());

        assert_eq!(generate_signing_message_for_transaction(&txn), expected);
    }

    #[test]
    fn test_simple_signing_message_uses_raw_transaction_salt() {
        let txn = TransactionBuilder::new()
            .sender(address(SENDER))
            .sequence_number(1)
            .payload(transfer_coin_payload(address(RECIPIENT), 1000, None).unwrap())
            .max_gas_amount(10_000)
            .gas_unit_price(100)
            .expiration_timestamp_secs(1_660_131_587)
            .chain_id(ChainId::new(1))
            .build()
            .unwrap();

        let mut expected = PROTOCOL.raw_transaction_prefix.to_vec();
        expected.extend_from_slice(&expected_raw_bytes());
        assert_eq!(generate_signing_message_for_transaction(&txn), expected);
    }
}

mod fee_payer_tests {
    use super::*;

    fn transfer(sender: &Ed25519Account) -> AnyRawTransaction {
        TransactionBuilder::new()
            .sender(sender.address())
            .sequence_number(0)
            .payload(transfer_coin_payload(address("0xb0b"), 1, None).unwrap())
            .chain_id(ChainId::testnet())
            .sponsored()
            .build()
            .unwrap()
    }

    #[test]
    fn test_sponsored_transaction_end_to_end() {
        let sender = Ed25519Account::generate();
        let sponsor = SingleKeyAccount::generate(KeyScheme::Secp256k1);

        let txn = transfer(&sender).with_fee_payer_address(sponsor.address());
        let sender_auth = sender.sign_transaction_with_authenticator(&txn).unwrap();
        let sponsor_auth = sponsor.sign_transaction_with_authenticator(&txn).unwrap();

        let bytes = generate_signed_transaction(
            SignedTransactionInput::new(txn.clone(), sender_auth).with_fee_payer(sponsor_auth),
        )
        .unwrap();
        assert_eq!(bytes[authenticator_offset(&txn)], 3);

        let signed: SignedTransaction = from_bytes(&bytes).unwrap();
        assert_eq!(to_bytes(&signed), bytes);
        let message = generate_signing_message_for_transaction(&txn);
        match signed.authenticator {
            TransactionAuthenticator::FeePayer {
                sender,
                secondary_signer_addresses,
                fee_payer_address,
                fee_payer_signer,
                ..
            } => {
                assert!(secondary_signer_addresses.is_empty());
                assert_eq!(fee_payer_address, sponsor.address());
                sender.verify(&message).unwrap();
                fee_payer_signer.verify(&message).unwrap();
            }
            other => panic!("expected a fee payer authenticator, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_fee_payer_authenticator() {
        let sender = Ed25519Account::generate();
        let txn = transfer(&sender);
        let sender_auth = sender.sign_transaction_with_authenticator(&txn).unwrap();

        assert!(matches!(
            generate_signed_transaction(SignedTransactionInput::new(txn, sender_auth)),
            Err(WalletError::MissingAuthenticator("fee payer"))
        ));
    }

    #[test]
    fn test_sponsor_address_changes_signing_message() {
        let sender = Ed25519Account::generate();
        let placeholder = transfer(&sender);
        let filled = placeholder.clone().with_fee_payer_address(address("0x5"));
        assert_ne!(
            generate_signing_message_for_transaction(&placeholder),
            generate_signing_message_for_transaction(&filled)
        );
        assert_eq!(placeholder.raw_transaction(), filled.raw_transaction());
    }
}

mod multi_agent_tests {
    use super::*;

    #[test]
    fn test_multi_agent_end_to_end() {
        let sender = Ed25519Account::generate();
        let second = SingleKeyAccount::generate(KeyScheme::Secp256k1);
        let third = SingleKeyAccount::generate(KeyScheme::Ed25519);

        let txn = TransactionBuilder::new()
            .sender(sender.address())
            .sequence_number(9)
            .payload(transfer_coin_payload(address("0xb0b"), 5, None).unwrap())
            .chain_id(ChainId::testnet())
            .secondary_signers(&[second.address(), third.address()])
            .build()
            .unwrap();

        let sender_auth = sender.sign_transaction_with_authenticator(&txn).unwrap();
        let others = vec![
            second.sign_transaction_with_authenticator(&txn).unwrap(),
            third.sign_transaction_with_authenticator(&txn).unwrap(),
        ];
        let bytes = generate_signed_transaction(
            SignedTransactionInput::new(txn.clone(), sender_auth).with_additional_signers(others),
        )
        .unwrap();
        assert_eq!(bytes[authenticator_offset(&txn)], 2);

        let signed: SignedTransaction = from_bytes(&bytes).unwrap();
        let message = generate_signing_message_for_transaction(&txn);
        let TransactionAuthenticator::MultiAgent {
            sender,
            secondary_signer_addresses,
            secondary_signers,
        } = signed.authenticator
        else {
            panic!("expected a multi-agent authenticator");
        };
        assert_eq!(secondary_signer_addresses, vec![second.address(), third.address()]);
        sender.verify(&message).unwrap();
        for auth in &secondary_signers {
            auth.verify(&message).unwrap();
        }
    }

    #[test]
    fn test_secondary_count_must_match() {
        let sender = Ed25519Account::generate();
        let txn = TransactionBuilder::new()
            .sender(sender.address())
            .sequence_number(0)
            .payload(transfer_coin_payload(address("0xb0b"), 5, None).unwrap())
            .chain_id(ChainId::testnet())
            .secondary_signer(address("0x2"))
            .build()
            .unwrap();
        let sender_auth = sender.sign_transaction_with_authenticator(&txn).unwrap();

        assert!(matches!(
            generate_signed_transaction(
                SignedTransactionInput::new(txn, sender_auth.clone())
                    .with_additional_signers(vec![sender_auth.clone(), sender_auth])
            ),
            Err(WalletError::LengthMismatch { .. })
        ));
    }
}

mod multi_key_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_multi_key_sender_uses_single_sender_variant() {
        let members: Vec<SingleKeyAccount> = [KeyScheme::Ed25519, KeyScheme::Secp256k1, KeyScheme::Ed25519]
            .into_iter()
            .map(SingleKeyAccount::generate)
            .collect();
        let key = MultiKeyPublicKey::new(
            members.iter().map(|m| m.public_key().clone()).collect(),
            2,
        )
        .unwrap();
        // Handed over out of order; the account sorts them.
        let account = MultiKeyAccount::new(key, vec![members[2].clone(), members[1].clone()]).unwrap();

        let txn = TransactionBuilder::new()
            .sender(account.address())
            .sequence_number(0)
            .payload(transfer_coin_payload(address("0xb0b"), 5, None).unwrap())
            .chain_id(ChainId::testnet())
            .build()
            .unwrap();
        let auth = account.sign_transaction_with_authenticator(&txn).unwrap();
        auth.verify(&generate_signing_message_for_transaction(&txn)).unwrap();

        let bytes =
            generate_signed_transaction(SignedTransactionInput::new(txn.clone(), auth)).unwrap();
        assert_eq!(bytes[authenticator_offset(&txn)], 4);
        // SingleSender wraps a MultiKey account authenticator.
        assert_eq!(bytes[authenticator_offset(&txn) + 1], 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn prop_any_signer_order_verifies(n in 2usize..5, rotate in 0usize..5) {
            let members: Vec<SingleKeyAccount> =
                (0..n).map(|_| SingleKeyAccount::generate(KeyScheme::Ed25519)).collect();
            let key = MultiKeyPublicKey::new(
                members.iter().map(|m| m.public_key().clone()).collect(),
                n as u8,
            )
            .unwrap();
            let mut signers = members.clone();
            signers.rotate_left(rotate % n);

            let account = MultiKeyAccount::new(key, signers).unwrap();
            prop_assert_eq!(account.signer_indices(), (0..n as u8).collect::<Vec<_>>());
            let auth = account.sign_with_authenticator(b"order").unwrap();
            prop_assert!(auth.verify(b"order").is_ok());
        }
    }
}

mod oracle_tests {
    use super::*;
    use aptos_wallet_core::move_values::U64;
    use aptos_wallet_core::transaction::{EntryFunction, RawTransaction};
    use proptest::prelude::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct OracleEntryFunction {
        module_address: [u8; 32],
        module_name: String,
        function: String,
        type_args: Vec<u8>,
        args: Vec<Vec<u8>>,
    }

    #[allow(dead_code)]
    #[derive(Serialize)]
    enum OraclePayload {
        Script,
        ModuleBundle,
        EntryFunction(OracleEntryFunction),
    }

    #[derive(Serialize)]
    struct OracleRawTransaction {
        sender: [u8; 32],
        sequence_number: u64,
        payload: OraclePayload,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: u8,
    }

    proptest! {
        #[test]
        fn prop_raw_transaction_matches_bcs_crate(
            sender in any::<[u8; 32]>(),
            recipient in any::<[u8; 32]>(),
            sequence_number in any::<u64>(),
            amount in any::<u64>(),
            max_gas_amount in any::<u64>(),
            gas_unit_price in any::<u64>(),
            expiration in any::<u64>(),
            chain_id in any::<u8>(),
        ) {
            let entry_function = EntryFunction::build(
                "0x1::aptos_account::transfer",
                vec![],
                &[&AccountAddress::from(recipient), &U64(amount)],
            )
            .unwrap();
            let raw = RawTransaction::new(
                AccountAddress::from(sender),
                sequence_number,
                entry_function.into(),
                max_gas_amount,
                gas_unit_price,
                expiration,
                ChainId::new(chain_id),
            );

            let oracle = OracleRawTransaction {
                sender,
                sequence_number,
                payload: OraclePayload::EntryFunction(OracleEntryFunction {
                    module_address: AccountAddress::ONE.to_bytes(),
                    module_name: "aptos_account".into(),
                    function: "transfer".into(),
                    type_args: vec![],
                    args: vec![recipient.to_vec(), amount.to_le_bytes().to_vec()],
                }),
                max_gas_amount,
                gas_unit_price,
                expiration_timestamp_secs: expiration,
                chain_id,
            };
            prop_assert_eq!(raw.to_bcs(), bcs::to_bytes(&oracle).unwrap());
        }
    }
}
