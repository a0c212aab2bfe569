//! Property tests for the transaction and envelope codecs.

use crate::{
    envelope::{Txe, TxeRecipient},
    rlp,
    safe::{Operation, SafeTransaction},
};
use proptest::prelude::*;

fn transactions() -> impl Strategy<Value = SafeTransaction> {
    (
        any::<[u8; 20]>(),
        any::<[u8; 32]>(),
        proptest::collection::vec(any::<u8>(), 0..200),
        prop_oneof![Just(Operation::Call), Just(Operation::Delegatecall)],
        any::<[u8; 32]>(),
        any::<[u8; 32]>(),
        any::<[u8; 32]>(),
        any::<[u8; 20]>(),
        any::<[u8; 20]>(),
    )
        .prop_map(
            |(to, value, data, operation, safe_tx_gas, base_gas, gas_price, gas_token, refund_receiver)| {
                SafeTransaction {
                    to,
                    value,
                    data,
                    operation,
                    safe_tx_gas,
                    base_gas,
                    gas_price,
                    gas_token,
                    refund_receiver,
                }
            },
        )
}

fn envelopes() -> impl Strategy<Value = Txe> {
    (
        proptest::collection::vec(any::<u8>(), 0..300),
        any::<[u8; 12]>(),
        any::<[u8; 16]>(),
        proptest::collection::vec(
            (any::<[u8; 24]>(), any::<[u8; 32]>()).prop_map(
                |(encrypted_key, ephemeral_public_key)| TxeRecipient {
                    encrypted_key,
                    ephemeral_public_key,
                },
            ),
            1..8,
        ),
    )
        .prop_map(|(ciphertext, iv, tag, recipients)| Txe {
            ciphertext,
            iv,
            tag,
            recipients,
        })
}

proptest! {
    #[test]
    fn transaction_codec_round_trips(transaction in transactions()) {
        let encoded = transaction.encode();
        prop_assert_eq!(SafeTransaction::decode(&encoded).unwrap(), transaction);
    }

    #[test]
    fn envelope_codec_round_trips(envelope in envelopes()) {
        let encoded = envelope.encode().unwrap();

        let mut trailing = encoded.clone();
        trailing.push(0);
        prop_assert!(Txe::decode(&trailing).is_err());
        prop_assert!(Txe::decode(&encoded[..encoded.len() - 1]).is_err());

        prop_assert_eq!(Txe::decode(&encoded).unwrap(), envelope);
    }

    #[test]
    fn uint_encoding_round_trips(value in any::<u64>()) {
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&value.to_be_bytes());

        let mut encoder = rlp::Encoder::new();
        encoder.uint(word);
        let encoded = encoder.finish();

        let mut decoder = rlp::Decoder::new(&encoded);
        prop_assert_eq!(decoder.uint().unwrap(), word);
        prop_assert!(decoder.done().is_ok());
    }
}
