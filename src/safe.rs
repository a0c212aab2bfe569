//! Safe smart account data structures and methods.

use crate::{Error, Result, rlp};
use sha3::{Digest as _, Keccak256};

// keccak256 of the EIP-712 `SafeTx` type string.
const SAFE_TX_TYPE_HASH: [u8; 32] =
    *b"\xbb\x83\x10\xd4\x86\x36\x8d\xb6\xbd\x6f\x84\x94\x02\xfd\xd7\x3a\
       \xd5\x3d\x31\x6b\x5a\x4b\x26\x44\xad\x6e\xfe\x0f\x94\x12\x86\xd8";

/// The parameters of a Safe transaction, without its nonce.
///
/// The nonce is carried in the public commitment instead of the encrypted
/// payload, so it is passed separately where needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeTransaction {
    pub to: [u8; 20],
    pub value: [u8; 32],
    pub data: Vec<u8>,
    pub operation: Operation,
    pub safe_tx_gas: [u8; 32],
    pub base_gas: [u8; 32],
    pub gas_price: [u8; 32],
    pub gas_token: [u8; 20],
    pub refund_receiver: [u8; 20],
}

impl SafeTransaction {
    /// RLP-encodes the Safe transaction payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut encoder = rlp::Encoder::new();
        encoder.list(|list| {
            list.bytes(&self.to)
                .uint(self.value)
                .bytes(&self.data)
                .uint(self.operation.as_word())
                .uint(self.safe_tx_gas)
                .uint(self.base_gas)
                .uint(self.gas_price)
                .bytes(&self.gas_token)
                .bytes(&self.refund_receiver);
        });
        encoder.finish()
    }

    /// RLP-decodes a Safe transaction payload.
    ///
    /// The input must be a list of exactly nine fields with nothing
    /// following it.
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        rlp::Decoder::new(encoded).decode_struct(|decoder| {
            Ok(SafeTransaction {
                to: decoder.address()?,
                value: decoder.uint()?,
                data: decoder.bytes()?.to_vec(),
                operation: decoder.bool()?.into(),
                safe_tx_gas: decoder.uint()?,
                base_gas: decoder.uint()?,
                gas_price: decoder.uint()?,
                gas_token: decoder.address()?,
                refund_receiver: decoder.address()?,
            })
        })
    }

    /// Returns the Safe transaction EIP-712 struct hash for the given
    /// `nonce`.
    pub fn struct_hash(&self, nonce: [u8; 32]) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(SAFE_TX_TYPE_HASH);
        hasher.update(address_to_word(self.to));
        hasher.update(self.value);
        hasher.update(Keccak256::digest(&self.data));
        hasher.update(self.operation.as_word());
        hasher.update(self.safe_tx_gas);
        hasher.update(self.base_gas);
        hasher.update(self.gas_price);
        hasher.update(address_to_word(self.gas_token));
        hasher.update(address_to_word(self.refund_receiver));
        hasher.update(nonce);
        hasher.finalize().into()
    }
}

/// The kind of call a Safe transaction performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Call,
    Delegatecall,
}

impl Operation {
    /// The operation as an EVM word.
    pub(crate) fn as_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[31] = match self {
            Operation::Call => 0,
            Operation::Delegatecall => 1,
        };
        word
    }
}

impl From<bool> for Operation {
    fn from(value: bool) -> Self {
        if value {
            Operation::Delegatecall
        } else {
            Operation::Call
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::Delegatecall),
            _ => Err(Error::FieldTypeMismatch),
        }
    }
}

fn address_to_word(address: [u8; 20]) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&address);
    word
}
