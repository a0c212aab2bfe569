//! Safe transaction encryption (TXE).
//!
//! Confidentially distributes a Safe transaction to a set of authorized
//! recipients, and links the published envelope to its public commitment:
//!
//! - the TXE envelope codec, a compact binary form of a restricted JWE
//!   General Serialization subset;
//! - hybrid multi-recipient encryption: AES-128-GCM content encryption with
//!   per-recipient X25519 ECDH-ES and AES key wrap of a shared content
//!   encryption key;
//! - the RLP codec for the transaction payload;
//! - the verifier relation witnessing that a `(struct hash, nonce)`
//!   commitment corresponds to the encrypted payload, without revealing it.

mod circuit;
mod decrypt;
pub mod ecdh;
mod encrypt;
mod envelope;
mod error;
pub mod hex;
mod input;
mod jwe;
mod macros;
#[cfg(test)]
mod proptests;
pub mod rlp;
mod safe;

pub use crate::{
    circuit::circuit,
    decrypt::decrypt,
    encrypt::{Encrypted, encrypt},
    envelope::{
        ENCRYPTED_KEY_SIZE, IV_SIZE, MAX_RECIPIENTS, PUBLIC_KEY_SIZE, TAG_SIZE, Txe, TxeRecipient,
        is_txe,
    },
    error::{Error, Result},
    input::{
        Args, Input, PrivateInput, PrivateRecipient, PublicInput, PublicRecipient, argify, extract,
    },
    jwe::{EphemeralKey, Jwe, JweHeader, JweRecipient, to_jwe},
    safe::{Operation, SafeTransaction},
};
