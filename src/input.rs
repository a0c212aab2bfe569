//! Circuit input assembly and the prover/verifier argument codec.

use crate::{
    Error, Result,
    envelope::{ENCRYPTED_KEY_SIZE, IV_SIZE, PUBLIC_KEY_SIZE, TAG_SIZE, Txe},
    hex, rlp,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The input to the verifier relation.
#[derive(Debug)]
pub struct Input {
    /// The public input.
    pub public: PublicInput,
    /// The private input.
    pub private: PrivateInput,
}

/// The public input to the verifier relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicInput {
    /// The Safe transaction struct hash.
    pub struct_hash: [u8; 32],
    /// The Safe transaction nonce. The transaction with `nonce` must hash to
    /// `struct_hash`.
    pub nonce: [u8; 32],
    /// The encrypted Safe transaction.
    pub ciphertext: Vec<u8>,
    /// The initialization vector used for encryption.
    pub iv: [u8; IV_SIZE],
    /// The authentication tag.
    pub tag: [u8; TAG_SIZE],
    /// The recipient encrypted keys and ephemeral public keys.
    pub recipients: Vec<PublicRecipient>,
}

/// Public input per recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicRecipient {
    /// The encrypted content key for the recipient.
    pub encrypted_key: [u8; ENCRYPTED_KEY_SIZE],
    /// The ephemeral public key used for ECDH.
    pub ephemeral_public_key: [u8; PUBLIC_KEY_SIZE],
}

/// The private input to the verifier relation. Zero-filled when verifying.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateInput {
    /// The RLP encoded Safe transaction.
    pub transaction: Vec<u8>,
    /// The symmetric content encryption key used to encrypt the RLP encoded
    /// Safe transaction using AES-GCM.
    pub content_encryption_key: [u8; 16],
    /// The recipient public keys and ephemeral private keys.
    pub recipients: Vec<PrivateRecipient>,
}

/// Private input per recipient.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateRecipient {
    /// The recipient's public key used for encryption.
    pub public_key: [u8; PUBLIC_KEY_SIZE],
    /// The ephemeral private key used for ECDH.
    pub ephemeral_private_key: [u8; 32],
}

impl std::fmt::Debug for PrivateInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateInput([REDACTED])")
    }
}

impl std::fmt::Debug for PrivateRecipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateRecipient([REDACTED])")
    }
}

/// Builds a verifier input from the public commitment and an encoded
/// envelope.
///
/// The private half is zero-filled with the shapes the relation allocates:
/// witness values are only known to the encrypting party, but the verifier
/// must lay out the same witness sizes as the prover.
pub fn extract(struct_hash: &[u8], nonce: &[u8], blob: &[u8]) -> Result<Input> {
    let struct_hash = struct_hash
        .try_into()
        .map_err(|_| Error::InvalidStructHash)?;
    let nonce = nonce_word(nonce)?;
    let envelope = Txe::decode(blob)?;

    let private = PrivateInput {
        transaction: vec![0; envelope.ciphertext.len()],
        content_encryption_key: [0; 16],
        recipients: envelope
            .recipients
            .iter()
            .map(|_| PrivateRecipient {
                public_key: [0; 32],
                ephemeral_private_key: [0; 32],
            })
            .collect(),
    };
    let public = PublicInput {
        struct_hash,
        nonce,
        ciphertext: envelope.ciphertext,
        iv: envelope.iv,
        tag: envelope.tag,
        recipients: envelope
            .recipients
            .into_iter()
            .map(|recipient| PublicRecipient {
                encrypted_key: recipient.encrypted_key,
                ephemeral_public_key: recipient.ephemeral_public_key,
            })
            .collect(),
    };

    Ok(Input { public, private })
}

/// The two hex-encoded RLP arguments passed to the prover and verifier
/// binaries. The verifier consumes only the public argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Args {
    /// The RLP-encoded public input as `0x`-prefixed hex.
    pub public: String,
    /// The RLP-encoded private input as `0x`-prefixed hex.
    pub private: String,
}

/// Serializes an input into its prover/verifier argument form.
pub fn argify(input: &Input) -> Args {
    let mut encoder = rlp::Encoder::new();
    encoder.list(|list| {
        list.bytes(&input.public.struct_hash)
            .uint(input.public.nonce)
            .bytes(&input.public.ciphertext)
            .bytes(&input.public.iv)
            .bytes(&input.public.tag)
            .list(|recipients| {
                for recipient in &input.public.recipients {
                    recipients.list(|entry| {
                        entry
                            .bytes(&recipient.encrypted_key)
                            .bytes(&recipient.ephemeral_public_key);
                    });
                }
            });
    });
    let public = hex::encode(&encoder.finish());

    let mut encoder = rlp::Encoder::new();
    encoder.list(|list| {
        list.bytes(&input.private.transaction)
            .bytes(&input.private.content_encryption_key)
            .list(|recipients| {
                for recipient in &input.private.recipients {
                    recipients.list(|entry| {
                        entry
                            .bytes(&recipient.public_key)
                            .bytes(&recipient.ephemeral_private_key);
                    });
                }
            });
    });
    let private = hex::encode(&encoder.finish());

    Args { public, private }
}

impl Input {
    /// Parses an input from its prover/verifier argument form.
    pub fn parse(public: &str, private: &str) -> Result<Self> {
        let public = hex::decode(public)?;
        let public = rlp::Decoder::new(&public).decode_struct(|decoder| {
            Ok(PublicInput {
                struct_hash: decoder.bytes_array()?,
                nonce: decoder.uint()?,
                ciphertext: decoder.bytes()?.to_vec(),
                iv: decoder.bytes_array()?,
                tag: decoder.bytes_array()?,
                recipients: decoder.vec(|recipient| {
                    recipient.item(|entry| {
                        Ok(PublicRecipient {
                            encrypted_key: entry.bytes_array()?,
                            ephemeral_public_key: entry.bytes_array()?,
                        })
                    })
                })?,
            })
        })?;

        let private = hex::decode(private)?;
        let private = rlp::Decoder::new(&private).decode_struct(|decoder| {
            Ok(PrivateInput {
                transaction: decoder.bytes()?.to_vec(),
                content_encryption_key: decoder.bytes_array()?,
                recipients: decoder.vec(|recipient| {
                    recipient.item(|entry| {
                        Ok(PrivateRecipient {
                            public_key: entry.bytes_array()?,
                            ephemeral_private_key: entry.bytes_array()?,
                        })
                    })
                })?,
            })
        })?;

        Ok(Input { public, private })
    }
}

fn nonce_word(nonce: &[u8]) -> Result<[u8; 32]> {
    let zeros = nonce.iter().take_while(|&&b| b == 0).count();
    let minimal = &nonce[zeros..];
    let offset = 32usize
        .checked_sub(minimal.len())
        .ok_or(Error::InvalidNonce)?;
    let mut word = [0; 32];
    word[offset..].copy_from_slice(minimal);
    Ok(word)
}
