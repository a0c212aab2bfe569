//! TXE envelope binary encoding and decoding.
//!
//! The envelope layout, all integers big-endian:
//!
//! ```text
//! ciphertext length  .. 2 bytes
//! ciphertext         .. variable
//! iv                 .. 12 bytes
//! tag                .. 16 bytes
//! recipient count - 1 .. 1 byte
//! recipients         .. 56 bytes each: encrypted key then ephemeral public key
//! ```

use crate::{Error, Result};

/// Size of the AES-GCM initialization vector in bytes.
pub const IV_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Size of a wrapped content encryption key in bytes.
pub const ENCRYPTED_KEY_SIZE: usize = 24;

/// Size of an X25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Maximum number of recipients an envelope can carry.
pub const MAX_RECIPIENTS: usize = 256;

const RECIPIENT_SIZE: usize = ENCRYPTED_KEY_SIZE + PUBLIC_KEY_SIZE;

/// A decoded TXE envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Txe {
    /// The encrypted Safe transaction payload.
    pub ciphertext: Vec<u8>,
    /// The initialization vector used for content encryption.
    pub iv: [u8; IV_SIZE],
    /// The authentication tag over the ciphertext.
    pub tag: [u8; TAG_SIZE],
    /// The ordered envelope recipients.
    pub recipients: Vec<TxeRecipient>,
}

/// A single envelope recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxeRecipient {
    /// The wrapped content encryption key.
    pub encrypted_key: [u8; ENCRYPTED_KEY_SIZE],
    /// The ephemeral public key used for the ECDH derivation.
    pub ephemeral_public_key: [u8; PUBLIC_KEY_SIZE],
}

impl Txe {
    /// Encodes the envelope to bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let len = u16::try_from(self.ciphertext.len()).map_err(|_| Error::LengthOverflow)?;
        if self.recipients.is_empty() {
            return Err(Error::NoRecipients);
        }
        if self.recipients.len() > MAX_RECIPIENTS {
            return Err(Error::TooManyRecipients);
        }

        let mut out = Vec::with_capacity(
            2 + self.ciphertext.len() + IV_SIZE + TAG_SIZE + 1 + self.recipients.len() * RECIPIENT_SIZE,
        );
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.tag);
        out.push((self.recipients.len() - 1) as u8);
        for recipient in &self.recipients {
            out.extend_from_slice(&recipient.encrypted_key);
            out.extend_from_slice(&recipient.ephemeral_public_key);
        }
        Ok(out)
    }

    /// Decodes an envelope from bytes, rejecting short input and bytes past
    /// the final recipient.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (len, rest) = split_array::<2>(data)?;
        let len = u16::from_be_bytes(len) as usize;
        let (ciphertext, rest) = rest.split_at_checked(len).ok_or(Error::Truncated)?;
        let (iv, rest) = split_array::<IV_SIZE>(rest)?;
        let (tag, rest) = split_array::<TAG_SIZE>(rest)?;
        let (count, rest) = split_array::<1>(rest)?;
        let count = count[0] as usize + 1;

        if rest.len() < count * RECIPIENT_SIZE {
            return Err(Error::Truncated);
        }
        if rest.len() > count * RECIPIENT_SIZE {
            return Err(Error::TrailingBytes);
        }

        let mut recipients = Vec::with_capacity(count);
        let mut rest = rest;
        for _ in 0..count {
            let (encrypted_key, tail) = split_array::<ENCRYPTED_KEY_SIZE>(rest)?;
            let (ephemeral_public_key, tail) = split_array::<PUBLIC_KEY_SIZE>(tail)?;
            recipients.push(TxeRecipient {
                encrypted_key,
                ephemeral_public_key,
            });
            rest = tail;
        }

        Ok(Txe {
            ciphertext: ciphertext.to_vec(),
            iv,
            tag,
            recipients,
        })
    }
}

/// Returns whether the bytes decode as a TXE envelope.
pub fn is_txe(data: &[u8]) -> bool {
    Txe::decode(data).is_ok()
}

fn split_array<const N: usize>(data: &[u8]) -> Result<([u8; N], &[u8])> {
    let (head, rest) = data.split_at_checked(N).ok_or(Error::Truncated)?;
    // The length was just checked.
    Ok((head.try_into().map_err(|_| Error::Truncated)?, rest))
}
