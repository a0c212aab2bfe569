//! Encryption implementation.

use crate::{
    Error, Result, ecdh,
    envelope::{MAX_RECIPIENTS, Txe, TxeRecipient},
    input::{PrivateInput, PrivateRecipient},
    safe::SafeTransaction,
};
use aes_gcm::{
    Aes128Gcm, Key, Nonce, Tag,
    aead::{AeadMutInPlace as _, KeyInit as _},
};
use aes_kw::KekAes128;
use rand::{RngCore as _, rngs::OsRng};
use sha2::{Digest as _, Sha256};
use zeroize::Zeroize as _;

/// The result of encrypting a Safe transaction: the encoded envelope and the
/// private circuit witness produced alongside it.
#[derive(Debug)]
pub struct Encrypted {
    /// The encoded TXE envelope.
    pub blob: Vec<u8>,
    /// The private witness for the verifier relation.
    pub private: PrivateInput,
}

/// Encrypts a Safe transaction to an ordered set of recipient X25519 public
/// keys.
///
/// A fresh content encryption key and IV are sampled per call, and a fresh
/// ephemeral keypair per recipient. Recipients appear in the envelope in
/// input order.
pub fn encrypt(transaction: &SafeTransaction, recipients: &[[u8; 32]]) -> Result<Encrypted> {
    if recipients.is_empty() {
        return Err(Error::NoRecipients);
    }
    if recipients.len() > MAX_RECIPIENTS {
        return Err(Error::TooManyRecipients);
    }

    let payload = transaction.encode();

    let mut content_key = [0; 16];
    OsRng
        .try_fill_bytes(&mut content_key)
        .map_err(|_| Error::RngFailure)?;
    let mut iv = [0; 12];
    OsRng.try_fill_bytes(&mut iv).map_err(|_| Error::RngFailure)?;

    let (ciphertext, tag) = content(&payload, content_key, iv)?;

    let mut entries = Vec::with_capacity(recipients.len());
    let mut witnesses = Vec::with_capacity(recipients.len());
    for &public_key in recipients {
        let ephemeral = ecdh::Keypair::generate()?;
        let mut shared_secret = ecdh::shared_secret(ephemeral.private_key, public_key);
        let encrypted_key = wrap_key(content_key, shared_secret);
        shared_secret.zeroize();

        entries.push(TxeRecipient {
            encrypted_key,
            ephemeral_public_key: ephemeral.public_key,
        });
        witnesses.push(PrivateRecipient {
            public_key,
            ephemeral_private_key: ephemeral.private_key,
        });
    }

    let blob = Txe {
        ciphertext,
        iv,
        tag,
        recipients: entries,
    }
    .encode()?;

    Ok(Encrypted {
        blob,
        private: PrivateInput {
            transaction: payload,
            content_encryption_key: content_key,
            recipients: witnesses,
        },
    })
}

/// Content encryption: AES-128-GCM with empty additional authenticated data.
pub(crate) fn content(
    plaintext: &[u8],
    key: [u8; 16],
    iv: [u8; 12],
) -> Result<(Vec<u8>, [u8; 16])> {
    let key = Key::<Aes128Gcm>::from(key);
    let iv = Nonce::from(iv);

    let mut cipher = Aes128Gcm::new(&key);
    let mut ciphertext = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&iv, b"", &mut ciphertext)
        .map_err(|_| Error::LengthOverflow)?;

    Ok((ciphertext, tag.into()))
}

/// Content decryption, the inverse of [`content`].
pub(crate) fn open(
    ciphertext: &[u8],
    key: [u8; 16],
    iv: [u8; 12],
    tag: [u8; 16],
) -> Result<Vec<u8>> {
    let key = Key::<Aes128Gcm>::from(key);
    let iv = Nonce::from(iv);

    let mut cipher = Aes128Gcm::new(&key);
    let mut plaintext = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(&iv, b"", &mut plaintext, &Tag::from(tag))
        .map_err(|_| Error::AuthTagInvalid)?;

    Ok(plaintext)
}

/// Content key encryption: RFC 3394 AES key wrap under the Concat-KDF
/// derived key encryption key.
pub(crate) fn wrap_key(content_key: [u8; 16], shared_secret: [u8; 32]) -> [u8; 24] {
    let mut kek_bytes = kek(shared_secret);
    let mut encrypted_key = [0; 24];
    KekAes128::from(kek_bytes)
        .wrap(&content_key, &mut encrypted_key)
        .expect("wrapping a 16-byte key into a 24-byte buffer cannot fail");
    kek_bytes.zeroize();
    encrypted_key
}

/// Content key decryption, the inverse of [`wrap_key`].
pub(crate) fn unwrap_key(encrypted_key: [u8; 24], shared_secret: [u8; 32]) -> Result<[u8; 16]> {
    let mut kek_bytes = kek(shared_secret);
    let mut content_key = [0; 16];
    let result = KekAes128::from(kek_bytes)
        .unwrap(&encrypted_key, &mut content_key)
        .map_err(|_| Error::KeyUnwrapFailed);
    kek_bytes.zeroize();
    result.map(|()| content_key)
}

/// RFC 7518 §4.6 Concat-KDF over SHA-256 for the `ECDH-ES+A128KW`
/// algorithm: one round, empty party infos, 128-bit output.
fn kek(shared_secret: [u8; 32]) -> [u8; 16] {
    const ALGORITHM: &[u8] = b"ECDH-ES+A128KW";

    let mut hasher = Sha256::new();
    hasher.update(1u32.to_be_bytes());
    hasher.update(shared_secret);
    hasher.update((ALGORITHM.len() as u32).to_be_bytes());
    hasher.update(ALGORITHM);
    hasher.update(0u32.to_be_bytes());
    hasher.update(0u32.to_be_bytes());
    hasher.update(128u32.to_be_bytes());
    let digest = hasher.finalize();

    let mut kek = [0; 16];
    kek.copy_from_slice(&digest[..16]);
    kek
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safe::Operation;

    fn transaction() -> SafeTransaction {
        SafeTransaction {
            to: [0xa1; 20],
            value: [0; 32],
            data: vec![0x03, 0x04, 0x05, 0x06],
            operation: Operation::Call,
            safe_tx_gas: [0; 32],
            base_gas: [0; 32],
            gas_price: [0; 32],
            gas_token: [0xa2; 20],
            refund_receiver: [0xa3; 20],
        }
    }

    #[test]
    fn content_round_trips() {
        let key = [0x11; 16];
        let iv = [0x22; 12];
        let plaintext = b"attack at dawn";

        let (ciphertext, tag) = content(plaintext, key, iv).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len());
        assert_ne!(ciphertext, plaintext);
        assert_eq!(open(&ciphertext, key, iv, tag).unwrap(), plaintext);
    }

    #[test]
    fn open_rejects_tampering() {
        let key = [0x11; 16];
        let iv = [0x22; 12];
        let (mut ciphertext, tag) = content(b"attack at dawn", key, iv).unwrap();

        ciphertext[0] ^= 1;
        assert_eq!(
            open(&ciphertext, key, iv, tag).unwrap_err(),
            Error::AuthTagInvalid
        );

        ciphertext[0] ^= 1;
        let mut tag = tag;
        tag[0] ^= 1;
        assert_eq!(
            open(&ciphertext, key, iv, tag).unwrap_err(),
            Error::AuthTagInvalid
        );
    }

    #[test]
    fn key_wrap_round_trips() {
        let content_key = [0x33; 16];
        let shared_secret = [0x44; 32];

        let encrypted_key = wrap_key(content_key, shared_secret);
        assert_eq!(
            unwrap_key(encrypted_key, shared_secret).unwrap(),
            content_key
        );
    }

    #[test]
    fn key_unwrap_rejects_the_wrong_secret() {
        let encrypted_key = wrap_key([0x33; 16], [0x44; 32]);
        assert_eq!(
            unwrap_key(encrypted_key, [0x45; 32]).unwrap_err(),
            Error::KeyUnwrapFailed
        );
    }

    #[test]
    fn encrypt_assembles_a_decodable_envelope() {
        let recipients = [
            ecdh::Keypair::generate().unwrap(),
            ecdh::Keypair::generate().unwrap(),
            ecdh::Keypair::generate().unwrap(),
        ];
        let public_keys: Vec<_> = recipients.iter().map(|k| k.public_key).collect();

        let encrypted = encrypt(&transaction(), &public_keys).unwrap();
        let envelope = Txe::decode(&encrypted.blob).unwrap();

        assert_eq!(envelope.ciphertext.len(), encrypted.private.transaction.len());
        assert_eq!(envelope.recipients.len(), 3);
        assert_eq!(encrypted.private.recipients.len(), 3);
        for (i, witness) in encrypted.private.recipients.iter().enumerate() {
            assert_eq!(witness.public_key, public_keys[i]);
            assert_eq!(
                ecdh::public_key(witness.ephemeral_private_key),
                envelope.recipients[i].ephemeral_public_key
            );
        }
    }

    #[test]
    fn encrypt_uses_a_fresh_ephemeral_key_per_recipient() {
        let recipient = ecdh::Keypair::generate().unwrap();
        let encrypted = encrypt(&transaction(), &[recipient.public_key; 2]).unwrap();
        let envelope = Txe::decode(&encrypted.blob).unwrap();
        assert_ne!(
            envelope.recipients[0].ephemeral_public_key,
            envelope.recipients[1].ephemeral_public_key
        );
    }

    #[test]
    fn encrypt_requires_recipients() {
        assert_eq!(
            encrypt(&transaction(), &[]).unwrap_err(),
            Error::NoRecipients
        );
        assert_eq!(
            encrypt(&transaction(), &vec![[0x01; 32]; MAX_RECIPIENTS + 1]).unwrap_err(),
            Error::TooManyRecipients
        );
    }
}
