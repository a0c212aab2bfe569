//! Decryption implementation.

use crate::{Error, Result, ecdh, encrypt, envelope::Txe, safe::SafeTransaction};
use zeroize::Zeroize as _;

/// Decrypts a TXE envelope with a recipient's X25519 private key.
///
/// Recipient entries are tried in envelope order; the first encrypted key
/// that unwraps recovers the content encryption key.
pub fn decrypt(blob: &[u8], private_key: [u8; 32]) -> Result<SafeTransaction> {
    let envelope = Txe::decode(blob)?;

    let mut content_key = None;
    for recipient in &envelope.recipients {
        let mut shared_secret = ecdh::shared_secret(private_key, recipient.ephemeral_public_key);
        let unwrapped = encrypt::unwrap_key(recipient.encrypted_key, shared_secret);
        shared_secret.zeroize();
        if let Ok(key) = unwrapped {
            content_key = Some(key);
            break;
        }
    }
    let Some(mut content_key) = content_key else {
        return Err(Error::NotARecipient);
    };

    let opened = encrypt::open(&envelope.ciphertext, content_key, envelope.iv, envelope.tag);
    content_key.zeroize();
    let mut plaintext = opened?;

    let transaction = SafeTransaction::decode(&plaintext).map_err(|_| Error::MalformedPayload);
    plaintext.zeroize();
    transaction
}
