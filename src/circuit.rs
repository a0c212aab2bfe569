//! The verifier relation over a TXE envelope and its public commitment.

use crate::{
    Error, Result, ecdh, encrypt,
    input::Input,
    macros::verify,
    safe::SafeTransaction,
};

/// Evaluates the verifier relation.
///
/// Accepts when the private witness reproduces, bit for bit, the public
/// envelope and commitment: the transaction hashes to the struct hash under
/// the public nonce, content encryption yields the public ciphertext and
/// tag, and every recipient's key wrap yields the public encrypted key
/// under the public ephemeral key.
pub fn circuit(input: &Input) -> Result<()> {
    // The witness must have the exact shapes the relation allocates.
    if input.private.transaction.len() != input.public.ciphertext.len()
        || input.private.recipients.len() != input.public.recipients.len()
    {
        return Err(Error::ShapeMismatch);
    }

    // Verify the transaction matches the struct hash.
    let transaction = SafeTransaction::decode(&input.private.transaction)
        .map_err(|_| Error::Constraint("transaction does not decode"))?;
    verify!(
        transaction.struct_hash(input.public.nonce) == input.public.struct_hash,
        "struct hash mismatch"
    );

    // Verify the content encryption integrity.
    let (ciphertext, tag) = encrypt::content(
        &input.private.transaction,
        input.private.content_encryption_key,
        input.public.iv,
    )?;
    verify!(ciphertext == input.public.ciphertext, "ciphertext mismatch");
    verify!(tag == input.public.tag, "tag mismatch");

    // Verify the key wrapping integrity.
    for (public, private) in input
        .public
        .recipients
        .iter()
        .zip(input.private.recipients.iter())
    {
        // Verify the ephemeral key integrity.
        let ephemeral_public_key = ecdh::public_key(private.ephemeral_private_key);
        verify!(
            ephemeral_public_key == public.ephemeral_public_key,
            "ephemeral key mismatch"
        );

        // Verify the content key encryption.
        let shared_secret = ecdh::shared_secret(private.ephemeral_private_key, private.public_key);
        let encrypted_key = encrypt::wrap_key(input.private.content_encryption_key, shared_secret);
        verify!(
            encrypted_key == public.encrypted_key,
            "encrypted key mismatch"
        );
    }

    Ok(())
}
