//! JWE General Serialization adapter for TXE envelopes.
//!
//! A TXE envelope is a restricted subset of a JWE General Serialization
//! object: `A128GCM` content encryption with one `ECDH-ES+A128KW` recipient
//! entry per envelope recipient, each carrying its own ephemeral key.

use crate::{
    Error, Result,
    envelope::{MAX_RECIPIENTS, Txe, TxeRecipient},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

// base64url of the literal `{"enc":"A128GCM"}`.
const PROTECTED_HEADER: &str = "eyJlbmMiOiJBMTI4R0NNIn0";
const CONTENT_ALGORITHM: &str = "A128GCM";
const KEY_ALGORITHM: &str = "ECDH-ES+A128KW";
const KEY_TYPE: &str = "OKP";
const CURVE: &str = "X25519";

/// A JWE General Serialization object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwe {
    /// The base64url-encoded protected header.
    pub protected: String,
    /// The base64url-encoded initialization vector.
    pub iv: String,
    /// The base64url-encoded ciphertext.
    pub ciphertext: String,
    /// The base64url-encoded authentication tag.
    pub tag: String,
    /// The per-recipient entries.
    pub recipients: Vec<JweRecipient>,
}

/// A JWE recipient entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JweRecipient {
    /// The per-recipient unprotected header.
    pub header: JweHeader,
    /// The base64url-encoded wrapped content encryption key.
    pub encrypted_key: String,
}

/// A JWE per-recipient header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JweHeader {
    /// The key management algorithm.
    pub alg: String,
    /// The sender's ephemeral public key.
    pub epk: EphemeralKey,
}

/// A JWK-encoded ephemeral X25519 public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemeralKey {
    /// The key type.
    pub kty: String,
    /// The curve.
    pub crv: String,
    /// The base64url-encoded public key bytes.
    pub x: String,
}

#[derive(Deserialize)]
struct ProtectedHeader {
    enc: String,
}

/// Decodes a TXE blob and converts it to its JWE form.
pub fn to_jwe(blob: &[u8]) -> Result<Jwe> {
    Ok(Jwe::from(&Txe::decode(blob)?))
}

impl From<&Txe> for Jwe {
    fn from(txe: &Txe) -> Self {
        Jwe {
            protected: PROTECTED_HEADER.to_string(),
            iv: URL_SAFE_NO_PAD.encode(txe.iv),
            ciphertext: URL_SAFE_NO_PAD.encode(&txe.ciphertext),
            tag: URL_SAFE_NO_PAD.encode(txe.tag),
            recipients: txe
                .recipients
                .iter()
                .map(|recipient| JweRecipient {
                    header: JweHeader {
                        alg: KEY_ALGORITHM.to_string(),
                        epk: EphemeralKey {
                            kty: KEY_TYPE.to_string(),
                            crv: CURVE.to_string(),
                            x: URL_SAFE_NO_PAD.encode(recipient.ephemeral_public_key),
                        },
                    },
                    encrypted_key: URL_SAFE_NO_PAD.encode(recipient.encrypted_key),
                })
                .collect(),
        }
    }
}

impl TryFrom<&Jwe> for Txe {
    type Error = Error;

    fn try_from(jwe: &Jwe) -> Result<Self> {
        let protected = decode(&jwe.protected)?;
        let protected: ProtectedHeader =
            serde_json::from_slice(&protected).map_err(|_| Error::FieldTypeMismatch)?;
        if protected.enc != CONTENT_ALGORITHM {
            return Err(Error::FieldTypeMismatch);
        }

        let ciphertext = decode(&jwe.ciphertext)?;
        if ciphertext.len() > u16::MAX as usize {
            return Err(Error::LengthOverflow);
        }
        if jwe.recipients.is_empty() {
            return Err(Error::NoRecipients);
        }
        if jwe.recipients.len() > MAX_RECIPIENTS {
            return Err(Error::TooManyRecipients);
        }

        let recipients = jwe
            .recipients
            .iter()
            .map(|recipient| {
                if recipient.header.alg != KEY_ALGORITHM
                    || recipient.header.epk.kty != KEY_TYPE
                    || recipient.header.epk.crv != CURVE
                {
                    return Err(Error::FieldTypeMismatch);
                }
                Ok(TxeRecipient {
                    encrypted_key: decode_array(&recipient.encrypted_key)?,
                    ephemeral_public_key: decode_array(&recipient.header.epk.x)?,
                })
            })
            .collect::<Result<_>>()?;

        Ok(Txe {
            ciphertext,
            iv: decode_array(&jwe.iv)?,
            tag: decode_array(&jwe.tag)?,
            recipients,
        })
    }
}

fn decode(field: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(field)
        .map_err(|_| Error::FieldTypeMismatch)
}

fn decode_array<const N: usize>(field: &str) -> Result<[u8; N]> {
    decode(field)?
        .try_into()
        .map_err(|_| Error::FieldTypeMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{ENCRYPTED_KEY_SIZE, IV_SIZE, PUBLIC_KEY_SIZE, TAG_SIZE};

    fn envelope() -> Txe {
        Txe {
            ciphertext: vec![0xcc; 75],
            iv: [0x1f; IV_SIZE],
            tag: [0x7a; TAG_SIZE],
            recipients: vec![
                TxeRecipient {
                    encrypted_key: [0x01; ENCRYPTED_KEY_SIZE],
                    ephemeral_public_key: [0x02; PUBLIC_KEY_SIZE],
                },
                TxeRecipient {
                    encrypted_key: [0x03; ENCRYPTED_KEY_SIZE],
                    ephemeral_public_key: [0x04; PUBLIC_KEY_SIZE],
                },
            ],
        }
    }

    #[test]
    fn the_protected_header_is_the_a128gcm_constant() {
        assert_eq!(
            URL_SAFE_NO_PAD.decode(PROTECTED_HEADER).unwrap(),
            br#"{"enc":"A128GCM"}"#
        );
    }

    #[test]
    fn converts_envelopes_to_jwe() {
        let jwe = Jwe::from(&envelope());
        assert_eq!(jwe.protected, PROTECTED_HEADER);
        assert_eq!(jwe.recipients.len(), 2);
        assert_eq!(jwe.recipients[0].header.alg, "ECDH-ES+A128KW");
        assert_eq!(jwe.recipients[0].header.epk.kty, "OKP");
        assert_eq!(jwe.recipients[0].header.epk.crv, "X25519");
    }

    #[test]
    fn round_trips_both_directions() {
        let envelope = envelope();
        let jwe = Jwe::from(&envelope);
        assert_eq!(Txe::try_from(&jwe).unwrap(), envelope);
        assert_eq!(Jwe::from(&Txe::try_from(&jwe).unwrap()), jwe);
    }

    #[test]
    fn serializes_to_the_general_serialization_shape() {
        let jwe = Jwe::from(&envelope());
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&jwe).unwrap()).unwrap();
        assert_eq!(json["protected"], PROTECTED_HEADER);
        assert!(json["recipients"][0]["encrypted_key"].is_string());
        assert_eq!(json["recipients"][1]["header"]["epk"]["crv"], "X25519");
    }

    #[test]
    fn rejects_foreign_algorithms() {
        let mut jwe = Jwe::from(&envelope());
        jwe.recipients[0].header.alg = "RSA-OAEP".to_string();
        assert_eq!(
            Txe::try_from(&jwe).unwrap_err(),
            Error::FieldTypeMismatch
        );

        let mut jwe = Jwe::from(&envelope());
        jwe.protected = URL_SAFE_NO_PAD.encode(br#"{"enc":"A256GCM"}"#);
        assert_eq!(
            Txe::try_from(&jwe).unwrap_err(),
            Error::FieldTypeMismatch
        );
    }

    #[test]
    fn rejects_misshapen_fields() {
        let mut jwe = Jwe::from(&envelope());
        jwe.iv = URL_SAFE_NO_PAD.encode([0x1f; 11]);
        assert_eq!(
            Txe::try_from(&jwe).unwrap_err(),
            Error::FieldTypeMismatch
        );

        let mut jwe = Jwe::from(&envelope());
        jwe.recipients.clear();
        assert_eq!(Txe::try_from(&jwe).unwrap_err(), Error::NoRecipients);

        let mut jwe = Jwe::from(&envelope());
        jwe.tag = "not base64url!".to_string();
        assert_eq!(
            Txe::try_from(&jwe).unwrap_err(),
            Error::FieldTypeMismatch
        );
    }

    #[test]
    fn converts_blobs_directly() {
        let envelope = envelope();
        let blob = envelope.encode().unwrap();
        assert_eq!(to_jwe(&blob).unwrap(), Jwe::from(&envelope));
        assert!(to_jwe(&blob[..blob.len() - 1]).is_err());
    }
}
