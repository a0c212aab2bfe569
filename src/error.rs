//! Error types for the TXE library and verifier relation.

use thiserror::Error;

/// Errors surfaced by the TXE library.
///
/// Every failure mode is a value returned at the API boundary; the library
/// performs no retries and no logging.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    // Input shape.
    /// The struct hash is not 32 bytes.
    #[error("struct hash must be 32 bytes")]
    InvalidStructHash,
    /// The nonce does not fit in 256 bits.
    #[error("nonce out of range")]
    InvalidNonce,
    /// An address is not 20 bytes.
    #[error("address must be 20 bytes")]
    InvalidAddress,
    /// A hex string is missing its `0x` prefix, has odd length, or contains
    /// a non-hex character.
    #[error("invalid hex string")]
    InvalidHex,
    /// The recipient list is empty.
    #[error("at least one recipient is required")]
    NoRecipients,
    /// The recipient list has more than 256 entries.
    #[error("too many recipients")]
    TooManyRecipients,

    // Codec.
    /// Decoding was attempted on empty input.
    #[error("empty input")]
    EmptyInput,
    /// Bytes remain after the top-level item.
    #[error("trailing bytes after item")]
    TrailingBytes,
    /// A length prefix is malformed or overruns the input.
    #[error("bad length prefix")]
    BadLengthPrefix,
    /// An item does not have the expected type or shape.
    #[error("field type mismatch")]
    FieldTypeMismatch,
    /// The envelope ends before its declared contents.
    #[error("truncated envelope")]
    Truncated,
    /// A field exceeds the envelope's length limits.
    #[error("length overflow")]
    LengthOverflow,

    // Crypto.
    /// AEAD authentication failed.
    #[error("authentication tag invalid")]
    AuthTagInvalid,
    /// No recipient entry unwraps with the given private key.
    #[error("not a recipient of this envelope")]
    NotARecipient,
    /// AES key unwrap rejected the wrapped key.
    #[error("key unwrap failed")]
    KeyUnwrapFailed,
    /// The system random number generator failed.
    #[error("random number generator failure")]
    RngFailure,
    /// The decrypted payload is not a nine-field Safe transaction.
    #[error("malformed payload")]
    MalformedPayload,

    // Circuit.
    /// Public and private input sizes disagree.
    #[error("public/private shape mismatch")]
    ShapeMismatch,
    /// A relation constraint does not hold.
    #[error("constraint violated: {0}")]
    Constraint(&'static str),
}

/// Result type for TXE operations.
pub type Result<T> = core::result::Result<T, Error>;
