//! Error types for the padding, primitive, and pipeline layers.

use common::ServiceError;
use thiserror::Error;

/// Errors produced by a [`CipherPrimitive`](super::primitive::CipherPrimitive).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// The cipher name is not implemented by this primitive.
    #[error("unknown cipher: {0}")]
    UnknownCipher(String),

    /// The mode name is not implemented by this primitive.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// The key is longer than the largest key the cipher accepts.
    #[error("invalid key length {len} for cipher {cipher}")]
    InvalidKeyLength { cipher: String, len: usize },

    /// The IV length does not match the cipher block size.
    #[error("invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    /// Block-mode ciphertext whose length is not a multiple of the block size.
    #[error("input of {len} bytes is not a multiple of the {block_size}-byte block size")]
    UnalignedInput { len: usize, block_size: usize },
}

/// Errors produced by an encrypt or decrypt call.
///
/// Every variant is fatal to the call that raised it; the configuration the
/// call read is never modified.
#[derive(Debug, Error)]
pub enum CryptError {
    /// The primitive has no implementation for the configured cipher/mode pair.
    #[error("no crypto capability for cipher {cipher} in mode {mode}")]
    MissingCryptoCapability { cipher: String, mode: String },

    /// The resolved key has zero length.
    #[error("key must not be empty")]
    EmptyKey,

    /// The key is longer than the IV of the configured cipher/mode.
    #[error("key of {key_len} bytes exceeds the {iv_size}-byte IV size")]
    KeyTooLarge { key_len: usize, iv_size: usize },

    /// The ciphertext blob is shorter than the key.
    #[error("text of {text_len} bytes is shorter than the {key_len}-byte key")]
    TextTooShortForKey { text_len: usize, key_len: usize },

    /// The ciphertext blob cannot even hold the IV.
    #[error("blob of {blob_len} bytes is shorter than the {iv_size}-byte IV")]
    TruncatedBlob { blob_len: usize, iv_size: usize },

    /// The padding length does not fit in one byte.
    #[error("padding size {padding_size} does not fit in one byte")]
    PaddingSizeOverflow { padding_size: usize },

    /// The padding length exceeds the block size.
    #[error("padding size {padding_size} exceeds the {block_size}-byte block size")]
    InvalidPaddingSize {
        padding_size: usize,
        block_size: usize,
    },

    /// Base64 input could not be decoded.
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The cipher primitive failed.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}

impl From<CryptError> for ServiceError {
    fn from(e: CryptError) -> Self {
        match e {
            CryptError::MissingCryptoCapability { .. } => ServiceError::Unavailable(e.to_string()),
            CryptError::InvalidPaddingSize { .. } => ServiceError::Internal(e.to_string()),
            CryptError::Primitive(ref inner) => match inner {
                PrimitiveError::UnalignedInput { .. } => ServiceError::BadRequest(e.to_string()),
                _ => ServiceError::EncryptionFailure(e.to_string()),
            },
            CryptError::EmptyKey
            | CryptError::KeyTooLarge { .. }
            | CryptError::TextTooShortForKey { .. }
            | CryptError::TruncatedBlob { .. }
            | CryptError::PaddingSizeOverflow { .. }
            | CryptError::InvalidBase64(_) => ServiceError::BadRequest(e.to_string()),
        }
    }
}
