//! Encrypt/decrypt orchestration over an immutable [`CipherConfig`] snapshot.
//!
//! Each call validates the key, asks the primitive for IV and block sizes,
//! pads (block modes only), runs the cipher, and frames the result as
//! `IV || ciphertext`. Decryption reverses those steps. The IV length is not
//! stored in the blob; both sides derive it from the cipher/mode pair.
//!
//! Two length checks are kept exactly as the wire contract defines them: the
//! key may not be longer than the IV, and a blob may not be shorter than the
//! key.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::CipherConfig;
use tracing::debug;

use super::error::CryptError;
use super::padding;
use super::primitive::CipherPrimitive;

/// Encrypt `text` and return `IV || ciphertext`.
///
/// `key` overrides the configured key for this call only.
///
/// # Errors
///
/// - [`CryptError::MissingCryptoCapability`] if the primitive cannot serve
///   the configured cipher/mode.
/// - [`CryptError::EmptyKey`] if the resolved key is empty.
/// - [`CryptError::KeyTooLarge`] if the key is longer than the IV.
/// - Padding and primitive errors as they occur.
pub fn encrypt<P>(
    primitive: &P,
    config: &CipherConfig,
    text: &[u8],
    key: Option<&[u8]>,
) -> Result<Vec<u8>, CryptError>
where
    P: CipherPrimitive + ?Sized,
{
    let key = resolve_key(primitive, config, key)?;
    let (cipher, mode) = (config.cipher.as_str(), config.mode.as_str());

    let iv_size = primitive.iv_size(cipher, mode)?;
    check_key_len(key, iv_size)?;
    let iv = primitive.random_iv(iv_size);

    let block_size = primitive.block_size(cipher, mode)?;
    let padded = padding::apply(text, mode, block_size, config.padding)?;
    let ciphertext = primitive.encrypt(cipher, key, &padded, mode, &iv)?;

    debug!(
        cipher,
        mode,
        padding = %config.padding,
        text_len = text.len(),
        padded_len = padded.len(),
        blob_len = iv.len() + ciphertext.len(),
        "encrypted"
    );

    let mut blob = iv;
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt an `IV || ciphertext` blob produced by [`encrypt`].
///
/// Padding is stripped on a best-effort basis: a tail that does not verify
/// is left in place rather than reported.
///
/// # Errors
///
/// - [`CryptError::MissingCryptoCapability`], [`CryptError::EmptyKey`] and
///   [`CryptError::KeyTooLarge`] as for [`encrypt`].
/// - [`CryptError::TextTooShortForKey`] if the blob is shorter than the key.
/// - [`CryptError::TruncatedBlob`] if the blob cannot hold the IV.
/// - Primitive errors as they occur.
pub fn decrypt<P>(
    primitive: &P,
    config: &CipherConfig,
    text: &[u8],
    key: Option<&[u8]>,
) -> Result<Vec<u8>, CryptError>
where
    P: CipherPrimitive + ?Sized,
{
    let key = resolve_key(primitive, config, key)?;
    let (cipher, mode) = (config.cipher.as_str(), config.mode.as_str());

    let iv_size = primitive.iv_size(cipher, mode)?;
    check_key_len(key, iv_size)?;

    if text.len() < key.len() {
        return Err(CryptError::TextTooShortForKey {
            text_len: text.len(),
            key_len: key.len(),
        });
    }
    if text.len() < iv_size {
        return Err(CryptError::TruncatedBlob {
            blob_len: text.len(),
            iv_size,
        });
    }

    let (iv, body) = text.split_at(iv_size);
    let decrypted = primitive.decrypt(cipher, key, body, mode, iv)?;
    let block_size = primitive.block_size(cipher, mode)?;
    let plaintext = padding::remove(&decrypted, mode, block_size, config.padding);

    debug!(
        cipher,
        mode,
        padding = %config.padding,
        blob_len = text.len(),
        text_len = plaintext.len(),
        "decrypted"
    );
    Ok(plaintext)
}

/// [`encrypt`], then standard base64 with padding.
///
/// # Errors
///
/// See [`encrypt`].
pub fn encrypt_base64<P>(
    primitive: &P,
    config: &CipherConfig,
    text: &[u8],
    key: Option<&[u8]>,
) -> Result<String, CryptError>
where
    P: CipherPrimitive + ?Sized,
{
    encrypt(primitive, config, text, key).map(|blob| STANDARD.encode(blob))
}

/// Standard base64 decode, then [`decrypt`].
///
/// # Errors
///
/// Returns [`CryptError::InvalidBase64`] if `text` is not valid base64, and
/// otherwise the errors of [`decrypt`].
pub fn decrypt_base64<P>(
    primitive: &P,
    config: &CipherConfig,
    text: &str,
    key: Option<&[u8]>,
) -> Result<Vec<u8>, CryptError>
where
    P: CipherPrimitive + ?Sized,
{
    let blob = STANDARD.decode(text)?;
    decrypt(primitive, config, &blob, key)
}

fn resolve_key<'a, P>(
    primitive: &P,
    config: &'a CipherConfig,
    key: Option<&'a [u8]>,
) -> Result<&'a [u8], CryptError>
where
    P: CipherPrimitive + ?Sized,
{
    if !primitive.supports(&config.cipher, &config.mode) {
        return Err(CryptError::MissingCryptoCapability {
            cipher: config.cipher.clone(),
            mode: config.mode.clone(),
        });
    }
    let key = key.unwrap_or(&config.key);
    if key.is_empty() {
        return Err(CryptError::EmptyKey);
    }
    Ok(key)
}

fn check_key_len(key: &[u8], iv_size: usize) -> Result<(), CryptError> {
    if key.len() > iv_size {
        return Err(CryptError::KeyTooLarge {
            key_len: key.len(),
            iv_size,
        });
    }
    Ok(())
}
