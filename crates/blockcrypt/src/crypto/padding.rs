//! Block padding: the seven [`PaddingType`] schemes, applied and removed.
//!
//! Padding only exists for the block-aligned modes (`cbc`, `ecb`). [`apply`]
//! and [`remove`] pass the text through untouched for every other mode.
//!
//! Removal is best-effort: a missing or malformed padding tail is not an
//! error, the text is simply returned as it was. Zero and Space padding are
//! ambiguous when the plaintext itself ends in the fill byte; those trailing
//! bytes are stripped too.

use common::PaddingType;
use rand::{rngs::OsRng, RngCore};

use super::error::CryptError;

/// Modes whose input must be a whole number of blocks.
pub const BLOCK_MODES: [&str; 2] = ["cbc", "ecb"];

const ISO7816_MARKER: u8 = 0x80;
const SPACE: u8 = 0x20;

/// Returns `true` if `mode` requires block-aligned input and therefore padding.
pub fn is_block_mode(mode: &str) -> bool {
    BLOCK_MODES.contains(&mode)
}

/// Pad `text` for `mode`, or return it unchanged if `mode` is not a block mode.
///
/// # Errors
///
/// See [`pad`].
pub fn apply(
    text: &[u8],
    mode: &str,
    block_size: usize,
    padding: PaddingType,
) -> Result<Vec<u8>, CryptError> {
    if !is_block_mode(mode) {
        return Ok(text.to_vec());
    }
    pad(text, block_size, padding)
}

/// Strip `padding` from `text` for `mode`, or return it unchanged if `mode` is
/// not a block mode.
pub fn remove(text: &[u8], mode: &str, block_size: usize, padding: PaddingType) -> Vec<u8> {
    if !is_block_mode(mode) {
        return text.to_vec();
    }
    unpad(text, block_size, padding).to_vec()
}

/// Number of padding bytes needed to extend `len` to the next block boundary.
///
/// Always in `1..=block_size`: an already aligned length gets a full block.
pub fn padding_size(len: usize, block_size: usize) -> usize {
    block_size - len % block_size
}

/// Append `padding` to `text` so the result is a multiple of `block_size`.
///
/// [`PaddingType::None`] returns `text` unchanged for any block size.
///
/// # Errors
///
/// Returns [`CryptError::PaddingSizeOverflow`] if the padding would be 256
/// bytes or longer, and [`CryptError::InvalidPaddingSize`] if it would exceed
/// the block size (including a zero block size).
pub fn pad(text: &[u8], block_size: usize, padding: PaddingType) -> Result<Vec<u8>, CryptError> {
    if padding == PaddingType::None {
        return Ok(text.to_vec());
    }
    if block_size == 0 {
        return Err(CryptError::InvalidPaddingSize {
            padding_size: 0,
            block_size,
        });
    }

    let size = padding_size(text.len(), block_size);
    if size >= 256 {
        return Err(CryptError::PaddingSizeOverflow { padding_size: size });
    }
    if size > block_size {
        return Err(CryptError::InvalidPaddingSize {
            padding_size: size,
            block_size,
        });
    }

    let mut out = Vec::with_capacity(text.len() + size);
    out.extend_from_slice(text);
    out.extend(fill(padding, size).into_iter().take(size));
    Ok(out)
}

/// Padding bytes for a `size`-byte tail. `size` is in `1..=255`.
fn fill(padding: PaddingType, size: usize) -> Vec<u8> {
    let len_byte = size as u8;
    match padding {
        PaddingType::None => Vec::new(),
        PaddingType::AnsiX923 => {
            let mut tail = vec![0u8; size];
            tail[size - 1] = len_byte;
            tail
        }
        PaddingType::Pkcs7 => vec![len_byte; size],
        PaddingType::Iso10126 => {
            let mut tail = vec![0u8; size];
            OsRng.fill_bytes(&mut tail[..size - 1]);
            tail[size - 1] = len_byte;
            tail
        }
        PaddingType::IsoIec7816_4 => {
            let mut tail = vec![0u8; size];
            tail[0] = ISO7816_MARKER;
            tail
        }
        PaddingType::Zero => vec![0u8; size],
        PaddingType::Space => vec![SPACE; size],
    }
}

/// Strip `padding` from the end of `text`.
///
/// Only block-aligned, non-empty text is considered padded. Anything that
/// fails verification comes back whole.
pub fn unpad(text: &[u8], block_size: usize, padding: PaddingType) -> &[u8] {
    if block_size == 0 || text.is_empty() || text.len() % block_size != 0 {
        return text;
    }
    let len = text.len();

    let strip = match padding {
        PaddingType::None => 0,
        PaddingType::AnsiX923 => length_byte(text, block_size)
            .filter(|&n| text[len - n..len - 1].iter().all(|&b| b == 0))
            .unwrap_or(0),
        PaddingType::Pkcs7 => length_byte(text, block_size)
            .filter(|&n| text[len - n..].iter().all(|&b| usize::from(b) == n))
            .unwrap_or(0),
        // Random fill cannot be checked.
        PaddingType::Iso10126 => length_byte(text, block_size).unwrap_or(0),
        PaddingType::IsoIec7816_4 => {
            let zeros = trailing_run(text, 0x00, block_size);
            if zeros < block_size && text[len - zeros - 1] == ISO7816_MARKER {
                zeros + 1
            } else {
                0
            }
        }
        PaddingType::Zero => trailing_run(text, 0x00, block_size),
        PaddingType::Space => trailing_run(text, SPACE, block_size),
    };

    &text[..len - strip]
}

/// The final byte read as a padding length, if it is a plausible one.
fn length_byte(text: &[u8], block_size: usize) -> Option<usize> {
    let n = usize::from(*text.last()?);
    (n > 0 && n <= block_size && n <= text.len()).then_some(n)
}

/// Count of trailing `byte`s, looking at no more than `limit` bytes.
fn trailing_run(text: &[u8], byte: u8, limit: usize) -> usize {
    text.iter()
        .rev()
        .take(limit)
        .take_while(|&&b| b == byte)
        .count()
}
