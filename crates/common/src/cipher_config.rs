//! Cipher configuration shared by the library facade and the HTTP service.
//!
//! A [`CipherConfig`] is a plain value: callers that need to change it between
//! operations either own it mutably or swap in a whole new snapshot. Nothing in
//! the encrypt/decrypt path ever mutates it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cipher used when none is configured.
pub const DEFAULT_CIPHER: &str = "rijndael-128";

/// Block mode used when none is configured.
pub const DEFAULT_MODE: &str = "cbc";

/// Padding schemes understood by the pipeline.
///
/// The numeric codes are stable and accepted wherever a padding type is parsed
/// from text (configuration, HTTP bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PaddingType {
    /// No padding bytes are ever added or removed.
    #[default]
    None = 0,
    /// Zero fill, final byte holds the padding length.
    AnsiX923 = 1,
    /// Every padding byte holds the padding length.
    Pkcs7 = 2,
    /// Random fill, final byte holds the padding length.
    Iso10126 = 3,
    /// One `0x80` marker byte followed by zero fill.
    #[serde(rename = "iso_iec_7816_4")]
    IsoIec7816_4 = 4,
    /// Zero fill.
    Zero = 5,
    /// `0x20` fill.
    Space = 6,
}

impl PaddingType {
    /// Every padding type, in code order.
    pub const ALL: [PaddingType; 7] = [
        PaddingType::None,
        PaddingType::AnsiX923,
        PaddingType::Pkcs7,
        PaddingType::Iso10126,
        PaddingType::IsoIec7816_4,
        PaddingType::Zero,
        PaddingType::Space,
    ];

    /// Canonical snake-case name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PaddingType::None => "none",
            PaddingType::AnsiX923 => "ansi_x923",
            PaddingType::Pkcs7 => "pkcs7",
            PaddingType::Iso10126 => "iso10126",
            PaddingType::IsoIec7816_4 => "iso_iec_7816_4",
            PaddingType::Zero => "zero",
            PaddingType::Space => "space",
        }
    }

    /// Numeric code of this padding type.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PaddingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text or a numeric code does not name a padding type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown padding type: {0}")]
pub struct ParsePaddingError(pub String);

impl TryFrom<u8> for PaddingType {
    type Error = ParsePaddingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PaddingType::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| ParsePaddingError(code.to_string()))
    }
}

impl FromStr for PaddingType {
    type Err = ParsePaddingError;

    /// Accepts the canonical name (case-insensitive) or the numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return PaddingType::try_from(code);
        }
        PaddingType::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParsePaddingError(trimmed.to_owned()))
    }
}

/// Cipher, mode, padding and key used by every encrypt/decrypt call.
#[derive(Clone, PartialEq, Eq)]
pub struct CipherConfig {
    /// Cipher name as understood by the cipher primitive (e.g. `"rijndael-128"`).
    pub cipher: String,
    /// Block mode name (e.g. `"cbc"`).
    pub mode: String,
    /// Padding applied in `cbc` and `ecb` modes.
    pub padding: PaddingType,
    /// Default key, used when a call does not supply its own.
    pub key: Vec<u8>,
}

impl CipherConfig {
    /// Returns `true` if a non-empty default key is configured.
    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            cipher: DEFAULT_CIPHER.into(),
            mode: DEFAULT_MODE.into(),
            padding: PaddingType::None,
            key: Vec::new(),
        }
    }
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key bytes never leave this struct through formatting.
        f.debug_struct("CipherConfig")
            .field("cipher", &self.cipher)
            .field("mode", &self.mode)
            .field("padding", &self.padding)
            .field("key", &format_args!("[REDACTED; {} bytes]", self.key.len()))
            .finish()
    }
}
