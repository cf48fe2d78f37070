//! [`Crypt`]: an owned cipher configuration bundled with a primitive.
//!
//! Setters take `&mut self`, so a `Crypt` shared across threads needs an
//! explicit lock around it. Callers that want lock-free sharing keep a
//! [`CipherConfig`] snapshot themselves and call the [`pipeline`] functions
//! directly, as the HTTP service does.

use common::{CipherConfig, PaddingType};

use super::error::CryptError;
use super::pipeline;
use super::primitive::{CipherPrimitive, RustCryptoPrimitive};

/// Symmetric encryption facade over a [`CipherPrimitive`].
#[derive(Debug, Clone)]
pub struct Crypt<P = RustCryptoPrimitive> {
    primitive: P,
    config: CipherConfig,
}

impl Crypt<RustCryptoPrimitive> {
    /// A facade over [`RustCryptoPrimitive`] with the default configuration.
    pub fn new() -> Self {
        Self::with_primitive(RustCryptoPrimitive)
    }
}

impl Default for Crypt<RustCryptoPrimitive> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: CipherPrimitive> Crypt<P> {
    pub fn with_primitive(primitive: P) -> Self {
        Self::with_config(primitive, CipherConfig::default())
    }

    pub fn with_config(primitive: P, config: CipherConfig) -> Self {
        Self { primitive, config }
    }

    pub fn set_key(&mut self, key: impl Into<Vec<u8>>) {
        self.config.key = key.into();
    }

    pub fn key(&self) -> &[u8] {
        &self.config.key
    }

    pub fn set_cipher(&mut self, cipher: impl Into<String>) {
        self.config.cipher = cipher.into();
    }

    pub fn cipher(&self) -> &str {
        &self.config.cipher
    }

    pub fn set_mode(&mut self, mode: impl Into<String>) {
        self.config.mode = mode.into();
    }

    pub fn mode(&self) -> &str {
        &self.config.mode
    }

    pub fn set_padding(&mut self, padding: PaddingType) {
        self.config.padding = padding;
    }

    pub fn padding(&self) -> PaddingType {
        self.config.padding
    }

    /// The current configuration snapshot.
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Encrypt `text` into an `IV || ciphertext` blob.
    ///
    /// # Errors
    ///
    /// See [`pipeline::encrypt`].
    pub fn encrypt(&self, text: &[u8], key: Option<&[u8]>) -> Result<Vec<u8>, CryptError> {
        pipeline::encrypt(&self.primitive, &self.config, text, key)
    }

    /// Decrypt an `IV || ciphertext` blob.
    ///
    /// # Errors
    ///
    /// See [`pipeline::decrypt`].
    pub fn decrypt(&self, blob: &[u8], key: Option<&[u8]>) -> Result<Vec<u8>, CryptError> {
        pipeline::decrypt(&self.primitive, &self.config, blob, key)
    }

    /// # Errors
    ///
    /// See [`pipeline::encrypt`].
    pub fn encrypt_base64(&self, text: &[u8], key: Option<&[u8]>) -> Result<String, CryptError> {
        pipeline::encrypt_base64(&self.primitive, &self.config, text, key)
    }

    /// # Errors
    ///
    /// See [`pipeline::decrypt_base64`].
    pub fn decrypt_base64(&self, text: &str, key: Option<&[u8]>) -> Result<Vec<u8>, CryptError> {
        pipeline::decrypt_base64(&self.primitive, &self.config, text, key)
    }

    pub fn available_ciphers(&self) -> Vec<String> {
        self.primitive.list_ciphers()
    }

    pub fn available_modes(&self) -> Vec<String> {
        self.primitive.list_modes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::primitive::MockCipherPrimitive;

    #[test]
    fn defaults() {
        let crypt = Crypt::new();
        assert_eq!(crypt.cipher(), "rijndael-128");
        assert_eq!(crypt.mode(), "cbc");
        assert_eq!(crypt.padding(), PaddingType::None);
        assert!(crypt.key().is_empty());
    }

    #[test]
    fn setters_and_getters() {
        let mut crypt = Crypt::new();
        crypt.set_key(b"0123456789".to_vec());
        crypt.set_cipher("blowfish");
        crypt.set_mode("ofb");
        crypt.set_padding(PaddingType::Space);

        assert_eq!(crypt.key(), b"0123456789");
        assert_eq!(crypt.cipher(), "blowfish");
        assert_eq!(crypt.mode(), "ofb");
        assert_eq!(crypt.padding(), PaddingType::Space);
    }

    #[test]
    fn every_padding_round_trips_in_block_modes() {
        let mut crypt = Crypt::new();
        crypt.set_key("passphrase");
        for mode in ["cbc", "ecb"] {
            crypt.set_mode(mode);
            for padding in PaddingType::ALL {
                crypt.set_padding(padding);
                let text = b"exactly 32 bytes of plaintext!!!";
                let blob = crypt.encrypt(text, None).unwrap();
                let expected = if padding == PaddingType::None { 16 + 32 } else { 16 + 48 };
                assert_eq!(blob.len(), expected, "{mode}/{padding}");
                assert_eq!(crypt.decrypt(&blob, None).unwrap(), text, "{mode}/{padding}");
            }
        }
    }

    #[test]
    fn base64_round_trip() {
        let mut crypt = Crypt::new();
        crypt.set_cipher("tripledes");
        crypt.set_padding(PaddingType::Pkcs7);
        crypt.set_key("k");

        let encoded = crypt.encrypt_base64(b"hello", None).unwrap();
        assert_eq!(crypt.decrypt_base64(&encoded, None).unwrap(), b"hello");
    }

    #[test]
    fn per_call_key_does_not_touch_config() {
        let mut crypt = Crypt::new();
        crypt.set_padding(PaddingType::Pkcs7);
        let blob = crypt.encrypt(b"hello", Some(b"one-off")).unwrap();

        assert!(crypt.key().is_empty());
        assert!(matches!(crypt.decrypt(&blob, None), Err(CryptError::EmptyKey)));
        assert_eq!(crypt.decrypt(&blob, Some(b"one-off")).unwrap(), b"hello");
    }

    #[test]
    fn failed_calls_leave_config_unchanged() {
        let mut crypt = Crypt::new();
        crypt.set_key(vec![1u8; 17]);
        crypt.set_padding(PaddingType::Zero);
        let before = crypt.config().clone();

        assert!(matches!(
            crypt.encrypt(b"x", None),
            Err(CryptError::KeyTooLarge { key_len: 17, iv_size: 16 })
        ));
        assert_eq!(crypt.config(), &before);
    }

    #[test]
    fn unknown_cipher_is_missing_capability() {
        let mut crypt = Crypt::new();
        crypt.set_cipher("serpent");
        crypt.set_key("k");
        assert!(matches!(
            crypt.encrypt(b"x", None),
            Err(CryptError::MissingCryptoCapability { .. })
        ));
    }

    #[test]
    fn listings_pass_through_to_primitive() {
        let mut mock = MockCipherPrimitive::new();
        mock.expect_list_ciphers()
            .times(1)
            .returning(|| vec!["toy".to_owned()]);
        mock.expect_list_modes()
            .times(1)
            .returning(|| vec!["cbc".to_owned(), "ecb".to_owned()]);
        let crypt = Crypt::with_primitive(mock);

        assert_eq!(crypt.available_ciphers(), ["toy"]);
        assert_eq!(crypt.available_modes(), ["cbc", "ecb"]);
    }

    #[test]
    fn real_primitive_lists_everything() {
        let crypt = Crypt::new();
        assert!(crypt.available_ciphers().contains(&"rijndael-128".to_owned()));
        assert_eq!(crypt.available_modes(), ["cbc", "ecb", "cfb", "ofb"]);
    }
}
