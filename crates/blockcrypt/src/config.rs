//! Configuration loading and validation for the blockcrypt service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use std::fmt;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{cipher_config, CipherConfig, PaddingType};
use serde::Deserialize;

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Initial cipher name.
    #[serde(default = "default_cipher")]
    pub cipher: String,

    /// Initial block mode name.
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Initial padding type, by name (`"pkcs7"`) or numeric code (`"2"`).
    #[serde(default = "default_padding")]
    pub padding: String,

    /// Initial default key, standard base64. Empty means every request must
    /// carry its own key.
    #[serde(default)]
    pub key_b64: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}
fn default_cipher() -> String {
    cipher_config::DEFAULT_CIPHER.into()
}
fn default_mode() -> String {
    cipher_config::DEFAULT_MODE.into()
}
fn default_padding() -> String {
    PaddingType::None.as_str().into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The initial [`CipherConfig`] described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `PADDING` does not name a padding type or
    /// `KEY_B64` is not valid base64.
    pub fn cipher_config(&self) -> Result<CipherConfig> {
        let padding: PaddingType = self
            .padding
            .parse()
            .with_context(|| format!("PADDING must be a padding name or code 0-6, got {:?}", self.padding))?;
        let key = STANDARD
            .decode(self.key_b64.trim())
            .context("KEY_B64 must be standard base64")?;

        Ok(CipherConfig {
            cipher: self.cipher.clone(),
            mode: self.mode.clone(),
            padding,
            key,
        })
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        ensure_non_empty(&self.cipher, "CIPHER")?;
        ensure_non_empty(&self.mode, "MODE")?;
        self.cipher_config()?;
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen_port", &self.listen_port)
            .field("log_level", &self.log_level)
            .field("cipher", &self.cipher)
            .field("mode", &self.mode)
            .field("padding", &self.padding)
            .field("key_b64", &"[REDACTED]")
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(())
}
