//! `blockcrypt`: symmetric block-cipher encryption with pluggable padding.
//!
//! The [`crypto`] module is usable on its own as a library. The remaining
//! modules wire it into the HTTP service built by the `blockcrypt` binary.

pub mod config;
pub mod crypto;
pub mod server;
pub mod telemetry;

pub use crypto::{CipherPrimitive, Crypt, CryptError, RustCryptoPrimitive};
