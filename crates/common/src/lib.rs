//! Common types, protocol definitions, and errors shared across `blockcrypt` crates.

pub mod cipher_config;
pub mod error;
pub mod protocol;

pub use cipher_config::{CipherConfig, PaddingType};
pub use error::ServiceError;
