//! Symmetric encryption: padding, the cipher primitive, and the pipeline that
//! ties them together.
//!
//! This module is free of HTTP and configuration-loading dependencies.
//!
//! # Blob format
//!
//! ```text
//! IV (iv_size bytes) || ciphertext
//! ```
//!
//! No magic bytes, version tag, or length prefix: the IV size is a function of
//! the cipher/mode pair, which encrypting and decrypting sides share.

pub mod error;
pub mod facade;
pub mod padding;
pub mod pipeline;
pub mod primitive;

pub use error::{CryptError, PrimitiveError};
pub use facade::Crypt;
pub use primitive::{CipherPrimitive, RustCryptoPrimitive};
