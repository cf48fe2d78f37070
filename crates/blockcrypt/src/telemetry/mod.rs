//! Structured logging setup.
//!
//! The service emits JSON logs to stdout through a single [`tracing`]
//! subscriber. Spans for each HTTP request come from `tower-http`'s trace
//! layer; the crypto pipeline adds `debug` events carrying sizes only.
//!
//! # Telemetry invariants
//!
//! - **No key material or plaintext** may appear in any span attribute or log
//!   field. Lengths, cipher names, mode names and padding names are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`). `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::init_telemetry;
