//! `blockcrypt` service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the tracing subscriber.
//! 3. Build the initial cipher configuration and the RustCrypto backend.
//! 4. Build the Axum router and start the HTTP server.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use blockcrypt::config::Config;
use blockcrypt::server::{self, state::AppState};
use blockcrypt::{telemetry, CipherPrimitive, RustCryptoPrimitive};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.listen_port,
        "blockcrypt starting"
    );

    // -----------------------------------------------------------------------
    // 3. Cipher backend
    // -----------------------------------------------------------------------
    let cipher_config = cfg.cipher_config()?;
    let primitive = RustCryptoPrimitive::new();
    if !primitive.supports(&cipher_config.cipher, &cipher_config.mode) {
        warn!(
            cipher = %cipher_config.cipher,
            mode = %cipher_config.mode,
            "configured cipher/mode is not supported; requests will fail until PUT /config fixes it"
        );
    }
    info!(
        cipher = %cipher_config.cipher,
        mode = %cipher_config.mode,
        padding = %cipher_config.padding,
        key_set = cipher_config.has_key(),
        "cipher configuration loaded"
    );

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(Arc::new(primitive), cipher_config);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
