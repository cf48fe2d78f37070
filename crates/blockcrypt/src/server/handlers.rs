//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{
    protocol::{
        CiphersResponse, ConfigResponse, ConfigUpdate, DecryptRequest, DecryptResponse,
        EncryptRequest, EncryptResponse, ErrorResponse, HealthResponse, ModesResponse,
    },
    CipherConfig, ServiceError,
};
use tracing::{info, warn};

use super::state::AppState;
use crate::crypto::pipeline;

/// `POST /encrypt`: encrypt a base64 plaintext under the current
/// configuration, optionally with a per-request key.
///
/// Returns the base64 `IV || ciphertext` blob.
pub async fn encrypt(State(state): State<AppState>, Json(req): Json<EncryptRequest>) -> Response {
    let plaintext = match decode_field("plaintext", &req.plaintext) {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };
    let key = match decode_key(req.key.as_deref()) {
        Ok(k) => k,
        Err(e) => return error_response(e),
    };

    let config = state.snapshot();
    match pipeline::encrypt_base64(state.primitive.as_ref(), &config, &plaintext, key.as_deref()) {
        Ok(ciphertext) => (StatusCode::OK, Json(EncryptResponse { ciphertext })).into_response(),
        Err(e) => {
            warn!(error = %e, cipher = %config.cipher, mode = %config.mode, "encryption failed");
            error_response(e.into())
        }
    }
}

/// `POST /decrypt`: decrypt a base64 `IV || ciphertext` blob.
///
/// Padding is removed according to the configured padding type.
pub async fn decrypt(State(state): State<AppState>, Json(req): Json<DecryptRequest>) -> Response {
    let key = match decode_key(req.key.as_deref()) {
        Ok(k) => k,
        Err(e) => return error_response(e),
    };

    let config = state.snapshot();
    match pipeline::decrypt_base64(state.primitive.as_ref(), &config, &req.ciphertext, key.as_deref()) {
        Ok(plaintext) => {
            let plaintext = STANDARD.encode(plaintext);
            (StatusCode::OK, Json(DecryptResponse { plaintext })).into_response()
        }
        Err(e) => {
            warn!(error = %e, cipher = %config.cipher, mode = %config.mode, "decryption failed");
            error_response(e.into())
        }
    }
}

/// `GET /ciphers`: cipher names the backend implements.
pub async fn ciphers(State(state): State<AppState>) -> Json<CiphersResponse> {
    Json(CiphersResponse {
        ciphers: state.primitive.list_ciphers(),
    })
}

/// `GET /modes`: mode names the backend implements.
pub async fn modes(State(state): State<AppState>) -> Json<ModesResponse> {
    Json(ModesResponse {
        modes: state.primitive.list_modes(),
    })
}

/// `GET /config`: the current default configuration, without the key.
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(config_response(&state.snapshot()))
}

/// `PUT /config`: replace any subset of cipher, mode, padding and key.
///
/// The update is applied atomically; in-flight requests keep the snapshot
/// they started with. Names are not checked against the backend here: an
/// unsupported pair surfaces as `503` on the next encrypt or decrypt.
pub async fn put_config(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Response {
    let key = match decode_key(update.key.as_deref()) {
        Ok(k) => k,
        Err(e) => return error_response(e),
    };

    state.config.rcu(|current| {
        let mut next = CipherConfig::clone(current);
        if let Some(cipher) = &update.cipher {
            next.cipher = cipher.clone();
        }
        if let Some(mode) = &update.mode {
            next.mode = mode.clone();
        }
        if let Some(padding) = update.padding {
            next.padding = padding;
        }
        if let Some(key) = &key {
            next.key = key.clone();
        }
        next
    });

    let config = state.snapshot();
    info!(
        cipher = %config.cipher,
        mode = %config.mode,
        padding = %config.padding,
        key_set = config.has_key(),
        "configuration updated"
    );
    (StatusCode::OK, Json(config_response(&config))).into_response()
}

/// `GET /health`: liveness and readiness check.
///
/// Returns `200 OK` when the backend supports the configured cipher and mode.
/// Returns `503 Service Unavailable` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let config = state.snapshot();
    let ready = state.primitive.supports(&config.cipher, &config.mode);

    let (status_code, status_str) = if ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        cipher: config.cipher.clone(),
        mode: config.mode.clone(),
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::new(err.code(), err.to_string());
    (status, Json(body)).into_response()
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, ServiceError> {
    STANDARD
        .decode(value)
        .map_err(|e| ServiceError::BadRequest(format!("{name} is not valid base64: {e}")))
}

fn decode_key(key: Option<&str>) -> Result<Option<Vec<u8>>, ServiceError> {
    key.map(|k| decode_field("key", k)).transpose()
}

fn config_response(config: &CipherConfig) -> ConfigResponse {
    ConfigResponse {
        cipher: config.cipher.clone(),
        mode: config.mode.clone(),
        padding: config.padding,
        key_set: config.has_key(),
    }
}
