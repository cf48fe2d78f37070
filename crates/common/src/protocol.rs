//! Request and response types exchanged over the HTTP API.
//!
//! All binary values (plaintext, ciphertext, keys) travel as standard base64
//! with padding, the same encoding the library's base64 helpers produce.

use serde::{Deserialize, Serialize};

use crate::cipher_config::PaddingType;

// ---------------------------------------------------------------------------
// Encrypt / decrypt endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Base64-encoded plaintext.
    pub plaintext: String,
    /// Base64-encoded key overriding the configured one for this call only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Base64 of the IV-prefixed ciphertext blob.
    pub ciphertext: String,
}

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Base64 of an IV-prefixed ciphertext blob.
    pub ciphertext: String,
    /// Base64-encoded key overriding the configured one for this call only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Base64-encoded recovered plaintext.
    pub plaintext: String,
}

// ---------------------------------------------------------------------------
// Capability listing
// ---------------------------------------------------------------------------

/// Response body for `GET /ciphers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiphersResponse {
    pub ciphers: Vec<String>,
}

/// Response body for `GET /modes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModesResponse {
    pub modes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Response body for `GET /config` and `PUT /config`.
///
/// The key itself is never returned; only whether one is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub cipher: String,
    pub mode: String,
    pub padding: PaddingType,
    pub key_set: bool,
}

/// Request body for `PUT /config`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<PaddingType>,
    /// Base64-encoded replacement key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Currently configured cipher.
    pub cipher: String,
    /// Currently configured mode.
    pub mode: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encrypt_request_key_is_optional() {
        let req: EncryptRequest = serde_json::from_value(json!({"plaintext": "aGk="})).unwrap();
        assert_eq!(req.plaintext, "aGk=");
        assert!(req.key.is_none());

        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("key"));
    }

    #[test]
    fn config_update_partial() {
        let upd: ConfigUpdate = serde_json::from_value(json!({"padding": "pkcs7"})).unwrap();
        assert_eq!(upd.padding, Some(PaddingType::Pkcs7));
        assert!(upd.cipher.is_none());
        assert!(upd.mode.is_none());
        assert!(upd.key.is_none());
    }

    #[test]
    fn config_update_rejects_unknown_padding() {
        let res: Result<ConfigUpdate, _> = serde_json::from_value(json!({"padding": "rot13"}));
        assert!(res.is_err());
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("bad_request", "key must not be empty");
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("key must not be empty"));
    }

    #[test]
    fn config_response_serde() {
        let c = ConfigResponse {
            cipher: "des".into(),
            mode: "ecb".into(),
            padding: PaddingType::IsoIec7816_4,
            key_set: true,
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["padding"], "iso_iec_7816_4");
        let decoded: ConfigResponse = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.padding, PaddingType::IsoIec7816_4);
    }
}
