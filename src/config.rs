//! Loads the service account credential the server is deployed with.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;

/// The environment variable holding the base64-encoded service account JSON.
pub const FIREBASE_KEY_ENV: &str = "FIREBASE_KEY_B64";

/// The fields of a service account key file the server relies on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccountKey {
    /// The project the transactions belong to, used to name the database file.
    pub project_id: String,
    /// The identity of the service account.
    pub client_email: String,
    /// The credential type, normally "service_account".
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
}

/// The errors that stop the server from starting.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The credential environment variable is not set or is empty.
    #[error("the environment variable {FIREBASE_KEY_ENV} is not set")]
    MissingCredential,

    /// The credential is not valid base64.
    #[error("{FIREBASE_KEY_ENV} is not valid base64: {0}")]
    InvalidBase64(String),

    /// The decoded credential is not a service account key.
    #[error("{FIREBASE_KEY_ENV} does not contain a valid service account key: {0}")]
    InvalidCredential(String),
}

/// Decode and validate the value of [FIREBASE_KEY_ENV].
///
/// # Errors
/// Returns a [ConfigError] if the value is missing, is not base64, or does
/// not decode to a service account key with a non-empty project ID.
pub fn load_credential(encoded: Option<String>) -> Result<ServiceAccountKey, ConfigError> {
    let encoded = encoded
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingCredential)?;

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|error| ConfigError::InvalidBase64(error.to_string()))?;

    let key: ServiceAccountKey = serde_json::from_slice(&decoded)
        .map_err(|error| ConfigError::InvalidCredential(error.to_string()))?;

    if key.project_id.trim().is_empty() {
        return Err(ConfigError::InvalidCredential(
            "project_id is empty".to_owned(),
        ));
    }

    Ok(key)
}
