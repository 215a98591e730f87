//! Remote secret store loader.

use tracing::{debug, info};

use crate::credentials::{Credentials, raw_from_json};
use crate::error::{CredentialError, ParseError, SecretStoreError};
use crate::sanitize::sanitize;

/// Remote secret retrieval transport.
///
/// One call per load. Implementations wrap their client library's failure
/// in [`SecretStoreError`] so the original message propagates unchanged
/// through the loader.
pub trait SecretStore {
    /// Fetch the secret payload; `None` when the secret exists without a
    /// string value.
    fn get_secret_value(&self, secret_id: &str) -> Result<Option<String>, SecretStoreError>;
}

/// Load credentials from a remote secret.
///
/// Transport and authentication errors propagate unchanged. A payload that
/// is present but not valid JSON is a [`ParseError::SecretPayload`]: a
/// malformed secret is a misconfiguration worth failing on, not an empty
/// source.
pub fn load_from_secret_store(
    store: &dyn SecretStore,
    secret_id: &str,
) -> Result<Credentials, CredentialError> {
    debug!(secret_id, "reading credentials from secret store");
    let Some(payload) = store.get_secret_value(secret_id)? else {
        debug!(secret_id, "secret has no string payload");
        return Ok(Credentials::default());
    };
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&payload)
        .map_err(|source| ParseError::SecretPayload {
            secret_id: secret_id.to_string(),
            source,
        })?;
    let creds = sanitize(raw_from_json(map))?;
    if creds.is_empty() {
        debug!(secret_id, "no credentials found in secret");
    } else {
        info!(secret_id, "loaded credentials from secret store");
    }
    Ok(creds)
}
