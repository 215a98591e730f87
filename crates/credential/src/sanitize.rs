//! The credential sanitization pipeline.
//!
//! [`sanitize`] turns a [`RawCredentials`] harvest into the canonical
//! [`Credentials`] record: null and blank values are filtered, keys are
//! normalized and aliased, unrecognized parameters are dropped, and the
//! encrypted private-key pair is resolved into connector-ready DER key
//! material. Pure apart from the key-derivation step, and deterministic for
//! a given input.

use std::collections::BTreeMap;

use pkcs8::der::pem::PemLabel;
use pkcs8::{EncryptedPrivateKeyInfo, SecretDocument};
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use tracing::debug;

use crate::credentials::{Credentials, RawCredentials};
use crate::error::{CredentialError, KeyError, ValidationError};
use crate::params;

/// Sanitize a raw credential harvest into the canonical record.
pub fn sanitize(raw: RawCredentials) -> Result<Credentials, CredentialError> {
    let mut canonical = normalize(raw);

    // The encrypted pair is never a valid connector parameter; resolve it
    // into `private_key` or fail before anything else leaves this function.
    let encrypted = canonical.remove("private_key_encrypted");
    let passphrase = canonical.remove("private_key_passphrase");
    let private_key = match (encrypted, passphrase) {
        (Some(pem), Some(passphrase)) => {
            let passphrase = SecretString::from(passphrase);
            Some(decrypt_private_key(&pem, &passphrase)?)
        }
        (Some(_), None) => {
            return Err(ValidationError::EncryptedKeyWithoutPassphrase.into());
        }
        (None, Some(_)) => {
            debug!("ignoring private_key_passphrase without private_key_encrypted");
            None
        }
        (None, None) => None,
    };

    let autocommit = canonical
        .remove("autocommit")
        .map(|value| parse_bool("autocommit", &value))
        .transpose()?;

    Ok(Credentials {
        account: canonical.remove("account"),
        user: canonical.remove("user"),
        password: canonical.remove("password").map(SecretString::from),
        database: canonical.remove("database"),
        schema: canonical.remove("schema"),
        warehouse: canonical.remove("warehouse"),
        role: canonical.remove("role"),
        authenticator: canonical.remove("authenticator"),
        autocommit,
        private_key,
        extra: canonical,
    })
}

/// Key/value normalization shared by every source.
///
/// Drops null and blank values (blankness judged on the trimmed value, the
/// kept value stays verbatim), lower-cases keys, strips the environment
/// prefix, resolves legacy aliases, and drops unrecognized parameters.
/// Idempotent: already-canonical keys pass through unchanged.
pub(crate) fn normalize(raw: RawCredentials) -> BTreeMap<String, String> {
    let prefix = params::ENV_PREFIX.to_ascii_lowercase();
    let mut canonical = BTreeMap::new();
    for (key, value) in raw {
        let Some(value) = value else { continue };
        if value.trim().is_empty() {
            continue;
        }
        let mut key = key.to_lowercase();
        if let Some(stripped) = key.strip_prefix(&prefix) {
            key = stripped.to_string();
        }
        let key = key.trim();
        let key = params::resolve_alias(key).unwrap_or(key);
        if params::is_allowed(key) {
            canonical.insert(key.to_string(), value);
        }
    }
    canonical
}

/// Decrypt an encrypted PKCS#8 PEM document and re-serialize the plaintext
/// key to the DER form the connector expects.
fn decrypt_private_key(
    pem: &str,
    passphrase: &SecretString,
) -> Result<SecretSlice<u8>, CredentialError> {
    let (label, document) = SecretDocument::from_pem(pem).map_err(|err| KeyError::InvalidPem {
        message: err.to_string(),
    })?;
    EncryptedPrivateKeyInfo::validate_pem_label(label).map_err(|err| KeyError::InvalidPem {
        message: err.to_string(),
    })?;
    let encrypted =
        EncryptedPrivateKeyInfo::try_from(document.as_bytes()).map_err(|err| {
            KeyError::InvalidPem {
                message: err.to_string(),
            }
        })?;
    let decrypted =
        encrypted
            .decrypt(passphrase.expose_secret())
            .map_err(|err| KeyError::DecryptionFailed {
                message: err.to_string(),
            })?;
    Ok(SecretSlice::from(decrypted.as_bytes().to_vec()))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, CredentialError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ValidationError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into()),
    }
}
