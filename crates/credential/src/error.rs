//! Error taxonomy for credential resolution.
//!
//! Tiered in the usual shape: [`CredentialError`] wraps the specific
//! categories ([`ValidationError`], [`ParseError`], [`KeyError`],
//! [`SecretStoreError`]) so callers branch on the failure category without
//! knowing which loader produced it. An absent source is never an error —
//! loaders return an empty record for that.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level credential resolution error.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// A credential invariant was violated.
    #[error("validation error: {source}")]
    Validation {
        /// Underlying validation error.
        #[from]
        source: ValidationError,
    },

    /// A present source could not be parsed.
    #[error("parse error: {source}")]
    Parse {
        /// Underlying parse error.
        #[from]
        source: ParseError,
    },

    /// Encrypted private key material could not be resolved.
    #[error("private key error: {source}")]
    Key {
        /// Underlying key error.
        #[from]
        source: KeyError,
    },

    /// The remote secret store failed.
    #[error("secret store error: {source}")]
    SecretStore {
        /// Underlying transport error, unchanged.
        #[from]
        source: SecretStoreError,
    },
}

/// Violations of the canonical credential contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The encrypted key is present without the passphrase needed to use it.
    #[error("private_key_encrypted is set but private_key_passphrase is not provided")]
    EncryptedKeyWithoutPassphrase,

    /// A boolean parameter carried an unrecognized textual value.
    #[error("parameter '{key}' expects a boolean, got '{value}'")]
    InvalidBool {
        /// Canonical parameter name.
        key: String,
        /// The offending value.
        value: String,
    },
}

/// Failures parsing a source that exists.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The settings file is present but not a valid JSON object.
    #[error("invalid JSON in settings file {}: {source}", .path.display())]
    Json {
        /// File that failed to parse.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A config file line could not be parsed.
    #[error("malformed config file {} at line {line}: {message}", .path.display())]
    Ini {
        /// File that failed to parse.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// A present source could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The secret payload is present but not a valid JSON object.
    #[error("secret '{secret_id}' does not contain valid JSON: {source}")]
    SecretPayload {
        /// Identifier of the offending secret.
        secret_id: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Json { path, .. } | Self::Ini { path, .. } | Self::Read { path, .. } => {
                Some(path)
            }
            Self::SecretPayload { .. } => None,
        }
    }
}

impl CredentialError {
    /// Path of the file involved, when the failure came from a file source.
    pub fn source_path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Parse { source } => source.path(),
            _ => None,
        }
    }
}

/// Failures resolving encrypted private key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The value is not an encrypted PKCS#8 PEM document.
    #[error("private_key_encrypted is not an encrypted PKCS#8 PEM document: {message}")]
    InvalidPem {
        /// Parser diagnostic.
        message: String,
    },

    /// Decryption failed: wrong passphrase or corrupted key material.
    #[error("failed to decrypt private key: {message}")]
    DecryptionFailed {
        /// Decryptor diagnostic.
        message: String,
    },
}

/// Transport or authentication failure surfaced by a
/// [`SecretStore`](crate::loaders::SecretStore) implementation.
///
/// Carries the collaborator's error unchanged so the original failure
/// message reaches the caller.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SecretStoreError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SecretStoreError {
    /// Failure described by a message alone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Failure wrapping the transport library's own error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
