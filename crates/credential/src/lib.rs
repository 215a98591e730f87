//! snowconn-credential — credential resolution for Snowflake connections.
//!
//! Harvests raw credentials from one of several sources (snowsql config
//! file, JSON settings file, `SNOWFLAKE_`-prefixed environment variables, a
//! remote secret store) and normalizes them into the canonical
//! [`Credentials`] record the connection layer consumes.
//!
//! # Design
//!
//! - **Raw vs canonical**: every source produces an ephemeral
//!   [`RawCredentials`] map that is sanitized exactly once and then
//!   discarded; only the typed, secret-redacting [`Credentials`] record
//!   leaves this crate.
//! - **Absent is not an error**: a missing file, section, or secret payload
//!   yields an empty record. Present-but-malformed sources fail with a
//!   [`ParseError`].
//! - **Key material**: the `private_key_encrypted` / `private_key_passphrase`
//!   pair is resolved during sanitization into a DER-encoded key wrapped in
//!   [`secrecy::SecretSlice`]; the raw pair never survives.

#![forbid(unsafe_code)]

/// Canonical credential record and its raw precursor.
pub mod credentials;
/// Error taxonomy for credential resolution.
pub mod error;
/// Credential source loaders.
pub mod loaders;
/// Static parameter catalog (allowed parameters, key aliases, default paths).
pub mod params;
/// The sanitization pipeline.
pub mod sanitize;

pub use credentials::{Credentials, RawCredentials};
pub use error::{CredentialError, KeyError, ParseError, SecretStoreError, ValidationError};
pub use loaders::{
    SecretStore, load_from_config_file, load_from_env, load_from_json_file,
    load_from_secret_store,
};
pub use sanitize::sanitize;
