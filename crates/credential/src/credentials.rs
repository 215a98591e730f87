//! Canonical credential record and its raw precursor.

use std::collections::BTreeMap;

use secrecy::{SecretSlice, SecretString};

/// Unvalidated key/value pairs as read from a source, before alias
/// resolution. `None` values model explicit nulls (JSON `null`).
///
/// Ephemeral: produced per loader call, consumed once by
/// [`sanitize`](crate::sanitize::sanitize), then discarded. Never logged,
/// never persisted.
pub type RawCredentials = BTreeMap<String, Option<String>>;

/// Canonical connection credentials.
///
/// Produced by the sanitizer; every populated field is non-empty and named
/// by the connector's parameter contract. Secret-bearing fields are wrapped
/// in [`secrecy`] types, so `Debug` output stays redacted. The record is
/// meant to be handed to the connection builder once, not retained.
#[derive(Debug, Default)]
pub struct Credentials {
    /// Snowflake account identifier.
    pub account: Option<String>,
    /// Login name.
    pub user: Option<String>,
    /// Password, when password authentication is in use.
    pub password: Option<SecretString>,
    /// Default database.
    pub database: Option<String>,
    /// Default schema.
    pub schema: Option<String>,
    /// Virtual warehouse.
    pub warehouse: Option<String>,
    /// Session role.
    pub role: Option<String>,
    /// Authenticator name (e.g. `externalbrowser`).
    pub authenticator: Option<String>,
    /// Session autocommit setting.
    pub autocommit: Option<bool>,
    /// DER-encoded PKCS#8 private key derived from the encrypted PEM pair.
    pub private_key: Option<SecretSlice<u8>>,
    /// Remaining recognized connector parameters, passed through the
    /// side-channel options bag in stable order.
    pub extra: BTreeMap<String, String>,
}

impl Credentials {
    /// `true` when nothing at all was harvested from the source.
    pub fn is_empty(&self) -> bool {
        self.account.is_none()
            && self.user.is_none()
            && self.password.is_none()
            && self.database.is_none()
            && self.schema.is_none()
            && self.warehouse.is_none()
            && self.role.is_none()
            && self.authenticator.is_none()
            && self.autocommit.is_none()
            && self.private_key.is_none()
            && self.extra.is_empty()
    }

    /// Set the account identifier.
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Set the login name.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the default database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the default schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Set the virtual warehouse.
    pub fn with_warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.warehouse = Some(warehouse.into());
        self
    }

    /// Set the session role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the authenticator name.
    pub fn with_authenticator(mut self, authenticator: impl Into<String>) -> Self {
        self.authenticator = Some(authenticator.into());
        self
    }
}

/// Flatten a parsed JSON object into a raw credential map.
///
/// Scalars other than strings keep their textual rendering; nested values
/// keep their JSON text (the sanitizer drops them unless the connector
/// recognizes the key).
pub(crate) fn raw_from_json(map: serde_json::Map<String, serde_json::Value>) -> RawCredentials {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(text) => Some(text),
                other => Some(other.to_string()),
            };
            (key, value)
        })
        .collect()
}
