//! Integration tests for the credential source loaders.
//!
//! Exercises the loader contract end to end: absent sources yield empty
//! records, present-but-malformed sources fail, and every source funnels
//! through the same sanitization pipeline.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use snowconn_credential::{
    Credentials, CredentialError, ParseError, SecretStore, SecretStoreError,
    load_from_config_file, load_from_json_file, load_from_secret_store,
};
use tempfile::TempDir;

/// Sample credentials with already-canonical keys.
fn sample_credentials() -> serde_json::Value {
    serde_json::json!({
        "account": "test_account",
        "user": "test_user",
        "password": "test_password",
        "database": "test_db",
        "schema": "test_schema",
        "warehouse": "test_warehouse",
        "role": "test_role",
    })
}

fn write_json_file(dir: &TempDir, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join("creds.json");
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn write_config_file(dir: &TempDir, section: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.path().join("config");
    let mut text = format!("[{section}]\n");
    for (key, value) in entries {
        text.push_str(&format!("{key} = {value}\n"));
    }
    std::fs::write(&path, text).unwrap();
    path
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn assert_sample(creds: &Credentials) {
    assert_eq!(creds.account.as_deref(), Some("test_account"));
    assert_eq!(creds.user.as_deref(), Some("test_user"));
    assert_eq!(
        creds.password.as_ref().unwrap().expose_secret(),
        "test_password"
    );
    assert_eq!(creds.database.as_deref(), Some("test_db"));
    assert_eq!(creds.schema.as_deref(), Some("test_schema"));
    assert_eq!(creds.warehouse.as_deref(), Some("test_warehouse"));
    assert_eq!(creds.role.as_deref(), Some("test_role"));
    assert!(creds.extra.is_empty());
}

#[test]
fn json_round_trip_of_canonical_credentials() {
    init_tracing();

    // GIVEN: a settings file holding already-canonical, non-empty values
    let dir = TempDir::new().unwrap();
    let path = write_json_file(&dir, &sample_credentials());

    // WHEN: the file is loaded and sanitized
    let creds = load_from_json_file(Some(&path)).unwrap();

    // THEN: the record carries exactly the written values
    assert_sample(&creds);
}

#[test]
fn json_missing_file_is_empty_not_an_error() {
    let dir = TempDir::new().unwrap();
    let creds = load_from_json_file(Some(&dir.path().join("absent.json"))).unwrap();
    assert!(creds.is_empty());
}

#[test]
fn json_invalid_content_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "invalid json content").unwrap();

    let err = load_from_json_file(Some(&path)).unwrap_err();
    assert!(matches!(
        err,
        CredentialError::Parse {
            source: ParseError::Json { .. }
        }
    ));
    assert_eq!(err.source_path(), Some(path.as_path()));
}

#[test]
fn json_blank_and_null_entries_are_filtered() {
    let dir = TempDir::new().unwrap();
    let path = write_json_file(
        &dir,
        &serde_json::json!({
            "account": "",
            "user": null,
            "password": "   ",
            "database": "test_db",
        }),
    );

    let creds = load_from_json_file(Some(&path)).unwrap();
    assert_eq!(creds.database.as_deref(), Some("test_db"));
    assert!(creds.account.is_none());
    assert!(creds.user.is_none());
    assert!(creds.password.is_none());
}

#[test]
fn json_legacy_keys_map_to_canonical_names() {
    let dir = TempDir::new().unwrap();
    let path = write_json_file(
        &dir,
        &serde_json::json!({
            "accountname": "test_account",
            "username": "test_user",
            "dbname": "test_db",
            "schemaname": "test_schema",
            "warehousename": "test_warehouse",
            "rolename": "test_role",
        }),
    );

    let creds = load_from_json_file(Some(&path)).unwrap();
    assert_eq!(creds.account.as_deref(), Some("test_account"));
    assert_eq!(creds.user.as_deref(), Some("test_user"));
    assert_eq!(creds.database.as_deref(), Some("test_db"));
    assert_eq!(creds.schema.as_deref(), Some("test_schema"));
    assert_eq!(creds.warehouse.as_deref(), Some("test_warehouse"));
    assert_eq!(creds.role.as_deref(), Some("test_role"));
}

#[test]
fn config_file_with_snowsql_keys() {
    // GIVEN: a snowsql config carrying the legacy key dialect
    let dir = TempDir::new().unwrap();
    let path = write_config_file(
        &dir,
        "connections",
        &[
            ("accountname", "test_account"),
            ("username", "test_user"),
            ("password", "test_password"),
            ("rolename", "test_role"),
        ],
    );

    // WHEN: the connections section is loaded
    let creds = load_from_config_file(Some(&path), "connections").unwrap();

    // THEN: the legacy spellings land on their canonical fields
    assert_eq!(creds.account.as_deref(), Some("test_account"));
    assert_eq!(creds.user.as_deref(), Some("test_user"));
    assert_eq!(
        creds.password.as_ref().unwrap().expose_secret(),
        "test_password"
    );
    assert_eq!(creds.role.as_deref(), Some("test_role"));
}

#[test]
fn config_missing_file_is_empty_not_an_error() {
    let dir = TempDir::new().unwrap();
    let creds =
        load_from_config_file(Some(&dir.path().join("no_such_config")), "connections").unwrap();
    assert!(creds.is_empty());
}

#[test]
fn config_missing_section_is_empty_not_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config_file(&dir, "other_section", &[("accountname", "acme")]);
    let creds = load_from_config_file(Some(&path), "connections").unwrap();
    assert!(creds.is_empty());
}

#[test]
fn config_custom_section_name() {
    let dir = TempDir::new().unwrap();
    let path = write_config_file(
        &dir,
        "custom_connections",
        &[("accountname", "acme"), ("username", "bob")],
    );
    let creds = load_from_config_file(Some(&path), "custom_connections").unwrap();
    assert_eq!(creds.account.as_deref(), Some("acme"));
    assert_eq!(creds.user.as_deref(), Some("bob"));
}

#[test]
fn config_malformed_line_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    std::fs::write(&path, "[connections]\nthis line has no separator\n").unwrap();
    let err = load_from_config_file(Some(&path), "connections").unwrap_err();
    assert!(matches!(
        err,
        CredentialError::Parse {
            source: ParseError::Ini { line: 2, .. }
        }
    ));
}

/// In-memory secret store standing in for the remote transport.
struct FakeSecretStore {
    payload: Option<String>,
    fail_with: Option<String>,
}

impl FakeSecretStore {
    fn with_payload(payload: &str) -> Self {
        Self {
            payload: Some(payload.to_string()),
            fail_with: None,
        }
    }

    fn empty() -> Self {
        Self {
            payload: None,
            fail_with: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            payload: None,
            fail_with: Some(message.to_string()),
        }
    }
}

impl SecretStore for FakeSecretStore {
    fn get_secret_value(&self, _secret_id: &str) -> Result<Option<String>, SecretStoreError> {
        match &self.fail_with {
            Some(message) => Err(SecretStoreError::new(message.clone())),
            None => Ok(self.payload.clone()),
        }
    }
}

#[test]
fn secret_store_payload_is_sanitized() {
    let store = FakeSecretStore::with_payload(&sample_credentials().to_string());
    let creds = load_from_secret_store(&store, "warehouse/creds").unwrap();
    assert_sample(&creds);
}

#[test]
fn secret_without_payload_is_empty_not_an_error() {
    let store = FakeSecretStore::empty();
    let creds = load_from_secret_store(&store, "warehouse/creds").unwrap();
    assert!(creds.is_empty());
}

#[test]
fn malformed_secret_payload_is_a_parse_error() {
    let store = FakeSecretStore::with_payload("invalid json");
    let err = load_from_secret_store(&store, "warehouse/creds").unwrap_err();
    assert!(matches!(
        err,
        CredentialError::Parse {
            source: ParseError::SecretPayload { .. }
        }
    ));
}

#[test]
fn transport_error_propagates_with_its_message() {
    let store = FakeSecretStore::failing("access denied: not authorized");
    let err = load_from_secret_store(&store, "warehouse/creds").unwrap_err();
    assert!(matches!(err, CredentialError::SecretStore { .. }));
    assert!(err.to_string().contains("access denied: not authorized"));
}

#[test]
fn default_paths_fall_back_when_no_override_is_set() {
    use snowconn_credential::params;

    if std::env::var_os(params::SETTINGS_JSON_PATH_VAR).is_none() {
        assert_eq!(
            params::default_settings_json_path(),
            Path::new(params::DEFAULT_SETTINGS_JSON_PATH)
        );
    }
    if std::env::var_os(params::CONFIG_FILE_PATH_VAR).is_none() {
        if let Some(path) = params::default_config_file_path() {
            assert!(path.ends_with(".snowsql/config"));
        }
    }
}
