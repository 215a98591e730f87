//! Static parameter catalog for the connector surface.
//!
//! Read-only, process-lifetime tables: the set of parameter names the
//! underlying connector understands, the legacy-spelling alias table, and
//! the environment/default-path conventions shared by every loader.

use std::env;
use std::path::PathBuf;

/// Prefix identifying credential environment variables.
pub const ENV_PREFIX: &str = "SNOWFLAKE_";

/// Environment variable overriding the JSON settings file location.
pub const SETTINGS_JSON_PATH_VAR: &str = "SNOWFLAKE_SETTINGS_JSON_PATH";

/// Environment variable overriding the snowsql config file location.
pub const CONFIG_FILE_PATH_VAR: &str = "SNOWFLAKE_CONFIG_FILE_PATH";

/// Variables that share the credential prefix but configure the loaders
/// themselves; never harvested as credentials.
pub const RESERVED_ENV_KEYS: [&str; 2] = [SETTINGS_JSON_PATH_VAR, CONFIG_FILE_PATH_VAR];

/// Default location of the JSON settings file.
pub const DEFAULT_SETTINGS_JSON_PATH: &str = "/etc/config/snowflake_creds.json";

/// Config file section holding connection credentials.
pub const DEFAULT_CONFIG_SECTION: &str = "connections";

/// Connection parameters the underlying connector understands.
pub const CONNECTOR_PARAMS: &[&str] = &[
    "account",
    "user",
    "password",
    "database",
    "schema",
    "warehouse",
    "role",
    "authenticator",
    "autocommit",
    "private_key",
    "host",
    "port",
    "protocol",
    "region",
    "application",
    "passcode",
    "token",
    "timezone",
    "login_timeout",
    "network_timeout",
    "client_session_keep_alive",
];

/// Legacy and alternate key spellings mapped to their canonical names.
///
/// The first six come from the snowsql config dialect; the last two from
/// older secret payload layouts.
pub const KEY_ALIASES: &[(&str, &str)] = &[
    ("accountname", "account"),
    ("username", "user"),
    ("dbname", "database"),
    ("schemaname", "schema"),
    ("warehousename", "warehouse"),
    ("rolename", "role"),
    ("rsa_private_key", "private_key_encrypted"),
    ("pk_passphrase", "private_key_passphrase"),
];

/// Whether `key` is accepted by the sanitizer: the connector surface plus
/// the encrypted-key pair resolved during sanitization.
pub fn is_allowed(key: &str) -> bool {
    key == "private_key_encrypted"
        || key == "private_key_passphrase"
        || CONNECTOR_PARAMS.contains(&key)
}

/// Resolve a legacy spelling to its canonical name, if one exists.
pub fn resolve_alias(key: &str) -> Option<&'static str> {
    KEY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == key)
        .map(|(_, canonical)| *canonical)
}

/// Path of the JSON settings file, honoring the override variable.
pub fn default_settings_json_path() -> PathBuf {
    env::var_os(SETTINGS_JSON_PATH_VAR)
        .map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_JSON_PATH), PathBuf::from)
}

/// Path of the snowsql config file, honoring the override variable.
///
/// `None` when no override is set and the home directory cannot be
/// determined.
pub fn default_config_file_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_FILE_PATH_VAR) {
        return Some(PathBuf::from(path));
    }
    env::home_dir().map(|home| home.join(".snowsql").join("config"))
}
