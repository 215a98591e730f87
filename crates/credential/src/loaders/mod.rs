//! Credential source loaders.
//!
//! Four independent producers of a sanitized [`Credentials`] record:
//! a JSON settings file, a snowsql-style config file section, the process
//! environment, and a remote secret store. Every loader returns an empty
//! record when its source is absent; present-but-malformed content is an
//! error.
//!
//! [`Credentials`]: crate::credentials::Credentials

mod config;
mod env;
mod json;
mod secret;

pub use config::load_from_config_file;
pub use env::load_from_env;
pub use json::load_from_json_file;
pub use secret::{SecretStore, load_from_secret_store};
