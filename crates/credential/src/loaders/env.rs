//! Environment variable loader.

use tracing::{debug, info};

use crate::credentials::{Credentials, RawCredentials};
use crate::error::CredentialError;
use crate::params;
use crate::sanitize::sanitize;

/// Load credentials from `SNOWFLAKE_`-prefixed environment variables.
pub fn load_from_env() -> Result<Credentials, CredentialError> {
    harvest(std::env::vars())
}

/// Harvest credential variables from an environment snapshot.
///
/// The prefix match ignores case; the reserved path-override names are
/// excluded even though they share the prefix.
pub(crate) fn harvest(
    vars: impl Iterator<Item = (String, String)>,
) -> Result<Credentials, CredentialError> {
    debug!(
        prefix = params::ENV_PREFIX,
        "reading credentials from environment variables"
    );
    let raw: RawCredentials = vars
        .filter(|(key, _)| has_prefix(key) && !is_reserved(key))
        .map(|(key, value)| (key, Some(value)))
        .collect();
    let creds = sanitize(raw)?;
    if creds.is_empty() {
        debug!("no credentials found in environment variables");
    } else {
        info!(
            prefix = params::ENV_PREFIX,
            "loaded credentials from environment variables"
        );
    }
    Ok(creds)
}

fn has_prefix(key: &str) -> bool {
    key.get(..params::ENV_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(params::ENV_PREFIX))
}

fn is_reserved(key: &str) -> bool {
    params::RESERVED_ENV_KEYS
        .iter()
        .any(|reserved| key.eq_ignore_ascii_case(reserved))
}
