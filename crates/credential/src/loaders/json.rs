//! JSON settings file loader.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::credentials::{Credentials, raw_from_json};
use crate::error::{CredentialError, ParseError};
use crate::params;
use crate::sanitize::sanitize;

/// Load credentials from a flat JSON settings file.
///
/// `path` defaults to [`params::default_settings_json_path`]. A missing
/// file yields an empty record; a present file that is not a JSON object is
/// a [`ParseError::Json`].
pub fn load_from_json_file(path: Option<&Path>) -> Result<Credentials, CredentialError> {
    let path = path.map_or_else(params::default_settings_json_path, Path::to_path_buf);
    debug!(path = %path.display(), "reading credentials from JSON settings file");
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "settings file not found");
            return Ok(Credentials::default());
        }
        Err(source) => return Err(ParseError::Read { path, source }.into()),
    };
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)
        .map_err(|source| ParseError::Json {
            path: path.clone(),
            source,
        })?;
    let creds = sanitize(raw_from_json(map))?;
    if creds.is_empty() {
        debug!(path = %path.display(), "no credentials found in settings file");
    } else {
        info!(path = %path.display(), "loaded credentials from JSON settings file");
    }
    Ok(creds)
}
