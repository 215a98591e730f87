//! snowsql config file loader.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::credentials::{Credentials, RawCredentials};
use crate::error::{CredentialError, ParseError};
use crate::params;
use crate::sanitize::sanitize;

/// Load credentials from one section of a snowsql-style config file.
///
/// Dialect: `[section]` headers, `key = value` pairs, `;` or `#` comment
/// lines. `path` defaults to [`params::default_config_file_path`]. A
/// missing file or section yields an empty record; a malformed line is a
/// [`ParseError::Ini`].
pub fn load_from_config_file(
    path: Option<&Path>,
    section: &str,
) -> Result<Credentials, CredentialError> {
    let Some(path) = path
        .map(Path::to_path_buf)
        .or_else(params::default_config_file_path)
    else {
        debug!("no config file path available");
        return Ok(Credentials::default());
    };
    debug!(path = %path.display(), section, "reading credentials from config file");
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found");
            return Ok(Credentials::default());
        }
        Err(source) => return Err(ParseError::Read { path, source }.into()),
    };
    let Some(raw) = parse_section(&text, section, &path)? else {
        debug!(path = %path.display(), section, "section not present in config file");
        return Ok(Credentials::default());
    };
    let creds = sanitize(raw)?;
    if creds.is_empty() {
        debug!(path = %path.display(), "no credentials found in config file");
    } else {
        info!(path = %path.display(), section, "loaded credentials from config file");
    }
    Ok(creds)
}

/// Extract `section` as a raw credential map; `None` when the section never
/// appears.
fn parse_section(
    text: &str,
    section: &str,
    path: &Path,
) -> Result<Option<RawCredentials>, ParseError> {
    let mut current: Option<String> = None;
    let mut found = false;
    let mut raw = RawCredentials::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim();
            if name.is_empty() {
                return Err(ParseError::Ini {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    message: "section header missing name".to_string(),
                });
            }
            found |= name == section;
            current = Some(name.to_string());
            continue;
        }
        let Some(eq) = line.find('=') else {
            return Err(ParseError::Ini {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("expected 'key = value', got '{line}'"),
            });
        };
        if current.as_deref() == Some(section) {
            let key = line[..eq].trim();
            let value = line[eq + 1..].trim();
            raw.insert(key.to_string(), Some(value.to_string()));
        }
    }
    Ok(found.then_some(raw))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn section_scoping_and_comments() {
        let text = "\
; snowsql config
[connections]
accountname = acme
username = bob
# trailing comment

[connections.dev]
accountname = other
";
        let raw = parse_section(text, "connections", &PathBuf::from("config"))
            .unwrap()
            .unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw["accountname"], Some("acme".to_string()));
        assert_eq!(raw["username"], Some("bob".to_string()));
    }

    #[test]
    fn absent_section_is_none() {
        let text = "[other]\nkey = value\n";
        assert!(
            parse_section(text, "connections", &PathBuf::from("config"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn garbage_line_is_an_error_with_line_number() {
        let text = "[connections]\naccountname = acme\nnot a pair\n";
        let err = parse_section(text, "connections", &PathBuf::from("config")).unwrap_err();
        assert!(matches!(err, ParseError::Ini { line: 3, .. }));
    }
}
