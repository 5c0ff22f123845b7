//! Authorization code resolution.
//!
//! The code is looked up once at startup in this order: explicit value,
//! `.authcode` in the working directory, `~/.authcode`. The command line
//! fills the explicit value from `-a` or, failing that, `$AUTHCODE`.

use crate::error::{CoreError, CoreResult};

use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable backing the `-a` flag.
pub const AUTHCODE_ENV_VAR: &str = "AUTHCODE";

/// Name of the dotfile holding the code.
pub const AUTHCODE_FILENAME: &str = ".authcode";

/// Returns the dotfile locations in lookup order.
pub fn default_authcode_files() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from(AUTHCODE_FILENAME)];
    if let Some(home) = dirs::home_dir() {
        files.push(home.join(AUTHCODE_FILENAME));
    }
    files
}

/// Resolves the authorization code.
///
/// Blank values are treated as absent at every level, so an empty `$AUTHCODE`
/// falls through to the dotfiles.
pub fn resolve_authcode<P: AsRef<Path>>(explicit: Option<&str>, files: &[P]) -> CoreResult<String> {
    if let Some(code) = non_blank(explicit) {
        log::debug!("Using authorization code from -a or ${}", AUTHCODE_ENV_VAR);
        return Ok(code);
    }

    for file in files {
        let file = file.as_ref();
        if !file.is_file() {
            continue;
        }
        let contents = fs::read_to_string(file)?;
        match non_blank(Some(&contents)) {
            Some(code) => {
                log::debug!("Using authorization code from {}", file.display());
                return Ok(code);
            }
            None => log::warn!("Ignoring empty authorization code file {}", file.display()),
        }
    }

    Err(CoreError::MissingAuthCode)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
