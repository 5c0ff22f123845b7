//! Configuration structures and constants for the bookrip-core library.
//!
//! A `CoreConfig` is built once by the consumer (e.g. bookrip-cli), validated,
//! and then passed by reference to every pipeline stage. Nothing in the
//! pipeline reads process-wide state.

pub mod authcode;
mod container;

use crate::error::{CoreError, CoreResult};

use std::path::PathBuf;

pub use authcode::{AUTHCODE_ENV_VAR, default_authcode_files, resolve_authcode};
pub use container::Container;

// Default constants

/// Default root directory for converted books.
pub const DEFAULT_OUTPUT_DIR: &str = "Audiobooks";

/// Suffix appended to the output directory when downmixing to mono.
pub const MONO_OUTPUT_SUFFIX: &str = "-mono";

/// Default number of worker threads. One means sequential processing.
pub const DEFAULT_WORKERS: usize = 1;

/// File name of the per-book metadata snapshot.
pub const METADATA_FILENAME: &str = "metadata.json";

/// File name of the extracted cover image.
pub const COVER_FILENAME: &str = "cover.jpg";

/// Main configuration structure for the bookrip-core library.
///
/// Only the authorization code and output directory are required; every
/// other field has a default matching the command-line defaults.
///
/// # Examples
///
/// ```rust
/// use bookrip_core::config::{Container, CoreConfig};
///
/// let mut config = CoreConfig::new("deadbeef", "Audiobooks");
/// config.container = Container::Mp3;
/// config.mono = true;
/// config.workers = 4;
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Activation bytes used to decrypt the source files
    pub authcode: String,

    /// Target codec/container
    pub container: Container,

    /// Root directory under which `artist/title` directories are created
    pub output_dir: PathBuf,

    /// Downmix to a single channel at half the source bit rate
    pub mono: bool,

    /// Replace existing cover images and transcodes
    pub overwrite: bool,

    /// Keep the whole-book transcode instead of splitting into chapters
    pub single_file: bool,

    /// Only decrypt into an .m4b container, no re-encode
    pub decrypt_only: bool,

    /// Stop after extracting the cover image
    pub cover_only: bool,

    /// Stop after writing the metadata snapshot
    pub metadata_only: bool,

    /// Number of files processed concurrently
    pub workers: usize,

    /// Log extra detail such as transcoding time
    pub verbose: bool,

    /// Log the external commands instead of running them
    pub dry_run: bool,
}

impl CoreConfig {
    /// Creates a configuration with default options.
    pub fn new(authcode: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            authcode: authcode.into(),
            container: Container::default(),
            output_dir: output_dir.into(),
            mono: false,
            overwrite: false,
            single_file: false,
            decrypt_only: false,
            cover_only: false,
            metadata_only: false,
            workers: DEFAULT_WORKERS,
            verbose: false,
            dry_run: false,
        }
    }

    /// Checks the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.authcode.trim().is_empty() {
            return Err(CoreError::MissingAuthCode);
        }
        if self.workers == 0 {
            return Err(CoreError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(CoreError::Config(
                "output directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Channel count passed to the transcoder.
    pub fn channels(&self) -> u8 {
        if self.mono { 1 } else { 2 }
    }
}
