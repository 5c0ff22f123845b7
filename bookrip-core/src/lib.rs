//! Core library for converting encrypted AAX audiobooks with ffmpeg, ffprobe
//! and mp3splt.
//!
//! For every input the pipeline probes the book's metadata, lays out an
//! `artist/title` destination directory, extracts the cover image, transcodes
//! the audio and splits it into one file per chapter.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use bookrip_core::{CoreConfig, SystemToolchain, process_books};
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new("deadbeef", "Audiobooks");
//! config.workers = 2;
//! config.validate().unwrap();
//!
//! let inputs = vec![PathBuf::from("Book1.aax"), PathBuf::from("Book2.aax")];
//! let reports = process_books(&SystemToolchain::system(), &config, &inputs).unwrap();
//! for report in &reports {
//!     println!("{}: {:?}", report.input.display(), report.result);
//! }
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod layout;
pub mod media;
pub mod processing;
pub mod sanitize;
pub mod util;

// Re-exports for public API
pub use config::{Container, CoreConfig, resolve_authcode};
pub use error::{CoreError, CoreResult};
pub use external::{SystemToolchain, Toolchain, check_dependency, missing_dependencies};
pub use media::{ProbeResult, probe_metadata};
pub use processing::{BookReport, Outcome, process_book, process_books};
pub use sanitize::sanitize;
