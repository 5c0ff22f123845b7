// ============================================================================
// bookrip-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg, ffprobe and mp3splt
//
// This module encapsulates every interaction with the three external programs
// the pipeline drives. Each program sits behind a trait so the pipeline can be
// exercised with mock implementations.
//
// KEY COMPONENTS:
// - FfmpegSpawner / SidecarSpawner: cover extraction, decryption, transcoding
// - FfprobeExecutor / CommandFfprobeExecutor: metadata probing
// - SplitExecutor / Mp3spltExecutor: chapter splitting
// - Toolchain: the three executors bundled for the pipeline
// - Dependency checking on PATH

use crate::error::{CoreError, CoreResult};

use std::path::PathBuf;

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

/// Traits and implementations for executing mp3splt commands
pub mod splitter_executor;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{
    FFMPEG_LOG_ARGS, FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner, describe_ffmpeg_command,
    run_ffmpeg,
};
pub use ffprobe_executor::{CommandFfprobeExecutor, FfprobeExecutor, ffprobe_args};
pub use splitter_executor::{Mp3spltExecutor, SplitExecutor};

// ============================================================================
// TOOLCHAIN
// ============================================================================

/// The external programs one pipeline run talks to.
#[derive(Debug, Clone, Default)]
pub struct Toolchain<F, P, S> {
    pub ffmpeg: F,
    pub ffprobe: P,
    pub splitter: S,
}

/// Toolchain backed by the real programs on `PATH`.
pub type SystemToolchain = Toolchain<SidecarSpawner, CommandFfprobeExecutor, Mp3spltExecutor>;

impl<F, P, S> Toolchain<F, P, S>
where
    F: FfmpegSpawner,
    P: FfprobeExecutor,
    S: SplitExecutor,
{
    pub fn new(ffmpeg: F, ffprobe: P, splitter: S) -> Self {
        Self {
            ffmpeg,
            ffprobe,
            splitter,
        }
    }
}

impl SystemToolchain {
    pub fn system() -> Self {
        Toolchain::new(SidecarSpawner, CommandFfprobeExecutor, Mp3spltExecutor)
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Programs that must be on `PATH` before any file is processed.
pub const REQUIRED_PROGRAMS: [&str; 3] = ["ffmpeg", "ffprobe", "mp3splt"];

/// Locates a required external program on `PATH`.
pub fn check_dependency(cmd_name: &str) -> CoreResult<PathBuf> {
    match which::which(cmd_name) {
        Ok(path) => {
            log::debug!("Found dependency {}: {}", cmd_name, path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("Dependency '{}' not found: {}", cmd_name, e);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
    }
}

/// Returns every required program that could not be found.
///
/// All programs are checked so the user sees the complete list at once.
pub fn missing_dependencies() -> Vec<&'static str> {
    REQUIRED_PROGRAMS
        .into_iter()
        .filter(|name| check_dependency(name).is_err())
        .collect()
}
