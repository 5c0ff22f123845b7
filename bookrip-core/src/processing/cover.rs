//! Cover art extraction.
//!
//! The embedded picture is copied out as a video stream without re-encoding.
//! Many audiobooks carry no picture at all, so callers treat a failure here
//! as informational.

use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::external::{FFMPEG_LOG_ARGS, FfmpegSpawner, describe_ffmpeg_command, run_ffmpeg};
use crate::layout::cover_path;

use ffmpeg_sidecar::command::FfmpegCommand;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to the cover image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverOutcome {
    Extracted(PathBuf),
    /// Already present and overwrite was not requested.
    Kept(PathBuf),
    DryRun,
}

/// Builds the ffmpeg command copying the cover stream to `output`.
pub fn build_cover_command(config: &CoreConfig, input: &Path, output: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.args(FFMPEG_LOG_ARGS);
    cmd.arg("-activation_bytes");
    cmd.arg(&config.authcode);
    cmd.arg("-n");
    cmd.input(&*input.to_string_lossy());
    cmd.args(["-an", "-codec:v", "copy"]);
    cmd.output(&*output.to_string_lossy());
    cmd
}

/// Extracts the cover image into `dest_dir/cover.jpg`.
pub fn extract_cover<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    input: &Path,
    dest_dir: &Path,
) -> CoreResult<CoverOutcome> {
    let output = cover_path(dest_dir);

    if output.exists() {
        if !config.overwrite {
            log::debug!("Keeping existing cover image {}", output.display());
            return Ok(CoverOutcome::Kept(output));
        }
        if !config.dry_run {
            log::debug!("Removing stale cover image {}", output.display());
            fs::remove_file(&output)?;
        }
    }

    let mut cmd = build_cover_command(config, input, &output);
    if config.dry_run {
        log::info!("[dry-run] extracting cover art: {}", describe_ffmpeg_command(&mut cmd));
        return Ok(CoverOutcome::DryRun);
    }
    log::debug!("Extracting cover art: {}", describe_ffmpeg_command(&mut cmd));

    run_ffmpeg(spawner, cmd, "ffmpeg (cover)")?;
    Ok(CoverOutcome::Extracted(output))
}
