//! Decryption and transcoding of the whole book.
//!
//! The source is decrypted with the authorization code and the audio stream
//! re-encoded (or copied) into the target container. Inherited tags are
//! dropped and replaced with a fixed set of eight fields.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FFMPEG_LOG_ARGS, FfmpegSpawner, describe_ffmpeg_command, run_ffmpeg};
use crate::media::ProbeResult;

use ffmpeg_sidecar::command::FfmpegCommand;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Extension used for decrypt-only output.
pub const DECRYPTED_EXTENSION: &str = "m4b";

/// Output path for a source file with its extension swapped.
pub fn output_path_for(dest_dir: &Path, input: &Path, extension: &str) -> CoreResult<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        CoreError::InputNotFound(format!("{} has no file name", input.display()))
    })?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(extension);
    Ok(dest_dir.join(name))
}

/// Bit rate passed to the encoder; halved when downmixing to mono.
pub fn target_bitrate(probe: &ProbeResult, mono: bool) -> CoreResult<u64> {
    let rate = probe.bit_rate()?;
    Ok(if mono { rate / 2 } else { rate })
}

/// The eight tags written to the transcoded file, in order.
pub fn replacement_tags(probe: &ProbeResult) -> CoreResult<[(&'static str, String); 8]> {
    let tags = probe.tags();
    let or_empty = |v: &Option<String>| v.clone().unwrap_or_default();
    Ok([
        ("title", probe.title()?.to_string()),
        ("artist", probe.artist()?.to_string()),
        ("album_artist", or_empty(&tags.album_artist)),
        ("album", or_empty(&tags.album)),
        ("date", or_empty(&tags.date)),
        ("genre", or_empty(&tags.genre)),
        ("copyright", or_empty(&tags.copyright)),
        ("track", "1/1".to_string()),
    ])
}

fn base_command(config: &CoreConfig, input: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.args(FFMPEG_LOG_ARGS);
    cmd.arg("-activation_bytes");
    cmd.arg(&config.authcode);
    cmd.arg("-n");
    cmd.input(&*input.to_string_lossy());
    cmd
}

/// Builds the transcode command for `input` into `output`.
pub fn build_transcode_command(
    config: &CoreConfig,
    input: &Path,
    output: &Path,
    probe: &ProbeResult,
) -> CoreResult<FfmpegCommand> {
    let bitrate = target_bitrate(probe, config.mono)?;
    let tags = replacement_tags(probe)?;

    let mut cmd = base_command(config, input);
    cmd.arg("-vn");
    cmd.args(["-codec:a", config.container.codec()]);
    cmd.arg("-ab");
    cmd.arg(bitrate.to_string());
    cmd.arg("-ac");
    cmd.arg(config.channels().to_string());
    cmd.args(["-map_metadata", "-1"]);
    for (key, value) in tags {
        cmd.arg("-metadata");
        cmd.arg(format!("{key}={value}"));
    }
    cmd.output(&*output.to_string_lossy());
    Ok(cmd)
}

/// Builds the stream-copy command used in decrypt-only mode.
///
/// Source tags and chapters are kept; nothing is re-encoded.
pub fn build_decrypt_command(config: &CoreConfig, input: &Path, output: &Path) -> FfmpegCommand {
    let mut cmd = base_command(config, input);
    cmd.args(["-vn", "-c:a", "copy", "-f", "mp4"]);
    cmd.output(&*output.to_string_lossy());
    cmd
}

/// Runs an ffmpeg command that writes `output`, honouring overwrite and dry-run.
///
/// An existing output is reused unless overwrite is set. A failed run removes
/// whatever partial file ffmpeg left behind.
fn produce<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    mut cmd: FfmpegCommand,
    output: &Path,
    label: &str,
) -> CoreResult<()> {
    if output.exists() {
        if !config.overwrite {
            log::info!("Reusing existing file {}", output.display());
            return Ok(());
        }
        if !config.dry_run {
            log::info!("Removing transcoded file: {}", output.display());
            fs::remove_file(output)?;
        }
    }

    if config.dry_run {
        log::info!("[dry-run] {}", describe_ffmpeg_command(&mut cmd));
        return Ok(());
    }
    log::debug!("Running {}: {}", label, describe_ffmpeg_command(&mut cmd));

    let started = Instant::now();
    if let Err(e) = run_ffmpeg(spawner, cmd, label) {
        if output.exists() {
            log::debug!("Removing partial output {}", output.display());
            if let Err(rm_err) = fs::remove_file(output) {
                log::warn!("Could not remove partial output {}: {}", output.display(), rm_err);
            }
        }
        return Err(e);
    }

    if config.verbose {
        log::info!("Transcoding time: {:.2}s", started.elapsed().as_secs_f64());
    }
    Ok(())
}

/// Transcodes the whole book into the destination directory.
pub fn transcode<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    input: &Path,
    dest_dir: &Path,
    probe: &ProbeResult,
) -> CoreResult<PathBuf> {
    let output = output_path_for(dest_dir, input, config.container.extension())?;
    let cmd = build_transcode_command(config, input, &output, probe)?;
    produce(spawner, config, cmd, &output, "ffmpeg (transcode)")?;
    Ok(output)
}

/// Decrypts the book into an .m4b container without re-encoding.
pub fn decrypt<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    input: &Path,
    dest_dir: &Path,
) -> CoreResult<PathBuf> {
    let output = output_path_for(dest_dir, input, DECRYPTED_EXTENSION)?;
    let cmd = build_decrypt_command(config, input, &output);
    produce(spawner, config, cmd, &output, "ffmpeg (decrypt)")?;
    Ok(output)
}
