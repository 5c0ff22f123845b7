//! Chapter splitting with mp3splt.
//!
//! mp3splt takes split points in `minutes.seconds.hundredths` and cannot infer
//! the end of the last track from end-of-file, so the final chapter's end time
//! is appended to the chapter start times.

use crate::config::{Container, CoreConfig};
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::SplitExecutor;
use crate::layout::chapter_files;
use crate::media::ProbeResult;
use crate::util::format_args_for_display;

use std::ffi::OsString;
use std::fs;
use std::path::Path;

/// Output file name template handed to mp3splt.
pub const CHAPTER_NAME_TEMPLATE: &str = "Chapter @n";

/// ID3 genre number for "Audiobook".
const AUDIOBOOK_GENRE: u8 = 183;

/// Result of the split stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The book was split; the whole-file transcode has been removed.
    Split { chapters: usize },
    DryRun,
}

/// Formats seconds as mp3splt's `minutes.seconds` notation.
///
/// Rounding happens on hundredths before the minute carry, so the seconds
/// part is always below 60: `numfix(90.0) == "1.30.00"`.
pub fn numfix(seconds: f64) -> String {
    let hundredths = (seconds.max(0.0) * 100.0).round() as u64;
    let minutes = hundredths / 6000;
    let rest = hundredths % 6000;
    format!("{}.{}.{:02}", minutes, rest / 100, rest % 100)
}

/// Computes split points for a container.
///
/// For mp3 this is every chapter start plus the last chapter's end, all in
/// mp3splt notation. Other containers get the raw start times in seconds.
pub fn split_points(container: Container, probe: &ProbeResult) -> CoreResult<Vec<String>> {
    let last = probe
        .chapters
        .last()
        .ok_or_else(|| CoreError::MissingMetadata("chapters".to_string()))?;

    let starts = probe.chapters.iter().map(|c| c.start_time);
    let points = match container {
        Container::Mp3 => starts
            .chain(std::iter::once(last.end_time))
            .map(numfix)
            .collect(),
        Container::Aac => starts.map(|s| s.to_string()).collect(),
    };
    Ok(points)
}

/// The mp3splt tag template: artist, title and date plus chapter numbering.
pub fn tag_template(probe: &ProbeResult) -> CoreResult<String> {
    let date = probe.tags().date.as_deref().unwrap_or_default();
    Ok(format!(
        "r%[@N=1,@a={},@b={},@y={},@t={},@g={}]",
        probe.artist()?,
        probe.title()?,
        date,
        CHAPTER_NAME_TEMPLATE,
        AUDIOBOOK_GENRE
    ))
}

/// Builds the mp3splt argument vector.
pub fn build_split_args(
    dest_dir: &Path,
    source: &Path,
    probe: &ProbeResult,
    points: &[String],
) -> CoreResult<Vec<OsString>> {
    let mut args: Vec<OsString> = vec![
        "-T".into(),
        "12".into(),
        "-o".into(),
        CHAPTER_NAME_TEMPLATE.into(),
        "-g".into(),
        tag_template(probe)?.into(),
        "-d".into(),
        dest_dir.as_os_str().to_os_string(),
        source.as_os_str().to_os_string(),
    ];
    args.extend(points.iter().map(OsString::from));
    Ok(args)
}

/// Splits the whole-book transcode into chapter files.
///
/// The transcode is deleted only after mp3splt exits successfully.
pub fn split_file<S: SplitExecutor>(
    splitter: &S,
    config: &CoreConfig,
    dest_dir: &Path,
    source: &Path,
    probe: &ProbeResult,
) -> CoreResult<SplitOutcome> {
    if !config.container.is_splittable() {
        return Err(CoreError::UnsupportedSplit(config.container.to_string()));
    }

    let points = split_points(config.container, probe)?;
    let args = build_split_args(dest_dir, source, probe, &points)?;

    if config.dry_run {
        log::info!("[dry-run] {}", format_args_for_display("mp3splt", &args));
        return Ok(SplitOutcome::DryRun);
    }
    log::debug!("Split points: {}", points.join(" "));

    let output = splitter.split(&args)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(command_failed_error("mp3splt", output.status, stderr));
    }

    log::debug!("Removing whole-book transcode {}", source.display());
    fs::remove_file(source)?;

    let chapters = chapter_files(dest_dir)?.len();
    Ok(SplitOutcome::Split { chapters })
}
