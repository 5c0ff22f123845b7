//! Per-book pipeline: probe, snapshot, cover, transcode, split.

use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::external::{FfmpegSpawner, FfprobeExecutor, SplitExecutor, Toolchain};
use crate::layout::{destination_dir, ensure_destination, has_chapter_output, write_metadata_snapshot};
use crate::media::{ProbeResult, probe_metadata};
use crate::processing::cover::extract_cover;
use crate::processing::split::{SplitOutcome, split_file};
use crate::processing::transcode::{decrypt, transcode};

use std::fmt;
use std::path::{Path, PathBuf};

/// How far the pipeline went for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Only `metadata.json` was written.
    MetadataOnly { dir: PathBuf },
    /// Stopped after cover extraction.
    CoverOnly { dir: PathBuf },
    /// Chapter files were already present; nothing was run.
    AlreadyProcessed { dir: PathBuf },
    /// Decrypted into an .m4b without re-encoding.
    Decrypted { output: PathBuf },
    /// Transcoded into a single file.
    Transcoded { output: PathBuf },
    /// Transcoded and split into chapter files.
    Split { dir: PathBuf, chapters: usize },
    /// Commands were logged, not run.
    DryRun { dir: PathBuf },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::MetadataOnly { dir } => write!(f, "metadata written to {}", dir.display()),
            Outcome::CoverOnly { dir } => write!(f, "cover extracted to {}", dir.display()),
            Outcome::AlreadyProcessed { dir } => write!(f, "already processed in {}", dir.display()),
            Outcome::Decrypted { output } => write!(f, "decrypted to {}", output.display()),
            Outcome::Transcoded { output } => write!(f, "transcoded to {}", output.display()),
            Outcome::Split { dir, chapters } => {
                write!(f, "split into {} chapter(s) in {}", chapters, dir.display())
            }
            Outcome::DryRun { dir } => write!(f, "dry run for {}", dir.display()),
        }
    }
}

/// Runs the whole pipeline for one input file.
pub fn process_book<F, P, S>(
    tools: &Toolchain<F, P, S>,
    config: &CoreConfig,
    input: &Path,
) -> CoreResult<Outcome>
where
    F: FfmpegSpawner,
    P: FfprobeExecutor,
    S: SplitExecutor,
{
    let probe = probe_metadata(&tools.ffprobe, input, &config.authcode)?;
    convert_book(tools, config, input, &probe)
}

/// Runs every stage after probing.
pub fn convert_book<F, P, S>(
    tools: &Toolchain<F, P, S>,
    config: &CoreConfig,
    input: &Path,
    probe: &ProbeResult,
) -> CoreResult<Outcome>
where
    F: FfmpegSpawner,
    P: FfprobeExecutor,
    S: SplitExecutor,
{
    let dir = destination_dir(&config.output_dir, probe)?;
    ensure_destination(&dir)?;
    write_metadata_snapshot(&dir, probe)?;

    if config.metadata_only {
        return Ok(Outcome::MetadataOnly { dir });
    }

    if !config.cover_only && has_chapter_output(&dir, input)? {
        log::debug!("Already processed {}", input.display());
        return Ok(Outcome::AlreadyProcessed { dir });
    }

    match extract_cover(&tools.ffmpeg, config, input, &dir) {
        Ok(cover) => log::debug!("Cover image for {}: {:?}", input.display(), cover),
        Err(e) => log::debug!("No cover image extracted from {}: {}", input.display(), e),
    }

    if config.cover_only {
        return Ok(Outcome::CoverOnly { dir });
    }

    if config.decrypt_only {
        let output = decrypt(&tools.ffmpeg, config, input, &dir)?;
        return Ok(if config.dry_run {
            Outcome::DryRun { dir }
        } else {
            Outcome::Decrypted { output }
        });
    }

    let output = transcode(&tools.ffmpeg, config, input, &dir, probe)?;

    if config.single_file {
        return Ok(if config.dry_run {
            Outcome::DryRun { dir }
        } else {
            Outcome::Transcoded { output }
        });
    }

    match split_file(&tools.splitter, config, &dir, &output, probe)? {
        SplitOutcome::Split { chapters } => Ok(Outcome::Split { dir, chapters }),
        SplitOutcome::DryRun => Ok(Outcome::DryRun { dir }),
    }
}
