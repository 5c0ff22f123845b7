//! Conversion pipeline and batch dispatch.
//!
//! This module organizes the pipeline stages into submodules and exposes
//! `process_books`, which runs every input either sequentially or on a
//! fixed-size worker pool.

/// Cover art extraction
pub mod cover;

/// Per-book orchestration of all stages
pub mod pipeline;

/// Chapter splitting
pub mod split;

/// Decryption and transcoding
pub mod transcode;

pub use cover::{CoverOutcome, extract_cover};
pub use pipeline::{Outcome, convert_book, process_book};
pub use split::{SplitOutcome, numfix, split_file, split_points};
pub use transcode::{decrypt, transcode};

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor, SplitExecutor, Toolchain};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Result of processing one input file.
#[derive(Debug)]
pub struct BookReport {
    pub input: PathBuf,
    pub duration: Duration,
    pub result: CoreResult<Outcome>,
}

impl BookReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Processes every input and returns one report per file, in input order.
///
/// With fewer than two workers the files are handled one after another.
/// Otherwise a pool of exactly `config.workers` threads is used and each task
/// handles a single file. A failure is recorded in that file's report and
/// never stops the batch.
pub fn process_books<F, P, S>(
    tools: &Toolchain<F, P, S>,
    config: &CoreConfig,
    inputs: &[PathBuf],
) -> CoreResult<Vec<BookReport>>
where
    F: FfmpegSpawner,
    P: FfprobeExecutor,
    S: SplitExecutor,
{
    config.validate()?;

    if config.workers < 2 || inputs.len() < 2 {
        return Ok(inputs
            .iter()
            .map(|input| run_one(tools, config, input))
            .collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("bookrip-worker-{i}"))
        .build()
        .map_err(|e| CoreError::Config(format!("failed to start worker pool: {e}")))?;

    log::debug!("Processing {} file(s) on {} workers", inputs.len(), config.workers);
    Ok(pool.install(|| {
        inputs
            .par_iter()
            .with_max_len(1)
            .map(|input| run_one(tools, config, input))
            .collect()
    }))
}

fn run_one<F, P, S>(tools: &Toolchain<F, P, S>, config: &CoreConfig, input: &Path) -> BookReport
where
    F: FfmpegSpawner,
    P: FfprobeExecutor,
    S: SplitExecutor,
{
    log::info!("Processing: {}", input.display());
    let started = Instant::now();
    let result = process_book(tools, config, input);
    let duration = started.elapsed();

    match &result {
        Ok(outcome) => log::info!("{}: {}", input.display(), outcome),
        Err(e) => log::error!("{}: {}", input.display(), e),
    }

    BookReport {
        input: input.to_path_buf(),
        duration,
        result,
    }
}
