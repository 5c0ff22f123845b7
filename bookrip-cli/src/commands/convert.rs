//! Implementation of the book conversion command.
//!
//! This module resolves the authorization code, checks that the external
//! programs are installed, builds the core configuration and hands the input
//! files to the bookrip-core pipeline.

use crate::cli::Cli;
use crate::error::{CliResult, report_error};
use crate::logging::get_timestamp;

use bookrip_core::config::{
    CoreConfig, MONO_OUTPUT_SUFFIX, default_authcode_files, resolve_authcode,
};
use bookrip_core::external::{FfmpegSpawner, FfprobeExecutor, SplitExecutor, Toolchain};
use bookrip_core::{BookReport, CoreError, SystemToolchain, missing_dependencies, process_books};

use log::{error, info};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Output directory, with the mono suffix appended when downmixing.
pub fn effective_output_dir(output_dir: &Path, mono: bool) -> PathBuf {
    if !mono {
        return output_dir.to_path_buf();
    }
    let mut dir = output_dir.as_os_str().to_os_string();
    dir.push(MONO_OUTPUT_SUFFIX);
    PathBuf::from(dir)
}

/// Creates the core configuration from parsed arguments and a resolved code.
pub fn create_core_config(args: &Cli, authcode: String) -> CoreConfig {
    let mut config = CoreConfig::new(authcode, effective_output_dir(&args.output_dir, args.mono));
    config.container = args.format.into();
    config.mono = args.mono;
    config.overwrite = args.clobber;
    config.single_file = args.single;
    config.decrypt_only = args.decrypt;
    config.cover_only = args.cover_image;
    config.metadata_only = args.extract_metadata;
    config.workers = args.processes;
    config.verbose = args.verbose;
    config.dry_run = args.test;
    config
}

/// Fails with the complete list of missing programs, if any.
fn check_dependencies() -> CliResult<()> {
    let missing = missing_dependencies();
    if missing.is_empty() {
        return Ok(());
    }
    for name in &missing {
        error!("{} not found on PATH", name);
    }
    Err(CoreError::DependencyNotFound(missing.join(", ")))
}

/// Checks both prerequisites so a single run reports every missing one.
///
/// When both fail the authorization error is printed here and the dependency
/// error is returned.
fn check_prerequisites(args: &Cli) -> CliResult<String> {
    let authcode = resolve_authcode(args.authcode.as_deref(), &default_authcode_files());
    let dependencies = check_dependencies();
    match (authcode, dependencies) {
        (Ok(code), Ok(())) => Ok(code),
        (Err(e), Ok(())) | (Ok(_), Err(e)) => Err(e),
        (Err(auth), Err(deps)) => {
            report_error(&auth);
            Err(deps)
        }
    }
}

/// Entry point for the command: prerequisites, then the batch.
///
/// Returns an error only for problems that stop the whole run. Books that
/// fail individually are reported in the summary.
pub fn run_convert(args: Cli) -> CliResult<Vec<BookReport>> {
    let authcode = check_prerequisites(&args)?;

    let config = create_core_config(&args, authcode);
    convert_books(&SystemToolchain::system(), &config, &args.inputs)
}

/// Runs the batch on the given toolchain and prints a summary.
pub fn convert_books<F, P, S>(
    tools: &Toolchain<F, P, S>,
    config: &CoreConfig,
    inputs: &[PathBuf],
) -> CliResult<Vec<BookReport>>
where
    F: FfmpegSpawner,
    P: FfprobeExecutor,
    S: SplitExecutor,
{
    info!("Started at {}", get_timestamp());
    info!(
        "Converting {} file(s) to {} in {}",
        inputs.len(),
        config.container,
        config.output_dir.display()
    );

    let started = Instant::now();
    let reports = process_books(tools, config, inputs)?;
    print_summary(&reports);

    info!(
        "Finished at {} after {:.1}s",
        get_timestamp(),
        started.elapsed().as_secs_f64()
    );
    Ok(reports)
}

fn print_summary(reports: &[BookReport]) {
    let failed = reports.iter().filter(|r| !r.is_success()).count();
    for report in reports {
        match &report.result {
            Ok(outcome) => println!(
                "{} {} ({:.1}s): {}",
                "OK".green().bold(),
                report.input.display(),
                report.duration.as_secs_f64(),
                outcome
            ),
            Err(e) => println!("{} {}: {}", "FAILED".red().bold(), report.input.display(), e),
        }
    }
    println!(
        "{} converted, {} failed",
        reports.len() - failed,
        failed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookrip_core::Container;
    use clap::Parser;

    #[test]
    fn test_effective_output_dir() {
        assert_eq!(effective_output_dir(Path::new("Audiobooks"), false), PathBuf::from("Audiobooks"));
        assert_eq!(effective_output_dir(Path::new("Audiobooks"), true), PathBuf::from("Audiobooks-mono"));
        assert_eq!(effective_output_dir(Path::new("/x/books"), true), PathBuf::from("/x/books-mono"));
    }

    #[test]
    fn test_create_core_config_maps_flags() {
        let args = Cli::try_parse_from([
            "bookrip", "-f", "aac", "-m", "-s", "-c", "-t", "-p", "3", "-x", "book.aax",
        ])
        .unwrap();
        let config = create_core_config(&args, "deadbeef".to_string());
        assert_eq!(config.authcode, "deadbeef");
        assert_eq!(config.container, Container::Aac);
        assert_eq!(config.output_dir, PathBuf::from("Audiobooks-mono"));
        assert!(config.mono && config.single_file && config.overwrite && config.dry_run);
        assert!(config.metadata_only && !config.cover_only && !config.decrypt_only);
        assert_eq!(config.workers, 3);
        assert!(config.validate().is_ok());
    }
}
