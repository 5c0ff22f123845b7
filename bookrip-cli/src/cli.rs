// bookrip-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use bookrip_core::config::{AUTHCODE_ENV_VAR, Container, DEFAULT_OUTPUT_DIR, DEFAULT_WORKERS};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Bookrip: AAX audiobook converter",
    long_about = "Decrypts AAX audiobooks, transcodes them with ffmpeg and splits them into chapters with mp3splt."
)]
pub struct Cli {
    /// Authorization code (activation bytes). Falls back to ./.authcode and ~/.authcode
    #[arg(short = 'a', long, value_name = "CODE", env = AUTHCODE_ENV_VAR, hide_env_values = true)]
    pub authcode: Option<String>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = FormatArg::Mp3)]
    pub format: FormatArg,

    /// Root directory for converted books
    #[arg(short = 'o', long = "outputdir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Number of books converted concurrently
    #[arg(
        short = 'p',
        long = "processes",
        value_name = "N",
        default_value_t = DEFAULT_WORKERS,
        value_parser = parse_processes
    )]
    pub processes: usize,

    /// Overwrite existing cover images and transcodes
    #[arg(short = 'c', long)]
    pub clobber: bool,

    /// Only decrypt into an .m4b container, without re-encoding
    #[arg(short = 'd', long)]
    pub decrypt: bool,

    /// Only extract the cover image
    #[arg(short = 'i', long = "coverimage")]
    pub cover_image: bool,

    /// Downmix to mono; output goes to a "-mono" directory
    #[arg(short = 'm', long)]
    pub mono: bool,

    /// Keep one file per book instead of splitting into chapters
    #[arg(short = 's', long)]
    pub single: bool,

    /// Dry run: print the commands instead of running them
    #[arg(short = 't', long)]
    pub test: bool,

    /// Debug logging and transcoding times
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Only write metadata.json
    #[arg(short = 'x', long = "extract-metadata")]
    pub extract_metadata: bool,

    /// AAX files to convert
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,
}

fn parse_processes(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        Ok(_) => Err("must be at least 1".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Output formats accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Mp3,
    Aac,
}

impl From<FormatArg> for Container {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Mp3 => Container::Mp3,
            FormatArg::Aac => Container::Aac,
        }
    }
}
