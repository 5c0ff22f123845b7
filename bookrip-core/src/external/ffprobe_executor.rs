//! FFprobe integration for audiobook metadata extraction.
//!
//! The `ffprobe` crate cannot pass `-activation_bytes` or request chapters, so
//! the prober is invoked directly and its raw JSON returned to the caller.

use crate::error::CoreResult;
use crate::util::run_command;

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Executes ffprobe and returns its JSON output as text.
pub trait FfprobeExecutor: Sync {
    fn probe_json(&self, input: &Path, authcode: &str) -> CoreResult<String>;
}

/// Builds the ffprobe argument vector for a chapter/program/format probe.
pub fn ffprobe_args(input: &Path, authcode: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-activation_bytes", authcode, "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_os_string());
    args.extend(
        ["-of", "json", "-show_chapters", "-show_programs", "-show_format"]
            .iter()
            .map(OsString::from),
    );
    args
}

/// Runs the `ffprobe` found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct CommandFfprobeExecutor;

impl FfprobeExecutor for CommandFfprobeExecutor {
    fn probe_json(&self, input: &Path, authcode: &str) -> CoreResult<String> {
        let mut cmd = Command::new("ffprobe");
        cmd.args(ffprobe_args(input, authcode));
        let output = run_command(&mut cmd, "ffprobe")?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
