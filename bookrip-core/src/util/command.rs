//! Helpers for running external commands from argument vectors.
//!
//! Nothing here goes through a shell. `format_args_for_display` only exists so
//! commands can be logged or shown in dry-run mode.

use std::ffi::OsStr;
use std::process::{Command, Output};

use crate::error::{CoreResult, command_failed_error, command_start_error};

/// Renders a program and its arguments as a single line.
///
/// Arguments containing whitespace or quotes are wrapped in single quotes so
/// the line stays readable; the result is for display only.
pub fn format_args_for_display<I, S>(program: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = program.to_string();
    for arg in args {
        let arg = arg.as_ref().to_string_lossy();
        line.push(' ');
        if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
            line.push('\'');
            line.push_str(&arg.replace('\'', r"'\''"));
            line.push('\'');
        } else {
            line.push_str(&arg);
        }
    }
    line
}

/// Renders a `std::process::Command` for logging.
pub fn format_command(cmd: &Command) -> String {
    format_args_for_display(&cmd.get_program().to_string_lossy(), cmd.get_args())
}

/// Runs a command to completion and returns its output.
///
/// A non-zero exit status becomes `CoreError::CommandFailed` carrying stderr.
pub fn run_command(cmd: &mut Command, label: &str) -> CoreResult<Output> {
    log::debug!("Running {}: {}", label, format_command(cmd));

    let output = cmd.output().map_err(|e| {
        log::error!("Failed to execute {}: {}", label, e);
        command_start_error(label, e)
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        log::debug!("{} failed with {}: {}", label, output.status, stderr);
        return Err(command_failed_error(label, output.status, stderr));
    }

    Ok(output)
}
