//! mp3splt invocation.

use crate::error::{CoreResult, command_start_error};
use crate::util::format_command;

use std::ffi::OsString;
use std::process::{Command, Output};

/// Executes the chapter splitter with a prepared argument vector.
///
/// The exit status is returned as-is; deciding what a failure means is left
/// to the caller.
pub trait SplitExecutor: Sync {
    fn split(&self, args: &[OsString]) -> CoreResult<Output>;
}

/// Runs the `mp3splt` found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct Mp3spltExecutor;

impl SplitExecutor for Mp3spltExecutor {
    fn split(&self, args: &[OsString]) -> CoreResult<Output> {
        let mut cmd = Command::new("mp3splt");
        cmd.args(args);
        log::debug!("Running mp3splt: {}", format_command(&cmd));

        let output = cmd.output().map_err(|e| command_start_error("mp3splt", e))?;
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            log::trace!("mp3splt: {}", line);
        }
        Ok(output)
    }
}
