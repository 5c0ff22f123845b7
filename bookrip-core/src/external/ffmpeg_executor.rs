// ============================================================================
// bookrip-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. Cover extraction, transcoding and decryption all go through the
// FfmpegSpawner trait so the pipeline can be driven by a mock in tests.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - run_ffmpeg: spawn, drain events, wait, check the exit status

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use crate::util::format_args_for_display;
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::process::ExitStatus;

/// Logging arguments shared by every ffmpeg invocation.
///
/// `level+` keeps ffmpeg's `[error]` line prefix, which is how sidecar tells
/// error lines apart from everything else.
pub const FFMPEG_LOG_ARGS: [&str; 3] = ["-loglevel", "level+error", "-stats"];

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
///
/// Spawners are shared across worker threads, hence `Sync`.
pub trait FfmpegSpawner: Sync {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error("ffmpeg (sidecar - get iter)", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

/// Renders an ffmpeg command line for logging and dry runs.
pub fn describe_ffmpeg_command(cmd: &mut FfmpegCommand) -> String {
    format_args_for_display("ffmpeg", cmd.as_inner().get_args())
}

/// Runs an ffmpeg command to completion.
///
/// Events are drained while the process runs so its pipes never fill up.
/// Error lines are collected and attached to the error on a non-zero exit.
pub fn run_ffmpeg<S: FfmpegSpawner>(spawner: &S, cmd: FfmpegCommand, label: &str) -> CoreResult<()> {
    let mut process = spawner.spawn(cmd)?;

    let mut errors: Vec<String> = Vec::new();
    let mut unlabelled: Vec<String> = Vec::new();
    process.handle_events(|event| {
        match event {
            FfmpegEvent::Progress(progress) => {
                log::trace!("{} progress: time={} speed={}x", label, progress.time, progress.speed);
            }
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) | FfmpegEvent::Error(line) => {
                log::debug!("{}: {}", label, line);
                errors.push(line);
            }
            FfmpegEvent::Log(LogLevel::Unknown, line) => {
                log::trace!("{}: {}", label, line);
                unlabelled.push(line);
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        // Without a level prefix the error text arrives as unknown lines.
        let detail = if errors.is_empty() { unlabelled } else { errors };
        return Err(command_failed_error(label, status, detail.join("\n")));
    }
    Ok(())
}
