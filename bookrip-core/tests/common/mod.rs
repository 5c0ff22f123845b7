// bookrip-core/tests/common/mod.rs

// --- Mocking Infrastructure (for integration tests) ---
//
// The mocks record every invocation and create the files the real programs
// would have written, so the pipeline's filesystem effects can be checked
// without ffmpeg, ffprobe or mp3splt installed.

#![allow(dead_code)]

use bookrip_core::error::{CoreError, CoreResult};
use bookrip_core::external::{FfmpegProcess, FfmpegSpawner, FfprobeExecutor, SplitExecutor, Toolchain};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

/// Raw wait status for a normal exit with `code`.
pub fn exit_status(code: i32) -> ExitStatus {
    ExitStatus::from_raw(code << 8)
}

// --- ffmpeg ---

/// Mock implementation of FfmpegProcess.
pub struct MockFfmpegProcess {
    events: Vec<FfmpegEvent>,
    exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events.drain(..) {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Mock FfmpegSpawner.
///
/// Every command "succeeds" and creates its output file (the last argument),
/// except commands containing one of the registered failure patterns: those
/// leave a partial output behind and exit with status 1. Like ffmpeg, a
/// command carrying `-n` refuses to replace an existing output.
#[derive(Default)]
pub struct MockFfmpegSpawner {
    received_calls: Mutex<Vec<Vec<String>>>,
    failure_patterns: Mutex<Vec<String>>,
    no_cover: bool,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    /// Simulates books without embedded artwork.
    pub fn without_cover() -> Self {
        Self {
            no_cover: true,
            ..Default::default()
        }
    }

    pub fn fail_when(&self, arg_pattern: &str) {
        self.failure_patterns.lock().unwrap().push(arg_pattern.to_string());
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.lock().unwrap().clone()
    }

    /// Calls whose arguments contain `pattern`.
    pub fn calls_matching(&self, pattern: &str) -> Vec<Vec<String>> {
        self.get_received_calls()
            .into_iter()
            .filter(|args| args.iter().any(|a| a == pattern))
            .collect()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .as_inner()
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.lock().unwrap().push(args.clone());

        let output = PathBuf::from(args.last().cloned().unwrap_or_default());
        if args.iter().any(|a| a == "-n") && output.exists() {
            return Ok(MockFfmpegProcess {
                events: vec![FfmpegEvent::Log(LogLevel::Error, "File exists".to_string())],
                exit_status: exit_status(1),
            });
        }

        let is_cover = args.iter().any(|a| a == "-codec:v");
        let fails = self
            .failure_patterns
            .lock()
            .unwrap()
            .iter()
            .any(|p| args.iter().any(|a| a.contains(p.as_str())))
            || (is_cover && self.no_cover);

        if fails {
            if !is_cover {
                fs::write(&output, b"partial").unwrap();
            }
            return Ok(MockFfmpegProcess {
                events: vec![FfmpegEvent::Log(LogLevel::Error, "simulated failure".to_string())],
                exit_status: exit_status(1),
            });
        }

        fs::write(&output, b"dummy content").unwrap();
        Ok(MockFfmpegProcess {
            events: Vec::new(),
            exit_status: exit_status(0),
        })
    }
}

// --- ffprobe ---

/// Mock FfprobeExecutor returning canned JSON per input path.
#[derive(Default)]
pub struct MockFfprobeExecutor {
    results: Mutex<HashMap<PathBuf, String>>,
    received_calls: Mutex<Vec<PathBuf>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn expect_probe(&self, input: &Path, json: String) {
        self.results.lock().unwrap().insert(input.to_path_buf(), json);
    }

    pub fn call_count(&self) -> usize {
        self.received_calls.lock().unwrap().len()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn probe_json(&self, input: &Path, _authcode: &str) -> CoreResult<String> {
        self.received_calls.lock().unwrap().push(input.to_path_buf());
        self.results
            .lock()
            .unwrap()
            .get(input)
            .cloned()
            .ok_or_else(|| CoreError::JsonParse(format!("no probe result for {}", input.display())))
    }
}

// --- mp3splt ---

/// Mock SplitExecutor writing `Chapter NN.mp3` files into the `-d` directory.
///
/// The number of chapters is one less than the number of split points.
#[derive(Default)]
pub struct MockSplitter {
    received_calls: Mutex<Vec<Vec<String>>>,
    exit_code: i32,
}

impl MockSplitter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn failing(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Default::default()
        }
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.lock().unwrap().clone()
    }
}

impl SplitExecutor for MockSplitter {
    fn split(&self, args: &[OsString]) -> CoreResult<Output> {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        self.received_calls.lock().unwrap().push(args.clone());

        if self.exit_code != 0 {
            return Ok(Output {
                status: exit_status(self.exit_code),
                stdout: Vec::new(),
                stderr: b"simulated split failure".to_vec(),
            });
        }

        let dest = args
            .iter()
            .position(|a| a == "-d")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
            .expect("mp3splt args carry -d");
        // -T 12 -o NAME -g TAGS -d DIR SOURCE POINTS...
        let source_index = args.iter().position(|a| a == "-d").unwrap() + 2;
        let points = args.len().saturating_sub(source_index + 1);
        for n in 1..points {
            fs::write(dest.join(format!("Chapter {:02}.mp3", n)), b"chapter").unwrap();
        }
        Ok(Output {
            status: exit_status(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }
}

// --- helpers ---

pub type MockToolchain = Toolchain<MockFfmpegSpawner, MockFfprobeExecutor, MockSplitter>;

pub fn mock_toolchain() -> MockToolchain {
    Toolchain::new(MockFfmpegSpawner::new(), MockFfprobeExecutor::new(), MockSplitter::new())
}

/// ffprobe-style JSON: numbers as strings, chapters back to back.
pub fn probe_json(artist: &str, title: &str, starts: &[f64], end: f64) -> String {
    let chapters: Vec<String> = starts
        .iter()
        .enumerate()
        .map(|(i, start)| {
            let stop = starts.get(i + 1).copied().unwrap_or(end);
            format!(
                r#"{{"id": {i}, "time_base": "1/1000", "start_time": "{start:.6}", "end_time": "{stop:.6}",
                    "tags": {{"title": "Chapter  {} (Unabridged)"}}}}"#,
                i + 1
            )
        })
        .collect();
    format!(
        r#"{{
    "programs": [],
    "chapters": [{}],
    "format": {{
        "filename": "book.aax",
        "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
        "duration": "{end:.6}",
        "bit_rate": "64000",
        "tags": {{
            "artist": "{artist}",
            "title": "{title}",
            "album": "{title}",
            "album_artist": "{artist}",
            "date": "2020",
            "genre": "Audiobook",
            "copyright": "(c) 2020"
        }}
    }}
}}"#,
        chapters.join(",")
    )
}

/// Creates a placeholder source file.
pub fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, b"dummy content").expect("Failed to create dummy file");
    path
}
