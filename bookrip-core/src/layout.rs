//! Destination directory layout.
//!
//! Each book lands in `output_dir/artist/title`, sanitized as one path. The
//! directory holds `metadata.json`, an optional `cover.jpg`, the whole-book
//! transcode until it is split, and the `Chapter NN` files afterwards.

use crate::config::{COVER_FILENAME, METADATA_FILENAME};
use crate::error::CoreResult;
use crate::media::ProbeResult;
use crate::sanitize::sanitize;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// File names the chapter splitter produces: `Chapter NN.ext`.
static CHAPTER_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Chapter \d+\.[[:alnum:]]+$").expect("valid regex"));

/// Computes the destination directory for a book.
///
/// A `/` inside the title would otherwise create an extra directory level, so
/// it becomes `-` before the path is sanitized.
pub fn destination_dir(output_dir: &Path, probe: &ProbeResult) -> CoreResult<PathBuf> {
    let artist = probe.artist()?;
    let title = probe.title()?.replace('/', "-");
    let joined = output_dir.join(artist).join(title);
    Ok(PathBuf::from(sanitize(&joined.to_string_lossy())))
}

/// Creates the destination directory if needed.
pub fn ensure_destination(dir: &Path) -> CoreResult<()> {
    if !dir.is_dir() {
        log::debug!("Creating destination directory {}", dir.display());
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Path of the cover image inside a destination directory.
pub fn cover_path(dir: &Path) -> PathBuf {
    dir.join(COVER_FILENAME)
}

/// Path of the metadata snapshot inside a destination directory.
pub fn metadata_path(dir: &Path) -> PathBuf {
    dir.join(METADATA_FILENAME)
}

/// Whether a file name looks like splitter output.
pub fn is_chapter_file(name: &str) -> bool {
    CHAPTER_FILE.is_match(name)
}

/// Whether the splitter has already written chapter files here.
///
/// Files sharing the source's stem are the book's own transcode, not split
/// output, even when the source itself is called `Chapter 1`.
pub fn has_chapter_output(dir: &Path, source: &Path) -> CoreResult<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    let source_stem = source.file_stem();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.file_stem() == source_stem {
            continue;
        }
        if path
            .file_name()
            .is_some_and(|name| is_chapter_file(&name.to_string_lossy()))
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Lists chapter files in a destination directory, sorted by name.
pub fn chapter_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .is_some_and(|name| is_chapter_file(&name.to_string_lossy()))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Writes the probe result to `metadata.json`.
///
/// Output is pretty-printed with four-space indentation and sorted keys.
pub fn write_metadata_snapshot(dir: &Path, probe: &ProbeResult) -> CoreResult<PathBuf> {
    let path = metadata_path(dir);
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    probe.raw().serialize(&mut serializer)?;
    buf.push(b'\n');
    fs::write(&path, buf)?;
    log::debug!("Wrote metadata snapshot {}", path.display());
    Ok(path)
}
