//! Audiobook metadata probing.
//!
//! ffprobe is asked for chapters, programs and format information as JSON. The
//! text is cleaned before parsing: "(Abridged)"/"(Unabridged)" markers are
//! removed and whitespace runs collapsed, otherwise chapter titles come back as
//! near-duplicates that differ only in those details.
//!
//! The parsed document is kept verbatim for the metadata snapshot; the typed
//! view below only covers the fields the pipeline reads.

use crate::error::{CoreError, CoreResult};
use crate::external::FfprobeExecutor;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

static EDITION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[(](Una|A)bridged[)]").expect("valid regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Book-level tags from `format.tags`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BookTags {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub date: Option<String>,
    pub genre: Option<String>,
    pub copyright: Option<String>,
    #[serde(deserialize_with = "optional_number")]
    pub bit_rate: Option<f64>,
}

/// The `format` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormatInfo {
    #[serde(deserialize_with = "optional_number")]
    pub bit_rate: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub duration: Option<f64>,
    pub tags: BookTags,
}

/// Tags attached to one chapter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChapterTags {
    pub title: Option<String>,
}

/// One chapter with its boundaries in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chapter {
    #[serde(deserialize_with = "number")]
    pub start_time: f64,
    #[serde(deserialize_with = "number")]
    pub end_time: f64,
    #[serde(default)]
    pub tags: ChapterTags,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProbeView {
    format: FormatInfo,
    chapters: Vec<Chapter>,
}

/// Parsed ffprobe output for one book.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    raw: Value,
    pub format: FormatInfo,
    pub chapters: Vec<Chapter>,
}

impl ProbeResult {
    /// Parses already-cleaned ffprobe JSON.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        let raw: Value = serde_json::from_str(text)?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> CoreResult<Self> {
        let view: ProbeView = serde_json::from_value(raw.clone())?;
        Ok(Self {
            raw,
            format: view.format,
            chapters: view.chapters,
        })
    }

    /// The complete document as ffprobe produced it (after cleanup).
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn tags(&self) -> &BookTags {
        &self.format.tags
    }

    pub fn artist(&self) -> CoreResult<&str> {
        required(self.format.tags.artist.as_deref(), "artist")
    }

    pub fn title(&self) -> CoreResult<&str> {
        required(self.format.tags.title.as_deref(), "title")
    }

    /// Source bit rate in bits per second.
    ///
    /// ffprobe reports it on `format`; a `bit_rate` tag is used as fallback.
    pub fn bit_rate(&self) -> CoreResult<u64> {
        self.format
            .bit_rate
            .or(self.format.tags.bit_rate)
            .filter(|rate| *rate > 0.0)
            .map(|rate| rate.round() as u64)
            .ok_or_else(|| CoreError::MissingMetadata("format.bit_rate".to_string()))
    }

    pub fn chapter_titles(&self) -> Vec<&str> {
        self.chapters
            .iter()
            .map(|c| c.tags.title.as_deref().unwrap_or_default())
            .collect()
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> CoreResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CoreError::MissingMetadata(format!("format.tags.{field}")))
}

fn parse_number<E: serde::de::Error>(value: &Value) -> Result<Option<f64>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() || s.trim() == "N/A" => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| E::custom(format!("invalid number '{s}': {e}"))),
        other => Err(E::custom(format!("expected a number, found {other}"))),
    }
}

// ffprobe prints numbers as strings ("600.000000"); accept both forms.
fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    parse_number::<D::Error>(&value)?.ok_or_else(|| serde::de::Error::custom("missing number"))
}

fn optional_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    parse_number(&value)
}

/// Removes edition markers and collapses whitespace in raw ffprobe output.
pub fn clean_probe_output(raw: &str) -> String {
    let without_markers = EDITION_MARKER.replace_all(raw, "");
    WHITESPACE_RUN.replace_all(&without_markers, " ").into_owned()
}

/// Probes an input file and parses the result.
pub fn probe_metadata<P: FfprobeExecutor>(
    ffprobe: &P,
    input: &Path,
    authcode: &str,
) -> CoreResult<ProbeResult> {
    if !input.exists() {
        return Err(CoreError::InputNotFound(input.display().to_string()));
    }

    log::debug!("Probing metadata for {}", input.display());
    let raw = ffprobe.probe_json(input, authcode)?;
    let probe = ProbeResult::from_json(&clean_probe_output(&raw))?;
    log::debug!(
        "{}: {} chapter(s), {:.0}s, title {:?}",
        input.display(),
        probe.chapters.len(),
        probe.format.duration.unwrap_or_default(),
        probe.format.tags.title
    );
    log::trace!("Chapter titles: {:?}", probe.chapter_titles());
    Ok(probe)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "programs": [],
        "chapters": [
            {
                "id": 0,
                "time_base": "1/1000",
                "start": 0,
                "start_time": "0.000000",
                "end": 600000,
                "end_time": "600.000000",
                "tags": { "title": "Chapter 1" }
            },
            {
                "id": 1,
                "time_base": "1/1000",
                "start": 600000,
                "start_time": "600.000000",
                "end": 1200000,
                "end_time": "1200.000000",
                "tags": { "title": "Chapter 2" }
            }
        ],
        "format": {
            "filename": "book.aax",
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "1200.000000",
            "bit_rate": "64000",
            "tags": {
                "artist": "A",
                "title": "B  (Unabridged)",
                "album": "B",
                "album_artist": "A",
                "date": "2020",
                "genre": "Audiobook",
                "copyright": "(c) 2020"
            }
        }
    }"#;

    #[test]
    fn test_clean_probe_output_strips_markers() {
        assert_eq!(clean_probe_output("Dune (Unabridged)"), "Dune");
        assert_eq!(clean_probe_output("Dune   (Abridged)"), "Dune");
        assert_eq!(clean_probe_output("Dune (Dramatized)"), "Dune (Dramatized)");
    }

    #[test]
    fn test_clean_probe_output_collapses_whitespace() {
        assert_eq!(clean_probe_output("a \n\t  b"), "a b");
        assert_eq!(clean_probe_output("{\n    \"k\": 1\n}"), "{ \"k\": 1 }");
    }

    #[test]
    fn test_parse_sample() {
        let probe = ProbeResult::from_json(&clean_probe_output(SAMPLE)).unwrap();
        assert_eq!(probe.artist().unwrap(), "A");
        assert_eq!(probe.title().unwrap(), "B");
        assert_eq!(probe.bit_rate().unwrap(), 64000);
        assert_eq!(probe.format.duration, Some(1200.0));
        assert_eq!(probe.chapters.len(), 2);
        assert_eq!(probe.chapters[1].start_time, 600.0);
        assert_eq!(probe.chapters[1].end_time, 1200.0);
        assert_eq!(probe.chapter_titles(), vec!["Chapter 1", "Chapter 2"]);
    }

    #[test]
    fn test_raw_document_is_retained() {
        let probe = ProbeResult::from_json(SAMPLE).unwrap();
        assert_eq!(probe.raw()["chapters"][0]["time_base"], "1/1000");
        assert_eq!(probe.raw()["format"]["format_name"], "mov,mp4,m4a,3gp,3g2,mj2");
        assert!(probe.raw()["programs"].is_array());
    }

    #[test]
    fn test_numeric_fields_accept_numbers() {
        let json = r#"{"format": {"bit_rate": 32000, "tags": {}},
                       "chapters": [{"start_time": 0, "end_time": 12.5}]}"#;
        let probe = ProbeResult::from_json(json).unwrap();
        assert_eq!(probe.bit_rate().unwrap(), 32000);
        assert_eq!(probe.chapters[0].end_time, 12.5);
        assert_eq!(probe.chapter_titles(), vec![""]);
    }

    #[test]
    fn test_bit_rate_falls_back_to_tag() {
        let json = r#"{"format": {"tags": {"bit_rate": "128000"}}}"#;
        let probe = ProbeResult::from_json(json).unwrap();
        assert_eq!(probe.bit_rate().unwrap(), 128000);
    }

    #[test]
    fn test_missing_fields() {
        let probe = ProbeResult::from_json(r#"{"format": {"tags": {"title": "B"}}}"#).unwrap();
        assert!(matches!(probe.artist(), Err(CoreError::MissingMetadata(f)) if f == "format.tags.artist"));
        assert!(matches!(probe.bit_rate(), Err(CoreError::MissingMetadata(_))));
        assert!(probe.chapters.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(ProbeResult::from_json("not json"), Err(CoreError::JsonParse(_))));
    }

    struct FixedProbe(&'static str);

    impl FfprobeExecutor for FixedProbe {
        fn probe_json(&self, _input: &Path, _authcode: &str) -> CoreResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_probe_metadata_missing_input() {
        let result = probe_metadata(&FixedProbe(SAMPLE), Path::new("surely/not/here.aax"), "code");
        assert!(matches!(result, Err(CoreError::InputNotFound(_))));
    }

    #[test]
    fn test_probe_metadata_cleans_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.aax");
        std::fs::write(&input, b"aax").unwrap();
        let probe = probe_metadata(&FixedProbe(SAMPLE), &input, "code").unwrap();
        assert_eq!(probe.title().unwrap(), "B");
        assert_eq!(probe.raw()["format"]["tags"]["title"], "B");
    }
}
