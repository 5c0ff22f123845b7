//! Media metadata module
//!
//! Probing of source audiobooks through ffprobe and the data structures the
//! rest of the pipeline reads from the result.

pub mod probe;

// Re-export commonly used types
pub use probe::{
    BookTags, Chapter, ChapterTags, FormatInfo, ProbeResult, clean_probe_output, probe_metadata,
};
