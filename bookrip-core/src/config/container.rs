//! Output codec/container table.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Target container for the transcoded audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Container {
    /// MP3 re-encoded with LAME; the only container mp3splt can split.
    #[default]
    Mp3,
    /// The source AAC stream copied into an .m4a file.
    Aac,
}

impl Container {
    pub const ALL: [Container; 2] = [Container::Mp3, Container::Aac];

    /// Name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Container::Mp3 => "mp3",
            Container::Aac => "aac",
        }
    }

    /// ffmpeg audio codec argument.
    pub fn codec(self) -> &'static str {
        match self {
            Container::Mp3 => "libmp3lame",
            Container::Aac => "copy",
        }
    }

    /// Extension of the transcoded file.
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mp3 => "mp3",
            Container::Aac => "m4a",
        }
    }

    pub fn is_splittable(self) -> bool {
        matches!(self, Container::Mp3)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Container {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Container::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::Config(format!("unknown output format '{s}'")))
    }
}
