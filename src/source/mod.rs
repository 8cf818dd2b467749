//! Entry sources.
//!
//! An [`EntrySource`] hands the navigation core two immutable entry
//! sequences: the clean view and, when available, the raw transcript.
//! [`Transcript`] is the JSONL-backed implementation.

pub mod clean;

use crate::model::error::InputError;
use crate::model::Entry;
use crate::parser::{parse_line, ParsedEntry};
use crate::state::ViewMode;
use std::path::Path;
use tracing::{info, warn};

pub use clean::derive_clean;

/// Provider of entry sequences for both views.
///
/// Both slices are fixed for the life of the source.
pub trait EntrySource {
    /// Entries shown in `view_mode`.
    fn active_entries(&self, view_mode: ViewMode) -> &[Entry];

    /// The raw transcript. Empty when the source has no raw view.
    fn raw_entries(&self) -> &[Entry];
}

/// Line accounting from one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Non-blank lines read.
    pub lines: usize,
    /// Lines skipped as malformed.
    pub skipped: usize,
}

/// A loaded conversation with clean and raw views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    clean: Vec<Entry>,
    raw: Vec<Entry>,
}

impl Transcript {
    /// Build from explicit sequences.
    pub fn new(clean: Vec<Entry>, raw: Vec<Entry>) -> Self {
        Self { clean, raw }
    }

    /// A transcript with no raw view.
    pub fn clean_only(clean: Vec<Entry>) -> Self {
        Self::new(clean, Vec::new())
    }

    /// Build from parsed raw entries, deriving the clean view.
    pub fn from_parsed(parsed: Vec<ParsedEntry>) -> Self {
        let clean = derive_clean(&parsed);
        let raw = parsed.into_iter().map(|p| p.entry).collect();
        Self { clean, raw }
    }

    /// Parse JSONL text. Malformed lines are logged and skipped.
    pub fn parse_str(content: &str) -> (Self, LoadStats) {
        let mut stats = LoadStats::default();
        let mut parsed = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            stats.lines += 1;
            match parse_line(line, index + 1) {
                Ok(entries) => parsed.extend(entries),
                Err(err) => {
                    stats.skipped += 1;
                    warn!(error = %err, "Skipping malformed transcript line");
                }
            }
        }

        (Self::from_parsed(parsed), stats)
    }

    /// Read and parse a transcript file.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the path does not exist and
    /// `InputError::Io` for any other read failure.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, LoadStats), InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (transcript, stats) = Self::parse_str(&content);

        info!(
            path = %path.display(),
            lines = stats.lines,
            skipped = stats.skipped,
            clean = transcript.clean.len(),
            raw = transcript.raw.len(),
            "Transcript loaded"
        );
        Ok((transcript, stats))
    }
}

impl EntrySource for Transcript {
    fn active_entries(&self, view_mode: ViewMode) -> &[Entry] {
        match view_mode {
            ViewMode::Clean => &self.clean,
            ViewMode::Raw => &self.raw,
        }
    }

    fn raw_entries(&self) -> &[Entry] {
        &self.raw
    }
}
