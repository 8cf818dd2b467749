//! Stage export.
//!
//! Serialises conversation sections ("stages") to flat text files. The
//! navigation core only requests exports; the writing happens here, driven
//! by the shell.

use crate::model::Entry;
use crate::view_state::section::{build_sections, Section};
use chrono::SecondsFormat;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const MAX_SLUG_LEN: usize = 40;

/// Errors writing stage files.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export directory could not be created.
    #[error("Cannot create export directory {}: {source}", path.display())]
    CreateDir {
        /// Directory being created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A stage file could not be written.
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Read-only view of one entry sequence's sections.
pub trait SectionAccess {
    /// Sections in order.
    fn sections(&self) -> &[Section];

    /// Entries `start..=end`, clamped to the sequence.
    fn entries_in_range(&self, start: usize, end: usize) -> &[Entry];
}

/// [`SectionAccess`] over an entry slice.
#[derive(Debug)]
pub struct ViewSections<'a> {
    entries: &'a [Entry],
    sections: Vec<Section>,
}

impl<'a> ViewSections<'a> {
    /// Compute sections for `entries`.
    pub fn new(entries: &'a [Entry]) -> Self {
        Self {
            entries,
            sections: build_sections(entries),
        }
    }
}

impl SectionAccess for ViewSections<'_> {
    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn entries_in_range(&self, start: usize, end: usize) -> &[Entry] {
        if self.entries.is_empty() || start > end {
            return &[];
        }
        let end = end.min(self.entries.len() - 1);
        self.entries.get(start..=end).unwrap_or(&[])
    }
}

/// Lowercase alphanumeric runs of `title` joined by `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for word in title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if slug.len() + word.len() + 1 > MAX_SLUG_LEN && !slug.is_empty() {
            break;
        }
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&word.to_ascii_lowercase());
    }
    slug.truncate(MAX_SLUG_LEN);
    if slug.is_empty() {
        slug.push_str("stage");
    }
    slug
}

/// `stage-NN-slug.txt`, numbered from 1.
pub fn stage_file_name(section: &Section) -> String {
    format!("stage-{:02}-{}.txt", section.id + 1, slugify(&section.title))
}

/// Text of one stage file.
pub fn format_stage(section: &Section, entries: &[Entry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Stage {:02}: {}", section.id + 1, section.title);
    let _ = writeln!(
        out,
        "Entries {}-{} ({})",
        section.start_index,
        section.end_index,
        section.len()
    );

    for entry in entries {
        let when = entry
            .timestamp
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "unknown".to_string());
        out.push('\n');
        let _ = writeln!(out, "[{} {when}] {}", entry.kind.label(), entry.id);
        if !entry.body.is_empty() {
            out.push_str(&entry.body);
            out.push('\n');
        }
    }
    out
}

/// Write one section to `dir`, returning the file path.
///
/// # Errors
///
/// Returns `ExportError::CreateDir` or `ExportError::Write` on I/O failure.
pub fn export_section(
    dir: &Path,
    access: &impl SectionAccess,
    section: &Section,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(stage_file_name(section));
    let entries = access.entries_in_range(section.start_index, section.end_index);
    std::fs::write(&path, format_stage(section, entries)).map_err(|source| {
        ExportError::Write {
            path: path.clone(),
            source,
        }
    })?;

    info!(path = %path.display(), entries = entries.len(), "Exported stage");
    Ok(path)
}

/// Write every section to `dir`.
///
/// # Errors
///
/// Stops at the first failing write.
pub fn export_all(dir: &Path, access: &impl SectionAccess) -> Result<Vec<PathBuf>, ExportError> {
    access
        .sections()
        .iter()
        .map(|section| export_section(dir, access, section))
        .collect()
}
