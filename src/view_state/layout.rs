//! Display-line layout of an entry sequence.
//!
//! Produces a flat list of abstract display lines plus, for every entry,
//! the line where its rendering begins. Painting the lines is the
//! presentation layer's job.

use super::section::Section;
use super::wrap::wrap;
use crate::model::entry::truncate_chars;
use crate::model::{
    Entry, EntryKind, META_FILE_COUNT, META_INPUT_TOKENS, META_MODEL, META_OUTPUT_TOKENS,
    META_TOOL_NAME,
};
use crate::state::{LayoutMode, ViewState};
use serde_json::Value;

/// Prefix of wrapped body lines. Its width is taken off the wrap width.
pub const BODY_PREFIX: &str = "│ ";
/// Display width of [`BODY_PREFIX`].
pub const BODY_INDENT: usize = 2;
/// Prefix of metadata lines.
pub const META_PREFIX: &str = "  · ";

const ACTIVE_CURSOR: &str = "▶ ";
const IDLE_CURSOR: &str = "  ";
const SECTION_MARKER: &str = "━━";
const EXPANDED: &str = "▾";
const COLLAPSED: &str = "▸";
const MISSING_TIME: &str = "--:--:--";

/// Styling hint for a display line. Mapped to colors by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleHint {
    /// Default text.
    Normal,
    /// De-emphasized, used for metadata.
    Dim,
    /// Active entry label and the header of its section.
    Emphasis,
    /// Colored by the kind of entry the line belongs to.
    Role(EntryKind),
}

/// One line of laid-out text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// Text, already fitted to the content width.
    pub text: String,
    /// How the line should be painted.
    pub style: StyleHint,
}

impl DisplayLine {
    /// Create a line with the given style.
    pub fn new(text: impl Into<String>, style: StyleHint) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Empty separator line.
    pub fn blank() -> Self {
        Self::new(String::new(), StyleHint::Normal)
    }
}

/// Result of a layout pass.
///
/// # Invariants
/// - `entry_line_start.len()` equals the number of entries laid out
/// - `entry_line_start` is non-decreasing
/// - every value is a valid index into `lines` when `lines` is non-empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutResult {
    /// Every display line, top to bottom.
    pub lines: Vec<DisplayLine>,
    /// Line where each entry's rendering begins, indexed by entry.
    pub entry_line_start: Vec<usize>,
}

impl LayoutResult {
    /// Total number of display lines.
    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// First line of entry `index`, if it was laid out.
    pub fn line_of(&self, index: usize) -> Option<usize> {
        self.entry_line_start.get(index).copied()
    }
}

/// Lay out `entries` grouped by `sections` for the given view state.
///
/// Thread layout emits, per section, a header line, then the entries (or
/// only the checkpoint entry in checkpoint-only mode, or nothing when the
/// section is collapsed), then a blank separator. Entries of a collapsed
/// section start at its header line; in checkpoint-only mode the entries
/// after the checkpoint start at the checkpoint's label line. List layout
/// emits every entry with no headers.
pub fn layout(
    entries: &[Entry],
    sections: &[Section],
    state: &ViewState,
    content_width: usize,
) -> LayoutResult {
    let content_width = content_width.max(1);
    let mut out = LayoutResult {
        lines: Vec::new(),
        entry_line_start: vec![0; entries.len()],
    };

    match state.layout_mode {
        LayoutMode::List => {
            for (index, entry) in entries.iter().enumerate() {
                out.entry_line_start[index] = out.lines.len();
                render_entry(
                    entry,
                    index == state.active_index,
                    content_width,
                    &mut out.lines,
                );
            }
        }
        LayoutMode::Thread => {
            for section in sections {
                layout_section(entries, section, state, content_width, &mut out);
            }
        }
    }

    out
}

fn layout_section(
    entries: &[Entry],
    section: &Section,
    state: &ViewState,
    content_width: usize,
    out: &mut LayoutResult,
) {
    let header_line = out.lines.len();
    let collapsed = state.is_collapsed(section.id);
    out.lines.push(section_header(
        section,
        collapsed,
        section.contains(state.active_index),
        content_width,
    ));

    let end = section.end_index.min(entries.len().saturating_sub(1));
    for index in section.start_index..=end {
        out.entry_line_start[index] = header_line;
    }

    if !collapsed {
        if state.checkpoint_only {
            if let Some(cp) = section.checkpoint_index.filter(|&cp| cp <= end) {
                // Suppressed entries after the checkpoint share its label line.
                let label_line = out.lines.len();
                for index in cp..=end {
                    out.entry_line_start[index] = label_line;
                }
                render_entry(
                    &entries[cp],
                    cp == state.active_index,
                    content_width,
                    &mut out.lines,
                );
            }
        } else {
            for index in section.start_index..=end {
                out.entry_line_start[index] = out.lines.len();
                render_entry(
                    &entries[index],
                    index == state.active_index,
                    content_width,
                    &mut out.lines,
                );
            }
        }
    }

    out.lines.push(DisplayLine::blank());
}

fn section_header(
    section: &Section,
    collapsed: bool,
    holds_active: bool,
    content_width: usize,
) -> DisplayLine {
    let indicator = if collapsed { COLLAPSED } else { EXPANDED };
    let count = match section.len() {
        1 => "1 entry".to_string(),
        n => format!("{n} entries"),
    };
    let text = format!("{SECTION_MARKER} {indicator} {} · {count}", section.title);
    let style = if holds_active {
        StyleHint::Emphasis
    } else {
        StyleHint::Normal
    };
    DisplayLine::new(truncate_chars(&text, content_width), style)
}

/// Render one entry: label line, wrapped body lines, metadata lines.
fn render_entry(entry: &Entry, active: bool, content_width: usize, lines: &mut Vec<DisplayLine>) {
    let role = StyleHint::Role(entry.kind);
    lines.push(DisplayLine::new(
        truncate_chars(&label_text(entry, active), content_width),
        if active { StyleHint::Emphasis } else { role },
    ));

    for line in body_lines(&entry.body, content_width) {
        lines.push(DisplayLine::new(format!("{BODY_PREFIX}{line}"), role));
    }

    for meta in metadata_lines(entry) {
        lines.push(DisplayLine::new(
            truncate_chars(&meta, content_width),
            StyleHint::Dim,
        ));
    }
}

/// Label line text: cursor, role icon and name, timestamp.
pub fn label_text(entry: &Entry, active: bool) -> String {
    let cursor = if active { ACTIVE_CURSOR } else { IDLE_CURSOR };
    let time = entry
        .timestamp
        .map(|ts| ts.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| MISSING_TIME.to_string());
    format!(
        "{cursor}{} {} · {time}",
        entry.kind.icon(),
        entry.kind.label()
    )
}

/// Body wrapped to the room left after [`BODY_PREFIX`].
pub fn body_lines(body: &str, content_width: usize) -> Vec<String> {
    wrap(body, content_width.saturating_sub(BODY_INDENT).max(1))
}

/// Human-readable metadata lines for an entry, in a fixed order.
pub fn metadata_lines(entry: &Entry) -> Vec<String> {
    let mut out = Vec::new();
    let meta = &entry.metadata;

    if let Some(tool) = meta.get(META_TOOL_NAME).and_then(Value::as_str) {
        out.push(format!("{META_PREFIX}tool: {tool}"));
    }
    if let Some(model) = meta.get(META_MODEL).and_then(Value::as_str) {
        out.push(format!("{META_PREFIX}model: {model}"));
    }

    let input = meta.get(META_INPUT_TOKENS).and_then(Value::as_u64);
    let output = meta.get(META_OUTPUT_TOKENS).and_then(Value::as_u64);
    if input.is_some() || output.is_some() {
        out.push(format!(
            "{META_PREFIX}tokens: {} in / {} out",
            input.unwrap_or(0),
            output.unwrap_or(0)
        ));
    }

    if entry.kind == EntryKind::FileSnapshot && meta.contains_key(META_FILE_COUNT) {
        out.push(format!("{META_PREFIX}files: {}", entry.file_count()));
    }

    out
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
