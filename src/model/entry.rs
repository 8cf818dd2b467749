//! Normalized conversation entry.
//!
//! Entries are produced once per conversation by an [`EntrySource`](crate::source::EntrySource)
//! and treated as read-only for the lifetime of the view.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key: name of the tool invoked by a `tool_call` entry.
pub const META_TOOL_NAME: &str = "tool_name";
/// Metadata key: input token count reported for an assistant turn.
pub const META_INPUT_TOKENS: &str = "input_tokens";
/// Metadata key: output token count reported for an assistant turn.
pub const META_OUTPUT_TOKENS: &str = "output_tokens";
/// Metadata key: number of files tracked by a file snapshot.
pub const META_FILE_COUNT: &str = "file_count";
/// Metadata key: boolean marker set on compaction boundary system entries.
pub const META_COMPACT_BOUNDARY: &str = "compact_boundary";
/// Metadata key: id of the raw-view entry a clean-view entry was derived from.
pub const META_SOURCE_ID: &str = "source_id";
/// Metadata key: raw ids of later fragments merged into a clean-view entry.
pub const META_MERGED_IDS: &str = "merged_ids";
/// Metadata key: model name for assistant turns.
pub const META_MODEL: &str = "model";
/// Metadata key: marks assistant entries holding extended thinking.
pub const META_THINKING: &str = "thinking";

/// Entry metadata. Ordered so rendering is deterministic.
pub type Metadata = BTreeMap<String, Value>;

/// Identifier of an entry within one transcript.
///
/// Ids are unique within a view but the same id may appear in both the
/// clean and raw views of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(String);

impl EntryId {
    /// Create an id from any string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for EntryId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Closed set of conversation event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A prompt typed by the user.
    User,
    /// Assistant prose or thinking.
    Assistant,
    /// A tool invocation requested by the assistant.
    ToolCall,
    /// Output returned by a tool.
    ToolResult,
    /// System notice, including compaction boundaries.
    System,
    /// Snapshot of tracked files. A checkpoint in the raw view.
    FileSnapshot,
    /// Conversation summary written at compaction. A checkpoint.
    Summary,
    /// Queued-input bookkeeping.
    Queue,
    /// Any record type not recognized.
    Unknown,
}

impl EntryKind {
    /// Human-readable role name used in label lines.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::User => "User",
            EntryKind::Assistant => "Assistant",
            EntryKind::ToolCall => "Tool call",
            EntryKind::ToolResult => "Tool result",
            EntryKind::System => "System",
            EntryKind::FileSnapshot => "File snapshot",
            EntryKind::Summary => "Summary",
            EntryKind::Queue => "Queued",
            EntryKind::Unknown => "Unknown",
        }
    }

    /// Single-glyph role icon.
    pub fn icon(self) -> &'static str {
        match self {
            EntryKind::User => "»",
            EntryKind::Assistant => "◇",
            EntryKind::ToolCall => "⚙",
            EntryKind::ToolResult => "↳",
            EntryKind::System => "!",
            EntryKind::FileSnapshot => "▣",
            EntryKind::Summary => "≡",
            EntryKind::Queue => "…",
            EntryKind::Unknown => "?",
        }
    }
}

/// One conversation event.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Unique within its view.
    pub id: EntryId,
    /// Role of the event.
    pub kind: EntryKind,
    /// `None` when the source timestamp was missing or unparseable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Display text. May be empty.
    pub body: String,
    /// Kind-specific extras keyed by the `META_*` constants.
    pub metadata: Metadata,
}

impl Entry {
    /// Create an entry with empty metadata.
    pub fn new(
        id: impl Into<EntryId>,
        kind: EntryKind,
        timestamp: Option<DateTime<Utc>>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            timestamp,
            body: body.into(),
            metadata: Metadata::new(),
        }
    }

    /// Builder-style metadata insertion.
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Timestamp for ordering, substituting `fallback` when missing.
    ///
    /// The substitute never leaves the caller; the entry itself is unchanged.
    pub fn timestamp_or(&self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        self.timestamp.unwrap_or(fallback)
    }

    /// Cross-reference id into the raw view, if this entry carries one.
    pub fn source_id(&self) -> Option<&str> {
        self.metadata.get(META_SOURCE_ID).and_then(Value::as_str)
    }

    /// Every raw id this entry stands for: the source id followed by the
    /// ids of any fragments merged into it.
    pub fn source_ids(&self) -> Vec<&str> {
        let merged = self
            .metadata
            .get(META_MERGED_IDS)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str);
        self.source_id().into_iter().chain(merged).collect()
    }

    /// True for compaction boundary system entries.
    pub fn is_compaction_boundary(&self) -> bool {
        self.kind == EntryKind::System
            && self
                .metadata
                .get(META_COMPACT_BOUNDARY)
                .and_then(Value::as_bool)
                .unwrap_or(false)
    }

    /// Checkpoints start a new navigable section.
    pub fn is_checkpoint(&self) -> bool {
        match self.kind {
            EntryKind::FileSnapshot | EntryKind::Summary => true,
            EntryKind::System => self.is_compaction_boundary(),
            EntryKind::User
            | EntryKind::Assistant
            | EntryKind::ToolCall
            | EntryKind::ToolResult
            | EntryKind::Queue
            | EntryKind::Unknown => false,
        }
    }

    /// Number of files tracked by a snapshot entry.
    pub fn file_count(&self) -> u64 {
        self.metadata
            .get(META_FILE_COUNT)
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Title used when this entry opens a section.
    ///
    /// Returns `None` for non-checkpoint entries.
    pub fn checkpoint_title(&self) -> Option<String> {
        if !self.is_checkpoint() {
            return None;
        }
        let title = match self.kind {
            EntryKind::FileSnapshot => match self.file_count() {
                1 => "Snapshot · 1 file".to_string(),
                n => format!("Snapshot · {n} files"),
            },
            EntryKind::Summary => self
                .body
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(|line| truncate_chars(line, 60))
                .unwrap_or_else(|| "Summary".to_string()),
            _ => "Compaction".to_string(),
        };
        Some(title)
    }
}

/// Truncate to `max` characters, appending an ellipsis when shortened.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: EntryKind, body: &str) -> Entry {
        Entry::new("e1", kind, None, body)
    }

    #[test]
    fn file_snapshot_and_summary_are_checkpoints() {
        assert!(entry(EntryKind::FileSnapshot, "").is_checkpoint());
        assert!(entry(EntryKind::Summary, "done").is_checkpoint());
    }

    #[test]
    fn plain_system_entry_is_not_a_checkpoint() {
        assert!(!entry(EntryKind::System, "hook ran").is_checkpoint());
    }

    #[test]
    fn system_with_compaction_marker_is_a_checkpoint() {
        let e = entry(EntryKind::System, "").with_meta(META_COMPACT_BOUNDARY, true);
        assert!(e.is_checkpoint());
        assert_eq!(e.checkpoint_title().as_deref(), Some("Compaction"));
    }

    #[test]
    fn snapshot_title_counts_files() {
        let e = entry(EntryKind::FileSnapshot, "").with_meta(META_FILE_COUNT, 3);
        assert_eq!(e.checkpoint_title().as_deref(), Some("Snapshot · 3 files"));

        let single = entry(EntryKind::FileSnapshot, "").with_meta(META_FILE_COUNT, 1);
        assert_eq!(single.checkpoint_title().as_deref(), Some("Snapshot · 1 file"));
    }

    #[test]
    fn summary_title_is_first_non_empty_line() {
        let e = entry(EntryKind::Summary, "\n  Refactor parser  \nmore");
        assert_eq!(e.checkpoint_title().as_deref(), Some("Refactor parser"));
    }

    #[test]
    fn empty_summary_falls_back_to_generic_title() {
        assert_eq!(
            entry(EntryKind::Summary, "  ").checkpoint_title().as_deref(),
            Some("Summary")
        );
    }

    #[test]
    fn non_checkpoint_has_no_title() {
        assert_eq!(entry(EntryKind::User, "hi").checkpoint_title(), None);
    }

    #[test]
    fn timestamp_or_substitutes_missing_value() {
        let now: DateTime<Utc> = "2025-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(entry(EntryKind::User, "").timestamp_or(now), now);
    }

    #[test]
    fn truncate_chars_adds_ellipsis() {
        assert_eq!(truncate_chars("abcdef", 4), "abc…");
        assert_eq!(truncate_chars("abc", 4), "abc");
    }
}
