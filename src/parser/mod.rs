//! JSONL parser for transcript records.
//!
//! Pure functions converting one JSONL line into zero or more raw-view
//! entries. Records with content blocks expand to one entry per block.

use crate::model::{
    Entry, EntryKind, META_COMPACT_BOUNDARY, META_FILE_COUNT, META_INPUT_TOKENS, META_MODEL,
    META_OUTPUT_TOKENS, META_THINKING, META_TOOL_NAME,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

// Record type string constants
const RECORD_USER: &str = "user";
const RECORD_ASSISTANT: &str = "assistant";
const RECORD_SYSTEM: &str = "system";
const RECORD_SUMMARY: &str = "summary";
const RECORD_FILE_SNAPSHOT: &str = "file-history-snapshot";
const RECORD_QUEUE: &str = "queue-operation";

const SUBTYPE_COMPACT_BOUNDARY: &str = "compact_boundary";

/// A line that could not be parsed. Non-fatal: the loader skips it.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line is not a JSON object of the expected shape.
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        /// 1-based line number.
        line: usize,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// A raw-view entry plus the API message id it came from.
///
/// Assistant replies are split across several records sharing one message
/// id; the clean view merges them back together.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    /// The normalized entry.
    pub entry: Entry,
    /// API message id, for assistant records that carry one.
    pub message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "type", default)]
    record_type: Option<String>,
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default, rename = "messageId")]
    message_id: Option<String>,
    #[serde(default, rename = "leafUuid")]
    leaf_uuid: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    message: Option<RawMessage>,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    operation: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    snapshot: Option<RawSnapshot>,
    #[serde(default, rename = "isCompactSummary")]
    is_compact_summary: bool,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    usage: Option<RawUsage>,
}

#[derive(Debug, Deserialize)]
struct RawUsage {
    #[serde(default)]
    input_tokens: Option<u64>,
    #[serde(default)]
    output_tokens: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default, rename = "trackedFileBackups")]
    tracked_file_backups: Map<String, Value>,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Parse one JSONL line.
///
/// Blank lines yield no entries. `line_number` is 1-based and used for
/// fallback ids and error reporting.
pub fn parse_line(line: &str, line_number: usize) -> Result<Vec<ParsedEntry>, ParseError> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }
    let record: RawRecord = serde_json::from_str(line).map_err(|source| ParseError::Json {
        line: line_number,
        source,
    })?;
    Ok(convert(record, line_number))
}

fn convert(record: RawRecord, line_number: usize) -> Vec<ParsedEntry> {
    let id = record
        .uuid
        .clone()
        .or_else(|| record.message_id.clone())
        .or_else(|| record.leaf_uuid.clone())
        .unwrap_or_else(|| format!("line-{line_number}"));
    let timestamp = record
        .timestamp
        .as_deref()
        .or_else(|| record.snapshot.as_ref().and_then(|s| s.timestamp.as_deref()))
        .and_then(|raw| parse_timestamp(raw, line_number));
    let record_type = record.record_type.clone().unwrap_or_default();

    match record_type.as_str() {
        RECORD_USER | RECORD_ASSISTANT => convert_message(record, &record_type, id, timestamp),
        RECORD_SYSTEM => {
            let mut entry = Entry::new(
                id,
                EntryKind::System,
                timestamp,
                record.content.as_ref().map(value_text).unwrap_or_default(),
            );
            if record.subtype.as_deref() == Some(SUBTYPE_COMPACT_BOUNDARY) {
                entry = entry.with_meta(META_COMPACT_BOUNDARY, true);
            }
            vec![single(entry)]
        }
        RECORD_SUMMARY => vec![single(Entry::new(
            id,
            EntryKind::Summary,
            timestamp,
            record.summary.unwrap_or_default(),
        ))],
        RECORD_FILE_SNAPSHOT => {
            let files: Vec<String> = record
                .snapshot
                .map(|s| s.tracked_file_backups.keys().cloned().collect())
                .unwrap_or_default();
            let entry = Entry::new(id, EntryKind::FileSnapshot, timestamp, files.join("\n"))
                .with_meta(META_FILE_COUNT, files.len());
            vec![single(entry)]
        }
        RECORD_QUEUE => {
            let body = record
                .content
                .as_ref()
                .map(value_text)
                .or(record.operation)
                .unwrap_or_default();
            vec![single(Entry::new(id, EntryKind::Queue, timestamp, body))]
        }
        other => vec![single(Entry::new(id, EntryKind::Unknown, timestamp, other))],
    }
}

fn convert_message(
    record: RawRecord,
    record_type: &str,
    id: String,
    timestamp: Option<DateTime<Utc>>,
) -> Vec<ParsedEntry> {
    let text_kind = if record.is_compact_summary {
        EntryKind::Summary
    } else if record_type == RECORD_USER {
        EntryKind::User
    } else {
        EntryKind::Assistant
    };
    let Some(message) = record.message else {
        return vec![single(Entry::new(id, text_kind, timestamp, ""))];
    };

    let mut entries: Vec<Entry> = match &message.content {
        Some(Value::Array(blocks)) => blocks
            .iter()
            .filter_map(|block| convert_block(block, text_kind, timestamp))
            .collect(),
        Some(other) => vec![Entry::new("", text_kind, timestamp, value_text(other))],
        None => Vec::new(),
    };
    if entries.is_empty() {
        entries.push(Entry::new("", text_kind, timestamp, ""));
    }

    for (n, entry) in entries.iter_mut().enumerate() {
        entry.id = if n == 0 {
            id.as_str().into()
        } else {
            format!("{id}#{n}").into()
        };
    }

    if let Some(first) = entries.first_mut() {
        if let Some(model) = &message.model {
            first
                .metadata
                .insert(META_MODEL.to_string(), Value::from(model.as_str()));
        }
        if let Some(usage) = &message.usage {
            if let Some(input) = usage.input_tokens {
                first
                    .metadata
                    .insert(META_INPUT_TOKENS.to_string(), Value::from(input));
            }
            if let Some(output) = usage.output_tokens {
                first
                    .metadata
                    .insert(META_OUTPUT_TOKENS.to_string(), Value::from(output));
            }
        }
    }

    entries
        .into_iter()
        .map(|entry| ParsedEntry {
            entry,
            message_id: message.id.clone(),
        })
        .collect()
}

fn convert_block(
    block: &Value,
    text_kind: EntryKind,
    timestamp: Option<DateTime<Utc>>,
) -> Option<Entry> {
    let block_type = block.get("type").and_then(Value::as_str)?;
    match block_type {
        "text" => Some(Entry::new("", text_kind, timestamp, field_text(block, "text"))),
        "thinking" => Some(
            Entry::new("", text_kind, timestamp, field_text(block, "thinking"))
                .with_meta(META_THINKING, true),
        ),
        "tool_use" => {
            let name = field_text(block, "name");
            let input = block.get("input").cloned().unwrap_or(Value::Null);
            Some(
                Entry::new("", EntryKind::ToolCall, timestamp, tool_input_summary(&input))
                    .with_meta(META_TOOL_NAME, name),
            )
        }
        "tool_result" => Some(Entry::new(
            "",
            EntryKind::ToolResult,
            timestamp,
            block.get("content").map(value_text).unwrap_or_default(),
        )),
        _ => None,
    }
}

/// Short, readable rendering of a tool input object.
fn tool_input_summary(input: &Value) -> String {
    for key in ["command", "file_path", "pattern", "url", "description"] {
        if let Some(text) = input.get(key).and_then(Value::as_str) {
            return text.to_string();
        }
    }
    match input {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn field_text(block: &Value, key: &str) -> String {
    block
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Flatten a string or an array of text blocks into plain text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => other.get("text").and_then(Value::as_str).map(str::to_string),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_timestamp(raw: &str, line_number: usize) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(err) => {
            debug!(line = line_number, raw, error = %err, "Unparseable timestamp");
            None
        }
    }
}

fn single(entry: Entry) -> ParsedEntry {
    ParsedEntry {
        entry,
        message_id: None,
    }
}
