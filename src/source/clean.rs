//! Clean-view derivation from raw entries.
//!
//! The clean view keeps what a reader wants to skim: user prompts,
//! assistant prose, tool invocations and checkpoints. Assistant records
//! split across several lines of the transcript are merged back into one
//! entry per API message.

use crate::model::{
    Entry, EntryKind, META_INPUT_TOKENS, META_MERGED_IDS, META_OUTPUT_TOKENS, META_SOURCE_ID,
    META_THINKING,
};
use serde_json::Value;
use crate::parser::ParsedEntry;

/// Whether a raw entry survives into the clean view.
fn keep(entry: &Entry) -> bool {
    match entry.kind {
        EntryKind::ToolResult | EntryKind::Queue | EntryKind::Unknown | EntryKind::FileSnapshot => {
            false
        }
        EntryKind::System => entry.is_compaction_boundary(),
        EntryKind::Summary => true,
        EntryKind::User | EntryKind::Assistant | EntryKind::ToolCall => {
            !entry.metadata.contains_key(META_THINKING) && !entry.body.trim().is_empty()
        }
    }
}

/// Derive the clean view.
///
/// Every clean entry keeps the raw id it came from and records it under
/// `source_id`. A merged assistant entry also lists the raw ids of its later
/// fragments under `merged_ids`, so each of those raw entries maps back to it.
pub fn derive_clean(parsed: &[ParsedEntry]) -> Vec<Entry> {
    let mut clean: Vec<Entry> = Vec::new();
    let mut last_message_id: Option<&str> = None;

    for item in parsed {
        let entry = &item.entry;
        if !keep(entry) {
            continue;
        }

        let message_id = item.message_id.as_deref();
        let merges = entry.kind == EntryKind::Assistant
            && message_id.is_some()
            && message_id == last_message_id
            && clean.last().is_some_and(|prev| prev.kind == EntryKind::Assistant);

        if merges {
            if let Some(prev) = clean.last_mut() {
                prev.body.push_str("\n\n");
                prev.body.push_str(&entry.body);
                for key in [META_INPUT_TOKENS, META_OUTPUT_TOKENS] {
                    if let Some(value) = entry.metadata.get(key) {
                        prev.metadata.insert(key.to_string(), value.clone());
                    }
                }
                let merged = prev
                    .metadata
                    .entry(META_MERGED_IDS.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(ids) = merged {
                    ids.push(entry.id.as_str().into());
                }
            }
            continue;
        }

        let mut kept = entry.clone();
        kept.metadata
            .insert(META_SOURCE_ID.to_string(), entry.id.as_str().into());
        clean.push(kept);
        last_message_id = if entry.kind == EntryKind::Assistant {
            message_id
        } else {
            None
        };
    }

    clean
}
