//! Fixed-height minimap of the whole entry sequence.
//!
//! Entries are compressed into exactly `height` buckets by proportional
//! row mapping. Buckets reflect density; the cursor row reflects position
//! and is computed independently, so it may land on an empty bucket.

use super::layout::{DisplayLine, StyleHint};
use crate::model::{Entry, EntryKind};
use std::ops::RangeInclusive;

/// Bucket count at or above which a row is drawn as high density.
pub const HIGH_DENSITY: usize = 6;
/// Bucket count at or above which a row is drawn as medium density.
pub const MEDIUM_DENSITY: usize = 3;

/// Row glyph: bucket holds a summary or compaction checkpoint.
pub const MARK_CHECKPOINT: char = '◆';
/// Row glyph: bucket holds a file snapshot.
pub const MARK_FILE_SNAPSHOT: char = '▣';
/// Row glyph: at least [`HIGH_DENSITY`] entries.
pub const MARK_HIGH: char = '█';
/// Row glyph: at least [`MEDIUM_DENSITY`] entries.
pub const MARK_MEDIUM: char = '▓';
/// Row glyph: a few entries.
pub const MARK_LOW: char = '░';
/// Row glyph: no entries.
pub const MARK_EMPTY: char = '·';

const CURSOR: char = '▶';

/// Aggregate of the entries mapped to one minimap row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewBucket {
    /// First entry in the bucket; `None` for an empty bucket.
    pub start_index: Option<usize>,
    /// Last entry in the bucket; `None` for an empty bucket.
    pub end_index: Option<usize>,
    /// Number of entries mapped to this row.
    pub count: usize,
    /// A summary or compaction checkpoint falls in this bucket.
    pub has_checkpoint: bool,
    /// A file snapshot falls in this bucket.
    pub has_file_snapshot: bool,
    /// Title of the first checkpoint (of any kind) in the bucket.
    pub label: Option<String>,
}

impl OverviewBucket {
    /// Marker glyph, by precedence: checkpoint, file snapshot, then density.
    pub fn marker(&self) -> char {
        if self.has_checkpoint {
            MARK_CHECKPOINT
        } else if self.has_file_snapshot {
            MARK_FILE_SNAPSHOT
        } else if self.count >= HIGH_DENSITY {
            MARK_HIGH
        } else if self.count >= MEDIUM_DENSITY {
            MARK_MEDIUM
        } else if self.count >= 1 {
            MARK_LOW
        } else {
            MARK_EMPTY
        }
    }

    fn add(&mut self, index: usize, entry: &Entry) {
        self.start_index.get_or_insert(index);
        self.end_index = Some(index);
        self.count += 1;

        if entry.is_checkpoint() {
            if entry.kind == EntryKind::FileSnapshot {
                self.has_file_snapshot = true;
            } else {
                self.has_checkpoint = true;
            }
            if self.label.is_none() {
                self.label = entry.checkpoint_title();
            }
        }
    }
}

/// Minimap row for position `index` out of `total` entries.
///
/// `round(index * (height - 1) / (total - 1))`, clamped to the last row.
/// Sequences of zero or one entry map everything to row 0.
pub fn row_for_index(index: usize, total: usize, height: usize) -> usize {
    if total <= 1 || height <= 1 {
        return 0;
    }
    let index = index.min(total - 1);
    let numerator = index * (height - 1);
    let denominator = total - 1;
    // Integer round-half-up of numerator / denominator.
    let row = (2 * numerator + denominator) / (2 * denominator);
    row.min(height - 1)
}

/// Compress `entries` into exactly `height` buckets.
pub fn bucketize(entries: &[Entry], height: usize) -> Vec<OverviewBucket> {
    let mut buckets = vec![OverviewBucket::default(); height];
    if height == 0 {
        return buckets;
    }
    for (index, entry) in entries.iter().enumerate() {
        let row = row_for_index(index, entries.len(), height);
        buckets[row].add(index, entry);
    }
    buckets
}

/// Minimap rows covering entries `range`, for highlighting a section.
pub fn rows_for_range(range: RangeInclusive<usize>, total: usize, height: usize) -> RangeInclusive<usize> {
    row_for_index(*range.start(), total, height)..=row_for_index(*range.end(), total, height)
}

/// Paint buckets as display lines.
///
/// Each row is `<cursor><marker> <label>`, truncated to `width` columns.
/// Rows in `selected` are emphasised, the cursor row is prefixed `▶`, and
/// rows holding checkpoints are role-colored as summaries.
pub fn render_minimap(
    buckets: &[OverviewBucket],
    cursor_row: usize,
    selected: Option<RangeInclusive<usize>>,
    width: usize,
) -> Vec<DisplayLine> {
    buckets
        .iter()
        .enumerate()
        .map(|(row, bucket)| {
            let cursor = if row == cursor_row { CURSOR } else { ' ' };
            let mut text = format!("{cursor}{}", bucket.marker());
            if let Some(label) = &bucket.label {
                text.push(' ');
                text.push_str(label);
            }
            let text: String = text.chars().take(width.max(2)).collect();

            let style = if selected.as_ref().is_some_and(|r| r.contains(&row)) {
                StyleHint::Emphasis
            } else if bucket.has_checkpoint || bucket.has_file_snapshot {
                StyleHint::Role(EntryKind::Summary)
            } else if bucket.count == 0 {
                StyleHint::Dim
            } else {
                StyleHint::Normal
            };
            DisplayLine::new(text, style)
        })
        .collect()
}
