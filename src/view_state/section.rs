//! Checkpoint-delimited sections.
//!
//! Sections are derived, never stored: they are rebuilt from the entry
//! sequence on every state transition.

use crate::model::Entry;

/// Title of the section that precedes the first checkpoint.
pub const START_TITLE: &str = "Start";

/// A contiguous run of entries, opened by a checkpoint (or the start of
/// the conversation).
///
/// # Invariants
/// - `start_index <= end_index`
/// - sections returned by [`build_sections`] partition `[0, len - 1]`
/// - `checkpoint_index`, when set, equals `start_index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Position of this section in the section list.
    pub id: usize,
    /// Header text: the checkpoint's title, or [`START_TITLE`] for the opening section.
    pub title: String,
    /// First entry, inclusive.
    pub start_index: usize,
    /// Last entry, inclusive.
    pub end_index: usize,
    /// The checkpoint entry that opens this section, if any.
    pub checkpoint_index: Option<usize>,
}

impl Section {
    /// Whether `index` falls inside this section.
    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }

    /// Number of entries in the section.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    /// Sections are never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Entry a jump to this section should land on.
    pub fn anchor_index(&self) -> usize {
        self.checkpoint_index.unwrap_or(self.start_index)
    }
}

/// Partition `entries` into sections at checkpoint entries.
///
/// The first section always starts at index 0. Each checkpoint after the
/// current section's start closes that section and opens a new one at the
/// checkpoint. An empty sequence yields no sections.
pub fn build_sections(entries: &[Entry]) -> Vec<Section> {
    let Some(first) = entries.first() else {
        return Vec::new();
    };

    let mut sections = Vec::new();
    let mut current = open_section(0, 0, first);

    for (index, entry) in entries.iter().enumerate().skip(1) {
        if entry.is_checkpoint() {
            current.end_index = index - 1;
            let next_id = current.id + 1;
            sections.push(std::mem::replace(
                &mut current,
                open_section(next_id, index, entry),
            ));
        }
    }

    current.end_index = entries.len() - 1;
    sections.push(current);
    sections
}

fn open_section(id: usize, start_index: usize, entry: &Entry) -> Section {
    match entry.checkpoint_title() {
        Some(title) => Section {
            id,
            title,
            start_index,
            end_index: start_index,
            checkpoint_index: Some(start_index),
        },
        None => Section {
            id,
            title: START_TITLE.to_string(),
            start_index,
            end_index: start_index,
            checkpoint_index: None,
        },
    }
}

/// Position of the section containing `index`, by binary search.
pub fn section_containing(sections: &[Section], index: usize) -> Option<usize> {
    let pos = sections.partition_point(|s| s.end_index < index);
    sections
        .get(pos)
        .filter(|s| s.contains(index))
        .map(|s| s.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryKind, META_COMPACT_BOUNDARY, META_FILE_COUNT};
    use proptest::prelude::*;

    fn e(kind: EntryKind) -> Entry {
        Entry::new("id", kind, None, "body")
    }

    #[test]
    fn empty_entries_have_no_sections() {
        assert!(build_sections(&[]).is_empty());
    }

    #[test]
    fn plain_turns_form_a_single_start_section() {
        let entries: Vec<Entry> = (0..5)
            .map(|i| e(if i % 2 == 0 { EntryKind::User } else { EntryKind::Assistant }))
            .collect();
        let sections = build_sections(&entries);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Start");
        assert_eq!((sections[0].start_index, sections[0].end_index), (0, 4));
        assert_eq!(sections[0].checkpoint_index, None);
    }

    #[test]
    fn file_snapshot_opens_a_new_section() {
        let entries = vec![
            e(EntryKind::User),
            e(EntryKind::Assistant),
            e(EntryKind::FileSnapshot).with_meta(META_FILE_COUNT, 2),
            e(EntryKind::User),
            e(EntryKind::Assistant),
        ];
        let sections = build_sections(&entries);

        assert_eq!(sections.len(), 2);
        assert_eq!((sections[0].start_index, sections[0].end_index), (0, 1));
        assert_eq!(sections[0].title, "Start");
        assert_eq!((sections[1].start_index, sections[1].end_index), (2, 4));
        assert_eq!(sections[1].title, "Snapshot · 2 files");
        assert_eq!(sections[1].checkpoint_index, Some(2));
    }

    #[test]
    fn leading_checkpoint_titles_the_first_section() {
        let entries = vec![e(EntryKind::Summary), e(EntryKind::User)];
        let sections = build_sections(&entries);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].checkpoint_index, Some(0));
        assert_eq!(sections[0].title, "body");
    }

    #[test]
    fn adjacent_checkpoints_make_single_entry_sections() {
        let entries = vec![
            e(EntryKind::User),
            e(EntryKind::System).with_meta(META_COMPACT_BOUNDARY, true),
            e(EntryKind::Summary),
        ];
        let sections = build_sections(&entries);

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[1].title, "Compaction");
        assert_eq!(sections[1].len(), 1);
        assert_eq!(sections[2].start_index, 2);
    }

    #[test]
    fn section_containing_finds_owner() {
        let entries = vec![
            e(EntryKind::User),
            e(EntryKind::Summary),
            e(EntryKind::User),
            e(EntryKind::Summary),
        ];
        let sections = build_sections(&entries);

        assert_eq!(section_containing(&sections, 0), Some(0));
        assert_eq!(section_containing(&sections, 2), Some(1));
        assert_eq!(section_containing(&sections, 3), Some(2));
        assert_eq!(section_containing(&sections, 9), None);
    }

    fn arb_kind() -> impl Strategy<Value = EntryKind> {
        prop_oneof![
            4 => Just(EntryKind::User),
            4 => Just(EntryKind::Assistant),
            1 => Just(EntryKind::FileSnapshot),
            1 => Just(EntryKind::Summary),
            1 => Just(EntryKind::System),
        ]
    }

    proptest! {
        #[test]
        fn sections_partition_all_indices(kinds in prop::collection::vec(arb_kind(), 0..200)) {
            let entries: Vec<Entry> = kinds.into_iter().map(e).collect();
            let sections = build_sections(&entries);

            if entries.is_empty() {
                prop_assert!(sections.is_empty());
            } else {
                prop_assert_eq!(sections[0].start_index, 0);
                prop_assert_eq!(sections.last().unwrap().end_index, entries.len() - 1);
                for (i, pair) in sections.windows(2).enumerate() {
                    prop_assert_eq!(pair[1].start_index, pair[0].end_index + 1);
                    prop_assert_eq!(pair[0].id, i);
                }
                for s in &sections {
                    prop_assert!(s.start_index <= s.end_index);
                    if let Some(cp) = s.checkpoint_index {
                        prop_assert_eq!(cp, s.start_index);
                        prop_assert!(entries[cp].is_checkpoint());
                    }
                }
                for i in 0..entries.len() {
                    let owner = section_containing(&sections, i);
                    prop_assert!(owner.is_some());
                }
            }
        }
    }
}
