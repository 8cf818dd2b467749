//! Property-based tests for navigation and view-state invariants.
//!
//! Tests validate:
//! 1. Any command sequence leaves the active index and scroll offset in bounds
//! 2. Failed jumps are idempotent
//! 3. Sections partition the entry sequence
//! 4. The minimap always has exactly `height` rows holding every entry
//! 5. Cross-view mapping stays in range

use chrono::DateTime;
use proptest::prelude::*;
use threadlens::model::{Command, Direction, Entry, EntryKind, META_FILE_COUNT};
use threadlens::source::{EntrySource, Transcript};
use threadlens::state::{Navigator, ViewMode};
use threadlens::view_state::cross_view::map_index;
use threadlens::view_state::overview::{bucketize, row_for_index};
use threadlens::view_state::scroll::max_scroll;
use threadlens::view_state::section::build_sections;
use threadlens::view_state::types::ViewportDimensions;

// ===== Arbitrary Strategies =====

fn arb_kind() -> impl Strategy<Value = EntryKind> {
    prop_oneof![
        4 => Just(EntryKind::User),
        4 => Just(EntryKind::Assistant),
        2 => Just(EntryKind::ToolCall),
        2 => Just(EntryKind::ToolResult),
        1 => Just(EntryKind::Summary),
        1 => Just(EntryKind::FileSnapshot),
        1 => Just(EntryKind::Queue),
    ]
}

/// Raw entries with ascending timestamps (some missing) and unique ids.
fn arb_raw_entries(max: usize) -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec(
        (arb_kind(), "[a-z]{1,12}( [a-z]{1,12}){0,15}", any::<bool>()),
        0..max,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (kind, body, timed))| {
                let ts = timed.then(|| DateTime::from_timestamp(1_735_122_600 + i as i64, 0)).flatten();
                let entry = Entry::new(format!("r{i}"), kind, ts, body);
                if kind == EntryKind::FileSnapshot {
                    entry.with_meta(META_FILE_COUNT, 2)
                } else {
                    entry
                }
            })
            .collect()
    })
}

/// Clean view: the conversational subset of the raw entries, same ids.
fn clean_subset(raw: &[Entry]) -> Vec<Entry> {
    raw.iter()
        .filter(|e| {
            matches!(
                e.kind,
                EntryKind::User | EntryKind::Assistant | EntryKind::ToolCall | EntryKind::Summary
            )
        })
        .cloned()
        .collect()
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Next),
        Just(Command::Prev),
        Just(Command::NextUser),
        Just(Command::PrevUser),
        Just(Command::ToggleView),
        Just(Command::ToggleLayout),
        Just(Command::ToggleFocus),
        Just(Command::CyclePreviewPosition),
        (-3isize..=3).prop_map(Command::MoveSelection),
        Just(Command::ConfirmSelection),
        Just(Command::JumpCheckpoint(Direction::Next)),
        Just(Command::JumpCheckpoint(Direction::Prev)),
        Just(Command::ToggleCollapse),
        Just(Command::ToggleCollapseAll),
        Just(Command::ToggleCheckpointOnly),
        (-20isize..=20).prop_map(Command::ScrollLines),
        Just(Command::Page(Direction::Next)),
        Just(Command::Page(Direction::Prev)),
        Just(Command::ExportCurrentSection),
        Just(Command::ExportAllSections),
    ]
}

fn arb_viewport() -> impl Strategy<Value = ViewportDimensions> {
    (0u16..120, 0u16..40).prop_map(|(w, h)| ViewportDimensions::new(w, h))
}

// ===== Property 1: Bounds after any command sequence =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn command_sequences_keep_state_in_bounds(
        raw in arb_raw_entries(60),
        commands in prop::collection::vec(arb_command(), 0..40),
        viewport in arb_viewport(),
        minimap_height in 0usize..30,
    ) {
        let clean = clean_subset(&raw);
        let mut navigator = Navigator::new(Transcript::new(clean, raw));
        navigator.resize(viewport, minimap_height);
        let mut state = navigator.initial_state(ViewMode::Clean);

        for command in commands {
            state = navigator.apply(&state, command).state;

            let len = navigator.source().active_entries(state.view_mode).len();
            prop_assert!(state.active_index < len.max(1), "{command:?} left active {} of {len}", state.active_index);

            let frame = navigator.render(&state, None);
            prop_assert!(state.scroll_offset <= max_scroll(frame.total_lines, viewport.rows()));
            prop_assert_eq!(frame.minimap.len(), minimap_height);
            prop_assert!(frame.lines.len() <= viewport.rows());
        }
    }

    #[test]
    fn clean_only_transcript_never_enters_raw(
        raw in arb_raw_entries(30),
        commands in prop::collection::vec(arb_command(), 0..30),
    ) {
        let navigator = Navigator::new(Transcript::clean_only(clean_subset(&raw)));
        let mut state = navigator.initial_state(ViewMode::Clean);
        for command in commands {
            state = navigator.apply(&state, command).state;
            prop_assert_eq!(state.view_mode, ViewMode::Clean);
        }
    }
}

// ===== Property 2: Failed jumps are idempotent =====

proptest! {
    #[test]
    fn failed_jump_is_idempotent(
        raw in arb_raw_entries(40),
        setup in prop::collection::vec(arb_command(), 0..15),
        jump in prop_oneof![
            Just(Command::NextUser),
            Just(Command::PrevUser),
            Just(Command::JumpCheckpoint(Direction::Next)),
            Just(Command::JumpCheckpoint(Direction::Prev)),
        ],
    ) {
        let clean = clean_subset(&raw);
        let navigator = Navigator::new(Transcript::new(clean, raw));
        let mut state = navigator.initial_state(ViewMode::Clean);
        for command in setup {
            state = navigator.apply(&state, command).state;
        }

        let first = navigator.apply(&state, jump);
        if first.status.as_deref().is_some_and(|s| s.starts_with("No ")) {
            prop_assert_eq!(&first.state, &state);
            let second = navigator.apply(&first.state, jump);
            prop_assert_eq!(&second.state, &first.state);
            prop_assert_eq!(second.status, first.status);
        }
    }
}

// ===== Property 3-5: Pure view-state functions =====

proptest! {
    #[test]
    fn sections_partition_entries(raw in arb_raw_entries(80)) {
        let sections = build_sections(&raw);
        if raw.is_empty() {
            prop_assert!(sections.is_empty());
        } else {
            prop_assert_eq!(sections[0].start_index, 0);
            prop_assert_eq!(sections[sections.len() - 1].end_index, raw.len() - 1);
            for (id, pair) in sections.windows(2).enumerate() {
                prop_assert_eq!(pair[0].id, id);
                prop_assert_eq!(pair[0].end_index + 1, pair[1].start_index);
            }
        }
    }

    #[test]
    fn bucketize_has_height_rows_and_every_entry(raw in arb_raw_entries(120), height in 0usize..50) {
        let buckets = bucketize(&raw, height);
        prop_assert_eq!(buckets.len(), height);
        if height > 0 {
            prop_assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), raw.len());
        }
    }

    #[test]
    fn row_for_index_is_monotone(total in 1usize..500, height in 1usize..60) {
        let mut previous = 0;
        for index in 0..total {
            let row = row_for_index(index, total, height);
            prop_assert!(row < height);
            prop_assert!(row >= previous);
            previous = row;
        }
        if total > 1 {
            prop_assert_eq!(row_for_index(total - 1, total, height), height - 1);
        }
    }

    #[test]
    fn map_index_stays_in_range(raw in arb_raw_entries(50), index in 0usize..60) {
        let clean = clean_subset(&raw);
        let to_clean = map_index(&raw, index, &clean);
        let to_raw = map_index(&clean, index, &raw);
        prop_assert!(to_clean < clean.len().max(1));
        prop_assert!(to_raw < raw.len().max(1));
    }
}
