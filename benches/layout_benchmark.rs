//! Layout and minimap benchmarks over large transcripts.
//!
//! Every navigation command recomputes sections, layout and buckets from
//! scratch, so these bound the cost of a single keypress.
//!
//! Run with: cargo bench --bench layout_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use chrono::DateTime;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use threadlens::model::{Command, Direction, Entry, EntryKind};
use threadlens::source::Transcript;
use threadlens::state::{Navigator, ViewMode, ViewState};
use threadlens::view_state::layout::layout;
use threadlens::view_state::overview::bucketize;
use threadlens::view_state::section::build_sections;
use threadlens::view_state::types::ViewportDimensions;

const BODY: &str = "The parser now accepts trailing commas in arrays and objects; \
                    the tokenizer change is covered by the existing fixture suite.";

/// User/assistant turns with a summary checkpoint every 200 entries.
fn make_entries(count: usize) -> Vec<Entry> {
    (0..count)
        .map(|i| {
            let ts = DateTime::from_timestamp(1_735_122_600 + i as i64, 0);
            let kind = match i {
                i if i > 0 && i % 200 == 0 => EntryKind::Summary,
                i if i % 2 == 0 => EntryKind::User,
                _ => EntryKind::Assistant,
            };
            Entry::new(format!("e{i}"), kind, ts, BODY)
        })
        .collect()
}

fn benchmark_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for count in [1_000, 10_000, 50_000] {
        let entries = make_entries(count);
        let sections = build_sections(&entries);
        let state = ViewState {
            active_index: count / 2,
            ..ViewState::default()
        };

        group.bench_with_input(BenchmarkId::new("thread", count), &entries, |b, entries| {
            b.iter(|| layout(black_box(entries), &sections, &state, 100));
        });
    }

    group.finish();
}

fn benchmark_bucketize(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucketize");

    for count in [1_000, 10_000, 50_000] {
        let entries = make_entries(count);
        group.bench_with_input(BenchmarkId::new("height_40", count), &entries, |b, entries| {
            b.iter(|| bucketize(black_box(entries), 40));
        });
    }

    group.finish();
}

fn benchmark_keypress(c: &mut Criterion) {
    let mut group = c.benchmark_group("keypress");

    for count in [1_000, 10_000] {
        let mut navigator = Navigator::new(Transcript::clean_only(make_entries(count)));
        navigator.resize(ViewportDimensions::new(100, 40), 40);
        let state = navigator.initial_state(ViewMode::Clean);

        group.bench_with_input(BenchmarkId::new("prev", count), &state, |b, state| {
            b.iter(|| navigator.apply(black_box(state), Command::Prev));
        });
        group.bench_with_input(
            BenchmarkId::new("jump_checkpoint", count),
            &state,
            |b, state| {
                b.iter(|| navigator.apply(black_box(state), Command::JumpCheckpoint(Direction::Prev)));
            },
        );
        group.bench_with_input(BenchmarkId::new("render", count), &state, |b, state| {
            b.iter(|| navigator.render(black_box(state), None));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_layout, benchmark_bucketize, benchmark_keypress);
criterion_main!(benches);
