//! Index correspondence between the clean and raw entry views.
//!
//! Indices are never interchangeable between views. Correspondence is by
//! id first (including the `source_id` cross-reference a clean entry keeps
//! to its raw origin, and the `merged_ids` of fragments folded into it),
//! then by timestamp.

use crate::model::Entry;
use chrono::{DateTime, Utc};

/// Whether two entries from different views denote the same event.
fn same_event(a: &Entry, b: &Entry) -> bool {
    let a_sources = a.source_ids();
    let b_sources = b.source_ids();
    a.id == b.id
        || b_sources.contains(&a.id.as_str())
        || a_sources.contains(&b.id.as_str())
        || a_sources.iter().any(|id| b_sources.contains(id))
}

/// Exact id correspondence of `source[source_index]` in `target`.
///
/// Returns `None` when the source index is out of range or no target entry
/// shares the id.
pub fn find_exact(source: &[Entry], source_index: usize, target: &[Entry]) -> Option<usize> {
    let wanted = source.get(source_index)?;
    target.iter().position(|candidate| same_event(wanted, candidate))
}

/// Map `source[source_index]` to the closest index in `target`.
///
/// Exact id match wins. Otherwise the first target entry whose timestamp is
/// at or after the source entry's is chosen, falling back to the last target
/// entry. Missing timestamps are ordered as `now`. Ties between equal target
/// timestamps resolve to the earliest in array order. An empty target maps
/// to 0; an out-of-range source index is clamped to the last source entry.
pub fn map_index(source: &[Entry], source_index: usize, target: &[Entry]) -> usize {
    map_index_at(source, source_index, target, Utc::now())
}

/// [`map_index`] with an explicit substitute for missing timestamps.
pub fn map_index_at(
    source: &[Entry],
    source_index: usize,
    target: &[Entry],
    now: DateTime<Utc>,
) -> usize {
    if target.is_empty() || source.is_empty() {
        return 0;
    }
    let source_index = source_index.min(source.len() - 1);

    if let Some(exact) = find_exact(source, source_index, target) {
        return exact;
    }

    let wanted = source[source_index].timestamp_or(now);
    target
        .iter()
        .position(|candidate| candidate.timestamp_or(now) >= wanted)
        .unwrap_or(target.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryKind, META_MERGED_IDS, META_SOURCE_ID};
    use proptest::prelude::*;

    fn at(id: &str, secs: i64) -> Entry {
        Entry::new(
            id,
            EntryKind::User,
            DateTime::from_timestamp(1_700_000_000 + secs, 0),
            "",
        )
    }

    #[test]
    fn exact_id_match_wins_over_timestamp() {
        let source = vec![at("b", 0)];
        let target = vec![at("a", 0), at("b", 50)];
        assert_eq!(map_index(&source, 0, &target), 1);
    }

    #[test]
    fn source_id_cross_reference_matches() {
        let clean = vec![at("c1", 5).with_meta(META_SOURCE_ID, "r2")];
        let raw = vec![at("r1", 0), at("r2", 5), at("r3", 9)];

        assert_eq!(find_exact(&clean, 0, &raw), Some(1));
        assert_eq!(find_exact(&raw, 1, &clean), Some(0));
    }

    #[test]
    fn merged_fragment_maps_to_its_clean_entry() {
        let clean = vec![
            at("u1", 0).with_meta(META_SOURCE_ID, "u1"),
            at("a1", 5)
                .with_meta(META_SOURCE_ID, "a1")
                .with_meta(META_MERGED_IDS, serde_json::json!(["a2"])),
            at("u2", 9).with_meta(META_SOURCE_ID, "u2"),
        ];
        let raw = vec![at("u1", 0), at("a1", 5), at("a2", 7), at("u2", 9)];

        assert_eq!(find_exact(&raw, 2, &clean), Some(1));
        assert_eq!(map_index(&raw, 2, &clean), 1);
        assert_eq!(find_exact(&clean, 1, &raw), Some(1));
    }

    #[test]
    fn falls_back_to_first_timestamp_at_or_after() {
        let source = vec![at("x", 10)];
        let target = vec![at("a", 0), at("b", 10), at("c", 10), at("d", 20)];
        assert_eq!(map_index(&source, 0, &target), 1);

        let later = vec![at("y", 15)];
        assert_eq!(map_index(&later, 0, &target), 3);
    }

    #[test]
    fn clamps_to_last_when_nothing_is_later() {
        let source = vec![at("x", 100)];
        let target = vec![at("a", 0), at("b", 10)];
        assert_eq!(map_index(&source, 0, &target), 1);
    }

    #[test]
    fn empty_target_maps_to_zero() {
        assert_eq!(map_index(&[at("x", 0)], 0, &[]), 0);
    }

    #[test]
    fn missing_timestamps_order_as_now() {
        let now: DateTime<Utc> = "2030-01-01T00:00:00Z".parse().unwrap();
        let source = vec![Entry::new("x", EntryKind::User, None, "")];
        let target = vec![at("a", 0), Entry::new("b", EntryKind::User, None, "")];
        assert_eq!(map_index_at(&source, 0, &target, now), 1);
    }

    proptest! {
        #[test]
        fn shared_ids_round_trip(raw_len in 1usize..40, picks in prop::collection::btree_set(0usize..40, 1..20)) {
            let raw: Vec<Entry> = (0..raw_len).map(|i| at(&format!("r{i}"), i as i64)).collect();
            let clean: Vec<Entry> = picks
                .iter()
                .filter(|&&p| p < raw_len)
                .map(|&p| at(&format!("r{p}"), p as i64))
                .collect();

            for clean_index in 0..clean.len() {
                let raw_index = map_index(&clean, clean_index, &raw);
                prop_assert_eq!(raw[raw_index].id.clone(), clean[clean_index].id.clone());
                prop_assert_eq!(map_index(&raw, raw_index, &clean), clean_index);
            }
        }
    }
}
