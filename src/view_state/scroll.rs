//! Viewport scroll targeting
//!
//! # Clamping Behavior
//! Every offset produced here lies in `[0, max_scroll]` where
//! `max_scroll = max(0, total_lines - viewport_height)`. This holds for any
//! layout, any target index and any viewport height, so the detail view can
//! never scroll past its content.

use super::layout::LayoutResult;

/// Where the target entry's first line lands in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    /// Target line at the top row.
    Top,
    /// Target line at the middle row.
    Middle,
    /// Target line at the bottom row. Used when moving forward.
    #[default]
    Bottom,
}

/// Largest valid scroll offset.
///
/// A zero `viewport_height` is treated as one row.
pub fn max_scroll(total_lines: usize, viewport_height: usize) -> usize {
    total_lines.saturating_sub(viewport_height.max(1))
}

/// Clamp an arbitrary offset into `[0, max_scroll]`.
pub fn clamp_offset(offset: usize, total_lines: usize, viewport_height: usize) -> usize {
    offset.min(max_scroll(total_lines, viewport_height))
}

/// Apply a signed line delta to `offset`, clamped.
pub fn scroll_by(offset: usize, delta: isize, total_lines: usize, viewport_height: usize) -> usize {
    let moved = if delta.is_negative() {
        offset.saturating_sub(delta.unsigned_abs())
    } else {
        offset.saturating_add(delta.unsigned_abs())
    };
    clamp_offset(moved, total_lines, viewport_height)
}

/// Scroll offset that shows entry `target_index` with the given alignment.
///
/// An out-of-range target is clamped to the last entry; an empty layout
/// always scrolls to 0.
pub fn scroll_to_entry(
    layout: &LayoutResult,
    target_index: usize,
    viewport_height: usize,
    align: ScrollAlign,
) -> usize {
    let Some(&last) = layout.entry_line_start.last() else {
        return 0;
    };
    let start = layout.line_of(target_index).unwrap_or(last);
    let rows = viewport_height.max(1);

    let desired = match align {
        ScrollAlign::Top => start,
        ScrollAlign::Middle => start.saturating_sub(rows / 2),
        ScrollAlign::Bottom => start.saturating_sub(rows - 1),
    };
    clamp_offset(desired, layout.total_lines(), rows)
}
