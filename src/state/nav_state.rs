//! Navigation view state.
//!
//! `ViewState` is plain data owned by the navigation controller. Every other
//! component reads it by reference and returns derived results; transitions
//! produce a new value instead of mutating in place.

use crate::view_state::scroll::ScrollAlign;
use std::collections::BTreeSet;

/// Which control the navigation keys drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusMode {
    /// Keys move the active entry and scroll the detail view.
    #[default]
    Reading,
    /// Keys move the timeline selection over sections until confirmed.
    TimelineNav,
}

/// Which entry sequence is shown in the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Deduplicated, simplified entries.
    #[default]
    Clean,
    /// Verbatim transcript entries.
    Raw,
}

impl ViewMode {
    /// The other view.
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Clean => ViewMode::Raw,
            ViewMode::Raw => ViewMode::Clean,
        }
    }

    /// Lowercase name for the status bar.
    pub fn name(self) -> &'static str {
        match self {
            ViewMode::Clean => "clean",
            ViewMode::Raw => "raw",
        }
    }
}

/// How the detail view arranges entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutMode {
    /// Entries grouped under collapsible section headers.
    #[default]
    Thread,
    /// A flat list with no section headers.
    List,
}

impl LayoutMode {
    /// The other layout.
    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::Thread => LayoutMode::List,
            LayoutMode::List => LayoutMode::Thread,
        }
    }

    /// Lowercase name for the status bar.
    pub fn name(self) -> &'static str {
        match self {
            LayoutMode::Thread => "thread",
            LayoutMode::List => "list",
        }
    }
}

/// Where a jumped-to entry lands in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PreviewPosition {
    /// First row of the viewport.
    #[default]
    Top,
    /// Vertically centered.
    Middle,
    /// Last row of the viewport.
    Bottom,
}

impl PreviewPosition {
    /// Next position in the top → middle → bottom cycle.
    pub fn cycled(self) -> Self {
        match self {
            PreviewPosition::Top => PreviewPosition::Middle,
            PreviewPosition::Middle => PreviewPosition::Bottom,
            PreviewPosition::Bottom => PreviewPosition::Top,
        }
    }

    /// Scroll alignment used for jumps.
    pub fn align(self) -> ScrollAlign {
        match self {
            PreviewPosition::Top => ScrollAlign::Top,
            PreviewPosition::Middle => ScrollAlign::Middle,
            PreviewPosition::Bottom => ScrollAlign::Bottom,
        }
    }

    /// Lowercase name for the status bar and config.
    pub fn name(self) -> &'static str {
        match self {
            PreviewPosition::Top => "top",
            PreviewPosition::Middle => "middle",
            PreviewPosition::Bottom => "bottom",
        }
    }

    /// Parse a config/CLI value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "top" => Some(PreviewPosition::Top),
            "middle" => Some(PreviewPosition::Middle),
            "bottom" => Some(PreviewPosition::Bottom),
            _ => None,
        }
    }
}

/// Navigation state. Pure data, no side effects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Index of the active entry in the current view's entries.
    pub active_index: usize,
    /// First visible line of the detail layout.
    pub scroll_offset: usize,
    /// Ids of collapsed sections of the current view.
    pub collapsed_sections: BTreeSet<usize>,
    /// Show only each section's checkpoint entry.
    pub checkpoint_only: bool,
    /// Whether keys move the entry cursor or the timeline selection.
    pub focus_mode: FocusMode,
    /// Selected section of the timeline sequence (timeline-nav only).
    pub timeline_selection: usize,
    /// Which entry sequence is shown.
    pub view_mode: ViewMode,
    /// Sectioned thread or flat list.
    pub layout_mode: LayoutMode,
    /// Alignment used after jumps.
    pub preview_position: PreviewPosition,
}

impl ViewState {
    /// Whether the section with `id` is collapsed.
    pub fn is_collapsed(&self, id: usize) -> bool {
        self.collapsed_sections.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_reading_clean_thread() {
        let state = ViewState::default();
        assert_eq!(state.focus_mode, FocusMode::Reading);
        assert_eq!(state.view_mode, ViewMode::Clean);
        assert_eq!(state.layout_mode, LayoutMode::Thread);
        assert!(state.collapsed_sections.is_empty());
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn preview_position_cycles_through_all_three() {
        let p = PreviewPosition::Top;
        assert_eq!(p.cycled(), PreviewPosition::Middle);
        assert_eq!(p.cycled().cycled(), PreviewPosition::Bottom);
        assert_eq!(p.cycled().cycled().cycled(), PreviewPosition::Top);
    }

    #[test]
    fn preview_position_parses_case_insensitively() {
        assert_eq!(PreviewPosition::parse("Middle"), Some(PreviewPosition::Middle));
        assert_eq!(PreviewPosition::parse("sideways"), None);
    }

    #[test]
    fn toggles_are_involutions() {
        assert_eq!(ViewMode::Clean.toggled().toggled(), ViewMode::Clean);
        assert_eq!(LayoutMode::List.toggled().toggled(), LayoutMode::List);
    }
}
