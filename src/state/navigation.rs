//! Navigation controller.
//!
//! A reducer over [`ViewState`]: every command is handled by a pure
//! function `(ViewState, Command) -> Transition`. Sections, layout, scroll
//! offset and minimap buckets are recomputed from scratch on each call.
//!
//! # Totality
//!
//! Handlers accept any state. Before a command is applied the state is
//! normalised against the current entries: the active index and timeline
//! selection are clamped, stale collapsed ids are dropped, a raw view with
//! no raw transcript falls back to clean, and the scroll offset is clamped
//! to `[0, max_scroll]`. A command that cannot be carried out returns that
//! normalised state unchanged together with a status message.
//!
//! # Timeline sequence
//!
//! The minimap, timeline sections and checkpoint jumps work on the raw
//! transcript when one exists, otherwise on the active entries. The cursor
//! position in that sequence is the active index passed through
//! [`map_index`].

use super::nav_state::{FocusMode, LayoutMode, ViewMode, ViewState};
use crate::model::{Command, Direction, Entry, EntryKind};
use crate::source::EntrySource;
use crate::view_state::cross_view::{find_exact, map_index};
use crate::view_state::layout::{layout, DisplayLine, LayoutResult};
use crate::view_state::overview::{
    bucketize, render_minimap, row_for_index, rows_for_range, OverviewBucket,
};
use crate::view_state::scroll::{clamp_offset, scroll_by, scroll_to_entry, ScrollAlign};
use crate::view_state::section::{build_sections, section_containing, Section};
use crate::view_state::types::{clamp_index, offset_index, ViewportDimensions};
use tracing::debug;

/// Default minimap width in columns.
pub const DEFAULT_MINIMAP_WIDTH: usize = 24;

/// Side effect requested by a command, performed by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write one section of `view_mode` as a stage file.
    ExportSection {
        /// View the section was computed from.
        view_mode: ViewMode,
        /// Section to export.
        section: Section,
    },
    /// Write every section of `view_mode`.
    ExportAll {
        /// View to export.
        view_mode: ViewMode,
    },
}

/// Outcome of applying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The new state.
    pub state: ViewState,
    /// Transient status message, shown until the next command.
    pub status: Option<String>,
    /// Work for the shell to carry out.
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(state: ViewState) -> Self {
        Self {
            state,
            status: None,
            effect: None,
        }
    }

    fn with_status(state: ViewState, status: impl Into<String>) -> Self {
        Self {
            state,
            status: Some(status.into()),
            effect: None,
        }
    }
}

/// Everything the presentation layer needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Visible slice of the detail layout.
    pub lines: Vec<DisplayLine>,
    /// One bucket per minimap row.
    pub minimap: Vec<OverviewBucket>,
    /// Painted minimap rows.
    pub minimap_lines: Vec<DisplayLine>,
    /// Minimap row of the cursor.
    pub cursor_row: usize,
    /// Status bar text.
    pub status_text: String,
    /// Lines in the full detail layout.
    pub total_lines: usize,
    /// First visible detail line.
    pub scroll_offset: usize,
}

/// Owns the entry source and viewport geometry; holds no navigation state.
#[derive(Debug)]
pub struct Navigator<S> {
    source: S,
    detail: ViewportDimensions,
    minimap_height: usize,
    minimap_width: usize,
}

impl<S: EntrySource> Navigator<S> {
    /// Create a navigator with default geometry.
    pub fn new(source: S) -> Self {
        let detail = ViewportDimensions::default();
        Self {
            source,
            detail,
            minimap_height: detail.rows(),
            minimap_width: DEFAULT_MINIMAP_WIDTH,
        }
    }

    /// Set the minimap width used when painting.
    pub fn with_minimap_width(mut self, width: usize) -> Self {
        self.minimap_width = width.max(2);
        self
    }

    /// The entry source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current detail viewport.
    pub fn viewport(&self) -> ViewportDimensions {
        self.detail
    }

    /// Record new pane geometry. The next render reflows.
    pub fn resize(&mut self, detail: ViewportDimensions, minimap_height: usize) {
        self.detail = detail;
        self.minimap_height = minimap_height;
    }

    /// Initial state: last entry active, top of the layout, everything
    /// expanded, reading focus.
    ///
    /// `view_mode` falls back to clean when there is no raw transcript.
    pub fn initial_state(&self, view_mode: ViewMode) -> ViewState {
        let state = ViewState {
            view_mode,
            active_index: usize::MAX,
            ..ViewState::default()
        };
        let mut state = self.normalize(state);
        state.scroll_offset = 0;
        state
    }

    /// Apply `command` to `state`.
    pub fn apply(&self, state: &ViewState, command: Command) -> Transition {
        let state = self.normalize(state.clone());
        debug!(
            command = command.name(),
            active = state.active_index,
            view = state.view_mode.name(),
            "Applying command"
        );

        let timeline_nav = state.focus_mode == FocusMode::TimelineNav;
        match command {
            Command::Next if timeline_nav => self.move_selection(state, 1),
            Command::Prev if timeline_nav => self.move_selection(state, -1),
            Command::Next => self.step(state, 1),
            Command::Prev => self.step(state, -1),
            Command::NextUser => self.jump_user(state, Direction::Next),
            Command::PrevUser => self.jump_user(state, Direction::Prev),
            Command::ToggleView => self.toggle_view(state),
            Command::ToggleLayout => self.toggle_layout(state),
            Command::ToggleFocus => self.toggle_focus(state),
            Command::CyclePreviewPosition => {
                let mut next = state;
                next.preview_position = next.preview_position.cycled();
                let status = format!("Preview: {}", next.preview_position.name());
                let align = next.preview_position.align();
                Transition::with_status(self.aligned(next, align), status)
            }
            Command::MoveSelection(delta) => self.move_selection(state, delta),
            Command::ConfirmSelection => self.confirm_selection(state),
            Command::JumpCheckpoint(direction) => self.jump_checkpoint(state, direction),
            Command::ToggleCollapse => self.toggle_collapse(state),
            Command::ToggleCollapseAll => self.toggle_collapse_all(state),
            Command::ToggleCheckpointOnly => self.toggle_checkpoint_only(state),
            Command::ScrollLines(delta) => self.scroll(state, delta),
            Command::Page(direction) => {
                let page = self.detail.rows().saturating_sub(1).max(1) as isize;
                self.scroll(state, page * direction.delta())
            }
            Command::ExportCurrentSection => self.export_current(state),
            Command::ExportAllSections => self.export_all(state),
        }
    }

    /// Build the frame for `state`.
    ///
    /// `status` overrides the default status summary.
    pub fn render(&self, state: &ViewState, status: Option<&str>) -> Frame {
        let state = self.normalize(state.clone());
        let laid = self.layout_for(&state);
        let total_lines = laid.total_lines();
        let start = state.scroll_offset.min(total_lines);
        let end = start.saturating_add(self.detail.rows()).min(total_lines);
        let lines = laid.lines[start..end].to_vec();

        let timeline = self.timeline(&state);
        let height = self.minimap_height;
        let minimap = bucketize(timeline, height);
        let cursor_row = row_for_index(self.timeline_index(&state), timeline.len(), height);
        let selected = if state.focus_mode == FocusMode::TimelineNav {
            build_sections(timeline)
                .get(state.timeline_selection)
                .map(|s| rows_for_range(s.start_index..=s.end_index, timeline.len(), height))
        } else {
            None
        };
        let minimap_lines = render_minimap(&minimap, cursor_row, selected, self.minimap_width);

        let status_text = status.map_or_else(|| self.summary(&state), str::to_string);

        Frame {
            lines,
            minimap,
            minimap_lines,
            cursor_row,
            status_text,
            total_lines,
            scroll_offset: start,
        }
    }

    // ===== Derived data =====

    fn entries(&self, state: &ViewState) -> &[Entry] {
        self.source.active_entries(state.view_mode)
    }

    fn timeline_is_active(&self, state: &ViewState) -> bool {
        self.source.raw_entries().is_empty() || state.view_mode == ViewMode::Raw
    }

    fn timeline(&self, state: &ViewState) -> &[Entry] {
        if self.timeline_is_active(state) {
            self.entries(state)
        } else {
            self.source.raw_entries()
        }
    }

    /// Position of the active entry within the timeline sequence.
    fn timeline_index(&self, state: &ViewState) -> usize {
        if self.timeline_is_active(state) {
            state.active_index
        } else {
            map_index(self.entries(state), state.active_index, self.source.raw_entries())
        }
    }

    fn layout_for(&self, state: &ViewState) -> LayoutResult {
        let entries = self.entries(state);
        let sections = build_sections(entries);
        layout(entries, &sections, state, self.detail.content_width())
    }

    fn normalize(&self, mut state: ViewState) -> ViewState {
        if self.source.raw_entries().is_empty() {
            state.view_mode = ViewMode::Clean;
        }
        let entries = self.entries(&state);
        state.active_index = clamp_index(state.active_index, entries.len());
        let section_count = build_sections(entries).len();
        state.collapsed_sections.retain(|&id| id < section_count);
        let timeline_sections = build_sections(self.timeline(&state)).len();
        state.timeline_selection = clamp_index(state.timeline_selection, timeline_sections);

        let laid = self.layout_for(&state);
        state.scroll_offset = clamp_offset(state.scroll_offset, laid.total_lines(), self.detail.rows());
        state
    }

    fn aligned(&self, mut state: ViewState, align: ScrollAlign) -> ViewState {
        let laid = self.layout_for(&state);
        state.scroll_offset = scroll_to_entry(&laid, state.active_index, self.detail.rows(), align);
        state
    }

    /// Expand the section holding the active entry, if collapsed.
    fn expand_active(&self, state: &mut ViewState) {
        let sections = build_sections(self.entries(state));
        if let Some(id) = section_containing(&sections, state.active_index) {
            state.collapsed_sections.remove(&id);
        }
    }

    // ===== Handlers =====

    fn step(&self, mut state: ViewState, delta: isize) -> Transition {
        let len = self.entries(&state).len();
        if len == 0 {
            return Transition::with_status(state, "No entries");
        }
        state.active_index = offset_index(state.active_index, delta, len);
        self.expand_active(&mut state);
        Transition::to(self.aligned(state, ScrollAlign::Bottom))
    }

    fn jump_user(&self, mut state: ViewState, direction: Direction) -> Transition {
        let entries = self.entries(&state);
        let active = state.active_index;
        let found = match direction {
            Direction::Next => entries
                .iter()
                .enumerate()
                .skip(active + 1)
                .find(|(_, e)| e.kind == EntryKind::User)
                .map(|(i, _)| i),
            Direction::Prev => entries
                .get(..active)
                .and_then(|before| before.iter().rposition(|e| e.kind == EntryKind::User)),
        };

        let Some(target) = found else {
            let status = match direction {
                Direction::Next => "No later user message",
                Direction::Prev => "No earlier user message",
            };
            return Transition::with_status(state, status);
        };

        state.active_index = target;
        self.expand_active(&mut state);
        let align = state.preview_position.align();
        Transition::to(self.aligned(state, align))
    }

    fn jump_checkpoint(&self, state: ViewState, direction: Direction) -> Transition {
        let timeline = self.timeline(&state);
        let cursor = self.timeline_index(&state);
        let found = match direction {
            Direction::Next => (cursor + 1..timeline.len()).find(|&i| timeline[i].is_checkpoint()),
            Direction::Prev => (0..cursor.min(timeline.len()))
                .rev()
                .find(|&i| timeline[i].is_checkpoint()),
        };

        match found {
            Some(target) => {
                let title = timeline[target].checkpoint_title();
                let next = self.land_on_timeline(state, target);
                Transition {
                    status: title,
                    ..Transition::to(next)
                }
            }
            None => {
                let status = match direction {
                    Direction::Next => "No later checkpoint",
                    Direction::Prev => "No earlier checkpoint",
                };
                Transition::with_status(state, status)
            }
        }
    }

    /// Make timeline entry `target` active, switching to the raw view when
    /// the active view has no exact counterpart.
    fn land_on_timeline(&self, mut state: ViewState, target: usize) -> ViewState {
        if self.timeline_is_active(&state) {
            state.active_index = target;
        } else {
            match find_exact(self.source.raw_entries(), target, self.entries(&state)) {
                Some(index) => state.active_index = index,
                None => {
                    state.view_mode = ViewMode::Raw;
                    state.collapsed_sections.clear();
                    state.active_index = target;
                }
            }
        }
        self.expand_active(&mut state);

        if state.focus_mode == FocusMode::TimelineNav {
            let sections = build_sections(self.timeline(&state));
            if let Some(id) = section_containing(&sections, self.timeline_index(&state)) {
                state.timeline_selection = id;
            }
        }

        let align = state.preview_position.align();
        self.aligned(state, align)
    }

    fn toggle_view(&self, mut state: ViewState) -> Transition {
        let raw = self.source.raw_entries();
        if raw.is_empty() {
            return Transition::with_status(state, "Raw transcript not available");
        }

        let target_mode = state.view_mode.toggled();
        let from = self.entries(&state);
        let to = self.source.active_entries(target_mode);
        state.active_index = clamp_index(map_index(from, state.active_index, to), to.len());
        state.view_mode = target_mode;
        state.collapsed_sections.clear();

        let state = self.normalize(state);
        let align = state.preview_position.align();
        let status = match target_mode {
            ViewMode::Raw => "Raw transcript view",
            ViewMode::Clean => "Clean view",
        };
        Transition::with_status(self.aligned(state, align), status)
    }

    fn toggle_layout(&self, mut state: ViewState) -> Transition {
        state.layout_mode = state.layout_mode.toggled();
        let status = format!("Layout: {}", state.layout_mode.name());
        let align = state.preview_position.align();
        Transition::with_status(self.aligned(state, align), status)
    }

    fn toggle_focus(&self, mut state: ViewState) -> Transition {
        match state.focus_mode {
            FocusMode::Reading => {
                let timeline = self.timeline(&state);
                let sections = build_sections(timeline);
                let selection =
                    section_containing(&sections, self.timeline_index(&state)).unwrap_or(0);
                let status = sections
                    .get(selection)
                    .map_or_else(|| "Timeline".to_string(), |s| format!("Timeline: {}", s.title));
                state.focus_mode = FocusMode::TimelineNav;
                state.timeline_selection = selection;
                Transition::with_status(state, status)
            }
            FocusMode::TimelineNav => {
                state.focus_mode = FocusMode::Reading;
                Transition::with_status(state, "Reading")
            }
        }
    }

    fn move_selection(&self, mut state: ViewState, delta: isize) -> Transition {
        if state.focus_mode != FocusMode::TimelineNav {
            return Transition::with_status(state, "Timeline is not focused");
        }
        let sections = build_sections(self.timeline(&state));
        if sections.is_empty() {
            return Transition::with_status(state, "No sections");
        }
        state.timeline_selection = offset_index(state.timeline_selection, delta, sections.len());
        let section = &sections[state.timeline_selection];
        let status = format!(
            "{}/{} {}",
            state.timeline_selection + 1,
            sections.len(),
            section.title
        );
        Transition::with_status(state, status)
    }

    fn confirm_selection(&self, state: ViewState) -> Transition {
        if state.focus_mode != FocusMode::TimelineNav {
            return Transition::with_status(state, "Timeline is not focused");
        }
        let sections = build_sections(self.timeline(&state));
        let Some(section) = sections.get(state.timeline_selection) else {
            return Transition::with_status(state, "Not available");
        };
        let title = section.title.clone();
        let next = self.land_on_timeline(state, section.anchor_index());
        Transition::with_status(next, title)
    }

    fn toggle_collapse(&self, mut state: ViewState) -> Transition {
        if state.layout_mode != LayoutMode::Thread {
            return Transition::with_status(state, "Collapse needs thread layout");
        }
        let sections = build_sections(self.entries(&state));
        let Some(id) = section_containing(&sections, state.active_index) else {
            return Transition::with_status(state, "Nothing to collapse");
        };

        let status = if state.collapsed_sections.remove(&id) {
            "Section expanded"
        } else {
            state.collapsed_sections.insert(id);
            "Section collapsed"
        };
        let align = state.preview_position.align();
        Transition::with_status(self.aligned(state, align), status)
    }

    fn toggle_collapse_all(&self, mut state: ViewState) -> Transition {
        if state.layout_mode != LayoutMode::Thread {
            return Transition::with_status(state, "Collapse needs thread layout");
        }
        let count = build_sections(self.entries(&state)).len();
        if count == 0 {
            return Transition::with_status(state, "Nothing to collapse");
        }

        let status = if state.collapsed_sections.len() == count {
            state.collapsed_sections.clear();
            "All sections expanded"
        } else {
            state.collapsed_sections = (0..count).collect();
            "All sections collapsed"
        };
        let align = state.preview_position.align();
        Transition::with_status(self.aligned(state, align), status)
    }

    fn toggle_checkpoint_only(&self, mut state: ViewState) -> Transition {
        if state.layout_mode != LayoutMode::Thread {
            return Transition::with_status(state, "Checkpoint-only needs thread layout");
        }
        state.checkpoint_only = !state.checkpoint_only;
        let status = if state.checkpoint_only {
            "Checkpoints only"
        } else {
            "All entries"
        };
        let align = state.preview_position.align();
        Transition::with_status(self.aligned(state, align), status)
    }

    fn scroll(&self, mut state: ViewState, delta: isize) -> Transition {
        let total = self.layout_for(&state).total_lines();
        state.scroll_offset = scroll_by(state.scroll_offset, delta, total, self.detail.rows());
        Transition::to(state)
    }

    fn export_current(&self, state: ViewState) -> Transition {
        let sections = build_sections(self.entries(&state));
        let Some(section) = section_containing(&sections, state.active_index)
            .and_then(|id| sections.get(id).cloned())
        else {
            return Transition::with_status(state, "Nothing to export");
        };
        let view_mode = state.view_mode;
        Transition {
            effect: Some(Effect::ExportSection { view_mode, section }),
            ..Transition::to(state)
        }
    }

    fn export_all(&self, state: ViewState) -> Transition {
        if self.entries(&state).is_empty() {
            return Transition::with_status(state, "Nothing to export");
        }
        let view_mode = state.view_mode;
        Transition {
            effect: Some(Effect::ExportAll { view_mode }),
            ..Transition::to(state)
        }
    }

    /// Default status bar text.
    fn summary(&self, state: &ViewState) -> String {
        let entries = self.entries(state);
        if entries.is_empty() {
            return "No entries".to_string();
        }
        let sections = build_sections(entries);
        let section = section_containing(&sections, state.active_index)
            .and_then(|id| sections.get(id))
            .map_or("", |s| s.title.as_str());
        let focus = match state.focus_mode {
            FocusMode::Reading => "reading",
            FocusMode::TimelineNav => "timeline",
        };
        format!(
            "{}/{} · {} · {} · {} · {}",
            state.active_index + 1,
            entries.len(),
            state.view_mode.name(),
            state.layout_mode.name(),
            focus,
            section
        )
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
