//! Navigation commands independent of key bindings.

/// Direction for relative moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the end of the transcript.
    Next,
    /// Toward the start of the transcript.
    Prev,
}

impl Direction {
    /// `+1` for `Next`, `-1` for `Prev`.
    pub fn delta(self) -> isize {
        match self {
            Direction::Next => 1,
            Direction::Prev => -1,
        }
    }
}

/// Discrete navigation commands accepted by the navigation controller.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm key events to commands is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Entry cursor
    /// Move the active entry forward by one. Default: j/↓
    Next,
    /// Move the active entry back by one. Default: k/↑
    Prev,
    /// Jump to the next user turn. Default: J
    NextUser,
    /// Jump to the previous user turn. Default: K
    PrevUser,

    // Views
    /// Switch between clean and raw transcript. Default: v
    ToggleView,
    /// Switch between thread and flat list layout. Default: L
    ToggleLayout,
    /// Switch between reading and timeline navigation. Default: Tab
    ToggleFocus,
    /// Cycle where jumped-to entries land in the viewport. Default: p
    CyclePreviewPosition,

    // Timeline
    /// Move the timeline selection by the given number of sections. Default: ]/[
    MoveSelection(isize),
    /// Jump to the selected timeline section. Default: Enter
    ConfirmSelection,
    /// Jump to the nearest checkpoint in a direction. Default: n/N
    JumpCheckpoint(Direction),

    // Sections
    /// Collapse or expand the section holding the active entry. Default: Space
    ToggleCollapse,
    /// Collapse every section, or expand all when all are collapsed. Default: z
    ToggleCollapseAll,
    /// Show only checkpoint entries. Default: c
    ToggleCheckpointOnly,

    // Viewport
    /// Scroll the viewport by a number of lines without moving the cursor. Default: Ctrl+e/Ctrl+y
    ScrollLines(isize),
    /// Scroll the viewport by whole pages. Default: PageDown/PageUp
    Page(Direction),

    // Export
    /// Export the section holding the active entry. Default: e
    ExportCurrentSection,
    /// Export every section. Default: E
    ExportAllSections,
}

impl Command {
    /// Short name used in logs and help text.
    pub fn name(self) -> &'static str {
        match self {
            Command::Next => "next",
            Command::Prev => "prev",
            Command::NextUser => "next-user",
            Command::PrevUser => "prev-user",
            Command::ToggleView => "toggle-view",
            Command::ToggleLayout => "toggle-layout",
            Command::ToggleFocus => "toggle-focus",
            Command::CyclePreviewPosition => "cycle-preview-position",
            Command::MoveSelection(_) => "move-selection",
            Command::ConfirmSelection => "confirm-selection",
            Command::JumpCheckpoint(_) => "jump-checkpoint",
            Command::ToggleCollapse => "toggle-collapse",
            Command::ToggleCollapseAll => "toggle-collapse-all",
            Command::ToggleCheckpointOnly => "toggle-checkpoint-only",
            Command::ScrollLines(_) => "scroll-lines",
            Command::Page(_) => "page",
            Command::ExportCurrentSection => "export-current-section",
            Command::ExportAllSections => "export-all-sections",
        }
    }
}
