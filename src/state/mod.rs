//! UI state machine (pure).
//!
//! All state transitions are pure functions testable without TUI.

pub mod nav_state;
pub mod navigation;

// Re-export for convenience
pub use nav_state::{FocusMode, LayoutMode, PreviewPosition, ViewMode, ViewState};
pub use navigation::{Effect, Frame, Navigator, Transition, DEFAULT_MINIMAP_WIDTH};
