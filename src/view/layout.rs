//! Pane layout rendering.
//!
//! Detail pane on the left, minimap on the right, status bar at the bottom.
//! Geometry is computed separately from painting so the shell can report
//! pane sizes to the navigator before building a frame.

use crate::state::Frame as NavFrame;
use crate::view::styles::HintStyles;
use crate::view_state::layout::DisplayLine;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneAreas {
    /// Entry detail text.
    pub detail: Rect,
    /// Minimap including its left border.
    pub minimap: Rect,
    /// Minimap rows inside the border.
    pub minimap_inner: Rect,
    /// One-line status bar.
    pub status: Rect,
}

/// Split `area` into panes. The minimap takes `minimap_width` columns plus
/// a one-column border, never more than half the screen.
pub fn pane_areas(area: Rect, minimap_width: u16) -> PaneAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let minimap_cols = minimap_width.saturating_add(1).min(area.width / 2);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(minimap_cols)])
        .split(vertical[0]);

    let minimap = horizontal[1];
    PaneAreas {
        detail: horizontal[0],
        minimap,
        minimap_inner: minimap_block().inner(minimap),
        status: vertical[1],
    }
}

fn minimap_block() -> Block<'static> {
    Block::default().borders(Borders::LEFT)
}

fn styled_lines(lines: &[DisplayLine], styles: &HintStyles) -> Vec<Line<'static>> {
    lines
        .iter()
        .map(|line| Line::from(Span::styled(line.text.clone(), styles.style(line.style))))
        .collect()
}

/// Paint a navigator frame into the given areas.
pub fn render_layout(frame: &mut Frame, areas: &PaneAreas, nav: &NavFrame, styles: &HintStyles) {
    frame.render_widget(Paragraph::new(styled_lines(&nav.lines, styles)), areas.detail);

    frame.render_widget(
        Paragraph::new(styled_lines(&nav.minimap_lines, styles)).block(minimap_block()),
        areas.minimap,
    );

    frame.render_widget(
        Paragraph::new(Line::from(nav.status_text.clone())).style(styles.status_bar()),
        areas.status,
    );
}
