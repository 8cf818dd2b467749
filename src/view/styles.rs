//! Style hint coloring.
//!
//! The core tags every display line with a [`StyleHint`]; this module turns
//! hints into ratatui styles.

use crate::model::EntryKind;
use crate::view_state::layout::StyleHint;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag or `color = false` in the config file
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from the resolved color setting and environment.
    ///
    /// Priority (first match wins):
    /// 1. `color_wanted == false` (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_setting(color_wanted: bool) -> Self {
        let enabled = color_wanted && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Explicit setting, ignoring the environment.
    pub fn fixed(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== HintStyles =====

/// Maps style hints to terminal styles.
///
/// Without color only modifiers are used, so emphasis and dimming survive
/// monochrome terminals.
#[derive(Debug, Clone, Copy)]
pub struct HintStyles {
    colors: ColorConfig,
}

impl HintStyles {
    /// Styles for the given color configuration.
    pub fn new(colors: ColorConfig) -> Self {
        Self { colors }
    }

    /// Style for one hint.
    pub fn style(&self, hint: StyleHint) -> Style {
        match hint {
            StyleHint::Normal => Style::default(),
            StyleHint::Dim if self.colors.colors_enabled() => Style::default().fg(Color::DarkGray),
            StyleHint::Dim => Style::default().add_modifier(Modifier::DIM),
            StyleHint::Emphasis if self.colors.colors_enabled() => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            StyleHint::Emphasis => Style::default().add_modifier(Modifier::BOLD),
            StyleHint::Role(kind) if self.colors.colors_enabled() => {
                Style::default().fg(role_color(kind))
            }
            StyleHint::Role(_) => Style::default(),
        }
    }

    /// Status bar style.
    pub fn status_bar(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

fn role_color(kind: EntryKind) -> Color {
    match kind {
        EntryKind::User => Color::Cyan,
        EntryKind::Assistant => Color::Green,
        EntryKind::ToolCall => Color::Yellow,
        EntryKind::ToolResult => Color::Gray,
        EntryKind::System => Color::Red,
        EntryKind::FileSnapshot => Color::Magenta,
        EntryKind::Summary => Color::Blue,
        EntryKind::Queue | EntryKind::Unknown => Color::DarkGray,
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn roles_get_distinct_colors() {
        let styles = HintStyles::new(ColorConfig::fixed(true));
        assert_eq!(
            styles.style(StyleHint::Role(EntryKind::User)).fg,
            Some(Color::Cyan)
        );
        assert_eq!(
            styles.style(StyleHint::Role(EntryKind::Assistant)).fg,
            Some(Color::Green)
        );
        assert_ne!(
            styles.style(StyleHint::Role(EntryKind::ToolCall)),
            styles.style(StyleHint::Role(EntryKind::System))
        );
    }

    #[test]
    fn no_color_keeps_modifiers_only() {
        let styles = HintStyles::new(ColorConfig::fixed(false));
        assert_eq!(styles.style(StyleHint::Role(EntryKind::User)), Style::default());
        assert_eq!(
            styles.style(StyleHint::Emphasis),
            Style::default().add_modifier(Modifier::BOLD)
        );
        assert_eq!(styles.style(StyleHint::Dim).fg, None);
    }

    #[test]
    #[serial(no_color_env)]
    fn no_color_env_disables_colors() {
        std::env::set_var("NO_COLOR", "1");
        let config = ColorConfig::from_env_and_setting(true);
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled());
    }

    #[test]
    #[serial(no_color_env)]
    fn setting_disables_colors_without_env() {
        std::env::remove_var("NO_COLOR");
        assert!(!ColorConfig::from_env_and_setting(false).colors_enabled());
        assert!(ColorConfig::from_env_and_setting(true).colors_enabled());
    }
}
