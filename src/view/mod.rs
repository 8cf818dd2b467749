//! TUI rendering and terminal management (impure shell)

mod layout;
mod styles;

pub use layout::{pane_areas, PaneAreas};
pub use styles::{ColorConfig, HintStyles};

use crate::config::{KeyAction, KeyBindings, ResolvedConfig};
use crate::export::{export_all, export_section, ViewSections};
use crate::model::{AppError, Command};
use crate::source::{EntrySource, Transcript};
use crate::state::{Effect, Navigator, PreviewPosition, ViewMode, ViewState};
use crate::view_state::types::ViewportDimensions;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Shell settings taken from the resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOptions {
    /// Where stage exports go.
    pub export_dir: PathBuf,
    /// Minimap pane width in columns.
    pub minimap_width: u16,
    /// Initial preview alignment.
    pub preview_position: PreviewPosition,
    /// Open the raw view first.
    pub start_in_raw: bool,
    /// Colored output.
    pub colors: ColorConfig,
}

impl From<&ResolvedConfig> for ShellOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            export_dir: config.export_dir.clone(),
            minimap_width: u16::try_from(config.minimap_width).unwrap_or(u16::MAX),
            preview_position: config.preview_position,
            start_in_raw: config.start_in_raw,
            colors: ColorConfig::from_env_and_setting(config.color),
        }
    }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    navigator: Navigator<Transcript>,
    state: ViewState,
    status: Option<String>,
    key_bindings: KeyBindings,
    styles: HintStyles,
    options: ShellOptions,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen. A failure after
    /// raw mode is on leaves the terminal restored.
    pub fn new(transcript: Transcript, options: ShellOptions) -> Result<Self, AppError> {
        enable_raw_mode()?;
        let terminal = undo_on_error(enter_alternate_screen(), || {
            if let Err(err) = restore_terminal() {
                warn!(error = %err, "Failed to restore terminal after setup error");
            }
        })?;
        Ok(Self::with_terminal(terminal, transcript, options))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Blocks on terminal events; nothing
    /// happens between them.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.draw()?;

        loop {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if self.handle_key(key) {
                        return Ok(());
                    }
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "Terminal resized");
                }
                _ => continue,
            }
            self.draw()?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn with_terminal(terminal: Terminal<B>, transcript: Transcript, options: ShellOptions) -> Self {
        let navigator =
            Navigator::new(transcript).with_minimap_width(usize::from(options.minimap_width));
        let view_mode = if options.start_in_raw {
            ViewMode::Raw
        } else {
            ViewMode::Clean
        };
        let state = ViewState {
            preview_position: options.preview_position,
            ..navigator.initial_state(view_mode)
        };

        Self {
            terminal,
            navigator,
            state,
            status: None,
            key_bindings: KeyBindings::default(),
            styles: HintStyles::new(options.colors),
            options,
        }
    }

    /// Handle a key. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.key_bindings.get(key) {
            Some(KeyAction::Quit) => true,
            Some(KeyAction::Run(command)) => {
                self.handle_command(command);
                false
            }
            None => false,
        }
    }

    fn handle_command(&mut self, command: Command) {
        let transition = self.navigator.apply(&self.state, command);
        self.state = transition.state;
        self.status = transition.status;
        if let Some(effect) = transition.effect {
            self.status = Some(self.perform(effect));
        }
    }

    /// Carry out an effect, returning the status message to show.
    fn perform(&self, effect: Effect) -> String {
        let dir = &self.options.export_dir;
        let result = match effect {
            Effect::ExportSection { view_mode, section } => {
                let access = ViewSections::new(self.navigator.source().active_entries(view_mode));
                export_section(dir, &access, &section).map(|path| vec![path])
            }
            Effect::ExportAll { view_mode } => {
                let access = ViewSections::new(self.navigator.source().active_entries(view_mode));
                export_all(dir, &access)
            }
        };

        match result {
            Ok(paths) => {
                info!(count = paths.len(), dir = %dir.display(), "Export finished");
                format!("Exported {} stage(s) to {}", paths.len(), dir.display())
            }
            Err(err) => {
                warn!(error = %err, "Export failed");
                format!("Export failed: {err}")
            }
        }
    }

    /// Render the current frame
    ///
    /// Reports pane geometry to the navigator first so layout reflows on
    /// resize.
    fn draw(&mut self) -> Result<(), AppError> {
        let size = self.terminal.size()?;
        let areas = pane_areas(
            Rect::new(0, 0, size.width, size.height),
            self.options.minimap_width,
        );
        self.navigator.resize(
            ViewportDimensions::new(areas.detail.width, areas.detail.height),
            usize::from(areas.minimap_inner.height),
        );

        let frame = self.navigator.render(&self.state, self.status.as_deref());
        let styles = self.styles;
        self.terminal.draw(|f| {
            layout::render_layout(f, &areas, &frame, &styles);
        })?;
        Ok(())
    }
}

/// Initialize and run the TUI application
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_transcript(transcript: Transcript, config: &ResolvedConfig) -> Result<(), AppError> {
    let mut app = TuiApp::new(transcript, ShellOptions::from(config))?;
    let result = app.run();
    restore_terminal()?;
    result
}

fn enter_alternate_screen() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Run `undo` when `result` is an error, then hand the result back.
fn undo_on_error<T, E>(result: Result<T, E>, undo: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        undo();
    }
    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), AppError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
