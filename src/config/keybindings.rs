//! Keyboard bindings configuration.

use crate::model::{Command, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// What a key does in the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Forward a command to the navigation controller.
    Run(Command),
    /// Leave the application.
    Quit,
}

/// Maps keyboard events to actions.
///
/// Provides default vim-style bindings.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only code and modifiers are compared; event kind and state are ignored.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }

    fn run(&mut self, code: KeyCode, modifiers: KeyModifiers, command: Command) {
        self.bind(code, modifiers, KeyAction::Run(command));
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use KeyCode::{Char, Down, Enter, Esc, PageDown, PageUp, Tab, Up};

        let none = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let ctrl = KeyModifiers::CONTROL;
        let mut keys = Self {
            bindings: HashMap::new(),
        };

        // Entry cursor
        keys.run(Char('j'), none, Command::Next);
        keys.run(Down, none, Command::Next);
        keys.run(Char('k'), none, Command::Prev);
        keys.run(Up, none, Command::Prev);
        keys.run(Char('J'), shift, Command::NextUser);
        keys.run(Char('K'), shift, Command::PrevUser);

        // Views
        keys.run(Char('v'), none, Command::ToggleView);
        keys.run(Char('L'), shift, Command::ToggleLayout);
        keys.run(Tab, none, Command::ToggleFocus);
        keys.run(Char('p'), none, Command::CyclePreviewPosition);

        // Timeline
        keys.run(Char(']'), none, Command::MoveSelection(1));
        keys.run(Char('['), none, Command::MoveSelection(-1));
        keys.run(Enter, none, Command::ConfirmSelection);
        keys.run(Char('n'), none, Command::JumpCheckpoint(Direction::Next));
        keys.run(Char('N'), shift, Command::JumpCheckpoint(Direction::Prev));

        // Sections
        keys.run(Char(' '), none, Command::ToggleCollapse);
        keys.run(Char('z'), none, Command::ToggleCollapseAll);
        keys.run(Char('c'), none, Command::ToggleCheckpointOnly);

        // Viewport
        keys.run(Char('e'), ctrl, Command::ScrollLines(1));
        keys.run(Char('y'), ctrl, Command::ScrollLines(-1));
        keys.run(PageDown, none, Command::Page(Direction::Next));
        keys.run(Char('d'), ctrl, Command::Page(Direction::Next));
        keys.run(PageUp, none, Command::Page(Direction::Prev));
        keys.run(Char('u'), ctrl, Command::Page(Direction::Prev));

        // Export
        keys.run(Char('e'), none, Command::ExportCurrentSection);
        keys.run(Char('E'), shift, Command::ExportAllSections);

        // Application
        keys.bind(Char('q'), none, KeyAction::Quit);
        keys.bind(Esc, none, KeyAction::Quit);
        keys.bind(Char('c'), ctrl, KeyAction::Quit);

        keys
    }
}
