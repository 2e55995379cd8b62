//! Input state management for the TUI
//!
//! Handles the input modes (normal, path editing, help) and the file path
//! buffer of the upload form.

use crossterm::event::KeyCode;
use std::path::PathBuf;

/// Current input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Typing the dataset path
    EditingPath,
    /// Help overlay is shown
    Help,
}

/// What the app should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Submit,
    Download,
    DismissAlert,
    Quit,
}

/// Complete input state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub mode: InputMode,
    /// Path of the dataset to upload, as typed
    pub path: String,
}

impl InputState {
    pub fn new(initial: Option<PathBuf>) -> Self {
        Self {
            mode: InputMode::Normal,
            path: initial
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.mode == InputMode::EditingPath
    }

    pub fn is_help(&self) -> bool {
        self.mode == InputMode::Help
    }

    /// The selected file, `None` when nothing has been entered
    pub fn selected_file(&self) -> Option<PathBuf> {
        let trimmed = self.path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }

    pub fn start_editing(&mut self) {
        self.mode = InputMode::EditingPath;
    }

    pub fn show_help(&mut self) {
        self.mode = InputMode::Help;
    }

    pub fn close(&mut self) {
        self.mode = InputMode::Normal;
    }

    pub fn push_char(&mut self, c: char) {
        self.path.push(c);
    }

    pub fn backspace(&mut self) {
        self.path.pop();
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    /// Apply a key press to the input state and report the resulting action
    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        match self.mode {
            InputMode::Help => {
                self.close();
                Action::None
            }
            InputMode::EditingPath => match code {
                KeyCode::Enter => {
                    self.close();
                    Action::Submit
                }
                KeyCode::Esc => {
                    self.close();
                    Action::None
                }
                KeyCode::Backspace => {
                    self.backspace();
                    Action::None
                }
                KeyCode::Char(c) => {
                    self.push_char(c);
                    Action::None
                }
                _ => Action::None,
            },
            InputMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                KeyCode::Char('?') | KeyCode::Char('h') => {
                    self.show_help();
                    Action::None
                }
                KeyCode::Char('e') | KeyCode::Char('i') => {
                    self.start_editing();
                    Action::None
                }
                KeyCode::Enter | KeyCode::Char('u') => Action::Submit,
                KeyCode::Char('d') => Action::Download,
                KeyCode::Char('x') => Action::DismissAlert,
                _ => Action::None,
            },
        }
    }
}
