//! Action context and input mode logic for mediascope.
//!
//! Contains the [ActionContext] struct, tracking the line editor used by prompts:
//! path entry for adding files/directories, the filter line and settings edits.

use crate::app::settings::SettingField;

/// Describes the current mode for action handling/input.
///
/// Variants:
/// * `Normal` - Keys go through the keymap.
/// * `Input` - A prompt owns the keyboard, see [InputMode].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionMode {
    Normal,
    Input { mode: InputMode, prompt: String },
}

/// Enumerates all the available input field modes
///
/// Variants:
/// * `AddPaths` - File or directory path to scan, replacing or appending to the file set.
/// * `Filter` - Live filter of the active tab.
/// * `EditSetting` - Free text value of a settings field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    AddPaths { append: bool, directory: bool },
    Filter,
    EditSetting(SettingField),
}

/// Tracks current user action and input buffer state.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone)]
pub struct ActionContext {
    mode: ActionMode,
    input_buffer: String,
    input_cursor_pos: usize,
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            mode: ActionMode::Normal,
            input_buffer: String::new(),
            input_cursor_pos: 0,
        }
    }
}

impl ActionContext {
    // Getters / accessors

    pub fn mode(&self) -> &ActionMode {
        &self.mode
    }

    pub fn input_mode(&self) -> Option<InputMode> {
        match self.mode {
            ActionMode::Input { mode, .. } => Some(mode),
            ActionMode::Normal => None,
        }
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn input_cursor_pos(&self) -> usize {
        self.input_cursor_pos
    }

    // Mode functions

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, ActionMode::Input { .. })
    }

    pub fn enter_mode(&mut self, mode: InputMode, prompt: impl Into<String>, initial: &str) {
        self.mode = ActionMode::Input {
            mode,
            prompt: prompt.into(),
        };
        self.input_buffer = initial.to_string();
        self.input_cursor_pos = self.input_buffer.len();
    }

    /// Leaves input mode, handing back the buffer.
    pub fn exit_mode(&mut self) -> String {
        self.mode = ActionMode::Normal;
        self.input_cursor_pos = 0;
        std::mem::take(&mut self.input_buffer)
    }

    // Line editing

    /// Moves the input cursor one character to the left, if possible.
    pub fn action_move_cursor_left(&mut self) {
        if let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_cursor_pos = previous;
        }
    }

    /// Moves the input cursor one character to the right, if possible.
    pub fn action_move_cursor_right(&mut self) {
        if let Some(ch) = self.input_buffer[self.input_cursor_pos..].chars().next() {
            self.input_cursor_pos += ch.len_utf8();
        }
    }

    /// Inserts a character at the current cursor position in the input buffer.
    pub fn action_insert_at_cursor(&mut self, ch: char) {
        self.input_buffer.insert(self.input_cursor_pos, ch);
        self.input_cursor_pos += ch.len_utf8();
    }

    /// Deletes the character before the current cursor position in the input buffer.
    ///
    /// Moves the cursor back accordingly
    pub fn action_backspace_at_cursor(&mut self) {
        if self.input_cursor_pos > 0
            && let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
                .char_indices()
                .next_back()
        {
            self.input_buffer.remove(previous);
            self.input_cursor_pos = previous;
        }
    }

    /// Deletes the character at the current cursor position in the input buffer.
    pub fn action_delete_at_cursor(&mut self) {
        if self.input_cursor_pos < self.input_buffer.len() {
            self.input_buffer.remove(self.input_cursor_pos);
        }
    }

    pub fn action_cursor_home(&mut self) {
        self.input_cursor_pos = 0;
    }

    pub fn action_cursor_end(&mut self) {
        self.input_cursor_pos = self.input_buffer.len();
    }
}
