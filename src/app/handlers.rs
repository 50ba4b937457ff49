//! Input action handler methods for mediascope.
//!
//! This module implements [Session] methods that process key events for the prompts
//! and for each action group. Most actions depend on the active tab.

use crate::app::actions::InputMode;
use crate::app::keymap::{FileAction, NavAction, SystemAction, TabAction, ViewAction};
use crate::app::state::{KeypressResult, Session, ViewMode};
use crate::app::tab::TabKind;
use crate::core::worker::ScopeKind;
use crate::utils::{expand_home_path, parse_dropped_paths};

use crossterm::event::{KeyCode::*, KeyEvent, KeyModifiers};
use std::path::PathBuf;

/// Session input and action handlers
impl Session {
    // Session core handlers

    /// Handles key events when in an input mode (paths, filter, settings).
    /// Returns a [KeypressResult] indicating how the key event was handled.
    ///
    /// If not in an input mode, returns [KeypressResult::Continue].
    pub(super) fn handle_input_mode(&mut self, key: KeyEvent) -> KeypressResult {
        let Some(mode) = self.actions.input_mode() else {
            return KeypressResult::Continue;
        };

        match key.code {
            Enter => {
                let text = self.actions.exit_mode();
                match mode {
                    InputMode::AddPaths { append, .. } => self.confirm_paths(&text, append),
                    InputMode::Filter => self.flush_queries(),
                    InputMode::EditSetting(field) => self.settings.set_text(field, &text),
                }
            }

            Esc => {
                self.actions.exit_mode();
                if mode == InputMode::Filter {
                    self.clear_active_query();
                }
            }

            Left => self.actions.action_move_cursor_left(),
            Right => self.actions.action_move_cursor_right(),
            Home => self.actions.action_cursor_home(),
            End => self.actions.action_cursor_end(),

            Backspace => {
                self.actions.action_backspace_at_cursor();
                self.sync_filter_input();
            }

            Delete => {
                self.actions.action_delete_at_cursor();
                self.sync_filter_input();
            }

            Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.actions.action_insert_at_cursor(c);
                self.sync_filter_input();
            }

            _ => {}
        }
        KeypressResult::Consumed
    }

    /// Handles cursor, scroll and paging actions within the active tab.
    pub(super) fn handle_nav_action(&mut self, action: NavAction) -> KeypressResult {
        let tab = self.workspace.current_tab().clone();
        match (action, tab) {
            (NavAction::Up, TabKind::List) => self.move_list_selection(-1),
            (NavAction::Down, TabKind::List) => self.move_list_selection(1),
            (NavAction::Left, TabKind::List) if self.view_mode == ViewMode::Grid => {
                self.move_sort_cursor(-1)
            }
            (NavAction::Right, TabKind::List) if self.view_mode == ViewMode::Grid => {
                self.move_sort_cursor(1)
            }

            (NavAction::Up, TabKind::Details(_)) => self.scroll_details(-1),
            (NavAction::Down, TabKind::Details(_)) => self.scroll_details(1),
            (NavAction::Left, TabKind::Details(_)) => self.move_details_cursor(-1),
            (NavAction::Right, TabKind::Details(_)) => self.move_details_cursor(1),

            (NavAction::Down | NavAction::NextPage, TabKind::About) => self.next_param_page(),
            (NavAction::Up | NavAction::PrevPage, TabKind::About) => self.prev_param_page(),
            (NavAction::PageSize, TabKind::About) => self.cycle_page_size(),

            (NavAction::Up, TabKind::Config) => self.settings.select_prev(),
            (NavAction::Down, TabKind::Config) => self.settings.select_next(),

            _ => return KeypressResult::Continue,
        }
        KeypressResult::Consumed
    }

    pub(super) fn handle_tab_action(&mut self, action: TabAction) -> KeypressResult {
        match action {
            TabAction::Next => self.workspace.switch(1),
            TabAction::Prev => self.workspace.switch(-1),
            TabAction::Close => self.close_current_tab(),
            TabAction::Switch(n) => self.workspace.set_active(n.saturating_sub(1) as usize),
            TabAction::About => self.show_about(),
            TabAction::Settings => self.show_settings(),
        }
        KeypressResult::Consumed
    }

    /// Handles actions on the file set and on single files.
    ///
    /// Single file actions apply to the list cursor or to the file of the active details tab.
    pub(super) fn handle_file_action(&mut self, action: FileAction) -> KeypressResult {
        match action {
            FileAction::Add => self.prompt_paths(false, false),
            FileAction::Append => self.prompt_paths(true, false),
            FileAction::AddDirectory => self.prompt_paths(false, true),
            FileAction::AppendDirectory => self.prompt_paths(true, true),
            FileAction::Clear => self.clear_files(),

            FileAction::Delete => {
                if matches!(self.workspace.current_tab(), TabKind::List)
                    && let Some(file) = self.selected_file()
                {
                    self.delete_file(&file);
                }
            }

            FileAction::OpenDetails => match self.workspace.current_tab().clone() {
                TabKind::List => {
                    if let Some(file) = self.selected_file() {
                        self.open_details(&file);
                    }
                }
                TabKind::Config => self.edit_selected_setting(),
                _ => return KeypressResult::Continue,
            },

            FileAction::Retry => {
                if let Some(file) = self.target_file() {
                    self.retry(&file);
                }
            }

            FileAction::ExportJson => {
                let scope = match self.workspace.current_tab() {
                    TabKind::Details(_) => ScopeKind::All,
                    _ => ScopeKind::Common,
                };
                if let Some(file) = self.target_file() {
                    self.export_json(&file, scope);
                }
            }
        }
        KeypressResult::Consumed
    }

    pub(super) fn handle_view_action(&mut self, action: ViewAction) -> KeypressResult {
        let tab = self.workspace.current_tab().clone();
        match (action, tab) {
            (ViewAction::Filter, TabKind::Config) => return KeypressResult::Continue,
            (ViewAction::Filter, _) => self.prompt_filter(),

            (ViewAction::ToggleView, TabKind::List) => self.toggle_view_mode(),
            (ViewAction::Sort, TabKind::List) => {
                if self.view_mode == ViewMode::Grid {
                    self.sort_by_cursor();
                }
            }

            (ViewAction::ToggleStream, TabKind::Details(_)) => self.toggle_stream_at_cursor(),
            (ViewAction::SelectAllStreams, TabKind::Details(_)) => self.select_all_streams(),
            (ViewAction::SelectNoStreams, TabKind::Details(_)) => self.select_no_streams(),

            (ViewAction::CycleStreamFilter, TabKind::About) => self.cycle_param_stream(),

            _ => return KeypressResult::Continue,
        }
        KeypressResult::Consumed
    }

    pub(super) fn handle_sys_action(&mut self, action: SystemAction) -> KeypressResult {
        match action {
            SystemAction::Quit => KeypressResult::Quit,
            SystemAction::SaveSettings => {
                if !matches!(self.workspace.current_tab(), TabKind::Config) {
                    return KeypressResult::Continue;
                }
                self.save_settings();
                KeypressResult::Consumed
            }
        }
    }

    // Prompts

    fn prompt_paths(&mut self, append: bool, directory: bool) {
        let prompt = match (append, directory) {
            (false, false) => "Open files",
            (true, false) => "Append files",
            (false, true) => "Open directory",
            (true, true) => "Append directory",
        };
        self.actions
            .enter_mode(InputMode::AddPaths { append, directory }, prompt, "");
    }

    fn confirm_paths(&mut self, text: &str, append: bool) {
        let paths: Vec<PathBuf> = parse_dropped_paths(text)
            .iter()
            .map(|p| expand_home_path(&p.to_string_lossy()))
            .collect();
        self.add_paths(paths, append);
    }

    fn prompt_filter(&mut self) {
        let initial = self
            .active_query()
            .map(|q| q.input().to_string())
            .unwrap_or_default();
        self.actions.enter_mode(InputMode::Filter, "Filter", &initial);
    }

    fn clear_active_query(&mut self) {
        if let Some(query) = self.active_query_mut() {
            query.set_input("");
        }
        self.flush_queries();
    }

    /// Enumerated settings cycle in place, extension lists open a prompt.
    fn edit_selected_setting(&mut self) {
        let field = self.settings.selected_field();
        if field.is_text() {
            let initial = self.settings.value_text(field);
            self.actions
                .enter_mode(InputMode::EditSetting(field), field.label(), &initial);
        } else {
            self.settings.cycle(field);
        }
    }

    /// File a single file action applies to.
    fn target_file(&mut self) -> Option<PathBuf> {
        match self.workspace.current_tab().clone() {
            TabKind::List => self.selected_file(),
            TabKind::Details(file) => Some(file),
            _ => None,
        }
    }
}
