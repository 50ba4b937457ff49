//! Key mapping and action dispatch system for mediascope
//!
//! Defines key to an action, parsing from the config, and enum variants
//! for all navigation, tab, file, view and system actions.

use crate::config::Keys;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Represents any action in the app.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Nav(NavAction),
    Tab(TabAction),
    File(FileAction),
    View(ViewAction),
    System(SystemAction),
}

/// Cursor and paging movement inside the active tab
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    Left,
    Right,
    NextPage,
    PrevPage,
    PageSize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TabAction {
    Next,
    Prev,
    Close,
    /// Select by 1-based position
    Switch(u8),
    About,
    Settings,
}

/// Actions on the tracked file set
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileAction {
    Add,
    Append,
    AddDirectory,
    AppendDirectory,
    Clear,
    Delete,
    OpenDetails,
    Retry,
    ExportJson,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewAction {
    Filter,
    ToggleView,
    Sort,
    ToggleStream,
    SelectAllStreams,
    SelectNoStreams,
    CycleStreamFilter,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SystemAction {
    Quit,
    SaveSettings,
}

/// Key + modifiers as used in keybind/keymap
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

/// Stores the mapping from Key to action, which is built from the `[keys]` table
#[derive(Debug, Default)]
pub struct Keymap {
    map: HashMap<Key, Action>,
}

impl Keymap {
    /// Builds the keymap from the config
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::from_keys(config.keys())
    }

    #[rustfmt::skip]
    pub fn from_keys(keys: &Keys) -> Self {
        let mut map = HashMap::new();

        macro_rules! bind {
            ($keys:expr, $action:expr) => {
                bind($keys, $action, &mut map);
            };
        }

        use NavAction as N;
        use TabAction as T;
        use FileAction as F;
        use ViewAction as V;
        use SystemAction as S;

        // NavActions
        bind!(keys.go_up(),               Action::Nav(N::Up));
        bind!(keys.go_down(),             Action::Nav(N::Down));
        bind!(keys.go_left(),             Action::Nav(N::Left));
        bind!(keys.go_right(),            Action::Nav(N::Right));
        bind!(keys.next_page(),           Action::Nav(N::NextPage));
        bind!(keys.prev_page(),           Action::Nav(N::PrevPage));
        bind!(keys.page_size(),           Action::Nav(N::PageSize));

        // TabActions
        bind!(keys.next_tab(),            Action::Tab(T::Next));
        bind!(keys.prev_tab(),            Action::Tab(T::Prev));
        bind!(keys.close_tab(),           Action::Tab(T::Close));
        bind!(keys.open_about(),          Action::Tab(T::About));
        bind!(keys.open_settings(),       Action::Tab(T::Settings));

        // FileActions
        bind!(keys.add_files(),           Action::File(F::Add));
        bind!(keys.append_files(),        Action::File(F::Append));
        bind!(keys.add_directory(),       Action::File(F::AddDirectory));
        bind!(keys.append_directory(),    Action::File(F::AppendDirectory));
        bind!(keys.clear_files(),         Action::File(F::Clear));
        bind!(keys.delete_file(),         Action::File(F::Delete));
        bind!(keys.open_details(),        Action::File(F::OpenDetails));
        bind!(keys.retry(),               Action::File(F::Retry));
        bind!(keys.export_json(),         Action::File(F::ExportJson));

        // ViewActions
        bind!(keys.filter(),              Action::View(V::Filter));
        bind!(keys.toggle_view(),         Action::View(V::ToggleView));
        bind!(keys.sort(),                Action::View(V::Sort));
        bind!(keys.toggle_stream(),       Action::View(V::ToggleStream));
        bind!(keys.select_all_streams(),  Action::View(V::SelectAllStreams));
        bind!(keys.select_no_streams(),   Action::View(V::SelectNoStreams));
        bind!(keys.cycle_stream_filter(), Action::View(V::CycleStreamFilter));

        // SystemActions
        bind!(keys.save_settings(),       Action::System(S::SaveSettings));
        bind!(keys.quit(),                Action::System(S::Quit));

        Keymap { map }
    }

    /// Looks up the action for a given key event
    ///
    /// Plain digits 1-9 always select a tab by position.
    pub fn lookup(&self, key: KeyEvent) -> Option<Action> {
        let k = Key {
            code: key.code,
            modifiers: key.modifiers,
        };

        if let Some(action) = self.map.get(&k).copied() {
            return Some(action);
        }

        if matches!(key.code, KeyCode::Char(_)) && key.modifiers.contains(KeyModifiers::SHIFT) {
            let k2 = Key {
                code: key.code,
                modifiers: key.modifiers - KeyModifiers::SHIFT,
            };
            if let Some(action) = self.map.get(&k2).copied() {
                return Some(action);
            }
        }

        if let KeyCode::Char(c @ '1'..='9') = key.code
            && key.modifiers.is_empty()
        {
            return Some(Action::Tab(TabAction::Switch(c as u8 - b'0')));
        }
        None
    }
}

pub fn parse_key(s: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut code: Option<KeyCode> = None;

    // single characters bind as-is, including the separators "+" and "-"
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(Key {
            code: KeyCode::Char(c),
            modifiers,
        });
    }

    let is_bracketed = s.starts_with('<') && s.ends_with('>');
    let mut input = s.trim_start_matches('<').trim_end_matches('>').to_string();

    if is_bracketed && input.contains('-') {
        let parts: Vec<&str> = input.split('-').collect();

        for &prefix in parts.iter().take(parts.len().saturating_sub(1)) {
            match prefix.to_lowercase().as_str() {
                "c" | "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "a" | "m" | "alt" => modifiers |= KeyModifiers::ALT,
                "s" | "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        input = parts.last()?.to_string();
    }

    let normalized = input.replace('-', "+");
    for part in normalized.split('+') {
        let p_low = part.to_lowercase();
        match p_low.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,

            "up" => code = Some(KeyCode::Up),
            "down" => code = Some(KeyCode::Down),
            "left" => code = Some(KeyCode::Left),
            "right" => code = Some(KeyCode::Right),
            "enter" => code = Some(KeyCode::Enter),
            "esc" => code = Some(KeyCode::Esc),
            "backspace" | "back" => code = Some(KeyCode::Backspace),
            "tab" => code = Some(KeyCode::Tab),
            "backtab" => code = Some(KeyCode::BackTab),
            "delete" | "del" => code = Some(KeyCode::Delete),
            "pageup" | "pgup" => code = Some(KeyCode::PageUp),
            "pagedown" | "pgdn" => code = Some(KeyCode::PageDown),
            "space" | "spc" => code = Some(KeyCode::Char(' ')),

            _ => {
                if part.chars().count() == 1 {
                    let mut c = part.chars().next()?;
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        c = c.to_ascii_uppercase();
                    }
                    code = Some(KeyCode::Char(c));
                } else if p_low.starts_with('f')
                    && p_low.len() > 1
                    && p_low[1..].chars().all(|c| c.is_ascii_digit())
                {
                    let n = p_low[1..].parse().ok()?;
                    code = Some(KeyCode::F(n));
                } else if part.is_empty() {
                    continue;
                } else {
                    return None;
                }
            }
        }
    }

    // terminals report BackTab with shift held
    if code == Some(KeyCode::BackTab) {
        modifiers |= KeyModifiers::SHIFT;
    }

    Some(Key {
        code: code?,
        modifiers,
    })
}

fn bind(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, action);
            }
            None => log::warn!("Ignoring unknown key binding {:?}", k),
        }
    }
}
