//! Input configuration options for mediascope
//!
//! This module defines the key binding options which are read from the `[keys]` table of
//! mediascope.toml. Tab selection by position (1-9) is fixed and not configurable.

use serde::{Deserialize, Serialize};

/// Input configuration options of all actions
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Keys {
    quit: Vec<String>,
    go_up: Vec<String>,
    go_down: Vec<String>,
    go_left: Vec<String>,
    go_right: Vec<String>,
    next_tab: Vec<String>,
    prev_tab: Vec<String>,
    close_tab: Vec<String>,
    open_about: Vec<String>,
    open_settings: Vec<String>,
    add_files: Vec<String>,
    append_files: Vec<String>,
    add_directory: Vec<String>,
    append_directory: Vec<String>,
    clear_files: Vec<String>,
    delete_file: Vec<String>,
    open_details: Vec<String>,
    retry: Vec<String>,
    filter: Vec<String>,
    toggle_view: Vec<String>,
    sort: Vec<String>,
    export_json: Vec<String>,
    toggle_stream: Vec<String>,
    select_all_streams: Vec<String>,
    select_no_streams: Vec<String>,
    cycle_stream_filter: Vec<String>,
    next_page: Vec<String>,
    prev_page: Vec<String>,
    page_size: Vec<String>,
    save_settings: Vec<String>,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    quit,
    go_up,
    go_down,
    go_left,
    go_right,
    next_tab,
    prev_tab,
    close_tab,
    open_about,
    open_settings,
    add_files,
    append_files,
    add_directory,
    append_directory,
    clear_files,
    delete_file,
    open_details,
    retry,
    filter,
    toggle_view,
    sort,
    export_json,
    toggle_stream,
    select_all_streams,
    select_no_streams,
    cycle_stream_filter,
    next_page,
    prev_page,
    page_size,
    save_settings,
);

/// Default input configuration options
impl Default for Keys {
    fn default() -> Self {
        Keys {
            quit: vec!["q".into()],
            go_up: vec!["k".into(), "Up".into()],
            go_down: vec!["j".into(), "Down".into()],
            go_left: vec!["h".into(), "Left".into()],
            go_right: vec!["l".into(), "Right".into()],

            next_tab: vec!["Tab".into(), "Ctrl+n".into()],
            prev_tab: vec!["BackTab".into(), "Ctrl+p".into()],
            close_tab: vec!["Ctrl+w".into()],
            open_about: vec!["F1".into()],
            open_settings: vec!["F10".into()],

            add_files: vec!["o".into()],
            append_files: vec!["Shift+o".into()],
            add_directory: vec!["d".into()],
            append_directory: vec!["Shift+d".into()],
            clear_files: vec!["Ctrl+q".into()],
            delete_file: vec!["x".into(), "Delete".into()],

            open_details: vec!["Enter".into()],
            retry: vec!["r".into()],
            filter: vec!["/".into(), "f".into()],
            toggle_view: vec!["v".into()],
            sort: vec!["s".into()],
            export_json: vec!["e".into()],

            toggle_stream: vec![" ".into()],
            select_all_streams: vec!["+".into()],
            select_no_streams: vec!["-".into()],

            cycle_stream_filter: vec!["t".into()],
            next_page: vec!["n".into(), "PageDown".into()],
            prev_page: vec!["p".into(), "PageUp".into()],
            page_size: vec!["z".into()],

            save_settings: vec!["Ctrl+s".into()],
        }
    }
}
