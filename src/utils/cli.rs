//! Command-line argument parsing and help for mediascope.
//!
//! This module handles all CLI flag parsing used for config initialization and help.
//!
//! When invoked with no args/flags (mscope), mediascope simply launches the TUI

use crate::config::Config;

#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    RunApp,
    RunAppAtPath(String),
    Exit,
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().collect();
    parse_args(&args)
}

/// Decides what to do from the raw argument list (program name first).
pub fn parse_args(args: &[String]) -> CliAction {
    if args.len() < 2 {
        return CliAction::RunApp;
    }

    if args.len() > 2 {
        eprintln!("Error: mediascope accepts only one argument at a time.");
        eprintln!("Usage: mscope [PATH] or mscope [OPTION]");
        return CliAction::Exit;
    }

    match args[1].as_str() {
        "--version" | "-v" => {
            print_version();
            CliAction::Exit
        }
        "-h" | "--help" => {
            print_help();
            CliAction::Exit
        }
        "--keybinds" | "--keys" => {
            print_keybinds();
            CliAction::Exit
        }
        "--init" => {
            let config_path = Config::default_path();
            match Config::generate_default(&config_path) {
                Ok(()) => println!("Configuration written to {}", config_path.display()),
                Err(e) => eprintln!("Error: {}", e),
            }
            CliAction::Exit
        }
        arg if !arg.starts_with('-') && !arg.trim().is_empty() => {
            CliAction::RunAppAtPath(arg.to_string())
        }
        arg => {
            eprintln!("Unknown argument: {}", arg);
            eprintln!("Try --help for available options");
            CliAction::Exit
        }
    }
}

fn print_version() {
    println!("mediascope {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"mediascope - A terminal viewer for media file properties

USAGE:
  mscope [PATH]

PATH:
  File or directory to scan on startup

OPTIONS:
      --init              Generate the default configuration
      --keybinds          Display all the default keybinds
  -h, --help              Print help information
  -v, --version           Display the current installed version of mediascope

ENVIRONMENT:
  MSCOPE_CONFIG           Override the default config path
  MSCOPE_LOG              Set to "debug" for verbose logging
  MSCOPE_MEDIAINFO        Path of the mediainfo executable

Drop files onto the terminal window (or paste their paths) to open them.
"#
    );
}

const KEYBINDS_TEXT: &str = r##"
=========================
 Key Bindings
=========================
[keys]
  quit                      ["q"]
  go_up                     ["k", "Up"]
  go_down                   ["j", "Down"]
  go_left                   ["h", "Left"]       (sort column / stream kind)
  go_right                  ["l", "Right"]

  next_tab                  ["Tab", "Ctrl+n"]
  prev_tab                  ["BackTab", "Ctrl+p"]
  close_tab                 ["Ctrl+w"]
  open_about                ["F1"]
  open_settings             ["F10"]
                            1-9 select a tab by position

  add_files                 ["o"]
  append_files              ["Shift+o"]
  add_directory             ["d"]
  append_directory          ["Shift+d"]
  clear_files               ["Ctrl+q"]
  delete_file               ["x", "Delete"]
  open_details              ["Enter"]           (edit field in Settings)
  retry                     ["r"]
  export_json               ["e"]

  filter                    ["/", "f"]
  toggle_view               ["v"]               (cards / grid)
  sort                      ["s"]               (grid column under cursor)
  toggle_stream             [" "]
  select_all_streams        ["+"]
  select_no_streams         ["-"]
  cycle_stream_filter       ["t"]
  next_page                 ["n", "PageDown"]
  prev_page                 ["p", "PageUp"]
  page_size                 ["z"]

  save_settings             ["Ctrl+s"]

  Syntax Reference:
    Modifiers: <c-x> (Ctrl), <m-x>/<a-x> (Alt/Meta), <s-x> (Shift)
    Standard:  ctrl+x, alt+x, shift+x, meta+x
    Special:   " ", "space", "back", "enter", "esc", "tab", "delete", "pageup", "pagedown"
"##;

fn print_keybinds() {
    println!("{}", KEYBINDS_TEXT);
}
