//! Helpers for mediascope.
//!
//! Small path utilities used throughout mediascope:
//! - Displaying home directories as "~" in file paths
//! - Expanding a leading "~" in typed paths
//! - Turning pasted or dropped text into a list of paths
//! - Locating the log file

use std::env;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Name of the log file inside the temp directory.
pub const LOG_FILE_NAME: &str = "mediascope.log";

/// Util function to shorten home directory to ~.
/// Is used by the renderer for file paths in titles and cards.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        } else {
            let mut short = stripped.display().to_string();
            if short.starts_with(MAIN_SEPARATOR) {
                short.remove(0);
            }
            return format!("~{}{}", MAIN_SEPARATOR, short);
        }
    }
    readable_path(path)
}

/// Expands a leading `~` to the home directory. Other paths are returned as given.
pub fn expand_home_path(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };
    if path == "~" {
        return home;
    }
    match path
        .strip_prefix("~/")
        .or_else(|| path.strip_prefix(&format!("~{}", MAIN_SEPARATOR)))
    {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

pub fn readable_path(path: &Path) -> String {
    #[cfg(windows)]
    {
        let display = path.display().to_string();
        display
            .strip_prefix(r"\\?\")
            .unwrap_or(&display)
            .to_string()
    }
    #[cfg(not(windows))]
    {
        path.display().to_string()
    }
}

/// Splits pasted text into paths.
///
/// Terminals paste dropped files either one per line or space separated with
/// quotes or backslash escapes, sometimes as `file://` URIs. Empty entries are dropped.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for line in text.lines() {
        for token in split_shell_words(line.trim()) {
            let token = token.strip_prefix("file://").unwrap_or(&token).to_string();
            if !token.is_empty() {
                paths.push(PathBuf::from(token));
            }
        }
    }
    paths
}

/// Splits a line on unquoted, unescaped whitespace.
fn split_shell_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Where the log is written: `$TMPDIR/mediascope.log`.
pub fn log_file_path() -> PathBuf {
    env::temp_dir().join(LOG_FILE_NAME)
}

/// Helper utils tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_paths_handle_quotes_and_escapes() {
        let text = "'/media/My Movie.mkv' /media/song\\ one.flac\n\"/tmp/a b.png\"\n\n";
        assert_eq!(
            parse_dropped_paths(text),
            vec![
                PathBuf::from("/media/My Movie.mkv"),
                PathBuf::from("/media/song one.flac"),
                PathBuf::from("/tmp/a b.png"),
            ]
        );
    }

    #[test]
    fn dropped_file_uris_are_stripped() {
        assert_eq!(
            parse_dropped_paths("file:///home/user/clip.mp4\r\n"),
            vec![PathBuf::from("/home/user/clip.mp4")]
        );
        assert!(parse_dropped_paths("   \n ''").is_empty());
    }

    #[test]
    fn home_paths_round_trip() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let expanded = expand_home_path("~/Videos/a.mkv");
        assert_eq!(expanded, home.join("Videos/a.mkv"));
        assert_eq!(expand_home_path("~"), home);
        assert_eq!(expand_home_path("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(shorten_home_path(&home), "~");
    }

    #[test]
    fn log_file_lives_in_temp_dir() {
        let path = log_file_path();
        assert!(path.starts_with(env::temp_dir()));
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(LOG_FILE_NAME));
    }
}
