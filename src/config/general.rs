//! The general configuration settings for mediascope.
//!
//! This module defines the [General] record read from the `[general]` table of
//! mediascope.toml. It is the record exchanged with the backend through
//! `config`/`set_config` and drives directory expansion.

use serde::{Deserialize, Serialize};

/// Color scheme preference.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Auto,
    Light,
    Dark,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [DisplayMode::Auto, DisplayMode::Light, DisplayMode::Dark];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Auto => "Auto",
            DisplayMode::Light => "Light",
            DisplayMode::Dark => "Dark",
        }
    }
}

/// Which extension list a directory scan keeps.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryMode {
    #[default]
    All,
    Audio,
    Image,
    Video,
}

impl DirectoryMode {
    pub const ALL: [DirectoryMode; 4] = [
        DirectoryMode::All,
        DirectoryMode::Audio,
        DirectoryMode::Image,
        DirectoryMode::Video,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DirectoryMode::All => "All",
            DirectoryMode::Audio => "Audio",
            DirectoryMode::Image => "Image",
            DirectoryMode::Video => "Video",
        }
    }
}

/// Cycles to the next entry of a fixed option list, wrapping at the end.
pub fn next_option<T: Copy + PartialEq>(options: &[T], current: T) -> T {
    let idx = options.iter().position(|o| *o == current).unwrap_or(0);
    options[(idx + 1) % options.len()]
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FileExtensions {
    pub audio: Vec<String>,
    pub image: Vec<String>,
    pub video: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for FileExtensions {
    fn default() -> Self {
        FileExtensions {
            audio: owned(&[
                "mp3", "aac", "flac", "wav", "ogg", "m4a", "mka", "ape", "ac3", "dts",
            ]),
            image: owned(&["jpg", "jpeg", "png", "gif", "bmp", "tif"]),
            video: owned(&[
                "mkv", "mp4", "m2ts", "ts", "avi", "mov", "wmv", "flv", "webm",
            ]),
        }
    }
}

/// The viewer configuration record.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct General {
    pub append_on_file_drop: bool,
    pub display_mode: DisplayMode,
    pub directory_mode: DirectoryMode,
    pub file_extensions: FileExtensions,
}

impl Default for General {
    fn default() -> Self {
        General {
            append_on_file_drop: true,
            display_mode: DisplayMode::default(),
            directory_mode: DirectoryMode::default(),
            file_extensions: FileExtensions::default(),
        }
    }
}

impl General {
    /// Extensions kept by a directory scan in the current mode.
    ///
    /// `All` is the union of the three lists, in audio, image, video order.
    pub fn active_extensions(&self) -> Vec<String> {
        let ext = &self.file_extensions;
        let mut list = match self.directory_mode {
            DirectoryMode::Audio => ext.audio.clone(),
            DirectoryMode::Image => ext.image.clone(),
            DirectoryMode::Video => ext.video.clone(),
            DirectoryMode::All => [&ext.audio[..], &ext.image[..], &ext.video[..]].concat(),
        };
        dedup_keep_order(&mut list);
        list
    }

    /// Lower-cases extensions, strips leading dots and removes empty and duplicate entries.
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.file_extensions.audio,
            &mut self.file_extensions.image,
            &mut self.file_extensions.video,
        ] {
            let mut cleaned: Vec<String> = list
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            dedup_keep_order(&mut cleaned);
            *list = cleaned;
        }
        self
    }
}

fn dedup_keep_order(list: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    list.retain(|item| seen.insert(item.clone()));
}

/// Splits a free-text extension list on runs of commas, spaces and dots.
///
/// ".mkv, .mp4  ts" -> ["mkv", "mp4", "ts"]
pub fn parse_extensions(text: &str) -> Vec<String> {
    text.split([',', ' ', '.'])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins an extension list back into editable text.
pub fn join_extensions(list: &[String]) -> String {
    list.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extensions_splits_on_separator_runs() {
        assert_eq!(parse_extensions(".mkv, .mp4  ts"), vec!["mkv", "mp4", "ts"]);
        assert_eq!(parse_extensions(""), Vec::<String>::new());
        assert_eq!(parse_extensions(",,. ."), Vec::<String>::new());
        assert_eq!(parse_extensions("flac"), vec!["flac"]);
    }

    #[test]
    fn all_mode_is_union_of_lists() {
        let general = General::default();
        let all = general.active_extensions();
        assert!(all.contains(&"mp3".to_string()));
        assert!(all.contains(&"png".to_string()));
        assert!(all.contains(&"mkv".to_string()));

        let video = General {
            directory_mode: DirectoryMode::Video,
            ..General::default()
        };
        assert_eq!(video.active_extensions(), FileExtensions::default().video);
    }

    #[test]
    fn normalized_cleans_extension_lists() {
        let general = General {
            file_extensions: FileExtensions {
                audio: vec![".MP3".into(), "mp3".into(), " ".into()],
                image: vec![],
                video: vec!["MKV".into()],
            },
            ..General::default()
        }
        .normalized();
        assert_eq!(general.file_extensions.audio, vec!["mp3"]);
        assert_eq!(general.file_extensions.video, vec!["mkv"]);
    }

    #[test]
    fn next_option_wraps() {
        assert_eq!(
            next_option(&DisplayMode::ALL, DisplayMode::Dark),
            DisplayMode::Auto
        );
        assert_eq!(
            next_option(&DirectoryMode::ALL, DirectoryMode::All),
            DirectoryMode::Audio
        );
    }
}
