//! Settings tab form.
//!
//! Holds an editable draft of the [General] record next to the last saved copy.
//! Enumerated fields cycle in place, extension lists are edited as free text.
//! Any edit marks the form dirty until the backend echoes a save.

use crate::config::{
    DirectoryMode, DisplayMode, General, join_extensions, next_option, parse_extensions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    AppendOnFileDrop,
    DisplayMode,
    DirectoryMode,
    AudioExtensions,
    ImageExtensions,
    VideoExtensions,
}

impl SettingField {
    pub const ALL: [SettingField; 6] = [
        SettingField::AppendOnFileDrop,
        SettingField::DisplayMode,
        SettingField::DirectoryMode,
        SettingField::AudioExtensions,
        SettingField::ImageExtensions,
        SettingField::VideoExtensions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingField::AppendOnFileDrop => "Append new files",
            SettingField::DisplayMode => "Display mode",
            SettingField::DirectoryMode => "Directory mode",
            SettingField::AudioExtensions => "Audio extensions",
            SettingField::ImageExtensions => "Image extensions",
            SettingField::VideoExtensions => "Video extensions",
        }
    }

    /// Edited through a text prompt rather than cycled.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            SettingField::AudioExtensions
                | SettingField::ImageExtensions
                | SettingField::VideoExtensions
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    saved: General,
    draft: General,
    dirty: bool,
    selected: usize,
}

impl SettingsForm {
    pub fn new(general: General) -> Self {
        Self {
            saved: general.clone(),
            draft: general,
            dirty: false,
            selected: 0,
        }
    }

    // Getters / accessors

    pub fn draft(&self) -> &General {
        &self.draft
    }

    pub fn saved(&self) -> &General {
        &self.saved
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_field(&self) -> SettingField {
        SettingField::ALL[self.selected.min(SettingField::ALL.len() - 1)]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(SettingField::ALL.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Display text of a field's draft value.
    pub fn value_text(&self, field: SettingField) -> String {
        let ext = &self.draft.file_extensions;
        match field {
            SettingField::AppendOnFileDrop => {
                let text = if self.draft.append_on_file_drop { "Yes" } else { "No" };
                text.to_string()
            }
            SettingField::DisplayMode => self.draft.display_mode.label().to_string(),
            SettingField::DirectoryMode => self.draft.directory_mode.label().to_string(),
            SettingField::AudioExtensions => join_extensions(&ext.audio),
            SettingField::ImageExtensions => join_extensions(&ext.image),
            SettingField::VideoExtensions => join_extensions(&ext.video),
        }
    }

    /// Cycles an enumerated field to its next value. Text fields are left alone.
    pub fn cycle(&mut self, field: SettingField) {
        match field {
            SettingField::AppendOnFileDrop => {
                self.draft.append_on_file_drop = !self.draft.append_on_file_drop;
            }
            SettingField::DisplayMode => {
                self.draft.display_mode = next_option(&DisplayMode::ALL, self.draft.display_mode);
            }
            SettingField::DirectoryMode => {
                self.draft.directory_mode =
                    next_option(&DirectoryMode::ALL, self.draft.directory_mode);
            }
            _ => return,
        }
        self.dirty = true;
    }

    /// Replaces an extension list from free text.
    pub fn set_text(&mut self, field: SettingField, text: &str) {
        let list = parse_extensions(text);
        let ext = &mut self.draft.file_extensions;
        match field {
            SettingField::AudioExtensions => ext.audio = list,
            SettingField::ImageExtensions => ext.image = list,
            SettingField::VideoExtensions => ext.video = list,
            _ => return,
        }
        self.dirty = true;
    }

    /// Takes a record loaded from the backend. Unsaved edits are kept.
    pub fn load(&mut self, general: General) {
        if !self.dirty {
            self.draft = general.clone();
        }
        self.saved = general;
    }

    /// Takes the record echoed by a successful save and clears the dirty flag.
    pub fn mark_saved(&mut self, general: General) {
        self.saved = general.clone();
        self.draft = general;
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_mark_dirty_until_saved() {
        let mut form = SettingsForm::new(General::default());
        assert!(!form.is_dirty());

        form.cycle(SettingField::DirectoryMode);
        assert!(form.is_dirty());
        assert_eq!(form.draft().directory_mode, DirectoryMode::Audio);

        form.set_text(SettingField::VideoExtensions, ".mkv, .MP4  ts");
        assert_eq!(form.value_text(SettingField::VideoExtensions), "mkv, MP4, ts");

        let saved = form.draft().clone().normalized();
        form.mark_saved(saved);
        assert!(!form.is_dirty());
        assert_eq!(form.value_text(SettingField::VideoExtensions), "mkv, mp4, ts");
    }

    #[test]
    fn load_keeps_unsaved_edits() {
        let mut form = SettingsForm::new(General::default());
        form.cycle(SettingField::AppendOnFileDrop);

        let mut remote = General::default();
        remote.display_mode = DisplayMode::Dark;
        form.load(remote);
        assert!(!form.draft().append_on_file_drop);
        assert_eq!(form.draft().display_mode, DisplayMode::Auto);
        assert_eq!(form.saved().display_mode, DisplayMode::Dark);
    }

    #[test]
    fn field_selection_is_bounded() {
        let mut form = SettingsForm::new(General::default());
        form.select_prev();
        assert_eq!(form.selected_field(), SettingField::AppendOnFileDrop);
        for _ in 0..10 {
            form.select_next();
        }
        assert_eq!(form.selected_field(), SettingField::VideoExtensions);
        assert!(form.selected_field().is_text());
    }
}
