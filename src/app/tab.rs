//! Workspace tabs for mediascope.
//!
//! The list tab is always first and cannot be closed. About and Config exist at most once
//! and carry a [Visibility]; details tabs exist at most once per file.

use crate::core::format::shrink_file_name;

use std::path::{Path, PathBuf};

/// Maximum tab label length for file names.
const LABEL_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabKind {
    List,
    About,
    Config,
    Details(PathBuf),
}

impl TabKind {
    pub fn label(&self) -> String {
        match self {
            TabKind::List => "Files".to_string(),
            TabKind::About => "About".to_string(),
            TabKind::Config => "Settings".to_string(),
            TabKind::Details(file) => {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.to_string_lossy().into_owned());
                shrink_file_name(&name, LABEL_LEN)
            }
        }
    }
}

/// The two singleton panels that can be shown on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    About,
    Config,
}

impl Panel {
    fn tab(self) -> TabKind {
        match self {
            Panel::About => TabKind::About,
            Panel::Config => TabKind::Config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    /// Requested, resolved to Visible within the same call
    Selected,
    Visible,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    tabs: Vec<TabKind>,
    current: usize,
    about: Visibility,
    config: Visibility,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            tabs: vec![TabKind::List],
            current: 0,
            about: Visibility::Hidden,
            config: Visibility::Hidden,
        }
    }

    // Getters / accessors

    #[inline]
    pub fn tabs(&self) -> &[TabKind] {
        &self.tabs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_tab(&self) -> &TabKind {
        // the list tab is never removed
        self.tabs.get(self.current).unwrap_or(&TabKind::List)
    }

    pub fn visibility(&self, panel: Panel) -> Visibility {
        match panel {
            Panel::About => self.about,
            Panel::Config => self.config,
        }
    }

    fn visibility_mut(&mut self, panel: Panel) -> &mut Visibility {
        match panel {
            Panel::About => &mut self.about,
            Panel::Config => &mut self.config,
        }
    }

    fn position(&self, tab: &TabKind) -> Option<usize> {
        self.tabs.iter().position(|t| t == tab)
    }

    /// Files that have a details tab, in tab order.
    pub fn details_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.tabs.iter().filter_map(|t| match t {
            TabKind::Details(file) => Some(file),
            _ => None,
        })
    }

    pub fn has_details(&self, file: &Path) -> bool {
        self.details_files().any(|f| f == file)
    }

    // Transitions

    /// Requests a panel: it is inserted if missing, activated, and ends up Visible.
    pub fn show(&mut self, panel: Panel) {
        *self.visibility_mut(panel) = Visibility::Selected;

        let tab = panel.tab();
        let idx = match self.position(&tab) {
            Some(idx) => idx,
            None => {
                self.tabs.push(tab);
                self.tabs.len() - 1
            }
        };
        self.current = idx;
        *self.visibility_mut(panel) = Visibility::Visible;
    }

    /// Opens or selects the details tab of a file. Returns true if a tab was added.
    pub fn open_details(&mut self, file: &Path) -> bool {
        let tab = TabKind::Details(file.to_path_buf());
        if let Some(idx) = self.position(&tab) {
            self.current = idx;
            return false;
        }
        self.tabs.push(tab);
        self.current = self.tabs.len() - 1;
        true
    }

    /// Closes a tab by index. The list tab cannot be closed.
    ///
    /// Returns the removed tab. The active tab stays selected when it survives.
    pub fn close(&mut self, idx: usize) -> Option<TabKind> {
        if idx == 0 || idx >= self.tabs.len() {
            return None;
        }
        let removed = self.tabs.remove(idx);
        match removed {
            TabKind::About => self.about = Visibility::Hidden,
            TabKind::Config => self.config = Visibility::Hidden,
            _ => {}
        }

        if idx < self.current {
            self.current -= 1;
        }
        self.clamp();
        Some(removed)
    }

    pub fn close_current(&mut self) -> Option<TabKind> {
        self.close(self.current)
    }

    /// Closes the details tab of a file, if open.
    pub fn close_details(&mut self, file: &Path) -> bool {
        let tab = TabKind::Details(file.to_path_buf());
        self.position(&tab)
            .and_then(|idx| self.close(idx))
            .is_some()
    }

    /// Cycles through the tabs, wrapping at both ends.
    pub fn switch(&mut self, dir: isize) {
        let n = self.tabs.len() as isize;
        if n == 0 {
            return;
        }
        self.current = ((self.current as isize + dir).rem_euclid(n)) as usize;
    }

    /// Selects a tab by index. Out of range indices select the last tab.
    pub fn set_active(&mut self, idx: usize) {
        self.current = idx.min(self.tabs.len().saturating_sub(1));
    }

    fn clamp(&mut self) {
        if self.current >= self.tabs.len() {
            self.current = self.tabs.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_tab_is_permanent() {
        let mut ws = Workspace::new();
        assert_eq!(ws.close(0), None);
        assert_eq!(ws.close_current(), None);
        assert_eq!(ws.tabs(), &[TabKind::List]);
    }

    #[test]
    fn panels_resolve_to_visible() {
        let mut ws = Workspace::new();
        assert_eq!(ws.visibility(Panel::About), Visibility::Hidden);

        ws.show(Panel::About);
        assert_eq!(ws.visibility(Panel::About), Visibility::Visible);
        assert_eq!(ws.current_tab(), &TabKind::About);

        ws.set_active(0);
        ws.show(Panel::About);
        assert_eq!(ws.len(), 2);
        assert_eq!(ws.current(), 1);

        ws.close_current();
        assert_eq!(ws.visibility(Panel::About), Visibility::Hidden);
        assert_eq!(ws.current(), 0);
    }

    #[test]
    fn closing_before_active_keeps_selection() {
        let mut ws = Workspace::new();
        ws.show(Panel::Config);
        ws.open_details(Path::new("a.mkv"));
        ws.open_details(Path::new("b.mkv"));
        assert_eq!(ws.current(), 3);

        ws.close(1);
        assert_eq!(ws.current_tab(), &TabKind::Details(PathBuf::from("b.mkv")));

        ws.close(2);
        assert_eq!(ws.current(), 1);
    }

    #[test]
    fn switch_wraps() {
        let mut ws = Workspace::new();
        ws.show(Panel::About);
        ws.show(Panel::Config);
        ws.switch(1);
        assert_eq!(ws.current(), 0);
        ws.switch(-1);
        assert_eq!(ws.current(), 2);
    }

    #[test]
    fn out_of_range_index_selects_the_last_tab() {
        let mut ws = Workspace::new();
        ws.show(Panel::About);
        ws.show(Panel::Config);
        ws.set_active(0);
        assert_eq!(ws.current(), 0);
        ws.set_active(8);
        assert_eq!(ws.current(), 2);
        assert_eq!(ws.current_tab(), &TabKind::Config);
    }

    #[test]
    fn details_label_is_the_file_name() {
        let mut ws = Workspace::new();
        ws.open_details(Path::new("/media/movie.mkv"));
        assert_eq!(ws.current_tab().label(), "movie.mkv");
    }
}
