//! Session state and main controller module for mediascope.
//!
//! This module defines the [Session] struct, which owns everything the running viewer knows:
//! - Configuration and the keymap built from it
//! - The tracked files and their [PropertyCache]
//! - The [Workspace] tab list and the per tab view state (filters, sort, stream selection)
//! - Communication with the backend worker via crossbeam_channel
//! - Notification handling
//!
//! All mutation happens on the UI thread, either from a keypress or from a worker response
//! drained in [Session::tick]. This is the primary context object passed to the
//! terminal loop and the renderer.

use crate::app::actions::{ActionContext, InputMode};
use crate::app::cache::{Applied, PropertyCache};
use crate::app::keymap::{Action, Keymap};
use crate::app::pager::Pager;
use crate::app::query::QueryState;
use crate::app::settings::SettingsForm;
use crate::app::tab::{Panel, TabKind, Workspace};
use crate::app::view::{
    self, Card, DetailsGroup, GridRow, ListEntry, Memo, SortState, StreamSelection,
};
use crate::config::{Config, General};
use crate::core::backend::BackendError;
use crate::core::property::grid_columns;
use crate::core::stream::{About, Parameter, StreamKind, StreamProperties};
use crate::core::worker::{ScopeKind, WorkerResponse, WorkerTask, Workers};
use crate::ui::overlays::{Overlay, OverlayStack, Severity};

use crossterm::event::{KeyCode, KeyEvent};

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Enumeration for each individual keypress result processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypressResult {
    Continue,
    Consumed,
    Quit,
}

/// Presentation of the list tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Card,
    Grid,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Card => ViewMode::Grid,
            ViewMode::Grid => ViewMode::Card,
        }
    }
}

/// UI state of one details tab.
#[derive(Debug, Clone, Default)]
pub struct DetailsState {
    selection: Option<StreamSelection>,
    cursor: usize,
    scroll: usize,
    query: QueryState,
}

impl DetailsState {
    /// Index into the available stream kinds.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Property filter of this tab only.
    pub fn query(&self) -> &QueryState {
        &self.query
    }
}

/// Ids of the requests currently awaited. Anything else is stale.
///
/// Appending resolves all merge on arrival, a replacing one supersedes every earlier resolve.
#[derive(Debug, Default)]
struct PendingRequests {
    about: Option<u64>,
    parameters: Option<u64>,
    config: Option<u64>,
    files: HashSet<u64>,
    exports: HashSet<u64>,
}

type GridKey = (u64, String, SortState);
type DetailsKey = (PathBuf, u64, StreamSelection, String);

/// The running viewer: files, caches, tabs and dialogs.
pub struct Session {
    pub(super) config: Config,
    pub(super) keymap: Keymap,
    pub(super) workers: Workers,

    pub(super) cache: PropertyCache,
    pub(super) workspace: Workspace,
    pub(super) actions: ActionContext,

    // list tab
    pub(super) view_mode: ViewMode,
    pub(super) list_query: QueryState,
    pub(super) sort: SortState,
    pub(super) list_selected: usize,
    pub(super) sort_cursor: usize,
    grid_memo: Memo<GridKey, Vec<ListEntry<GridRow>>>,
    card_memo: Memo<(u64, String), Vec<ListEntry<Card>>>,

    // details tabs
    pub(super) details: HashMap<PathBuf, DetailsState>,
    details_memo: Memo<DetailsKey, Vec<DetailsGroup>>,

    // about tab
    pub(super) about: Option<About>,
    pub(super) parameters: Option<Vec<Parameter>>,
    pub(super) param_stream: Option<StreamKind>,
    pub(super) param_query: QueryState,
    pub(super) pager: Pager,

    // settings tab
    pub(super) settings: SettingsForm,

    pending: PendingRequests,
    request_id: u64,
    pub(super) overlays: OverlayStack,
}

impl Session {
    pub fn new(config: Config, workers: Workers) -> Self {
        Self {
            keymap: Keymap::from_config(&config),
            settings: SettingsForm::new(config.general().clone()),
            config,
            workers,
            cache: PropertyCache::new(),
            workspace: Workspace::new(),
            actions: ActionContext::default(),
            view_mode: ViewMode::default(),
            list_query: QueryState::default(),
            sort: SortState::default(),
            list_selected: 0,
            sort_cursor: 0,
            grid_memo: Memo::new(),
            card_memo: Memo::new(),
            details: HashMap::new(),
            details_memo: Memo::new(),
            about: None,
            parameters: None,
            param_stream: None,
            param_query: QueryState::default(),
            pager: Pager::default(),
            pending: PendingRequests::default(),
            request_id: 0,
            overlays: OverlayStack::new(),
        }
    }

    // Getters / accessors

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &PropertyCache {
        &self.cache
    }

    #[inline]
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    #[inline]
    pub fn actions(&self) -> &ActionContext {
        &self.actions
    }

    #[inline]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    #[inline]
    pub fn list_query(&self) -> &QueryState {
        &self.list_query
    }

    /// Property filter of a file's details tab.
    pub fn details_query(&self, file: &Path) -> Option<&QueryState> {
        self.details.get(file).map(DetailsState::query)
    }

    #[inline]
    pub fn param_query(&self) -> &QueryState {
        &self.param_query
    }

    #[inline]
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    #[inline]
    pub fn list_selected(&self) -> usize {
        self.list_selected
    }

    #[inline]
    pub fn sort_cursor(&self) -> usize {
        self.sort_cursor
    }

    pub fn about(&self) -> Option<&About> {
        self.about.as_ref()
    }

    pub fn parameters(&self) -> Option<&[Parameter]> {
        self.parameters.as_deref()
    }

    pub fn param_stream(&self) -> Option<StreamKind> {
        self.param_stream
    }

    #[inline]
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    #[inline]
    pub fn settings(&self) -> &SettingsForm {
        &self.settings
    }

    #[inline]
    pub fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }

    pub fn details_state(&self, file: &Path) -> Option<&DetailsState> {
        self.details.get(file)
    }

    /// Titles and severities of the visible notifications, oldest first.
    pub fn notifications(&self) -> impl Iterator<Item = (&str, Severity)> {
        self.overlays.iter().map(|o| match o {
            Overlay::Notification {
                title, severity, ..
            } => (title.as_str(), *severity),
        })
    }

    /// File of the active details tab.
    pub fn current_details_file(&self) -> Option<&Path> {
        match self.workspace.current_tab() {
            TabKind::Details(file) => Some(file),
            _ => None,
        }
    }

    // Notifications

    pub fn notify(&mut self, title: impl Into<String>, severity: Severity) {
        let title = title.into();
        match severity {
            Severity::Info => log::info!("{}", title),
            Severity::Error => log::error!("{}", title),
        }
        self.overlays.push(Overlay::notification(title, severity));
    }

    fn notify_error(&mut self, context: &str, e: &BackendError) {
        self.notify(format!("{}: {}", context, e), Severity::Error);
    }

    // Worker requests

    fn next_request_id(&mut self) -> u64 {
        self.request_id = self.request_id.wrapping_add(1);
        self.request_id
    }

    fn send(&mut self, task: WorkerTask) -> bool {
        if self.workers.task_tx().send(task).is_ok() {
            return true;
        }
        self.notify("Backend is not available", Severity::Error);
        false
    }

    /// Resolves files and directories through the backend and merges or replaces the file set.
    pub fn add_paths(&mut self, paths: Vec<PathBuf>, append: bool) {
        if paths.is_empty() {
            return;
        }
        let request_id = self.next_request_id();
        if !append {
            self.pending.files.clear();
        }
        self.pending.files.insert(request_id);
        log::debug!("Resolving {} path(s), append: {}", paths.len(), append);
        self.send(WorkerTask::ResolveFiles {
            paths,
            append,
            request_id,
        });
    }

    /// Paths dropped onto the window; appended or replacing per the configuration.
    pub fn drop_paths(&mut self, paths: Vec<PathBuf>) {
        let append = self.config.general().append_on_file_drop;
        self.add_paths(paths, append);
    }

    /// Forgets every file, its cached data and its details tab.
    pub fn clear_files(&mut self) {
        self.pending.files.clear();
        for file in self.cache.clear() {
            self.forget_details(&file);
        }
        self.list_selected = 0;
    }

    /// Forgets one file, its cached data and its details tab.
    pub fn delete_file(&mut self, file: &Path) {
        if self.cache.remove(file) {
            log::debug!("Removed {}", file.display());
            self.forget_details(file);
            self.clamp_list_selection();
        }
    }

    fn forget_details(&mut self, file: &Path) {
        self.workspace.close_details(file);
        self.details.remove(file);
    }

    /// Abandons outstanding loads of a file and requests them again.
    pub fn retry(&mut self, file: &Path) {
        let sent = self.cache.retry(file, self.workers.task_tx());
        if self.workspace.has_details(file) {
            self.cache.ensure_all_properties(file, self.workers.task_tx());
        }
        log::debug!("Retry {}: {} request(s)", file.display(), sent);
    }

    /// Opens (or selects) the details tab of a tracked file and loads all its properties.
    pub fn open_details(&mut self, file: &Path) {
        if !self.cache.contains(file) {
            return;
        }
        self.workspace.open_details(file);
        self.details.entry(file.to_path_buf()).or_default();
        self.init_selection(file);
        self.cache.ensure_all_properties(file, self.workers.task_tx());
    }

    /// Closes the active tab. The list tab stays.
    pub fn close_current_tab(&mut self) {
        if let Some(TabKind::Details(file)) = self.workspace.close_current() {
            self.details.remove(&file);
        }
    }

    pub fn show_about(&mut self) {
        self.workspace.show(Panel::About);
        if self.about.is_none() && self.pending.about.is_none() {
            let request_id = self.next_request_id();
            self.pending.about = Some(request_id);
            self.send(WorkerTask::LoadAbout { request_id });
        }
        if self.parameters.is_none() && self.pending.parameters.is_none() {
            let request_id = self.next_request_id();
            self.pending.parameters = Some(request_id);
            self.send(WorkerTask::LoadParameters { request_id });
        }
    }

    pub fn show_settings(&mut self) {
        self.workspace.show(Panel::Config);
        if !self.settings.is_dirty() {
            let request_id = self.next_request_id();
            self.pending.config = Some(request_id);
            self.send(WorkerTask::LoadConfig { request_id });
        }
    }

    /// Sends the settings draft to the backend for saving.
    pub fn save_settings(&mut self) {
        let request_id = self.next_request_id();
        self.pending.config = Some(request_id);
        let config = self.settings.draft().clone();
        self.send(WorkerTask::SaveConfig { config, request_id });
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut SettingsForm {
        &mut self.settings
    }

    /// Writes the common or full property table of a file next to it as JSON.
    pub fn export_json(&mut self, file: &Path, scope: ScopeKind) {
        let table = match scope {
            ScopeKind::Common => self.cache.common_properties(file),
            ScopeKind::All => self.cache.all_properties(file),
        };
        let Some(table) = table.map(Arc::clone) else {
            self.notify(
                format!("Properties of {} are not loaded yet", file_label(file)),
                Severity::Error,
            );
            return;
        };

        let text = match view::properties_json(&table) {
            Ok(text) => text,
            Err(e) => {
                self.notify(format!("Cannot encode properties: {}", e), Severity::Error);
                return;
            }
        };
        let request_id = self.next_request_id();
        self.pending.exports.insert(request_id);
        self.send(WorkerTask::WriteTextFile {
            path: view::export_path(file, scope),
            text,
            request_id,
        });
    }

    // List tab

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.list_selected = 0;
    }

    pub fn toggle_view_mode(&mut self) {
        self.set_view_mode(self.view_mode.toggled());
    }

    /// Sets and applies the list filter at once, skipping the debounce.
    pub fn set_list_query(&mut self, text: &str) {
        self.list_query.set_input(text);
        if self.list_query.flush().is_some() {
            self.list_selected = 0;
        }
    }

    pub fn move_sort_cursor(&mut self, dir: isize) {
        let n = grid_columns().len() as isize;
        if n > 0 {
            self.sort_cursor = ((self.sort_cursor as isize + dir).rem_euclid(n)) as usize;
        }
    }

    /// Sorts the grid by the column under the sort cursor.
    pub fn sort_by_cursor(&mut self) -> bool {
        let columns = grid_columns();
        match columns.get(self.sort_cursor) {
            Some(column) => self.sort.click(column),
            None => false,
        }
    }

    /// Grid entries, recomputed only when the cache, query or sort changed.
    pub fn grid_entries(&mut self) -> &[ListEntry<GridRow>] {
        let key = (
            self.cache.generation(),
            self.list_query.applied().to_string(),
            self.sort.clone(),
        );
        self.grid_memo.get_or_compute(key, || {
            view::compose_grid(&self.cache, self.list_query.applied(), &self.sort)
        })
    }

    /// Card entries, recomputed only when the cache or query changed.
    pub fn card_entries(&mut self) -> &[ListEntry<Card>] {
        let key = (
            self.cache.generation(),
            self.list_query.applied().to_string(),
        );
        self.card_memo.get_or_compute(key, || {
            view::compose_cards(&self.cache, self.list_query.applied())
        })
    }

    pub fn list_len(&mut self) -> usize {
        match self.view_mode {
            ViewMode::Card => self.card_entries().len(),
            ViewMode::Grid => self.grid_entries().len(),
        }
    }

    /// File under the list cursor.
    pub fn selected_file(&mut self) -> Option<PathBuf> {
        let idx = self.list_selected;
        match self.view_mode {
            ViewMode::Card => self.card_entries().get(idx).map(entry_file),
            ViewMode::Grid => self.grid_entries().get(idx).map(entry_file),
        }
    }

    pub fn move_list_selection(&mut self, dir: isize) {
        let len = self.list_len();
        if len == 0 {
            self.list_selected = 0;
            return;
        }
        let next = (self.list_selected as isize + dir).clamp(0, len as isize - 1);
        self.list_selected = next as usize;
    }

    fn clamp_list_selection(&mut self) {
        let len = self.list_len();
        self.list_selected = self.list_selected.min(len.saturating_sub(1));
    }

    // Details tabs

    fn default_selection(&self, file: &Path) -> StreamSelection {
        if let Some(counts) = self.cache.stream_counts(file) {
            return StreamSelection::for_counts(counts);
        }
        let kinds = self
            .cache
            .all_properties(file)
            .map(|all| all.iter().map(|s| s.stream).collect::<Vec<_>>())
            .unwrap_or_default();
        StreamSelection::from_kinds(kinds)
    }

    fn init_selection(&mut self, file: &Path) {
        let has_counts = self.cache.stream_counts(file).is_some();
        let Some(state) = self.details.get(file) else {
            return;
        };
        if state.selection.is_none() && has_counts {
            let selection = self.default_selection(file);
            if let Some(state) = self.details.get_mut(file) {
                state.selection = Some(selection);
            }
        }
    }

    /// Stream kinds shown for a file: the stored choice, or every kind the file has.
    pub fn selection_for(&self, file: &Path) -> StreamSelection {
        self.details
            .get(file)
            .and_then(|s| s.selection.clone())
            .unwrap_or_else(|| self.default_selection(file))
    }

    fn update_selection(&mut self, f: impl FnOnce(&mut StreamSelection, usize)) {
        let Some(file) = self.current_details_file().map(Path::to_path_buf) else {
            return;
        };
        let default = self.selection_for(&file);
        let state = self.details.entry(file).or_default();
        let selection = state.selection.get_or_insert(default);
        f(selection, state.cursor);
    }

    /// Toggles the stream kind under the details cursor.
    pub fn toggle_stream_at_cursor(&mut self) {
        self.update_selection(|selection, cursor| {
            if let Some(kind) = selection.available().get(cursor).copied() {
                selection.toggle(kind);
            }
        });
    }

    pub fn toggle_stream(&mut self, kind: StreamKind) {
        self.update_selection(|selection, _| selection.toggle(kind));
    }

    pub fn select_all_streams(&mut self) {
        self.update_selection(|selection, _| selection.select_all());
    }

    pub fn select_no_streams(&mut self) {
        self.update_selection(|selection, _| selection.select_none());
    }

    pub fn move_details_cursor(&mut self, dir: isize) {
        let Some(file) = self.current_details_file().map(Path::to_path_buf) else {
            return;
        };
        let n = self.selection_for(&file).available().len() as isize;
        if let Some(state) = self.details.get_mut(&file)
            && n > 0
        {
            state.cursor = (state.cursor as isize + dir).clamp(0, n - 1) as usize;
        }
    }

    pub fn scroll_details(&mut self, dir: isize) {
        let Some(file) = self.current_details_file().map(Path::to_path_buf) else {
            return;
        };
        let last = self.details_line_count(&file).saturating_sub(1);
        if let Some(state) = self.details.get_mut(&file) {
            state.scroll = state.scroll.saturating_add_signed(dir).min(last);
        }
    }

    /// Lines the details body takes: a title and a blank line around each group's entries.
    pub fn details_line_count(&mut self, file: &Path) -> usize {
        self.details_groups(file)
            .iter()
            .map(|g| g.entries.len() + 2)
            .sum()
    }

    /// Instance groups of a file's details tab, recomputed only when an input changed.
    pub fn details_groups(&mut self, file: &Path) -> &[DetailsGroup] {
        let selection = self.selection_for(file);
        let query = self
            .details
            .get(file)
            .map(|s| s.query.applied())
            .unwrap_or_default()
            .to_string();
        let key = (
            file.to_path_buf(),
            self.cache.generation(),
            selection.clone(),
            query.clone(),
        );
        let streams: Arc<Vec<StreamProperties>> = self
            .cache
            .all_properties(file)
            .map(Arc::clone)
            .unwrap_or_default();
        self.details_memo
            .get_or_compute(key, || view::details_groups(&streams, &selection, &query))
    }

    // About tab

    /// Parameter catalog entries matching the stream filter and query.
    pub fn filtered_parameters(&self) -> Vec<&Parameter> {
        match &self.parameters {
            Some(params) => {
                view::filter_parameters(params, self.param_stream, self.param_query.applied())
            }
            None => Vec::new(),
        }
    }

    /// Steps the stream filter through all kinds of the catalog and back to none.
    pub fn cycle_param_stream(&mut self) {
        let choices = self
            .parameters
            .as_deref()
            .map(view::stream_choices)
            .unwrap_or_default();
        self.param_stream = match self.param_stream {
            None => choices.first().copied(),
            Some(current) => {
                let pos = choices.iter().position(|k| *k == current);
                pos.and_then(|p| choices.get(p + 1)).copied()
            }
        };
        self.pager.reset();
    }

    pub fn next_param_page(&mut self) {
        let total = self.filtered_parameters().len();
        self.pager.next(total);
    }

    pub fn prev_param_page(&mut self) {
        self.pager.prev();
    }

    pub fn cycle_page_size(&mut self) {
        self.pager.cycle_page_size();
    }

    // Filters

    /// Query of the active tab, if the tab has a filter.
    pub(super) fn active_query_mut(&mut self) -> Option<&mut QueryState> {
        match self.workspace.current_tab() {
            TabKind::List => Some(&mut self.list_query),
            TabKind::Details(file) => self.details.get_mut(file).map(|s| &mut s.query),
            TabKind::About => Some(&mut self.param_query),
            TabKind::Config => None,
        }
    }

    pub fn active_query(&self) -> Option<&QueryState> {
        match self.workspace.current_tab() {
            TabKind::List => Some(&self.list_query),
            TabKind::Details(file) => self.details_query(file),
            TabKind::About => Some(&self.param_query),
            TabKind::Config => None,
        }
    }

    fn on_list_query(&mut self) {
        self.list_selected = 0;
    }

    fn on_param_query(&mut self) {
        self.pager.reset();
    }

    /// Applies every filter at once, used when a filter prompt is confirmed.
    pub(super) fn flush_queries(&mut self) {
        if self.list_query.flush().is_some() {
            self.on_list_query();
        }
        for state in self.details.values_mut() {
            if state.query.flush().is_some() {
                state.scroll = 0;
            }
        }
        if self.param_query.flush().is_some() {
            self.on_param_query();
        }
    }

    /// The heart of the app: updates state and handles worker messages
    ///
    /// Is used by the main event loop to update the session state.
    /// Returns true if anything visible changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = self.overlays.expire(Instant::now());

        if self.list_query.take_query().is_some() {
            self.on_list_query();
            changed = true;
        }
        for state in self.details.values_mut() {
            if state.query.take_query().is_some() {
                state.scroll = 0;
                changed = true;
            }
        }
        if self.param_query.take_query().is_some() {
            self.on_param_query();
            changed = true;
        }

        while let Ok(response) = self.workers.response_rx().try_recv() {
            changed = true;
            self.handle_response(response);
        }
        changed
    }

    fn handle_response(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::FilesResolved {
                result,
                append,
                request_id,
            } => {
                if !self.pending.files.remove(&request_id) {
                    log::warn!("Discarding stale file list ({})", request_id);
                    return;
                }
                match result {
                    Ok(files) if files.is_empty() => {
                        self.notify("No media files found", Severity::Info);
                    }
                    Ok(files) => self.apply_files(files, append),
                    Err(e) => self.notify_error("Cannot open files", &e),
                }
            }

            WorkerResponse::StreamCounts {
                file,
                result,
                request_id,
            } => match self.cache.apply_stream_counts(&file, request_id, result) {
                Applied::Stored => {
                    log::debug!("Stream counts of {} loaded", file.display());
                    self.init_selection(&file);
                    self.cache.run_pass(self.workers.task_tx());
                }
                Applied::Stale => {
                    log::warn!("Discarding stale stream counts of {}", file.display());
                }
                Applied::Failed(e) => {
                    self.notify_error(&format!("Cannot read streams of {}", file_label(&file)), &e);
                }
            },

            WorkerResponse::Properties {
                file,
                scope,
                result,
                request_id,
            } => match self.cache.apply_properties(&file, scope, request_id, result) {
                Applied::Stored => {
                    log::debug!("{} properties of {} loaded", scope.name(), file.display());
                    self.cache.run_pass(self.workers.task_tx());
                }
                Applied::Stale => {
                    log::warn!(
                        "Discarding stale {} properties of {}",
                        scope.name(),
                        file.display()
                    );
                }
                Applied::Failed(e) => {
                    let context = format!("Cannot read properties of {}", file_label(&file));
                    self.notify_error(&context, &e);
                }
            },

            WorkerResponse::About { result, request_id } => {
                if self.pending.about != Some(request_id) {
                    return;
                }
                self.pending.about = None;
                match result {
                    Ok(about) => self.about = Some(about),
                    Err(e) => self.notify_error("Cannot read version info", &e),
                }
            }

            WorkerResponse::Parameters { result, request_id } => {
                if self.pending.parameters != Some(request_id) {
                    return;
                }
                self.pending.parameters = None;
                match result {
                    Ok(params) => {
                        self.parameters = Some(params);
                        self.pager.reset();
                    }
                    Err(e) => self.notify_error("Cannot read parameter list", &e),
                }
            }

            WorkerResponse::Config {
                result,
                saved,
                request_id,
            } => {
                if self.pending.config != Some(request_id) {
                    return;
                }
                self.pending.config = None;
                match (result, saved) {
                    (Ok(general), true) => {
                        self.apply_general(general.clone());
                        self.settings.mark_saved(general);
                        self.notify("Settings saved.", Severity::Info);
                    }
                    (Ok(general), false) => {
                        self.apply_general(general.clone());
                        self.settings.load(general);
                    }
                    (Err(e), true) => self.notify_error("Cannot save settings", &e),
                    (Err(e), false) => self.notify_error("Cannot load settings", &e),
                }
            }

            WorkerResponse::TextFileWritten {
                path,
                result,
                request_id,
            } => {
                if !self.pending.exports.remove(&request_id) {
                    return;
                }
                match result {
                    Ok(()) => self.notify(
                        format!("Json code is saved to {}", path.display()),
                        Severity::Info,
                    ),
                    Err(e) => self.notify_error(&format!("Cannot save {}", path.display()), &e),
                }
            }
        }
    }

    fn apply_files(&mut self, files: Vec<PathBuf>, append: bool) {
        let removed = self.cache.set_files(files, append);
        for file in &removed {
            self.forget_details(file);
        }
        let sent = self.cache.run_pass(self.workers.task_tx());
        log::debug!(
            "{} file(s) tracked, {} dropped, {} request(s) sent",
            self.cache.files().len(),
            removed.len(),
            sent
        );
        self.clamp_list_selection();
    }

    fn apply_general(&mut self, general: General) {
        self.config.set_general(general);
    }

    /// Central key handlers
    ///
    /// Coordinates the keymap and the handler module functions.
    pub fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if self.actions.is_input_mode() {
            return self.handle_input_mode(key);
        }

        if key.code == KeyCode::Esc {
            if self.overlays.is_empty() {
                return KeypressResult::Continue;
            }
            self.overlays.clear();
            return KeypressResult::Consumed;
        }

        if let Some(action) = self.keymap.lookup(key) {
            return match action {
                Action::System(act) => self.handle_sys_action(act),
                Action::Tab(act) => self.handle_tab_action(act),
                Action::Nav(act) => self.handle_nav_action(act),
                Action::File(act) => self.handle_file_action(act),
                Action::View(act) => self.handle_view_action(act),
            };
        }

        KeypressResult::Continue
    }

    /// Pasted text: a drag and drop of files into the terminal pastes their paths.
    pub fn handle_paste(&mut self, text: &str) {
        if self.actions.is_input_mode() {
            for c in text.chars().filter(|c| !c.is_control()) {
                self.actions.action_insert_at_cursor(c);
            }
            self.sync_filter_input();
            return;
        }
        let paths = crate::utils::parse_dropped_paths(text);
        self.drop_paths(paths);
    }

    /// Mirrors the filter prompt into the active query, which applies it after the debounce.
    pub(super) fn sync_filter_input(&mut self) {
        if self.actions.input_mode() != Some(InputMode::Filter) {
            return;
        }
        let text = self.actions.input_buffer().to_string();
        if let Some(query) = self.active_query_mut() {
            query.set_input(&text);
        }
    }
}

fn entry_file<T: EntryFile>(entry: &ListEntry<T>) -> PathBuf {
    match entry {
        ListEntry::Pending { file, .. } => file.clone(),
        ListEntry::Ready(item) => item.file().to_path_buf(),
    }
}

trait EntryFile {
    fn file(&self) -> &Path;
}

impl EntryFile for GridRow {
    fn file(&self) -> &Path {
        &self.file
    }
}

impl EntryFile for Card {
    fn file(&self) -> &Path {
        &self.file
    }
}

/// Short name of a file for notifications.
pub fn file_label(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

// Session tests
#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{Receiver, Sender, unbounded};
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn session() -> (Session, Receiver<WorkerTask>, Sender<WorkerResponse>) {
        let (task_tx, task_rx) = unbounded();
        let (res_tx, res_rx) = unbounded();
        let session = Session::new(Config::default(), Workers::from_channels(task_tx, res_rx));
        (session, task_rx, res_tx)
    }

    #[test]
    fn tick_clears_expired_notifications() {
        let (mut session, _tasks, _responses) = session();
        session.overlays.push(Overlay::Notification {
            title: "Timed".into(),
            severity: Severity::Info,
            until: Instant::now() - Duration::from_secs(1),
        });
        assert!(session.tick());
        assert_eq!(session.notifications().count(), 0);
    }

    #[test]
    fn handle_keypress_continue_if_no_action() {
        let (mut session, _tasks, _responses) = session();
        let key = KeyEvent::new(KeyCode::Null, KeyModifiers::NONE);
        assert_eq!(session.handle_keypress(key), KeypressResult::Continue);
    }

    #[test]
    fn stale_file_list_is_ignored() -> Result<(), Box<dyn std::error::Error>> {
        let (mut session, tasks, responses) = session();
        session.add_paths(vec![PathBuf::from("/a")], false);
        session.add_paths(vec![PathBuf::from("/b")], false);
        let ids: Vec<u64> = tasks
            .try_iter()
            .map(|t| match t {
                WorkerTask::ResolveFiles { request_id, .. } => request_id,
                other => panic!("unexpected {:?}", other),
            })
            .collect();

        responses.send(WorkerResponse::FilesResolved {
            result: Ok(vec![PathBuf::from("/a/old.mkv")]),
            append: false,
            request_id: ids[0],
        })?;
        session.tick();
        assert!(session.cache().is_empty());

        responses.send(WorkerResponse::FilesResolved {
            result: Ok(vec![PathBuf::from("/b/new.mkv")]),
            append: false,
            request_id: ids[1],
        })?;
        session.tick();
        assert_eq!(session.cache().files(), &[PathBuf::from("/b/new.mkv")]);
        Ok(())
    }

    #[test]
    fn export_without_data_notifies() {
        let (mut session, tasks, _responses) = session();
        session.export_json(Path::new("a.mkv"), ScopeKind::All);
        assert!(tasks.try_recv().is_err());
        let (title, severity) = session.notifications().next().unwrap();
        assert!(title.contains("a.mkv"));
        assert_eq!(severity, Severity::Error);
    }
}
