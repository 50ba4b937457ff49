//! Per-file property cache for mediascope.
//!
//! Every tracked file owns three independently filled slots:
//! - stream counts,
//! - common properties (only what the summary views show),
//! - all properties (fetched when a details tab opens).
//!
//! A slot is absent, [Slot::Loading] with the id of the request in flight, or
//! [Slot::Present]. It is marked Loading *before* the task is sent, so asking again while
//! a request is outstanding does nothing. A response is applied only when its id matches
//! the Loading id of its slot; anything else (deleted file, abandoned request) is stale.
//!
//! Present slots are never refetched. A failed request leaves the slot absent so a later
//! pass picks it up again.

use crate::core::backend::BackendError;
use crate::core::property::common_property_requests;
use crate::core::stream::{StreamCounts, StreamProperties};
use crate::core::worker::{PropertyScope, ScopeKind, WorkerTask};

use crossbeam_channel::Sender;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// State of a filled or in-flight cache slot. An absent slot is `None`.
#[derive(Debug, Clone)]
pub enum Slot<T> {
    Loading(u64),
    Present(Arc<T>),
}

impl<T> Slot<T> {
    pub fn present(&self) -> Option<&Arc<T>> {
        match self {
            Slot::Present(v) => Some(v),
            Slot::Loading(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Slot::Loading(_))
    }
}

/// Result of applying a worker response to the cache.
#[derive(Debug)]
pub enum Applied {
    Stored,
    /// The response no longer belongs to an outstanding request
    Stale,
    /// The request failed, its slot is absent again
    Failed(BackendError),
}

#[derive(Debug, Default)]
struct CacheEntry {
    counts: Option<Slot<StreamCounts>>,
    common: Option<Slot<Vec<StreamProperties>>>,
    all: Option<Slot<Vec<StreamProperties>>>,
}

impl CacheEntry {
    fn slots_loading(&self) -> bool {
        self.counts.as_ref().is_some_and(Slot::is_loading)
            || self.common.as_ref().is_some_and(Slot::is_loading)
            || self.all.as_ref().is_some_and(Slot::is_loading)
    }

    fn abandon_loading(&mut self) {
        if self.counts.as_ref().is_some_and(Slot::is_loading) {
            self.counts = None;
        }
        if self.common.as_ref().is_some_and(Slot::is_loading) {
            self.common = None;
        }
        if self.all.as_ref().is_some_and(Slot::is_loading) {
            self.all = None;
        }
    }
}

/// The set of tracked media files and their cached metadata.
#[derive(Debug, Default)]
pub struct PropertyCache {
    files: Vec<PathBuf>,
    entries: HashMap<PathBuf, CacheEntry>,
    generation: u64,
    next_request_id: u64,
}

fn begin<T>(slot: &mut Option<Slot<T>>, request_id: u64) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(Slot::Loading(request_id));
    true
}

fn finish<T>(
    slot: &mut Option<Slot<T>>,
    request_id: u64,
    result: Result<T, BackendError>,
) -> Applied {
    match slot {
        Some(Slot::Loading(id)) if *id == request_id => {}
        _ => return Applied::Stale,
    }
    match result {
        Ok(value) => {
            *slot = Some(Slot::Present(Arc::new(value)));
            Applied::Stored
        }
        Err(e) => {
            *slot = None;
            Applied::Failed(e)
        }
    }
}

impl PropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Getters / accessors

    /// Tracked files in insertion order.
    #[inline]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[inline]
    pub fn contains(&self, file: &Path) -> bool {
        self.entries.contains_key(file)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Bumped on every change, used as the memoization key of derived views.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stream_counts(&self, file: &Path) -> Option<&Arc<StreamCounts>> {
        self.entries.get(file)?.counts.as_ref()?.present()
    }

    pub fn common_properties(&self, file: &Path) -> Option<&Arc<Vec<StreamProperties>>> {
        self.entries.get(file)?.common.as_ref()?.present()
    }

    pub fn all_properties(&self, file: &Path) -> Option<&Arc<Vec<StreamProperties>>> {
        self.entries.get(file)?.all.as_ref()?.present()
    }

    /// True while any slot of the file has a request in flight.
    pub fn is_loading(&self, file: &Path) -> bool {
        self.entries.get(file).is_some_and(CacheEntry::slots_loading)
    }

    fn next_id(&mut self) -> u64 {
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.next_request_id
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    // File set

    /// Merges (`append`) or replaces the tracked file set.
    ///
    /// Duplicates are ignored. Returns the files dropped by a replace, whose cached data is gone.
    pub fn set_files(&mut self, files: Vec<PathBuf>, append: bool) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        if !append {
            let keep: HashSet<&PathBuf> = files.iter().collect();
            removed = self
                .files
                .iter()
                .filter(|f| !keep.contains(f))
                .cloned()
                .collect();
            for file in &removed {
                self.entries.remove(file);
            }
            self.files.retain(|f| keep.contains(f));
        }

        for file in files {
            if !self.entries.contains_key(&file) {
                self.entries.insert(file.clone(), CacheEntry::default());
                self.files.push(file);
            }
        }
        self.touch();
        removed
    }

    /// Forgets a file and all its cached data. Responses still in flight become stale.
    pub fn remove(&mut self, file: &Path) -> bool {
        if self.entries.remove(file).is_none() {
            return false;
        }
        self.files.retain(|f| f != file);
        self.touch();
        true
    }

    /// Forgets every file. Returns what was tracked.
    pub fn clear(&mut self) -> Vec<PathBuf> {
        self.entries.clear();
        self.touch();
        std::mem::take(&mut self.files)
    }

    // Fetching

    fn send(
        &mut self,
        tx: &Sender<WorkerTask>,
        task: WorkerTask,
        file: &Path,
        scope: Option<ScopeKind>,
    ) -> bool {
        if tx.send(task).is_ok() {
            self.touch();
            return true;
        }
        log::error!("Backend worker is gone, cannot load {}", file.display());
        if let Some(entry) = self.entries.get_mut(file) {
            match scope {
                None => entry.counts = None,
                Some(ScopeKind::Common) => entry.common = None,
                Some(ScopeKind::All) => entry.all = None,
            }
        }
        false
    }

    /// Requests the stream counts of a file unless they are present or in flight.
    ///
    /// Returns true if a request was sent.
    pub fn ensure_stream_counts(&mut self, file: &Path, tx: &Sender<WorkerTask>) -> bool {
        let request_id = self.next_id();
        let Some(entry) = self.entries.get_mut(file) else {
            return false;
        };
        if !begin(&mut entry.counts, request_id) {
            return false;
        }
        log::debug!("Loading stream counts of {} ({})", file.display(), request_id);
        let task = WorkerTask::LoadStreamCounts {
            file: file.to_path_buf(),
            request_id,
        };
        self.send(tx, task, file, None)
    }

    /// Requests the common properties of a file once its stream counts are present.
    ///
    /// When no property applies to the file's streams nothing is requested. An `explicit`
    /// call then marks the slot present with an empty table, an automatic one leaves it alone.
    pub fn ensure_common_properties(
        &mut self,
        file: &Path,
        tx: &Sender<WorkerTask>,
        explicit: bool,
    ) -> bool {
        let request_id = self.next_id();
        let Some(entry) = self.entries.get_mut(file) else {
            return false;
        };
        if entry.common.is_some() {
            return false;
        }
        let Some(counts) = entry.counts.as_ref().and_then(Slot::present) else {
            return false;
        };

        let requests = common_property_requests(counts);
        if requests.is_empty() {
            if explicit {
                entry.common = Some(Slot::Present(Arc::new(Vec::new())));
                self.touch();
            }
            return false;
        }

        entry.common = Some(Slot::Loading(request_id));
        log::debug!(
            "Loading {} common properties of {} ({})",
            requests.len(),
            file.display(),
            request_id
        );
        let task = WorkerTask::LoadProperties {
            file: file.to_path_buf(),
            scope: PropertyScope::Common(requests),
            request_id,
        };
        self.send(tx, task, file, Some(ScopeKind::Common))
    }

    /// Requests every property of a file unless present or in flight.
    pub fn ensure_all_properties(&mut self, file: &Path, tx: &Sender<WorkerTask>) -> bool {
        let request_id = self.next_id();
        let Some(entry) = self.entries.get_mut(file) else {
            return false;
        };
        if !begin(&mut entry.all, request_id) {
            return false;
        }
        log::debug!("Loading all properties of {} ({})", file.display(), request_id);
        let task = WorkerTask::LoadProperties {
            file: file.to_path_buf(),
            scope: PropertyScope::All,
            request_id,
        };
        self.send(tx, task, file, Some(ScopeKind::All))
    }

    /// Automatic pass over every file: counts first, then common properties.
    ///
    /// Returns the number of requests sent.
    pub fn run_pass(&mut self, tx: &Sender<WorkerTask>) -> usize {
        let files = self.files.clone();
        files
            .iter()
            .map(|file| self.pass_file(file, tx))
            .sum()
    }

    fn pass_file(&mut self, file: &Path, tx: &Sender<WorkerTask>) -> usize {
        let mut sent = usize::from(self.ensure_stream_counts(file, tx));
        sent += usize::from(self.ensure_common_properties(file, tx, false));
        sent
    }

    /// Abandons the requests in flight for a file and asks for its data again.
    ///
    /// Late answers to the abandoned requests are discarded as stale. This is an explicit
    /// request, so a file without summary properties gets an empty common table.
    pub fn retry(&mut self, file: &Path, tx: &Sender<WorkerTask>) -> usize {
        let Some(entry) = self.entries.get_mut(file) else {
            return 0;
        };
        let had_all = entry.all.is_some();
        entry.abandon_loading();
        let lost_all = had_all && entry.all.is_none();
        self.touch();

        let mut sent = usize::from(self.ensure_stream_counts(file, tx));
        sent += usize::from(self.ensure_common_properties(file, tx, true));
        if lost_all {
            sent += usize::from(self.ensure_all_properties(file, tx));
        }
        sent
    }

    // Responses

    pub fn apply_stream_counts(
        &mut self,
        file: &Path,
        request_id: u64,
        result: Result<StreamCounts, BackendError>,
    ) -> Applied {
        let Some(entry) = self.entries.get_mut(file) else {
            return Applied::Stale;
        };
        let applied = finish(&mut entry.counts, request_id, result);
        if !matches!(applied, Applied::Stale) {
            self.touch();
        }
        applied
    }

    pub fn apply_properties(
        &mut self,
        file: &Path,
        scope: ScopeKind,
        request_id: u64,
        result: Result<Vec<StreamProperties>, BackendError>,
    ) -> Applied {
        let Some(entry) = self.entries.get_mut(file) else {
            return Applied::Stale;
        };
        let slot = match scope {
            ScopeKind::Common => &mut entry.common,
            ScopeKind::All => &mut entry.all,
        };
        let applied = finish(slot, request_id, result);
        if !matches!(applied, Applied::Stale) {
            self.touch();
        }
        applied
    }
}
