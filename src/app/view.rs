//! View composer for mediascope.
//!
//! Pure projections of the [PropertyCache] into what the tabs display:
//! grid rows, file cards, details groups and the parameter catalog.
//! Nothing here talks to the backend. [Memo] keeps the last projection around so it is only
//! recomputed when one of its inputs changes.

use crate::app::cache::PropertyCache;
use crate::core::format::{format_stream_count, parse_leading_float};
use crate::core::property::{
    Column, DEFINED_KINDS, PropertyDefinition, SortKind, card_columns, grid_columns,
};
use crate::core::stream::{Parameter, PropertyMap, StreamCounts, StreamKind, StreamProperties};
use crate::core::worker::ScopeKind;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Caches one derived value together with the inputs it was computed from.
#[derive(Debug)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value when `key` equals the last key, computes it otherwise.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let stale = self.entry.as_ref().is_none_or(|(k, _)| *k != key);
        if stale {
            self.entry = None;
        }
        let (_, value) = self.entry.get_or_insert_with(|| (key, compute()));
        value
    }
}

fn contains_query(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

// Grid rows

/// One flattened row of the list view.
///
/// Cells are keyed by column id (`{Kind}:{property}`) and hold raw values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub file: PathBuf,
    pub cells: PropertyMap,
}

impl GridRow {
    #[inline]
    pub fn cell(&self, id: &str) -> &str {
        self.cells.get(id).map(String::as_str).unwrap_or("")
    }

    /// Formatted value of a column.
    pub fn render(&self, column: &Column) -> String {
        column.def.render(&self.cells, &column.id())
    }

    /// Case-insensitive match on any cell or the file path. `needle` must be lowercase.
    fn matches(&self, needle: &str) -> bool {
        contains_query(&self.file.to_string_lossy(), needle)
            || self.cells.values().any(|v| contains_query(v, needle))
    }
}

/// Flattens the summary data of a file into a grid row.
///
/// Only the first instance of every kind contributes; the stream counts become
/// `General:{Kind}:Count` cells.
pub fn grid_row(file: &Path, counts: &StreamCounts, streams: &[StreamProperties]) -> GridRow {
    let mut cells = PropertyMap::new();
    for instance in streams.iter().filter(|s| s.index == 0) {
        for (name, value) in &instance.properties {
            cells
                .entry(format!("{}:{}", instance.stream.name(), name))
                .or_insert_with(|| value.clone());
        }
    }
    for (kind, count) in counts.iter() {
        cells.insert(format!("General:{}:Count", kind.name()), count.to_string());
    }
    cells
        .entry("General:CompleteName".to_string())
        .or_insert_with(|| file.to_string_lossy().into_owned());

    GridRow {
        file: file.to_path_buf(),
        cells,
    }
}

/// Keeps the rows where any cell contains `query`, ignoring case.
///
/// An empty query keeps every row.
pub fn filter_rows(rows: &[GridRow], query: &str) -> Vec<GridRow> {
    if query.is_empty() {
        return rows.to_vec();
    }
    let needle = query.to_lowercase();
    rows.iter().filter(|r| r.matches(&needle)).cloned().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort column of the grid, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    column: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Selects a column for sorting.
    ///
    /// The active column flips direction, any other column becomes active ascending.
    /// Columns that cannot be sorted are ignored. Returns true if anything changed.
    pub fn click(&mut self, column: &Column) -> bool {
        if column.def.sort == SortKind::None {
            return false;
        }
        let id = column.id();
        if self.column.as_deref() == Some(id.as_str()) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(id);
            self.direction = SortDirection::Ascending;
        }
        true
    }

    /// The active column, resolved against the grid columns.
    pub fn active_column(&self) -> Option<Column> {
        let id = self.column.as_deref()?;
        grid_columns().into_iter().find(|c| c.id() == id)
    }
}

fn compare_cells(kind: SortKind, a: &str, b: &str) -> Ordering {
    match kind {
        SortKind::Numeric => {
            let a = parse_leading_float(a).unwrap_or(0.0);
            let b = parse_leading_float(b).unwrap_or(0.0);
            a.total_cmp(&b)
        }
        SortKind::Lexicographic => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        SortKind::None => Ordering::Equal,
    }
}

/// Sorts rows by the raw value of a column.
///
/// Descending is the exact reverse of the stable ascending order.
/// Columns classified [SortKind::None] leave the rows untouched.
pub fn sort_rows(rows: &mut [GridRow], column: &Column, direction: SortDirection) {
    let kind = column.def.sort;
    if kind == SortKind::None {
        return;
    }
    let id = column.id();
    rows.sort_by(|a, b| compare_cells(kind, a.cell(&id), b.cell(&id)));
    if direction == SortDirection::Descending {
        rows.reverse();
    }
}

// List view composition

/// A file in the list views.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry<T> {
    /// Summary data not available yet. `loading` is false after a failed fetch.
    Pending { file: PathBuf, loading: bool },
    Ready(T),
}

fn pending<T>(cache: &PropertyCache, file: &Path) -> ListEntry<T> {
    ListEntry::Pending {
        file: file.to_path_buf(),
        loading: cache.is_loading(file),
    }
}

fn summary_row(cache: &PropertyCache, file: &Path) -> Option<GridRow> {
    let counts = cache.stream_counts(file)?;
    let common = cache.common_properties(file)?;
    Some(grid_row(file, counts, common))
}

/// Grid entries: matching rows filtered and sorted, followed by the files still pending.
pub fn compose_grid(
    cache: &PropertyCache,
    query: &str,
    sort: &SortState,
) -> Vec<ListEntry<GridRow>> {
    let mut rows = Vec::new();
    let mut waiting = Vec::new();
    for file in cache.files() {
        match summary_row(cache, file) {
            Some(row) => rows.push(row),
            None => waiting.push(pending(cache, file)),
        }
    }

    let mut rows = filter_rows(&rows, query);
    if let Some(column) = sort.active_column() {
        sort_rows(&mut rows, &column, sort.direction());
    }

    rows.into_iter()
        .map(ListEntry::Ready)
        .chain(waiting)
        .collect()
}

/// One stream kind inside a file card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSection {
    pub kind: StreamKind,
    pub columns: Vec<&'static PropertyDefinition>,
    /// Formatted cells, one row per instance
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub file: PathBuf,
    pub summary: String,
    pub sections: Vec<CardSection>,
}

/// Builds the card of a file: a section per defined kind the file has, one row per instance.
pub fn card(file: &Path, counts: &StreamCounts, streams: &[StreamProperties]) -> Card {
    let mut sections = Vec::new();
    for kind in DEFINED_KINDS {
        if counts.count(kind) == 0 {
            continue;
        }
        let columns: Vec<_> = card_columns(kind).collect();
        if columns.is_empty() {
            continue;
        }

        let mut instances: Vec<_> = streams.iter().filter(|s| s.stream == kind).collect();
        instances.sort_by_key(|s| s.index);
        let rows = instances
            .iter()
            .map(|s| {
                columns
                    .iter()
                    .map(|def| def.render(&s.properties, def.name))
                    .collect()
            })
            .collect();

        sections.push(CardSection {
            kind,
            columns,
            rows,
        });
    }

    Card {
        file: file.to_path_buf(),
        summary: format_stream_count(counts),
        sections,
    }
}

/// Card entries in file order. Pending files keep their place, ready files must match the query.
pub fn compose_cards(cache: &PropertyCache, query: &str) -> Vec<ListEntry<Card>> {
    let needle = query.to_lowercase();
    cache
        .files()
        .iter()
        .filter_map(|file| {
            let (Some(counts), Some(common)) =
                (cache.stream_counts(file), cache.common_properties(file))
            else {
                return Some(pending(cache, file));
            };
            if !needle.is_empty() && !grid_row(file, counts, common).matches(&needle) {
                return None;
            }
            Some(ListEntry::Ready(card(file, counts, common)))
        })
        .collect()
}

// Details

/// Stream kinds shown in a details tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamSelection {
    available: Vec<StreamKind>,
    selected: BTreeSet<StreamKind>,
}

impl StreamSelection {
    /// Every available kind starts selected.
    pub fn from_kinds(kinds: impl IntoIterator<Item = StreamKind>) -> Self {
        let mut available: Vec<_> = kinds.into_iter().filter(|k| *k != StreamKind::Max).collect();
        available.sort();
        available.dedup();
        let selected = available.iter().copied().collect();
        Self {
            available,
            selected,
        }
    }

    pub fn for_counts(counts: &StreamCounts) -> Self {
        Self::from_kinds(counts.present_kinds())
    }

    pub fn available(&self) -> &[StreamKind] {
        &self.available
    }

    #[inline]
    pub fn is_selected(&self, kind: StreamKind) -> bool {
        self.selected.contains(&kind)
    }

    pub fn toggle(&mut self, kind: StreamKind) {
        if !self.available.contains(&kind) {
            return;
        }
        if !self.selected.remove(&kind) {
            self.selected.insert(kind);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.available.iter().copied().collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    pub fn can_select_all(&self) -> bool {
        self.selected.len() < self.available.len()
    }

    pub fn can_select_none(&self) -> bool {
        !self.selected.is_empty()
    }
}

/// One stream instance in the details tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsGroup {
    pub kind: StreamKind,
    pub index: usize,
    pub entries: Vec<(String, String)>,
}

impl DetailsGroup {
    /// e.g. "Audio (2)"
    pub fn title(&self) -> String {
        format!("{} ({})", self.kind.name(), self.index + 1)
    }
}

/// Groups the full properties of a file by instance.
///
/// Only selected kinds are kept. A non-empty query keeps the entries whose key or value
/// contains it and drops instances left without entries.
pub fn details_groups(
    streams: &[StreamProperties],
    selection: &StreamSelection,
    query: &str,
) -> Vec<DetailsGroup> {
    let needle = query.to_lowercase();
    let mut instances: Vec<_> = streams
        .iter()
        .filter(|s| selection.is_selected(s.stream))
        .collect();
    instances.sort_by_key(|s| (s.stream, s.index));

    instances
        .into_iter()
        .filter_map(|s| {
            let entries: Vec<_> = s
                .properties
                .iter()
                .filter(|(k, v)| {
                    needle.is_empty() || contains_query(k, &needle) || contains_query(v, &needle)
                })
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            if !needle.is_empty() && entries.is_empty() {
                return None;
            }
            Some(DetailsGroup {
                kind: s.stream,
                index: s.index,
                entries,
            })
        })
        .collect()
}

// JSON

/// Pretty JSON of a property table, as shown and exported.
pub fn properties_json(streams: &[StreamProperties]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(streams)
}

/// Where the JSON export of a file goes: `<file>.<common|all>.json`.
pub fn export_path(file: &Path, scope: ScopeKind) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(format!(".{}.json", scope.name()));
    PathBuf::from(name)
}

// Parameter catalog

/// Distinct stream kinds of the catalog, in catalog order.
pub fn stream_choices(params: &[Parameter]) -> Vec<StreamKind> {
    let mut kinds = Vec::new();
    for param in params {
        if !kinds.contains(&param.stream) {
            kinds.push(param.stream);
        }
    }
    kinds
}

/// Catalog entries of a kind (or all kinds) whose property name contains `query`, ignoring case.
pub fn filter_parameters<'a>(
    params: &'a [Parameter],
    stream: Option<StreamKind>,
    query: &str,
) -> Vec<&'a Parameter> {
    let needle = query.to_lowercase();
    params
        .iter()
        .filter(|p| stream.is_none_or(|k| p.stream == k))
        .filter(|p| needle.is_empty() || contains_query(&p.property, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_streams() -> Vec<StreamProperties> {
        vec![
            StreamProperties::new(
                StreamKind::General,
                0,
                props(&[("Format", "Matroska"), ("Duration", "5000")]),
            ),
            StreamProperties::new(
                StreamKind::Audio,
                1,
                props(&[("Format_Commercial", "DTS"), ("Language", "de")]),
            ),
            StreamProperties::new(
                StreamKind::Audio,
                0,
                props(&[("Format_Commercial", "AAC"), ("Language", "en")]),
            ),
            StreamProperties::new(
                StreamKind::Video,
                0,
                props(&[("Format", "AVC"), ("Width", "1920"), ("Height", "1080")]),
            ),
        ]
    }

    fn sample_counts() -> StreamCounts {
        [
            (StreamKind::General, 1),
            (StreamKind::Video, 1),
            (StreamKind::Audio, 2),
            (StreamKind::Text, 0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn grid_row_flattens_first_instances() {
        let row = grid_row(Path::new("/m/a.mkv"), &sample_counts(), &sample_streams());
        assert_eq!(row.cell("Audio:Format_Commercial"), "AAC");
        assert_eq!(row.cell("Video:Width"), "1920");
        assert_eq!(row.cell("General:Audio:Count"), "2");
        assert_eq!(row.cell("General:Text:Count"), "0");
        assert_eq!(row.cell("General:CompleteName"), "/m/a.mkv");
    }

    #[test]
    fn card_has_one_row_per_instance() {
        let card = card(Path::new("a.mkv"), &sample_counts(), &sample_streams());
        assert_eq!(card.summary, "General: 1, Video: 1, Audio: 2");

        let kinds: Vec<_> = card.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![StreamKind::General, StreamKind::Video, StreamKind::Audio]
        );

        let audio = &card.sections[2];
        let format = audio
            .columns
            .iter()
            .position(|d| d.name == "Format_Commercial")
            .unwrap();
        assert_eq!(audio.rows.len(), 2);
        assert_eq!(audio.rows[0][format], "AAC");
        assert_eq!(audio.rows[1][format], "DTS");

        let video = &card.sections[1];
        let res = video
            .columns
            .iter()
            .position(|d| d.name == "Resolution")
            .unwrap();
        assert_eq!(video.rows[0][res], "1920x1080");
    }

    #[test]
    fn details_sorted_by_kind_then_index() {
        let selection = StreamSelection::for_counts(&sample_counts());
        let groups = details_groups(&sample_streams(), &selection, "");
        let titles: Vec<_> = groups.iter().map(DetailsGroup::title).collect();
        assert_eq!(titles, vec!["General (1)", "Video (1)", "Audio (1)", "Audio (2)"]);
    }

    #[test]
    fn details_filter_drops_empty_instances() {
        let selection = StreamSelection::for_counts(&sample_counts());
        let groups = details_groups(&sample_streams(), &selection, "LANG");
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.kind == StreamKind::Audio));
        assert!(groups.iter().all(|g| g.entries.len() == 1));

        let groups = details_groups(&sample_streams(), &selection, "dts");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].index, 1);
    }

    #[test]
    fn details_selection_applies_with_filter() {
        let mut selection = StreamSelection::for_counts(&sample_counts());
        selection.toggle(StreamKind::Audio);
        let groups = details_groups(&sample_streams(), &selection, "format");
        let kinds: Vec<_> = groups.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![StreamKind::General, StreamKind::Video]);
    }

    #[test]
    fn selection_bulk_actions() {
        let mut selection = StreamSelection::for_counts(&sample_counts());
        assert_eq!(
            selection.available(),
            &[StreamKind::General, StreamKind::Video, StreamKind::Audio]
        );
        assert!(!selection.can_select_all());
        assert!(selection.can_select_none());

        selection.select_none();
        assert!(selection.can_select_all());
        assert!(!selection.can_select_none());

        // kinds the file does not have cannot be toggled on
        selection.toggle(StreamKind::Menu);
        assert!(!selection.is_selected(StreamKind::Menu));

        selection.select_all();
        assert!(selection.is_selected(StreamKind::Audio));
    }

    #[test]
    fn memo_recomputes_only_on_key_change() {
        let mut memo = Memo::new();
        let mut calls = 0;
        memo.get_or_compute((1, "q"), || {
            calls += 1;
            10
        });
        memo.get_or_compute((1, "q"), || {
            calls += 1;
            11
        });
        assert_eq!(calls, 1);
        let value = *memo.get_or_compute((2, "q"), || 12);
        assert_eq!(value, 12);
    }

    #[test]
    fn export_path_appends_scope() {
        assert_eq!(
            export_path(Path::new("/m/a.mkv"), ScopeKind::Common),
            PathBuf::from("/m/a.mkv.common.json")
        );
        assert_eq!(
            export_path(Path::new("a.mkv"), ScopeKind::All),
            PathBuf::from("a.mkv.all.json")
        );
    }

    #[test]
    fn parameter_filtering() {
        let params = vec![
            Parameter {
                id: 0,
                stream: StreamKind::General,
                property: "FileSize".into(),
            },
            Parameter {
                id: 1,
                stream: StreamKind::Video,
                property: "BitRate".into(),
            },
            Parameter {
                id: 2,
                stream: StreamKind::General,
                property: "OverallBitRate".into(),
            },
        ];
        assert_eq!(
            stream_choices(&params),
            vec![StreamKind::General, StreamKind::Video]
        );
        assert_eq!(filter_parameters(&params, None, "bitrate").len(), 2);
        let general = filter_parameters(&params, Some(StreamKind::General), "BITRATE");
        assert_eq!(general.len(), 1);
        assert_eq!(general[0].id, 2);
        assert_eq!(filter_parameters(&params, None, "").len(), 3);
    }
}
