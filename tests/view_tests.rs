//! List view tests for mediascope
//!
//! Build a [PropertyCache] through its request/response cycle and check how the grid and
//! the cards compose, filter and sort the tracked files.

use crossbeam_channel::{Receiver, unbounded};
use mediascope::app::PropertyCache;
use mediascope::app::view::{
    ListEntry, SortDirection, SortState, compose_cards, compose_grid, filter_rows,
};
use mediascope::core::property::{SortKind, grid_columns};
use mediascope::core::stream::{PropertyMap, StreamCounts, StreamKind, StreamProperties};
use mediascope::core::worker::{ScopeKind, WorkerTask};
use rand::seq::SliceRandom;
use rand::{Rng, rng};
use std::path::{Path, PathBuf};

struct Media {
    file: &'static str,
    title: &'static str,
    size: &'static str,
}

const LIBRARY: [Media; 3] = [
    Media {
        file: "/m/b.mkv",
        title: "Beta",
        size: "900",
    },
    Media {
        file: "/m/a.mkv",
        title: "alpha",
        size: "10000",
    },
    Media {
        file: "/m/c.mkv",
        title: "Gamma",
        size: "2048",
    },
];

fn media(file: &Path) -> &'static Media {
    LIBRARY
        .iter()
        .find(|m| Path::new(m.file) == file)
        .unwrap_or_else(|| panic!("unknown file {}", file.display()))
}

fn general(m: &Media) -> StreamProperties {
    let map: PropertyMap = [("Title", m.title), ("FileSize", m.size)]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    StreamProperties::new(StreamKind::General, 0, map)
}

/// Answers every request in flight until the cache stops asking, skipping `hold`.
fn settle(cache: &mut PropertyCache, rx: &Receiver<WorkerTask>, hold: Option<&Path>) {
    let mut queue: Vec<WorkerTask> = rx.try_iter().collect();
    while let Some(task) = queue.pop() {
        match task {
            WorkerTask::LoadStreamCounts { file, request_id } => {
                if Some(file.as_path()) == hold {
                    continue;
                }
                let counts: StreamCounts = [(StreamKind::General, 1)].into_iter().collect();
                cache.apply_stream_counts(&file, request_id, Ok(counts));
            }
            WorkerTask::LoadProperties {
                file,
                scope,
                request_id,
            } => {
                let streams = vec![general(media(&file))];
                cache.apply_properties(&file, scope.kind(), request_id, Ok(streams));
            }
            other => panic!("unexpected task {:?}", other),
        }
        let (pass_tx, pass_rx) = unbounded();
        cache.run_pass(&pass_tx);
        queue.extend(pass_rx.try_iter());
    }
}

fn loaded_cache(hold: Option<&Path>) -> PropertyCache {
    let (tx, rx) = unbounded();
    let mut cache = PropertyCache::new();
    cache.set_files(LIBRARY.iter().map(|m| PathBuf::from(m.file)).collect(), false);
    cache.run_pass(&tx);
    settle(&mut cache, &rx, hold);
    cache
}

fn ready_files<T>(entries: &[ListEntry<T>], file_of: impl Fn(&T) -> &Path) -> Vec<PathBuf> {
    entries
        .iter()
        .filter_map(|e| match e {
            ListEntry::Ready(item) => Some(file_of(item).to_path_buf()),
            ListEntry::Pending { .. } => None,
        })
        .collect()
}

fn sort_on(name: &str) -> SortState {
    let column = grid_columns()
        .into_iter()
        .find(|c| c.kind == StreamKind::General && c.def.name == name)
        .unwrap_or_else(|| panic!("no column {}", name));
    let mut sort = SortState::default();
    assert!(sort.click(&column));
    sort
}

#[test]
fn grid_keeps_file_order_without_sort() {
    let cache = loaded_cache(None);
    let entries = compose_grid(&cache, "", &SortState::default());
    assert_eq!(
        ready_files(&entries, |r| r.file.as_path()),
        vec![
            PathBuf::from("/m/b.mkv"),
            PathBuf::from("/m/a.mkv"),
            PathBuf::from("/m/c.mkv"),
        ]
    );
}

#[test]
fn numeric_columns_sort_by_value() {
    let cache = loaded_cache(None);
    let mut sort = sort_on("FileSize");
    let entries = compose_grid(&cache, "", &sort);
    assert_eq!(
        ready_files(&entries, |r| r.file.as_path()),
        vec![
            PathBuf::from("/m/b.mkv"),
            PathBuf::from("/m/c.mkv"),
            PathBuf::from("/m/a.mkv"),
        ]
    );

    let column = sort.active_column().expect("active column");
    assert!(sort.click(&column));
    assert_eq!(sort.direction(), SortDirection::Descending);
    let entries = compose_grid(&cache, "", &sort);
    assert_eq!(ready_files(&entries, |r| r.file.as_path())[0], PathBuf::from("/m/a.mkv"));
}

#[test]
fn descending_is_the_exact_reverse_of_ascending() {
    // most columns tie across the whole library (empty cells, zero counts)
    let cache = loaded_cache(None);
    let sortable: Vec<_> = grid_columns()
        .into_iter()
        .filter(|c| c.def.sort != SortKind::None)
        .collect();
    assert!(sortable.len() > 3);

    for column in sortable {
        let mut sort = SortState::default();
        assert!(sort.click(&column));
        assert_eq!(sort.direction(), SortDirection::Ascending);
        let ascending = ready_files(&compose_grid(&cache, "", &sort), |r| r.file.as_path());

        assert!(sort.click(&column));
        assert_eq!(sort.direction(), SortDirection::Descending);
        let descending = ready_files(&compose_grid(&cache, "", &sort), |r| r.file.as_path());

        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed, "column {}", column.id());
        assert_eq!(descending.len(), LIBRARY.len());
    }
}

#[test]
fn text_columns_sort_ignoring_case() {
    let cache = loaded_cache(None);
    let entries = compose_grid(&cache, "", &sort_on("Title"));
    assert_eq!(
        ready_files(&entries, |r| r.file.as_path()),
        vec![
            PathBuf::from("/m/a.mkv"),
            PathBuf::from("/m/b.mkv"),
            PathBuf::from("/m/c.mkv"),
        ]
    );
}

#[test]
fn derived_columns_are_not_sortable() {
    let time = grid_columns()
        .into_iter()
        .find(|c| c.def.name == "Time")
        .expect("time column");
    let mut sort = SortState::default();
    assert!(!sort.click(&time));
    assert_eq!(sort.column(), None);
}

#[test]
fn pending_files_follow_the_ready_rows() {
    let cache = loaded_cache(Some(Path::new("/m/b.mkv")));
    let entries = compose_grid(&cache, "gamma", &SortState::default());
    assert_eq!(entries.len(), 2);
    assert_eq!(ready_files(&entries, |r| r.file.as_path()), vec![PathBuf::from("/m/c.mkv")]);
    assert!(matches!(
        &entries[1],
        ListEntry::Pending { file, loading: true } if file == Path::new("/m/b.mkv")
    ));

    // cards keep the pending file in its place
    let cards = compose_cards(&cache, "gamma");
    assert_eq!(cards.len(), 2);
    assert!(matches!(&cards[0], ListEntry::Pending { .. }));
    assert_eq!(ready_files(&cards, |c| c.file.as_path()), vec![PathBuf::from("/m/c.mkv")]);
}

#[test]
fn filter_matches_cells_and_paths() {
    let cache = loaded_cache(None);
    let by_cell = compose_grid(&cache, "ALPHA", &SortState::default());
    assert_eq!(ready_files(&by_cell, |r| r.file.as_path()), vec![PathBuf::from("/m/a.mkv")]);

    let by_path = compose_grid(&cache, "c.mkv", &SortState::default());
    assert_eq!(ready_files(&by_path, |r| r.file.as_path()), vec![PathBuf::from("/m/c.mkv")]);

    assert!(compose_grid(&cache, "nothing", &SortState::default()).is_empty());
}

#[test]
fn filtering_is_idempotent() {
    let cache = loaded_cache(None);
    let rows: Vec<_> = compose_grid(&cache, "", &SortState::default())
        .into_iter()
        .filter_map(|e| match e {
            ListEntry::Ready(row) => Some(row),
            ListEntry::Pending { .. } => None,
        })
        .collect();

    let mut rng = rng();
    let alphabet: Vec<char> = "abgmtx.1/".chars().collect();
    for _ in 0..200 {
        let len = rng.random_range(0..4);
        let query: String = (0..len)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect();

        let mut shuffled = rows.clone();
        shuffled.shuffle(&mut rng);
        let once = filter_rows(&shuffled, &query);
        assert_eq!(filter_rows(&once, &query), once, "query {:?}", query);
        assert!(once.len() <= rows.len());
    }
}

#[test]
fn removed_files_vanish_from_both_views() {
    let mut cache = loaded_cache(None);
    assert!(cache.remove(Path::new("/m/a.mkv")));
    assert!(!cache.remove(Path::new("/m/a.mkv")));

    let grid = compose_grid(&cache, "", &SortState::default());
    let cards = compose_cards(&cache, "");
    assert_eq!(grid.len(), 2);
    assert_eq!(cards.len(), 2);
    assert!(
        !ready_files(&cards, |c| c.file.as_path()).contains(&PathBuf::from("/m/a.mkv"))
    );
    assert!(cache.common_properties(Path::new("/m/a.mkv")).is_none());
}

#[test]
fn stale_answers_do_not_overwrite() {
    let (tx, rx) = unbounded();
    let mut cache = PropertyCache::new();
    let file = PathBuf::from("/m/a.mkv");
    cache.set_files(vec![file.clone()], false);
    cache.run_pass(&tx);

    let first = match rx.try_recv() {
        Ok(WorkerTask::LoadStreamCounts { request_id, .. }) => request_id,
        other => panic!("unexpected {:?}", other),
    };
    cache.retry(&file, &tx);
    let second = match rx.try_recv() {
        Ok(WorkerTask::LoadStreamCounts { request_id, .. }) => request_id,
        other => panic!("unexpected {:?}", other),
    };
    assert_ne!(first, second);

    let counts: StreamCounts = [(StreamKind::General, 1)].into_iter().collect();
    cache.apply_stream_counts(&file, first, Ok(counts.clone()));
    assert!(cache.stream_counts(&file).is_none());
    cache.apply_stream_counts(&file, second, Ok(counts));
    assert!(cache.stream_counts(&file).is_some());

    // the common scope follows only once the counts are in
    cache.run_pass(&tx);
    assert!(matches!(
        rx.try_recv(),
        Ok(WorkerTask::LoadProperties { ref scope, .. }) if scope.kind() == ScopeKind::Common
    ));
}
