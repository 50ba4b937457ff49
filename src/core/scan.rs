//! Directory expansion for mediascope.
//!
//! Turns a user selection of files and directories into the flat list of media files the
//! session tracks. Files are passed through untouched, directories are walked recursively
//! and filtered by extension.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// True if the file extension is in `extensions` (compared case-insensitively).
pub fn has_media_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Expands a selection into a flat, de-duplicated file list.
///
/// A path that does not exist is an error. Unreadable entries inside a directory are skipped.
/// Symlinked directories are not followed. Each directory is walked in file name order.
pub fn expand_paths(paths: &[PathBuf], extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let md = fs::metadata(path)?;
        if md.is_dir() {
            files.extend(walk_dir(path, extensions));
        } else {
            files.push(path.clone());
        }
    }

    let mut seen = HashSet::with_capacity(files.len());
    files.retain(|f| seen.insert(f.clone()));
    Ok(files)
}

fn walk_dir(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() || entry.path().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| has_media_extension(path, extensions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn walks_directories_recursively_and_filters() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let sub = dir.path().join("season1");
        fs::create_dir_all(&sub)?;
        File::create(dir.path().join("b.mkv"))?;
        File::create(dir.path().join("a.MP4"))?;
        File::create(dir.path().join("notes.txt"))?;
        File::create(sub.join("e01.mkv"))?;

        let files = expand_paths(&[dir.path().to_path_buf()], &exts(&["mkv", "mp4"]))?;
        assert_eq!(
            files,
            vec![
                dir.path().join("a.MP4"),
                dir.path().join("b.mkv"),
                sub.join("e01.mkv"),
            ]
        );
        Ok(())
    }

    #[test]
    fn nested_directories_keep_name_order() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("b/inner"))?;
        fs::create_dir_all(dir.path().join("a"))?;
        File::create(dir.path().join("b/inner/z.flac"))?;
        File::create(dir.path().join("b/c.flac"))?;
        File::create(dir.path().join("a/y.flac"))?;
        File::create(dir.path().join("a.flac"))?;

        let files = expand_paths(&[dir.path().to_path_buf()], &exts(&["flac"]))?;
        assert_eq!(
            files,
            vec![
                dir.path().join("a/y.flac"),
                dir.path().join("a.flac"),
                dir.path().join("b/c.flac"),
                dir.path().join("b/inner/z.flac"),
            ]
        );
        Ok(())
    }

    #[test]
    fn plain_files_pass_through_once() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("readme.txt");
        File::create(&file)?;

        let files = expand_paths(&[file.clone(), file.clone()], &exts(&["mkv"]))?;
        assert_eq!(files, vec![file]);
        Ok(())
    }

    #[test]
    fn missing_path_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here.mkv");
        assert!(expand_paths(&[missing], &exts(&["mkv"])).is_err());
    }
}
