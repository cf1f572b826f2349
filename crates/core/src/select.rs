use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, XrefError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Selection {
    /// Picked files, smallest first.
    pub files: Vec<SelectedFile>,
    /// Number of regular files found in the directory.
    pub candidates: usize,
    pub total_bytes: u64,
    /// `true` when some file did not fit; `false` means every candidate was taken.
    pub budget_exhausted: bool,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Picks the smallest files of `dir` whose cumulative size stays within
/// `budget`.
///
/// Files are ordered by size with ties kept in file-name order. Accumulation
/// stops at the first file that would push the running total past the
/// budget; that file and every later one are left out. When the whole
/// directory fits, every file is selected.
pub fn select_files(dir: &Path, budget: u64) -> Result<Selection> {
    let candidates = list_candidates(dir)?;
    let candidate_count = candidates.len();

    let mut files = Vec::new();
    let mut total_bytes: u64 = 0;
    let mut budget_exhausted = false;
    for file in candidates {
        match total_bytes.checked_add(file.size) {
            Some(next) if next <= budget => {
                total_bytes = next;
                files.push(file);
            }
            _ => {
                debug!(
                    file = %file.name,
                    size = file.size,
                    total_bytes,
                    budget,
                    "size budget exceeded"
                );
                budget_exhausted = true;
                break;
            }
        }
    }

    if !budget_exhausted && candidate_count > 0 {
        info!(
            candidates = candidate_count,
            total_bytes, budget, "every file fits the size budget; selecting all"
        );
    }

    Ok(Selection {
        files,
        candidates: candidate_count,
        total_bytes,
        budget_exhausted,
    })
}

fn list_candidates(dir: &Path) -> Result<Vec<SelectedFile>> {
    let meta = fs::metadata(dir).map_err(|err| XrefError::io_at(dir, err))?;
    if !meta.is_dir() {
        return Err(XrefError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            debug!(path = %entry.path().display(), "skipping non-file entry");
            continue;
        }
        let size = entry.metadata()?.len();
        files.push(SelectedFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            size,
        });
    }
    // stable: equal sizes stay in file-name order
    files.sort_by_key(|f| f.size);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_sized(dir: &Path, name: &str, size: usize) {
        fs::write(dir.join(name), vec![b'x'; size]).unwrap();
    }

    fn names(selection: &Selection) -> Vec<&str> {
        selection.files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn picks_smallest_files_within_budget() {
        let dir = tempdir().unwrap();
        write_sized(dir.path(), "3.txt", 100);
        write_sized(dir.path(), "1.txt", 10);
        write_sized(dir.path(), "2.txt", 20);

        // 10 + 20 already overflows 25, so only the smallest file fits
        let selection = select_files(dir.path(), 25).unwrap();
        assert_eq!(names(&selection), vec!["1.txt"]);
        assert_eq!(selection.total_bytes, 10);
        assert_eq!(selection.candidates, 3);
        assert!(selection.budget_exhausted);
    }

    #[test]
    fn overflow_excludes_the_overflowing_file() {
        let dir = tempdir().unwrap();
        write_sized(dir.path(), "1.txt", 10);
        write_sized(dir.path(), "2.txt", 20);
        write_sized(dir.path(), "3.txt", 100);

        let selection = select_files(dir.path(), 29).unwrap();
        assert_eq!(names(&selection), vec!["1.txt"]);
        assert_eq!(selection.total_bytes, 10);

        let selection = select_files(dir.path(), 30).unwrap();
        assert_eq!(names(&selection), vec!["1.txt", "2.txt"]);
    }

    #[test]
    fn selects_everything_when_all_files_fit() {
        let dir = tempdir().unwrap();
        write_sized(dir.path(), "1.txt", 10);
        write_sized(dir.path(), "2.txt", 20);

        let selection = select_files(dir.path(), 1_000).unwrap();
        assert_eq!(selection.len(), 2);
        assert!(!selection.budget_exhausted);
    }

    #[test]
    fn zero_budget_only_admits_empty_files() {
        let dir = tempdir().unwrap();
        write_sized(dir.path(), "1.txt", 0);
        write_sized(dir.path(), "2.txt", 1);

        let selection = select_files(dir.path(), 0).unwrap();
        assert_eq!(names(&selection), vec!["1.txt"]);
        assert!(selection.budget_exhausted);
    }

    #[test]
    fn ties_follow_file_name_order_and_subdirs_are_ignored() {
        let dir = tempdir().unwrap();
        write_sized(dir.path(), "20.meta", 5);
        write_sized(dir.path(), "10.meta", 5);
        write_sized(dir.path(), "15.meta", 5);
        fs::create_dir(dir.path().join("nested")).unwrap();
        write_sized(&dir.path().join("nested"), "99.meta", 1);

        let selection = select_files(dir.path(), 12).unwrap();
        assert_eq!(names(&selection), vec!["10.meta", "15.meta"]);
        assert_eq!(selection.candidates, 3);
    }

    #[test]
    fn empty_directory_yields_empty_selection() {
        let dir = tempdir().unwrap();
        let selection = select_files(dir.path(), 10).unwrap();
        assert!(selection.is_empty());
        assert!(!selection.budget_exhausted);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent");
        assert!(matches!(
            select_files(&missing, 10),
            Err(XrefError::NotFound(_))
        ));

        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            select_files(&file, 10),
            Err(XrefError::NotADirectory(_))
        ));
    }
}
