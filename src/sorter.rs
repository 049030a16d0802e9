//! Directory sorting engine.
//!
//! This module moves files into destination subfolders according to a
//! [`RuleSet`](crate::mapping::RuleSet). Two passes are provided: a flat
//! single-directory sort, and a recursive deep audit that relocates
//! misplaced files anywhere under a root back to their correct
//! destination folder.

use crate::mapping::RuleSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Errors that can occur during a sort or audit pass.
///
/// A failed filesystem operation aborts the current pass; moves already
/// performed by the same pass are not rolled back.
#[derive(Debug)]
pub enum SortError {
    /// Failed to enumerate a directory.
    DirectoryReadFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to create a destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to move a file to its destination.
    FileMoveFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for SortError {}

/// Result type for sort and audit operations.
pub type SortResult<T> = Result<T, SortError>;

/// Sorts files into destination subfolders according to a rule set.
///
/// The sorter performs no concurrency coordination and holds no state;
/// each pass runs synchronously to completion or returns the first
/// filesystem error it hits.
pub struct DirectorySorter;

impl DirectorySorter {
    /// Sorts the direct file entries of `source_dir` into subfolders of
    /// `dest_root`.
    ///
    /// Only regular files are considered; subdirectories are neither
    /// recursed into nor moved. Each file is classified by its basename.
    /// On a match the destination directory is created if absent
    /// (including nested destinations like `Images/Raw`) and the file is
    /// moved there, overwriting any same-named file. Unmatched files are
    /// left untouched.
    ///
    /// # Arguments
    ///
    /// * `source_dir` - The directory whose files are sorted
    /// * `dest_root` - The root under which destination folders are created
    /// * `rules` - The rule set used for classification
    ///
    /// # Returns
    ///
    /// The number of files moved, or the first `SortError` encountered.
    pub fn sort_flat(source_dir: &Path, dest_root: &Path, rules: &RuleSet) -> SortResult<usize> {
        let entries = fs::read_dir(source_dir).map_err(|e| SortError::DirectoryReadFailed {
            path: source_dir.to_path_buf(),
            source: e,
        })?;

        let mut moved = 0;
        for entry in entries {
            let entry = entry.map_err(|e| SortError::DirectoryReadFailed {
                path: source_dir.to_path_buf(),
                source: e,
            })?;
            let file_type = entry.file_type().map_err(|e| SortError::DirectoryReadFailed {
                path: entry.path(),
                source: e,
            })?;
            if !file_type.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(destination) = rules.classify(&name) {
                let dest_dir = dest_root.join(destination);
                Self::move_into(&entry.path(), &dest_dir.join(file_name.as_os_str()))?;
                moved += 1;
            }
        }

        Ok(moved)
    }

    /// Sorts a directory's files into subfolders of that same directory.
    ///
    /// This is the common shallow sort: `dir` acts as both the source of
    /// files and the root under which destination folders are created.
    pub fn sort_in_place(dir: &Path, rules: &RuleSet) -> SortResult<usize> {
        Self::sort_flat(dir, dir, rules)
    }

    /// Recursively relocates misplaced files anywhere under `root` to
    /// their correct destination folder.
    ///
    /// The entire subtree is walked, destination folders included. A file
    /// already at its canonical path `root/destination/filename` is
    /// skipped via an explicit path equality check; everything else that
    /// classifies is moved there, overwriting on conflict. The tree is
    /// snapshotted before any move, so each file is visited exactly once
    /// and directories created mid-pass contribute no extra visits.
    ///
    /// Running the audit twice in a row moves nothing on the second run.
    ///
    /// # Arguments
    ///
    /// * `root` - The root of the tree to audit
    /// * `rules` - The rule set used for classification
    ///
    /// # Returns
    ///
    /// The number of files moved, or the first `SortError` encountered.
    pub fn deep_audit_and_sort(root: &Path, rules: &RuleSet) -> SortResult<usize> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                SortError::DirectoryReadFailed {
                    path,
                    source: e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop detected")),
                }
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        let mut moved = 0;
        for current_path in files {
            let Some(file_name) = current_path.file_name() else {
                continue;
            };
            let name = file_name.to_string_lossy().into_owned();
            if let Some(destination) = rules.classify(&name) {
                let correct_path = root.join(destination).join(file_name);
                // Already at its canonical destination; no move.
                if current_path == correct_path {
                    continue;
                }
                Self::move_into(&current_path, &correct_path)?;
                moved += 1;
            }
        }

        Ok(moved)
    }

    /// Moves a file to `destination`, creating parent directories as
    /// needed and overwriting any existing file at the destination.
    fn move_into(file_path: &Path, destination: &Path) -> SortResult<()> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| SortError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // Rename first; fall back to copy-and-remove for cross-device
        // moves and platforms that refuse to replace an existing file.
        if fs::rename(file_path, destination).is_err() {
            fs::copy(file_path, destination).map_err(|e| SortError::FileMoveFailed {
                source: file_path.to_path_buf(),
                destination: destination.to_path_buf(),
                source_error: e,
            })?;
            fs::remove_file(file_path).map_err(|e| SortError::FileMoveFailed {
                source: file_path.to_path_buf(),
                destination: destination.to_path_buf(),
                source_error: e,
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn rules(entries: &[(&str, &str)]) -> RuleSet {
        RuleSet::from_entries(
            entries
                .iter()
                .map(|(p, d)| (p.to_string(), d.to_string())),
        )
    }

    #[test]
    fn test_sort_flat_moves_matched_and_leaves_unmatched() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.txt"), "text").expect("Failed to write file");
        fs::write(base.join("b.pdf"), "pdf").expect("Failed to write file");

        let rules = rules(&[("*.pdf", "PDFs")]);
        let moved = DirectorySorter::sort_in_place(base, &rules).expect("Sort failed");

        assert_eq!(moved, 1);
        assert!(base.join("a.txt").exists());
        assert!(!base.join("b.pdf").exists());
        assert!(base.join("PDFs").join("b.pdf").exists());
    }

    #[test]
    fn test_sort_flat_creates_nested_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("IMG_0042.jpg"), "jpg").expect("Failed to write file");

        let rules = rules(&[("IMG_*.*", "Images/Raw")]);
        let moved = DirectorySorter::sort_in_place(base, &rules).expect("Sort failed");

        assert_eq!(moved, 1);
        assert!(base.join("Images").join("Raw").join("IMG_0042.jpg").exists());
    }

    #[test]
    fn test_sort_flat_ignores_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("folder.pdf")).expect("Failed to create directory");
        fs::write(base.join("folder.pdf").join("inner.pdf"), "pdf")
            .expect("Failed to write file");

        let rules = rules(&[("*.pdf", "PDFs")]);
        let moved = DirectorySorter::sort_in_place(base, &rules).expect("Sort failed");

        // The directory matches the pattern by name but is not a file,
        // and the flat pass does not recurse into it.
        assert_eq!(moved, 0);
        assert!(base.join("folder.pdf").join("inner.pdf").exists());
    }

    #[test]
    fn test_sort_flat_overwrites_existing_destination_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("PDFs")).expect("Failed to create directory");
        fs::write(base.join("PDFs").join("b.pdf"), "old").expect("Failed to write file");
        fs::write(base.join("b.pdf"), "new").expect("Failed to write file");

        let rules = rules(&[("*.pdf", "PDFs")]);
        let moved = DirectorySorter::sort_in_place(base, &rules).expect("Sort failed");

        assert_eq!(moved, 1);
        let content =
            fs::read_to_string(base.join("PDFs").join("b.pdf")).expect("Failed to read file");
        assert_eq!(content, "new");
    }

    #[test]
    fn test_sort_flat_missing_source_dir() {
        let rules = rules(&[("*.pdf", "PDFs")]);
        let result = DirectorySorter::sort_in_place(Path::new("/non/existent/path"), &rules);
        assert!(matches!(
            result,
            Err(SortError::DirectoryReadFailed { .. })
        ));
    }

    #[test]
    fn test_deep_audit_relocates_misplaced_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("Misc")).expect("Failed to create directory");
        fs::write(base.join("Misc").join("report.pdf"), "pdf").expect("Failed to write file");

        let rules = rules(&[("*.pdf", "PDFs")]);
        let moved = DirectorySorter::deep_audit_and_sort(base, &rules).expect("Audit failed");

        assert_eq!(moved, 1);
        assert!(!base.join("Misc").join("report.pdf").exists());
        assert!(base.join("PDFs").join("report.pdf").exists());
    }

    #[test]
    fn test_deep_audit_pulls_file_out_of_wrong_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("Images")).expect("Failed to create directory");
        fs::write(base.join("Images").join("report.pdf"), "pdf")
            .expect("Failed to write file");

        let rules = rules(&[("*.pdf", "PDFs"), ("*.jpg", "Images")]);
        let moved = DirectorySorter::deep_audit_and_sort(base, &rules).expect("Audit failed");

        assert_eq!(moved, 1);
        assert!(base.join("PDFs").join("report.pdf").exists());
    }

    #[test]
    fn test_deep_audit_relocates_deeply_nested_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        let nested = base.join("a").join("b").join("c");
        fs::create_dir_all(&nested).expect("Failed to create directories");
        fs::write(nested.join("scan.jpg"), "jpg").expect("Failed to write file");

        let rules = rules(&[("*.jpg", "Images")]);
        let moved = DirectorySorter::deep_audit_and_sort(base, &rules).expect("Audit failed");

        assert_eq!(moved, 1);
        assert!(base.join("Images").join("scan.jpg").exists());
    }

    #[test]
    fn test_deep_audit_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("report.pdf"), "pdf").expect("Failed to write file");
        fs::write(base.join("photo.jpg"), "jpg").expect("Failed to write file");

        let rules = rules(&[("*.pdf", "PDFs"), ("*.jpg", "Images")]);
        let first = DirectorySorter::deep_audit_and_sort(base, &rules).expect("Audit failed");
        let second = DirectorySorter::deep_audit_and_sort(base, &rules).expect("Audit failed");

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert!(base.join("PDFs").join("report.pdf").exists());
        assert!(base.join("Images").join("photo.jpg").exists());
    }

    #[test]
    fn test_deep_audit_skips_correctly_placed_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("PDFs")).expect("Failed to create directory");
        fs::write(base.join("PDFs").join("report.pdf"), "pdf").expect("Failed to write file");

        let rules = rules(&[("*.pdf", "PDFs")]);
        let moved = DirectorySorter::deep_audit_and_sort(base, &rules).expect("Audit failed");

        assert_eq!(moved, 0);
        assert!(base.join("PDFs").join("report.pdf").exists());
    }

    #[test]
    fn test_deep_audit_nested_destination_equality() {
        // A nested destination folder is itself walked; the file inside
        // it must be recognized as already placed.
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        let raw = base.join("Images").join("Raw");
        fs::create_dir_all(&raw).expect("Failed to create directories");
        fs::write(raw.join("IMG_1.jpg"), "jpg").expect("Failed to write file");

        let rules = rules(&[("IMG_*.*", "Images/Raw")]);
        let moved = DirectorySorter::deep_audit_and_sort(base, &rules).expect("Audit failed");
        assert_eq!(moved, 0);
    }

    #[test]
    fn test_deep_audit_unmatched_files_stay_put() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("Misc")).expect("Failed to create directory");
        fs::write(base.join("Misc").join("notes.txt"), "text").expect("Failed to write file");

        let rules = rules(&[("*.pdf", "PDFs")]);
        let moved = DirectorySorter::deep_audit_and_sort(base, &rules).expect("Audit failed");

        assert_eq!(moved, 0);
        assert!(base.join("Misc").join("notes.txt").exists());
    }
}
