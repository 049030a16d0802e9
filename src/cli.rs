//! Command-line interface module for filesort.
//!
//! This module drives the sorting batch:
//! - Loading the mapping file into a rule set (once per batch)
//! - Reporting patterns that failed to compile
//! - Sorting each folder, with an optional deep audit pass afterwards
//! - Progress and summary reporting

use crate::mapping::RuleSet;
use crate::output::OutputFormatter;
use crate::sorter::DirectorySorter;
use std::path::{Path, PathBuf};

/// How each folder in a batch is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Sort only the direct file entries of each folder.
    Shallow,
    /// After the shallow sort, recursively relocate misplaced files
    /// anywhere under the folder.
    DeepAudit,
}

/// Runs a sorting batch over one or more folders.
///
/// The mapping is loaded once and reused for every folder. Entries in
/// `folders` that are not directories are skipped. The batch stops on the
/// first filesystem error; earlier moves are not rolled back.
///
/// # Arguments
///
/// * `mapping_path` - Path to the JSON mapping file
/// * `folders` - Folders to sort, processed in order
/// * `mode` - Whether to run a deep audit after each shallow sort
///
/// # Examples
///
/// ```no_run
/// use filesort::cli::{SortMode, run_cli};
/// use std::path::{Path, PathBuf};
///
/// let folders = vec![PathBuf::from("/home/user/Downloads")];
/// match run_cli(Path::new("mapping.json"), &folders, SortMode::DeepAudit) {
///     Ok(()) => println!("Sorting complete"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(mapping_path: &Path, folders: &[PathBuf], mode: SortMode) -> Result<(), String> {
    if folders.is_empty() {
        return Err("No folders to sort".to_string());
    }

    let rules =
        RuleSet::load(mapping_path).map_err(|e| format!("Error loading mapping: {}", e))?;

    for skipped in rules.skipped_patterns() {
        OutputFormatter::warning(&format!(
            "Pattern '{}' could not be compiled and will never match: {}",
            skipped.pattern, skipped.reason
        ));
    }

    OutputFormatter::info(&format!(
        "Sorting {} folder{} using {}",
        folders.len(),
        if folders.len() == 1 { "" } else { "s" },
        mapping_path.display()
    ));

    let progress = OutputFormatter::create_progress_bar(folders.len() as u64);
    let mut folder_moves: Vec<(String, usize)> = Vec::new();
    let mut total_moved = 0;

    for folder in folders {
        if !folder.is_dir() {
            progress.inc(1);
            continue;
        }

        let label = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| folder.display().to_string());

        progress.set_message(format!("Sorting {}...", label));
        let mut moved = DirectorySorter::sort_in_place(folder, &rules)
            .map_err(|e| format!("Error sorting {}: {}", folder.display(), e))?;

        if mode == SortMode::DeepAudit {
            progress.set_message(format!("Auditing {}...", label));
            moved += DirectorySorter::deep_audit_and_sort(folder, &rules)
                .map_err(|e| format!("Error auditing {}: {}", folder.display(), e))?;
        }

        total_moved += moved;
        folder_moves.push((label, moved));
        progress.inc(1);
    }

    progress.finish_and_clear();

    OutputFormatter::summary_table(&folder_moves, total_moved);
    OutputFormatter::success("Files sorted successfully!");

    Ok(())
}
