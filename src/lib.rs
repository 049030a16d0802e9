//! filesort - pattern-driven file sorting
//!
//! This library sorts files within directory trees into destination
//! subfolders according to user-defined filename-pattern rules loaded
//! from a JSON mapping, with an optional recursive deep audit pass that
//! relocates previously misplaced files.

pub mod cli;
pub mod mapping;
pub mod output;
pub mod sorter;

pub use mapping::{MappingError, RuleSet, SkippedPattern};
pub use output::OutputFormatter;
pub use sorter::{DirectorySorter, SortError, SortResult};

pub use cli::{SortMode, run_cli};
