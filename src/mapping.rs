//! Filename pattern mapping and rule-based classification.
//!
//! This module loads an ordered collection of (pattern, destination) rules
//! from a JSON mapping file and exposes a single classification operation:
//! given a filename, return the destination folder of the first rule whose
//! pattern matches. It supports three pattern forms:
//! - Regex patterns (wrapped in `/.../`), matched anywhere in the filename
//! - Shell-style glob patterns (`*`, `?`, `[...]`), matched against the
//!   whole filename
//! - Glob patterns ending in `.*`, which additionally match the filename
//!   stem when an extension is present
//!
//! # Mapping File Format
//!
//! Mappings are stored as a JSON object. Keys are patterns, values are
//! destination folders relative to the directory being sorted. Entry order
//! is significant: the first matching rule wins.
//!
//! ```json
//! {
//!     "*.pdf": "Documents",
//!     "IMG_*.*": "Images/Raw",
//!     "/^Invoice_\\d+\\.pdf$/": "Invoices"
//! }
//! ```

use glob::{MatchOptions, Pattern};
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a mapping file.
#[derive(Debug, Clone)]
pub enum MappingError {
    /// Mapping file not found at the specified path.
    MappingNotFound(PathBuf),
    /// Mapping file exists but is not a valid JSON object of strings.
    MappingInvalid {
        /// The mapping file that failed to parse.
        path: PathBuf,
        /// Why the mapping is invalid.
        reason: String,
    },
    /// IO error while reading the mapping file.
    IoError(String),
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingError::MappingNotFound(path) => {
                write!(f, "Mapping file not found: {}", path.display())
            }
            MappingError::MappingInvalid { path, reason } => {
                write!(f, "Invalid mapping file {}: {}", path.display(), reason)
            }
            MappingError::IoError(msg) => write!(f, "IO error reading mapping: {}", msg),
        }
    }
}

impl std::error::Error for MappingError {}

/// A pattern that failed to compile and was excluded from matching.
///
/// Broken patterns never abort a sort; the owning rule is simply treated
/// as never-matching. The warning is kept so the caller can report it.
#[derive(Debug, Clone)]
pub struct SkippedPattern {
    /// The pattern text as written in the mapping file.
    pub pattern: String,
    /// The compile error reported for the pattern.
    pub reason: String,
}

/// The compiled form of a rule's pattern, decided once at load time.
#[derive(Debug, Clone)]
enum PatternKind {
    /// A `/.../` rule: unanchored regex search over the filename.
    Regex(Regex),
    /// A plain glob matched against the whole filename.
    Glob(Pattern),
    /// A glob ending in `.*`: matches the full filename, or the bare
    /// stem (pattern minus the trailing two characters) when the
    /// filename has an extension.
    GlobWithStem { full: Pattern, stem: Pattern },
    /// A pattern that failed to compile. Matches nothing.
    NeverMatches,
}

/// A single ordered (pattern, destination) rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The pattern text as written in the mapping file.
    pub pattern: String,
    /// Destination folder, relative to the sort root. May be nested
    /// (e.g. `Images/Raw`).
    pub destination: String,
    kind: PatternKind,
}

/// Glob matching options mirroring `fnmatch` semantics: filenames are
/// case-normalized on Windows and matched case-sensitively elsewhere.
fn glob_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: !cfg!(windows),
        require_literal_separator: false,
        require_literal_leading_dot: false,
    }
}

impl Rule {
    /// Compiles a rule, downgrading uncompilable patterns to never-matching.
    fn compile(pattern: String, destination: String) -> (Self, Option<SkippedPattern>) {
        let (kind, warning) = Self::compile_kind(&pattern);
        (
            Rule {
                pattern,
                destination,
                kind,
            },
            warning,
        )
    }

    fn compile_kind(pattern: &str) -> (PatternKind, Option<SkippedPattern>) {
        // A leading and trailing slash marks a regex rule.
        if pattern.len() >= 2 && pattern.starts_with('/') && pattern.ends_with('/') {
            let inner = &pattern[1..pattern.len() - 1];
            return match Regex::new(inner) {
                Ok(regex) => (PatternKind::Regex(regex), None),
                Err(e) => (
                    PatternKind::NeverMatches,
                    Some(SkippedPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    }),
                ),
            };
        }

        if let Some(base) = pattern.strip_suffix(".*") {
            let compiled = Pattern::new(pattern).and_then(|full| {
                Pattern::new(base).map(|stem| PatternKind::GlobWithStem { full, stem })
            });
            return match compiled {
                Ok(kind) => (kind, None),
                Err(e) => (
                    PatternKind::NeverMatches,
                    Some(SkippedPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    }),
                ),
            };
        }

        match Pattern::new(pattern) {
            Ok(glob) => (PatternKind::Glob(glob), None),
            Err(e) => (
                PatternKind::NeverMatches,
                Some(SkippedPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }),
            ),
        }
    }

    /// Tests whether this rule's pattern matches the given filename.
    fn matches(&self, filename: &str) -> bool {
        match &self.kind {
            PatternKind::Regex(regex) => regex.is_match(filename),
            PatternKind::Glob(glob) => glob.matches_with(filename, glob_options()),
            PatternKind::GlobWithStem { full, stem } => {
                if full.matches_with(filename, glob_options()) {
                    return true;
                }
                // The stem branch only applies when an extension is present,
                // so a bare `report` is not caught by `report*.*`.
                let path = Path::new(filename);
                match (path.file_stem(), path.extension()) {
                    (Some(name), Some(_)) => {
                        stem.matches_with(&name.to_string_lossy(), glob_options())
                    }
                    _ => false,
                }
            }
            PatternKind::NeverMatches => false,
        }
    }
}

/// An ordered, immutable collection of classification rules.
///
/// Rules are evaluated top-to-bottom and the first match wins, so two
/// rules may legally match the same filename; the earlier one always
/// shadows the later one. A `RuleSet` holds no filesystem state and is
/// loaded once per sort batch.
///
/// # Examples
///
/// ```
/// use filesort::mapping::RuleSet;
///
/// let rules = RuleSet::from_entries([
///     ("*.pdf".to_string(), "Documents".to_string()),
///     ("IMG_*.*".to_string(), "Images/Raw".to_string()),
/// ]);
///
/// assert_eq!(rules.classify("manual.pdf"), Some("Documents"));
/// assert_eq!(rules.classify("IMG_0042.jpg"), Some("Images/Raw"));
/// assert_eq!(rules.classify("notes.txt"), None);
/// ```
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    skipped: Vec<SkippedPattern>,
}

impl RuleSet {
    /// Loads a rule set from a JSON mapping file.
    ///
    /// The file must contain a single JSON object whose keys are patterns
    /// and whose values are destination folder strings. Entry order is
    /// preserved. Patterns that fail to compile do not fail the load;
    /// they are recorded and reported via [`RuleSet::skipped_patterns`].
    ///
    /// # Errors
    ///
    /// Returns `MappingError::MappingNotFound` if the file does not exist.
    /// Returns `MappingError::MappingInvalid` if the content is not a JSON
    /// object of non-empty string patterns to non-empty string folders.
    /// Returns `MappingError::IoError` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        if !path.exists() {
            return Err(MappingError::MappingNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| MappingError::IoError(e.to_string()))?;

        let value: Value =
            serde_json::from_str(&content).map_err(|e| MappingError::MappingInvalid {
                path: path.to_path_buf(),
                reason: format!("JSON parse error: {}", e),
            })?;

        let object = value.as_object().ok_or_else(|| MappingError::MappingInvalid {
            path: path.to_path_buf(),
            reason: "top-level value must be an object".to_string(),
        })?;

        let mut entries = Vec::with_capacity(object.len());
        for (pattern, destination) in object {
            let destination =
                destination
                    .as_str()
                    .ok_or_else(|| MappingError::MappingInvalid {
                        path: path.to_path_buf(),
                        reason: format!("destination for '{}' must be a string", pattern),
                    })?;
            if pattern.is_empty() || destination.is_empty() {
                return Err(MappingError::MappingInvalid {
                    path: path.to_path_buf(),
                    reason: "patterns and destinations must be non-empty".to_string(),
                });
            }
            entries.push((pattern.clone(), destination.to_string()));
        }

        Ok(Self::from_entries(entries))
    }

    /// Builds a rule set from in-memory (pattern, destination) pairs,
    /// preserving their order.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut rules = Vec::new();
        let mut skipped = Vec::new();
        for (pattern, destination) in entries {
            let (rule, warning) = Rule::compile(pattern, destination);
            if let Some(warning) = warning {
                skipped.push(warning);
            }
            rules.push(rule);
        }
        RuleSet { rules, skipped }
    }

    /// Returns the destination folder for a filename, or `None` if no
    /// rule matches.
    ///
    /// Rules are tried in definition order and evaluation stops at the
    /// first match. Filenames are matched as basenames, never full paths.
    pub fn classify(&self, filename: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(filename))
            .map(|rule| rule.destination.as_str())
    }

    /// Patterns that failed to compile and were excluded from matching.
    pub fn skipped_patterns(&self) -> &[SkippedPattern] {
        &self.skipped
    }

    /// Number of rules in the set, including never-matching ones.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set contains no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
