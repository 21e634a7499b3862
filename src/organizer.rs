//! The organize run loop.
//!
//! An [`Organizer`] owns everything one run needs: the source directory, the
//! rule table, the run log and the statistics. Each top-level regular file is
//! classified by extension and moved into its category folder; per-file
//! problems are written to the run log and the loop moves on. Only a failure
//! to list the source directory ends a run early.

use crate::config::CompiledFilters;
use crate::error::{OrganizeError, OrganizeResult};
use crate::mover::Mover;
use crate::rules::{ExtensionRules, extension_of};
use crate::run_log::RunLog;
use crate::stats::RunSummary;
use std::fs::{self, DirEntry};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome for a single directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Moved { category: String, new_path: PathBuf },
    Unsupported,
    MoveFailed,
    ReadFailed,
    Skipped,
}

pub struct Organizer<W: Write> {
    source_dir: PathBuf,
    rules: ExtensionRules,
    filters: CompiledFilters,
    ignored: Vec<PathBuf>,
    log: RunLog<W>,
    summary: RunSummary,
}

impl<W: Write> Organizer<W> {
    /// Creates an organizer for `source_dir` that writes its events to `log`.
    pub fn new(source_dir: impl Into<PathBuf>, rules: ExtensionRules, log: RunLog<W>) -> Self {
        Self {
            source_dir: source_dir.into(),
            rules,
            filters: CompiledFilters::default(),
            ignored: Vec::new(),
            log,
            summary: RunSummary::new(),
        }
    }

    /// Applies exclusion filters; excluded entries are neither moved nor logged.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Never touch this particular file (e.g. the run log itself).
    ///
    /// The path need not exist yet; it is resolved when an entry with the
    /// same file name turns up.
    pub fn ignoring(mut self, path: &Path) -> Self {
        self.ignored.push(path.to_path_buf());
        self
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Organizes the top-level files of the source directory.
    ///
    /// Statistics are reset at the start of every call. Returns the run's
    /// summary, or an error if the directory could not be listed or the run
    /// log could not be written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use filesorter::{ExtensionRules, Organizer, RunLog};
    /// use std::path::Path;
    ///
    /// let log = RunLog::open(Path::new("organizer.log")).unwrap();
    /// let mut organizer = Organizer::new("/path/to/downloads", ExtensionRules::default(), log);
    /// match organizer.organize() {
    ///     Ok(summary) => println!("{} files moved", summary.processed_files()),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn organize(&mut self) -> OrganizeResult<&RunSummary> {
        self.summary = RunSummary::new();
        info!(source = %self.source_dir.display(), "organizing");

        let entries = match fs::read_dir(&self.source_dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.log
                    .error(&format!("error reading source directory: {}", e))?;
                self.log.flush()?;
                return Err(OrganizeError::ReadDir {
                    path: self.source_dir.clone(),
                    source: e,
                });
            }
        };

        for entry in entries {
            match entry {
                Ok(entry) => {
                    let outcome = self.process_entry(&entry)?;
                    debug!(path = %entry.path().display(), ?outcome, "entry processed");
                }
                Err(e) => {
                    warn!(error = %e, "unreadable directory entry");
                    self.log.error(&format!("error reading file: {}", e))?;
                }
            }
        }

        self.log.flush()?;
        info!(
            processed = self.summary.processed_files(),
            bytes = self.summary.total_size(),
            "run complete"
        );
        Ok(&self.summary)
    }

    /// Classifies and moves one entry, recording the result.
    pub fn process_entry(&mut self, entry: &DirEntry) -> io::Result<EntryOutcome> {
        let path = entry.path();

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot stat entry");
                self.log.error(&format!("error reading file: {}", e))?;
                return Ok(EntryOutcome::ReadFailed);
            }
        };

        // Category folders from earlier runs are directories and stay put.
        if !metadata.is_file() {
            debug!(path = %path.display(), "not a regular file, skipping");
            return Ok(EntryOutcome::Skipped);
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if self.filters.is_excluded(&file_name) || self.is_ignored(&path) {
            debug!(path = %path.display(), "excluded");
            return Ok(EntryOutcome::Skipped);
        }

        let Some(category) = self.rules.classify(&file_name).map(str::to_string) else {
            self.log.error(&format!(
                "{}: extension {} not supported",
                path.display(),
                extension_of(&file_name)
            ))?;
            return Ok(EntryOutcome::Unsupported);
        };

        match Mover::move_to_category(&self.source_dir, &path, &category) {
            Ok(moved) => {
                self.summary.record(&category, metadata.len());
                self.log
                    .success(&format!("moved: {} -> {}", path.display(), category))?;
                Ok(EntryOutcome::Moved {
                    category,
                    new_path: moved.new_path,
                })
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "move failed");
                self.log.error(&format!(
                    "move error {} -> {}: {}",
                    path.display(),
                    category,
                    e
                ))?;
                Ok(EntryOutcome::MoveFailed)
            }
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let file_name = path.file_name();
        self.ignored
            .iter()
            .filter(|ignored| ignored.file_name() == file_name)
            .any(|ignored| same_file(ignored, path))
    }

    /// Ends the run: flushes the log and returns the final statistics.
    pub fn finish(self) -> io::Result<RunSummary> {
        self.log.into_inner()?;
        Ok(self.summary)
    }
}

/// Compares resolved paths, falling back to a literal comparison when
/// either side cannot be resolved.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        (a_res, b_res) => {
            debug!(
                left = %a.display(),
                right = %b.display(),
                resolved_left = a_res.is_ok(),
                resolved_right = b_res.is_ok(),
                "comparing unresolved paths literally"
            );
            a == b
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn organizer(dir: &Path) -> Organizer<Vec<u8>> {
        Organizer::new(dir, ExtensionRules::default(), RunLog::new(Vec::new()))
    }

    fn log_lines(organizer: Organizer<Vec<u8>>) -> Vec<String> {
        let Organizer { log, .. } = organizer;
        let bytes = log.into_inner().unwrap();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| l[20..].to_string())
            .collect()
    }

    #[test]
    fn test_scenario_mixed_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("a.jpg"), [0u8; 10]).unwrap();
        fs::write(dir.join("b.pdf"), [0u8; 20]).unwrap();
        fs::write(dir.join("c.xyz"), [0u8; 5]).unwrap();

        let mut org = organizer(dir);
        let summary = org.organize().unwrap().clone();

        assert!(dir.join("Images/a.jpg").is_file());
        assert!(dir.join("Documents/b.pdf").is_file());
        assert!(dir.join("c.xyz").is_file());
        assert_eq!(summary.processed_files(), 2);
        assert_eq!(summary.total_size(), 30);
        let images = summary.category("Images").unwrap();
        assert_eq!((images.count, images.total_size), (1, 10));
        let docs = summary.category("Documents").unwrap();
        assert_eq!((docs.count, docs.total_size), (1, 20));

        let lines = log_lines(org);
        assert_eq!(lines.len(), 3);
        let unsupported = format!(
            "[ERROR] {}: extension .xyz not supported",
            dir.join("c.xyz").display()
        );
        assert_eq!(lines.iter().filter(|l| **l == unsupported).count(), 1);
        assert!(lines.contains(&format!(
            "[SUCCESS] moved: {} -> Images",
            dir.join("a.jpg").display()
        )));
    }

    #[test]
    fn test_missing_directory_is_fatal_and_logged() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let mut org = organizer(&missing);
        let result = org.organize();
        assert!(matches!(result, Err(OrganizeError::ReadDir { .. })));

        let lines = log_lines(org);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[ERROR] error reading source directory: "));
    }

    #[test]
    fn test_rerun_leaves_category_folders_alone() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("a.jpg"), "x").unwrap();

        let mut org = organizer(dir);
        org.organize().unwrap();
        let second = org.organize().unwrap();

        assert_eq!(second.processed_files(), 0);
        assert!(dir.join("Images/a.jpg").is_file());
        assert!(!dir.join("Images/Images").exists());
    }

    #[test]
    fn test_move_failure_does_not_abort_run() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        // A plain file named like the category blocks directory creation.
        fs::write(dir.join("Images"), "blocker").unwrap();
        fs::write(dir.join("a.jpg"), "jpg").unwrap();
        fs::write(dir.join("b.txt"), "txt").unwrap();

        let mut org = organizer(dir);
        let summary = org.organize().unwrap().clone();

        assert!(dir.join("a.jpg").is_file());
        assert!(dir.join("Documents/b.txt").is_file());
        assert_eq!(summary.processed_files(), 1);
        assert!(summary.category("Images").is_none());

        let lines = log_lines(org);
        let prefix = format!("[ERROR] move error {} -> Images: ", dir.join("a.jpg").display());
        assert!(lines.iter().any(|l| l.starts_with(&prefix)));
    }

    #[test]
    fn test_custom_rules_and_filters() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("main.rs"), "fn main() {}").unwrap();
        fs::write(dir.join("skip.rs"), "").unwrap();
        fs::write(dir.join("a.jpg"), "jpg").unwrap();

        let filters = crate::config::FilterRules {
            skip_hidden: false,
            exclude: crate::config::ExcludeRules {
                filenames: vec!["skip.rs".to_string()],
                ..Default::default()
            },
        }
        .compile()
        .unwrap();
        let rules = ExtensionRules::empty().with_rule(".rs", "Code");
        let mut org =
            Organizer::new(dir, rules, RunLog::new(Vec::new())).with_filters(filters);
        let summary = org.organize().unwrap();

        assert_eq!(summary.processed_files(), 1);
        assert!(dir.join("Code/main.rs").is_file());
        assert!(dir.join("skip.rs").is_file());
        assert!(dir.join("a.jpg").is_file());
    }

    #[test]
    fn test_ignored_path_is_not_classified() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let log_path = dir.join("run.txt");
        fs::write(&log_path, "").unwrap();

        let mut org = organizer(dir).ignoring(&log_path);
        let summary = org.organize().unwrap();

        assert_eq!(summary.processed_files(), 0);
        assert!(log_path.is_file());
        assert!(log_lines(org).is_empty());
    }

    #[test]
    fn test_ignored_path_may_be_created_after_construction() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let log_path = dir.join("later.txt");

        let mut org = organizer(dir).ignoring(&log_path);
        fs::write(&log_path, "").unwrap();
        fs::write(dir.join("other.txt"), "doc").unwrap();
        let summary = org.organize().unwrap();

        assert_eq!(summary.processed_files(), 1);
        assert!(log_path.is_file());
        assert!(dir.join("Documents/other.txt").is_file());
    }

    #[test]
    fn test_ignored_path_matched_through_other_spelling() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let nested = dir.join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        // Same file reached through a different spelling of the path.
        let roundabout = nested.join("..").join("notes.txt");
        let mut org = organizer(dir).ignoring(&roundabout);
        let summary = org.organize().unwrap();

        assert_eq!(summary.processed_files(), 0);
        assert!(dir.join("notes.txt").is_file());
    }

    #[test]
    fn test_finish_returns_summary() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("song.mp3"), [1u8; 7]).unwrap();

        let mut org = organizer(dir);
        org.organize().unwrap();
        let summary = org.finish().unwrap();

        assert_eq!(summary.category("Music").map(|s| s.total_size), Some(7));
    }
}
