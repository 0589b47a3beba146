//! Run configuration and outcome model
//!
//! Every candidate file maps to exactly one [`TagOutcome`]; the walker folds
//! outcomes into a [`Summary`] that is rendered at the end of the run.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why a file was left untouched instead of tagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Content could not be read as UTF-8 text
    #[error("not readable as UTF-8 text")]
    Encoding,

    /// Malformed leading structure (unterminated docstring)
    #[error("no safe insertion point")]
    NoInsertionPoint,

    /// The backup copy could not be created
    #[error("backup copy failed")]
    BackupFailed,

    /// The rewritten content could not be written back
    #[error("write failed")]
    WriteFailed,
}

/// Outcome of processing a single candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagOutcome {
    /// Tag inserted and written back
    Tagged,

    /// An existing stale tag was rewritten in place (`--replace`)
    Replaced,

    /// The file already carries a tag; content untouched
    AlreadyTagged,

    /// Dry run: the file would have been tagged or replaced
    DryRunWouldTag,

    /// The file was left untouched for the given reason
    Skipped(SkipReason),
}

impl TagOutcome {
    /// Short label for per-file logging
    pub fn label(&self) -> &'static str {
        match self {
            TagOutcome::Tagged => "tagged",
            TagOutcome::Replaced => "replaced",
            TagOutcome::AlreadyTagged => "already tagged",
            TagOutcome::DryRunWouldTag => "would tag",
            TagOutcome::Skipped(_) => "skipped",
        }
    }
}

/// Immutable configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Scan root (absolute)
    pub root: PathBuf,

    /// Extensions to process, without leading dot
    pub extensions: Vec<String>,

    /// Report outcomes without touching the filesystem
    pub dry_run: bool,

    /// Log each file's outcome as it is processed
    pub verbose: bool,

    /// Backup extension appended to the original name, e.g. ".bak"
    pub backup_ext: Option<String>,

    /// Record absolute instead of relative paths in tags
    pub absolute: bool,

    /// Rewrite stale tags in place
    pub replace: bool,

    /// Supplementary ignore-pattern file
    pub ignore_file: Option<PathBuf>,

    /// Disable all ignore filtering
    pub no_ignore: bool,
}

/// Per-run counters, reported when the traversal finishes
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Candidate files seen (including ignored ones)
    pub considered: usize,
    pub tagged: usize,
    pub replaced: usize,
    pub already_tagged: usize,
    pub would_tag: usize,
    /// Excluded by ignore rules before tagging
    pub ignored: usize,
    pub skipped_encoding: usize,
    pub skipped_no_insertion_point: usize,
    pub skipped_backup_failed: usize,
    pub skipped_write_failed: usize,
}

impl Summary {
    /// Fold one tagging outcome into the counters
    pub fn record(&mut self, outcome: TagOutcome) {
        self.considered += 1;
        match outcome {
            TagOutcome::Tagged => self.tagged += 1,
            TagOutcome::Replaced => self.replaced += 1,
            TagOutcome::AlreadyTagged => self.already_tagged += 1,
            TagOutcome::DryRunWouldTag => self.would_tag += 1,
            TagOutcome::Skipped(SkipReason::Encoding) => self.skipped_encoding += 1,
            TagOutcome::Skipped(SkipReason::NoInsertionPoint) => {
                self.skipped_no_insertion_point += 1
            }
            TagOutcome::Skipped(SkipReason::BackupFailed) => self.skipped_backup_failed += 1,
            TagOutcome::Skipped(SkipReason::WriteFailed) => self.skipped_write_failed += 1,
        }
    }

    /// Record a file excluded by ignore rules
    pub fn record_ignored(&mut self) {
        self.considered += 1;
        self.ignored += 1;
    }

    /// Total files skipped, across all reasons
    pub fn skipped(&self) -> usize {
        self.skipped_encoding
            + self.skipped_no_insertion_point
            + self.skipped_backup_failed
            + self.skipped_write_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_record() {
        let mut summary = Summary::default();
        summary.record(TagOutcome::Tagged);
        summary.record(TagOutcome::AlreadyTagged);
        summary.record(TagOutcome::Skipped(SkipReason::Encoding));
        summary.record_ignored();

        assert_eq!(summary.considered, 4);
        assert_eq!(summary.tagged, 1);
        assert_eq!(summary.already_tagged, 1);
        assert_eq!(summary.ignored, 1);
        assert_eq!(summary.skipped(), 1);
    }

    #[test]
    fn test_summary_skipped_totals() {
        let mut summary = Summary::default();
        summary.record(TagOutcome::Skipped(SkipReason::NoInsertionPoint));
        summary.record(TagOutcome::Skipped(SkipReason::BackupFailed));
        assert_eq!(summary.skipped(), 2);
        assert_eq!(summary.tagged, 0);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(TagOutcome::Tagged.label(), "tagged");
        assert_eq!(TagOutcome::DryRunWouldTag.label(), "would tag");
        assert_eq!(TagOutcome::Skipped(SkipReason::Encoding).label(), "skipped");
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::NoInsertionPoint.to_string(),
            "no safe insertion point"
        );
        assert_eq!(
            SkipReason::Encoding.to_string(),
            "not readable as UTF-8 text"
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&TagOutcome::Skipped(SkipReason::BackupFailed)).unwrap();
        assert_eq!(json, r#"{"skipped":"backup_failed"}"#);

        let json = serde_json::to_string(&TagOutcome::AlreadyTagged).unwrap();
        assert_eq!(json, r#""already_tagged""#);
    }

    #[test]
    fn test_summary_serialization() {
        let mut summary = Summary::default();
        summary.record(TagOutcome::Tagged);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""tagged":1"#));
        assert!(json.contains(r#""ignored":0"#));
    }
}
