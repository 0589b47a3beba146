//! File tagging
//!
//! Checks for an existing tag, resolves the insertion point, optionally
//! writes a backup copy, and rewrites the file with the tag line inserted.

use std::fs;
use std::path::Path;

use crate::core::file_reader::SourceText;
use crate::core::model::{RunConfig, SkipReason, TagOutcome};
use crate::finder::find_insertion_line;

/// Comment prefix of the tag line
pub const TAG_PREFIX: &str = "# crumb:";

/// Build the tag line for a display path
pub fn tag_line(display_path: &str) -> String {
    format!("{} {}", TAG_PREFIX, display_path)
}

/// Zero-based index of an existing tag line, if any. The whole file is
/// scanned, not just the leading lines.
fn existing_tag_index(lines: &[String]) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.trim_start().starts_with(TAG_PREFIX))
}

/// Process one candidate file.
///
/// Every per-file failure folds into a `Skipped` outcome; nothing here may
/// abort the surrounding traversal.
pub fn tag_file(path: &Path, display_path: &str, config: &RunConfig) -> TagOutcome {
    let mut source = match SourceText::load(path) {
        Ok(source) => source,
        Err(_) => return TagOutcome::Skipped(SkipReason::Encoding),
    };

    let tag = tag_line(display_path);

    if let Some(index) = existing_tag_index(&source.lines) {
        if !config.replace || source.lines[index].trim_end() == tag {
            return TagOutcome::AlreadyTagged;
        }
        if config.dry_run {
            return TagOutcome::DryRunWouldTag;
        }
        source.lines[index] = tag;
        return match write_back(path, &source, config) {
            Ok(()) => TagOutcome::Replaced,
            Err(reason) => TagOutcome::Skipped(reason),
        };
    }

    let index = match find_insertion_line(&source.lines) {
        Some(index) => index,
        None => return TagOutcome::Skipped(SkipReason::NoInsertionPoint),
    };

    if config.dry_run {
        return TagOutcome::DryRunWouldTag;
    }

    source.lines.insert(index, tag);
    // Separate the tag from the displaced line, unless that line is blank.
    let next_is_blank = source
        .lines
        .get(index + 1)
        .map(|line| line.trim().is_empty())
        .unwrap_or(true);
    if !next_is_blank {
        source.lines.insert(index + 1, String::new());
    }

    match write_back(path, &source, config) {
        Ok(()) => TagOutcome::Tagged,
        Err(reason) => TagOutcome::Skipped(reason),
    }
}

/// Optionally copy the original aside, then overwrite it in place
fn write_back(path: &Path, source: &SourceText, config: &RunConfig) -> Result<(), SkipReason> {
    if let Some(ext) = &config.backup_ext {
        let mut backup = path.as_os_str().to_owned();
        backup.push(ext);
        if fs::copy(path, Path::new(&backup)).is_err() {
            return Err(SkipReason::BackupFailed);
        }
    }
    fs::write(path, source.render()).map_err(|_| SkipReason::WriteFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn config(root: &Path) -> RunConfig {
        RunConfig {
            root: root.to_path_buf(),
            extensions: vec!["py".to_string()],
            dry_run: false,
            verbose: false,
            backup_ext: None,
            absolute: false,
            replace: false,
            ignore_file: None,
            no_ignore: false,
        }
    }

    fn write_and_tag(content: &str, config: &RunConfig) -> (PathBuf, TagOutcome) {
        let path = config.root.join("app.py");
        fs::write(&path, content).unwrap();
        let outcome = tag_file(&path, "app.py", config);
        (path, outcome)
    }

    #[test]
    fn test_tags_plain_file_at_top() {
        let temp = tempdir().unwrap();
        let (path, outcome) = write_and_tag("print('hello')\n", &config(temp.path()));

        assert_eq!(outcome, TagOutcome::Tagged);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# crumb: app.py\n\nprint('hello')\n");
    }

    #[test]
    fn test_no_extra_blank_when_next_line_blank() {
        let temp = tempdir().unwrap();
        let (path, outcome) =
            write_and_tag("#!/usr/bin/env python3\n\nx = 1\n", &config(temp.path()));

        assert_eq!(outcome, TagOutcome::Tagged);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "#!/usr/bin/env python3\n# crumb: app.py\n\nx = 1\n");
    }

    #[test]
    fn test_shebang_and_coding_line() {
        let temp = tempdir().unwrap();
        let (path, outcome) = write_and_tag(
            "#!/usr/bin/env python3\n# -*- coding: utf-8 -*-\nmain()\n",
            &config(temp.path()),
        );

        assert_eq!(outcome, TagOutcome::Tagged);
        let lines: Vec<String> = fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(lines[2], "# crumb: app.py");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "main()");
    }

    #[test]
    fn test_tag_goes_after_docstring() {
        let temp = tempdir().unwrap();
        let (path, outcome) = write_and_tag(
            "\"\"\"Module docstring.\"\"\"\nx = 1\n",
            &config(temp.path()),
        );

        assert_eq!(outcome, TagOutcome::Tagged);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\"\"\"Module docstring.\"\"\"\n# crumb: app.py\n\nx = 1\n");
    }

    #[test]
    fn test_empty_file_becomes_tag_only() {
        let temp = tempdir().unwrap();
        let (path, outcome) = write_and_tag("", &config(temp.path()));

        assert_eq!(outcome, TagOutcome::Tagged);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# crumb: app.py\n");
    }

    #[test]
    fn test_already_tagged_left_untouched() {
        let temp = tempdir().unwrap();
        let original = "# crumb: app.py\n\nprint('hello')\n";
        let (path, outcome) = write_and_tag(original, &config(temp.path()));

        assert_eq!(outcome, TagOutcome::AlreadyTagged);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_tagging_is_idempotent() {
        let temp = tempdir().unwrap();
        let config = config(temp.path());
        let (path, first) = write_and_tag("x = 1\n", &config);
        assert_eq!(first, TagOutcome::Tagged);

        let after_first = fs::read_to_string(&path).unwrap();
        let second = tag_file(&path, "app.py", &config);
        assert_eq!(second, TagOutcome::AlreadyTagged);
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn test_unterminated_docstring_skipped() {
        let temp = tempdir().unwrap();
        let original = "\"\"\"never closed\nstill open\n";
        let (path, outcome) = write_and_tag(original, &config(temp.path()));

        assert_eq!(outcome, TagOutcome::Skipped(SkipReason::NoInsertionPoint));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_non_utf8_skipped() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.py");
        fs::write(&path, [0xFFu8, 0xFE, 0xFD]).unwrap();

        let outcome = tag_file(&path, "bad.py", &config(temp.path()));
        assert_eq!(outcome, TagOutcome::Skipped(SkipReason::Encoding));
        assert_eq!(fs::read(&path).unwrap(), vec![0xFF, 0xFE, 0xFD]);
    }

    #[test]
    fn test_dry_run_leaves_disk_untouched() {
        let temp = tempdir().unwrap();
        let mut config = config(temp.path());
        config.dry_run = true;

        let original = "print('hello')\n";
        let (path, outcome) = write_and_tag(original, &config);
        assert_eq!(outcome, TagOutcome::DryRunWouldTag);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_backup_keeps_original_content() {
        let temp = tempdir().unwrap();
        let mut config = config(temp.path());
        config.backup_ext = Some(".bak".to_string());

        let original = "print('hello')\n";
        let (path, outcome) = write_and_tag(original, &config);
        assert_eq!(outcome, TagOutcome::Tagged);

        let backup = temp.path().join("app.py.bak");
        assert_eq!(fs::read_to_string(backup).unwrap(), original);
        assert!(fs::read_to_string(&path).unwrap().starts_with(TAG_PREFIX));
    }

    #[test]
    fn test_replace_rewrites_stale_tag_in_place() {
        let temp = tempdir().unwrap();
        let mut config = config(temp.path());
        config.replace = true;

        let (path, outcome) =
            write_and_tag("# crumb: old/path/app.py\n\nx = 1\n", &config);
        assert_eq!(outcome, TagOutcome::Replaced);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# crumb: app.py\n\nx = 1\n");
    }

    #[test]
    fn test_replace_with_fresh_tag_is_noop() {
        let temp = tempdir().unwrap();
        let mut config = config(temp.path());
        config.replace = true;

        let original = "# crumb: app.py\n\nx = 1\n";
        let (path, outcome) = write_and_tag(original, &config);
        assert_eq!(outcome, TagOutcome::AlreadyTagged);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_replace_dry_run_reports_without_writing() {
        let temp = tempdir().unwrap();
        let mut config = config(temp.path());
        config.replace = true;
        config.dry_run = true;

        let original = "# crumb: old/app.py\nx = 1\n";
        let (path, outcome) = write_and_tag(original, &config);
        assert_eq!(outcome, TagOutcome::DryRunWouldTag);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_crlf_style_preserved() {
        let temp = tempdir().unwrap();
        let (path, outcome) = write_and_tag("x = 1\r\ny = 2\r\n", &config(temp.path()));

        assert_eq!(outcome, TagOutcome::Tagged);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# crumb: app.py\r\n\r\nx = 1\r\ny = 2\r\n");
    }

    #[test]
    fn test_missing_trailing_newline_preserved() {
        let temp = tempdir().unwrap();
        let (path, outcome) = write_and_tag("x = 1", &config(temp.path()));

        assert_eq!(outcome, TagOutcome::Tagged);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# crumb: app.py\n\nx = 1");
    }

    #[test]
    fn test_comment_only_file_gets_tag_appended() {
        let temp = tempdir().unwrap();
        let (path, outcome) = write_and_tag("# top comment\n", &config(temp.path()));

        assert_eq!(outcome, TagOutcome::Tagged);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# top comment\n# crumb: app.py\n");
    }

    #[test]
    fn test_tag_line_shape() {
        assert_eq!(tag_line("src/app.py"), "# crumb: src/app.py");
    }
}
