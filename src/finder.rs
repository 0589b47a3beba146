//! Insertion-point resolution
//!
//! Given the leading lines of a source file, decide the line index at which
//! the tag comment can be inserted without breaking an interpreter
//! directive, an encoding declaration, or a module docstring.

use once_cell::sync::Lazy;
use regex::Regex;

/// PEP 263 encoding declaration: a comment carrying `coding:` or `coding=`.
/// Only honored within the first two lines of a file.
static ENCODING_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t\f]*#.*?coding[:=][ \t]*[-_.a-zA-Z0-9]+").unwrap());

/// The triple-quote style opened by this line, if any
fn docstring_delim(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with(r#"""""#) {
        Some(r#"""""#)
    } else if trimmed.starts_with("'''") {
        Some("'''")
    } else {
        None
    }
}

/// Find the zero-based line index before which the tag line belongs.
///
/// The cursor starts at 0 and advances past, in order: an interpreter
/// directive (`#!`) on line 0, an encoding declaration in the first two
/// lines, any run of blank lines and full-line comments, and a module-level
/// docstring. `None` means no safe insertion point exists (an unterminated
/// docstring); the caller reports the file and leaves it alone.
pub fn find_insertion_line<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
    let mut cursor = 0;

    if lines
        .first()
        .map(|line| line.as_ref().trim_start().starts_with("#!"))
        .unwrap_or(false)
    {
        cursor = 1;
    }

    if cursor < 2 {
        if let Some(line) = lines.get(cursor) {
            if ENCODING_DECL.is_match(line.as_ref()) {
                cursor += 1;
            }
        }
    }

    // Skip blanks and ordinary comments, stopping at a docstring opener.
    while let Some(line) = lines.get(cursor) {
        let trimmed = line.as_ref().trim();
        if docstring_delim(trimmed).is_some() {
            break;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            cursor += 1;
        } else {
            break;
        }
    }

    if let Some(line) = lines.get(cursor) {
        let trimmed = line.as_ref().trim();
        if let Some(delim) = docstring_delim(trimmed) {
            // One-liner: the closing delimiter sits on the same line.
            if trimmed.len() > delim.len() && trimmed.ends_with(delim) {
                return Some(cursor + 1);
            }
            let mut scan = cursor + 1;
            while let Some(line) = lines.get(scan) {
                if line.as_ref().trim().ends_with(delim) {
                    return Some(scan + 1);
                }
                scan += 1;
            }
            // Unterminated docstring: refuse to guess.
            return None;
        }
    }

    Some(cursor)
}
