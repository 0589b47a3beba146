//! Ignore-pattern resolution
//!
//! Builds the "is this relative path excluded?" predicate for one run from
//! the scan root's .gitignore plus an optional supplementary pattern file.
//! Matching goes through the [`PathMatcher`] capability: full gitignore
//! semantics via the `ignore` crate when the `gitignore` feature is enabled,
//! otherwise a reduced-fidelity wildcard/substring matcher.

use std::fs;
use std::path::Path;

/// Capability interface for ignore-pattern matching
pub trait PathMatcher {
    /// Whether the relative path matches an ignore pattern
    fn is_match(&self, relative: &str) -> bool;
}

/// Full-fidelity matcher with gitignore semantics (directory wildcards,
/// `!` negation, anchoring)
#[cfg(feature = "gitignore")]
pub struct GitignoreMatcher {
    inner: ignore::gitignore::Gitignore,
}

#[cfg(feature = "gitignore")]
impl GitignoreMatcher {
    /// Build from raw pattern lines. Malformed lines are dropped with a
    /// warning; they never abort the run.
    pub fn from_lines(root: &Path, lines: &[String]) -> Self {
        let mut builder = ignore::gitignore::GitignoreBuilder::new(root);
        for line in lines {
            if let Err(err) = builder.add_line(None, line) {
                eprintln!("warning: dropping malformed ignore pattern '{}': {}", line, err);
            }
        }
        let inner = builder.build().unwrap_or_else(|err| {
            eprintln!("warning: ignore rules unavailable: {}", err);
            ignore::gitignore::Gitignore::empty()
        });
        Self { inner }
    }
}

#[cfg(feature = "gitignore")]
impl PathMatcher for GitignoreMatcher {
    fn is_match(&self, relative: &str) -> bool {
        // Checking parents lets directory patterns like `build/` exclude
        // the files inside.
        self.inner
            .matched_path_or_any_parents(relative, false)
            .is_ignore()
    }
}

/// Reduced-fidelity fallback matcher: `*`/`?` wildcards, trailing-`/`
/// directory prefixes, and plain substring matches. Negation and anchoring
/// are not supported; this is a known limitation of running without the
/// `gitignore` feature, not a defect.
#[allow(dead_code)]
pub struct SimpleMatcher {
    patterns: Vec<String>,
}

impl SimpleMatcher {
    #[allow(dead_code)]
    pub fn from_lines(lines: &[String]) -> Self {
        let patterns = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { patterns }
    }
}

impl PathMatcher for SimpleMatcher {
    fn is_match(&self, relative: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| simple_pattern_matches(pattern, relative))
    }
}

fn simple_pattern_matches(pattern: &str, relative: &str) -> bool {
    if let Some(dir) = pattern.strip_suffix('/') {
        return relative == dir || relative.starts_with(&format!("{}/", dir));
    }
    if pattern.contains('*') || pattern.contains('?') {
        // A wildcard pattern may describe the whole path or a single
        // component of it.
        return wildcard_match(pattern, relative)
            || relative
                .split('/')
                .any(|component| wildcard_match(pattern, component));
    }
    relative.contains(pattern)
}

/// Glob-lite matching: `*` matches any run of characters, `?` exactly one
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while ti < text.len() {
        if pi < pattern.len() && (pattern[pi] == '?' || pattern[pi] == text[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < pattern.len() && pattern[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((star_pi, star_ti)) = star {
            // Backtrack: let the last `*` swallow one more character.
            pi = star_pi + 1;
            ti = star_ti + 1;
            star = Some((star_pi, star_ti + 1));
        } else {
            return false;
        }
    }
    while pi < pattern.len() && pattern[pi] == '*' {
        pi += 1;
    }
    pi == pattern.len()
}

/// The built ignore predicate for one run
pub struct IgnoreRules {
    matcher: Option<Box<dyn PathMatcher>>,
}

impl IgnoreRules {
    /// Full-override mode (`--no-ignore`): nothing is excluded
    pub fn none() -> Self {
        Self { matcher: None }
    }

    /// Load patterns from `<root>/.gitignore` and an optional supplement
    /// file, concatenated in that order. A missing file contributes zero
    /// patterns; duplicates are harmless.
    pub fn build(root: &Path, supplement: Option<&Path>) -> Self {
        let default_file = root.join(".gitignore");
        let mut lines = Vec::new();
        for source in [Some(default_file.as_path()), supplement]
            .into_iter()
            .flatten()
        {
            if let Ok(content) = fs::read_to_string(source) {
                lines.extend(content.lines().map(str::to_string));
            }
        }
        if lines.is_empty() {
            return Self::none();
        }
        Self {
            matcher: Some(select_matcher(root, &lines)),
        }
    }

    /// Whether the relative path is excluded from processing
    pub fn is_ignored(&self, relative: &str) -> bool {
        self.matcher
            .as_ref()
            .map(|matcher| matcher.is_match(relative))
            .unwrap_or(false)
    }
}

#[cfg(feature = "gitignore")]
fn select_matcher(root: &Path, lines: &[String]) -> Box<dyn PathMatcher> {
    Box::new(GitignoreMatcher::from_lines(root, lines))
}

#[cfg(not(feature = "gitignore"))]
fn select_matcher(_root: &Path, lines: &[String]) -> Box<dyn PathMatcher> {
    Box::new(SimpleMatcher::from_lines(lines))
}
