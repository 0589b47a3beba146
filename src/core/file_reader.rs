//! Source file decoding
//!
//! Reads a candidate file as strict UTF-8 and captures enough of its shape
//! (line-ending style, trailing newline) to rewrite it faithfully.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Line-ending style of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Failure to load a file as text
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    #[error("not valid UTF-8")]
    Encoding,
}

/// Decoded content of one source file
#[derive(Debug, Clone)]
pub struct SourceText {
    /// Lines without their terminators
    pub lines: Vec<String>,
    pub line_ending: LineEnding,
    /// Whether the rendered content should end with a newline. True for
    /// empty files so that an inserted tag gets its terminator.
    pub trailing_newline: bool,
}

impl SourceText {
    /// Load a file, rejecting anything that is not valid UTF-8
    pub fn load(path: &Path) -> Result<Self, ReadError> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|_| ReadError::Encoding)?;
        Ok(Self::from_content(&content))
    }

    /// Split content into lines, remembering the original shape
    pub fn from_content(content: &str) -> Self {
        let line_ending = if content.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };
        Self {
            lines: content.lines().map(str::to_string).collect(),
            line_ending,
            trailing_newline: content.is_empty() || content.ends_with('\n'),
        }
    }

    /// Render lines back to file content, preserving the original shape
    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join(self.line_ending.as_str());
        if self.trailing_newline {
            out.push_str(self.line_ending.as_str());
        }
        out
    }
}
