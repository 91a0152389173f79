//! Direction detection from file extensions.

use crate::error::MdConvError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Extensions recognised as Markdown (compared case-insensitively).
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Extensions recognised as HTML (compared case-insensitively).
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Which way a conversion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Markdown in, HTML document out.
    ToHtml,
    /// HTML in, Markdown out.
    ToMarkdown,
}

impl Direction {
    /// Extensions the output file may carry for this direction.
    pub fn target_extensions(self) -> &'static [&'static str] {
        match self {
            Direction::ToHtml => HTML_EXTENSIONS,
            Direction::ToMarkdown => MARKDOWN_EXTENSIONS,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ToHtml => f.write_str("Markdown -> HTML"),
            Direction::ToMarkdown => f.write_str("HTML -> Markdown"),
        }
    }
}

/// Pick the conversion direction from the input file's extension.
pub fn detect(input: &Path) -> Result<Direction, MdConvError> {
    let ext = extension_of(input);
    if matches_any(&ext, MARKDOWN_EXTENSIONS) {
        Ok(Direction::ToHtml)
    } else if matches_any(&ext, HTML_EXTENSIONS) {
        Ok(Direction::ToMarkdown)
    } else {
        Err(MdConvError::UnsupportedFormat {
            path: input.to_path_buf(),
            extension: ext,
        })
    }
}

/// Detect the direction from `input` and check that `output` carries an
/// extension of the opposite format.
pub fn detect_pair(input: &Path, output: &Path) -> Result<Direction, MdConvError> {
    let direction = detect(input)?;
    let out_ext = extension_of(output);
    if !matches_any(&out_ext, direction.target_extensions()) {
        return Err(MdConvError::UnsupportedFormat {
            path: output.to_path_buf(),
            extension: out_ext,
        });
    }
    Ok(direction)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn matches_any(ext: &str, set: &[&str]) -> bool {
    set.iter().any(|known| ext.eq_ignore_ascii_case(known))
}
