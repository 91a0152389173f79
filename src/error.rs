//! Error types for the mdconv library.
//!
//! Every failure is fatal for the single conversion it belongs to: errors are
//! detected at the boundary where they occur (direction detection, file I/O,
//! stylesheet resolution) and returned as `Err(MdConvError)` from the
//! top-level `convert*` functions. Nothing is written to the output path once
//! an error has been raised.
//!
//! The one failure that is *not* an error is an unknown code-block language:
//! the highlighter degrades to plain text and reports it through
//! [`crate::pipeline::highlight::Highlight::PlainFallback`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the mdconv library.
#[derive(Debug, Error)]
pub enum MdConvError {
    // ── Format errors ─────────────────────────────────────────────────────
    /// The file extension is not Markdown or HTML, or the output extension
    /// does not match the direction picked from the input.
    #[error(
        "Unsupported format for '{path}': extension {extension:?}\n\
Conversion must be .md -> .html or .html -> .md."
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be read as UTF-8 text.
    #[error("Failed to read '{path}': {reason}")]
    FileReadError { path: PathBuf, reason: String },

    // ── Style errors ──────────────────────────────────────────────────────
    /// The stylesheet given with `--css-file` could not be read.
    #[error("Failed to read stylesheet '{path}': {source}")]
    StylesheetReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The highlighting theme name is not one of the bundled themes.
    #[error("Unknown highlight theme '{name}'\nAvailable themes: {available}")]
    UnknownTheme { name: String, available: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MdConvError {
    /// Process exit code the CLI uses for this error.
    ///
    /// `2` for a missing input and `3` for an unsupported conversion,
    /// `1` for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            MdConvError::FileNotFound { .. } => 2,
            MdConvError::UnsupportedFormat { .. } => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_names_path() {
        let e = MdConvError::FileNotFound {
            path: PathBuf::from("missing.md"),
        };
        assert!(e.to_string().contains("missing.md"), "got: {e}");
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn unsupported_format_display() {
        let e = MdConvError::UnsupportedFormat {
            path: PathBuf::from("notes.txt"),
            extension: "txt".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("notes.txt"), "got: {msg}");
        assert!(msg.contains("\"txt\""), "got: {msg}");
        assert_eq!(e.exit_code(), 3);
    }

    #[test]
    fn stylesheet_error_carries_source() {
        use std::error::Error as _;
        let e = MdConvError::StylesheetReadError {
            path: PathBuf::from("theme.css"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.to_string().contains("theme.css"));
        assert!(e.source().is_some());
        assert_eq!(e.exit_code(), 1);
    }

    #[test]
    fn write_error_display() {
        let e = MdConvError::FileWriteError {
            path: PathBuf::from("/ro/out.html"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/ro/out.html"));
        assert!(e.to_string().contains("denied"));
    }
}
