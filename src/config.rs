//! Configuration types for Markdown ⇄ HTML conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The config is resolved once from the
//! caller's options and never mutated afterwards; every pipeline stage reads
//! from it and nothing else.

use crate::error::MdConvError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Highlighting theme used when none is requested.
pub const DEFAULT_HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Configuration for a single conversion.
///
/// Built via [`ConversionConfig::builder()`].
///
/// # Example
/// ```rust
/// use mdconv::{ConversionConfig, StylesheetMode};
///
/// let config = ConversionConfig::builder("notes.md", "notes.html")
///     .embed_css(true)
///     .css_file("site.css")
///     .build()
///     .unwrap();
///
/// // An external stylesheet always wins over the built-in one.
/// assert_eq!(config.stylesheet, StylesheetMode::External("site.css".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Source file. Its extension picks the conversion direction.
    pub input: PathBuf,

    /// Destination file. Created if absent, overwritten if present.
    pub output: PathBuf,

    /// Document title for HTML output. If None, uses the input file stem.
    pub title: Option<String>,

    /// Which stylesheet, if any, is embedded in HTML output. Default: None.
    pub stylesheet: StylesheetMode,

    /// syntect theme whose CSS styles highlighted code. Default: `InspiredGitHub`.
    ///
    /// Only emitted when a page stylesheet is emitted as well.
    pub highlight_theme: String,

    /// Expand a `[TOC]` paragraph into a table of contents. Default: true.
    pub toc: bool,
}

impl ConversionConfig {
    /// Create a new builder for a conversion from `input` to `output`.
    pub fn builder(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: ConversionConfig {
                input: input.into(),
                output: output.into(),
                title: None,
                stylesheet: StylesheetMode::None,
                highlight_theme: DEFAULT_HIGHLIGHT_THEME.to_string(),
                toc: true,
            },
            embed_css: false,
            css_file: None,
        }
    }

    /// The title that ends up in `<title>`: the configured one, or the input
    /// file name without its extension.
    pub fn resolved_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => default_title(&self.input),
        }
    }
}

fn default_title(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
    embed_css: bool,
    css_file: Option<PathBuf>,
}

impl ConversionConfigBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Request the built-in stylesheet. Ignored when [`css_file`](Self::css_file) is set.
    pub fn embed_css(mut self, v: bool) -> Self {
        self.embed_css = v;
        self
    }

    /// Embed the contents of this stylesheet file.
    pub fn css_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.css_file = Some(path.into());
        self
    }

    pub fn highlight_theme(mut self, name: impl Into<String>) -> Self {
        self.config.highlight_theme = name.into();
        self
    }

    pub fn toc(mut self, v: bool) -> Self {
        self.config.toc = v;
        self
    }

    /// Build the configuration, validating constraints and resolving the
    /// stylesheet mode.
    pub fn build(mut self) -> Result<ConversionConfig, MdConvError> {
        let c = &self.config;
        if c.input.as_os_str().is_empty() {
            return Err(MdConvError::InvalidConfig("input path is empty".into()));
        }
        if c.output.as_os_str().is_empty() {
            return Err(MdConvError::InvalidConfig("output path is empty".into()));
        }
        if c.highlight_theme.trim().is_empty() {
            return Err(MdConvError::InvalidConfig(
                "highlight theme name is empty".into(),
            ));
        }

        self.config.stylesheet = StylesheetMode::resolve(self.embed_css, self.css_file);
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the HTML document is styled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StylesheetMode {
    /// No stylesheet at all. (default)
    #[default]
    None,
    /// The built-in stylesheet, embedded inline.
    EmbedDefault,
    /// The contents of a user stylesheet file, embedded inline.
    External(PathBuf),
}

impl StylesheetMode {
    /// Combine the two CLI-level options into one mode.
    ///
    /// An external file takes precedence over the built-in stylesheet.
    pub fn resolve(embed_default: bool, external: Option<PathBuf>) -> Self {
        match external {
            Some(path) => StylesheetMode::External(path),
            None if embed_default => StylesheetMode::EmbedDefault,
            None => StylesheetMode::None,
        }
    }

    /// Whether any `<style>` is emitted in this mode.
    pub fn is_styled(&self) -> bool {
        !matches!(self, StylesheetMode::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::builder("a.md", "a.html").build().unwrap();
        assert_eq!(c.stylesheet, StylesheetMode::None);
        assert_eq!(c.highlight_theme, DEFAULT_HIGHLIGHT_THEME);
        assert!(c.toc);
        assert!(c.title.is_none());
    }

    #[test]
    fn external_stylesheet_wins_over_default() {
        let c = ConversionConfig::builder("a.md", "a.html")
            .css_file("x.css")
            .embed_css(true)
            .build()
            .unwrap();
        assert_eq!(c.stylesheet, StylesheetMode::External("x.css".into()));
    }

    #[test]
    fn embed_default_alone() {
        let c = ConversionConfig::builder("a.md", "a.html")
            .embed_css(true)
            .build()
            .unwrap();
        assert_eq!(c.stylesheet, StylesheetMode::EmbedDefault);
        assert!(c.stylesheet.is_styled());
    }

    #[test]
    fn title_defaults_to_input_stem() {
        let c = ConversionConfig::builder("docs/notes.md", "out.html")
            .build()
            .unwrap();
        assert_eq!(c.resolved_title(), "notes");
    }

    #[test]
    fn blank_title_falls_back_to_stem() {
        let c = ConversionConfig::builder("notes.md", "out.html")
            .title("   ")
            .build()
            .unwrap();
        assert_eq!(c.resolved_title(), "notes");
    }

    #[test]
    fn explicit_title_is_used() {
        let c = ConversionConfig::builder("notes.md", "out.html")
            .title("Release Notes")
            .build()
            .unwrap();
        assert_eq!(c.resolved_title(), "Release Notes");
    }

    #[test]
    fn empty_paths_rejected() {
        let err = ConversionConfig::builder("", "out.html").build().unwrap_err();
        assert!(matches!(err, MdConvError::InvalidConfig(_)));
        let err = ConversionConfig::builder("a.md", "").build().unwrap_err();
        assert!(matches!(err, MdConvError::InvalidConfig(_)));
    }

    #[test]
    fn empty_theme_rejected() {
        let err = ConversionConfig::builder("a.md", "a.html")
            .highlight_theme(" ")
            .build()
            .unwrap_err();
        assert!(matches!(err, MdConvError::InvalidConfig(_)));
    }
}
