//! # mdconv
//!
//! Convert Markdown to standalone, syntax-highlighted HTML, and HTML back to
//! Markdown. The direction is picked from the file extensions.
//!
//! ## Pipeline Overview
//!
//! ```text
//! .md / .markdown                               .html / .htm
//!  │                                              │
//!  ├─ 1. Read    UTF-8 text                       ├─ 1. Read
//!  ├─ 2. Detect  extension pair → ToHtml          ├─ 2. Detect → ToMarkdown
//!  ├─ 3. Render  comrak (GFM, anchors, [TOC])     ├─ 3. Strip  head/scripts/token spans
//!  ├─ 4. Colour  syntect classed spans per fence  ├─ 4. Convert html2md
//!  ├─ 5. Wrap    doctype, title, <style> blocks   ├─ 5. Polish ATX headings, whitespace
//!  └─ 6. Write   atomic temp file + rename        └─ 6. Write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdconv::{convert_to_file, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder("README.md", "site/index.html")
//!         .embed_css(true)
//!         .build()?;
//!     let output = convert_to_file(&config)?;
//!     eprintln!("{} code blocks highlighted", output.stats.highlighted_blocks);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdconv` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mdconv = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, StylesheetMode, DEFAULT_HIGHLIGHT_THEME};
pub use convert::{
    convert, convert_to_file, html_to_markdown, html_to_markdown_with, markdown_to_html,
    markdown_to_html_with,
};
pub use error::MdConvError;
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::detect::{detect, detect_pair, Direction};
pub use pipeline::highlight::{Highlight, Highlighter, PlainHighlighter, SyntectHighlighter};
pub use pipeline::html_to_md::{Html2MdConverter, HtmlToMarkdown};
pub use pipeline::render::{MarkdownRenderer, RenderedFragment};
