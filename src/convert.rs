//! Conversion entry points.
//!
//! [`convert_to_file`] runs the whole pipeline for one [`ConversionConfig`]:
//! read → detect → transform → write. [`convert`] stops before the write and
//! returns the document in memory. The `markdown_to_html*` and
//! [`html_to_markdown`] functions work on strings and never touch the
//! input/output paths.

use crate::config::ConversionConfig;
use crate::error::MdConvError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::detect::{self, Direction};
use crate::pipeline::highlight::{Highlighter, SyntectHighlighter};
use crate::pipeline::html_to_md::{Html2MdConverter, HtmlToMarkdown};
use crate::pipeline::render::MarkdownRenderer;
use crate::pipeline::style::{self, StyleOptions};
use crate::pipeline::io;
use std::time::Instant;
use tracing::{debug, info};

/// Read `config.input`, convert it, and return the result without writing.
///
/// # Errors
/// - [`MdConvError::FileNotFound`] / [`MdConvError::FileReadError`] for the input
/// - [`MdConvError::UnsupportedFormat`] for an unknown extension pair
/// - [`MdConvError::StylesheetReadError`] for an unreadable `--css-file`
/// - [`MdConvError::UnknownTheme`] for an unknown highlight theme
pub fn convert(config: &ConversionConfig) -> Result<ConversionOutput, MdConvError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}", config.input.display());

    // ── Step 1: Read input ───────────────────────────────────────────────
    let text = io::read_text(&config.input)?;

    // ── Step 2: Pick direction ───────────────────────────────────────────
    let direction = detect::detect_pair(&config.input, &config.output)?;
    debug!("Direction: {}", direction);

    // ── Step 3: Transform ────────────────────────────────────────────────
    let mut output = match direction {
        Direction::ToHtml => markdown_to_html(&text, config)?,
        Direction::ToMarkdown => html_to_markdown(&text),
    };

    output.stats.duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Converted {} bytes → {} bytes in {}ms",
        output.stats.input_bytes, output.stats.output_bytes, output.stats.duration_ms
    );
    Ok(output)
}

/// Convert `config.input` and write the result to `config.output`.
///
/// The output file is only created once the whole document has been produced;
/// on any error nothing is written.
pub fn convert_to_file(config: &ConversionConfig) -> Result<ConversionOutput, MdConvError> {
    let output = convert(config)?;
    io::write_text(&config.output, &output.text)?;
    info!("Wrote {}", config.output.display());
    Ok(output)
}

/// Render Markdown to a full HTML document with the syntect highlighter.
pub fn markdown_to_html(
    markdown: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, MdConvError> {
    let highlighter = SyntectHighlighter::new(&config.highlight_theme)?;
    markdown_to_html_with(markdown, config, highlighter)
}

/// Render Markdown to a full HTML document with any [`Highlighter`].
pub fn markdown_to_html_with<H: Highlighter>(
    markdown: &str,
    config: &ConversionConfig,
    highlighter: H,
) -> Result<ConversionOutput, MdConvError> {
    let start = Instant::now();
    let renderer = MarkdownRenderer::new(highlighter).with_toc(config.toc);
    let fragment = renderer.render(markdown);

    let highlight_css = if config.stylesheet.is_styled() {
        renderer.highlighter().stylesheet()
    } else {
        None
    };
    let title = config.resolved_title();
    let html = style::wrap(
        &fragment.html,
        &StyleOptions {
            title: &title,
            stylesheet: &config.stylesheet,
            highlight_css: highlight_css.as_deref(),
        },
    )?;

    Ok(ConversionOutput {
        stats: ConversionStats {
            input_bytes: markdown.len(),
            output_bytes: html.len(),
            highlighted_blocks: fragment.highlighted_blocks,
            fallback_blocks: fragment.fallback_blocks,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        text: html,
        direction: Direction::ToHtml,
    })
}

/// Convert HTML to Markdown with the default html2md converter.
pub fn html_to_markdown(html: &str) -> ConversionOutput {
    html_to_markdown_with(html, &Html2MdConverter)
}

/// Convert HTML to Markdown with any [`HtmlToMarkdown`] implementation.
pub fn html_to_markdown_with<C: HtmlToMarkdown + ?Sized>(
    html: &str,
    converter: &C,
) -> ConversionOutput {
    let start = Instant::now();
    let markdown = converter.convert_back(html);
    ConversionOutput {
        stats: ConversionStats {
            input_bytes: html.len(),
            output_bytes: markdown.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            ..ConversionStats::default()
        },
        text: markdown,
        direction: Direction::ToMarkdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StylesheetMode;
    use crate::pipeline::highlight::{Highlight, PlainHighlighter};

    /// Wraps every block in a marker so tests can see the hook was used.
    struct Marking;

    impl Highlighter for Marking {
        fn highlight(&self, code: &str, language_hint: Option<&str>) -> Highlight {
            Highlight::Highlighted {
                html: format!("[[{}:{}]]", language_hint.unwrap_or("-"), code.trim_end()),
                language: language_hint.unwrap_or("-").to_string(),
            }
        }

        fn stylesheet(&self) -> Option<String> {
            Some(".marked { color: red; }".to_string())
        }
    }

    struct Shouting;

    impl HtmlToMarkdown for Shouting {
        fn convert_back(&self, html: &str) -> String {
            html.to_uppercase()
        }
    }

    fn config() -> ConversionConfig {
        ConversionConfig::builder("notes.md", "notes.html")
            .embed_css(true)
            .build()
            .unwrap()
    }

    #[test]
    fn stub_highlighter_is_plugged_in() {
        let out = markdown_to_html_with("```rust\nfn x() {}\n```\n", &config(), Marking).unwrap();
        assert!(out.text.contains("[[rust:fn x() {}]]"), "got: {}", out.text);
        assert!(out.text.contains(".marked { color: red; }"));
        assert_eq!(out.stats.highlighted_blocks, 1);
        assert_eq!(out.direction, Direction::ToHtml);
    }

    #[test]
    fn highlight_css_skipped_when_unstyled() {
        let config = ConversionConfig::builder("notes.md", "notes.html").build().unwrap();
        assert_eq!(config.stylesheet, StylesheetMode::None);
        let out = markdown_to_html_with("```rust\nfn x() {}\n```\n", &config, Marking).unwrap();
        assert!(!out.text.contains(".marked"));
        assert!(!out.text.contains("<style"));
    }

    #[test]
    fn title_comes_from_input_stem() {
        let out = markdown_to_html_with("# Hi\n", &config(), PlainHighlighter).unwrap();
        assert!(out.text.contains("<title>notes</title>"));
    }

    #[test]
    fn stub_back_converter_is_plugged_in() {
        let out = html_to_markdown_with("<p>hi</p>", &Shouting);
        assert_eq!(out.text, "<P>HI</P>");
        assert_eq!(out.direction, Direction::ToMarkdown);
        assert_eq!(out.stats.input_bytes, 9);
        assert_eq!(out.stats.output_bytes, 9);
    }

    #[test]
    fn unknown_theme_is_reported() {
        let config = ConversionConfig::builder("a.md", "a.html")
            .highlight_theme("NoSuchTheme")
            .build()
            .unwrap();
        let err = markdown_to_html("# x\n", &config).unwrap_err();
        assert!(matches!(err, MdConvError::UnknownTheme { .. }));
    }
}
