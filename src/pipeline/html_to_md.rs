//! HTML → Markdown conversion via html2md.
//!
//! html2md walks the whole DOM, so a few things are removed up front that
//! would otherwise leak into the text: the `<head>` (title and styles),
//! `<script>`/`<style>` bodies, the empty anchor links comrak puts inside
//! headings, and the token `<span>`s of highlighted code. A table of contents
//! produced by the renderer is turned back into its `[TOC]` marker.
//!
//! The result is then normalised by [`postprocess::clean_markdown`].

use crate::pipeline::postprocess;
use crate::pipeline::render::TOC_MARKER;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Turns an HTML document or fragment into Markdown.
pub trait HtmlToMarkdown {
    /// Convert `html` to Markdown. Malformed input is tolerated, never rejected.
    fn convert_back(&self, html: &str) -> String;
}

/// html2md-backed converter with default settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl HtmlToMarkdown for Html2MdConverter {
    fn convert_back(&self, html: &str) -> String {
        let cleaned = strip_presentation(html);
        debug!(
            "Pre-cleaned HTML: {} → {} bytes",
            html.len(),
            cleaned.len()
        );
        let markdown = html2md::parse_html(&cleaned);
        postprocess::clean_markdown(&restore_toc_marker(&markdown))
    }
}

static RE_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<head\b.*?</head\s*>").unwrap());
static RE_SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").unwrap());
static RE_STYLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").unwrap());
static RE_HEADING_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\bclass\s*=\s*"anchor"[^>]*>\s*</a\s*>"#).unwrap()
});
static RE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?span\b[^>]*>").unwrap());
static RE_TOC_NAV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<nav\b[^>]*\bclass\s*=\s*"toc"[^>]*>.*?</nav\s*>"#).unwrap()
});

/// Remove markup that carries presentation only.
fn strip_presentation(html: &str) -> String {
    let s = RE_HEAD.replace_all(html, "");
    let s = RE_SCRIPT.replace_all(&s, "");
    let s = RE_STYLE.replace_all(&s, "");
    let s = RE_TOC_NAV.replace_all(&s, format!("<p>{TOC_MARKER}</p>").as_str());
    let s = RE_HEADING_ANCHOR.replace_all(&s, "");
    RE_SPAN.replace_all(&s, "").into_owned()
}

/// html2md escapes square brackets; undo that for a lone TOC marker line.
fn restore_toc_marker(markdown: &str) -> String {
    markdown
        .lines()
        .map(|line| {
            if line.trim() == r"\[TOC\]" {
                TOC_MARKER
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
