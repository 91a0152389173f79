//! Markdown → HTML body rendering via comrak.
//!
//! The renderer produces a body fragment only; [`crate::pipeline::style`]
//! wraps it into a full document. Fenced code blocks are routed through a
//! [`Highlighter`] using comrak's code-fence adapter hook, and a paragraph
//! containing only `[TOC]` is replaced by a table of contents built from the
//! document's headings.
//!
//! Malformed Markdown never fails: CommonMark defines a rendering for every
//! input.

use crate::pipeline::escape_html;
use crate::pipeline::highlight::Highlighter;
use comrak::adapters::SyntaxHighlighterAdapter;
use comrak::html::Anchorizer;
use comrak::nodes::{AstNode, NodeValue};
use comrak::{format_html_with_plugins, parse_document, Arena, Options, Plugins};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Paragraph text that is replaced with the table of contents.
pub const TOC_MARKER: &str = "[TOC]";

/// Rendered HTML body plus what happened to its code blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFragment {
    pub html: String,
    /// Code blocks that got token markup.
    pub highlighted_blocks: usize,
    /// Code blocks emitted as plain escaped text.
    pub fallback_blocks: usize,
}

/// Renders Markdown to an HTML fragment with a fixed extension set:
/// GFM tables, strikethrough, autolinks, task lists, footnotes, heading
/// anchors, raw HTML passthrough, highlighted code fences and `[TOC]`.
pub struct MarkdownRenderer<H> {
    highlighter: H,
    toc: bool,
}

impl<H: Highlighter> MarkdownRenderer<H> {
    pub fn new(highlighter: H) -> Self {
        Self {
            highlighter,
            toc: true,
        }
    }

    /// Enable or disable `[TOC]` expansion. Enabled by default.
    pub fn with_toc(mut self, toc: bool) -> Self {
        self.toc = toc;
        self
    }

    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    /// Render `source` to an HTML body fragment.
    pub fn render(&self, source: &str) -> RenderedFragment {
        let arena = Arena::new();
        let options = comrak_options();
        let root = parse_document(&arena, source, &options);

        let adapter = CodeFenceAdapter::new(&self.highlighter);
        let mut plugins = Plugins::default();
        plugins.render.codefence_syntax_highlighter = Some(&adapter);

        let mut buf = Vec::with_capacity(source.len() * 2);
        if let Err(e) = format_html_with_plugins(root, &options, &mut buf, &plugins) {
            // Writing into a Vec cannot fail; keep whatever was produced.
            warn!("comrak formatter reported an error: {}", e);
        }
        let mut html = String::from_utf8_lossy(&buf).into_owned();

        if self.toc {
            html = expand_toc(&html, root);
        }

        let fragment = RenderedFragment {
            html,
            highlighted_blocks: adapter.highlighted.load(Ordering::Relaxed),
            fallback_blocks: adapter.fallback.load(Ordering::Relaxed),
        };
        debug!(
            "Rendered {} bytes of HTML ({} highlighted, {} plain code blocks)",
            fragment.html.len(),
            fragment.highlighted_blocks,
            fragment.fallback_blocks
        );
        fragment
    }
}

fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.header_ids = Some(String::new());
    options.render.unsafe_ = true;
    options
}

// ── Code fences ──────────────────────────────────────────────────────────

/// Bridges comrak's code-fence hook to a [`Highlighter`], counting outcomes.
struct CodeFenceAdapter<'h, H: ?Sized> {
    highlighter: &'h H,
    highlighted: AtomicUsize,
    fallback: AtomicUsize,
}

impl<'h, H: Highlighter + ?Sized> CodeFenceAdapter<'h, H> {
    fn new(highlighter: &'h H) -> Self {
        Self {
            highlighter,
            highlighted: AtomicUsize::new(0),
            fallback: AtomicUsize::new(0),
        }
    }
}

impl<H: Highlighter + ?Sized> SyntaxHighlighterAdapter for CodeFenceAdapter<'_, H> {
    fn write_highlighted(
        &self,
        output: &mut dyn Write,
        lang: Option<&str>,
        code: &str,
    ) -> io::Result<()> {
        let result = self.highlighter.highlight(code, lang);
        let counter = if result.is_fallback() {
            &self.fallback
        } else {
            &self.highlighted
        };
        counter.fetch_add(1, Ordering::Relaxed);
        output.write_all(result.html().as_bytes())
    }

    fn write_pre_tag(
        &self,
        output: &mut dyn Write,
        attributes: HashMap<String, String>,
    ) -> io::Result<()> {
        write_opening_tag(output, "pre", attributes, Some("highlight"))
    }

    fn write_code_tag(
        &self,
        output: &mut dyn Write,
        attributes: HashMap<String, String>,
    ) -> io::Result<()> {
        write_opening_tag(output, "code", attributes, None)
    }
}

/// Write `<tag a="…">` with attributes in sorted order and `extra_class`
/// merged into any existing `class`.
fn write_opening_tag(
    output: &mut dyn Write,
    tag: &str,
    mut attributes: HashMap<String, String>,
    extra_class: Option<&str>,
) -> io::Result<()> {
    if let Some(extra) = extra_class {
        attributes
            .entry("class".to_string())
            .and_modify(|c| {
                c.push(' ');
                c.push_str(extra);
            })
            .or_insert_with(|| extra.to_string());
    }

    let mut attrs: Vec<_> = attributes.into_iter().collect();
    attrs.sort();

    write!(output, "<{tag}")?;
    for (name, value) in attrs {
        write!(output, " {}=\"{}\"", name, escape_html(&value))?;
    }
    write!(output, ">")
}

// ── Table of contents ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct TocEntry {
    level: u8,
    anchor: String,
    text: String,
}

/// Replace the first `<p>[TOC]</p>` in `html` with a nested list of links.
fn expand_toc<'a>(html: &str, root: &'a AstNode<'a>) -> String {
    let marker = format!("<p>{TOC_MARKER}</p>");
    if !html.contains(&marker) {
        return html.to_string();
    }
    let entries = collect_headings(root);
    debug!("Expanding table of contents with {} entries", entries.len());
    html.replacen(&marker, &toc_html(&entries), 1)
}

/// Headings in document order with the same anchors comrak assigns.
fn collect_headings<'a>(root: &'a AstNode<'a>) -> Vec<TocEntry> {
    let mut anchorizer = Anchorizer::new();
    let mut entries = Vec::new();

    for node in root.descendants() {
        let level = match node.data.borrow().value {
            NodeValue::Heading(ref h) => h.level,
            _ => continue,
        };
        let mut text = String::new();
        collect_text(node, &mut text);
        entries.push(TocEntry {
            level,
            anchor: anchorizer.anchorize(text.clone()),
            text,
        });
    }
    entries
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match node.data.borrow().value {
        NodeValue::Text(ref literal) => out.push_str(literal),
        NodeValue::Code(ref code) => out.push_str(&code.literal),
        NodeValue::LineBreak | NodeValue::SoftBreak => out.push(' '),
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

fn toc_html(entries: &[TocEntry]) -> String {
    let mut html = String::from("<nav class=\"toc\">\n");
    let base = entries.iter().map(|e| e.level).min().unwrap_or(1);
    let mut depth = 0usize;

    for entry in entries {
        // Never skip a nesting level, so every <ul> sits inside an open <li>.
        let target = (usize::from(entry.level - base) + 1).min(depth + 1);
        if target > depth {
            html.push_str("<ul>\n");
            depth = target;
        } else {
            html.push_str("</li>\n");
            while depth > target {
                html.push_str("</ul>\n</li>\n");
                depth -= 1;
            }
        }
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            escape_html(&entry.anchor),
            escape_html(&entry.text)
        ));
    }

    if depth > 0 {
        html.push_str("</li>\n");
        while depth > 1 {
            html.push_str("</ul>\n</li>\n");
            depth -= 1;
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</nav>\n");
    html
}
