//! Style injection: wrap a rendered body fragment into a full HTML document.
//!
//! Stylesheet precedence:
//! 1. [`StylesheetMode::External`]: the file's contents, embedded inline
//! 2. [`StylesheetMode::EmbedDefault`]: [`DEFAULT_CSS`]
//! 3. [`StylesheetMode::None`]: no `<style>` element at all
//!
//! When a page stylesheet is emitted, the highlighter's token CSS follows in
//! its own `<style class="highlight">` element, so the first `<style>` holds
//! exactly the chosen stylesheet.

use crate::config::StylesheetMode;
use crate::error::MdConvError;
use crate::pipeline::escape_html;
use std::borrow::Cow;
use tracing::debug;

/// Built-in stylesheet for `--embed-css`.
pub const DEFAULT_CSS: &str = r#"/* page */
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    max-width: 880px;
    margin: 40px auto;
    padding: 0 20px;
    line-height: 1.6;
    color: #1f2328;
    background: #ffffff;
}

/* headings */
h1, h2, h3, h4, h5, h6 { margin-top: 1.4em; line-height: 1.25; }
h1 { font-size: 2.2rem; border-bottom: 1px solid #d0d7de; padding-bottom: 0.3em; }
h2 { font-size: 1.6rem; }
h1 a.anchor, h2 a.anchor, h3 a.anchor, h4 a.anchor, h5 a.anchor, h6 a.anchor { text-decoration: none; }

/* links */
a { color: #0969da; text-decoration: none; }
a:hover { text-decoration: underline; }

/* code */
code { background: #f3f4f6; padding: 0.15rem 0.3rem; border-radius: 4px; font-size: 0.92em; }
pre { background: #f6f8fa; padding: 0.9rem 1rem; border-radius: 6px; overflow: auto; line-height: 1.45; }
pre code { background: none; padding: 0; font-size: 0.9em; }

/* images */
img { max-width: 100%; height: auto; display: block; margin: 10px 0; }

/* tables */
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #d0d7de; padding: 6px 13px; }
th { background: #f6f8fa; }

/* quotes */
blockquote { margin: 1em 0; padding: 0 1em; color: #59636e; border-left: 4px solid #d0d7de; }

/* table of contents */
.toc { background: #f8fafc; padding: 12px 16px; border-radius: 6px; margin-bottom: 18px; }
.toc ul { margin: 0; padding-left: 1.2em; }
"#;

/// Everything the injector needs besides the body.
#[derive(Debug, Clone)]
pub struct StyleOptions<'a> {
    /// Unescaped document title.
    pub title: &'a str,
    pub stylesheet: &'a StylesheetMode,
    /// Token CSS from the highlighter; only used when a stylesheet is emitted.
    pub highlight_css: Option<&'a str>,
}

/// Read the page stylesheet selected by `mode`.
///
/// # Errors
/// [`MdConvError::StylesheetReadError`] when an external stylesheet cannot be read.
pub fn resolve_stylesheet(mode: &StylesheetMode) -> Result<Option<Cow<'static, str>>, MdConvError> {
    match mode {
        StylesheetMode::None => Ok(None),
        StylesheetMode::EmbedDefault => Ok(Some(Cow::Borrowed(DEFAULT_CSS))),
        StylesheetMode::External(path) => {
            let css = std::fs::read_to_string(path).map_err(|source| {
                MdConvError::StylesheetReadError {
                    path: path.clone(),
                    source,
                }
            })?;
            debug!("Embedding stylesheet {} ({} bytes)", path.display(), css.len());
            Ok(Some(Cow::Owned(css)))
        }
    }
}

/// Wrap `body` into a complete HTML document.
pub fn wrap(body: &str, opts: &StyleOptions<'_>) -> Result<String, MdConvError> {
    let css = resolve_stylesheet(opts.stylesheet)?;

    let mut doc = String::with_capacity(body.len() + css.as_ref().map_or(0, |c| c.len()) + 512);
    doc.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    doc.push_str("<meta charset=\"utf-8\" />\n");
    doc.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\" />\n");
    doc.push_str(&format!("<title>{}</title>\n", escape_html(opts.title)));

    if let Some(css) = css {
        doc.push_str(&format!("<style>\n{}\n</style>\n", css.trim_end()));
        if let Some(hl) = opts.highlight_css.filter(|c| !c.trim().is_empty()) {
            doc.push_str(&format!("<style class=\"highlight\">\n{}\n</style>\n", hl.trim_end()));
        }
    }

    doc.push_str("</head>\n<body>\n<article>\n");
    doc.push_str(body.trim_end());
    doc.push_str("\n</article>\n</body>\n</html>\n");
    Ok(doc)
}
