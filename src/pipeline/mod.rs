//! Pipeline stages for Markdown ⇄ HTML conversion.
//!
//! Each submodule implements exactly one transformation step and can be
//! tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//!              ┌─▶ render ──▶ style            (Markdown → HTML)
//! io ─▶ detect ┤    (comrak + highlight)
//!              └─▶ html_to_md ──▶ postprocess  (HTML → Markdown)
//! ```
//!
//! 1. [`io`]         — read the source as UTF-8; atomically write the result
//! 2. [`detect`]     — pick the direction from the file extensions
//! 3. [`render`]     — Markdown to an HTML body fragment via comrak
//! 4. [`highlight`]  — code-fence highlighting, plugged into the renderer
//! 5. [`style`]      — wrap the fragment in a document with stylesheets
//! 6. [`html_to_md`] — HTML back to Markdown via html2md
//! 7. [`postprocess`] — deterministic cleanup of the converted Markdown

pub mod detect;
pub mod highlight;
pub mod html_to_md;
pub mod io;
pub mod postprocess;
pub mod render;
pub mod style;

/// Escape text for use in HTML element content or a quoted attribute.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_html;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
