//! Code-block highlighting.
//!
//! The renderer only knows the [`Highlighter`] trait: it hands over a code
//! block and its language hint and gets back an HTML fragment. An unknown
//! hint is not an error; it yields [`Highlight::PlainFallback`], which carries
//! the escaped code with no token markup. A block with no hint at all gets its
//! grammar guessed from the first line (shebangs, `<?php`, `<?xml`, modelines).
//!
//! [`SyntectHighlighter`] is the production implementation. It emits classed
//! spans (`<span class="hl-keyword …">`) rather than inline colours, so the
//! look is controlled entirely by [`Highlighter::stylesheet`].

use crate::error::MdConvError;
use crate::pipeline::escape_html;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::{debug, warn};

/// CSS class prefix for every token span.
pub const CLASS_PREFIX: &str = "hl-";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: CLASS_PREFIX,
};

/// Result of highlighting one code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    /// The hint resolved to a grammar; `html` carries token spans.
    Highlighted { html: String, language: String },
    /// No grammar matched (or lexing failed); `html` is the escaped code.
    PlainFallback { html: String },
}

impl Highlight {
    pub fn html(&self) -> &str {
        match self {
            Highlight::Highlighted { html, .. } | Highlight::PlainFallback { html } => html,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Highlight::PlainFallback { .. })
    }

    /// Escape `code` without any token markup.
    pub fn plain(code: &str) -> Self {
        Highlight::PlainFallback {
            html: escape_html(code),
        }
    }
}

/// Turns a code block into an HTML fragment.
pub trait Highlighter: Send + Sync {
    /// Highlight `code` using `language_hint` to pick a grammar.
    ///
    /// Must never fail: anything it cannot handle becomes
    /// [`Highlight::PlainFallback`].
    fn highlight(&self, code: &str, language_hint: Option<&str>) -> Highlight;

    /// CSS styling the token classes this highlighter emits, if any.
    fn stylesheet(&self) -> Option<String>;
}

/// A highlighter that never highlights. Every block is escaped as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, _language_hint: Option<&str>) -> Highlight {
        Highlight::plain(code)
    }

    fn stylesheet(&self) -> Option<String> {
        None
    }
}

/// syntect-backed highlighter using the bundled grammars and themes.
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
    theme_name: String,
}

impl SyntectHighlighter {
    /// Load the bundled grammars and the named theme.
    ///
    /// # Errors
    /// [`MdConvError::UnknownTheme`] when `theme_name` is not a bundled theme.
    pub fn new(theme_name: &str) -> Result<Self, MdConvError> {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme_name) {
            Some(t) => t,
            None => {
                let available = themes.keys().cloned().collect::<Vec<_>>().join(", ");
                return Err(MdConvError::UnknownTheme {
                    name: theme_name.to_string(),
                    available,
                });
            }
        };

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
            theme_name: theme_name.to_string(),
        })
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Grammar for a block: by hint when there is one, otherwise guessed
    /// from the first line of the code.
    fn find_syntax(&self, code: &str, hint: Option<&str>) -> Option<&SyntaxReference> {
        match hint.map(str::trim).filter(|h| !h.is_empty()) {
            Some(hint) => self.syntaxes.find_syntax_by_token(hint),
            None => {
                let first_line = code.lines().next()?;
                let guessed = self.syntaxes.find_syntax_by_first_line(first_line);
                if let Some(syntax) = guessed {
                    debug!("Guessed {} from first line", syntax.name);
                }
                guessed
            }
        }
    }

    fn classed_html(&self, code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
        let mut gen =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            gen.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(gen.finalize())
    }
}

impl std::fmt::Debug for SyntectHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntectHighlighter")
            .field("theme", &self.theme_name)
            .field("syntaxes", &self.syntaxes.syntaxes().len())
            .finish()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language_hint: Option<&str>) -> Highlight {
        let Some(syntax) = self.find_syntax(code, language_hint) else {
            debug!("No grammar for {:?}, emitting plain code", language_hint);
            return Highlight::plain(code);
        };

        match self.classed_html(code, syntax) {
            Ok(html) => Highlight::Highlighted {
                html,
                language: syntax.name.clone(),
            },
            Err(e) => {
                warn!("Highlighting as {} failed, emitting plain code: {}", syntax.name, e);
                Highlight::plain(code)
            }
        }
    }

    fn stylesheet(&self) -> Option<String> {
        match css_for_theme_with_class_style(&self.theme, CLASS_STYLE) {
            Ok(css) => Some(css),
            Err(e) => {
                warn!("Could not build CSS for theme {}: {}", self.theme_name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_HIGHLIGHT_THEME;

    fn highlighter() -> SyntectHighlighter {
        SyntectHighlighter::new(DEFAULT_HIGHLIGHT_THEME).expect("bundled theme")
    }

    #[test]
    fn python_is_highlighted_token_by_token() {
        let h = highlighter().highlight("print(1)\n", Some("python"));
        let Highlight::Highlighted { html, language } = h else {
            panic!("expected highlighted output");
        };
        assert_eq!(language, "Python");
        assert!(html.contains("class=\"hl-"), "got: {html}");
        for token in ["print", "(", "1", ")"] {
            assert!(html.contains(&format!(">{token}</span>")), "{token} in {html}");
        }
    }

    #[test]
    fn extension_hints_resolve() {
        let h = highlighter().highlight("fn main() {}\n", Some("rs"));
        assert!(!h.is_fallback());
    }

    #[test]
    fn unknown_language_falls_back() {
        let h = highlighter().highlight("let x = 1;", Some("lang-doesnotexist"));
        assert!(h.is_fallback());
        assert!(!h.html().is_empty());
        assert_eq!(h.html(), "let x = 1;");
    }

    #[test]
    fn missing_hint_falls_back_and_escapes() {
        let h = highlighter().highlight("a < b && c", None);
        assert_eq!(h, Highlight::plain("a < b && c"));
        assert_eq!(h.html(), "a &lt; b &amp;&amp; c");
    }

    #[test]
    fn unlabelled_block_is_guessed_from_shebang() {
        let h = highlighter().highlight("#!/usr/bin/env python\nprint(1)\n", None);
        let Highlight::Highlighted { language, .. } = h else {
            panic!("expected a guessed grammar");
        };
        assert_eq!(language, "Python");
    }

    #[test]
    fn unknown_hint_is_not_guessed() {
        let h = highlighter().highlight("#!/bin/sh\necho hi\n", Some("lang-doesnotexist"));
        assert!(h.is_fallback());
    }

    #[test]
    fn blank_hint_falls_back() {
        assert!(highlighter().highlight("x", Some("  ")).is_fallback());
    }

    #[test]
    fn stylesheet_targets_prefixed_classes() {
        let css = highlighter().stylesheet().expect("css");
        assert!(css.contains(".hl-"), "got: {css}");
    }

    #[test]
    fn unknown_theme_lists_alternatives() {
        let err = SyntectHighlighter::new("NoSuchTheme").unwrap_err();
        match err {
            MdConvError::UnknownTheme { name, available } => {
                assert_eq!(name, "NoSuchTheme");
                assert!(available.contains(DEFAULT_HIGHLIGHT_THEME));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_highlighter_has_no_css() {
        let h = PlainHighlighter;
        assert!(h.highlight("fn x() {}", Some("rust")).is_fallback());
        assert!(h.stylesheet().is_none());
    }
}
