//! Post-processing: deterministic cleanup of converted Markdown.
//!
//! The HTML → Markdown converter leaves artefacts that are valid Markdown but
//! noisy or inconsistent:
//!
//! - `\r\n` line endings carried over from the source HTML
//! - trailing spaces on every line (a run of two or more that ends a line
//!   inside a paragraph is a hard break and is kept as exactly two)
//! - a blank line before every closing code fence
//! - setext headings (`Title` over `=====`) where ATX (`# Title`) is wanted
//! - long runs of blank lines where block elements were nested
//! - invisible Unicode (zero-width spaces, BOM, soft hyphens)
//!
//! Each rule is a pure `&str → String` pass and is independently testable.
//!
//! ## Rule Order
//!
//! Line endings are normalised before anything inspects lines, and headings
//! are rewritten before blank lines are collapsed so the spacing around the
//! new heading is cleaned up too.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to converted Markdown.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Trim trailing whitespace per line, keeping hard breaks (outside code fences)
/// 3. Drop blank lines directly before a closing code fence
/// 4. Rewrite setext headings as ATX headings (outside code fences)
/// 5. Ensure heading lines have a blank line before them
/// 6. Collapse 3+ consecutive blank lines down to 2
/// 7. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, etc.)
/// 8. Ensure the file ends with exactly one newline
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = trim_trailing_whitespace(&s);
    let s = trim_blank_before_closing_fence(&s);
    let s = setext_to_atx(&s);
    let s = normalise_heading_spacing(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Trim trailing whitespace per line ────────────────────────────────

const HARD_BREAK: &str = "  ";

fn trim_trailing_whitespace(input: &str) -> String {
    let lines: Vec<&str> = input.lines().collect();
    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;

    for (i, line) in lines.iter().enumerate() {
        if is_fence(line) {
            in_fence = !in_fence;
            result.push(line.trim_end().to_string());
            continue;
        }
        if in_fence {
            result.push(line.to_string());
            continue;
        }

        let trimmed = line.trim_end();
        let continues = lines
            .get(i + 1)
            .is_some_and(|next| !next.trim().is_empty() && !is_fence(next));
        let hard_break = line.ends_with(HARD_BREAK)
            && !trimmed.is_empty()
            && !is_atx_heading(trimmed)
            && continues;

        if hard_break {
            result.push(format!("{trimmed}{HARD_BREAK}"));
        } else {
            result.push(trimmed.to_string());
        }
    }

    result.join("\n")
}

// ── Rule 3: Blank lines before closing fences ────────────────────────────────

fn trim_blank_before_closing_fence(input: &str) -> String {
    let mut result: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in input.lines() {
        if is_fence(line) {
            if in_fence {
                while result.last().is_some_and(|l| l.trim().is_empty()) {
                    result.pop();
                }
            }
            in_fence = !in_fence;
        }
        result.push(line);
    }

    result.join("\n")
}

// ── Rule 4: Setext → ATX headings ────────────────────────────────────────────

static RE_SETEXT_H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}=+\s*$").unwrap());
static RE_SETEXT_H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}-+\s*$").unwrap());

fn is_fence(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("```") || t.starts_with("~~~")
}

/// A line that could be the text of a setext heading.
fn is_heading_text(line: &str) -> bool {
    let t = line.trim();
    !t.is_empty()
        && !t.starts_with('#')
        && !t.starts_with('>')
        && !t.starts_with('|')
        && !t.starts_with("* ")
        && !t.starts_with("- ")
        && !t.starts_with("+ ")
        && !RE_SETEXT_H2.is_match(line)
        && !RE_SETEXT_H1.is_match(line)
}

fn setext_to_atx(input: &str) -> String {
    let lines: Vec<&str> = input.lines().collect();
    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_fence(line) {
            in_fence = !in_fence;
            result.push(line.to_string());
            i += 1;
            continue;
        }

        if !in_fence && is_heading_text(line) {
            // The previous line must not be paragraph text, or the underline
            // belongs to a multi-line paragraph heading we leave alone.
            let starts_block = result.last().map_or(true, |prev| prev.trim().is_empty());
            let next = lines.get(i + 1).copied().unwrap_or("");
            let level = if RE_SETEXT_H1.is_match(next) {
                Some(1)
            } else if RE_SETEXT_H2.is_match(next) {
                Some(2)
            } else {
                None
            };
            if let (true, Some(level)) = (starts_block, level) {
                result.push(format!("{} {}", "#".repeat(level), line.trim()));
                i += 2;
                continue;
            }
        }

        result.push(line.to_string());
        i += 1;
    }

    result.join("\n")
}

// ── Rule 5: Normalise heading spacing ────────────────────────────────────────

fn is_atx_heading(line: &str) -> bool {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    (1..=6).contains(&hashes) && line[hashes..].starts_with(' ')
}

fn normalise_heading_spacing(input: &str) -> String {
    // Ensure a blank line before each heading (unless at the very start)
    let mut result = String::with_capacity(input.len() + 64);
    let mut in_fence = false;
    for (i, line) in input.lines().enumerate() {
        if is_fence(line) {
            in_fence = !in_fence;
        }
        if !in_fence && is_atx_heading(line) && i > 0 {
            let trimmed = result.trim_end_matches('\n');
            result.truncate(trimmed.len());
            result.push_str("\n\n");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}

// ── Rule 6: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 7: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 8: Ensure file ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
