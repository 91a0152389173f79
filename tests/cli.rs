//! Integration tests for the `mdconv` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn mdconv() -> Command {
    Command::cargo_bin("mdconv").expect("binary built")
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn converts_markdown_with_embedded_css() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "a.md", "```python\nprint(1)\n```\n");
    let output = dir.path().join("a.html");

    mdconv()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--embed-css")
        .assert()
        .success()
        .stderr(predicate::str::contains("Markdown -> HTML"));

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("<style>"));
    assert!(html.contains("<title>a</title>"));
    assert!(html.contains(">print</span>"));
}

#[test]
fn converts_html_back_to_markdown() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "page.html",
        "<html><body><h3>Details</h3><p>Body</p></body></html>",
    );
    let output = dir.path().join("page.md");

    mdconv()
        .args(["--input"])
        .arg(&input)
        .args(["--output"])
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("HTML -> Markdown"));

    let md = std::fs::read_to_string(&output).unwrap();
    assert!(md.contains("### Details"), "got: {md}");
}

#[test]
fn missing_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.html");

    mdconv()
        .current_dir(dir.path())
        .args(["-i", "missing.md", "-o", "out.html"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("missing.md"));

    assert!(!output.exists());
}

#[test]
fn unsupported_extension_exit_code() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "notes.txt", "hello");

    mdconv()
        .current_dir(dir.path())
        .args(["-i", "notes.txt", "-o", "notes.html"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("notes.txt"));

    assert!(!dir.path().join("notes.html").exists());
}

#[test]
fn css_file_overrides_embed_css() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "doc.md", "# Doc\n");
    write(dir.path(), "mine.css", "h1 { color: purple; }");

    mdconv()
        .current_dir(dir.path())
        .args([
            "-i", "doc.md", "-o", "doc.html", "--embed-css", "--css-file", "mine.css",
        ])
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join("doc.html")).unwrap();
    assert!(html.contains("<style>\nh1 { color: purple; }\n</style>"));
    assert!(!html.contains("font-family"));
}

#[test]
fn missing_css_file_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "doc.md", "# Doc\n");

    mdconv()
        .current_dir(dir.path())
        .args(["-i", "doc.md", "-o", "doc.html", "--css-file", "gone.css"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("gone.css"));

    assert!(!dir.path().join("doc.html").exists());
}

#[test]
fn custom_title_and_quiet() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "doc.md", "text\n");

    mdconv()
        .current_dir(dir.path())
        .args(["-i", "doc.md", "-o", "doc.html", "--title", "Handbook", "-q"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let html = std::fs::read_to_string(dir.path().join("doc.html")).unwrap();
    assert!(html.contains("<title>Handbook</title>"));
}

#[test]
fn json_report_on_stdout() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "doc.md", "```rust\nfn main() {}\n```\n");

    let assert = mdconv()
        .current_dir(dir.path())
        .args(["-i", "doc.md", "-o", "doc.html", "--json", "-q"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(report["direction"], "to_html");
    assert_eq!(report["stats"]["highlighted_blocks"], 1);
}

#[test]
fn unknown_theme_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "doc.md", "text\n");

    mdconv()
        .current_dir(dir.path())
        .args(["-i", "doc.md", "-o", "doc.html", "--highlight-theme", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown highlight theme"));
}

#[test]
fn no_toc_keeps_marker() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "doc.md", "[TOC]\n\n# A\n");

    mdconv()
        .current_dir(dir.path())
        .args(["-i", "doc.md", "-o", "doc.html", "--no-toc"])
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join("doc.html")).unwrap();
    assert!(html.contains("<p>[TOC]</p>"));
}
