//! CLI binary for mdconv.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and reports the result.

use anyhow::{Context, Result};
use clap::Parser;
use mdconv::{convert_to_file, ConversionConfig, ConversionOutput, MdConvError};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Markdown -> HTML with the built-in stylesheet
  mdconv -i README.md -o out.html --embed-css

  # Markdown -> HTML with your own stylesheet, nested output directory
  mdconv -i notes.md -o site/index.html --css-file style.css

  # HTML -> Markdown
  mdconv -i page.html -o page.md

  # Custom title and highlight theme
  mdconv -i notes.md -o notes.html --embed-css --title "Notes" --highlight-theme base16-ocean.light

TABLE OF CONTENTS:
  A paragraph containing only [TOC] is replaced with a linked list of the
  document's headings. Disable with --no-toc.

EXIT CODES:
  0  success
  1  read/write, stylesheet or configuration error
  2  input file not found
  3  unsupported conversion (must be .md -> .html or .html -> .md)
"#;

/// Convert Markdown to HTML and HTML to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "mdconv",
    version,
    about = "Markdown <-> HTML converter (auto-detects direction)",
    long_about = "Convert Markdown to a standalone HTML document with syntax-highlighted code \
blocks and optional styling, or convert HTML back to Markdown. The direction is picked from \
the input file's extension.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file (.md or .html).
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (.html or .md).
    #[arg(short, long)]
    output: PathBuf,

    /// Embed the built-in stylesheet in the HTML.
    #[arg(long)]
    embed_css: bool,

    /// Embed this stylesheet in the HTML (overrides --embed-css).
    #[arg(long, value_name = "PATH")]
    css_file: Option<PathBuf>,

    /// HTML title (defaults to the input file name without extension).
    #[arg(long)]
    title: Option<String>,

    /// Theme for highlighted code blocks.
    #[arg(long, default_value = mdconv::DEFAULT_HIGHLIGHT_THEME)]
    highlight_theme: String,

    /// Leave a [TOC] paragraph as-is instead of expanding it.
    #[arg(long)]
    no_toc: bool,

    /// Print a JSON conversion report on stdout.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", red("error:"), err);
            let code = err
                .downcast_ref::<MdConvError>()
                .map(MdConvError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;

    let output = convert_to_file(&config)
        .with_context(|| format!("Conversion of {} failed", config.input.display()))?;

    if cli.json {
        let report = report_json(&config, &output)?;
        println!("{report}");
    }

    if !cli.quiet {
        eprintln!(
            "{} Converted {} -> {} ({})",
            green("✔"),
            config.input.display(),
            bold(&config.output.display().to_string()),
            output.direction,
        );
        if output.stats.highlighted_blocks + output.stats.fallback_blocks > 0 {
            eprintln!(
                "   {} code blocks highlighted, {} plain",
                output.stats.highlighted_blocks, output.stats.fallback_blocks
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder(&cli.input, &cli.output)
        .embed_css(cli.embed_css)
        .highlight_theme(&cli.highlight_theme)
        .toc(!cli.no_toc);

    if let Some(ref path) = cli.css_file {
        builder = builder.css_file(path);
    }
    if let Some(ref title) = cli.title {
        builder = builder.title(title);
    }

    builder.build().context("Invalid configuration")
}

fn report_json(config: &ConversionConfig, output: &ConversionOutput) -> Result<String> {
    let report = serde_json::json!({
        "input": config.input,
        "output": config.output,
        "direction": output.direction,
        "stylesheet": config.stylesheet,
        "stats": output.stats,
    });
    serde_json::to_string_pretty(&report).context("Failed to serialise report")
}
