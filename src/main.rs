//! doklet - DocBook to AsciiDoc converter

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use doklet::{Category, DiagnosticKind, Document, StyleConfig, convert};

#[derive(Parser)]
#[command(name = "doklet")]
#[command(version, about = "DocBook to AsciiDoc converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    doklet book/ out/               Convert a DocBook directory
    doklet publican.cfg out/        Convert via a publican configuration
    doklet Book.xml out/ --strict   Fail on leftover unprocessed content")]
struct Cli {
    /// Input: publican.cfg, DocBook directory, or XML file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory for the generated AsciiDoc
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Comma-separated custom semantic tags to preserve
    #[arg(long)]
    custom: Option<String>,

    /// Comma-separated elements to render as in-line literal text
    #[arg(long)]
    monospace: Option<String>,

    /// Comma-separated elements to render as in-line superscript text
    #[arg(long)]
    superscript: Option<String>,

    /// Comma-separated elements to render as in-line italic text
    #[arg(long)]
    italic: Option<String>,

    /// Comma-separated elements to render as in-line bold text
    #[arg(long)]
    bold: Option<String>,

    /// Comma-separated elements to render as in-line highlighted text
    #[arg(long)]
    highlight: Option<String>,

    /// Semicolon-separated condition list, overriding the publican.cfg one
    #[arg(long)]
    condition: Option<String>,

    /// Exit with an error when unprocessed content remains after conversion
    #[arg(long)]
    strict: bool,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> doklet::Result<ExitCode> {
    tracing::info!(
        "converting {} to {}",
        cli.input.display(),
        cli.output.display()
    );

    let mut doc = Document::open(&cli.input)?;
    if let Some(condition) = &cli.condition {
        doc.publican_cfg
            .get_or_insert_with(Default::default)
            .insert("condition".to_string(), condition.clone());
    }

    let style = build_style(cli);
    let conversion = convert(&doc, &style)?;
    conversion.output.write(&cli.output)?;

    let leftovers = conversion
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::LeftoverText)
        .count();
    if leftovers > 0 && cli.strict {
        eprintln!("error: {leftovers} unprocessed node(s) remain");
        return Ok(ExitCode::FAILURE);
    }

    tracing::info!(
        "complete: {}",
        cli.output.join(doklet::asciidoc::MASTER).display()
    );
    Ok(ExitCode::SUCCESS)
}

fn build_style(cli: &Cli) -> StyleConfig {
    let mut style = StyleConfig::default();
    let overrides: [(&Option<String>, Category); 6] = [
        (&cli.custom, Category::Custom),
        (&cli.monospace, Category::Monospace),
        (&cli.superscript, Category::Superscript),
        (&cli.italic, Category::Italic),
        (&cli.bold, Category::Bold),
        (&cli.highlight, Category::Highlight),
    ];
    for (list, category) in overrides {
        if let Some(list) = list {
            style.override_from_str(category, list);
        }
    }
    style
}
