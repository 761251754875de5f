//! Strata CLI
//!
//! Converts a page capture (JSON) into a layer tree and prints it as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use strata_layers::images::{HttpFetcher, resolve_images};
use strata_layers::{
    AssemblyStrategy, CapturedPage, Conversion, ConversionIssue, ConvertOptions, PaintOrder,
    convert,
};

/// Strata: rendered HTML capture to design-canvas layers
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Convert a capture and print the layer tree
    strata page.json

    # Flat output with absolute coordinates
    strata --flat page.json

    # Reconciling assembly, images fetched and embedded
    strata --strategy reconcile --fetch-images -o layers.json page.json

    # Options from a file, overridden on the command line
    strata --config strata.toml --paint-order bottommost-first page.json
"#)]
struct Cli {
    /// Capture file produced by the page extractor
    #[arg(value_name = "CAPTURE")]
    capture: PathBuf,

    /// Options file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit a flat list instead of nested frames
    #[arg(long)]
    flat: bool,

    /// Assembly strategy: canonical or reconcile
    #[arg(long, value_name = "STRATEGY")]
    strategy: Option<AssemblyStrategy>,

    /// Regroup layers under their deepest shared ancestor
    #[arg(long)]
    group: bool,

    /// Children order: topmost-first or bottommost-first
    #[arg(long, value_name = "ORDER")]
    paint_order: Option<PaintOrder>,

    /// Fetch image paints and embed them as bytes or SVG layers
    #[arg(long)]
    fetch_images: bool,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,

    /// Do not print conversion issues to stderr
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Options from `--config`, then the command-line overrides.
    fn options(&self) -> Result<ConvertOptions> {
        let mut options = match &self.config {
            Some(path) => ConvertOptions::load_from_file(path)
                .with_context(|| format!("loading options from {}", path.display()))?,
            None => ConvertOptions::default(),
        };
        if self.flat {
            options.use_frames = false;
        }
        if let Some(strategy) = self.strategy {
            options.strategy = strategy;
        }
        if self.group {
            options.group_common_ancestors = true;
        }
        if let Some(order) = self.paint_order {
            options.paint_order = order;
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.options()?;

    let page = CapturedPage::from_file(&cli.capture)
        .with_context(|| format!("loading capture {}", cli.capture.display()))?;

    let mut conversion = convert(&page, &options);
    if cli.fetch_images {
        let issues = resolve_images(&mut conversion.layers, &HttpFetcher, options.paint_order);
        conversion.issues.extend(issues);
    }

    if !cli.quiet {
        print_issues(&conversion.issues);
    }
    write_output(&cli, &conversion)
}

fn print_issues(issues: &[ConversionIssue]) {
    for issue in issues {
        eprintln!(
            "{} {} {}",
            "warning:".yellow().bold(),
            format!("[{}]", issue.component).dimmed(),
            issue.message
        );
    }
    if !issues.is_empty() {
        eprintln!("{}", format!("{} issue(s) during conversion", issues.len()).yellow());
    }
}

fn write_output(cli: &Cli, conversion: &Conversion) -> Result<()> {
    let json = if cli.compact {
        serde_json::to_string(conversion)?
    } else {
        serde_json::to_string_pretty(conversion)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
