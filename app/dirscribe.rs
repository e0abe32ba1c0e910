//! Command-line interface for dirscribe.
//!
//! Runs the extraction pipeline over a target folder and writes the text
//! artifact to the resolved output name. Pipeline progress is logged via
//! `tracing` on stderr; pass `RUST_LOG` to change verbosity.

use clap::Parser;
use dirscribe::{
    DEFAULT_MAX_PDF_PAGES, DEFAULT_PDF_TEXT_THRESHOLD, RunReport, ScribeBuilder, ScribeOptions,
    scribe, write_artifact,
};
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

/// dirscribe — flatten a directory tree into one annotated text artifact
#[derive(Parser)]
#[command(name = "dirscribe", version, about, long_about = None)]
struct Cli {
    /// Path to the target folder
    root: PathBuf,

    /// Output file name (optional)
    output_name: Option<String>,

    /// Additional patterns to filter (separated by commas)
    #[arg(short = 'f', long = "filter")]
    filter: Option<String>,

    /// Disable OCR processing for images and PDFs
    #[arg(long = "no-ocr")]
    no_ocr: bool,

    /// Trimmed character count above which a PDF text layer is trusted
    #[arg(long, default_value_t = DEFAULT_PDF_TEXT_THRESHOLD)]
    pdf_text_threshold: usize,

    /// Maximum number of PDF pages rasterized per document
    #[arg(long, default_value_t = DEFAULT_MAX_PDF_PAGES)]
    max_pdf_pages: usize,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Suppress the summary lines
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn into_options(self) -> (ScribeOptions, bool, bool) {
        let patterns = self
            .filter
            .map(|raw| raw.split(',').map(|p| p.trim().to_string()).collect())
            .unwrap_or_default();
        let mut builder = ScribeBuilder::new(self.root)
            .extra_filter_patterns(patterns)
            .ocr_enabled(!self.no_ocr)
            .pdf_text_threshold(self.pdf_text_threshold)
            .max_pdf_pages(self.max_pdf_pages);
        if let Some(name) = self.output_name {
            builder = builder.output_name(name);
        }
        (builder.build(), self.json, self.quiet)
    }
}

fn init_tracing(quiet: bool) {
    let default_filter = if quiet { "error" } else { "warn,dirscribe=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    let (options, json, quiet) = cli.into_options();

    let report = match scribe(options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };
    if let Err(e) = write_artifact(&report.output_name, &report.artifact) {
        eprintln!("Error: {}", e);
        exit(1);
    }

    if json {
        print_json_summary(&report);
    } else if !quiet {
        print_summary(&report);
    }
}

fn print_summary(report: &RunReport) {
    println!("Output written to {}", report.output_name);
    println!("Total files processed: {}", report.summary.total_files);
    println!("Total size: {}", report.summary.total_size);
    if let Some(ocr) = &report.summary.ocr {
        println!(
            "OCR files processed: {}/{}",
            ocr.successful_ocr, ocr.total_ocr_files
        );
        println!("Average OCR confidence: {}%", ocr.average_confidence);
    }
}

fn print_json_summary(report: &RunReport) {
    let json = serde_json::to_string_pretty(&report.summary).unwrap_or_else(|e| {
        eprintln!("JSON serialization error: {}", e);
        exit(1);
    });
    println!("{}", json);
}
