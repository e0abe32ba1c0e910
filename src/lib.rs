//! # Dirscribe
//!
//! `dirscribe` converts a directory tree into a single text artifact: a
//! statistics header, an annotated tree of the folder structure, and the
//! concatenated content of every included file. Images and scanned PDFs are
//! folded into the same artifact through an OCR pipeline that prefers a
//! PDF's native text layer and falls back to page-by-page recognition.
//!
//! Classification is rule-driven: dependency and VCS directories are pruned
//! outright, lockfiles and binary blobs are listed but excluded from
//! content, and image/PDF files are routed to OCR. Per-file extraction
//! failures never abort a run; they are logged and recorded inline in the
//! artifact.
//!
//! # Features
//!
//! - `tesseract`: Enables the native Tesseract recognition backend via `leptess`.
//! - `pdfium`: Enables PDF page rasterization via `pdfium-render`.
//!
//! Without these features the pipeline still runs end to end; OCR candidates
//! are reported with failure outcomes. Custom backends can be injected
//! through [`OcrEngine::with_backends`].
//!
//! # Example
//!
//! ```no_run
//! use dirscribe::{ScribeBuilder, scribe, write_artifact};
//!
//! let options = ScribeBuilder::new("./my-project")
//!     .extra_filter_patterns(vec!["fixtures".to_string()])
//!     .ocr_enabled(true)
//!     .build();
//!
//! let report = scribe(options).expect("failed to scan directory");
//!
//! println!(
//!     "{} files, {}",
//!     report.summary.total_files, report.summary.total_size
//! );
//! write_artifact(&report.output_name, &report.artifact).expect("failed to write artifact");
//! ```

mod engine;
mod error;
mod filter;
mod ocr;
mod options;
mod output;
mod tree;
mod types;

pub use engine::{scribe, scribe_with_engine};
pub use error::ScribeError;
pub use filter::{FilterSet, PathDecision};
#[cfg(feature = "pdfium")]
pub use ocr::PdfiumRasterizer;
#[cfg(feature = "tesseract")]
pub use ocr::TesseractRecognizer;
pub use ocr::{
    DEFAULT_MAX_PDF_PAGES, DEFAULT_PDF_TEXT_THRESHOLD, EngineState, METHOD_OCR, METHOD_OCR_FAILED,
    METHOD_PDF_FAILED, METHOD_PDF_OCR, METHOD_PDF_OCR_FAILED, METHOD_PDF_TEXT, OcrEngine, OcrError,
    OcrMetadata, OcrOutcome, Recognition, Recognizer, Rasterizer,
};
pub use options::{ScribeBuilder, ScribeOptions};
pub use output::{format_size, write_artifact};
pub use tree::render_tree;
pub use types::{FileRecord, OcrRunStats, RunReport, RunStatistics, RunSummary};
