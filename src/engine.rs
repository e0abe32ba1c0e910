use crate::error::ScribeError;
use crate::filter::{FilterSet, PathDecision};
use crate::ocr::{METHOD_OCR_FAILED, OcrEngine, OcrOutcome};
use crate::options::ScribeOptions;
use crate::output::{
    default_output_name, push_header, push_ocr_section, push_ocr_summary, push_text_section,
    push_tree_block,
};
use crate::tree::render_tree;
use crate::types::{FileRecord, RunReport, RunStatistics, extension_key};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

struct Walker {
    inner: ignore::Walk,
}

impl Walker {
    fn new(root: &Path, filter: &FilterSet) -> Self {
        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(false)
            .parents(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false);
        let filter = filter.clone();
        let root = root.to_path_buf();
        builder.filter_entry(move |entry| {
            // Rules match against root-relative paths; the root itself is
            // never pruned.
            let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            entry.depth() == 0 || !filter.skip_traversal(relative)
        });
        Self {
            inner: builder.build(),
        }
    }

    fn files(self) -> impl Iterator<Item = PathBuf> {
        self.inner.filter_map(|result| match result {
            Ok(entry) => entry
                .file_type()
                .is_some_and(|t| t.is_file())
                .then(|| entry.into_path()),
            Err(e) => {
                warn!("walk error: {}", e);
                None
            }
        })
    }
}

/// Runs the full pipeline with the compiled-in OCR backends.
///
/// # Errors
///
/// Returns an error if the root does not exist or is not a directory.
/// Per-file failures never abort the run; they are logged and reflected in
/// the artifact.
pub fn scribe(options: ScribeOptions) -> Result<RunReport, ScribeError> {
    let mut engine = OcrEngine::new();
    scribe_with_engine(&options, &mut engine)
}

/// Runs the full pipeline with a caller-supplied OCR engine.
///
/// The engine is shut down before this returns, on success and failure
/// alike.
pub fn scribe_with_engine(
    options: &ScribeOptions,
    engine: &mut OcrEngine,
) -> Result<RunReport, ScribeError> {
    let report = run_pipeline(options, engine);
    engine.shutdown();
    report
}

fn run_pipeline(
    options: &ScribeOptions,
    engine: &mut OcrEngine,
) -> Result<RunReport, ScribeError> {
    let root = options.root.as_path();
    let root_metadata = fs::metadata(root).map_err(|e| ScribeError::io(root, e))?;
    if !root_metadata.is_dir() {
        return Err(ScribeError::InvalidRoot {
            path: root.to_path_buf(),
        });
    }
    info!("processing directory {}", root.display());
    engine.set_pdf_limits(options.pdf_text_threshold, options.max_pdf_pages);
    let filter = FilterSet::with_extra_patterns(&options.extra_filter_patterns);

    let mut stats = RunStatistics::default();
    let mut queue: Vec<FileRecord> = Vec::new();
    for path in Walker::new(root, &filter).files() {
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let decision = filter.decide(&path, relative);
        stats.record_file(&path, metadata.len(), decision == PathDecision::IncludeOcr);
        match decision {
            PathDecision::IncludeText | PathDecision::IncludeOcr => queue.push(FileRecord {
                extension: extension_key(&path),
                path: path.clone(),
                size: metadata.len(),
                is_ocr_candidate: decision == PathDecision::IncludeOcr,
            }),
            PathDecision::ContentSkip | PathDecision::TraverseSkip => {}
        }
    }
    info!("found {} files, {} queued for extraction", stats.total_files, queue.len());

    debug!("generating tree structure");
    let tree = render_tree(root, &filter);

    let mut artifact = String::with_capacity(1024);
    push_header(&mut artifact, &stats, options.ocr_enabled);
    push_tree_block(&mut artifact, &tree);

    for record in &queue {
        let relative = record.path.strip_prefix(root).unwrap_or(&record.path);
        if record.is_ocr_candidate && options.ocr_enabled {
            info!("performing OCR on {}", relative.display());
            let outcome = match engine.extract_text(&record.path) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("OCR dispatch failed for {}: {}", record.path.display(), e);
                    OcrOutcome::failure(
                        format!("[OCR Error: {e}]"),
                        METHOD_OCR_FAILED,
                        e.to_string(),
                    )
                }
            };
            stats.record_ocr_outcome(&outcome);
            push_ocr_section(&mut artifact, relative, record.size, &outcome);
        } else {
            match fs::read_to_string(&record.path) {
                Ok(content) => {
                    push_text_section(&mut artifact, relative, record.size, Some(&content));
                }
                Err(e) => {
                    error!("error reading file {}: {}", record.path.display(), e);
                    push_text_section(&mut artifact, relative, record.size, None);
                }
            }
        }
    }

    if options.ocr_enabled && stats.total_ocr_files > 0 {
        push_ocr_summary(&mut artifact, &stats);
    }

    let output_name = options
        .output_name
        .clone()
        .unwrap_or_else(|| default_output_name(root));
    let summary = stats.to_summary(options.ocr_enabled);
    Ok(RunReport {
        artifact,
        output_name,
        summary,
    })
}
