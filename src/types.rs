use crate::filter::file_extension;
use crate::ocr::OcrOutcome;
use crate::output::format_size;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A file queued for content extraction during one pipeline run.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// The full path to the file.
    pub path: PathBuf,
    /// The size of the file in bytes.
    pub size: u64,
    /// Lowercased extension with its leading dot, or empty when absent.
    pub extension: String,
    /// Whether the file is routed through the OCR pipeline.
    pub is_ocr_candidate: bool,
}

/// Run-scoped accumulator for traversal and extraction statistics.
///
/// Mutated incrementally while the pipeline runs; the average OCR confidence
/// is only computed when the report is assembled.
#[derive(Debug, Default)]
pub struct RunStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub file_types: BTreeMap<String, usize>,
    pub technologies: BTreeSet<&'static str>,
    pub total_ocr_files: usize,
    pub successful_ocr: usize,
    pub failed_ocr: usize,
    pub total_text_extracted: usize,
    confidence_sum: u32,
}

impl RunStatistics {
    pub(crate) fn record_file(&mut self, path: &Path, size: u64, ocr_candidate: bool) {
        let key = extension_key(path);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for marker in technology_markers(&key, &file_name) {
            self.technologies.insert(marker);
        }
        if ocr_candidate {
            self.technologies.insert("OCR Processing");
            self.total_ocr_files += 1;
        }
        *self.file_types.entry(key).or_insert(0) += 1;
        self.total_files += 1;
        self.total_size += size;
    }

    pub(crate) fn record_ocr_outcome(&mut self, outcome: &OcrOutcome) {
        if outcome.confidence > 0 {
            self.successful_ocr += 1;
            self.confidence_sum += u32::from(outcome.confidence);
        } else {
            self.failed_ocr += 1;
        }
        self.total_text_extracted += outcome.text.chars().count();
    }

    /// Rounded mean confidence over files that produced a confidence above
    /// zero, or 0 when no file did.
    pub fn average_confidence(&self) -> u8 {
        if self.successful_ocr == 0 {
            return 0;
        }
        (f64::from(self.confidence_sum) / self.successful_ocr as f64).round() as u8
    }

    /// File type counts sorted by descending count, ties alphabetical.
    pub(crate) fn file_types_by_count(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self
            .file_types
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    pub(crate) fn ocr_stats(&self) -> OcrRunStats {
        OcrRunStats {
            total_ocr_files: self.total_ocr_files,
            successful_ocr: self.successful_ocr,
            failed_ocr: self.failed_ocr,
            average_confidence: self.average_confidence(),
            total_text_extracted: self.total_text_extracted,
        }
    }

    pub(crate) fn to_summary(&self, ocr_enabled: bool) -> RunSummary {
        RunSummary {
            total_files: self.total_files,
            total_size: format_size(self.total_size),
            ocr: (ocr_enabled && self.total_ocr_files > 0).then(|| self.ocr_stats()),
        }
    }
}

/// Aggregate OCR counters for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrRunStats {
    pub total_ocr_files: usize,
    pub successful_ocr: usize,
    pub failed_ocr: usize,
    pub average_confidence: u8,
    /// Total extracted character count, including inline error messages.
    pub total_text_extracted: usize,
}

/// Condensed result of a run, handed to the boundary layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_files: usize,
    /// Human-readable total size, e.g. `3.52 KB`.
    pub total_size: String,
    /// Present only when OCR was enabled and candidates were found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrRunStats>,
}

/// The complete result of a pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// The assembled text artifact.
    pub artifact: String,
    /// The resolved output file name (caller-supplied or derived).
    pub output_name: String,
    pub summary: RunSummary,
}

/// Lowercased extension key with the leading dot, or empty for none.
pub(crate) fn extension_key(path: &Path) -> String {
    file_extension(path)
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

fn technology_markers(extension: &str, file_name: &str) -> Vec<&'static str> {
    let mut markers = Vec::new();
    match extension {
        ".ts" => markers.push("TypeScript"),
        ".tsx" => {
            markers.push("TypeScript");
            markers.push("React");
        }
        ".jsx" => markers.push("React"),
        ".vue" => markers.push("Vue.js"),
        ".py" => markers.push("Python"),
        ".php" => markers.push("PHP"),
        ".java" => markers.push("Java"),
        ".go" => markers.push("Go"),
        ".rs" => markers.push("Rust"),
        ".swift" => markers.push("Swift"),
        ".rb" => markers.push("Ruby"),
        ".c" | ".cpp" | ".cc" | ".cxx" => markers.push("C/C++"),
        ".cs" => markers.push("C#"),
        ".html" | ".htm" => markers.push("HTML"),
        ".css" | ".scss" | ".sass" | ".less" => markers.push("CSS"),
        _ => {}
    }
    match file_name {
        "package.json" => markers.push("Node.js"),
        "requirements.txt" => markers.push("Python"),
        "Gemfile" => markers.push("Ruby"),
        "composer.json" => markers.push("PHP"),
        _ => {}
    }
    markers
}
