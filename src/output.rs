//! Artifact assembly.
//!
//! The artifact layout is fixed: a statistics header, the annotated tree, one
//! section per included file, and an OCR summary when candidates were found.
//! Downstream consumers parse these blocks, so every literal here is part of
//! the output contract.

use crate::error::ScribeError;
use crate::ocr::{OcrOutcome, word_count};
use crate::types::RunStatistics;
use chrono::Local;
use std::fs;
use std::path::Path;

const SEPARATOR: &str = "\n-------- [ Separator ] ------\n";

/// Formats a byte count the way the artifact reports sizes.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Derives the default artifact file name from the root folder name, the
/// current local date, and a Unix timestamp.
pub(crate) fn default_output_name(root: &Path) -> String {
    let folder = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let now = Local::now();
    format!("{}_{}_{}.txt", folder, now.format("%m%d%Y"), now.timestamp())
}

pub(crate) fn push_header(out: &mut String, stats: &RunStatistics, ocr_enabled: bool) {
    out.push_str("Project Overview\n===============\n\n");
    out.push_str("Project Statistics:\n");
    out.push_str(&format!("Total Files: {}\n", stats.total_files));
    out.push_str(&format!("Total Size: {}\n", format_size(stats.total_size)));
    if ocr_enabled && stats.total_ocr_files > 0 {
        out.push_str(&format!("OCR-Processed Files: {}\n", stats.total_ocr_files));
    }
    out.push('\n');

    out.push_str("File Types:\n");
    for (ext, count) in stats.file_types_by_count() {
        let label = if ext.is_empty() { "no extension" } else { ext };
        out.push_str(&format!("  {label}: {count} files\n"));
    }

    out.push_str("\nDetected Technologies:\n");
    for tech in &stats.technologies {
        out.push_str(&format!("  - {tech}\n"));
    }
}

pub(crate) fn push_tree_block(out: &mut String, tree: &str) {
    out.push_str("\nFolder Structure (Tree)\n=====================\n");
    out.push_str("Legend: ✓ = Text file, 📄 = OCR-processed file, ✗ = Excluded from output\n\n");
    out.push_str(tree);
    out.push_str("\n==============\n");
}

/// Appends a plain-text file section. `content` is `None` when the file
/// could not be read; the section header stays, the content is omitted.
pub(crate) fn push_text_section(out: &mut String, relative: &Path, size: u64, content: Option<&str>) {
    out.push_str(&format!("\nFile Name: {}\n", relative.display()));
    out.push_str(&format!("Size: {}\n", format_size(size)));
    out.push_str("Code:\n");
    if let Some(content) = content {
        out.push_str(content);
    }
    out.push_str(SEPARATOR);
}

pub(crate) fn push_ocr_section(out: &mut String, relative: &Path, size: u64, outcome: &OcrOutcome) {
    out.push_str(&format!("\nFile Name: {}\n", relative.display()));
    out.push_str(&format!("Size: {}\n", format_size(size)));
    out.push_str(&format!("Processing Method: {}\n", outcome.method));
    out.push_str(&format!("OCR Confidence: {}%\n", outcome.confidence));
    out.push_str(&format!(
        "Extracted Text Length: {} characters\n",
        outcome.text.chars().count()
    ));
    out.push_str(&format!("Word Count: {} words\n", word_count(&outcome.text)));
    if let Some(pages) = outcome.metadata.pages {
        out.push_str(&format!("Total Pages: {pages}\n"));
    }
    if let Some(processed) = outcome.metadata.processed_pages {
        out.push_str(&format!("Processed Pages: {processed}\n"));
    }
    out.push_str("Extracted Content:\n");
    if outcome.text.is_empty() {
        out.push_str("[No text extracted]");
    } else {
        out.push_str(&outcome.text);
    }
    out.push_str(SEPARATOR);
}

pub(crate) fn push_ocr_summary(out: &mut String, stats: &RunStatistics) {
    let ocr = stats.ocr_stats();
    out.push_str("\n\nOCR Processing Summary\n=====================\n");
    out.push_str(&format!("Total OCR Files: {}\n", ocr.total_ocr_files));
    out.push_str(&format!("Successfully Processed: {}\n", ocr.successful_ocr));
    out.push_str(&format!("Failed Processing: {}\n", ocr.failed_ocr));
    out.push_str(&format!("Average Confidence: {}%\n", ocr.average_confidence));
    out.push_str(&format!(
        "Total Text Extracted: {} characters\n",
        format_size(ocr.total_text_extracted as u64)
    ));
}

/// Writes the assembled artifact to a file.
pub fn write_artifact(path: impl AsRef<Path>, artifact: &str) -> Result<(), ScribeError> {
    fs::write(&path, artifact).map_err(|e| ScribeError::io(path.as_ref(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{METHOD_OCR, METHOD_PDF_TEXT, OcrMetadata, OcrOutcome};

    #[test]
    fn sizes_format_in_three_tiers() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
    }

    #[test]
    fn default_name_carries_folder_date_and_timestamp() {
        let name = default_output_name(Path::new("/projects/demo"));
        assert!(name.starts_with("demo_"));
        assert!(name.ends_with(".txt"));
        let stem = name.trim_end_matches(".txt");
        let parts: Vec<&str> = stem.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn header_lists_types_and_technologies() {
        let mut stats = RunStatistics::default();
        stats.record_file(Path::new("a.js"), 100, false);
        stats.record_file(Path::new("b.js"), 100, false);
        stats.record_file(Path::new("main.rs"), 1024, false);

        let mut out = String::new();
        push_header(&mut out, &stats, true);
        assert_eq!(
            out,
            "Project Overview\n===============\n\n\
             Project Statistics:\n\
             Total Files: 3\n\
             Total Size: 1.20 KB\n\n\
             File Types:\n\
             \x20 .js: 2 files\n\
             \x20 .rs: 1 files\n\n\
             Detected Technologies:\n\
             \x20 - Rust\n"
        );
    }

    #[test]
    fn header_counts_ocr_files_only_when_enabled() {
        let mut stats = RunStatistics::default();
        stats.record_file(Path::new("scan.png"), 10, true);

        let mut enabled = String::new();
        push_header(&mut enabled, &stats, true);
        assert!(enabled.contains("OCR-Processed Files: 1\n"));

        let mut disabled = String::new();
        push_header(&mut disabled, &stats, false);
        assert!(!disabled.contains("OCR-Processed Files"));
    }

    #[test]
    fn files_without_extension_are_labelled() {
        let mut stats = RunStatistics::default();
        stats.record_file(Path::new("Makefile"), 10, false);
        let mut out = String::new();
        push_header(&mut out, &stats, true);
        assert!(out.contains("  no extension: 1 files\n"));
    }

    #[test]
    fn tree_block_wraps_tree_with_legend_and_rule() {
        let mut out = String::new();
        push_tree_block(&mut out, "└── a.js (5 B) ✓\n");
        assert_eq!(
            out,
            "\nFolder Structure (Tree)\n=====================\n\
             Legend: ✓ = Text file, 📄 = OCR-processed file, ✗ = Excluded from output\n\n\
             └── a.js (5 B) ✓\n\
             \n==============\n"
        );
    }

    #[test]
    fn text_section_embeds_content() {
        let mut out = String::new();
        push_text_section(&mut out, Path::new("src/a.js"), 5, Some("hello"));
        assert_eq!(
            out,
            "\nFile Name: src/a.js\nSize: 5 B\nCode:\nhello\n-------- [ Separator ] ------\n"
        );
    }

    #[test]
    fn unreadable_text_section_keeps_header_only() {
        let mut out = String::new();
        push_text_section(&mut out, Path::new("a.js"), 5, None);
        assert_eq!(
            out,
            "\nFile Name: a.js\nSize: 5 B\nCode:\n\n-------- [ Separator ] ------\n"
        );
    }

    #[test]
    fn ocr_section_reports_method_confidence_and_counts() {
        let outcome = OcrOutcome {
            text: "HELLO WORLD".to_string(),
            confidence: 92,
            method: METHOD_OCR,
            metadata: OcrMetadata::stamped(),
        };
        let mut out = String::new();
        push_ocr_section(&mut out, Path::new("scan.png"), 2048, &outcome);
        assert_eq!(
            out,
            "\nFile Name: scan.png\nSize: 2.00 KB\n\
             Processing Method: OCR (Tesseract)\n\
             OCR Confidence: 92%\n\
             Extracted Text Length: 11 characters\n\
             Word Count: 2 words\n\
             Extracted Content:\nHELLO WORLD\n-------- [ Separator ] ------\n"
        );
    }

    #[test]
    fn ocr_section_shows_pages_when_present() {
        let outcome = OcrOutcome {
            text: "digital text".to_string(),
            confidence: 100,
            method: METHOD_PDF_TEXT,
            metadata: OcrMetadata {
                pages: Some(3),
                ..OcrMetadata::stamped()
            },
        };
        let mut out = String::new();
        push_ocr_section(&mut out, Path::new("doc.pdf"), 100, &outcome);
        assert!(out.contains("Total Pages: 3\n"));
        assert!(!out.contains("Processed Pages"));
    }

    #[test]
    fn empty_extraction_shows_placeholder() {
        let outcome = OcrOutcome {
            text: String::new(),
            confidence: 0,
            method: METHOD_OCR,
            metadata: OcrMetadata::stamped(),
        };
        let mut out = String::new();
        push_ocr_section(&mut out, Path::new("blank.png"), 1, &outcome);
        assert!(out.contains("Extracted Content:\n[No text extracted]\n"));
    }

    #[test]
    fn summary_block_reports_counters() {
        let mut stats = RunStatistics::default();
        stats.record_file(Path::new("a.png"), 10, true);
        stats.record_file(Path::new("b.png"), 10, true);
        stats.record_ocr_outcome(&OcrOutcome {
            text: "ten chars!".to_string(),
            confidence: 90,
            method: METHOD_OCR,
            metadata: OcrMetadata::stamped(),
        });
        stats.record_ocr_outcome(&OcrOutcome::failure(
            String::new(),
            crate::ocr::METHOD_OCR_FAILED,
            "boom".to_string(),
        ));

        let mut out = String::new();
        push_ocr_summary(&mut out, &stats);
        assert_eq!(
            out,
            "\n\nOCR Processing Summary\n=====================\n\
             Total OCR Files: 2\n\
             Successfully Processed: 1\n\
             Failed Processing: 1\n\
             Average Confidence: 90%\n\
             Total Text Extracted: 10 B characters\n"
        );
    }
}
