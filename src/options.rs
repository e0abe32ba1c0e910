use crate::ocr::{DEFAULT_MAX_PDF_PAGES, DEFAULT_PDF_TEXT_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScribeOptions {
    pub root: PathBuf,
    pub output_name: Option<String>,
    pub extra_filter_patterns: Vec<String>,
    pub ocr_enabled: bool,
    pub pdf_text_threshold: usize,
    pub max_pdf_pages: usize,
}
impl Default for ScribeOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output_name: None,
            extra_filter_patterns: Vec::new(),
            ocr_enabled: true,
            pdf_text_threshold: DEFAULT_PDF_TEXT_THRESHOLD,
            max_pdf_pages: DEFAULT_MAX_PDF_PAGES,
        }
    }
}
#[derive(Debug, Default)]
pub struct ScribeBuilder {
    options: ScribeOptions,
}
impl ScribeBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: ScribeOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.options.output_name = Some(name.into());
        self
    }
    pub fn extra_filter_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.extra_filter_patterns = patterns;
        self
    }
    pub fn ocr_enabled(mut self, yes: bool) -> Self {
        self.options.ocr_enabled = yes;
        self
    }
    pub fn pdf_text_threshold(mut self, chars: usize) -> Self {
        self.options.pdf_text_threshold = chars;
        self
    }
    pub fn max_pdf_pages(mut self, pages: usize) -> Self {
        self.options.max_pdf_pages = pages;
        self
    }
    pub fn build(self) -> ScribeOptions {
        self.options
    }
}
