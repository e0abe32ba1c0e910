//! OCR extraction for images and PDFs.
//!
//! PDFs go through a text-extraction-first strategy: the native text layer is
//! tried before any rasterization, and only visibly scanned documents are
//! routed page by page through the recognition backend. The `pdf_extract`
//! call is wrapped in `catch_unwind` since it can panic on malformed fonts.
//!
//! Recognition and rasterization sit behind the [`Recognizer`] and
//! [`Rasterizer`] traits. Native backends are compiled in with the
//! `tesseract` and `pdfium` features; without them the engine reports itself
//! unavailable and every candidate takes the documented failure path.

use crate::filter::file_extension;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Character count a trimmed PDF text layer must exceed to be trusted
/// directly. Thin layers (page numbers, prior OCR runs) fall through to
/// rasterization.
pub const DEFAULT_PDF_TEXT_THRESHOLD: usize = 50;
/// Pages processed per PDF at most; later pages are silently omitted.
pub const DEFAULT_MAX_PDF_PAGES: usize = 20;

/// A rasterized page must yield more than this many characters to count.
const MIN_PAGE_TEXT_CHARS: usize = 10;
const CONTRAST_BOOST: f32 = 30.0;
#[cfg(feature = "pdfium")]
const PAGE_RENDER_WIDTH: i32 = 2480;
#[cfg(feature = "pdfium")]
const PAGE_RENDER_HEIGHT: i32 = 3508;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

// Method labels surfaced in per-file artifact sections.
pub const METHOD_OCR: &str = "OCR (Tesseract)";
pub const METHOD_OCR_FAILED: &str = "OCR (Failed)";
pub const METHOD_PDF_TEXT: &str = "PDF Text Extraction";
pub const METHOD_PDF_OCR: &str = "PDF OCR (Tesseract)";
pub const METHOD_PDF_FAILED: &str = "PDF Processing (Failed)";
pub const METHOD_PDF_OCR_FAILED: &str = "PDF OCR (Failed)";

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("unsupported file type for OCR: {0}")]
    Unsupported(PathBuf),
    #[error("recognition backend not available: {0}")]
    RecognizerUnavailable(String),
    #[error("PDF rasterization not available: {0}")]
    RasterizerUnavailable(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("image preprocessing failed: {0}")]
    Preprocess(String),
    #[error("recognition failed: {0}")]
    Recognition(String),
    #[error("page rasterization failed: {0}")]
    Rasterization(String),
    #[error("PDF parsing failed: {0}")]
    Pdf(String),
}
impl OcrError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OcrError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Raw output of a recognition backend for one image.
#[derive(Debug, Clone)]
pub struct Recognition {
    pub text: String,
    /// Engine-reported confidence, nominally 0-100.
    pub confidence: f32,
}

/// Result of extracting one image or PDF.
///
/// Confidence 0 is the failure sentinel regardless of the text returned;
/// failure outcomes carry the error message inline as their text.
#[derive(Debug, Clone)]
pub struct OcrOutcome {
    pub text: String,
    /// Rounded confidence in 0-100.
    pub confidence: u8,
    pub method: &'static str,
    pub metadata: OcrMetadata,
}

impl OcrOutcome {
    pub(crate) fn failure(text: String, method: &'static str, error: String) -> Self {
        Self {
            text,
            confidence: 0,
            method,
            metadata: OcrMetadata {
                error: Some(error),
                ..OcrMetadata::stamped()
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct OcrMetadata {
    /// Page count of a PDF whose text layer was extracted directly.
    pub pages: Option<usize>,
    /// Pages that yielded usable text during rasterized OCR.
    pub processed_pages: Option<usize>,
    pub error: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl OcrMetadata {
    pub(crate) fn stamped() -> Self {
        Self {
            pages: None,
            processed_pages: None,
            error: None,
            processed_at: Utc::now(),
        }
    }
}

/// Lifecycle of the recognition backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

/// Converts one image file into text with a confidence score.
pub trait Recognizer {
    fn recognize(&mut self, image: &Path) -> Result<Recognition, OcrError>;
    /// Releases backend resources. Called at most once, from engine shutdown.
    fn shutdown(&mut self) {}
}

/// Renders one PDF page to an image file inside `dir` and returns its path.
/// Pages are numbered from 1.
pub trait Rasterizer {
    fn rasterize_page(&self, pdf: &Path, page: usize, dir: &Path) -> Result<PathBuf, OcrError>;
}

/// One OCR engine instance per pipeline run, owned by the run driver.
///
/// The engine is lazily initialized; extraction calls re-attempt
/// initialization transparently when the backend is unavailable, and failures
/// are reported as outcomes rather than aborting the run.
pub struct OcrEngine {
    state: EngineState,
    recognizer: Option<Box<dyn Recognizer>>,
    rasterizer: Box<dyn Rasterizer>,
    pdf_text_threshold: usize,
    max_pdf_pages: usize,
}

impl OcrEngine {
    /// Creates an engine backed by the compiled-in native backends.
    pub fn new() -> Self {
        Self {
            state: EngineState::Uninitialized,
            recognizer: None,
            rasterizer: default_rasterizer(),
            pdf_text_threshold: DEFAULT_PDF_TEXT_THRESHOLD,
            max_pdf_pages: DEFAULT_MAX_PDF_PAGES,
        }
    }

    /// Creates an engine with injected backends, ready for use immediately.
    pub fn with_backends(recognizer: Box<dyn Recognizer>, rasterizer: Box<dyn Rasterizer>) -> Self {
        Self {
            state: EngineState::Ready,
            recognizer: Some(recognizer),
            rasterizer,
            pdf_text_threshold: DEFAULT_PDF_TEXT_THRESHOLD,
            max_pdf_pages: DEFAULT_MAX_PDF_PAGES,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn set_pdf_limits(&mut self, text_threshold: usize, max_pages: usize) {
        self.pdf_text_threshold = text_threshold;
        self.max_pdf_pages = max_pages;
    }

    /// Idempotently initializes the recognition backend. A no-op while an
    /// initialization is already in flight or the engine is ready.
    pub fn initialize(&mut self) -> Result<(), OcrError> {
        match self.state {
            EngineState::Ready | EngineState::Initializing => Ok(()),
            EngineState::Uninitialized | EngineState::Failed => {
                self.state = EngineState::Initializing;
                match default_recognizer() {
                    Ok(recognizer) => {
                        self.recognizer = Some(recognizer);
                        self.state = EngineState::Ready;
                        debug!("OCR engine initialized");
                        Ok(())
                    }
                    Err(e) => {
                        self.state = EngineState::Failed;
                        error!("OCR engine initialization failed: {}", e);
                        Err(e)
                    }
                }
            }
        }
    }

    /// Releases the recognition backend. Safe to call when the engine was
    /// never initialized.
    pub fn shutdown(&mut self) {
        if let Some(mut recognizer) = self.recognizer.take() {
            recognizer.shutdown();
        }
        self.state = EngineState::Uninitialized;
    }

    /// Extracts text from an image or PDF.
    ///
    /// Extraction failures are encoded in the returned [`OcrOutcome`] with
    /// confidence 0 and a `Failed` method label. The only error is a path
    /// that is neither a recognized image nor a PDF.
    pub fn extract_text(&mut self, path: &Path) -> Result<OcrOutcome, OcrError> {
        if is_image(path) {
            Ok(self.extract_from_image(path))
        } else if is_pdf(path) {
            Ok(self.extract_from_pdf(path))
        } else {
            Err(OcrError::Unsupported(path.to_path_buf()))
        }
    }

    fn ensure_ready(&mut self) -> Result<(), OcrError> {
        match self.state {
            EngineState::Ready => Ok(()),
            EngineState::Initializing => Err(OcrError::RecognizerUnavailable(
                "initialization already in progress".to_string(),
            )),
            EngineState::Uninitialized | EngineState::Failed => self.initialize(),
        }
    }

    fn extract_from_image(&mut self, path: &Path) -> OcrOutcome {
        debug!("processing image {}", path.display());
        match self.recognize_image(path) {
            Ok(recognition) => OcrOutcome {
                confidence: clamp_confidence(recognition.confidence),
                text: recognition.text,
                method: METHOD_OCR,
                metadata: OcrMetadata::stamped(),
            },
            Err(e) => {
                error!("OCR failed for {}: {}", path.display(), e);
                OcrOutcome::failure(format!("[OCR Error: {e}]"), METHOD_OCR_FAILED, e.to_string())
            }
        }
    }

    /// Preprocesses, recognizes, and cleans up the temporary image. The
    /// temporary file is removed on success and failure alike.
    fn recognize_image(&mut self, path: &Path) -> Result<Recognition, OcrError> {
        self.ensure_ready()?;
        let processed = preprocess_image(path);
        let recognizer = self
            .recognizer
            .as_mut()
            .ok_or_else(|| OcrError::RecognizerUnavailable("engine not initialized".to_string()))?;
        let result = recognizer.recognize(&processed);
        if processed != path {
            if let Err(e) = fs::remove_file(&processed) {
                debug!("failed to remove temp image {}: {}", processed.display(), e);
            }
        }
        let recognition = result?;
        Ok(Recognition {
            text: recognition.text.trim().to_string(),
            confidence: recognition.confidence,
        })
    }

    fn extract_from_pdf(&mut self, path: &Path) -> OcrOutcome {
        debug!("processing PDF {}", path.display());
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let e = OcrError::io(path, e);
                error!("PDF processing failed for {}: {}", path.display(), e);
                return OcrOutcome::failure(
                    format!("[PDF Processing Error: {e}]"),
                    METHOD_PDF_FAILED,
                    e.to_string(),
                );
            }
        };
        if let Some(text) = extract_pdf_text(&bytes) {
            let trimmed = text.trim();
            if trimmed.chars().count() > self.pdf_text_threshold {
                return OcrOutcome {
                    text: trimmed.to_string(),
                    confidence: 100,
                    method: METHOD_PDF_TEXT,
                    metadata: OcrMetadata {
                        pages: count_pdf_pages(&bytes).ok().filter(|n| *n > 0),
                        ..OcrMetadata::stamped()
                    },
                };
            }
        }
        self.extract_from_scanned_pdf(path, &bytes)
    }

    fn extract_from_scanned_pdf(&mut self, path: &Path, bytes: &[u8]) -> OcrOutcome {
        debug!("performing OCR on scanned PDF {}", path.display());
        let total_pages = match count_pdf_pages(bytes) {
            Ok(n) => n,
            Err(e) => {
                error!("PDF OCR failed for {}: {}", path.display(), e);
                return OcrOutcome::failure(
                    format!("[PDF OCR Error: {e}]"),
                    METHOD_PDF_OCR_FAILED,
                    e.to_string(),
                );
            }
        };
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut all_text = String::new();
        let mut confidence_sum: u32 = 0;
        let mut processed_pages: usize = 0;
        for page in 1..=total_pages.min(self.max_pdf_pages) {
            match self.process_pdf_page(path, page, dir) {
                Ok(recognition) => {
                    if recognition.text.chars().count() > MIN_PAGE_TEXT_CHARS {
                        all_text.push_str(&format!("\n--- Page {} ---\n{}\n", page, recognition.text));
                        confidence_sum += u32::from(clamp_confidence(recognition.confidence));
                        processed_pages += 1;
                    }
                }
                Err(e) => {
                    warn!("failed to process page {} of {}: {}", page, path.display(), e);
                }
            }
        }

        let confidence = if processed_pages > 0 {
            (f64::from(confidence_sum) / processed_pages as f64).round() as u8
        } else {
            0
        };
        OcrOutcome {
            text: all_text.trim().to_string(),
            confidence,
            method: METHOD_PDF_OCR,
            metadata: OcrMetadata {
                processed_pages: (processed_pages > 0).then_some(processed_pages),
                ..OcrMetadata::stamped()
            },
        }
    }

    /// Rasterizes and recognizes one page. The page image is removed before
    /// returning, whether or not recognition succeeded.
    fn process_pdf_page(&mut self, pdf: &Path, page: usize, dir: &Path) -> Result<Recognition, OcrError> {
        let image_path = self.rasterizer.rasterize_page(pdf, page, dir)?;
        let recognition = self.recognize_image(&image_path);
        if let Err(e) = fs::remove_file(&image_path) {
            debug!("failed to remove page image {}: {}", image_path.display(), e);
        }
        recognition
    }
}

impl Default for OcrEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn is_image(path: &Path) -> bool {
    file_extension(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn is_pdf(path: &Path) -> bool {
    file_extension(path).is_some_and(|ext| ext == "pdf")
}

/// Whitespace-separated token count of extracted text.
pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn clamp_confidence(raw: f32) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Greyscale, contrast boost, and level normalization into a sibling
/// `temp_`-prefixed file. Falls back to the original path when anything goes
/// wrong; the caller never sees preprocessing errors.
fn preprocess_image(path: &Path) -> PathBuf {
    match try_preprocess(path) {
        Ok(temp) => temp,
        Err(e) => {
            warn!("image preprocessing failed for {}: {}", path.display(), e);
            path.to_path_buf()
        }
    }
}

fn try_preprocess(path: &Path) -> Result<PathBuf, OcrError> {
    let img = image::open(path).map_err(|e| OcrError::Preprocess(e.to_string()))?;
    let mut gray = img.grayscale().adjust_contrast(CONTRAST_BOOST).to_luma8();
    normalize_levels(&mut gray);
    let file_name = path
        .file_name()
        .ok_or_else(|| OcrError::Preprocess("path has no file name".to_string()))?;
    let mut temp_name = std::ffi::OsString::from("temp_");
    temp_name.push(file_name);
    let temp = path.with_file_name(temp_name);
    gray.save(&temp).map_err(|e| OcrError::Preprocess(e.to_string()))?;
    Ok(temp)
}

/// Min-max stretch of the value range to 0-255.
fn normalize_levels(image: &mut image::GrayImage) {
    let (mut min, mut max) = (u8::MAX, u8::MIN);
    for pixel in image.pixels() {
        min = min.min(pixel[0]);
        max = max.max(pixel[0]);
    }
    if min >= max {
        return;
    }
    let range = f32::from(max - min);
    for pixel in image.pixels_mut() {
        pixel[0] = ((f32::from(pixel[0] - min) / range) * 255.0).round() as u8;
    }
}

/// Direct text-layer extraction. `pdf_extract` can panic on malformed fonts,
/// so the call runs under `catch_unwind`; both errors and panics collapse to
/// `None` and route the document to the scanned path.
fn extract_pdf_text(bytes: &[u8]) -> Option<String> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    })) {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            debug!("direct PDF text extraction failed: {}", e);
            None
        }
        Err(_panic) => {
            warn!("PDF text extraction panicked, treating document as scanned");
            None
        }
    }
}

fn count_pdf_pages(bytes: &[u8]) -> Result<usize, OcrError> {
    let document = lopdf::Document::load_mem(bytes).map_err(|e| OcrError::Pdf(e.to_string()))?;
    Ok(document.get_pages().len())
}

#[cfg(feature = "tesseract")]
pub struct TesseractRecognizer {
    engine: leptess::LepTess,
}

#[cfg(feature = "tesseract")]
impl TesseractRecognizer {
    pub fn new() -> Result<Self, OcrError> {
        let engine = leptess::LepTess::new(None, "eng")
            .map_err(|e| OcrError::RecognizerUnavailable(e.to_string()))?;
        Ok(Self { engine })
    }
}

#[cfg(feature = "tesseract")]
impl Recognizer for TesseractRecognizer {
    fn recognize(&mut self, image: &Path) -> Result<Recognition, OcrError> {
        self.engine
            .set_image(image)
            .map_err(|e| OcrError::Recognition(e.to_string()))?;
        let text = self
            .engine
            .get_utf8_text()
            .map_err(|e| OcrError::Recognition(e.to_string()))?;
        let confidence = self.engine.mean_text_conf();
        Ok(Recognition {
            text,
            confidence: confidence as f32,
        })
    }
}

#[cfg(feature = "tesseract")]
fn default_recognizer() -> Result<Box<dyn Recognizer>, OcrError> {
    Ok(Box::new(TesseractRecognizer::new()?))
}

#[cfg(not(feature = "tesseract"))]
fn default_recognizer() -> Result<Box<dyn Recognizer>, OcrError> {
    Err(OcrError::RecognizerUnavailable(
        "built without the `tesseract` feature".to_string(),
    ))
}

/// Renders pages at a 300 DPI-equivalent A4 resolution via the system pdfium
/// library.
#[cfg(feature = "pdfium")]
pub struct PdfiumRasterizer;

#[cfg(feature = "pdfium")]
impl Rasterizer for PdfiumRasterizer {
    fn rasterize_page(&self, pdf: &Path, page: usize, dir: &Path) -> Result<PathBuf, OcrError> {
        use pdfium_render::prelude::*;

        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| OcrError::RasterizerUnavailable(e.to_string()))?;
        let pdfium = Pdfium::new(bindings);
        let document = pdfium
            .load_pdf_from_file(pdf, None)
            .map_err(|e| OcrError::Rasterization(e.to_string()))?;
        let page_index = u16::try_from(page - 1)
            .map_err(|_| OcrError::Rasterization(format!("page {page} out of index range")))?;
        let pdf_page = document
            .pages()
            .get(page_index)
            .map_err(|e| OcrError::Rasterization(e.to_string()))?;
        let config = PdfRenderConfig::new()
            .set_target_width(PAGE_RENDER_WIDTH)
            .set_target_height(PAGE_RENDER_HEIGHT);
        let bitmap = pdf_page
            .render_with_config(&config)
            .map_err(|e| OcrError::Rasterization(e.to_string()))?;
        let out = dir.join(format!("page.{page}.png"));
        bitmap
            .as_image()
            .save(&out)
            .map_err(|e| OcrError::Rasterization(e.to_string()))?;
        Ok(out)
    }
}

#[cfg(not(feature = "pdfium"))]
struct UnavailableRasterizer;

#[cfg(not(feature = "pdfium"))]
impl Rasterizer for UnavailableRasterizer {
    fn rasterize_page(&self, _pdf: &Path, _page: usize, _dir: &Path) -> Result<PathBuf, OcrError> {
        Err(OcrError::RasterizerUnavailable(
            "built without the `pdfium` feature".to_string(),
        ))
    }
}

#[cfg(feature = "pdfium")]
fn default_rasterizer() -> Box<dyn Rasterizer> {
    Box::new(PdfiumRasterizer)
}

#[cfg(not(feature = "pdfium"))]
fn default_rasterizer() -> Box<dyn Rasterizer> {
    Box::new(UnavailableRasterizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    struct StaticRecognizer {
        text: &'static str,
        confidence: f32,
    }
    impl Recognizer for StaticRecognizer {
        fn recognize(&mut self, _image: &Path) -> Result<Recognition, OcrError> {
            Ok(Recognition {
                text: self.text.to_string(),
                confidence: self.confidence,
            })
        }
    }

    struct FailingRecognizer;
    impl Recognizer for FailingRecognizer {
        fn recognize(&mut self, _image: &Path) -> Result<Recognition, OcrError> {
            Err(OcrError::Recognition("lens cap on".to_string()))
        }
    }

    struct DeadRasterizer;
    impl Rasterizer for DeadRasterizer {
        fn rasterize_page(&self, _pdf: &Path, _page: usize, _dir: &Path) -> Result<PathBuf, OcrError> {
            Err(OcrError::Rasterization("no backend".to_string()))
        }
    }

    fn static_engine(text: &'static str, confidence: f32) -> OcrEngine {
        OcrEngine::with_backends(
            Box::new(StaticRecognizer { text, confidence }),
            Box::new(DeadRasterizer),
        )
    }

    #[test]
    fn confidence_is_clamped_and_rounded() {
        assert_eq!(clamp_confidence(92.4), 92);
        assert_eq!(clamp_confidence(92.6), 93);
        assert_eq!(clamp_confidence(-5.0), 0);
        assert_eq!(clamp_confidence(150.0), 100);
        assert_eq!(clamp_confidence(f32::NAN), 0);
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(word_count("hello  world\n"), 2);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn normalize_levels_stretches_range() {
        let mut gray = image::GrayImage::from_raw(2, 1, vec![100, 200]).unwrap();
        normalize_levels(&mut gray);
        assert_eq!(gray.get_pixel(0, 0)[0], 0);
        assert_eq!(gray.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn normalize_levels_leaves_flat_images_alone() {
        let mut gray = image::GrayImage::from_raw(2, 1, vec![80, 80]).unwrap();
        normalize_levels(&mut gray);
        assert_eq!(gray.get_pixel(0, 0)[0], 80);
    }

    #[test]
    fn preprocess_falls_back_to_original_on_failure() {
        let missing = Path::new("/no/such/image.png");
        assert_eq!(preprocess_image(missing), missing.to_path_buf());
    }

    #[test]
    fn preprocess_writes_sibling_temp_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("photo.png");
        image::RgbImage::from_pixel(8, 8, image::Rgb([90, 120, 150]))
            .save(&source)
            .unwrap();
        let temp = preprocess_image(&source);
        assert_eq!(temp, dir.path().join("temp_photo.png"));
        assert!(temp.exists());
    }

    #[test]
    fn engine_states_follow_lifecycle() {
        let engine = OcrEngine::new();
        assert_eq!(engine.state(), EngineState::Uninitialized);

        let mut engine = static_engine("x", 1.0);
        assert_eq!(engine.state(), EngineState::Ready);
        engine.shutdown();
        assert_eq!(engine.state(), EngineState::Uninitialized);
        engine.shutdown();
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[cfg(not(feature = "tesseract"))]
    #[test]
    fn initialization_without_backend_fails() {
        let mut engine = OcrEngine::new();
        assert!(engine.initialize().is_err());
        assert_eq!(engine.state(), EngineState::Failed);
        engine.shutdown();
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[test]
    fn unsupported_paths_are_rejected() {
        let mut engine = static_engine("x", 1.0);
        let err = engine.extract_text(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, OcrError::Unsupported(_)));
    }

    #[test]
    fn image_extraction_trims_and_rounds() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("scan.png");
        image::RgbImage::from_pixel(8, 8, image::Rgb([10, 20, 30]))
            .save(&source)
            .unwrap();
        let mut engine = static_engine("  RECEIPT TOTAL 12.50  ", 87.6);
        let outcome = engine.extract_text(&source).unwrap();
        assert_eq!(outcome.method, METHOD_OCR);
        assert_eq!(outcome.text, "RECEIPT TOTAL 12.50");
        assert_eq!(outcome.confidence, 88);
        assert!(!dir.path().join("temp_scan.png").exists());
    }

    #[test]
    fn image_recognition_failure_becomes_failure_outcome() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("scan.png");
        fs::write(&source, b"not an image").unwrap();
        let mut engine =
            OcrEngine::with_backends(Box::new(FailingRecognizer), Box::new(DeadRasterizer));
        let outcome = engine.extract_text(&source).unwrap();
        assert_eq!(outcome.method, METHOD_OCR_FAILED);
        assert_eq!(outcome.confidence, 0);
        assert!(outcome.text.starts_with("[OCR Error:"));
        assert!(outcome.metadata.error.is_some());
    }

    #[test]
    fn missing_pdf_reports_processing_failure() {
        let mut engine = static_engine("x", 1.0);
        let outcome = engine
            .extract_text(Path::new("/no/such/doc.pdf"))
            .unwrap();
        assert_eq!(outcome.method, METHOD_PDF_FAILED);
        assert_eq!(outcome.confidence, 0);
        assert!(outcome.text.starts_with("[PDF Processing Error:"));
    }

    #[test]
    fn garbage_pdf_reports_ocr_failure() {
        let dir = tempdir().unwrap();
        let pdf = dir.path().join("broken.pdf");
        fs::write(&pdf, b"not a pdf at all").unwrap();
        let mut engine = static_engine("x", 1.0);
        let outcome = engine.extract_text(&pdf).unwrap();
        assert_eq!(outcome.method, METHOD_PDF_OCR_FAILED);
        assert_eq!(outcome.confidence, 0);
        assert!(outcome.text.starts_with("[PDF OCR Error:"));
    }
}
