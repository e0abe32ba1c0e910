//! Path classification: traversal pruning, content exclusion, and OCR candidacy.
//!
//! Rules are compiled once into a [`FilterSet`] and evaluated against paths with
//! separators normalized to `/`. A pattern without a separator matches a whole
//! path segment; a pattern containing a separator matches as a contiguous
//! substring of the normalized path.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Classification of a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDecision {
    /// Prune the whole subtree; the entry is never listed or counted.
    TraverseSkip,
    /// List the file in the tree and statistics, but omit its content.
    ContentSkip,
    /// Read the file as UTF-8 text.
    IncludeText,
    /// Route the file through the OCR pipeline.
    IncludeOcr,
}

const SKIP_CONTENT_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    ".prettierrc",
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.json",
    ".babelrc",
    ".babelrc.js",
    ".babelrc.json",
    "tsconfig.json",
    "webpack.config.js",
    "jest.config.js",
    ".env",
    ".env.local",
    ".env.development",
    ".env.production",
    ".env.test",
    "composer.lock",
];

const SKIP_TRAVERSAL_PATTERNS: &[&str] = &[
    "node_modules",
    "vendor",
    ".git",
    ".idea",
    ".vscode",
    ".vs",
    "dist",
    "build",
    "coverage",
    "var/cache",
    "var/log",
    "var/sessions",
    "var/tmp",
    "public/bundles",
    "storage/app",
    "storage/framework/cache",
    "storage/framework/sessions",
    "storage/framework/testing",
    "storage/framework/views",
    "storage/logs",
    "bootstrap/cache",
    "public/storage",
    ".next",
    ".nuxt",
    "out",
    ".svelte-kit",
    ".angular",
    ".cache",
    ".parcel-cache",
    ".webpack",
    ".turbo",
    ".vite",
    "temp",
    "tmp",
    "cache",
    ".phpunit.cache",
    ".php-cs-fixer.cache",
    ".nyc_output",
    "cypress/videos",
    "cypress/screenshots",
    ".cypress-cache",
    "public/build",
    "public/hot",
    "public/css",
    "public/js",
    "public/mix-manifest.json",
];

/// Extensions handed to the OCR pipeline instead of the binary denylist.
const OCR_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", "pdf"];

const SKIP_CONTENT_EXTENSIONS: &[&str] = &[
    "svg", "ico", "psd", "ai", "eps", "raw", "xcf", "exe", "dll", "so", "dylib", "bin", "obj",
    "db", "sqlite", "sqlite3", "mdb", "zip", "tar", "gz", "7z", "rar", "doc", "docx", "xls",
    "xlsx", "ppt", "pptx", "ttf", "otf", "woff", "woff2", "mp4", "avi", "mov", "wmv", "flv",
    "mp3", "wav", "flac",
];

#[derive(Debug, Clone)]
enum PathRule {
    Segment(String),
    Fragment(String),
}

impl PathRule {
    fn compile(pattern: &str) -> Self {
        if pattern.contains('/') || pattern.contains('\\') {
            PathRule::Fragment(pattern.replace('\\', "/"))
        } else {
            PathRule::Segment(pattern.to_string())
        }
    }

    fn matches(&self, normalized: &str) -> bool {
        match self {
            PathRule::Segment(name) => normalized.split('/').any(|segment| segment == name),
            PathRule::Fragment(text) => normalized.contains(text.as_str()),
        }
    }
}

/// Precompiled classification rules for one pipeline run.
#[derive(Debug, Clone)]
pub struct FilterSet {
    traversal_rules: Vec<PathRule>,
}

impl FilterSet {
    /// Builds the built-in rule set with no extra patterns.
    pub fn new() -> Self {
        Self::with_extra_patterns(&[])
    }

    /// Builds the built-in rule set plus caller-supplied traversal patterns.
    ///
    /// Compilation is infallible; empty patterns are ignored.
    pub fn with_extra_patterns(extra: &[String]) -> Self {
        let traversal_rules = SKIP_TRAVERSAL_PATTERNS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .map(PathRule::compile)
            .collect();
        Self { traversal_rules }
    }

    /// Returns true if the subtree rooted at `path` must be pruned.
    ///
    /// `path` should be relative to the traversal root so that rules never
    /// match directories above it.
    pub fn skip_traversal(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.traversal_rules
            .iter()
            .any(|rule| rule.matches(&normalized))
    }

    /// Returns true if the file should be listed but its content excluded.
    ///
    /// OCR-capable files are never excluded here; images and PDFs are
    /// legitimately binary but still extractable.
    pub fn skip_content(&self, path: &Path) -> bool {
        if self.is_ocr_candidate(path) {
            return false;
        }
        if let Some(name) = path.file_name() {
            if SKIP_CONTENT_FILES.contains(&name.to_string_lossy().as_ref()) {
                return true;
            }
        }
        if let Some(ext) = file_extension(path) {
            if SKIP_CONTENT_EXTENSIONS.contains(&ext.as_str()) {
                return true;
            }
        }
        is_binary_file(path)
    }

    /// Returns true if the lowercased extension is in the OCR-capable set.
    pub fn is_ocr_candidate(&self, path: &Path) -> bool {
        file_extension(path).is_some_and(|ext| OCR_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Classifies a path. `relative` is the path as seen from the traversal
    /// root and is what the pruning rules are evaluated against.
    pub fn decide(&self, path: &Path, relative: &Path) -> PathDecision {
        if self.skip_traversal(relative) {
            PathDecision::TraverseSkip
        } else if self.skip_content(path) {
            PathDecision::ContentSkip
        } else if self.is_ocr_candidate(path) {
            PathDecision::IncludeOcr
        } else {
            PathDecision::IncludeText
        }
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn file_extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// Sniffs the first 512 bytes for a null byte. I/O failures are fail-open:
/// the file is treated as text and the error is logged.
fn is_binary_file(path: &Path) -> bool {
    let mut chunk = Vec::with_capacity(512);
    match File::open(path).and_then(|file| file.take(512).read_to_end(&mut chunk)) {
        Ok(_) => chunk.contains(&0),
        Err(e) => {
            warn!("binary sniff failed for {}: {}", path.display(), e);
            false
        }
    }
}
