use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid root {path}: not a directory")]
    InvalidRoot { path: PathBuf },
}
impl ScribeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScribeError::Io {
            path: path.into(),
            source,
        }
    }
}
