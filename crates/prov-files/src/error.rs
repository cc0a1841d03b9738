use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Path {} has no usable file name", .0.display())]
    InvalidPath(PathBuf),
}
