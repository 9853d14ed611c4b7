use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported file type: {}", .0.display())]
    Unsupported(PathBuf),
    #[error("No images found in {}", .0.display())]
    Empty(PathBuf),
    #[error("Page not found in archive: {0}")]
    MissingPage(String),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Rar error: {0}")]
    Rar(String),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Container formats recognized by content sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Directory,
    Zip,
    Rar,
    Tar,
    /// Tar compressed with gzip (`.tar.gz`, `.tgz`)
    GzipTar,
}
