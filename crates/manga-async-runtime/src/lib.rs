use image::DynamicImage;
use std::sync::Arc;
use thiserror::Error;

mod controller;
mod external;
mod pipeline;
mod worker;

pub use controller::{LOOKUP_POLL_INTERVAL, LookupController};
pub use external::{CommandDictionary, TesseractCli, build_command};
pub use pipeline::*;
pub use worker::worker_task;

// Re-export types from library crates
pub use manga_reader::{ScaleFilter, SourceCrop};
pub use tokio_util::sync::CancellationToken;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Recognition failed: {0}")]
    Recognition(String),
    #[error("Dictionary lookup failed: {0}")]
    Dictionary(String),
    #[error("{0} was cancelled")]
    Cancelled(String),
    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },
    #[error("Invalid command template: {0}")]
    Template(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, LookupError>;

/// Identifier of one selection; results of older generations are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum LookupCommand {
    Start {
        generation: Generation,
        image: Arc<DynamicImage>,
        crop: SourceCrop,
        cancel: CancellationToken,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone, PartialEq)]
pub enum LookupUpdate {
    /// Interim text shown while the dictionary runs
    Progress {
        generation: Generation,
        message: String,
    },
    /// Escape-coded overlay text
    Finished {
        generation: Generation,
        annotation: String,
    },
    Failed {
        generation: Generation,
        message: String,
    },
}

impl LookupUpdate {
    pub fn generation(&self) -> Generation {
        match self {
            LookupUpdate::Progress { generation, .. }
            | LookupUpdate::Finished { generation, .. }
            | LookupUpdate::Failed { generation, .. } => *generation,
        }
    }

    /// The lookup is over after this update
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LookupUpdate::Progress { .. })
    }
}
