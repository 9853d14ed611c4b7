//! Last read page per archive

use crate::types::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// JSON object mapping archive paths to the last shown page index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LastPageStore {
    path: PathBuf,
    pages: BTreeMap<String, usize>,
}

impl LastPageStore {
    /// Load the store at `path`.
    ///
    /// A missing file gives an empty store. A corrupt file is logged and
    /// replaced by an empty store on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let pages = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn!("Resetting corrupt page history {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Cannot read page history {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, pages }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last page of `archive`, 0 when unknown
    pub fn get(&self, archive: &Path) -> usize {
        self.pages.get(&key(archive)).copied().unwrap_or(0)
    }

    pub fn set(&mut self, archive: &Path, index: usize) {
        self.pages.insert(key(archive), index);
    }

    /// Write the store back to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(&self.pages)
            .map_err(|e| ReaderError::Config(format!("Failed to serialize page history: {}", e)))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn key(archive: &Path) -> String {
    archive.to_string_lossy().into_owned()
}
