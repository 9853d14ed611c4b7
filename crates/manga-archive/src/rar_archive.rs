use crate::source::{PageSource, sorted_pages};
use crate::types::*;
use std::path::{Path, PathBuf};
use unrar::Archive;

/// Rar and cbr archives, read through the unrar library
pub struct RarSource {
    path: PathBuf,
    pages: Vec<String>,
}

fn rar_error(e: unrar::error::UnrarError) -> ArchiveError {
    ArchiveError::Rar(e.to_string())
}

impl RarSource {
    pub fn open(path: &Path) -> Result<Self> {
        let listing = Archive::new(path).open_for_listing().map_err(rar_error)?;

        let mut names = Vec::new();
        for header in listing {
            let header = header.map_err(rar_error)?;
            if header.is_file() {
                names.push(header.filename.to_string_lossy().into_owned());
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            pages: sorted_pages(names),
        })
    }
}

impl PageSource for RarSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn list(&self) -> &[String] {
        &self.pages
    }

    fn open(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut archive = Archive::new(&self.path)
            .open_for_processing()
            .map_err(rar_error)?;

        while let Some(header) = archive.read_header().map_err(rar_error)? {
            if header.entry().filename.to_string_lossy() == name {
                let (bytes, _) = header.read().map_err(rar_error)?;
                return Ok(bytes);
            }
            archive = header.skip().map_err(rar_error)?;
        }

        Err(ArchiveError::MissingPage(name.to_string()))
    }
}
