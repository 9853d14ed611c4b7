use crate::source::{PageSource, sorted_pages};
use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Zip and cbz archives
pub struct ZipSource {
    path: PathBuf,
    archive: ZipArchive<File>,
    pages: Vec<String>,
}

impl ZipSource {
    pub fn open(path: &Path) -> Result<Self> {
        let archive = ZipArchive::new(File::open(path)?)?;
        let pages = sorted_pages(archive.file_names().map(String::from));
        log::debug!("{}: {} pages in zip", path.display(), pages.len());

        Ok(Self {
            path: path.to_path_buf(),
            archive,
            pages,
        })
    }
}

impl PageSource for ZipSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn list(&self) -> &[String] {
        &self.pages
    }

    fn open(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ArchiveError::MissingPage(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
