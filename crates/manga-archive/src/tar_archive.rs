use crate::source::{PageSource, sorted_pages};
use crate::types::*;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tar::Archive;

/// Tar archives, optionally gzip compressed.
///
/// Tar has no index, so opening a page scans the archive from the start.
pub struct TarSource {
    path: PathBuf,
    gzip: bool,
    pages: Vec<String>,
}

impl TarSource {
    pub fn open(path: &Path, gzip: bool) -> Result<Self> {
        let mut source = Self {
            path: path.to_path_buf(),
            gzip,
            pages: Vec::new(),
        };

        let mut names = Vec::new();
        let mut archive = source.archive()?;
        for entry in archive.entries()? {
            let entry = entry?;
            if entry.header().entry_type().is_file() {
                names.push(entry.path()?.to_string_lossy().into_owned());
            }
        }
        source.pages = sorted_pages(names);
        log::debug!("{}: {} pages in tar", path.display(), source.pages.len());

        Ok(source)
    }

    fn archive(&self) -> Result<Archive<Box<dyn Read>>> {
        let file = BufReader::new(File::open(&self.path)?);
        let reader: Box<dyn Read> = if self.gzip {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(Archive::new(reader))
    }
}

impl PageSource for TarSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn list(&self) -> &[String] {
        &self.pages
    }

    fn open(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive()?;
        for entry in archive.entries()? {
            let mut entry = entry?;
            if entry.path()?.to_string_lossy() == name {
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut bytes)?;
                return Ok(bytes);
            }
        }
        Err(ArchiveError::MissingPage(name.to_string()))
    }
}
