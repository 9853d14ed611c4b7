use crate::sniff::sniff;
use crate::types::*;
use crate::{DirectorySource, TarSource, ZipSource};
use std::path::Path;

/// File extensions treated as pages
pub const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

/// An ordered collection of page images
pub trait PageSource: Send {
    /// Path the source was opened from
    fn path(&self) -> &Path;

    /// Page identifiers in reading order
    fn list(&self) -> &[String];

    /// Raw (still encoded) bytes of one page
    fn open(&mut self, name: &str) -> Result<Vec<u8>>;

    fn page_count(&self) -> usize {
        self.list().len()
    }

    /// Raw bytes of the page at `index`
    fn open_index(&mut self, index: usize) -> Result<Vec<u8>> {
        let name = self
            .list()
            .get(index)
            .cloned()
            .ok_or_else(|| ArchiveError::MissingPage(format!("#{}", index)))?;
        self.open(&name)
    }
}

/// Open the page source at `path`, choosing the reader by content
pub fn open_source(path: &Path) -> Result<Box<dyn PageSource>> {
    let kind = sniff(path)?;
    log::debug!("{} looks like {:?}", path.display(), kind);

    let source: Box<dyn PageSource> = match kind {
        ArchiveKind::Directory => Box::new(DirectorySource::open(path)?),
        ArchiveKind::Zip => Box::new(ZipSource::open(path)?),
        ArchiveKind::Tar => Box::new(TarSource::open(path, false)?),
        ArchiveKind::GzipTar => Box::new(TarSource::open(path, true)?),
        #[cfg(feature = "rar")]
        ArchiveKind::Rar => Box::new(crate::RarSource::open(path)?),
        #[cfg(not(feature = "rar"))]
        ArchiveKind::Rar => {
            log::warn!("rar support is not enabled in this build");
            return Err(ArchiveError::Unsupported(path.to_path_buf()));
        }
    };

    if source.list().is_empty() {
        return Err(ArchiveError::Empty(path.to_path_buf()));
    }
    Ok(source)
}

/// Whether `name` has an image extension
pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Skip resource forks and hidden files that archivers leave behind
pub fn is_hidden_entry(name: &str) -> bool {
    name.split(['/', '\\'])
        .any(|part| part.starts_with('.') || part == "__MACOSX")
}

/// Keep image entries and sort them naturally (`2.png` before `10.png`)
pub fn sorted_pages(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut pages: Vec<String> = names
        .into_iter()
        .filter(|name| is_image_name(name) && !is_hidden_entry(name))
        .collect();
    pages.sort_by(|a, b| natord::compare(a, b));
    pages.dedup();
    pages
}
