use image::DynamicImage;
use manga_archive::PageSource;
use manga_reader::{ImageSize, PageCatalog};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Maximum number of decoded pages to keep
const MAX_CACHED_PAGES: usize = 12;

/// Decoded pages of one archive, least recently used evicted first.
///
/// Page sizes outlive the decoded images so layout never decodes twice.
pub struct PageStore {
    source: Box<dyn PageSource>,
    page_cache: HashMap<usize, Arc<DynamicImage>>,
    cache_order: VecDeque<usize>,
    sizes: HashMap<usize, ImageSize>,
    failed: HashSet<usize>,
}

impl PageStore {
    pub fn new(source: Box<dyn PageSource>) -> Self {
        Self {
            source,
            page_cache: HashMap::new(),
            cache_order: VecDeque::new(),
            sizes: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Decoded page, `None` when it cannot be read or decoded
    pub fn image(&mut self, index: usize) -> Option<Arc<DynamicImage>> {
        if let Some(image) = self.page_cache.get(&index).cloned() {
            // Update LRU order
            self.cache_order.retain(|i| *i != index);
            self.cache_order.push_back(index);
            return Some(image);
        }

        if index >= self.source.page_count() || self.failed.contains(&index) {
            return None;
        }

        match self.decode(index) {
            Ok(image) => {
                let image = Arc::new(image);
                self.sizes
                    .insert(index, ImageSize::new(image.width(), image.height()));
                self.add_to_cache(index, Arc::clone(&image));
                Some(image)
            }
            Err(e) => {
                let name = self.source.list().get(index).cloned().unwrap_or_default();
                log::warn!("Skipping page {} ({}): {}", index + 1, name, e);
                self.failed.insert(index);
                None
            }
        }
    }

    fn decode(&mut self, index: usize) -> anyhow::Result<DynamicImage> {
        let bytes = self.source.open_index(index)?;
        Ok(image::load_from_memory(&bytes)?)
    }

    fn add_to_cache(&mut self, index: usize, image: Arc<DynamicImage>) {
        while self.cache_order.len() >= MAX_CACHED_PAGES {
            if let Some(old) = self.cache_order.pop_front() {
                self.page_cache.remove(&old);
            }
        }
        self.page_cache.insert(index, image);
        self.cache_order.push_back(index);
    }
}

impl PageCatalog for PageStore {
    fn page_count(&self) -> usize {
        self.source.page_count()
    }

    fn page_size(&mut self, index: usize) -> Option<ImageSize> {
        if let Some(size) = self.sizes.get(&index) {
            return Some(*size);
        }
        self.image(index)
            .map(|image| ImageSize::new(image.width(), image.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use manga_archive::open_source;
    use std::path::Path;

    fn store(dir: &Path) -> PageStore {
        PageStore::new(open_source(dir).unwrap())
    }

    #[test]
    fn test_sizes_and_eviction() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..MAX_CACHED_PAGES + 2 {
            RgbImage::new(10 + i as u32, 20)
                .save(dir.path().join(format!("{:03}.png", i)))
                .unwrap();
        }

        let mut pages = store(dir.path());
        assert_eq!(pages.page_count(), MAX_CACHED_PAGES + 2);
        for i in 0..pages.page_count() {
            assert_eq!(pages.page_size(i), Some(ImageSize::new(10 + i as u32, 20)));
        }
        assert_eq!(pages.page_cache.len(), MAX_CACHED_PAGES);
        assert!(!pages.page_cache.contains_key(&0));

        // Evicted pages keep their size and decode again on demand
        assert_eq!(pages.page_size(0), Some(ImageSize::new(10, 20)));
        assert!(pages.image(0).is_some());
        assert!(pages.image(pages.page_count()).is_none());
    }

    #[test]
    fn test_undecodable_page_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("01.jpg"), b"not an image").unwrap();
        RgbImage::new(4, 4)
            .save(dir.path().join("02.png"))
            .unwrap();

        let mut pages = store(dir.path());
        assert!(pages.image(0).is_none());
        assert!(pages.failed.contains(&0));
        assert_eq!(pages.page_size(0), None);
        assert_eq!(pages.page_size(1), Some(ImageSize::new(4, 4)));
    }
}
