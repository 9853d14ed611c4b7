use crate::source::{PageSource, is_hidden_entry, sorted_pages};
use crate::types::*;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Images in a directory tree, identified by their path relative to the root
#[derive(Debug)]
pub struct DirectorySource {
    root: PathBuf,
    pages: Vec<String>,
}

impl DirectorySource {
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(ArchiveError::NotFound(root.to_path_buf()));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(should_descend)
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                names.push(relative.to_string_lossy().into_owned());
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            pages: sorted_pages(names),
        })
    }
}

fn should_descend(entry: &DirEntry) -> bool {
    entry.depth() == 0
        || entry
            .file_name()
            .to_str()
            .is_none_or(|name| !is_hidden_entry(name))
}

impl PageSource for DirectorySource {
    fn path(&self) -> &Path {
        &self.root
    }

    fn list(&self) -> &[String] {
        &self.pages
    }

    fn open(&mut self, name: &str) -> Result<Vec<u8>> {
        if !self.pages.iter().any(|page| page == name) {
            return Err(ArchiveError::MissingPage(name.to_string()));
        }
        Ok(std::fs::read(self.root.join(name))?)
    }
}
