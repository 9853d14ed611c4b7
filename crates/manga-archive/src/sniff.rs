//! Content sniffing
//!
//! The container type is decided from the first bytes of the file, never
//! from its extension.

use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const RAR_MAGIC: &[u8] = b"Rar!\x1a\x07";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const USTAR_MAGIC: &[u8] = b"ustar";
const USTAR_OFFSET: usize = 257;

/// Bytes needed to see every magic number
const SNIFF_LEN: usize = USTAR_OFFSET + 8;

/// Determine what kind of page container lives at `path`
pub fn sniff(path: &Path) -> Result<ArchiveKind> {
    if !path.exists() {
        return Err(ArchiveError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Ok(ArchiveKind::Directory);
    }

    let mut header = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)?;

    detect(&header).ok_or_else(|| ArchiveError::Unsupported(path.to_path_buf()))
}

/// Match a file header against the known magic numbers
pub fn detect(header: &[u8]) -> Option<ArchiveKind> {
    if header.starts_with(ZIP_MAGIC) || header.starts_with(ZIP_EMPTY_MAGIC) {
        Some(ArchiveKind::Zip)
    } else if header.starts_with(RAR_MAGIC) {
        Some(ArchiveKind::Rar)
    } else if header.get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len()) == Some(USTAR_MAGIC) {
        Some(ArchiveKind::Tar)
    } else if header.starts_with(GZIP_MAGIC) {
        Some(ArchiveKind::GzipTar)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_magic_numbers() {
        assert_eq!(detect(b"PK\x03\x04rest"), Some(ArchiveKind::Zip));
        assert_eq!(detect(b"Rar!\x1a\x07\x00"), Some(ArchiveKind::Rar));
        assert_eq!(detect(&[0x1f, 0x8b, 0x08]), Some(ArchiveKind::GzipTar));
        assert_eq!(detect(b"plain text"), None);
        assert_eq!(detect(b""), None);

        let mut tar = vec![0u8; 512];
        tar[257..262].copy_from_slice(b"ustar");
        assert_eq!(detect(&tar), Some(ArchiveKind::Tar));
    }
}
