use manga_archive::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const PAGES: [(&str, &[u8]); 4] = [
    ("vol1/page10.png", b"ten"),
    ("vol1/page2.png", b"two"),
    ("vol1/page1.jpg", b"one"),
    ("vol1/info.txt", b"not a page"),
];

fn expected_order() -> Vec<String> {
    vec![
        "vol1/page1.jpg".to_string(),
        "vol1/page2.png".to_string(),
        "vol1/page10.png".to_string(),
    ]
}

fn write_zip(path: &Path) {
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in PAGES {
        writer.start_file(name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

fn append_pages<W: Write>(builder: &mut tar::Builder<W>) {
    for (name, data) in PAGES {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data).unwrap();
    }
}

#[test]
fn test_directory_source() {
    let dir = tempfile::tempdir().unwrap();
    for (name, data) in PAGES {
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }
    std::fs::create_dir_all(dir.path().join(".cache")).unwrap();
    std::fs::write(dir.path().join(".cache/thumb.png"), b"x").unwrap();

    assert_eq!(sniff(dir.path()).unwrap(), ArchiveKind::Directory);

    let mut source = open_source(dir.path()).unwrap();
    assert_eq!(source.path(), dir.path());
    assert_eq!(source.list(), expected_order().as_slice());
    assert_eq!(source.open_index(2).unwrap(), b"ten");
}

#[test]
fn test_zip_source() {
    let dir = tempfile::tempdir().unwrap();
    // Extension is irrelevant, only the content counts
    let path = dir.path().join("volume.bin");
    write_zip(&path);

    assert_eq!(sniff(&path).unwrap(), ArchiveKind::Zip);

    let mut source = open_source(&path).unwrap();
    assert_eq!(source.list(), expected_order().as_slice());
    assert_eq!(source.page_count(), 3);
    assert_eq!(source.open("vol1/page2.png").unwrap(), b"two");
    assert!(matches!(
        source.open("vol1/info.txt.png"),
        Err(ArchiveError::MissingPage(_))
    ));
}

#[test]
fn test_tar_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("volume.cbt");
    let mut builder = tar::Builder::new(File::create(&path).unwrap());
    append_pages(&mut builder);
    builder.into_inner().unwrap().flush().unwrap();

    assert_eq!(sniff(&path).unwrap(), ArchiveKind::Tar);

    let mut source = open_source(&path).unwrap();
    assert_eq!(source.list(), expected_order().as_slice());
    assert_eq!(source.open_index(0).unwrap(), b"one");
}

#[test]
fn test_gzip_tar_source() {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("volume.tar.gz");
    let encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    append_pages(&mut builder);
    builder.into_inner().unwrap().finish().unwrap();

    assert_eq!(sniff(&path).unwrap(), ArchiveKind::GzipTar);

    let mut source = open_source(&path).unwrap();
    assert_eq!(source.page_count(), 3);
    assert_eq!(source.open("vol1/page10.png").unwrap(), b"ten");
}

#[test]
fn test_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let result = open_source(&dir.path().join("nope.cbz"));
    assert!(matches!(result, Err(ArchiveError::NotFound(_))));
}

#[test]
fn test_unsupported_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.cbz");
    std::fs::write(&path, "just some text").unwrap();

    let result = open_source(&path);
    assert!(matches!(result, Err(ArchiveError::Unsupported(_))));
}

#[test]
fn test_archive_without_images() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), "hello").unwrap();

    let result = open_source(dir.path());
    assert!(matches!(result, Err(ArchiveError::Empty(_))));
}

#[test]
fn test_cbr_is_handled_by_default_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.cbr");
    let mut bytes = b"Rar!\x1a\x07\x00".to_vec();
    bytes.extend_from_slice(b"truncated volume");
    std::fs::write(&path, bytes).unwrap();

    assert_eq!(sniff(&path).unwrap(), ArchiveKind::Rar);
    // A damaged rar is reported by the rar reader, not rejected by type
    let result = open_source(&path);
    assert!(matches!(
        result,
        Err(ArchiveError::Rar(_)) | Err(ArchiveError::Empty(_))
    ));
}
