use manga_reader::*;

#[test]
fn test_defaults() {
    let options = ReaderOptions::default();
    assert_eq!(options.fit_mode, FitMode::Best);
    assert!(!options.double_page);
    assert!(options.manga_mode);
    assert_eq!(options.rotation, 0);
    assert_eq!((options.width, options.height), (500, 500));
    assert_eq!(options.scale_method, ScaleFilter::Lanczos);
    assert_eq!(options.next_image, "<Left>");
    assert_eq!(options.toggle_fullscreen, "<F11>");
    assert_eq!(options.dictionary_command, "myougiden -c %q");
    assert!(options.validate().is_ok());
}

#[test]
fn test_manga_mode_sets_initial_direction() {
    let manga = ReaderOptions::default();
    assert_eq!(ViewState::new(&manga, 0).direction, ReadingDirection::Manga);

    let western = ReaderOptions {
        manga_mode: false,
        ..ReaderOptions::default()
    };
    assert_eq!(western.reading_direction(), ReadingDirection::Western);
    assert_eq!(ViewState::new(&western, 0).direction, ReadingDirection::Western);
}

#[test]
fn test_validation_rotation_out_of_range() {
    let options = ReaderOptions {
        rotation: 4,
        ..ReaderOptions::default()
    };
    match options.validate() {
        Err(ReaderError::Config(msg)) => assert!(msg.contains("Rotation")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_validation_empty_binding() {
    let options = ReaderOptions {
        rotate: "  ".to_string(),
        ..ReaderOptions::default()
    };
    assert!(matches!(options.validate(), Err(ReaderError::KeyBinding(_))));
}

#[test]
fn test_keymap_rejects_bad_binding() {
    let options = ReaderOptions {
        rotate: "<Super-r>".to_string(),
        ..ReaderOptions::default()
    };
    assert!(Keymap::from_options(&options).is_err());
}

#[cfg(feature = "serde")]
#[test]
fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = ReaderOptions {
        fit_mode: FitMode::Height,
        double_page: true,
        rotation: 3,
        scale_method: ScaleFilter::Bicubic,
        next_image: "<space>".to_string(),
        ..ReaderOptions::default()
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    options.save(path).unwrap();
    let loaded = ReaderOptions::load(path).unwrap();
    assert_eq!(options, loaded);
}

#[cfg(feature = "serde")]
#[test]
fn test_partial_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"fit_mode": "width", "double_page": true}"#).unwrap();

    let loaded = ReaderOptions::load(&path).unwrap();
    assert_eq!(loaded.fit_mode, FitMode::Width);
    assert!(loaded.double_page);
    assert_eq!(loaded.prev_image, "<Right>");
}

#[cfg(feature = "serde")]
#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let corrupt = dir.path().join("corrupt.json");
    std::fs::write(&corrupt, "{ not json").unwrap();
    assert!(matches!(
        ReaderOptions::load(&corrupt),
        Err(ReaderError::Config(_))
    ));
    assert_eq!(
        ReaderOptions::load_or_default(&corrupt),
        ReaderOptions::default()
    );

    let bad_rotation = dir.path().join("rotation.json");
    std::fs::write(&bad_rotation, r#"{"rotation": 7}"#).unwrap();
    assert_eq!(
        ReaderOptions::load_or_default(&bad_rotation),
        ReaderOptions::default()
    );

    let missing = dir.path().join("missing.json");
    assert_eq!(
        ReaderOptions::load_or_default(&missing),
        ReaderOptions::default()
    );
}
