use std::io::Write as _;

use super::*;

const RECORD: &str = r#"{"people": [{"pose_keypoints_2d": [1, 2, 0.9]}]}"#;

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let opts = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, body) in entries {
        zip.start_file(*name, opts).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn directory_entries_are_filtered_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        "clip_000000000002_keypoints.json",
        "clip_000000000000_keypoints.json",
        "clip_000000000001_keypoints.json",
        "notes.txt",
    ] {
        std::fs::write(dir.path().join(name), RECORD).unwrap();
    }
    std::fs::create_dir(dir.path().join("nested.json")).unwrap();

    let src = KeypointSource::open(dir.path()).unwrap();
    assert_eq!(
        src.names(),
        &[
            "clip_000000000000_keypoints.json",
            "clip_000000000001_keypoints.json",
            "clip_000000000002_keypoints.json",
        ]
    );
}

#[test]
fn archive_entries_open_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("kp.zip");
    write_zip(
        &zip_path,
        &[
            ("json/b.json", RECORD),
            ("json/a.json", r#"{"people": []}"#),
            ("readme.md", "x"),
        ],
    );

    let mut src = KeypointSource::open(&zip_path).unwrap();
    assert_eq!(src.names(), &["json/a.json", "json/b.json"]);
    assert_eq!(src.len(), 2);

    let b = src.open_frame("json/b.json").unwrap();
    assert_eq!(b.people.len(), 1);
    let a = src.open_frame("json/a.json").unwrap();
    assert!(a.people.is_empty());
    assert!(matches!(
        src.open_frame("json/missing.json"),
        Err(PoseVizError::Io(_))
    ));
}

#[test]
fn declared_entry_size_does_not_drive_allocation() {
    assert_eq!(prealloc_len(0), 0);
    assert_eq!(prealloc_len(512), 512);
    assert_eq!(prealloc_len(u64::MAX), MAX_ENTRY_PREALLOC);
}

#[test]
fn archive_entries_larger_than_the_reservation_read_fully() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("kp.zip");
    let pad = " ".repeat(MAX_ENTRY_PREALLOC + 17);
    let big = format!(r#"{{"people": []{pad}}}"#);
    write_zip(&zip_path, &[("big.json", big.as_str())]);

    let mut src = KeypointSource::open(&zip_path).unwrap();
    assert_eq!(src.read_bytes("big.json").unwrap().len(), big.len());
    assert!(src.open_frame("big.json").unwrap().people.is_empty());
}

#[test]
fn missing_location_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = KeypointSource::open(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, PoseVizError::Config(_)), "{err}");
}

#[test]
fn non_zip_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kp.zip");
    std::fs::write(&path, b"not a zip").unwrap();
    assert!(matches!(
        KeypointSource::open(&path),
        Err(PoseVizError::Io(_))
    ));
}

#[test]
fn decode_errors_name_the_entry() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("f.json"), r#"{"people": [{"pose_keypoints_2d": [1]}]}"#)
        .unwrap();
    let mut src = KeypointSource::open(dir.path()).unwrap();
    let err = src.open_frame("f.json").unwrap_err();
    assert!(matches!(err, PoseVizError::Format(_)));
    assert!(err.to_string().contains("f.json"));
}
