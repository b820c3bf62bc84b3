use super::*;

fn is_run_dir(dir: &Path) -> bool {
    dir.file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("run-")
}

#[test]
fn missing_dir_is_created_with_a_run_subdirectory() {
    let root = tempfile::tempdir().unwrap();
    let want = root.path().join("a").join("tmp");
    let got = prepare_temp_dir(&want).unwrap();
    assert_eq!(got.parent(), Some(want.as_path()));
    assert!(is_run_dir(&got));
    assert!(got.is_dir());
}

#[test]
fn empty_dir_still_gets_its_own_subdirectory() {
    let root = tempfile::tempdir().unwrap();
    let got = prepare_temp_dir(root.path()).unwrap();
    assert_ne!(got, root.path());
    assert!(got.starts_with(root.path()));
    assert!(is_run_dir(&got));
}

#[test]
fn two_claims_on_the_same_dir_never_collide() {
    let root = tempfile::tempdir().unwrap();
    let first = prepare_temp_dir(root.path()).unwrap();
    let second = prepare_temp_dir(root.path()).unwrap();
    assert_ne!(first, second);
    assert!(first.is_dir());
    assert!(second.is_dir());
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 2);
}

#[test]
fn leftover_files_are_not_inside_the_claimed_dir() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("leftover_1.mp4"), b"x").unwrap();

    let got = prepare_temp_dir(root.path()).unwrap();
    assert!(std::fs::read_dir(&got).unwrap().next().is_none());
    assert!(root.path().join("leftover_1.mp4").is_file());
}

#[test]
fn claims_across_threads_are_distinct() {
    let root = tempfile::tempdir().unwrap();
    let dirs: Vec<PathBuf> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| prepare_temp_dir(root.path()).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let mut unique = dirs.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), dirs.len());
}
