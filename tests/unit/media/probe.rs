use super::*;

#[test]
fn prefers_r_frame_rate() {
    let fps = select_fps(Some("30000/1001"), Some("25/1")).unwrap();
    assert_eq!(fps, Fps::new(30000, 1001).unwrap());
}

#[test]
fn indeterminate_rate_falls_back_to_average() {
    let fps = select_fps(Some("0/0"), Some("24/1")).unwrap();
    assert_eq!(fps, Fps::new(24, 1).unwrap());
    let fps = select_fps(None, Some("24/1")).unwrap();
    assert_eq!(fps.num, 24);
}

#[test]
fn no_usable_rate_is_media_error() {
    let err = select_fps(Some("0/0"), Some("0/0")).unwrap_err();
    assert!(matches!(err, PoseVizError::Media(_)), "{err}");
}

#[test]
fn missing_video_is_io_error_without_running_ffprobe() {
    let dir = tempfile::tempdir().unwrap();
    let err = probe_video(&dir.path().join("missing.mp4")).unwrap_err();
    assert!(matches!(err, PoseVizError::Io(_)), "{err}");
}
