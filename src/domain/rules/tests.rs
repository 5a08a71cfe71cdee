// Unit tests for business rules

use super::*;

fn secs(seconds: f64) -> MediaTime {
    MediaTime::from_seconds(seconds).unwrap()
}

fn clip(seconds: f64) -> SourceClip {
    SourceClip::new("/videos/holiday.mov", secs(seconds)).unwrap()
}

#[test]
fn test_trim_range_within_bounds() {
    let range = RangeRules::trim_range(&clip(10.0), secs(2.0), secs(7.5)).unwrap();
    assert_eq!(range.start, secs(2.0));
    assert_eq!(range.end, secs(7.5));
}

#[test]
fn test_trim_range_end_past_duration() {
    let err = RangeRules::trim_range(&clip(10.0), secs(2.0), secs(12.0)).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_divide_ten_seconds() {
    let (first, second) = RangeRules::divide_ranges(&clip(10.0)).unwrap();
    assert_eq!(first.start, secs(0.01));
    assert_eq!(first.end, secs(5.0));
    assert_eq!(second.start, secs(5.0));
    assert_eq!(second.end, secs(10.0));
}

#[test]
fn test_divide_halves_are_contiguous() {
    for ticks in [13_i64, 601, 1799, 6001, 123_457] {
        let duration = MediaTime::new(ticks, PREFERRED_TIMESCALE).unwrap();
        let source = SourceClip::new("a.mp4", duration).unwrap();
        let (first, second) = RangeRules::divide_ranges(&source).unwrap();

        assert!(!first.overlaps(&second));
        assert_eq!(first.end, second.start);
        assert_eq!(first.start, DIVIDE_LEAD_IN);
        assert_eq!(second.end, duration);
    }
}

#[test]
fn test_divide_odd_duration_keeps_exact_midpoint() {
    let duration = MediaTime::new(6001, PREFERRED_TIMESCALE).unwrap();
    let source = SourceClip::new("a.mp4", duration).unwrap();
    let (first, second) = RangeRules::divide_ranges(&source).unwrap();
    assert_eq!(first.end.timescale(), 1200);
    assert_eq!(second.duration(), first.end);
}

#[test]
fn test_divide_too_short() {
    let err = RangeRules::divide_ranges(&clip(0.02)).unwrap_err();
    match err {
        ExportError::InvalidRange { reason, .. } => assert_eq!(reason, "clip too short to divide"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_divide_outputs_are_distinct_siblings() {
    let source = Path::new("/videos/holiday.mov");
    let (first, second) = OutputNaming::divide_outputs(source, "mp4").unwrap();
    assert_eq!(first, PathBuf::from("/videos/holiday_part1.mp4"));
    assert_eq!(second, PathBuf::from("/videos/holiday_part2.mp4"));
    assert_ne!(first, source);
    assert_ne!(second, source);
}

#[test]
fn test_divide_outputs_without_directory() {
    let (first, _) = OutputNaming::divide_outputs(Path::new("clip.mp4"), ".mp4").unwrap();
    assert_eq!(first, PathBuf::from("clip_part1.mp4"));
}

#[test]
fn test_divide_outputs_rejects_root() {
    assert!(OutputNaming::divide_outputs(Path::new("/"), "mp4").is_err());
}
