//! Options files driving a timeline.

use trimstrip_core::{PlayheadTracking, TimelineOptions, TrimStripError, TrimTimeline};

#[test]
fn options_file_configures_timeline() {
    let json = br##"{
        "color": "#ffcc00",
        "iconColor": { "r": 0.1, "g": 0.1, "b": 0.1 },
        "showTime": false,
        "startProgress": 0.1,
        "endProgress": 0.9,
        "progress": 0.5,
        "minRangeWidth": 0.2,
        "maxRangeWidth": 0.8,
        "playheadTracking": "clamped",
        "density": 2.0
    }"##;
    let options = TimelineOptions::from_json(json).unwrap();
    let mut t = TrimTimeline::new(options).unwrap();
    t.layout(1200.0, 140.0);

    assert!((t.state().trim_start - 0.1).abs() < 1e-6);
    assert!((t.play_progress() - 0.5).abs() < 1e-5);
    assert_eq!(t.options().playhead_tracking, PlayheadTracking::Clamped);
    // 16px of padding at density 2 leaves 108px frames
    assert_eq!(t.geometry().frame_size, 108);
    assert_eq!(t.geometry().frame_count, 11);
}

#[test]
fn inverted_bounds_fail_fast() {
    let json = br#"{ "minRangeWidth": 0.7, "maxRangeWidth": 0.3 }"#;
    assert!(matches!(
        TimelineOptions::from_json(json),
        Err(TrimStripError::ConfigurationInvalid(_))
    ));
}

#[test]
fn unknown_tracking_mode_is_rejected() {
    let json = br#"{ "playheadTracking": "sticky" }"#;
    assert!(matches!(
        TimelineOptions::from_json(json),
        Err(TrimStripError::Serialization(_))
    ));
}

#[test]
fn options_round_trip_through_file() {
    let options = TimelineOptions {
        play_line: false,
        min_range_width: 0.05,
        ..Default::default()
    };
    let path = std::env::temp_dir().join(format!("trimstrip-options-{}.json", std::process::id()));
    std::fs::write(&path, options.to_json().unwrap()).unwrap();
    let loaded = TimelineOptions::from_json(&std::fs::read(&path).unwrap()).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, options);
}
