use std::io::Write;
use std::time::Duration;

use photo_carousel::config::Configuration;

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
slides:
  - src: "/img/harbor.jpg"
    alt: "Harbor at dawn"
  - src: "/img/ridge.jpg"
    alt: "Ridge line"
    href: "https://example.com/ridge"
autoplay-interval: 5s
interaction-cooldown: 2500ms
desktop-breakpoint-px: 1024
visibility-threshold: 0.5
transition:
  duration: 750ms
  easing: linear
layout:
  gap-px: 8
  slides-per-view-wide: 2
  aspect-ratio: [4, 3]
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.slides.len(), 2);
    assert_eq!(
        cfg.slides.slides()[1].href.as_deref(),
        Some("https://example.com/ridge")
    );
    assert_eq!(cfg.autoplay_interval, Duration::from_secs(5));
    assert_eq!(cfg.interaction_cooldown, Duration::from_millis(2500));
    assert!((cfg.desktop_breakpoint_px - 1024.0).abs() < f32::EPSILON);
    assert!((cfg.visibility_threshold - 0.5).abs() < f32::EPSILON);
    assert_eq!(cfg.transition.duration, Duration::from_millis(750));
    assert_eq!(cfg.transition.easing, "linear");
    assert!((cfg.layout.gap_px - 8.0).abs() < f32::EPSILON);
    assert_eq!(cfg.layout.slides_per_view_narrow, 1);
    assert_eq!(cfg.layout.slides_per_view_wide, 2);
    assert_eq!(cfg.layout.aspect_ratio, [4, 3]);
}

#[test]
fn empty_config_uses_defaults() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    let cfg = cfg.validated(None).unwrap();
    assert!(cfg.slides.is_empty());
    assert_eq!(cfg.autoplay_interval, Duration::from_secs(3));
    assert_eq!(cfg.interaction_cooldown, Duration::from_secs(3));
    assert_eq!(cfg.initial_measure_delay, Duration::from_millis(100));
    assert!((cfg.desktop_breakpoint_px - 768.0).abs() < f32::EPSILON);
    assert!(cfg.is_wide(768.0));
    assert!(!cfg.is_wide(767.0));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = serde_yaml::from_str::<Configuration>("autoplay: 3s\n").unwrap_err();
    assert!(err.to_string().contains("unknown field"), "{err}");
}

#[test]
fn zero_interval_is_invalid() {
    let cfg: Configuration = serde_yaml::from_str("autoplay-interval: 0s\n").unwrap();
    let err = cfg.validated(None).unwrap_err();
    assert!(err.to_string().contains("autoplay-interval"), "{err}");
}

#[test]
fn threshold_outside_unit_range_is_invalid() {
    let cfg: Configuration = serde_yaml::from_str("visibility-threshold: 1.5\n").unwrap();
    assert!(cfg.validated(None).is_err());
}

#[test]
fn layout_errors_carry_context() {
    let cfg: Configuration = serde_yaml::from_str(
        r#"
layout:
  slides-per-view-wide: 0
"#,
    )
    .unwrap();
    let err = cfg.validated(None).unwrap_err();
    assert!(format!("{err:#}").contains("slides-per-view-wide"), "{err:#}");
    assert!(format!("{err:#}").contains("invalid layout options"), "{err:#}");
}

#[test]
fn slides_file_is_resolved_relative_to_config_and_appended() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("deck.yaml"),
        r#"
- src: "/img/extra.jpg"
  alt: "Extra"
"#,
    )
    .unwrap();

    let config_path = dir.path().join("carousel.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        r#"
slides:
  - src: "/img/inline.jpg"
    alt: "Inline"
slides-file: deck.yaml
"#
    )
    .unwrap();

    let cfg = Configuration::from_yaml_file(&config_path)
        .unwrap()
        .validated(config_path.parent())
        .unwrap();
    let alts: Vec<_> = cfg.slides.slides().iter().map(|s| s.alt.as_str()).collect();
    assert_eq!(alts, ["Inline", "Extra"]);
    assert!(cfg.slides_file.is_none());
}

#[test]
fn missing_slides_file_fails_validation() {
    let cfg: Configuration = serde_yaml::from_str("slides-file: /nonexistent/deck.yaml\n").unwrap();
    let err = cfg.validated(None).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/deck.yaml"), "{err:#}");
}
