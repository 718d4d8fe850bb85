//! Tests for detection and routing working together

use crate::pathfinder::{
    Detector, MatchConfig, Pathfinder, PathfinderConfig, PathfinderError, Position, Rect,
    TemplateImage, candidate_count, route,
};
use image::imageops::{crop_imm, replace};
use image::{DynamicImage, GrayImage, Luma};
use std::collections::HashSet;

fn noise(width: u32, height: u32, seed: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let mut h = (u64::from(x) << 32 | u64::from(y)) ^ u64::from(seed).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
        h ^= h >> 33;
        h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
        h ^= h >> 33;
        Luma([h as u8])
    })
}

/// Flat background with a smooth cone, so neighbouring placements score alike
fn cone_scene() -> GrayImage {
    GrayImage::from_fn(60, 60, |x, y| {
        let dx = x as f32 - 30.0;
        let dy = y as f32 - 30.0;
        let v = 200.0 - 8.0 * (dx * dx + dy * dy).sqrt();
        Luma([v.max(0.0) as u8])
    })
}

fn config_with_threshold(threshold: f32) -> MatchConfig {
    MatchConfig {
        threshold,
        ..MatchConfig::default()
    }
}

#[test]
fn test_overlapping_placements_are_all_reported() {
    let scene = cone_scene();
    let sprite = crop_imm(&scene, 20, 20, 21, 21).to_image();
    let items = vec![TemplateImage::from_gray("jelly", sprite)];
    let detector = Detector::new(&config_with_threshold(0.9));

    let set = detector.detect_all(&scene, &items);
    let jellies = &set["jelly"];
    let exact = Rect::new(20, 20, 21, 21);

    assert!(jellies.len() >= 2, "neighbouring placements should not be suppressed");
    assert!(jellies.contains(&exact));
    assert!(jellies.iter().all(|r| r.overlaps(&exact)));
}

#[test]
fn test_threshold_is_monotonic() {
    let scene = cone_scene();
    let sprite = crop_imm(&scene, 20, 20, 21, 21).to_image();

    let at = |t: f32| -> HashSet<Rect> {
        Detector::new(&config_with_threshold(t))
            .detect(&scene, [&sprite])
            .into_iter()
            .collect()
    };
    let loose = at(0.5);
    let medium = at(0.9);
    let strict = at(0.99);

    assert!(strict.is_subset(&medium));
    assert!(medium.is_subset(&loose));
    assert!(loose.len() > strict.len());
}

#[test]
fn test_detection_is_repeatable() {
    let scene = noise(80, 50, 8);
    let sprite = crop_imm(&scene, 33, 17, 9, 9).to_image();
    let detector = Detector::new(&config_with_threshold(0.2));

    let first = detector.detect(&scene, [&sprite]);
    let second = detector.detect(&scene, [&sprite]);
    assert_eq!(first, second);
}

#[test]
fn test_route_properties_on_detected_pool() {
    let scene = cone_scene();
    let sprite = crop_imm(&scene, 20, 20, 21, 21).to_image();
    let items = vec![TemplateImage::from_gray("jelly", sprite)];
    let pool = Detector::new(&config_with_threshold(0.6)).detect_all(&scene, &items);

    let start = Position::new(22, 0);
    let outcome = route(start, &pool);

    let mut previous = start;
    let mut seen = HashSet::new();
    for step in &outcome.path {
        assert!(step.rect.x >= previous.x, "path moved left");
        assert!(pool[&step.label].contains(&step.rect));
        previous = step.position();
        seen.insert(step.rect);
    }
    // Every rect in this pool is distinct, so no repeats means as many unique
    assert_eq!(seen.len(), outcome.path.len());
    assert_eq!(outcome.path.len() + outcome.unreachable, candidate_count(&pool));
}

/// 200x100 scene with a character sprite at (10, 40), three jellies and a
/// coin behind the character
fn small_scene() -> (GrayImage, GrayImage, GrayImage, GrayImage) {
    let mut scene = noise(200, 100, 1);
    let cookie = noise(8, 8, 2);
    let jelly = noise(8, 8, 3);
    let coin = noise(8, 8, 4);

    replace(&mut scene, &cookie, 10, 40);
    for (x, y) in [(60, 20), (120, 70), (30, 80)] {
        replace(&mut scene, &jelly, x, y);
    }
    replace(&mut scene, &coin, 5, 10);
    (scene, cookie, jelly, coin)
}

fn small_pathfinder(characters: Vec<TemplateImage>, items: Vec<TemplateImage>) -> Pathfinder {
    let mut config = PathfinderConfig::default();
    config.matching.threshold = 0.95;
    config.matching.canonical_width = 200;
    config.matching.canonical_height = 100;
    Pathfinder::with_templates(config, items, characters).unwrap()
}

#[test]
fn test_pipeline_end_to_end() {
    let (scene, cookie, jelly, coin) = small_scene();
    let pathfinder = small_pathfinder(
        vec![
            TemplateImage::from_gray("cookie-missing", noise(8, 8, 50)),
            TemplateImage::from_gray("cookie", cookie),
        ],
        vec![
            TemplateImage::from_gray("jelly", jelly),
            TemplateImage::from_gray("silvercoin", coin),
            TemplateImage::from_gray("pinkbearjelly", noise(8, 8, 60)),
        ],
    );
    let screenshot = DynamicImage::ImageLuma8(scene);

    let report = pathfinder.analyze(&screenshot).unwrap();

    assert_eq!(report.start, Position::new(10, 40));
    assert_eq!(report.character.pose, "cookie");
    assert_eq!(report.character.pose_index, 1);

    let visited: Vec<(&str, i32, i32)> = report
        .path
        .iter()
        .map(|s| (s.label.as_str(), s.rect.x, s.rect.y))
        .collect();
    assert_eq!(
        visited,
        vec![("jelly", 30, 80), ("jelly", 60, 20), ("jelly", 120, 70)]
    );
    assert_eq!(report.unreachable, 1);

    // Routing leaves the detections intact
    assert_eq!(report.matches["jelly"].len(), 3);
    assert_eq!(report.matches["silvercoin"], vec![Rect::new(5, 10, 8, 8)]);
    assert!(report.matches["pinkbearjelly"].is_empty());

    let overlay = pathfinder.render(&screenshot, &report);
    assert_eq!(overlay.dimensions(), (200, 100));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["path"].as_array().unwrap().len(), 3);
    assert_eq!(json["path"][0]["label"], "jelly");
    assert_eq!(json["start"]["x"], 10);
}

#[test]
fn test_pipeline_character_missing_is_fatal() {
    let (scene, _, jelly, _) = small_scene();
    let pathfinder = small_pathfinder(
        vec![TemplateImage::from_gray("cookie", noise(8, 8, 70))],
        vec![TemplateImage::from_gray("jelly", jelly)],
    );

    let err = pathfinder
        .analyze(&DynamicImage::ImageLuma8(scene))
        .unwrap_err();
    assert!(matches!(err, PathfinderError::CharacterNotFound { tried: 1 }));
    assert!(err.is_fatal());
}

#[test]
fn test_full_hd_screenshot_reports_canonical_coordinates() {
    let raw = DynamicImage::ImageLuma8(noise(1920, 1080, 11));
    let canonical = raw
        .resize_exact(1480, 720, image::imageops::FilterType::Triangle)
        .to_luma8();
    // (1300, 650) only exists in the resized space
    let cookie = crop_imm(&canonical, 100, 300, 10, 10).to_image();
    let jelly = crop_imm(&canonical, 1300, 650, 10, 10).to_image();

    let mut config = PathfinderConfig::default();
    config.matching.threshold = 0.95;
    let pathfinder = Pathfinder::with_templates(
        config,
        vec![TemplateImage::from_gray("jelly", jelly)],
        vec![TemplateImage::from_gray("cookie", cookie)],
    )
    .unwrap();

    let report = pathfinder.analyze(&raw).unwrap();
    assert_eq!(report.start, Position::new(100, 300));
    assert_eq!(report.matches["jelly"], vec![Rect::new(1300, 650, 10, 10)]);
    assert_eq!(report.path.len(), 1);

    let overlay = pathfinder.render(&raw, &report);
    assert_eq!(overlay.dimensions(), (1480, 720));
}

#[test]
fn test_invalid_threshold_rejected_at_construction() {
    let mut config = PathfinderConfig::default();
    config.matching.threshold = -2.0;
    assert!(matches!(
        Pathfinder::new(config),
        Err(PathfinderError::InvalidThreshold { .. })
    ));
}

#[test]
fn test_load_templates_skips_missing_items_but_needs_a_pose() {
    let dir = std::env::temp_dir().join(format!("jelly-pathfinder-{}-pipeline", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let jelly_path = dir.join("jelly.png");
    noise(8, 8, 3).save(&jelly_path).unwrap();

    let mut config = PathfinderConfig::default();
    config.items = [
        ("jelly".to_string(), jelly_path),
        ("silvercoin".to_string(), dir.join("missing-coin.png")),
    ]
    .into_iter()
    .collect();
    config.characters = vec![dir.join("missing-cookie.png")];

    let mut pathfinder = Pathfinder::new(config).unwrap();
    assert_eq!(pathfinder.config().items.len(), 2);
    assert!(matches!(
        pathfinder.load_templates(),
        Err(PathfinderError::NoCharacterTemplates)
    ));

    let cookie_path = dir.join("cookie.png");
    noise(8, 8, 2).save(&cookie_path).unwrap();
    let mut config = pathfinder.config().clone();
    config.characters.push(cookie_path);
    let mut pathfinder = Pathfinder::new(config).unwrap();
    assert_eq!(pathfinder.load_templates().unwrap(), (1, 1));
}
