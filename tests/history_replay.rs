use image::Rgba;
use sketch_canvas::geometry::RETAIN_THRESHOLD_SQ;
use sketch_canvas::stroke::MutableStroke;
use sketch_canvas::{
    DrawSurface, HistoryEntry, HistoryLog, Point, RasterLayer, Rgb, Shape, ShapeType, Stroke,
    StrokeType,
};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn zigzag(offset: f32) -> Vec<Point> {
    (0..12)
        .map(|i| Point::new(6.0 + i as f32 * 9.0, offset + if i % 2 == 0 { 0.0 } else { 14.0 }))
        .collect()
}

fn mixed_history() -> HistoryLog {
    let mut log = HistoryLog::new();
    for (i, stroke_type) in StrokeType::ALL.into_iter().enumerate() {
        log.push(Stroke::new(
            stroke_type,
            3.0 + i as f32 * 2.0,
            Rgb::new(40 * i as u8, 90, 200 - 30 * i as u8),
            zigzag(10.0 + i as f32 * 20.0),
        ));
    }
    for (i, shape_type) in ShapeType::ALL.into_iter().enumerate() {
        let mut shape = Shape::new(
            shape_type,
            i as f32,
            Rgb::new(10, 10, 10),
            Rgb::new(250, 200 - 40 * i as u8, 20),
            Point::new(20.0 + i as f32 * 25.0, 100.0),
        );
        // Alternate drag directions so mirrored boxes are covered
        shape.end = if i % 2 == 0 {
            Point::new(shape.start.x + 22.0, shape.start.y + 15.0)
        } else {
            Point::new(shape.start.x - 18.0, shape.start.y - 30.0)
        };
        log.push(shape);
    }
    log
}

#[test]
fn test_replay_is_deterministic() {
    let history = mixed_history();
    let mut first = RasterLayer::new(128, 128, BACKGROUND);
    let mut second = RasterLayer::new(128, 128, Rgba([0, 0, 0, 255]));

    history.replay(&mut first, BACKGROUND);
    history.replay(&mut second, BACKGROUND);
    history.replay(&mut second, BACKGROUND);

    assert_eq!(first.pixels(), second.pixels());
}

#[test]
fn test_incremental_rendering_matches_replay() {
    let history = mixed_history();
    let mut incremental = RasterLayer::new(128, 128, BACKGROUND);
    for entry in history.entries() {
        sketch_canvas::renderer::render_entry(&mut incremental, entry);
    }

    let mut replayed = RasterLayer::new(128, 128, BACKGROUND);
    history.replay(&mut replayed, BACKGROUND);
    assert_eq!(incremental.pixels(), replayed.pixels());
}

#[test]
fn test_undo_of_any_entry_restores_prior_pixels() {
    let full = mixed_history();
    for cut in 0..full.len() {
        let mut log = HistoryLog::with_entries(full.document_id(), full.entries()[..cut].to_vec());
        let mut before = RasterLayer::new(128, 128, BACKGROUND);
        log.replay(&mut before, BACKGROUND);

        log.push(full.entries()[cut].clone());
        log.pop();
        let mut after = RasterLayer::new(128, 128, BACKGROUND);
        log.replay(&mut after, BACKGROUND);

        assert_eq!(before.pixels(), after.pixels(), "undo after entry {cut}");
    }
}

#[test]
fn test_json_round_trip_preserves_order_and_values() {
    let history = mixed_history();
    let restored = HistoryLog::from_json(&history.to_json().unwrap()).unwrap();

    assert_eq!(restored, history);
    assert_eq!(restored.document_id(), history.document_id());
    let kinds: Vec<_> = restored.entries().iter().map(HistoryEntry::kind).collect();
    assert_eq!(kinds[..4], ["stroke"; 4]);
    assert_eq!(kinds[4..], ["shape"; 4]);
}

#[test]
fn test_retained_points_are_spaced() {
    let mut stroke = MutableStroke::new(StrokeType::Brush, 4.0, Rgb::BLACK);
    // A slow wobbly drag with many tiny moves
    for i in 0..400 {
        let t = i as f32 * 0.37;
        stroke.add_point(Point::new(10.0 + t * 1.3, 50.0 + (t * 0.9).sin() * 6.0));
    }

    let points = stroke.points();
    assert!(points.len() > 2);
    for pair in points.windows(2) {
        let d = pair[0].distance_sq(pair[1]);
        assert!(d > RETAIN_THRESHOLD_SQ, "points {:?} too close ({d})", pair);
    }
}

#[test]
fn test_replay_ignores_prior_surface_contents() {
    let history = mixed_history();
    let mut dirty = RasterLayer::new(128, 128, BACKGROUND);
    dirty.set_fill(Some(Rgba([0, 255, 0, 255])));
    dirty.rect(Point::new(0.0, 0.0), 128.0, 128.0);

    let mut clean = RasterLayer::new(128, 128, BACKGROUND);
    history.replay(&mut dirty, BACKGROUND);
    history.replay(&mut clean, BACKGROUND);
    assert_eq!(dirty.pixels(), clean.pixels());
}
