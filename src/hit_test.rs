use crate::drawing::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, Shape, ShapeKind};
use crate::math::{Point, Rect, clamp};
use crate::text::TextMeasurer;

/// A pencil stroke is hit within this distance of any sampled point.
pub const POINT_TOLERANCE: f64 = 8.0;
/// Lines and arrows are hit strictly closer than this to the segment.
pub const SEGMENT_TOLERANCE: f64 = 8.0;
/// Slack around a circle's outline; the whole disk counts as a hit.
pub const CIRCLE_TOLERANCE: f64 = 6.0;
/// Padding around a text box.
pub const TEXT_PADDING: f64 = 4.0;

/// Is `(px, py)` on or near `shape`?
///
/// Text shapes without a usable size are measured first and the result is
/// cached onto the shape.
pub fn hit_test(shape: &mut Shape, px: f64, py: f64, measurer: &dyn TextMeasurer) -> bool {
    let pointer = Point::new(px, py);
    match &shape.kind {
        ShapeKind::Pencil { points } => {
            if points.iter().any(|p| p.distance(pointer) < POINT_TOLERANCE) {
                return true;
            }
            // sparse samples from fast strokes leave gaps; fall back to the box
            match (shape.width, shape.height) {
                (Some(width), Some(height)) => {
                    Rect::new(shape.x, shape.y, width, height).contains_padded(pointer, 0.0)
                }
                _ => false,
            }
        }
        ShapeKind::Line { x2, y2 } | ShapeKind::Arrow { x2, y2 } => {
            point_to_segment_distance(pointer, shape.anchor(), Point::new(*x2, *y2))
                < SEGMENT_TOLERANCE
        }
        ShapeKind::Circle { radius } => {
            pointer.distance(shape.anchor()) <= radius.max(0.0) + CIRCLE_TOLERANCE
        }
        ShapeKind::Text { .. } => {
            ensure_text_extent(shape, measurer);
            shape.bounds().contains_padded(pointer, TEXT_PADDING)
        }
    }
}

/// Index of the topmost shape under the pointer. Later shapes paint over
/// earlier ones, so the search runs from the back of the slice.
pub fn topmost_hit(
    shapes: &mut [Shape],
    px: f64,
    py: f64,
    measurer: &dyn TextMeasurer,
) -> Option<usize> {
    shapes
        .iter_mut()
        .enumerate()
        .rev()
        .find_map(|(i, shape)| hit_test(shape, px, py, measurer).then_some(i))
}

/// Fill in a text shape's width/height from measurement when either is
/// missing or zero. Other variants are left alone.
pub fn ensure_text_extent(shape: &mut Shape, measurer: &dyn TextMeasurer) {
    let ShapeKind::Text {
        content,
        font_size,
        font_family,
        ..
    } = &shape.kind
    else {
        return;
    };
    let known = |v: Option<f64>| v.is_some_and(|v| v != 0.0);
    if known(shape.width) && known(shape.height) {
        return;
    }
    let extent = measurer.measure(
        content,
        font_size.unwrap_or(DEFAULT_FONT_SIZE),
        font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY),
    );
    shape.width = Some(extent.width);
    shape.height = Some(extent.height);
}

/// Euclidean distance from `point` to the closest point of segment `a`-`b`.
pub fn point_to_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return point.distance(a);
    }

    let t = ((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq;
    let t = clamp(t, 0.0, 1.0);
    point.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::ApproxMeasurer;

    fn line(x2: f64, y2: f64) -> Shape {
        Shape::new("line_1", Point::new(0.0, 0.0), ShapeKind::Line { x2, y2 })
    }

    fn circle(radius: f64) -> Shape {
        Shape::new("circle_1", Point::new(100.0, 100.0), ShapeKind::Circle { radius })
    }

    fn text(content: &str) -> Shape {
        Shape::new(
            "text_1",
            Point::new(10.0, 10.0),
            ShapeKind::Text {
                content: content.into(),
                font_size: Some(20.0),
                font_family: Some("Arial".into()),
                color: None,
            },
        )
    }

    #[test]
    fn segment_hits_within_tolerance() {
        let mut shape = line(100.0, 0.0);
        assert!(hit_test(&mut shape, 50.0, 3.0, &ApproxMeasurer));
        assert!(!hit_test(&mut shape, 50.0, 9.0, &ApproxMeasurer));
        assert!(!hit_test(&mut shape, 50.0, 8.0, &ApproxMeasurer));
        // beyond the end the clamped distance is 50
        assert!(!hit_test(&mut shape, 150.0, 0.0, &ApproxMeasurer));
    }

    #[test]
    fn arrow_uses_segment_rule() {
        let mut shape = Shape::new("a", Point::new(0.0, 0.0), ShapeKind::Arrow { x2: 0.0, y2: 40.0 });
        assert!(hit_test(&mut shape, 5.0, 20.0, &ApproxMeasurer));
        assert!(!hit_test(&mut shape, 0.0, 50.0, &ApproxMeasurer));
    }

    #[test]
    fn degenerate_segment_measures_to_endpoint() {
        let d = point_to_segment_distance(Point::new(3.0, 4.0), Point::default(), Point::default());
        assert_eq!(d, 5.0);
    }

    #[test]
    fn circle_hits_whole_disk_plus_tolerance() {
        let mut shape = circle(20.0);
        for r in [0.0, 5.0, 19.0, 20.0, 25.0, 26.0] {
            assert!(hit_test(&mut shape, 100.0 + r, 100.0, &ApproxMeasurer), "r = {}", r);
        }
        assert!(!hit_test(&mut shape, 126.001, 100.0, &ApproxMeasurer));
        assert!(!hit_test(&mut shape, 100.0, 140.0, &ApproxMeasurer));
    }

    #[test]
    fn circle_hit_is_monotonic_in_distance() {
        let mut shape = circle(12.5);
        let limit = 12.5 + CIRCLE_TOLERANCE;
        for step in 0..400 {
            let d = step as f64 * 0.1;
            let angle = step as f64 * 0.37;
            let hit = hit_test(
                &mut shape,
                100.0 + d * angle.cos(),
                100.0 + d * angle.sin(),
                &ApproxMeasurer,
            );
            if d <= limit - 1e-9 {
                assert!(hit, "missed at distance {}", d);
            } else if d > limit + 1e-9 {
                assert!(!hit, "hit at distance {}", d);
            }
        }
    }

    #[test]
    fn pencil_hits_near_points_or_inside_box() {
        let points = vec![Point::new(0.0, 0.0), Point::new(100.0, 100.0)];
        let mut shape = Shape::new("p", Point::new(0.0, 0.0), ShapeKind::Pencil { points });

        assert!(hit_test(&mut shape, 5.0, 5.0, &ApproxMeasurer));
        // no bbox yet, so the middle of the sparse stroke misses
        assert!(!hit_test(&mut shape, 50.0, 20.0, &ApproxMeasurer));

        shape.finalize();
        assert!(hit_test(&mut shape, 50.0, 20.0, &ApproxMeasurer));
        assert!(!hit_test(&mut shape, 120.0, 50.0, &ApproxMeasurer));
    }

    #[test]
    fn text_is_measured_lazily_and_cached() {
        let mut shape = text("hello");
        assert_eq!(shape.width, None);

        // "hello" at 20px: width 60, height 20, so the padded box is [6, 74] x [6, 34]
        assert!(hit_test(&mut shape, 73.0, 33.0, &ApproxMeasurer));
        assert_eq!(shape.width, Some(60.0));
        assert_eq!(shape.height, Some(20.0));
        assert!(!hit_test(&mut shape, 75.0, 20.0, &ApproxMeasurer));
        assert!(hit_test(&mut shape, 6.0, 6.0, &ApproxMeasurer));
    }

    #[test]
    fn zero_sized_text_is_remeasured() {
        let mut shape = text("hi");
        shape.width = Some(0.0);
        shape.height = Some(20.0);
        ensure_text_extent(&mut shape, &ApproxMeasurer);
        assert_eq!(shape.width, Some(24.0));
    }

    #[test]
    fn later_shapes_win() {
        let mut shapes = vec![
            Shape::new("a", Point::new(50.0, 50.0), ShapeKind::Circle { radius: 30.0 }),
            Shape::new("b", Point::new(55.0, 50.0), ShapeKind::Circle { radius: 30.0 }),
        ];
        let hit = topmost_hit(&mut shapes, 52.0, 50.0, &ApproxMeasurer);
        assert_eq!(hit, Some(1));
        assert_eq!(topmost_hit(&mut shapes, 500.0, 500.0, &ApproxMeasurer), None);
    }
}
