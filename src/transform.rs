use crate::drawing::{Shape, ShapeKind};
use crate::math::{Affine2, PI, Point, Rect};

/// Scale by `(scale_x, scale_y)` and rotate by `rotate_deg` about `center`,
/// returning the transformed copy with its bounding fields recomputed.
///
/// Circles take the mean of the absolute scale factors as their radius scale,
/// and text scales its box but keeps its font size.
pub fn transform(shape: &Shape, center: Point, scale_x: f64, scale_y: f64, rotate_deg: f64) -> Shape {
    let mat = Affine2::about(center, scale_x, scale_y, rotate_deg * PI / 180.0);
    let mut out = shape.clone();

    match &mut out.kind {
        ShapeKind::Pencil { points } => {
            for p in points.iter_mut() {
                *p = mat.transform_point(*p);
            }
            match Rect::enclosing(points.iter().copied()) {
                Some(bbox) => {
                    out.x = bbox.x;
                    out.y = bbox.y;
                    out.width = Some(bbox.width);
                    out.height = Some(bbox.height);
                }
                None => {
                    let anchor = mat.transform_point(Point::new(out.x, out.y));
                    out.x = anchor.x;
                    out.y = anchor.y;
                }
            }
        }
        ShapeKind::Line { x2, y2 } | ShapeKind::Arrow { x2, y2 } => {
            let start = mat.transform_point(Point::new(out.x, out.y));
            let end = mat.transform_point(Point::new(*x2, *y2));
            out.x = start.x;
            out.y = start.y;
            *x2 = end.x;
            *y2 = end.y;
            out.width = Some((end.x - start.x).abs());
            out.height = Some((end.y - start.y).abs());
        }
        ShapeKind::Circle { radius } => {
            let c = mat.transform_point(Point::new(out.x, out.y));
            out.x = c.x;
            out.y = c.y;
            *radius = radius.max(0.0) * (scale_x.abs() + scale_y.abs()) / 2.0;
            out.width = Some(*radius * 2.0);
            out.height = Some(*radius * 2.0);
        }
        ShapeKind::Text { .. } => {
            let anchor = mat.transform_point(Point::new(out.x, out.y));
            out.x = anchor.x;
            out.y = anchor.y;
            out.width = Some(out.width.unwrap_or(0.0) * scale_x.abs());
            out.height = Some(out.height.unwrap_or(0.0) * scale_y.abs());
        }
    }

    out.rotation = normalize_degrees(shape.rotation + rotate_deg);
    out
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
