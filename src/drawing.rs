use serde::{Deserialize, Serialize};

use crate::math::{Point, Rect};

pub const DEFAULT_STROKE_COLOR: &str = "#111";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_TEXT_COLOR: &str = "#000";
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Pencil,
    Line,
    Arrow,
    Circle,
    Text,
}

impl Tool {
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Pencil => "pencil",
            Tool::Line => "line",
            Tool::Arrow => "arrow",
            Tool::Circle => "circle",
            Tool::Text => "text",
        }
    }
}

/// A drawable object on a page.
///
/// Serializes to the flat JSON form exchanged with the shape store: base fields
/// plus a `"type"` discriminant and the variant's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: String,
    /// Anchor: bbox origin for pencil/text, start point for line/arrow, centre for circle.
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(flatten)]
    pub kind: ShapeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ShapeKind {
    Pencil {
        #[serde(default)]
        points: Vec<Point>,
    },
    Line {
        x2: f64,
        y2: f64,
    },
    Arrow {
        x2: f64,
        y2: f64,
    },
    Circle {
        #[serde(default)]
        radius: f64,
    },
    Text {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_family: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Pencil { .. } => "pencil",
            ShapeKind::Line { .. } => "line",
            ShapeKind::Arrow { .. } => "arrow",
            ShapeKind::Circle { .. } => "circle",
            ShapeKind::Text { .. } => "text",
        }
    }
}

impl Shape {
    pub fn new(id: impl Into<String>, anchor: Point, kind: ShapeKind) -> Self {
        Self {
            id: id.into(),
            x: anchor.x,
            y: anchor.y,
            width: None,
            height: None,
            rotation: 0.0,
            stroke_color: None,
            stroke_width: None,
            page_id: None,
            kind,
        }
    }

    /// Fresh preview for a drawing tool, anchored at the pointer. `None` for
    /// tools that do not draw (select, text).
    pub fn preview(tool: Tool, id: impl Into<String>, at: Point) -> Option<Self> {
        let kind = match tool {
            Tool::Pencil => ShapeKind::Pencil { points: vec![at] },
            Tool::Line => ShapeKind::Line { x2: at.x, y2: at.y },
            Tool::Arrow => ShapeKind::Arrow { x2: at.x, y2: at.y },
            Tool::Circle => ShapeKind::Circle { radius: 0.0 },
            Tool::Select | Tool::Text => return None,
        };
        Some(Self::new(id, at, kind))
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn stroke_color(&self) -> &str {
        self.stroke_color.as_deref().unwrap_or(DEFAULT_STROKE_COLOR)
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ShapeKind::Text { .. })
    }

    /// Grow the preview towards the pointer: append a point, move the end
    /// point, or set the radius to the centre-to-pointer distance.
    pub fn extend_to(&mut self, pointer: Point) {
        let anchor = self.anchor();
        match &mut self.kind {
            ShapeKind::Pencil { points } => points.push(pointer),
            ShapeKind::Line { x2, y2 } | ShapeKind::Arrow { x2, y2 } => {
                *x2 = pointer.x;
                *y2 = pointer.y;
            }
            ShapeKind::Circle { radius } => *radius = anchor.distance(pointer),
            // text drafts grow through keystrokes, not the pointer
            ShapeKind::Text { .. } => {}
        }
    }

    /// Recompute the derived bounding fields from geometry. Text extents come
    /// from measurement and are left untouched here.
    pub fn finalize(&mut self) {
        match &self.kind {
            ShapeKind::Pencil { points } => {
                if let Some(bbox) = Rect::enclosing(points.iter().copied()) {
                    self.x = bbox.x;
                    self.y = bbox.y;
                    self.width = Some(bbox.width);
                    self.height = Some(bbox.height);
                }
            }
            ShapeKind::Line { x2, y2 } | ShapeKind::Arrow { x2, y2 } => {
                self.width = Some((x2 - self.x).abs());
                self.height = Some((y2 - self.y).abs());
            }
            ShapeKind::Circle { radius } => {
                let diameter = radius.max(0.0) * 2.0;
                self.width = Some(diameter);
                self.height = Some(diameter);
            }
            ShapeKind::Text { .. } => {}
        }
    }

    /// Axis-aligned box around the geometry itself, whatever the anchor means
    /// for this variant. Missing text extents count as zero.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ShapeKind::Pencil { points } => Rect::enclosing(points.iter().copied())
                .unwrap_or_else(|| Rect::new(self.x, self.y, 0.0, 0.0)),
            ShapeKind::Line { x2, y2 } | ShapeKind::Arrow { x2, y2 } => {
                Rect::enclosing([self.anchor(), Point::new(*x2, *y2)])
                    .unwrap_or_else(|| Rect::new(self.x, self.y, 0.0, 0.0))
            }
            ShapeKind::Circle { radius } => {
                Rect::new(self.x - radius, self.y - radius, radius * 2.0, radius * 2.0)
            }
            ShapeKind::Text { .. } => Rect::new(
                self.x,
                self.y,
                self.width.unwrap_or(0.0),
                self.height.unwrap_or(0.0),
            ),
        }
    }

    /// Move the whole shape rigidly. Size and rotation are unchanged.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        match &mut self.kind {
            ShapeKind::Pencil { points } => {
                for p in points.iter_mut() {
                    p.x += dx;
                    p.y += dy;
                }
            }
            ShapeKind::Line { x2, y2 } | ShapeKind::Arrow { x2, y2 } => {
                *x2 += dx;
                *y2 += dy;
            }
            ShapeKind::Circle { .. } | ShapeKind::Text { .. } => {}
        }
    }

    pub fn move_anchor_to(&mut self, anchor: Point) {
        let delta = anchor - self.anchor();
        self.translate(delta.x, delta.y);
    }
}

/// Parse shapes received from a store, dropping entries that are malformed or
/// carry no id.
pub fn ingest(values: Vec<serde_json::Value>) -> Vec<Shape> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Shape>(value) {
            Ok(shape) if shape.id.trim().is_empty() => {
                log::warn!("dropping {} shape without an id", shape.kind.name());
                None
            }
            Ok(shape) => Some(shape),
            Err(err) => {
                log::warn!("dropping malformed shape: {}", err);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pencil(points: &[(f64, f64)]) -> Shape {
        let points: Vec<Point> = points.iter().map(|&p| p.into()).collect();
        Shape::new("pencil_1", points[0], ShapeKind::Pencil { points })
    }

    #[test]
    fn pencil_finalize_computes_bbox() {
        let mut shape = pencil(&[(2.0, 5.0), (10.0, 1.0), (7.0, 20.0)]);
        shape.finalize();

        assert_eq!((shape.x, shape.y), (2.0, 1.0));
        assert_eq!(shape.width, Some(8.0));
        assert_eq!(shape.height, Some(19.0));
    }

    #[test]
    fn single_point_pencil_is_degenerate_not_empty() {
        let mut shape = pencil(&[(4.0, 4.0)]);
        shape.finalize();
        assert_eq!(shape.width, Some(0.0));
        assert_eq!(shape.height, Some(0.0));
    }

    #[test]
    fn line_finalize_uses_absolute_deltas() {
        let mut shape = Shape::new(
            "line_1",
            Point::new(10.0, 10.0),
            ShapeKind::Line { x2: 4.0, y2: 30.0 },
        );
        shape.finalize();
        assert_eq!(shape.width, Some(6.0));
        assert_eq!(shape.height, Some(20.0));
    }

    #[test]
    fn circle_preview_tracks_pointer_distance() {
        let mut shape = Shape::preview(Tool::Circle, "circle_1", Point::new(0.0, 0.0)).unwrap();
        shape.extend_to(Point::new(3.0, 4.0));
        shape.finalize();

        assert_eq!(shape.kind, ShapeKind::Circle { radius: 5.0 });
        assert_eq!(shape.width, Some(10.0));
        assert_eq!(shape.bounds(), Rect::new(-5.0, -5.0, 10.0, 10.0));
    }

    #[test]
    fn non_drawing_tools_have_no_preview() {
        assert!(Shape::preview(Tool::Select, "x", Point::default()).is_none());
        assert!(Shape::preview(Tool::Text, "x", Point::default()).is_none());
    }

    #[test]
    fn translate_moves_every_point() {
        let mut shape = Shape::new("a", Point::new(1.0, 1.0), ShapeKind::Arrow { x2: 5.0, y2: 9.0 });
        shape.move_anchor_to(Point::new(11.0, 0.0));

        assert_eq!(shape.anchor(), Point::new(11.0, 0.0));
        assert_eq!(shape.kind, ShapeKind::Arrow { x2: 15.0, y2: 8.0 });
    }

    #[test]
    fn serializes_to_flat_wire_form() {
        let mut shape = Shape::new(
            "text_1",
            Point::new(1.0, 2.0),
            ShapeKind::Text {
                content: "hi".into(),
                font_size: Some(18.0),
                font_family: Some("Arial".into()),
                color: None,
            },
        );
        shape.page_id = Some("p1".into());

        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "text_1", "type": "text", "x": 1.0, "y": 2.0, "rotation": 0.0,
                "pageId": "p1", "content": "hi", "fontSize": 18.0, "fontFamily": "Arial"
            })
        );

        let back: Shape = serde_json::from_value(value).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn ingest_drops_invalid_entries() {
        let shapes = ingest(vec![
            json!({"id": "c1", "type": "circle", "x": 0, "y": 0, "radius": 4}),
            json!({"id": "", "type": "circle", "x": 0, "y": 0}),
            json!({"type": "line", "x": 0, "y": 0, "x2": 1, "y2": 1}),
            json!({"id": "q", "type": "hexagon", "x": 0, "y": 0}),
            json!({"id": "p1", "type": "pencil", "x": 1, "y": 1, "strokeColor": "#f00"}),
        ]);

        let ids: Vec<&str> = shapes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["c1", "p1"]);
        assert_eq!(shapes[0].rotation, 0.0);
        assert_eq!(shapes[1].stroke_color(), "#f00");
    }
}
