use crate::drawing::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR, Shape, ShapeKind};
use crate::math::PI;
use crate::surface::{Surface, TextBaseline};
use crate::text::font_spec;

/// Length of each arrowhead stroke.
pub const ARROW_HEAD_LENGTH: f64 = 10.0;
/// Angle between each arrowhead stroke and the reversed shaft.
pub const ARROW_HEAD_ANGLE: f64 = PI / 6.0;

/// Clear the surface, paint `shapes` in order (later ones on top), then the
/// preview above everything.
pub fn render<S: Surface + ?Sized>(surface: &mut S, shapes: &[Shape], preview: Option<&Shape>) {
    surface.clear();
    for shape in shapes {
        draw_shape(surface, shape);
    }
    if let Some(preview) = preview {
        draw_shape(surface, preview);
    }
}

/// Paint one shape. All transform and style changes are scoped to this call.
pub fn draw_shape<S: Surface + ?Sized>(surface: &mut S, shape: &Shape) {
    surface.save();
    surface.set_line_width(shape.stroke_width());
    surface.set_stroke_style(shape.stroke_color());

    if shape.rotation != 0.0 {
        let pivot = shape.bounds().center();
        surface.translate(pivot.x, pivot.y);
        surface.rotate(shape.rotation * PI / 180.0);
        surface.translate(-pivot.x, -pivot.y);
    }

    match &shape.kind {
        ShapeKind::Pencil { points } => {
            if let Some((first, rest)) = points.split_first() {
                surface.begin_path();
                surface.move_to(first.x, first.y);
                for p in rest {
                    surface.line_to(p.x, p.y);
                }
                surface.stroke();
            }
        }
        ShapeKind::Line { x2, y2 } => {
            draw_segment(surface, shape.x, shape.y, *x2, *y2);
        }
        ShapeKind::Arrow { x2, y2 } => {
            draw_segment(surface, shape.x, shape.y, *x2, *y2);
            draw_arrow_head(surface, shape.x, shape.y, *x2, *y2);
        }
        ShapeKind::Circle { radius } => {
            surface.begin_path();
            surface.arc(shape.x, shape.y, radius.max(0.0), 0.0, PI * 2.0);
            surface.stroke();
        }
        ShapeKind::Text {
            content,
            font_size,
            font_family,
            color,
        } => {
            let size = font_size.unwrap_or(DEFAULT_FONT_SIZE);
            let family = font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY);
            surface.set_font(&font_spec(size, family));
            surface.set_fill_style(color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR));
            surface.set_text_baseline(TextBaseline::Top);
            surface.fill_text(content, shape.x, shape.y);
        }
    }

    surface.restore();
}

fn draw_segment<S: Surface + ?Sized>(surface: &mut S, x1: f64, y1: f64, x2: f64, y2: f64) {
    surface.begin_path();
    surface.move_to(x1, y1);
    surface.line_to(x2, y2);
    surface.stroke();
}

fn draw_arrow_head<S: Surface + ?Sized>(surface: &mut S, x1: f64, y1: f64, x2: f64, y2: f64) {
    let angle = (y2 - y1).atan2(x2 - x1);
    surface.begin_path();
    for side in [angle - ARROW_HEAD_ANGLE, angle + ARROW_HEAD_ANGLE] {
        surface.move_to(x2, y2);
        surface.line_to(
            x2 - ARROW_HEAD_LENGTH * side.cos(),
            y2 - ARROW_HEAD_LENGTH * side.sin(),
        );
    }
    surface.stroke();
}
