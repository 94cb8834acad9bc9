use crate::color::linear_or_black;
use crate::drawing::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH};
use crate::math::{Affine2, PI, Point};
use crate::surface::{Surface, TextBaseline};
use crate::text::{GlyphMeasurer, em_scale, parse_font_spec};
use ab_glyph::{Font, ScaleFont};

pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

/// Upper bound on straight segments used to flatten one full circle.
const MAX_ARC_SEGMENTS: f64 = 128.0;
const MIN_ARC_SEGMENTS: f64 = 16.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Text no loaded face could paint, already placed in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Top-left of the glyph box.
    pub origin: [f32; 2],
    /// Accumulated clockwise rotation, radians.
    pub rotation: f32,
    pub content: String,
    pub font_size: f32,
    pub font_family: String,
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
struct DrawState {
    transform: Affine2,
    stroke: [f32; 4],
    fill: [f32; 4],
    line_width: f64,
    font_size: f64,
    font_family: String,
    baseline: TextBaseline,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::identity(),
            stroke: linear_or_black(DEFAULT_STROKE_COLOR),
            fill: [0.0, 0.0, 0.0, 1.0],
            line_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            baseline: TextBaseline::Alphabetic,
        }
    }
}

/// A [`Surface`] that builds triangle lists for the GPU.
///
/// Every stroked segment becomes a quad of two triangles; arcs are flattened to
/// polylines first. Text is rasterised with the tessellator's faces where it
/// is drawn, so it keeps its place in the paint order. Runs with no face are
/// kept in `text_runs`.
#[derive(Debug, Default)]
pub struct Tessellator {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub text_runs: Vec<TextRun>,
    fonts: GlyphMeasurer,
    state: DrawState,
    stack: Vec<DrawState>,
    /// Subpaths in canvas space.
    path: Vec<Vec<Point>>,
}

impl Tessellator {
    /// A tessellator with no faces; text is only queued.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fonts(fonts: GlyphMeasurer) -> Self {
        Self {
            fonts,
            ..Self::default()
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    fn to_canvas(&self, x: f64, y: f64) -> Point {
        self.state.transform.transform_point(Point::new(x, y))
    }

    fn push_segment(&mut self, p1: Point, p2: Point, half_width: f64, color: [f32; 4]) {
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= 0.0 {
            return;
        }
        let nx = -dy / len * half_width;
        let ny = dx / len * half_width;

        self.push_quad(
            [
                Point::new(p1.x - nx, p1.y - ny),
                Point::new(p1.x + nx, p1.y + ny),
                Point::new(p2.x + nx, p2.y + ny),
                Point::new(p2.x - nx, p2.y - ny),
            ],
            color,
        );
    }

    fn push_quad(&mut self, corners: [Point; 4], color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        for p in corners {
            self.vertices.push(Vertex {
                position: [p.x as f32, p.y as f32],
                color,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Rasterise `run` into coverage quads, one per covered pixel, tinted
    /// with the run colour. False when no face can draw its family.
    fn paint_run(&mut self, run: &TextRun) -> bool {
        let Some(font) = self.fonts.face(&run.font_family).cloned() else {
            return false;
        };
        let scale = em_scale(&font, run.font_size as f64);
        let scaled = font.as_scaled(scale);
        let to_canvas = Affine2::from_translation(Point::new(run.origin[0] as f64, run.origin[1] as f64))
            * Affine2::from_rotation(run.rotation as f64);

        let mut coverage = Vec::new();
        let mut caret = 0.0f32;
        let mut prev = None;
        for ch in run.content.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            prev = Some(id);

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, c| {
                    if c > 0.02 {
                        coverage.push((bounds.min.x + gx as f32, bounds.min.y + gy as f32, c));
                    }
                });
            }
        }

        for (px, py, c) in coverage {
            let (x, y) = (px as f64, py as f64);
            let corners = [
                to_canvas.transform_point(Point::new(x, y)),
                to_canvas.transform_point(Point::new(x + 1.0, y)),
                to_canvas.transform_point(Point::new(x + 1.0, y + 1.0)),
                to_canvas.transform_point(Point::new(x, y + 1.0)),
            ];
            let mut color = run.color;
            color[3] *= c.min(1.0);
            self.push_quad(corners, color);
        }
        true
    }
}

impl Surface for Tessellator {
    fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.text_runs.clear();
        self.path.clear();
        self.stack.clear();
        self.state = DrawState::default();
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform * Affine2::from_translation(Point::new(dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform = self.state.transform * Affine2::from_rotation(radians);
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.state.stroke = linear_or_black(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.state.fill = linear_or_black(color);
    }

    fn set_font(&mut self, font: &str) {
        match parse_font_spec(font) {
            Some((size, family)) => {
                self.state.font_size = size;
                self.state.font_family = family.to_string();
            }
            None => log::debug!("ignoring unparseable font {:?}", font),
        }
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = self.to_canvas(x, y);
        self.path.push(vec![p]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.to_canvas(x, y);
        match self.path.last_mut() {
            Some(subpath) => subpath.push(p),
            None => self.path.push(vec![p]),
        }
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        let sweep = end - start;
        let min_steps = (MIN_ARC_SEGMENTS * sweep.abs() / (2.0 * PI)).ceil();
        let steps = (radius.abs() * sweep.abs() / 4.0)
            .ceil()
            .max(min_steps)
            .min(MAX_ARC_SEGMENTS)
            .max(1.0) as usize;
        for i in 0..=steps {
            let angle = start + sweep * i as f64 / steps as f64;
            // the first sample joins any open subpath, as a canvas arc does
            self.line_to(cx + radius * angle.cos(), cy + radius * angle.sin());
        }
    }

    fn stroke(&mut self) {
        let half_width = self.state.line_width * self.state.transform.mean_scale() / 2.0;
        let color = self.state.stroke;
        let path = std::mem::take(&mut self.path);
        for subpath in &path {
            for pair in subpath.windows(2) {
                self.push_segment(pair[0], pair[1], half_width, color);
            }
        }
        self.path = path;
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        if text.is_empty() {
            return;
        }
        // glyph pipelines place runs by their top edge
        let top = match self.state.baseline {
            TextBaseline::Top => y,
            TextBaseline::Alphabetic => y - self.state.font_size * crate::text::APPROX_ASCENT,
        };
        let origin = self.to_canvas(x, top);
        let run = TextRun {
            origin: [origin.x as f32, origin.y as f32],
            rotation: self.state.transform.rotation() as f32,
            content: text.to_string(),
            font_size: self.state.font_size as f32,
            font_family: self.state.font_family.clone(),
            color: self.state.fill,
        };
        if !self.paint_run(&run) {
            self.text_runs.push(run);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Shape, ShapeKind};
    use crate::renderer::render;

    #[test]
    fn each_segment_becomes_a_quad() {
        let mut t = Tessellator::new();
        let pencil = Shape::new(
            "p",
            Point::new(0.0, 0.0),
            ShapeKind::Pencil {
                points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            },
        );
        render(&mut t, &[pencil], None);

        assert_eq!(t.vertices.len(), 8);
        assert_eq!(t.index_count(), 12);
        // width 2 -> one unit either side of the x axis
        assert_eq!(t.vertices[0].position, [0.0, -1.0]);
        assert_eq!(t.vertices[1].position, [0.0, 1.0]);
    }

    #[test]
    fn stroke_colour_comes_from_shape() {
        let mut t = Tessellator::new();
        let mut line = Shape::new("l", Point::new(0.0, 0.0), ShapeKind::Line { x2: 5.0, y2: 0.0 });
        line.stroke_color = Some("#ff0000".into());
        render(&mut t, &[line], None);

        assert!(t.vertices.iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn zero_length_line_produces_no_geometry() {
        let mut t = Tessellator::new();
        let line = Shape::new("l", Point::new(3.0, 3.0), ShapeKind::Line { x2: 3.0, y2: 3.0 });
        render(&mut t, &[line], None);
        assert!(t.vertices.is_empty());
    }

    #[test]
    fn circle_is_flattened_around_its_centre() {
        let mut t = Tessellator::new();
        let circle = Shape::new("c", Point::new(50.0, 50.0), ShapeKind::Circle { radius: 20.0 });
        render(&mut t, &[circle], None);

        assert!(t.vertices.len() >= 4 * MIN_ARC_SEGMENTS as usize);
        for v in &t.vertices {
            let d = Point::new(v.position[0] as f64, v.position[1] as f64).distance(Point::new(50.0, 50.0));
            assert!((d - 20.0).abs() < 1.5, "vertex {:?} off the outline", v.position);
        }
    }

    #[test]
    fn rotation_does_not_leak_between_shapes() {
        let mut t = Tessellator::new();
        let mut rotated = Shape::new("a", Point::new(0.0, 0.0), ShapeKind::Line { x2: 10.0, y2: 0.0 });
        rotated.rotation = 90.0;
        let plain = Shape::new("b", Point::new(0.0, 0.0), ShapeKind::Line { x2: 10.0, y2: 0.0 });
        render(&mut t, &[rotated, plain], None);

        // second quad starts back on the x axis
        assert_eq!(t.vertices[4].position, [0.0, -1.0]);
        // first quad was turned upright about (5, 0)
        let [x, _] = t.vertices[0].position;
        assert!((x - 6.0).abs() < 1e-4 || (x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn text_runs_are_collected() {
        let mut t = Tessellator::new();
        let text = Shape::new(
            "t",
            Point::new(7.0, 8.0),
            ShapeKind::Text {
                content: "hello".into(),
                font_size: Some(24.0),
                font_family: Some("Virgil".into()),
                color: Some("#00ff00".into()),
            },
        );
        render(&mut t, &[text], None);

        assert_eq!(
            t.text_runs,
            vec![TextRun {
                origin: [7.0, 8.0],
                rotation: 0.0,
                content: "hello".into(),
                font_size: 24.0,
                font_family: "Virgil".into(),
                color: [0.0, 1.0, 0.0, 1.0],
            }]
        );
    }

    #[test]
    fn text_without_faces_stays_queued() {
        let mut t = Tessellator::new();
        let text = Shape::new(
            "t",
            Point::default(),
            ShapeKind::Text {
                content: "hi".into(),
                font_size: None,
                font_family: None,
                color: None,
            },
        );
        render(&mut t, &[text], None);

        assert_eq!(t.text_runs.len(), 1);
        assert!(t.vertices.is_empty());
    }

    fn red_text(content: &str) -> Shape {
        Shape::new(
            "t",
            Point::new(10.0, 10.0),
            ShapeKind::Text {
                content: content.into(),
                font_size: Some(24.0),
                font_family: Some("Arial".into()),
                color: Some("#ff0000".into()),
            },
        )
    }

    #[test]
    fn glyph_quads_take_the_run_colour() {
        let mut t = Tessellator::with_fonts(GlyphMeasurer::with_bundled_face());
        render(&mut t, &[red_text("HELLO")], None);

        assert!(t.text_runs.is_empty());
        assert!(!t.vertices.is_empty());
        assert_eq!(t.indices.len() * 4, t.vertices.len() * 6);
        for v in &t.vertices {
            assert_eq!(v.color[..3], [1.0, 0.0, 0.0]);
            assert!(v.color[3] > 0.0 && v.color[3] <= 1.0);
            // below and right of the anchor, within one line of 24px text
            assert!(v.position[0] >= 9.0 && v.position[1] >= 9.0, "{:?}", v.position);
            assert!(v.position[1] <= 10.0 + 24.0 * 1.5, "{:?}", v.position);
        }
    }

    #[test]
    fn text_keeps_its_place_in_paint_order() {
        let mut t = Tessellator::with_fonts(GlyphMeasurer::with_bundled_face());
        let mut stroke = Shape::new(
            "p",
            Point::new(0.0, 20.0),
            ShapeKind::Pencil {
                points: vec![Point::new(0.0, 20.0), Point::new(120.0, 20.0)],
            },
        );
        stroke.stroke_color = Some("#0000ff".into());
        stroke.stroke_width = Some(10.0);
        render(&mut t, &[red_text("HELLO"), stroke], None);

        let blue = [0.0, 0.0, 1.0, 1.0];
        let first = t.vertices[t.indices[0] as usize];
        assert_eq!(first.color[..3], [1.0, 0.0, 0.0]);
        // the stroke is the last quad drawn
        let tail = &t.indices[t.indices.len() - 6..];
        assert!(tail.iter().all(|&i| t.vertices[i as usize].color == blue));
        let blue_quads = t.vertices.iter().filter(|v| v.color == blue).count();
        assert_eq!(blue_quads, 4);
    }

    #[test]
    fn clear_resets_everything() {
        let mut t = Tessellator::new();
        let line = Shape::new("l", Point::new(0.0, 0.0), ShapeKind::Line { x2: 5.0, y2: 0.0 });
        render(&mut t, &[line.clone()], None);
        render(&mut t, &[], None);
        assert!(t.vertices.is_empty());
        assert!(t.indices.is_empty());
        assert!(t.text_runs.is_empty());
    }
}
