/// Vertical anchor for [`Surface::fill_text`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum TextBaseline {
    /// `y` is the top of the glyph box.
    Top,
    #[default]
    Alphabetic,
}

impl TextBaseline {
    pub fn as_str(self) -> &'static str {
        match self {
            TextBaseline::Top => "top",
            TextBaseline::Alphabetic => "alphabetic",
        }
    }
}

/// A 2D raster target driven with canvas-style immediate-mode calls.
///
/// `save`/`restore` push and pop the current transform and style state;
/// `translate`/`rotate` compose onto the current transform. Paths are built with
/// `begin_path`, `move_to`, `line_to` and `arc` and painted by `stroke`.
pub trait Surface {
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    /// Clockwise rotation in radians.
    fn rotate(&mut self, radians: f64);

    fn set_line_width(&mut self, width: f64);
    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    /// CSS font shorthand, e.g. `"18px Arial"`.
    fn set_font(&mut self, font: &str);
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64);
    fn stroke(&mut self);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}
