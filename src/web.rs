//! Browser text metrics through an offscreen 2D canvas context.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::text::{APPROX_ASCENT, APPROX_DESCENT, TextExtent, TextMeasurer, font_spec};

pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// A measurer backed by a detached canvas that is never shown.
pub fn offscreen_measurer() -> Option<CanvasMeasurer> {
    let canvas = web_sys::window()?
        .document()?
        .create_element("canvas")
        .ok()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    context_2d(&canvas).map(CanvasMeasurer::new)
}

/// Measures with the browser's own text layout.
pub struct CanvasMeasurer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasMeasurer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasurer for CanvasMeasurer {
    fn measure(&self, content: &str, font_size: f64, font_family: &str) -> TextExtent {
        self.ctx.save();
        self.ctx.set_font(&font_spec(font_size, font_family));
        let metrics = self.ctx.measure_text(content);
        self.ctx.restore();

        let Ok(metrics) = metrics else {
            return TextExtent {
                width: 0.0,
                height: (font_size * APPROX_ASCENT + font_size * APPROX_DESCENT).ceil(),
            };
        };
        let usable = |v: f64| v.is_finite() && v > 0.0;
        let ascent = metrics.actual_bounding_box_ascent();
        let descent = metrics.actual_bounding_box_descent();
        let ascent = if usable(ascent) { ascent } else { font_size * APPROX_ASCENT };
        let descent = if usable(descent) { descent } else { font_size * APPROX_DESCENT };

        TextExtent {
            width: metrics.width().max(0.0).ceil(),
            height: (ascent + descent).ceil(),
        }
    }
}
