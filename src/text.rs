use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::FontError;

/// Ascent used when the font backend cannot report one, as a fraction of the font size.
pub const APPROX_ASCENT: f64 = 0.8;
/// Descent used when the font backend cannot report one, as a fraction of the font size.
pub const APPROX_DESCENT: f64 = 0.2;
/// Average advance per character for the approximate measurer.
const APPROX_ADVANCE: f64 = 0.6;

/// Family name the face shipped with the crate answers to.
pub const BUNDLED_FAMILY: &str = "DejaVu Sans";
const BUNDLED_FONT: &[u8] = include_bytes!("../data/fonts/DejaVuSans.ttf");

/// Rendered size of a run of text, both sides rounded up to whole pixels.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Computes the box a piece of text occupies when drawn with
/// `"{font_size}px {font_family}"`.
///
/// Implementations must be pure: measuring never touches shape data.
pub trait TextMeasurer {
    fn measure(&self, content: &str, font_size: f64, font_family: &str) -> TextExtent;
}

/// The CSS-style font shorthand a canvas would be configured with.
pub fn font_spec(font_size: f64, font_family: &str) -> String {
    format!("{}px {}", font_size, font_family)
}

/// Split a `"{size}px {family}"` shorthand back into its parts.
pub fn parse_font_spec(spec: &str) -> Option<(f64, &str)> {
    let (size, family) = spec.trim().split_once(' ')?;
    let size = size.strip_suffix("px")?.parse().ok()?;
    Some((size, family.trim()))
}

/// Font-agnostic estimate: a fixed advance per character and the
/// 0.8/0.2 ascent/descent split.
#[derive(Debug, Default, Copy, Clone)]
pub struct ApproxMeasurer;

impl TextMeasurer for ApproxMeasurer {
    fn measure(&self, content: &str, font_size: f64, _font_family: &str) -> TextExtent {
        let advance = content.chars().count() as f64 * font_size * APPROX_ADVANCE;
        TextExtent {
            width: advance.ceil(),
            height: (font_size * APPROX_ASCENT + font_size * APPROX_DESCENT).ceil(),
        }
    }
}

/// Measures with real glyph metrics from loaded font faces.
///
/// Families are matched case-insensitively. Unknown families use the first
/// registered face, then the bundled one; with no faces at all the
/// approximate measurer answers.
#[derive(Default, Clone)]
pub struct GlyphMeasurer {
    fonts: HashMap<String, FontArc>,
    fallback: Option<FontArc>,
    bundled: Option<FontArc>,
}

impl fmt::Debug for GlyphMeasurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut families: Vec<&String> = self.fonts.keys().collect();
        families.sort();
        f.debug_struct("GlyphMeasurer")
            .field("families", &families)
            .field("bundled", &self.bundled.is_some())
            .finish()
    }
}

impl GlyphMeasurer {
    /// No faces at all: measures approximately and paints nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the bundled face, which answers for any family that has
    /// no face of its own.
    pub fn with_bundled_face() -> Self {
        let mut measurer = Self::default();
        match FontArc::try_from_slice(BUNDLED_FONT) {
            Ok(font) => {
                measurer
                    .fonts
                    .insert(BUNDLED_FAMILY.to_lowercase(), font.clone());
                measurer.bundled = Some(font);
            }
            Err(err) => log::warn!("bundled font face is unusable: {}", err),
        }
        measurer
    }

    /// Register a face for `family`. The first face registered this way also
    /// becomes the fallback, ahead of the bundled face.
    pub fn add_font(&mut self, family: &str, data: Vec<u8>) -> Result<(), FontError> {
        let font = FontArc::try_from_vec(data).map_err(|source| FontError::Invalid {
            family: family.to_string(),
            source,
        })?;
        if self.fallback.is_none() {
            self.fallback = Some(font.clone());
        }
        self.fonts.insert(family.to_lowercase(), font);
        log::debug!("loaded font face for {:?}", family);
        Ok(())
    }

    pub fn add_font_file(&mut self, family: &str, path: &Path) -> Result<(), FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_font(family, data)
    }

    pub fn has_fonts(&self) -> bool {
        self.fallback.is_some() || self.bundled.is_some()
    }

    /// The face used for `family`.
    pub fn face(&self, family: &str) -> Option<&FontArc> {
        self.fonts
            .get(&family.to_lowercase())
            .or(self.fallback.as_ref())
            .or(self.bundled.as_ref())
    }
}

/// ab_glyph scales by ascent-to-descent height; CSS px sizes are em sizes.
pub fn em_scale(font: &FontArc, font_size: f64) -> PxScale {
    let px = font_size as f32;
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(px * font.height_unscaled() / upem),
        _ => PxScale::from(px),
    }
}

impl TextMeasurer for GlyphMeasurer {
    fn measure(&self, content: &str, font_size: f64, font_family: &str) -> TextExtent {
        let Some(font) = self.face(font_family) else {
            return ApproxMeasurer.measure(content, font_size, font_family);
        };

        let scaled = font.as_scaled(em_scale(font, font_size));

        let mut pen_x = 0.0f32;
        let mut prev_gid: Option<ab_glyph::GlyphId> = None;
        for ch in content.chars() {
            let gid = font.glyph_id(ch);
            if let Some(prev) = prev_gid {
                pen_x += scaled.kern(prev, gid);
            }
            pen_x += scaled.h_advance(gid);
            prev_gid = Some(gid);
        }

        let ascent = scaled.ascent() as f64;
        let descent = -(scaled.descent() as f64);
        let ascent = if ascent > 0.0 { ascent } else { font_size * APPROX_ASCENT };
        let descent = if descent > 0.0 { descent } else { font_size * APPROX_DESCENT };

        TextExtent {
            width: (pen_x.max(0.0) as f64).ceil(),
            height: (ascent + descent).ceil(),
        }
    }
}
