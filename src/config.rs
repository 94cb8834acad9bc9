use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::drawing::Tool;
use crate::state::{StrokeStyle, TextStyle};
use crate::text::{GlyphMeasurer, TextMeasurer};

/// A font face to load for text measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSource {
    pub family: String,
    pub path: PathBuf,
}

/// Start-up settings for an [`Editor`](crate::Editor). Every field is optional
/// in the JSON form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub tool: Tool,
    pub text_style: TextStyle,
    pub stroke: StrokeStyle,
    /// The first face also measures any family not listed here. The bundled
    /// face covers everything when this is empty.
    pub fonts: Vec<FontSource>,
    /// A JSON array of stored shape records to open the board with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shapes: Option<PathBuf>,
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse editor config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read editor config {}", path.display()))?;
        let config = Self::from_json(&content)?;
        log::info!("loaded editor config from {}", path.display());
        Ok(config)
    }

    /// The bundled face plus every configured face.
    pub fn load_fonts(&self) -> Result<GlyphMeasurer> {
        let mut measurer = GlyphMeasurer::with_bundled_face();
        for font in &self.fonts {
            measurer
                .add_font_file(&font.family, &font.path)
                .with_context(|| format!("Failed to load font {:?}", font.family))?;
        }
        Ok(measurer)
    }

    /// Glyph-backed measurement with the same faces text is painted with.
    pub fn build_measurer(&self) -> Result<Box<dyn TextMeasurer>> {
        Ok(Box::new(self.load_fonts()?))
    }

    /// Raw shape records from the `shapes` file, unvalidated. Empty when no
    /// file is configured.
    pub fn load_shape_records(&self) -> Result<Vec<Value>> {
        let Some(path) = &self.shapes else {
            return Ok(Vec::new());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read shapes {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of shapes", path.display()))
    }
}
