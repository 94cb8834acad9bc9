use serde::{Deserialize, Serialize};

use crate::drawing::{DEFAULT_FONT_FAMILY, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, Shape, ShapeKind};
use crate::math::Point;

/// What the pointer and keyboard are currently doing. Exactly one session can
/// be live at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Drawing {
        preview: Shape,
    },
    Dragging {
        selected_id: String,
        /// Pointer minus the shape's anchor at pointer-down.
        offset: Point,
    },
    TextEditing {
        draft: TextDraft,
    },
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Drawing { .. } => "drawing",
            Interaction::Dragging { .. } => "dragging",
            Interaction::TextEditing { .. } => "text-editing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: 18.0,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_STROKE_COLOR.to_string(),
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Text being typed into the inline editor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraft {
    /// Set when re-editing an existing shape; its id is reused on commit.
    pub id: Option<String>,
    pub anchor: Point,
    pub content: String,
    pub style: TextStyle,
    pub rotation: f64,
}

impl TextDraft {
    pub fn new(anchor: Point, style: TextStyle) -> Self {
        Self {
            id: None,
            anchor,
            content: String::new(),
            style,
            rotation: 0.0,
        }
    }

    /// Draft for re-editing `shape`. `None` for non-text shapes.
    pub fn from_shape(shape: &Shape, fallback: &TextStyle) -> Option<Self> {
        let ShapeKind::Text {
            content,
            font_size,
            font_family,
            color,
        } = &shape.kind
        else {
            return None;
        };
        Some(Self {
            id: Some(shape.id.clone()),
            anchor: shape.anchor(),
            content: content.clone(),
            style: TextStyle {
                font_family: font_family.clone().unwrap_or_else(|| fallback.font_family.clone()),
                font_size: font_size.unwrap_or(fallback.font_size),
                color: color.clone().unwrap_or_else(|| fallback.color.clone()),
            },
            rotation: shape.rotation,
        })
    }

    /// The shape this draft would render as, with `id` standing in for a
    /// fresh id. Width and height are left for measurement.
    pub fn to_shape(&self, id: &str) -> Shape {
        let mut shape = Shape::new(
            self.id.as_deref().unwrap_or(id),
            self.anchor,
            ShapeKind::Text {
                content: self.content.clone(),
                font_size: Some(self.style.font_size),
                font_family: Some(self.style.font_family.clone()),
                color: Some(self.style.color.clone()),
            },
        );
        shape.rotation = self.rotation;
        shape
    }
}
