use crate::config::EditorConfig;
use crate::drawing::{Shape, Tool};
use crate::replicate::{NoReplication, Replicate};
use crate::state::{Interaction, StrokeStyle, TextStyle};
use crate::text::TextMeasurer;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use web_time::{SystemTime, UNIX_EPOCH};
    } else {
        use std::time::{SystemTime, UNIX_EPOCH};
    }
}

/// Milliseconds since the Unix epoch; the timestamp half of minted shape ids.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The interaction controller for one canvas: owns the active page's shapes
/// and whatever pointer or text session is live.
pub struct Editor {
    pub(crate) tool: Tool,
    pub(crate) text_style: TextStyle,
    pub(crate) stroke: StrokeStyle,
    pub(crate) page_id: Option<String>,

    pub(crate) shapes: Vec<Shape>,
    pub(crate) state: Interaction,
    pub(crate) selected_id: Option<String>,

    pub(crate) measurer: Box<dyn TextMeasurer>,
    pub(crate) replicator: Box<dyn Replicate>,
    pub(crate) clock: fn() -> u64,
}

impl Editor {
    pub fn new(measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            tool: Tool::default(),
            text_style: TextStyle::default(),
            stroke: StrokeStyle::default(),
            page_id: None,
            shapes: Vec::new(),
            state: Interaction::Idle,
            selected_id: None,
            measurer,
            replicator: Box::new(NoReplication),
            clock: now_millis,
        }
    }

    pub fn from_config(config: &EditorConfig) -> anyhow::Result<Self> {
        Ok(Self::configured(config, config.build_measurer()?))
    }

    /// Tool and styles from `config`, measuring with `measurer`.
    pub fn configured(config: &EditorConfig, measurer: Box<dyn TextMeasurer>) -> Self {
        let mut editor = Self::new(measurer);
        editor.tool = config.tool;
        editor.text_style = config.text_style.clone();
        editor.stroke = config.stroke.clone();
        editor
    }

    pub fn with_replicator(mut self, replicator: Box<dyn Replicate>) -> Self {
        self.replicator = replicator;
        self
    }

    /// Override the millisecond clock used for shape ids.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_page(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    pub fn stroke_style(&self) -> &StrokeStyle {
        &self.stroke
    }

    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    /// Finalized shapes in paint order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    pub(crate) fn mint_id(&self, tool: Tool) -> String {
        format!("{}_{}", tool.as_str(), (self.clock)())
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("tool", &self.tool)
            .field("page_id", &self.page_id)
            .field("shapes", &self.shapes.len())
            .field("state", &self.state.name())
            .field("selected_id", &self.selected_id)
            .finish()
    }
}
