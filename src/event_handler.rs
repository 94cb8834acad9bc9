use crate::app_state::Editor;
use crate::drawing::{Shape, Tool, ingest};
use crate::hit_test::{ensure_text_extent, topmost_hit};
use crate::math::Point;
use crate::renderer::render;
use crate::replicate::ReplicationJob;
use crate::state::{Interaction, StrokeStyle, TextDraft, TextStyle};
use crate::surface::Surface;
use crate::transform::transform;

impl Editor {
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        let pointer = Point::new(x, y);

        // clicking away from the inline editor blurs it
        if matches!(self.state, Interaction::TextEditing { .. }) {
            self.text_commit();
        }
        if !self.state.is_idle() {
            log::debug!("pointer down ignored while {}", self.state.name());
            return;
        }

        match self.tool {
            Tool::Text => {
                self.selected_id = None;
                self.state = Interaction::TextEditing {
                    draft: TextDraft::new(pointer, self.text_style.clone()),
                };
            }
            Tool::Select => {
                match topmost_hit(&mut self.shapes, x, y, self.measurer.as_ref()) {
                    Some(index) => {
                        let shape = &self.shapes[index];
                        self.selected_id = Some(shape.id.clone());
                        self.state = Interaction::Dragging {
                            selected_id: shape.id.clone(),
                            offset: pointer - shape.anchor(),
                        };
                    }
                    None => self.selected_id = None,
                }
            }
            tool => {
                let id = self.mint_id(tool);
                let Some(mut preview) = Shape::preview(tool, id, pointer) else {
                    return;
                };
                preview.stroke_color = Some(self.stroke.color.clone());
                preview.stroke_width = Some(self.stroke.width);
                preview.page_id = self.page_id.clone();
                self.state = Interaction::Drawing { preview };
            }
        }
        log::debug!("pointer down at ({}, {}): {}", x, y, self.state.name());
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let pointer = Point::new(x, y);
        match &mut self.state {
            Interaction::Drawing { preview } => preview.extend_to(pointer),
            Interaction::Dragging {
                selected_id,
                offset,
            } => {
                let target = pointer - *offset;
                match self.shapes.iter_mut().find(|s| s.id == *selected_id) {
                    Some(shape) => shape.move_anchor_to(target),
                    None => {
                        log::debug!("dragged shape {} disappeared", selected_id);
                        self.state = Interaction::Idle;
                    }
                }
            }
            Interaction::Idle | Interaction::TextEditing { .. } => {}
        }
    }

    pub fn pointer_up(&mut self) {
        match std::mem::take(&mut self.state) {
            Interaction::Drawing { mut preview } => {
                preview.finalize();
                log::debug!("finalized {} {}", preview.kind.name(), preview.id);
                self.shapes.push(preview.clone());
                self.replicator.submit(ReplicationJob::Create(preview));
            }
            Interaction::Dragging { selected_id, .. } => {
                if let Some(shape) = self.shape(&selected_id) {
                    self.replicator.submit(ReplicationJob::Update(shape.clone()));
                }
            }
            other => self.state = other,
        }
    }

    /// Replace the draft's content with what is in the inline editor.
    pub fn text_change(&mut self, content: &str) {
        if let Interaction::TextEditing { draft } = &mut self.state {
            draft.content = content.to_string();
        }
    }

    pub fn draft_content(&self) -> Option<&str> {
        match &self.state {
            Interaction::TextEditing { draft } => Some(&draft.content),
            _ => None,
        }
    }

    /// Finish the text session. Blank drafts are dropped; anything else is
    /// measured and upserted by id.
    pub fn text_commit(&mut self) {
        if !matches!(self.state, Interaction::TextEditing { .. }) {
            return;
        }
        let Interaction::TextEditing { mut draft } = std::mem::take(&mut self.state) else {
            return;
        };

        let content = draft.content.trim();
        if content.is_empty() {
            log::debug!("discarding empty text draft");
            return;
        }
        draft.content = content.to_string();

        let extent = self.measurer.measure(
            &draft.content,
            draft.style.font_size,
            &draft.style.font_family,
        );
        let fresh_id = self.mint_id(Tool::Text);
        let mut shape = draft.to_shape(&fresh_id);
        shape.width = Some(extent.width);
        shape.height = Some(extent.height);
        shape.page_id = self.page_id.clone();

        match self.position(&shape.id) {
            Some(index) => {
                log::debug!("updated text {}", shape.id);
                self.shapes[index] = shape.clone();
                self.replicator.submit(ReplicationJob::Update(shape));
            }
            None => {
                log::debug!("created text {}", shape.id);
                self.shapes.push(shape.clone());
                self.replicator.submit(ReplicationJob::Create(shape));
            }
        }
    }

    pub fn text_cancel(&mut self) {
        if matches!(self.state, Interaction::TextEditing { .. }) {
            log::debug!("text draft cancelled");
            self.state = Interaction::Idle;
        }
    }

    /// Reopen an existing text shape in the inline editor. Returns false if
    /// there is no such text shape or another session is live.
    pub fn edit_text(&mut self, id: &str) -> bool {
        if matches!(self.state, Interaction::TextEditing { .. }) {
            self.text_commit();
        }
        if !self.state.is_idle() {
            return false;
        }
        let Some(draft) = self
            .shape(id)
            .and_then(|shape| TextDraft::from_shape(shape, &self.text_style))
        else {
            return false;
        };
        self.selected_id = Some(id.to_string());
        self.state = Interaction::TextEditing { draft };
        true
    }

    pub fn delete_shape(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.shapes.remove(index);
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = None;
        }
        if matches!(&self.state, Interaction::Dragging { selected_id, .. } if selected_id == id) {
            self.state = Interaction::Idle;
        }
        self.replicator.submit(ReplicationJob::Delete { id: id.to_string() });
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected_id.clone() {
            Some(id) => self.delete_shape(&id),
            None => false,
        }
    }

    /// Scale and rotate a finalized shape about `center`, replacing it in place.
    pub fn transform_shape(
        &mut self,
        id: &str,
        center: Point,
        scale_x: f64,
        scale_y: f64,
        rotate_deg: f64,
    ) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        ensure_text_extent(&mut self.shapes[index], self.measurer.as_ref());
        let transformed = transform(&self.shapes[index], center, scale_x, scale_y, rotate_deg);
        self.shapes[index] = transformed.clone();
        self.replicator.submit(ReplicationJob::Update(transformed));
        true
    }

    /// Make another page's shapes the active collection, abandoning any live
    /// session. Returns the shapes that were active.
    pub fn switch_page(&mut self, page_id: Option<String>, shapes: Vec<Shape>) -> Vec<Shape> {
        if !self.state.is_idle() {
            log::debug!("abandoning {} session on page switch", self.state.name());
        }
        self.state = Interaction::Idle;
        self.selected_id = None;
        self.page_id = page_id;
        std::mem::replace(&mut self.shapes, shapes)
    }

    /// Replace the active collection with records fetched from a store.
    /// Records that are not valid shapes are dropped. Returns how many loaded.
    pub fn load_shapes(&mut self, records: Vec<serde_json::Value>) -> usize {
        let shapes = ingest(records);
        let loaded = shapes.len();
        let page_id = self.page_id.clone();
        self.switch_page(page_id, shapes);
        log::info!("loaded {} shape(s)", loaded);
        loaded
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            log::debug!("tool {} -> {}", self.tool.as_str(), tool.as_str());
            self.tool = tool;
        }
    }

    pub fn set_text_style(&mut self, style: TextStyle) {
        self.text_style = style;
    }

    pub fn set_stroke_style(&mut self, stroke: StrokeStyle) {
        self.stroke = stroke;
    }

    /// The in-progress shape to draw above the collection, if any. Text drafts
    /// only show once they have content.
    pub fn preview_shape(&self) -> Option<Shape> {
        match &self.state {
            Interaction::Drawing { preview } => Some(preview.clone()),
            Interaction::TextEditing { draft } if !draft.content.is_empty() => {
                Some(draft.to_shape("text_draft"))
            }
            _ => None,
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let preview = self.preview_shape();
        render(surface, &self.shapes, preview.as_ref());
    }
}
