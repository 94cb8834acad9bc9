use crate::app_state::Editor;
use crate::config::EditorConfig;
use crate::drawing::Tool;
use crate::gpu::GpuCanvas;
use crate::math::Point;
use crate::tessellate::Tessellator;
use crate::text::{GlyphMeasurer, TextMeasurer};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, KeyCode, NamedKey, PhysicalKey},
    window::{Window, WindowId},
};

/// Tool bound to a number key, in toolbar order.
pub fn tool_for_key(key: &str) -> Option<Tool> {
    match key {
        "1" => Some(Tool::Select),
        "2" => Some(Tool::Pencil),
        "3" => Some(Tool::Line),
        "4" => Some(Tool::Arrow),
        "5" => Some(Tool::Circle),
        "6" => Some(Tool::Text),
        _ => None,
    }
}

/// Translates window events into editor events. Returns whether the event
/// was consumed.
#[derive(Debug, Default)]
pub struct WindowInput {
    cursor: Point,
}

impl WindowInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn handle(&mut self, editor: &mut Editor, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point::new(position.x, position.y);
                editor.pointer_move(position.x, position.y);
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => editor.pointer_down(self.cursor.x, self.cursor.y),
                    ElementState::Released => editor.pointer_up(),
                }
                true
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key,
                        text,
                        ..
                    },
                ..
            } => self.key(editor, logical_key, text.as_deref()),
            WindowEvent::Ime(Ime::Commit(committed)) => match editor.draft_content() {
                Some(current) => {
                    let content = format!("{}{}", current, committed);
                    editor.text_change(&content);
                    true
                }
                None => false,
            },
            WindowEvent::Focused(false) => {
                if editor.draft_content().is_some() {
                    editor.text_commit();
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// A pressed key, with the text it would type if any.
    pub fn key(&mut self, editor: &mut Editor, key: &Key, text: Option<&str>) -> bool {
        if let Some(current) = editor.draft_content() {
            match key {
                Key::Named(NamedKey::Enter) => editor.text_commit(),
                Key::Named(NamedKey::Escape) => editor.text_cancel(),
                Key::Named(NamedKey::Backspace) => {
                    let mut content = current.to_string();
                    content.pop();
                    editor.text_change(&content);
                }
                _ => {
                    let typed = text.unwrap_or_default();
                    if typed.is_empty() || typed.chars().any(char::is_control) {
                        return false;
                    }
                    let content = format!("{}{}", current, typed);
                    editor.text_change(&content);
                }
            }
            return true;
        }

        match key {
            Key::Named(NamedKey::Delete | NamedKey::Backspace) => editor.delete_selected(),
            Key::Character(c) => match tool_for_key(c.as_str()) {
                Some(tool) => {
                    editor.set_tool(tool);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

/// The browser lays text out itself, so measure with its metrics.
#[cfg(target_arch = "wasm32")]
fn text_measurer(glyphs: &GlyphMeasurer) -> Box<dyn TextMeasurer> {
    match crate::web::offscreen_measurer() {
        Some(measurer) => Box::new(measurer),
        None => {
            log::warn!("no 2d canvas context, measuring text with glyph metrics");
            Box::new(glyphs.clone())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn text_measurer(glyphs: &GlyphMeasurer) -> Box<dyn TextMeasurer> {
    Box::new(glyphs.clone())
}

struct App {
    config: EditorConfig,
    editor: Editor,
    input: WindowInput,
    tessellator: Tessellator,
    window: Option<Arc<Window>>,
    gpu: Option<GpuCanvas>,
}

impl App {
    fn new(config: EditorConfig) -> anyhow::Result<Self> {
        let glyphs = config.load_fonts()?;
        let mut editor = Editor::configured(&config, text_measurer(&glyphs));
        let records = config.load_shape_records()?;
        if !records.is_empty() {
            editor.load_shapes(records);
        }
        Ok(Self {
            config,
            editor,
            input: WindowInput::new(),
            tessellator: Tessellator::with_fonts(glyphs),
            window: None,
            gpu: None,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        self.editor.render(&mut self.tessellator);
        gpu.upload(&self.tessellator);

        match gpu.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (width, height) = gpu.size();
                gpu.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => log::warn!("{:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes().with_title("whiteboard");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;

            let attached = window.canvas().and_then(|canvas| {
                let canvas = web_sys::Element::from(canvas);
                let dst = web_sys::window()?.document()?.get_element_by_id("whiteboard")?;
                dst.append_child(&canvas).ok()?;
                Some(())
            });
            if attached.is_none() {
                log::warn!("couldn't attach canvas to #whiteboard");
            }
        }

        match pollster::block_on(GpuCanvas::new(window.clone())) {
            Ok(gpu) => {
                log::info!(
                    "whiteboard ready: tool {}, {} font face(s)",
                    self.editor.tool().as_str(),
                    self.config.fonts.len()
                );
                self.gpu = Some(gpu);
                self.window = Some(window);
            }
            Err(err) => {
                log::error!("failed to initialise graphics: {:#}", err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window_id != window.id() {
            return;
        }

        if self.input.handle(&mut self.editor, &event) {
            window.request_redraw();
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                log::info!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size.width, physical_size.height);
                }
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open a window and run the editor until it is closed.
pub fn run(config: EditorConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Interaction;
    use crate::text::ApproxMeasurer;

    fn editor() -> Editor {
        Editor::new(Box::new(ApproxMeasurer)).with_clock(|| 7)
    }

    fn ch(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn number_keys_pick_tools() {
        let mut editor = editor();
        let mut input = WindowInput::new();

        assert!(input.key(&mut editor, &ch("5"), Some("5")));
        assert_eq!(editor.tool(), Tool::Circle);
        assert!(!input.key(&mut editor, &ch("9"), Some("9")));
        assert_eq!(tool_for_key("6"), Some(Tool::Text));
    }

    #[test]
    fn typing_builds_the_draft() {
        let mut editor = editor();
        let mut input = WindowInput::new();
        editor.set_tool(Tool::Text);
        editor.pointer_down(10.0, 10.0);

        for s in ["h", "i", "!"] {
            assert!(input.key(&mut editor, &ch(s), Some(s)));
        }
        input.key(&mut editor, &Key::Named(NamedKey::Backspace), None);
        assert_eq!(editor.draft_content(), Some("hi"));

        // digits type while editing rather than switching tools
        input.key(&mut editor, &ch("2"), Some("2"));
        assert_eq!(editor.tool(), Tool::Text);

        input.key(&mut editor, &Key::Named(NamedKey::Enter), None);
        assert!(editor.state().is_idle());
        assert_eq!(editor.shapes().len(), 1);
    }

    #[test]
    fn escape_cancels_the_draft() {
        let mut editor = editor();
        let mut input = WindowInput::new();
        editor.set_tool(Tool::Text);
        editor.pointer_down(0.0, 0.0);
        input.key(&mut editor, &ch("x"), Some("x"));
        assert!(input.key(&mut editor, &Key::Named(NamedKey::Escape), None));

        assert_eq!(*editor.state(), Interaction::Idle);
        assert!(editor.shapes().is_empty());
    }

    #[test]
    fn escape_outside_text_is_not_consumed() {
        let mut editor = editor();
        let mut input = WindowInput::new();
        assert!(!input.key(&mut editor, &Key::Named(NamedKey::Escape), None));
    }

    #[test]
    fn delete_key_removes_selection() {
        let mut editor = editor();
        let mut input = WindowInput::new();
        editor.set_tool(Tool::Circle);
        editor.pointer_down(0.0, 0.0);
        editor.pointer_move(10.0, 0.0);
        editor.pointer_up();
        editor.set_tool(Tool::Select);
        editor.pointer_down(2.0, 0.0);
        editor.pointer_up();

        assert!(input.key(&mut editor, &Key::Named(NamedKey::Delete), None));
        assert!(editor.shapes().is_empty());
        assert!(!input.key(&mut editor, &Key::Named(NamedKey::Delete), None));
    }

    #[test]
    fn focus_loss_commits() {
        let mut editor = editor();
        let mut input = WindowInput::new();
        editor.set_tool(Tool::Text);
        editor.pointer_down(0.0, 0.0);
        editor.text_change("kept");

        assert!(input.handle(&mut editor, &WindowEvent::Focused(false)));
        assert_eq!(editor.shapes().len(), 1);
        assert!(!input.handle(&mut editor, &WindowEvent::Focused(false)));
    }

    #[test]
    fn ime_commit_appends() {
        let mut editor = editor();
        let mut input = WindowInput::new();
        editor.set_tool(Tool::Text);
        editor.pointer_down(0.0, 0.0);
        editor.text_change("a");

        assert!(input.handle(&mut editor, &WindowEvent::Ime(Ime::Commit("bc".into()))));
        assert_eq!(editor.draft_content(), Some("abc"));
    }

    #[test]
    fn app_opens_configured_shapes() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "text_1", "type": "text", "x": 0, "y": 0, "content": "hi"}}, {{"id": ""}}]"#
        )
        .unwrap();
        let config = EditorConfig {
            shapes: Some(file.path().to_path_buf()),
            ..EditorConfig::default()
        };

        let mut app = App::new(config).unwrap();
        assert_eq!(app.editor.shapes().len(), 1);

        app.editor.render(&mut app.tessellator);
        assert!(!app.tessellator.vertices.is_empty());
        assert!(app.tessellator.text_runs.is_empty());
    }
}
