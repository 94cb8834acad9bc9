use crate::app_state::Editor;
use crate::drawing::Shape;

pub const FIRST_PAGE_NAME: &str = "Page 1";

/// A page known to the board. The active page's shapes live in the editor,
/// so its `shapes` here are stale until it is deactivated.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardPage {
    pub id: String,
    pub name: String,
    pub shapes: Vec<Shape>,
}

impl BoardPage {
    fn new(name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            shapes: Vec::new(),
        }
    }
}

/// The list of pages and which one the editor is showing.
#[derive(Debug)]
pub struct Board {
    pages: Vec<BoardPage>,
    active: Option<String>,
}

impl Board {
    /// A board with a single page, already active in `editor`. Shapes the
    /// editor already holds become that page's.
    pub fn new(editor: &mut Editor) -> Self {
        let mut first = BoardPage::new(FIRST_PAGE_NAME);
        first.shapes = editor.shapes().to_vec();
        let id = first.id.clone();
        let mut board = Self {
            pages: vec![first],
            active: None,
        };
        board.activate(&id, editor);
        board
    }

    pub fn pages(&self) -> &[BoardPage] {
        &self.pages
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn page(&self, id: &str) -> Option<&BoardPage> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Create a page and switch to it. Blank names are ignored.
    pub fn add_page(&mut self, name: &str, editor: &mut Editor) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            log::debug!("ignoring blank page name");
            return None;
        }
        let page = BoardPage::new(name);
        let id = page.id.clone();
        self.pages.push(page);
        self.activate(&id, editor);
        Some(id)
    }

    pub fn rename_page(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.pages.iter_mut().find(|p| p.id == id) {
            Some(page) => {
                page.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Drop a page and its shapes. Removing the active page activates the
    /// first remaining one, or leaves the editor empty.
    pub fn remove_page(&mut self, id: &str, editor: &mut Editor) -> bool {
        let Some(index) = self.pages.iter().position(|p| p.id == id) else {
            return false;
        };
        self.pages.remove(index);

        if self.active.as_deref() == Some(id) {
            self.active = None;
            editor.switch_page(None, Vec::new());
            if let Some(next) = self.pages.first().map(|p| p.id.clone()) {
                self.activate(&next, editor);
            }
        }
        true
    }

    /// Swap the editor over to `id`'s shapes, stashing the current page's.
    pub fn activate(&mut self, id: &str, editor: &mut Editor) -> bool {
        if self.active.as_deref() == Some(id) {
            return true;
        }
        let Some(index) = self.pages.iter().position(|p| p.id == id) else {
            return false;
        };

        let incoming = std::mem::take(&mut self.pages[index].shapes);
        let outgoing = editor.switch_page(Some(id.to_string()), incoming);
        if let Some(previous) = self.active.take() {
            if let Some(page) = self.pages.iter_mut().find(|p| p.id == previous) {
                page.shapes = outgoing;
            }
        }
        self.active = Some(id.to_string());
        log::debug!("activated page {}", self.pages[index].name);
        true
    }
}
