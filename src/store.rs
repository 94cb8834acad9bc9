//! Shape and page persistence seams.
//!
//! The editor only ever talks to these traits through the replication worker;
//! the in-memory implementations mirror the backend's behaviour for tests and
//! offline use.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::drawing::Shape;
use crate::error::{StoreError, StoreResult};

pub trait ShapeStore {
    fn list_shapes(&self) -> impl Future<Output = StoreResult<Vec<Shape>>>;

    fn create_shape(&self, shape: Shape) -> impl Future<Output = StoreResult<Shape>>;

    /// Merge `fields` (a JSON object in wire form) over the stored shape.
    fn update_shape(&self, id: &str, fields: Value) -> impl Future<Output = StoreResult<Shape>>;

    fn delete_shape(&self, id: &str) -> impl Future<Output = StoreResult<()>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

pub trait PageStore {
    fn list_pages(&self) -> impl Future<Output = StoreResult<Vec<Page>>>;

    fn create_page(&self, name: &str) -> impl Future<Output = StoreResult<Page>>;

    fn rename_page(&self, id: &str, name: &str) -> impl Future<Output = StoreResult<Page>>;

    fn delete_page(&self, id: &str) -> impl Future<Output = StoreResult<()>>;

    fn list_shapes_for_page(&self, id: &str) -> impl Future<Output = StoreResult<Vec<Shape>>>;

    fn add_shape_to_page(&self, id: &str, shape: Shape) -> impl Future<Output = StoreResult<Shape>>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shapes kept in insertion order behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryShapeStore {
    shapes: Mutex<Vec<Shape>>,
}

impl MemoryShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.shapes).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Shape> {
        lock(&self.shapes).iter().find(|s| s.id == id).cloned()
    }
}

impl ShapeStore for MemoryShapeStore {
    async fn list_shapes(&self) -> StoreResult<Vec<Shape>> {
        Ok(lock(&self.shapes).clone())
    }

    async fn create_shape(&self, shape: Shape) -> StoreResult<Shape> {
        if shape.id.trim().is_empty() {
            return Err(StoreError::Validation("shape must include an id".into()));
        }
        let mut shapes = lock(&self.shapes);
        if shapes.iter().any(|s| s.id == shape.id) {
            return Err(StoreError::Conflict(shape.id));
        }
        shapes.push(shape.clone());
        Ok(shape)
    }

    async fn update_shape(&self, id: &str, fields: Value) -> StoreResult<Shape> {
        let Value::Object(fields) = fields else {
            return Err(StoreError::Validation("update payload must be an object".into()));
        };

        let mut shapes = lock(&self.shapes);
        let slot = shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut merged = serde_json::to_value(&*slot)?;
        if let Value::Object(map) = &mut merged {
            for (key, value) in fields {
                if key != "id" {
                    map.insert(key, value);
                }
            }
        }
        let updated: Shape = serde_json::from_value(merged)
            .map_err(|err| StoreError::Validation(format!("update leaves shape invalid: {}", err)))?;

        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_shape(&self, id: &str) -> StoreResult<()> {
        let mut shapes = lock(&self.shapes);
        let index = shapes
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        shapes.remove(index);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPageStore {
    pages: Mutex<Vec<Page>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_name(name: &str) -> StoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("page name is required".into()));
    }
    Ok(name.to_string())
}

impl PageStore for MemoryPageStore {
    async fn list_pages(&self) -> StoreResult<Vec<Page>> {
        Ok(lock(&self.pages).clone())
    }

    async fn create_page(&self, name: &str) -> StoreResult<Page> {
        let page = Page {
            id: uuid::Uuid::new_v4().to_string(),
            name: page_name(name)?,
            shapes: Vec::new(),
        };
        lock(&self.pages).push(page.clone());
        Ok(page)
    }

    async fn rename_page(&self, id: &str, name: &str) -> StoreResult<Page> {
        let name = page_name(name)?;
        let mut pages = lock(&self.pages);
        let page = pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        page.name = name;
        Ok(page.clone())
    }

    async fn delete_page(&self, id: &str) -> StoreResult<()> {
        let mut pages = lock(&self.pages);
        let index = pages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        pages.remove(index);
        Ok(())
    }

    async fn list_shapes_for_page(&self, id: &str) -> StoreResult<Vec<Shape>> {
        lock(&self.pages)
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.shapes.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn add_shape_to_page(&self, id: &str, mut shape: Shape) -> StoreResult<Shape> {
        let mut pages = lock(&self.pages);
        let page = pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if shape.id.trim().is_empty() {
            return Err(StoreError::Validation("shape must include an id".into()));
        }
        shape.page_id = Some(page.id.clone());
        page.shapes.push(shape.clone());
        Ok(shape)
    }
}
