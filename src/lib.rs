pub mod app;
mod app_state;
pub mod board;
pub mod color;
pub mod config;
pub mod drawing;
pub mod error;
mod event_handler;
pub mod gpu;
pub mod hit_test;
pub mod logging;
pub mod math;
pub mod renderer;
pub mod replicate;
pub mod state;
pub mod store;
pub mod surface;
pub mod tessellate;
pub mod text;
pub mod transform;
#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-export the main public interface
pub use app::{WindowInput, run};
pub use app_state::Editor;
pub use board::Board;
pub use config::EditorConfig;
pub use drawing::{Shape, ShapeKind, Tool};
pub use error::{FontError, StoreError, StoreResult};
pub use hit_test::{hit_test, topmost_hit};
pub use renderer::render;
pub use state::Interaction;
pub use surface::Surface;
pub use text::{TextExtent, TextMeasurer};
pub use transform::transform;

// Re-export for WASM compatibility
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    logging::init();
    if let Err(err) = run(EditorConfig::default()) {
        log::error!("whiteboard stopped: {:#}", err);
    }
}
