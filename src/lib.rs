#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod compositor;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod geometry;
pub mod history;
pub mod input;
pub mod panels;
pub mod pattern;
pub mod renderer;
pub mod session;
pub mod shape;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod util;

pub use app::PaintApp;
pub use color::Rgb;
pub use compositor::Compositor;
pub use error::{IntentError, PictureError};
pub use event::{Intent, IntentBus, ToolSelection};
pub use geometry::Point;
pub use history::{HistoryEntry, HistoryLog};
pub use input::{InputEvent, InputLocation};
pub use pattern::PatternParams;
pub use session::DrawingSession;
pub use shape::{Shape, ShapeType};
pub use state::{BlobStore, CanvasConfig, MemoryStore, PersistenceError, ToolConfig, ToolMode};
pub use stroke::{Stroke, StrokeType};
pub use surface::{DrawSurface, RasterLayer};
