mod config;
mod drawing;
mod persistence;
#[cfg(not(target_arch = "wasm32"))]
mod write_behind;

pub use config::{CanvasConfig, ToolConfig, ToolMode};
pub use drawing::{ActionPhase, DrawingState};
pub use persistence::{BlobStore, MemoryStore, PersistenceError, PersistenceResult};

#[cfg(not(target_arch = "wasm32"))]
pub use persistence::FileStore;
#[cfg(target_arch = "wasm32")]
pub use persistence::LocalStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use write_behind::ThreadedStore;
