mod bus;
mod intent;

pub use bus::IntentBus;
pub use intent::{Intent, ToolSelection};
