use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use super::Intent;

/// Queue of intents emitted by the UI, drained by the session once per frame
pub struct IntentBus {
    queue: RefCell<VecDeque<Intent>>,
}

impl Clone for IntentBus {
    fn clone(&self) -> Self {
        // When cloning, create a new empty bus
        Self::new()
    }
}

impl std::fmt::Debug for IntentBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentBus")
            .field("queue", &format!("<{} pending>", self.queue.borrow().len()))
            .finish()
    }
}

impl Default for IntentBus {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentBus {
    pub fn new() -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
        }
    }

    /// Queue an intent for the next frame
    pub fn emit(&self, intent: Intent) {
        log::debug!("Queued intent {}", intent.name());
        self.queue.borrow_mut().push_back(intent);
    }

    /// Parse and queue a named message; invalid messages are logged and dropped
    pub fn emit_message(&self, name: &str, payload: &Value) -> bool {
        match Intent::from_message(name, payload) {
            Ok(intent) => {
                self.emit(intent);
                true
            }
            Err(err) => {
                log::warn!("Dropping message {name:?}: {err}");
                false
            }
        }
    }

    /// Take every queued intent, oldest first
    pub fn drain(&self) -> Vec<Intent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
