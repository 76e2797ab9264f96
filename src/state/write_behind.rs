use std::collections::HashMap;
use std::sync::Arc;
use std::thread::JoinHandle;

use futures::StreamExt;
use futures::channel::mpsc::{UnboundedSender, unbounded};
use parking_lot::Mutex;

use super::persistence::{BlobStore, PersistenceError, PersistenceResult};

enum StoreOp {
    Set(String, String),
    Clear(String),
}

/// Wraps a store so writes happen on a background thread.
///
/// Reads see the latest value handed to `set`/`clear`, even while the write
/// is still queued. Dropping the store waits for queued writes to finish.
pub struct ThreadedStore<S: BlobStore + Send + 'static> {
    inner: Arc<Mutex<S>>,
    // Values written but possibly not yet flushed; `None` means cleared
    pending: HashMap<String, Option<String>>,
    sender: UnboundedSender<StoreOp>,
    worker: Option<JoinHandle<()>>,
}

impl<S: BlobStore + Send + 'static> ThreadedStore<S> {
    pub fn new(store: S) -> PersistenceResult<Self> {
        let inner = Arc::new(Mutex::new(store));
        let (sender, mut receiver) = unbounded::<StoreOp>();

        let worker_store = Arc::clone(&inner);
        let worker = std::thread::Builder::new()
            .name("blob-store".to_owned())
            .spawn(move || {
                futures::executor::block_on(async move {
                    while let Some(op) = receiver.next().await {
                        let mut store = worker_store.lock();
                        let (key, result) = match op {
                            StoreOp::Set(key, value) => {
                                let result = store.set(&key, value);
                                (key, result)
                            }
                            StoreOp::Clear(key) => {
                                let result = store.clear(&key);
                                (key, result)
                            }
                        };
                        if let Err(err) = result {
                            log::error!("Background write of {key:?} failed: {err}");
                        }
                    }
                    log::debug!("Blob store worker finished");
                });
            })?;

        Ok(Self {
            inner,
            pending: HashMap::new(),
            sender,
            worker: Some(worker),
        })
    }

    /// Shared handle to the wrapped store.
    pub fn inner(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.inner)
    }

    fn send(&self, op: StoreOp) -> PersistenceResult<()> {
        self.sender
            .unbounded_send(op)
            .map_err(|_| PersistenceError::Unavailable("storage worker stopped".to_owned()))
    }
}

impl<S: BlobStore + Send + 'static> BlobStore for ThreadedStore<S> {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        match self.pending.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.inner.lock().get(key),
        }
    }

    fn set(&mut self, key: &str, value: String) -> PersistenceResult<()> {
        self.pending.insert(key.to_owned(), Some(value.clone()));
        self.send(StoreOp::Set(key.to_owned(), value))
    }

    fn clear(&mut self, key: &str) -> PersistenceResult<()> {
        self.pending.insert(key.to_owned(), None);
        self.send(StoreOp::Clear(key.to_owned()))
    }
}

impl<S: BlobStore + Send + 'static> Drop for ThreadedStore<S> {
    fn drop(&mut self) {
        self.sender.close_channel();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Blob store worker panicked");
            }
        }
    }
}
