use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Handle returned by `subscribe`, used to remove the handler later
pub type SubscriptionId = u64;

type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Typed publish/subscribe list for a store's change notifications
///
/// `emit` calls handlers on the caller's thread, in subscription order, and
/// returns only after all of them ran. Handlers are snapshotted first, so a
/// handler may read the store or (un)subscribe without deadlocking.
pub struct ChangeNotifier<T> {
    next_id: AtomicU64,
    handlers: RwLock<Vec<(SubscriptionId, Handler<T>)>>,
}

impl<T: Copy> ChangeNotifier<T> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(handler)));
        id
    }

    /// Returns false when the id was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn emit(&self, value: T) {
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in snapshot {
            handler(value);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Copy> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}
