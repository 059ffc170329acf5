//! Per-thread conversation state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tokio::sync::Mutex;

use crewcheck_core::{ChatMessage, Responder, ResponderFactory};

/// Bounds for the thread store. Both unset means threads live for the
/// lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct ThreadStoreConfig {
    pub max_threads: Option<u64>,
    pub idle_ttl: Option<Duration>,
}

/// State kept for one conversation thread.
pub struct ThreadState {
    pub responder: Arc<dyn Responder>,
    pub messages: Vec<ChatMessage>,
    pub context: HashMap<String, serde_json::Value>,
}

impl ThreadState {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            responder,
            messages: Vec::new(),
            context: HashMap::new(),
        }
    }

    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(|v| v.as_str())
    }
}

/// Thread id → state. Each entry has its own lock so turns on different
/// threads never contend.
pub struct ThreadStore {
    factory: ResponderFactory,
    threads: Cache<String, Arc<Mutex<ThreadState>>>,
}

impl ThreadStore {
    pub fn new(factory: ResponderFactory, config: &ThreadStoreConfig) -> Self {
        let mut builder = Cache::builder();
        if let Some(max) = config.max_threads {
            builder = builder.max_capacity(max);
        }
        if let Some(ttl) = config.idle_ttl {
            builder = builder.time_to_idle(ttl);
        }
        Self {
            factory,
            threads: builder.build(),
        }
    }

    /// State for `thread_id`, creating it with a fresh responder on first use.
    pub fn get_or_create(&self, thread_id: &str) -> Arc<Mutex<ThreadState>> {
        let factory = Arc::clone(&self.factory);
        self.threads.get_with(thread_id.to_string(), move || {
            tracing::debug!("Creating thread state");
            Arc::new(Mutex::new(ThreadState::new(factory())))
        })
    }

    pub fn get(&self, thread_id: &str) -> Option<Arc<Mutex<ThreadState>>> {
        self.threads.get(thread_id)
    }

    pub fn forget(&self, thread_id: &str) {
        self.threads.invalidate(thread_id);
    }

    /// Number of live threads, after applying pending evictions.
    pub fn len(&self) -> u64 {
        self.threads.run_pending_tasks();
        self.threads.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewcheck_core::CrewInfo;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo;

    impl Responder for Echo {
        fn respond(&self, message: &str, _customer_id: &str) -> anyhow::Result<String> {
            Ok(message.to_string())
        }

        fn crew_info(&self) -> CrewInfo {
            CrewInfo::default()
        }
    }

    fn counting_factory(count: Arc<AtomicUsize>) -> ResponderFactory {
        Arc::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
            Arc::new(Echo) as Arc<dyn Responder>
        })
    }

    #[tokio::test]
    async fn creates_responder_once_per_thread() {
        let count = Arc::new(AtomicUsize::new(0));
        let store = ThreadStore::new(counting_factory(count.clone()), &Default::default());

        let a1 = store.get_or_create("a");
        let a2 = store.get_or_create("a");
        store.get_or_create("b");

        assert!(Arc::ptr_eq(&a1, &a2));
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(store.len(), 2);

        a1.lock().await.messages.push(ChatMessage::user("hi"));
        assert_eq!(a2.lock().await.messages.len(), 1);
    }

    #[test]
    fn forget_drops_thread() {
        let store = ThreadStore::new(counting_factory(Arc::default()), &Default::default());
        store.get_or_create("a");
        store.forget("a");
        assert!(store.get("a").is_none());
        assert!(store.is_empty());
    }
}
